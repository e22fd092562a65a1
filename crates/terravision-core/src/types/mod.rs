//! # Core Type Definitions
//!
//! This module contains the vocabulary shared by every part of the engine:
//! - Stage identifiers (`StageId`, `TopStage`, `NavMode`)
//! - Choice identifiers (`Focus`, `Habitat`) and option records (`CrisisOption`, `TimelineOption`)
//! - Ledger entries (`Stamp`) and the traveler `Profile`
//! - Error types (`TerraError`)
//!
//! ## Identifier Normalisation
//!
//! Focus and habitat ids arrive from the presentation layer and from persisted
//! snapshots in whatever case the writer used. `Focus::parse` and
//! `Habitat::parse` trim and lowercase before matching, so `"Eco"`, `" eco "`
//! and `"eco"` are the same choice.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Milliseconds on the host's monotonic clock.
pub type Millis = u64;

// =============================================================================
// TOP-LEVEL STAGES
// =============================================================================

/// Top-level stage of the application shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopStage {
    /// Passport request form.
    Form,
    /// Issued passport card.
    Passport,
    /// Typed-message interlude owned by the transition sequencer.
    Transition,
    /// Narrative prelude.
    Story,
    /// Seven-stage journey.
    Journey,
}

impl TopStage {
    /// Stable identifier used in logs and JSON output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TopStage::Form => "form",
            TopStage::Passport => "passport",
            TopStage::Transition => "transition",
            TopStage::Story => "story",
            TopStage::Journey => "journey",
        }
    }
}

impl std::fmt::Display for TopStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation menu mode: a fresh visitor only sees "Start".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavMode {
    #[default]
    Start,
    Full,
}

// =============================================================================
// JOURNEY STAGES
// =============================================================================

/// The seven ordered journey stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StageId {
    #[serde(rename = "launch")]
    Launch,
    #[serde(rename = "ai-guide")]
    AiGuide,
    #[serde(rename = "colony")]
    Colony,
    #[serde(rename = "purpose")]
    Purpose,
    #[serde(rename = "crisis")]
    Crisis,
    #[serde(rename = "vision")]
    Vision,
    #[serde(rename = "legacy")]
    Legacy,
}

impl StageId {
    /// All stages in visiting order.
    pub const ALL: [StageId; 7] = [
        StageId::Launch,
        StageId::AiGuide,
        StageId::Colony,
        StageId::Purpose,
        StageId::Crisis,
        StageId::Vision,
        StageId::Legacy,
    ];

    /// Index of the terminal stage.
    pub const LAST_INDEX: usize = 6;

    /// Stage at `index`, clamped into `[0, LAST_INDEX]`.
    #[must_use]
    pub fn from_index(index: usize) -> StageId {
        Self::ALL[index.min(Self::LAST_INDEX)]
    }

    /// Position in the visiting order.
    #[must_use]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Stable identifier used in stamps and snapshots.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StageId::Launch => "launch",
            StageId::AiGuide => "ai-guide",
            StageId::Colony => "colony",
            StageId::Purpose => "purpose",
            StageId::Crisis => "crisis",
            StageId::Vision => "vision",
            StageId::Legacy => "legacy",
        }
    }

    /// Display title of the stage.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            StageId::Launch => "The Launch",
            StageId::AiGuide => "AI Companion Awakens",
            StageId::Colony => "First Glimpse of the Colony",
            StageId::Purpose => "Future Work & Purpose",
            StageId::Crisis => "Crisis Simulation",
            StageId::Vision => "Future Vision Chamber",
            StageId::Legacy => "Return with Legacy",
        }
    }

    /// One-line subtitle shown beside the stage.
    #[must_use]
    pub fn subtitle(&self) -> &'static str {
        match self {
            StageId::Launch => "Leave Earth behind and board the Terravision starliner.",
            StageId::AiGuide => "Meet the guide that will decode your path forward.",
            StageId::Colony => "Choose the habitat that feels like home among the stars.",
            StageId::Purpose => "Accept a role that aligns with your strengths.",
            StageId::Crisis => "Respond to an unexpected event and shape the future.",
            StageId::Vision => "Peer into distant timelines and witness what unfolds.",
            StageId::Legacy => "Carry your badge home and share the story you forged.",
        }
    }

    /// The next stage, if any.
    #[must_use]
    pub fn next(&self) -> Option<StageId> {
        Self::ALL.get(self.index().saturating_add(1)).copied()
    }

    /// The previous stage, if any.
    #[must_use]
    pub fn previous(&self) -> Option<StageId> {
        self.index().checked_sub(1).map(Self::from_index)
    }

    /// Check if this stage is terminal (legacy).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, StageId::Legacy)
    }

    /// Parse a stage identifier.
    #[must_use]
    pub fn parse(raw: &str) -> Option<StageId> {
        Self::ALL.into_iter().find(|stage| stage.as_str() == raw)
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.as_str(), self.title())
    }
}

// =============================================================================
// CHOICES
// =============================================================================

/// AI companion orientation chosen at `ai-guide`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    Eco,
    Stellar,
    Synthetic,
}

impl Focus {
    pub const ALL: [Focus; 3] = [Focus::Eco, Focus::Stellar, Focus::Synthetic];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Focus::Eco => "eco",
            Focus::Stellar => "stellar",
            Focus::Synthetic => "synthetic",
        }
    }

    /// Parse a focus id, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Focus> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.as_str() == normalized)
    }
}

/// Colony habitat chosen at `colony`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Habitat {
    Dome,
    Ring,
    Arcology,
}

impl Habitat {
    pub const ALL: [Habitat; 3] = [Habitat::Dome, Habitat::Ring, Habitat::Arcology];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Habitat::Dome => "dome",
            Habitat::Ring => "ring",
            Habitat::Arcology => "arcology",
        }
    }

    /// Parse a habitat id, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Habitat> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|h| h.as_str() == normalized)
    }
}

/// One response to a crisis script, persisted as the whole object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisOption {
    pub id: String,
    pub label: String,
    pub outcome: String,
}

/// One timeline window at `vision`, persisted as the whole object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineOption {
    pub id: String,
    pub label: String,
    pub vista: String,
}

// =============================================================================
// STAMP LEDGER
// =============================================================================

/// A ledger entry recording a completed stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stamp {
    pub stage_id: StageId,
    pub label: String,
    pub detail: String,
}

impl Stamp {
    /// Stamp for `stage` carrying the stage title as label.
    #[must_use]
    pub fn for_stage(stage: StageId, detail: impl Into<String>) -> Self {
        Self {
            stage_id: stage,
            label: stage.title().to_string(),
            detail: detail.into(),
        }
    }
}

// =============================================================================
// PROFILE
// =============================================================================

/// Traveler identity issued by the passport form. Read-only to the journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    /// Display date of birth, `DD/MM/YYYY`.
    pub dob: String,
    pub age_in_2050: i32,
    pub birth_year: i32,
    pub passport_id: String,
    /// Date of birth as submitted, `YYYY-MM-DD`.
    #[serde(default)]
    pub source_dob: String,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur outside the two state machines.
///
/// The machines themselves never fail: illegal operations are no-ops and
/// storage failures are absorbed. These variants cover store setup, passport
/// form input and host configuration.
#[derive(Debug, Error)]
pub enum TerraError {
    /// The passport form input could not be turned into a profile.
    #[error("Invalid passport request: {0}")]
    InvalidPassport(String),

    /// The passport form is locked because a passport was already issued.
    #[error("Passport already issued")]
    PassportLocked,

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The storage medium could not be opened.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// The host configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_order_and_neighbours() {
        assert_eq!(StageId::Launch.index(), 0);
        assert_eq!(StageId::Legacy.index(), StageId::LAST_INDEX);
        assert_eq!(StageId::Launch.previous(), None);
        assert_eq!(StageId::Legacy.next(), None);
        assert_eq!(StageId::Colony.next(), Some(StageId::Purpose));
        assert_eq!(StageId::Colony.previous(), Some(StageId::AiGuide));
    }

    #[test]
    fn from_index_clamps() {
        assert_eq!(StageId::from_index(42), StageId::Legacy);
    }

    #[test]
    fn stage_ids_serialize_kebab() {
        let json = serde_json::to_string(&StageId::AiGuide).expect("serialize");
        assert_eq!(json, "\"ai-guide\"");
        assert_eq!(StageId::parse("ai-guide"), Some(StageId::AiGuide));
    }

    #[test]
    fn focus_and_habitat_parse_normalises() {
        assert_eq!(Focus::parse(" Eco "), Some(Focus::Eco));
        assert_eq!(Focus::parse("SYNTHETIC"), Some(Focus::Synthetic));
        assert_eq!(Focus::parse("lunar"), None);
        assert_eq!(Habitat::parse("Ring"), Some(Habitat::Ring));
    }

    #[test]
    fn stamp_uses_stage_title() {
        let stamp = Stamp::for_stage(StageId::Crisis, "done");
        assert_eq!(stamp.label, "Crisis Simulation");
        let json = serde_json::to_value(&stamp).expect("serialize");
        assert_eq!(json["stageId"], "crisis");
    }
}
