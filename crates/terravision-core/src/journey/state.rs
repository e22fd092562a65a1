//! # Journey State
//!
//! The in-memory model of the journey and the explicit invalidation table
//! applied when the traveler steps back.
//!
//! ## Retreat Cascade
//!
//! Later choices depend on earlier ones, so stepping back into a stage clears
//! that stage's own selection and every selection downstream of it:
//!
//! | retreating into | cleared |
//! |-----------------|---------|
//! | launch   | seat, countdown, focus, habitat, nodes, solved flag, crisis, timeline |
//! | ai-guide | focus, habitat, nodes, solved flag, crisis, timeline |
//! | colony   | habitat, nodes, solved flag, crisis, timeline |
//! | purpose  | nodes, solved flag, crisis, timeline |
//! | crisis   | crisis, timeline |
//! | vision   | timeline |

use crate::catalog::mini_target;
use crate::primitives::{MINI_NODE_COUNT, MINI_NODES_BASELINE};
use crate::{CrisisOption, Focus, Habitat, StageId, Stamp, TimelineOption};

// =============================================================================
// FIELDS
// =============================================================================

/// A stage-owned field of the journey state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JourneyField {
    SelectedSeat,
    Countdown,
    AiFocus,
    Habitat,
    MiniNodes,
    MiniComplete,
    CrisisChoice,
    Timeline,
}

impl JourneyField {
    /// The stage at which this field is chosen.
    #[must_use]
    pub fn owner(&self) -> StageId {
        match self {
            JourneyField::SelectedSeat | JourneyField::Countdown => StageId::Launch,
            JourneyField::AiFocus => StageId::AiGuide,
            JourneyField::Habitat => StageId::Colony,
            JourneyField::MiniNodes | JourneyField::MiniComplete => StageId::Purpose,
            JourneyField::CrisisChoice => StageId::Crisis,
            JourneyField::Timeline => StageId::Vision,
        }
    }
}

/// Fields reset when retreating into `target`.
#[must_use]
pub fn cleared_on_retreat_into(target: StageId) -> &'static [JourneyField] {
    use JourneyField::*;
    match target {
        StageId::Launch => &[
            SelectedSeat,
            Countdown,
            AiFocus,
            Habitat,
            MiniNodes,
            MiniComplete,
            CrisisChoice,
            Timeline,
        ],
        StageId::AiGuide => &[
            AiFocus,
            Habitat,
            MiniNodes,
            MiniComplete,
            CrisisChoice,
            Timeline,
        ],
        StageId::Colony => &[Habitat, MiniNodes, MiniComplete, CrisisChoice, Timeline],
        StageId::Purpose => &[MiniNodes, MiniComplete, CrisisChoice, Timeline],
        StageId::Crisis => &[CrisisChoice, Timeline],
        StageId::Vision => &[Timeline],
        StageId::Legacy => &[],
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Complete in-memory journey state.
///
/// Owned by the journey machine, which only hands out shared references.
/// `mini_complete` is only ever written by [`JourneyState::recompute_mini_complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyState {
    pub stage: StageId,
    pub selected_seat: Option<String>,
    /// Remaining countdown ticks; transient, never persisted.
    pub countdown: Option<u8>,
    pub ai_focus: Option<Focus>,
    pub habitat: Option<Habitat>,
    pub mini_nodes: [bool; MINI_NODE_COUNT],
    pub mini_complete: bool,
    pub crisis_choice: Option<CrisisOption>,
    pub timeline: Option<TimelineOption>,
    pub stamps: Vec<Stamp>,
    pub intro_dismissed: bool,
}

impl Default for JourneyState {
    fn default() -> Self {
        Self::initial()
    }
}

impl JourneyState {
    /// State of a first visit.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            stage: StageId::Launch,
            selected_seat: None,
            countdown: None,
            ai_focus: None,
            habitat: None,
            mini_nodes: MINI_NODES_BASELINE,
            mini_complete: false,
            crisis_choice: None,
            timeline: None,
            stamps: Vec::new(),
            intro_dismissed: false,
        }
    }

    /// Recompute the solved flag from the nodes and the focus target.
    pub fn recompute_mini_complete(&mut self) {
        self.mini_complete = self.mini_nodes == mini_target(self.ai_focus);
    }

    /// Reset one field to its initial value.
    ///
    /// The solved flag is recomputed rather than forced, so clear the nodes
    /// first.
    pub fn clear(&mut self, field: JourneyField) {
        match field {
            JourneyField::SelectedSeat => self.selected_seat = None,
            JourneyField::Countdown => self.countdown = None,
            JourneyField::AiFocus => self.ai_focus = None,
            JourneyField::Habitat => self.habitat = None,
            JourneyField::MiniNodes => self.mini_nodes = MINI_NODES_BASELINE,
            JourneyField::MiniComplete => self.recompute_mini_complete(),
            JourneyField::CrisisChoice => self.crisis_choice = None,
            JourneyField::Timeline => self.timeline = None,
        }
    }

    /// Reset every field in `fields`.
    pub fn clear_all(&mut self, fields: &[JourneyField]) {
        for field in fields {
            self.clear(*field);
        }
    }

    /// Record a stamp, replacing any earlier stamp for the same stage.
    pub fn record_stamp(&mut self, stamp: Stamp) {
        self.stamps.retain(|s| s.stage_id != stamp.stage_id);
        self.stamps.push(stamp);
    }

    /// Drop the stamp of `stage`, if any.
    pub fn remove_stamp(&mut self, stage: StageId) {
        self.stamps.retain(|s| s.stage_id != stage);
    }
}

// =============================================================================
// TESTS
// =============================================================================
