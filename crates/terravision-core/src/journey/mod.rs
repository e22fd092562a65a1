//! # Journey Stage Machine
//!
//! The seven-stage journey: `launch → ai-guide → colony → purpose → crisis →
//! vision → legacy`.
//!
//! - `state`: in-memory model and the explicit retreat invalidation table
//! - `snapshot`: persisted shape and validating hydration
//! - `machine`: operations, timers and the persistence gate
//! - `narrative`: time-of-day intro cues
//! - `view`: read model for the presentation layer

pub mod machine;
pub mod narrative;
pub mod snapshot;
pub mod state;
pub mod view;

pub use machine::JourneyMachine;
pub use narrative::{LocalTime, NarrativeCue, TimeBand, intro_narratives};
pub use snapshot::{Hydrated, JourneySnapshot, hydrate};
pub use state::{JourneyField, JourneyState, cleared_on_retreat_into};
pub use view::{Certificate, IntroView, JourneyView, OptionView, ProgressState, ProgressStep, StagePanel};

use crate::context::ContextRef;
use crate::primitives::{AI_LINE_INTERVAL_MS, COUNTDOWN_TICK_MS, MIN_CUE_MS};
use crate::storage::SharedStore;
use crate::timer::TimerSupport;
use crate::{Millis, Profile};
use serde::Serialize;

/// Cadence of the journey's own timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JourneyTiming {
    pub countdown_tick_ms: Millis,
    pub ai_line_ms: Millis,
    pub min_cue_ms: Millis,
    pub support: TimerSupport,
}

impl Default for JourneyTiming {
    fn default() -> Self {
        Self {
            countdown_tick_ms: COUNTDOWN_TICK_MS,
            ai_line_ms: AI_LINE_INTERVAL_MS,
            min_cue_ms: MIN_CUE_MS,
            support: TimerSupport::Available,
        }
    }
}

/// Everything the outer application hands the journey when mounting it.
pub struct JourneyMount {
    pub profile: Option<Profile>,
    /// Input to the future-role matrix only.
    pub mission_key: String,
    pub local_time: LocalTime,
    pub timing: JourneyTiming,
    pub context: ContextRef,
    pub store: SharedStore,
}

impl std::fmt::Debug for JourneyMount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JourneyMount")
            .field("profile", &self.profile)
            .field("mission_key", &self.mission_key)
            .field("local_time", &self.local_time)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

/// Presentation cue emitted by the machine; the host decides how to play it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cue {
    Selection,
    Ignition,
    StageAdvance,
    StepBack,
}
