//! # terravision-core
//!
//! The deterministic navigation and progression engine for the TerraVision
//! future journey - THE LOGIC.
//!
//! Two state machines sit at the centre:
//! - the Transition Sequencer, a timed typing interlude that gates a switch
//!   between top-level stages
//! - the Journey Stage Machine, seven ordered stages with cascade
//!   invalidation on retreat and a hydration-gated snapshot write-back
//!
//! ## Architectural Constraints
//!
//! - Never reads a clock: hosts pass explicit millisecond instants
//! - Single-threaded: shared state is `Rc`/`Cell`
//! - Has NO async, NO network dependencies (pure Rust)
//! - Storage is best-effort: failures are logged, never propagated into the
//!   machines

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod context;
pub mod formats;
pub mod journey;
pub mod passport;
pub mod primitives;
pub mod shell;
pub mod storage;
pub mod timer;
pub mod transition;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    CrisisOption, Focus, Habitat, Millis, NavMode, Profile, StageId, Stamp, TerraError,
    TimelineOption, TopStage,
};

// =============================================================================
// RE-EXPORTS: Machines
// =============================================================================

pub use journey::{
    Cue, JourneyField, JourneyMachine, JourneyMount, JourneySnapshot, JourneyState, JourneyTiming,
    JourneyView, LocalTime, cleared_on_retreat_into, hydrate,
};
pub use transition::{
    TransitionRequest, TransitionRow, TransitionSequencer, TransitionTiming, completion_offset,
    message_start_offsets,
};

// =============================================================================
// RE-EXPORTS: Runtime Plumbing
// =============================================================================

pub use context::{ContextRef, SharedContext};
pub use passport::PassportRecord;
pub use shell::{Shell, ShellConfig};
pub use storage::{MemoryStore, RedbStore, SharedStore, SnapshotStore, StoreSlot};
pub use timer::{Clocked, TimerId, TimerSet, TimerSupport};
