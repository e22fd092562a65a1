//! # Engine Primitives
//!
//! Fixed constants for the TerraVision engine. Timing values are the
//! reference cadence; hosts may override them through `TransitionTiming`
//! and `JourneyTiming`.

use crate::Millis;

// =============================================================================
// TRANSITION TIMING
// =============================================================================

/// Delay between two revealed characters of a transition message.
pub const TYPE_INTERVAL_MS: Millis = 26;

/// Pause after a message is fully typed before the next one starts.
pub const MESSAGE_PAUSE_MS: Millis = 540;

/// Extra hold after the last message before the stage switch.
pub const COMPLETION_PAD_MS: Millis = 700;

// =============================================================================
// JOURNEY TIMING
// =============================================================================

/// Starting value of the launch countdown.
pub const COUNTDOWN_START: u8 = 3;

/// Interval between countdown ticks.
pub const COUNTDOWN_TICK_MS: Millis = 900;

/// Interval between AI companion boot lines.
pub const AI_LINE_INTERVAL_MS: Millis = 1200;

/// Shortest time an intro narrative cue stays on screen.
pub const MIN_CUE_MS: Millis = 1000;

/// Fallback duration for a narrative cue without its own duration.
pub const DEFAULT_CUE_MS: Millis = 10_200;

// =============================================================================
// PUZZLE
// =============================================================================

/// Number of toggle nodes in the purpose puzzle.
pub const MINI_NODE_COUNT: usize = 3;

/// Untouched puzzle state.
pub const MINI_NODES_BASELINE: [bool; MINI_NODE_COUNT] = [false; MINI_NODE_COUNT];

// =============================================================================
// PERSISTENCE
// =============================================================================

/// Store key of the journey snapshot.
pub const JOURNEY_KEY: &str = "terravisionJourney";

/// Store key of the passport identity snapshot.
pub const PASSPORT_KEY: &str = "terravision_passport_v1";

/// Retention window of the journey snapshot (7 days).
pub const JOURNEY_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 7;

/// Retention window of the passport snapshot (1 year).
pub const PASSPORT_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 365;

/// Magic bytes for the stored blob envelope.
pub const MAGIC_BYTES: &[u8; 4] = b"TVSN";

/// Current envelope format version.
pub const FORMAT_VERSION: u8 = 1;

/// Largest stored blob accepted on read.
pub const MAX_BLOB_SIZE: usize = 1024 * 1024;

// =============================================================================
// PASSPORT
// =============================================================================

/// The year the journey is set in.
pub const HORIZON_YEAR: i32 = 2050;
