//! # Timer Facility
//!
//! Cancelable one-shot and repeating timers for the state machines.
//!
//! The engine never reads a clock. Hosts pass the current instant (in
//! milliseconds on any monotonic base) into `poll`, and each machine asks its
//! [`TimerSet`] which events have come due. Events fire one at a time in
//! `(due, scheduling order)` order, so a handler may cancel or schedule timers
//! before the next event is popped.

use crate::Millis;

/// Whether the host can deliver timer callbacks at all.
///
/// With `Unavailable` the machines degrade to completing timed work
/// synchronously instead of waiting for ticks that will never come.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerSupport {
    #[default]
    Available,
    Unavailable,
}

impl TimerSupport {
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, TimerSupport::Available)
    }
}

/// Handle of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry<E> {
    id: TimerId,
    due: Millis,
    seq: u64,
    every: Option<Millis>,
    event: E,
}

/// A set of pending timers carrying events of type `E`.
#[derive(Debug, Clone)]
pub struct TimerSet<E> {
    entries: Vec<Entry<E>>,
    next_id: u64,
    next_seq: u64,
}

impl<E> Default for TimerSet<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            next_seq: 0,
        }
    }
}

impl<E: Clone> TimerSet<E> {
    /// Create an empty timer set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, due: Millis, every: Option<Millis>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let seq = self.bump_seq();
        self.entries.push(Entry {
            id,
            due,
            seq,
            every,
            event,
        });
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        seq
    }

    /// Fire `event` once at `due`.
    pub fn schedule_at(&mut self, due: Millis, event: E) -> TimerId {
        self.push(due, None, event)
    }

    /// Fire `event` at `first_due` and then every `every` ms until canceled.
    ///
    /// A zero interval is bumped to 1 ms so a repeating timer always makes
    /// progress.
    pub fn schedule_every(&mut self, first_due: Millis, every: Millis, event: E) -> TimerId {
        self.push(first_due, Some(every.max(1)), event)
    }

    /// Cancel one timer. Returns `false` if it already fired or was canceled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancel every pending timer.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Check whether `id` is still pending.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Earliest pending due time.
    #[must_use]
    pub fn next_due(&self) -> Option<Millis> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Pop the earliest event due at or before `now`.
    ///
    /// Returns the instant the event was scheduled for, which may be earlier
    /// than `now` when the host polls late. Repeating timers are re-armed
    /// relative to that scheduled instant, not to `now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, E)> {
        let position = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(i, _)| i)?;

        let fired_at = self.entries[position].due;
        let event = self.entries[position].event.clone();

        match self.entries[position].every {
            Some(every) => {
                let seq = self.bump_seq();
                let entry = &mut self.entries[position];
                entry.due = fired_at.saturating_add(every);
                entry.seq = seq;
            }
            None => {
                self.entries.swap_remove(position);
            }
        }

        Some((fired_at, event))
    }
}

// =============================================================================
// CLOCKED TRAIT
// =============================================================================

/// Something the host drives with ticks.
pub trait Clocked {
    /// Earliest instant at which `poll` has work to do.
    fn next_deadline(&self) -> Option<Millis>;

    /// Process every timer due at or before `now`.
    fn poll(&mut self, now: Millis);
}

// =============================================================================
// TESTS
// =============================================================================
