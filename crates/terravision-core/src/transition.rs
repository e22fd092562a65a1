//! # Transition Sequencer
//!
//! A timed state machine that types out status messages before switching the
//! top-level stage.
//!
//! ## Schedule
//!
//! The schedule is fixed when a request begins. For messages `m0..mn`:
//!
//! | Event | Offset from begin |
//! |-------|-------------------|
//! | message `i` starts | `Σ_{j<i} (len(m_j) × TYPE_INTERVAL + MESSAGE_PAUSE)` |
//! | stage switch | start of `mn` + `len(mn) × TYPE_INTERVAL + MESSAGE_PAUSE + COMPLETION_PAD` |
//!
//! Inside a message's window a repeating timer reveals one character every
//! `TYPE_INTERVAL` and stops once the full text is shown.
//!
//! ## Exclusivity
//!
//! At most one request is live. `begin` is a silent no-op while a request is
//! running or while the outer stage already is `transition`; the first
//! request always wins.

use crate::primitives::{COMPLETION_PAD_MS, MESSAGE_PAUSE_MS, TYPE_INTERVAL_MS};
use crate::timer::{TimerId, TimerSet, TimerSupport};
use crate::{Millis, TopStage};

// =============================================================================
// TIMING
// =============================================================================

/// Cadence of the typing animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTiming {
    pub type_interval_ms: Millis,
    pub message_pause_ms: Millis,
    pub completion_pad_ms: Millis,
    pub support: TimerSupport,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            type_interval_ms: TYPE_INTERVAL_MS,
            message_pause_ms: MESSAGE_PAUSE_MS,
            completion_pad_ms: COMPLETION_PAD_MS,
            support: TimerSupport::Available,
        }
    }
}

fn char_len(text: &str) -> Millis {
    text.chars().count() as Millis
}

/// Offset of each message's start relative to `begin`.
///
/// Closed-form cumulative sum over the lengths of the preceding messages.
#[must_use]
pub fn message_start_offsets<S: AsRef<str>>(messages: &[S], timing: &TransitionTiming) -> Vec<Millis> {
    let mut offsets = Vec::with_capacity(messages.len());
    let mut accumulated: Millis = 0;
    for message in messages {
        offsets.push(accumulated);
        accumulated = accumulated
            .saturating_add(char_len(message.as_ref()).saturating_mul(timing.type_interval_ms))
            .saturating_add(timing.message_pause_ms);
    }
    offsets
}

/// Offset of the stage switch relative to `begin`.
#[must_use]
pub fn completion_offset<S: AsRef<str>>(messages: &[S], timing: &TransitionTiming) -> Millis {
    let last_start = message_start_offsets(messages, timing)
        .last()
        .copied()
        .unwrap_or(0);
    let last_len = messages.last().map(|m| char_len(m.as_ref())).unwrap_or(0);
    last_start
        .saturating_add(last_len.saturating_mul(timing.type_interval_ms))
        .saturating_add(timing.message_pause_ms)
        .saturating_add(timing.completion_pad_ms)
}

// =============================================================================
// REQUEST
// =============================================================================

/// Callback invoked once after the stage switch.
pub type Completion = Box<dyn FnOnce()>;

/// One typed interlude between two top-level stages.
pub struct TransitionRequest {
    pub id: String,
    /// Stage to highlight in navigation while the interlude runs.
    pub origin_stage: TopStage,
    /// Headline shown above the message feed.
    pub lead: Option<String>,
    pub messages: Vec<String>,
    pub next_stage: TopStage,
    on_complete: Option<Completion>,
}

impl TransitionRequest {
    /// Create a request without lead or completion callback.
    #[must_use]
    pub fn new<S: Into<String>>(
        id: impl Into<String>,
        origin_stage: TopStage,
        messages: impl IntoIterator<Item = S>,
        next_stage: TopStage,
    ) -> Self {
        Self {
            id: id.into(),
            origin_stage,
            lead: None,
            messages: messages.into_iter().map(Into::into).collect(),
            next_stage,
            on_complete: None,
        }
    }

    #[must_use]
    pub fn with_lead(mut self, lead: impl Into<String>) -> Self {
        self.lead = Some(lead.into());
        self
    }

    #[must_use]
    pub fn on_complete(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

impl std::fmt::Debug for TransitionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionRequest")
            .field("id", &self.id)
            .field("origin_stage", &self.origin_stage)
            .field("lead", &self.lead)
            .field("messages", &self.messages)
            .field("next_stage", &self.next_stage)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

// =============================================================================
// VIEW
// =============================================================================

/// One revealed row of the message feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRow {
    /// Two-digit ordinal, `"01"`, `"02"`, ...
    pub label: String,
    pub text: String,
    pub is_current: bool,
    pub is_complete: bool,
}

// =============================================================================
// SEQUENCER
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SequencerEvent {
    StartMessage(usize),
    TypeChar,
    Complete,
}

#[derive(Debug)]
struct Running {
    request: TransitionRequest,
    current: usize,
    typed: Vec<String>,
    revealed: usize,
    typing_timer: Option<TimerId>,
}

#[derive(Debug, Default)]
enum SequencerState {
    #[default]
    Idle,
    Running(Box<Running>),
}

/// Typed-message interlude gating a top-level stage switch.
#[derive(Debug, Default)]
pub struct TransitionSequencer {
    timing: TransitionTiming,
    state: SequencerState,
    timers: TimerSet<SequencerEvent>,
}

impl TransitionSequencer {
    #[must_use]
    pub fn new(timing: TransitionTiming) -> Self {
        Self {
            timing,
            state: SequencerState::Idle,
            timers: TimerSet::new(),
        }
    }

    #[must_use]
    pub fn timing(&self) -> &TransitionTiming {
        &self.timing
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, SequencerState::Running(_))
    }

    fn running(&self) -> Option<&Running> {
        match &self.state {
            SequencerState::Running(run) => Some(run),
            SequencerState::Idle => None,
        }
    }

    /// Start a request. Returns `false` (and changes nothing) if one is live.
    ///
    /// Switches `outer` to `transition`. Without timer support the request
    /// completes before this returns.
    pub fn begin(&mut self, request: TransitionRequest, outer: &mut TopStage, now: Millis) -> bool {
        if self.is_running() || *outer == TopStage::Transition {
            tracing::debug!(request = %request.id, "transition rejected: one is already live");
            return false;
        }

        self.timers.cancel_all();
        *outer = TopStage::Transition;
        tracing::info!(
            request = %request.id,
            from = %request.origin_stage,
            to = %request.next_stage,
            messages = request.messages.len(),
            "transition started"
        );

        if !self.timing.support.is_available() {
            self.state = SequencerState::Idle;
            Self::complete(request, outer);
            return true;
        }

        let offsets = message_start_offsets(&request.messages, &self.timing);
        for (index, offset) in offsets.iter().enumerate().skip(1) {
            self.timers
                .schedule_at(now.saturating_add(*offset), SequencerEvent::StartMessage(index));
        }
        let done = completion_offset(&request.messages, &self.timing);
        self.timers
            .schedule_at(now.saturating_add(done), SequencerEvent::Complete);

        let typed = vec![String::new(); request.messages.len()];
        self.state = SequencerState::Running(Box::new(Running {
            request,
            current: 0,
            typed,
            revealed: 0,
            typing_timer: None,
        }));
        self.start_typing(0, now);
        true
    }

    /// Stop every pending timer without switching stage or calling back.
    pub fn cancel(&mut self) {
        self.timers.cancel_all();
        if let SequencerState::Running(run) = std::mem::take(&mut self.state) {
            tracing::debug!(request = %run.request.id, "transition canceled");
        }
    }

    /// Earliest instant at which `poll` has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_due()
    }

    /// Process every timer due at or before `now`.
    pub fn poll(&mut self, now: Millis, outer: &mut TopStage) {
        while let Some((fired_at, event)) = self.timers.pop_due(now) {
            match event {
                SequencerEvent::StartMessage(index) => self.start_typing(index, fired_at),
                SequencerEvent::TypeChar => self.reveal_char(),
                SequencerEvent::Complete => {
                    self.timers.cancel_all();
                    if let SequencerState::Running(run) = std::mem::take(&mut self.state) {
                        Self::complete(run.request, outer);
                    }
                }
            }
        }
    }

    fn complete(request: TransitionRequest, outer: &mut TopStage) {
        *outer = request.next_stage;
        tracing::info!(request = %request.id, stage = %request.next_stage, "transition complete");
        if let Some(callback) = request.on_complete {
            callback();
        }
    }

    fn start_typing(&mut self, index: usize, at: Millis) {
        let interval = self.timing.type_interval_ms;
        let SequencerState::Running(run) = &mut self.state else {
            return;
        };
        if let Some(timer) = run.typing_timer.take() {
            self.timers.cancel(timer);
        }

        run.current = index.min(run.request.messages.len().saturating_sub(1));
        for (i, message) in run.request.messages.iter().enumerate() {
            run.typed[i] = if i < run.current {
                message.clone()
            } else {
                String::new()
            };
        }
        run.revealed = 0;

        let has_text = run
            .request
            .messages
            .get(run.current)
            .is_some_and(|m| !m.is_empty());
        if has_text {
            run.typing_timer = Some(self.timers.schedule_every(
                at.saturating_add(interval),
                interval,
                SequencerEvent::TypeChar,
            ));
        }
    }

    fn reveal_char(&mut self) {
        let SequencerState::Running(run) = &mut self.state else {
            return;
        };
        let Some(message) = run.request.messages.get(run.current) else {
            return;
        };

        run.revealed = run.revealed.saturating_add(1);
        run.typed[run.current] = message.chars().take(run.revealed).collect();

        if run.revealed >= message.chars().count() {
            if let Some(timer) = run.typing_timer.take() {
                self.timers.cancel(timer);
            }
        }
    }

    // =========================================================================
    // VIEW
    // =========================================================================

    /// Index of the message currently being typed.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.running().map(|run| run.current)
    }

    /// Typed prefix of every message (empty slice when idle).
    #[must_use]
    pub fn typed(&self) -> &[String] {
        self.running().map(|run| run.typed.as_slice()).unwrap_or(&[])
    }

    /// Id of the live request.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.running().map(|run| run.request.id.as_str())
    }

    /// Headline of the live request.
    #[must_use]
    pub fn lead(&self) -> Option<&str> {
        self.running().and_then(|run| run.request.lead.as_deref())
    }

    /// Origin stage of the live request.
    #[must_use]
    pub fn origin_stage(&self) -> Option<TopStage> {
        self.running().map(|run| run.request.origin_stage)
    }

    /// Destination of the live request.
    #[must_use]
    pub fn next_stage(&self) -> Option<TopStage> {
        self.running().map(|run| run.request.next_stage)
    }

    /// Rows revealed so far, up to and including the current message.
    #[must_use]
    pub fn rows(&self) -> Vec<TransitionRow> {
        let Some(run) = self.running() else {
            return Vec::new();
        };
        let visible = run.request.messages.len().min(run.current.saturating_add(1));

        (0..visible)
            .map(|index| {
                let message = &run.request.messages[index];
                let text = if index < run.current {
                    message.clone()
                } else {
                    run.typed[index].clone()
                };
                let is_complete =
                    index < run.current || text.chars().count() >= message.chars().count();
                TransitionRow {
                    label: format!("{:02}", index.saturating_add(1)),
                    text,
                    is_current: index.saturating_add(1) == visible,
                    is_complete,
                }
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn request(messages: &[&str], next: TopStage) -> TransitionRequest {
        TransitionRequest::new("test", TopStage::Form, messages.iter().copied(), next)
    }

    #[test]
    fn offsets_are_cumulative() {
        let timing = TransitionTiming::default();
        let offsets = message_start_offsets(&["Hi", "Bye", "x"], &timing);
        assert_eq!(offsets, vec![0, 592, 592 + 3 * 26 + 540]);
        assert_eq!(completion_offset(&["Hi", "Bye"], &timing), 592 + 3 * 26 + 540 + 700);
    }

    #[test]
    fn empty_message_list_only_waits_pause_and_pad() {
        let timing = TransitionTiming::default();
        let none: [&str; 0] = [];
        assert_eq!(completion_offset(&none, &timing), 540 + 700);
    }

    #[test]
    fn characters_are_revealed_at_type_interval() {
        let mut seq = TransitionSequencer::default();
        let mut stage = TopStage::Story;
        assert!(seq.begin(request(&["Hi", "Bye"], TopStage::Journey), &mut stage, 1000));
        assert_eq!(stage, TopStage::Transition);
        assert_eq!(seq.typed(), ["", ""]);

        seq.poll(1025, &mut stage);
        assert_eq!(seq.typed()[0], "");
        seq.poll(1026, &mut stage);
        assert_eq!(seq.typed()[0], "H");
        seq.poll(1052, &mut stage);
        assert_eq!(seq.typed()[0], "Hi");

        // typing timer stopped; next deadline is message 2's start
        assert_eq!(seq.next_deadline(), Some(1592));
        seq.poll(1592, &mut stage);
        assert_eq!(seq.current_index(), Some(1));
        assert_eq!(seq.typed(), ["Hi", ""]);
        seq.poll(1592 + 26, &mut stage);
        assert_eq!(seq.typed()[1], "B");
    }

    #[test]
    fn completion_switches_stage_then_calls_back_once() {
        let calls = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&calls);
        let mut seq = TransitionSequencer::default();
        let mut stage = TopStage::Form;
        let req = request(&["Hi", "Bye"], TopStage::Passport).on_complete(move || {
            seen.set(seen.get() + 1);
        });

        assert!(seq.begin(req, &mut stage, 0));
        seq.poll(1909, &mut stage);
        assert_eq!(stage, TopStage::Transition);
        assert_eq!(calls.get(), 0);

        seq.poll(1910, &mut stage);
        assert_eq!(stage, TopStage::Passport);
        assert_eq!(calls.get(), 1);
        assert!(!seq.is_running());
        assert_eq!(seq.next_deadline(), None);

        seq.poll(10_000, &mut stage);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn second_begin_is_ignored() {
        let mut seq = TransitionSequencer::default();
        let mut stage = TopStage::Story;
        assert!(seq.begin(request(&["a"], TopStage::Journey), &mut stage, 0));
        assert!(!seq.begin(request(&["b"], TopStage::Passport), &mut stage, 1));
        seq.poll(100_000, &mut stage);
        assert_eq!(stage, TopStage::Journey);
    }

    #[test]
    fn begin_rejected_while_outer_stage_is_transition() {
        let mut seq = TransitionSequencer::default();
        let mut stage = TopStage::Transition;
        assert!(!seq.begin(request(&["a"], TopStage::Journey), &mut stage, 0));
        assert!(!seq.is_running());
    }

    #[test]
    fn cancel_keeps_stage_and_skips_callback() {
        let calls = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&calls);
        let mut seq = TransitionSequencer::default();
        let mut stage = TopStage::Story;
        let req = request(&["abc"], TopStage::Journey).on_complete(move || seen.set(1));

        seq.begin(req, &mut stage, 0);
        seq.poll(30, &mut stage);
        seq.cancel();
        seq.poll(100_000, &mut stage);

        assert_eq!(stage, TopStage::Transition);
        assert_eq!(calls.get(), 0);
        assert!(!seq.is_running());
    }

    #[test]
    fn without_timers_completes_synchronously() {
        let calls = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&calls);
        let timing = TransitionTiming {
            support: TimerSupport::Unavailable,
            ..TransitionTiming::default()
        };
        let mut seq = TransitionSequencer::new(timing);
        let mut stage = TopStage::Form;
        let req = request(&["Hi"], TopStage::Passport).on_complete(move || seen.set(1));

        assert!(seq.begin(req, &mut stage, 0));
        assert_eq!(stage, TopStage::Passport);
        assert_eq!(calls.get(), 1);
        assert!(!seq.is_running());
        assert_eq!(seq.next_deadline(), None);
    }

    #[test]
    fn rows_show_revealed_messages_only() {
        let mut seq = TransitionSequencer::default();
        let mut stage = TopStage::Story;
        seq.begin(
            request(&["Hi", "Bye"], TopStage::Journey).with_lead("Syncing"),
            &mut stage,
            0,
        );
        assert_eq!(seq.lead(), Some("Syncing"));
        seq.poll(52, &mut stage);

        let rows = seq.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "01");
        assert!(rows[0].is_current && rows[0].is_complete);

        seq.poll(600, &mut stage);
        let rows = seq.rows();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_complete && !rows[0].is_current);
        assert_eq!(rows[1].text, "");
        assert!(!rows[1].is_complete);
    }

    #[test]
    fn multibyte_messages_count_characters() {
        let timing = TransitionTiming::default();
        assert_eq!(message_start_offsets(&["…a", "b"], &timing)[1], 2 * 26 + 540);
    }
}
