//! # Journey Machine
//!
//! Owns the journey state, its timers, and the write-back to the snapshot
//! store.
//!
//! ## Persistence
//!
//! Every state-affecting operation writes the complete resulting snapshot
//! before it returns. Writes pass through the hydration gate on the shared
//! context: while the gate is closed only forced writes go through (the
//! initial snapshot, `restart`, `flush`).
//!
//! ## Time
//!
//! Operations that start timers anchor them at the machine's clock, which is
//! the latest instant seen by `poll`, `launch` or `confirm`. Timers re-armed
//! from a timer handler are anchored at the instant that handler was due.

use super::narrative::{NarrativeCue, intro_narratives};
use super::snapshot::{JourneySnapshot, hydrate};
use super::state::{JourneyField, JourneyState, cleared_on_retreat_into};
use super::view::{self, JourneyView};
use super::{Cue, JourneyMount, JourneyTiming};
use crate::catalog;
use crate::context::ContextRef;
use crate::primitives::{COUNTDOWN_START, MINI_NODE_COUNT};
use crate::storage::SharedStore;
use crate::timer::{Clocked, TimerId, TimerSet};
use crate::{Focus, Habitat, Millis, Profile, StageId, Stamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JourneyEvent {
    CountdownTick,
    AiLine,
    IntroCue,
}

/// The seven-stage journey machine.
pub struct JourneyMachine {
    state: JourneyState,
    profile: Option<Profile>,
    mission_key: String,
    timing: JourneyTiming,
    context: ContextRef,
    store: SharedStore,
    timers: TimerSet<JourneyEvent>,
    countdown_timer: Option<TimerId>,
    ai_timer: Option<TimerId>,
    intro_timer: Option<TimerId>,
    ai_feed: Vec<String>,
    intro: Vec<NarrativeCue>,
    intro_index: usize,
    cues: Vec<Cue>,
    clock: Millis,
}

impl std::fmt::Debug for JourneyMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JourneyMachine")
            .field("state", &self.state)
            .field("mission_key", &self.mission_key)
            .field("hydrated", &self.context.is_hydrated())
            .field("pending_timers", &self.timers.len())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl JourneyMachine {
    /// Build an unhydrated machine. The persistence gate is closed until
    /// [`hydrate`](Self::hydrate) runs.
    #[must_use]
    pub fn new(mount: JourneyMount, now: Millis) -> Self {
        mount.context.close_gate();
        let traveler = traveler_name(mount.profile.as_ref());
        let intro = intro_narratives(mount.local_time, &traveler);

        Self {
            state: JourneyState::initial(),
            profile: mount.profile,
            mission_key: mount.mission_key,
            timing: mount.timing,
            context: mount.context,
            store: mount.store,
            timers: TimerSet::new(),
            countdown_timer: None,
            ai_timer: None,
            intro_timer: None,
            ai_feed: Vec::new(),
            intro,
            intro_index: 0,
            cues: Vec::new(),
            clock: now,
        }
    }

    /// Build and hydrate in one step.
    #[must_use]
    pub fn mount(mount: JourneyMount, now: Millis) -> Self {
        let mut machine = Self::new(mount, now);
        machine.hydrate();
        machine
    }

    /// Read the store once and open the persistence gate.
    ///
    /// Without a stored snapshot the initial snapshot is written immediately.
    /// Returns `false` if the gate was already open.
    pub fn hydrate(&mut self) -> bool {
        if self.context.is_hydrated() {
            return false;
        }

        match self.store.read_snapshot() {
            None => {
                self.context.open_gate();
                self.persist(true);
                tracing::info!("no stored journey, initial snapshot written");
            }
            Some(stored) => {
                let hydrated = hydrate(&stored);
                self.state = hydrated.state;
                self.context.open_gate();
                tracing::info!(
                    stage = self.state.stage.as_str(),
                    rejected = hydrated.rejected.len(),
                    "journey hydrated"
                );
                if hydrated.ambient_on && self.context.set_ambient(true) {
                    self.persist(false);
                }
            }
        }

        self.enter_stage();
        true
    }

    // =========================================================================
    // PROGRESSION
    // =========================================================================

    /// Stamp the current stage and move to the next one.
    ///
    /// A no-op at the terminal stage.
    pub fn advance(&mut self, detail: impl Into<String>) -> bool {
        let current = self.state.stage;
        let Some(next) = current.next() else {
            tracing::debug!("advance ignored at terminal stage");
            return false;
        };

        self.state.record_stamp(Stamp::for_stage(current, detail));
        self.cancel_countdown();
        self.state.stage = next;
        self.cues.push(Cue::StageAdvance);
        tracing::info!(from = current.as_str(), to = next.as_str(), "journey advanced");

        self.persist(false);
        self.enter_stage();
        true
    }

    /// Step back one stage, un-committing it and invalidating everything
    /// chosen at or after it.
    pub fn retreat(&mut self) -> bool {
        let Some(target) = self.state.stage.previous() else {
            tracing::debug!("retreat ignored at first stage");
            return false;
        };

        self.state.remove_stamp(target);
        let cleared = cleared_on_retreat_into(target);
        self.state.clear_all(cleared);
        if cleared.contains(&JourneyField::Countdown) {
            self.cancel_countdown();
        }
        let from = self.state.stage;
        self.state.stage = target;
        self.cues.push(Cue::StepBack);
        tracing::info!(from = from.as_str(), to = target.as_str(), cleared = cleared.len(), "journey retreated");

        self.persist(false);
        self.enter_stage();
        true
    }

    /// Reset everything and return to the first stage with the intro shown.
    pub fn restart(&mut self) {
        self.timers.cancel_all();
        self.countdown_timer = None;
        self.ai_timer = None;
        self.intro_timer = None;
        self.ai_feed.clear();
        self.intro_index = 0;
        self.state = JourneyState::initial();
        self.cues.push(Cue::StageAdvance);
        tracing::info!("journey restarted");

        self.persist(true);
        self.enter_stage();
    }

    /// Advance if the current stage's precondition holds.
    ///
    /// At `launch` this starts the countdown instead.
    pub fn confirm(&mut self, now: Millis) -> bool {
        self.clock = self.clock.max(now);
        if self.state.stage == StageId::Launch {
            return self.launch(now);
        }
        match self.advance_detail() {
            Some(detail) => self.advance(detail),
            None => false,
        }
    }

    fn advance_detail(&self) -> Option<String> {
        let state = &self.state;
        match state.stage {
            StageId::Launch | StageId::Legacy => None,
            StageId::AiGuide => state
                .ai_focus
                .map(|f| format!("AI companion tuned to {} horizons.", f.as_str())),
            StageId::Colony => state.habitat.map(|h| {
                format!("Settled within the {} habitat.", h.as_str().to_uppercase())
            }),
            StageId::Purpose => state
                .mini_complete
                .then(|| format!("{} certification locked.", self.future_role())),
            StageId::Crisis => state
                .crisis_choice
                .as_ref()
                .map(|c| format!("Crisis resolved via {}.", c.label)),
            StageId::Vision => state
                .timeline
                .as_ref()
                .map(|t| format!("A glimpse into {}.", t.id)),
        }
    }

    /// Whether the forward action is enabled.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        match self.state.stage {
            StageId::Launch => self.state.selected_seat.is_some() && self.state.countdown.is_none(),
            _ => self.advance_detail().is_some(),
        }
    }

    #[must_use]
    pub fn can_retreat(&self) -> bool {
        self.state.stage.index() > 0
    }

    // =========================================================================
    // LAUNCH COUNTDOWN
    // =========================================================================

    /// Start the 3-2-1 countdown. Needs a seat and no running countdown.
    pub fn launch(&mut self, now: Millis) -> bool {
        self.clock = self.clock.max(now);
        if self.state.stage != StageId::Launch
            || self.state.selected_seat.is_none()
            || self.state.countdown.is_some()
        {
            return false;
        }

        self.cues.push(Cue::Ignition);
        if !self.timing.support.is_available() {
            return self.finish_launch();
        }

        let tick = self.timing.countdown_tick_ms;
        self.state.countdown = Some(COUNTDOWN_START);
        self.countdown_timer = Some(self.timers.schedule_every(
            self.clock.saturating_add(tick),
            tick,
            JourneyEvent::CountdownTick,
        ));
        tracing::debug!(seat = ?self.state.selected_seat, "countdown started");
        true
    }

    fn on_countdown_tick(&mut self) {
        let Some(current) = self.state.countdown else {
            self.cancel_countdown();
            return;
        };
        let remaining = current.saturating_sub(1);
        if remaining == 0 {
            self.cancel_countdown();
            self.finish_launch();
        } else {
            self.state.countdown = Some(remaining);
        }
    }

    fn finish_launch(&mut self) -> bool {
        let seat = self.state.selected_seat.clone().unwrap_or_default();
        self.advance(format!("Launch initiated from seat {}.", seat))
    }

    fn cancel_countdown(&mut self) {
        if let Some(timer) = self.countdown_timer.take() {
            self.timers.cancel(timer);
        }
        self.state.countdown = None;
    }

    // =========================================================================
    // SELECTIONS
    // =========================================================================

    /// Choose a launch seat. Only at `launch` and before ignition.
    pub fn select_seat(&mut self, id: &str) -> bool {
        if self.state.stage != StageId::Launch || self.state.countdown.is_some() {
            return false;
        }
        let Some(seat) = catalog::seat(id) else {
            return false;
        };
        if self.state.selected_seat.as_deref() != Some(seat.id) {
            self.state.selected_seat = Some(seat.id.to_string());
            self.cues.push(Cue::Selection);
        }
        self.persist(false);
        true
    }

    /// Choose the AI focus. A new focus resets the puzzle.
    pub fn select_focus(&mut self, id: &str) -> bool {
        if self.state.stage != StageId::AiGuide {
            return false;
        }
        let Some(focus) = Focus::parse(id) else {
            return false;
        };
        if self.state.ai_focus != Some(focus) {
            self.state.ai_focus = Some(focus);
            self.state.clear(JourneyField::MiniNodes);
            self.state.recompute_mini_complete();
            self.cues.push(Cue::Selection);
        }
        self.persist(false);
        true
    }

    pub fn select_habitat(&mut self, id: &str) -> bool {
        if self.state.stage != StageId::Colony {
            return false;
        }
        let Some(habitat) = Habitat::parse(id) else {
            return false;
        };
        if self.state.habitat != Some(habitat) {
            self.state.habitat = Some(habitat);
            self.cues.push(Cue::Selection);
        }
        self.persist(false);
        true
    }

    /// Choose a response from the crisis script of the current focus.
    pub fn select_crisis(&mut self, id: &str) -> bool {
        if self.state.stage != StageId::Crisis {
            return false;
        }
        let id = id.trim();
        let script = catalog::crisis_script(self.state.ai_focus);
        let Some(entry) = script.options.iter().find(|o| o.id == id) else {
            return false;
        };
        if self.state.crisis_choice.as_ref().map(|c| c.id.as_str()) != Some(entry.id) {
            self.state.crisis_choice = Some(entry.to_option());
            self.cues.push(Cue::Selection);
        }
        self.persist(false);
        true
    }

    pub fn select_timeline(&mut self, id: &str) -> bool {
        if self.state.stage != StageId::Vision {
            return false;
        }
        let Some(entry) = catalog::timeline(id) else {
            return false;
        };
        if self.state.timeline.as_ref().map(|t| t.id.as_str()) != Some(entry.id) {
            self.state.timeline = Some(entry.to_option());
            self.cues.push(Cue::Selection);
        }
        self.persist(false);
        true
    }

    /// Flip one puzzle node and recompute the solved flag.
    pub fn toggle_mini_node(&mut self, index: usize) -> bool {
        if index >= MINI_NODE_COUNT {
            return false;
        }
        self.state.mini_nodes[index] = !self.state.mini_nodes[index];
        self.state.recompute_mini_complete();
        self.cues.push(Cue::Selection);
        tracing::debug!(
            nodes = ?self.state.mini_nodes,
            solved = self.state.mini_complete,
            "puzzle node toggled"
        );
        self.persist(false);
        true
    }

    // =========================================================================
    // AI COMPANION FEED
    // =========================================================================

    fn start_ai_feed(&mut self) {
        self.stop_ai_feed();
        let lines = catalog::ai_boot_lines(&self.traveler());
        if self.timing.support.is_available() {
            self.ai_feed.push(lines[0].clone());
            self.ai_timer = Some(self.timers.schedule_at(
                self.clock.saturating_add(self.timing.ai_line_ms),
                JourneyEvent::AiLine,
            ));
        } else {
            self.ai_feed.extend(lines);
        }
    }

    fn on_ai_line(&mut self) {
        self.ai_timer = None;
        let lines = catalog::ai_boot_lines(&self.traveler());
        let Some(line) = lines.get(self.ai_feed.len()) else {
            return;
        };
        self.ai_feed.push(line.clone());
        if self.ai_feed.len() < lines.len() {
            self.ai_timer = Some(self.timers.schedule_at(
                self.clock.saturating_add(self.timing.ai_line_ms),
                JourneyEvent::AiLine,
            ));
        }
    }

    fn stop_ai_feed(&mut self) {
        if let Some(timer) = self.ai_timer.take() {
            self.timers.cancel(timer);
        }
        self.ai_feed.clear();
    }

    // =========================================================================
    // INTRO NARRATIVE
    // =========================================================================

    /// Whether the intro narrative is showing.
    #[must_use]
    pub fn intro_active(&self) -> bool {
        self.state.stage == StageId::Launch && !self.state.intro_dismissed && !self.intro.is_empty()
    }

    /// Dismiss the intro narrative.
    pub fn begin_journey(&mut self) -> bool {
        if self.state.intro_dismissed {
            return false;
        }
        if let Some(timer) = self.intro_timer.take() {
            self.timers.cancel(timer);
        }
        self.state.intro_dismissed = true;
        tracing::debug!("intro dismissed");
        self.persist(false);
        true
    }

    fn schedule_intro_cue(&mut self) {
        if !self.timing.support.is_available() {
            return;
        }
        let last = self.intro.len().saturating_sub(1);
        let Some(cue) = self.intro.get(self.intro_index.min(last)) else {
            return;
        };
        let hold = cue.hold_ms(self.timing.min_cue_ms);
        self.intro_timer = Some(
            self.timers
                .schedule_at(self.clock.saturating_add(hold), JourneyEvent::IntroCue),
        );
    }

    fn on_intro_cue(&mut self) {
        self.intro_timer = None;
        if !self.intro_active() {
            return;
        }
        if self.intro_index.saturating_add(1) >= self.intro.len() {
            self.begin_journey();
        } else {
            self.intro_index += 1;
            self.schedule_intro_cue();
        }
    }

    /// Start or stop the per-stage timers after the stage changed.
    fn enter_stage(&mut self) {
        if self.state.stage == StageId::AiGuide {
            if self.ai_feed.is_empty() {
                self.start_ai_feed();
            }
        } else {
            self.stop_ai_feed();
        }

        if self.intro_active() {
            if self.intro_timer.is_none() {
                self.schedule_intro_cue();
            }
        } else if let Some(timer) = self.intro_timer.take() {
            self.timers.cancel(timer);
        }
    }

    // =========================================================================
    // PERSISTENCE & LIFECYCLE
    // =========================================================================

    fn persist(&self, force: bool) {
        if !force && !self.context.is_hydrated() {
            tracing::debug!("journey not hydrated, write suppressed");
            return;
        }
        let snapshot = JourneySnapshot::capture(&self.state, self.context.ambient_on());
        self.store.write_snapshot(&snapshot.to_value());
    }

    /// Propagate the shared ambient flag into the stored snapshot.
    pub fn sync_ambient(&mut self) {
        self.persist(false);
    }

    /// Forced write of the current state (page unload).
    pub fn flush(&self) {
        self.persist(true);
    }

    /// Cancel every timer and close the persistence gate. Writes nothing.
    pub fn unmount(mut self) {
        self.timers.cancel_all();
        self.context.close_gate();
        tracing::debug!(stage = self.state.stage.as_str(), "journey unmounted");
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn state(&self) -> &JourneyState {
        &self.state
    }

    #[must_use]
    pub fn stage(&self) -> StageId {
        self.state.stage
    }

    /// The snapshot that the next write would store.
    #[must_use]
    pub fn snapshot(&self) -> JourneySnapshot {
        JourneySnapshot::capture(&self.state, self.context.ambient_on())
    }

    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    #[must_use]
    pub fn mission_key(&self) -> &str {
        &self.mission_key
    }

    /// Display name of the traveler ("Traveler" without a profile).
    #[must_use]
    pub fn traveler(&self) -> String {
        traveler_name(self.profile.as_ref())
    }

    /// Derived role, recomputed on every call.
    #[must_use]
    pub fn future_role(&self) -> &'static str {
        catalog::future_role(&self.mission_key, self.state.ai_focus, self.state.habitat)
    }

    /// AI companion lines revealed so far.
    #[must_use]
    pub fn ai_feed(&self) -> &[String] {
        &self.ai_feed
    }

    /// The intro cue on screen, if the intro is active.
    #[must_use]
    pub fn intro_cue(&self) -> Option<(usize, &NarrativeCue)> {
        if !self.intro_active() {
            return None;
        }
        let index = self.intro_index.min(self.intro.len().saturating_sub(1));
        self.intro.get(index).map(|cue| (index, cue))
    }

    #[must_use]
    pub fn intro_len(&self) -> usize {
        self.intro.len()
    }

    #[must_use]
    pub fn ambient_on(&self) -> bool {
        self.context.ambient_on()
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.context.is_hydrated()
    }

    /// Take every cue emitted since the last call.
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// Read model for the presentation layer.
    #[must_use]
    pub fn view(&self) -> JourneyView {
        view::build(self)
    }
}

impl Clocked for JourneyMachine {
    fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_due()
    }

    fn poll(&mut self, now: Millis) {
        let latest = self.clock.max(now);
        while let Some((fired_at, event)) = self.timers.pop_due(now) {
            self.clock = fired_at;
            match event {
                JourneyEvent::CountdownTick => self.on_countdown_tick(),
                JourneyEvent::AiLine => self.on_ai_line(),
                JourneyEvent::IntroCue => self.on_intro_cue(),
            }
        }
        self.clock = latest;
    }
}

fn traveler_name(profile: Option<&Profile>) -> String {
    match profile.map(|p| p.name.trim()) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "Traveler".to_string(),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SharedContext;
    use crate::journey::LocalTime;
    use crate::primitives::{JOURNEY_KEY, MINI_NODES_BASELINE};
    use crate::storage::{MemoryStore, SnapshotStore};
    use crate::timer::TimerSupport;
    use serde_json::json;
    use std::rc::Rc;

    fn mount_with(store: Rc<MemoryStore>, support: TimerSupport) -> (JourneyMachine, ContextRef) {
        let context = SharedContext::new(false);
        let machine = JourneyMachine::mount(
            JourneyMount {
                profile: None,
                mission_key: "solar-architect".into(),
                local_time: LocalTime::new(9, 30),
                timing: JourneyTiming {
                    support,
                    ..JourneyTiming::default()
                },
                context: Rc::clone(&context),
                store,
            },
            0,
        );
        (machine, context)
    }

    #[test]
    fn first_mount_writes_initial_snapshot() {
        let store = Rc::new(MemoryStore::new(JOURNEY_KEY));
        let (machine, _) = mount_with(Rc::clone(&store), TimerSupport::Available);
        assert_eq!(store.write_count(), 1);
        let stored = store.read_snapshot().expect("snapshot");
        assert_eq!(stored["stageIndex"], 0);
        assert!(machine.intro_active());
    }

    #[test]
    fn countdown_advances_after_three_ticks() {
        let store = Rc::new(MemoryStore::new(JOURNEY_KEY));
        let (mut machine, _) = mount_with(store, TimerSupport::Available);
        machine.begin_journey();

        assert!(!machine.launch(0));
        assert!(!machine.select_seat("Z9"));
        assert_eq!(machine.state().selected_seat, None);
        assert!(machine.select_seat("B4"));
        assert!(machine.launch(100));
        assert_eq!(machine.state().countdown, Some(3));
        assert!(!machine.select_seat("A1"));

        machine.poll(1000);
        assert_eq!(machine.state().countdown, Some(2));
        machine.poll(1900);
        assert_eq!(machine.state().countdown, Some(1));
        machine.poll(2799);
        assert_eq!(machine.stage(), StageId::Launch);
        machine.poll(2800);
        assert_eq!(machine.stage(), StageId::AiGuide);
        assert_eq!(machine.state().stamps[0].detail, "Launch initiated from seat B4.");
        assert_eq!(machine.ai_feed().len(), 1);
    }

    #[test]
    fn ai_feed_reveals_lines_every_interval() {
        let store = Rc::new(MemoryStore::new(JOURNEY_KEY));
        store.set_raw(json!({"stageIndex": 1}).to_string());
        let (mut machine, _) = mount_with(store, TimerSupport::Available);
        assert_eq!(machine.ai_feed().len(), 1);
        machine.poll(1200);
        assert_eq!(machine.ai_feed().len(), 2);
        machine.poll(5000);
        assert_eq!(machine.ai_feed().len(), 3);
        assert!(machine.ai_feed()[1].contains("Welcome, Traveler."));
        assert_eq!(machine.next_deadline(), None);
    }

    #[test]
    fn without_timers_launch_and_feed_are_immediate() {
        let store = Rc::new(MemoryStore::new(JOURNEY_KEY));
        let (mut machine, _) = mount_with(store, TimerSupport::Unavailable);
        machine.select_seat("D5");
        assert!(machine.confirm(0));
        assert_eq!(machine.stage(), StageId::AiGuide);
        assert_eq!(machine.ai_feed().len(), 3);
    }

    #[test]
    fn intro_cycles_then_dismisses() {
        let store = Rc::new(MemoryStore::new(JOURNEY_KEY));
        let (mut machine, _) = mount_with(Rc::clone(&store), TimerSupport::Available);
        let (index, _) = machine.intro_cue().expect("intro");
        assert_eq!(index, 0);

        machine.poll(3400);
        assert_eq!(machine.intro_cue().map(|(i, _)| i), Some(1));
        machine.poll(1_000_000);
        assert!(!machine.intro_active());
        assert_eq!(store.read_snapshot().expect("stored")["introDismissed"], true);
    }

    #[test]
    fn confirm_requires_stage_precondition() {
        let store = Rc::new(MemoryStore::new(JOURNEY_KEY));
        store.set_raw(json!({"stageIndex": 3, "aiFocus": "eco"}).to_string());
        let (mut machine, _) = mount_with(store, TimerSupport::Available);

        assert!(!machine.can_advance());
        assert!(!machine.confirm(0));
        machine.toggle_mini_node(0);
        machine.toggle_mini_node(2);
        assert!(machine.can_advance());
        assert!(machine.confirm(0));
        assert_eq!(machine.stage(), StageId::Crisis);
        assert_eq!(
            machine.state().stamps.last().map(|s| s.detail.as_str()),
            Some("Gaian Systems Designer certification locked.")
        );
    }

    #[test]
    fn new_focus_resets_puzzle() {
        let store = Rc::new(MemoryStore::new(JOURNEY_KEY));
        store.set_raw(json!({"stageIndex": 1}).to_string());
        let (mut machine, _) = mount_with(store, TimerSupport::Available);
        machine.select_focus("eco");
        machine.toggle_mini_node(1);
        assert!(machine.select_focus(" Stellar "));
        assert_eq!(machine.state().ai_focus, Some(Focus::Stellar));
        assert_eq!(machine.state().mini_nodes, MINI_NODES_BASELINE);
        assert!(!machine.select_habitat("ring"));
    }

    #[test]
    fn cues_are_drained() {
        let store = Rc::new(MemoryStore::new(JOURNEY_KEY));
        let (mut machine, _) = mount_with(store, TimerSupport::Available);
        machine.select_seat("A1");
        machine.select_seat("A1");
        machine.launch(0);
        assert_eq!(machine.drain_cues(), vec![Cue::Selection, Cue::Ignition]);
        assert!(machine.drain_cues().is_empty());
    }

    #[test]
    fn unmount_closes_gate_without_writing() {
        let store = Rc::new(MemoryStore::new(JOURNEY_KEY));
        let (mut machine, context) = mount_with(Rc::clone(&store), TimerSupport::Available);
        machine.select_seat("C2");
        let writes = store.write_count();
        machine.unmount();
        assert!(!context.is_hydrated());
        assert_eq!(store.write_count(), writes);
    }
}
