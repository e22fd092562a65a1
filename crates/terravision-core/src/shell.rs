//! # Application Shell
//!
//! The outer application around the two machines. Holds the top-level stage,
//! issues passports, applies the navigation rules, and mounts the journey
//! whenever the top-level stage is `journey`.
//!
//! ## Navigation
//!
//! `nav_select` is ignored while a transition runs, for the current stage,
//! and for stages the traveler may not enter (`form` once a passport exists,
//! everything else before one exists). Entering `journey` from any other
//! stage goes through the journey transition.

use crate::catalog::{
    JOURNEY_TRANSITION_LEAD, JOURNEY_TRANSITION_MESSAGES, MISSIONS, PASSPORT_TRANSITION_LEAD,
    PASSPORT_TRANSITION_MESSAGES,
};
use crate::context::{ContextRef, SharedContext};
use crate::journey::{JourneyMachine, JourneyMount, JourneyTiming, LocalTime};
use crate::passport::{self, PassportRecord};
use crate::storage::SharedStore;
use crate::timer::Clocked;
use crate::transition::{TransitionRequest, TransitionSequencer, TransitionTiming};
use crate::{Millis, NavMode, Profile, TerraError, TopStage};
use std::cell::Cell;
use std::rc::Rc;

/// Host-supplied settings for the shell and the machines it drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShellConfig {
    pub transition: TransitionTiming,
    pub journey: JourneyTiming,
    /// Time of day used to pick the intro narrative.
    pub local_time: LocalTime,
}

/// The outer application.
pub struct Shell {
    stage: TopStage,
    nav_mode: Rc<Cell<NavMode>>,
    profile: Option<Profile>,
    mission_key: String,
    locked: bool,
    sequencer: TransitionSequencer,
    journey: Option<JourneyMachine>,
    context: ContextRef,
    journey_store: SharedStore,
    passport_store: SharedStore,
    config: ShellConfig,
    clock: Millis,
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("stage", &self.stage)
            .field("nav_mode", &self.nav_mode.get())
            .field("locked", &self.locked)
            .field("journey_mounted", &self.journey.is_some())
            .finish_non_exhaustive()
    }
}

impl Shell {
    /// A fresh shell at the passport form.
    #[must_use]
    pub fn new(config: ShellConfig, journey_store: SharedStore, passport_store: SharedStore) -> Self {
        Self {
            stage: TopStage::Form,
            nav_mode: Rc::new(Cell::new(NavMode::Start)),
            profile: None,
            mission_key: MISSIONS[0].key.to_string(),
            locked: false,
            sequencer: TransitionSequencer::new(config.transition),
            journey: None,
            context: SharedContext::new(false),
            journey_store,
            passport_store,
            config,
            clock: 0,
        }
    }

    /// Restore the issued passport and the ambient preference.
    pub fn boot(&mut self, now: Millis) {
        self.clock = now;

        if let Some(record) = self
            .passport_store
            .read_snapshot()
            .as_ref()
            .and_then(PassportRecord::from_value)
        {
            tracing::info!(passport = %record.profile.passport_id, "passport restored");
            self.profile = Some(record.profile);
            self.mission_key = record.mission_key;
            self.locked = true;
            self.nav_mode.set(NavMode::Full);
            self.stage = TopStage::Passport;
        }

        let ambient = self
            .journey_store
            .read_snapshot()
            .and_then(|s| s.get("ambientOn").and_then(serde_json::Value::as_bool))
            .unwrap_or(false);
        if ambient {
            self.context.set_ambient(true);
        }
    }

    // =========================================================================
    // PASSPORT
    // =========================================================================

    /// Issue a passport from the form and start the passport transition.
    pub fn submit_passport(&mut self, name: &str, dob: &str, now: Millis) -> Result<Profile, TerraError> {
        self.clock = self.clock.max(now);
        if self.locked {
            return Err(TerraError::PassportLocked);
        }

        let record = passport::issue(name, dob)?;
        self.passport_store.write_snapshot(&record.to_value());
        self.mission_key = record.mission_key;
        self.profile = Some(record.profile.clone());
        self.locked = true;

        let nav_mode = Rc::clone(&self.nav_mode);
        let request = TransitionRequest::new(
            "passport-sequence",
            TopStage::Form,
            PASSPORT_TRANSITION_MESSAGES,
            TopStage::Passport,
        )
        .with_lead(PASSPORT_TRANSITION_LEAD)
        .on_complete(move || nav_mode.set(NavMode::Full));
        self.begin_transition(request, now);

        Ok(record.profile)
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    /// Start a transition. Ignored while another one is live.
    pub fn begin_transition(&mut self, request: TransitionRequest, now: Millis) -> bool {
        self.clock = self.clock.max(now);
        let started = self.sequencer.begin(request, &mut self.stage, now);
        self.sync_journey_mount();
        started
    }

    /// Passport card "launch" action: on to the story prelude.
    pub fn open_story(&mut self) -> bool {
        if self.stage != TopStage::Passport || self.profile.is_none() {
            return false;
        }
        self.set_stage(TopStage::Story);
        true
    }

    /// Story prelude "continue" action: on to the journey.
    pub fn continue_to_journey(&mut self, now: Millis) -> bool {
        if self.stage != TopStage::Story {
            return false;
        }
        self.begin_transition(journey_request(TopStage::Story), now)
    }

    /// Whether the navigation menu may switch to `target`.
    #[must_use]
    pub fn can_access(&self, target: TopStage) -> bool {
        match target {
            TopStage::Transition => false,
            TopStage::Form => !self.locked,
            _ => self.profile.is_some(),
        }
    }

    /// Navigation menu selection.
    pub fn nav_select(&mut self, target: TopStage, now: Millis) -> bool {
        self.clock = self.clock.max(now);
        if self.stage == TopStage::Transition || target == self.stage || !self.can_access(target) {
            tracing::debug!(requested = %target, stage = %self.stage, "navigation ignored");
            return false;
        }
        if target == TopStage::Journey {
            return self.begin_transition(journey_request(self.stage), now);
        }
        self.set_stage(target);
        true
    }

    /// Entries of the navigation menu.
    #[must_use]
    pub fn nav_items(&self) -> Vec<(TopStage, &'static str)> {
        match self.nav_mode.get() {
            NavMode::Start => vec![(TopStage::Form, "Start")],
            NavMode::Full => vec![
                (TopStage::Passport, "Passport"),
                (TopStage::Story, "Prelude"),
                (TopStage::Journey, "Journey"),
            ],
        }
    }

    /// Entry to highlight: the origin of a running transition, else the stage.
    #[must_use]
    pub fn active_nav_stage(&self) -> TopStage {
        if self.stage == TopStage::Transition {
            return self.sequencer.origin_stage().unwrap_or(self.stage);
        }
        self.stage
    }

    fn set_stage(&mut self, stage: TopStage) {
        tracing::info!(from = %self.stage, to = %stage, "stage switched");
        self.stage = stage;
        self.sync_journey_mount();
    }

    /// Mount the journey on entering `journey`; flush and unmount on leaving.
    fn sync_journey_mount(&mut self) {
        let on_journey = self.stage == TopStage::Journey;
        if on_journey && self.journey.is_none() {
            let mount = JourneyMount {
                profile: self.profile.clone(),
                mission_key: self.mission_key.clone(),
                local_time: self.config.local_time,
                timing: self.config.journey,
                context: Rc::clone(&self.context),
                store: Rc::clone(&self.journey_store),
            };
            self.journey = Some(JourneyMachine::mount(mount, self.clock));
        } else if !on_journey {
            if let Some(journey) = self.journey.take() {
                journey.flush();
                journey.unmount();
            }
        }
    }

    // =========================================================================
    // AMBIENT
    // =========================================================================

    /// Flip the ambient flag and let a mounted journey record it.
    pub fn toggle_ambient(&mut self) -> bool {
        let on = !self.context.ambient_on();
        self.set_ambient(on);
        on
    }

    pub fn set_ambient(&mut self, on: bool) {
        if self.context.set_ambient(on) {
            if let Some(journey) = self.journey.as_mut() {
                journey.sync_ambient();
            }
        }
    }

    // =========================================================================
    // LIFECYCLE & ACCESSORS
    // =========================================================================

    /// Page-unload hook: force a write of the mounted journey.
    pub fn flush(&self) {
        if let Some(journey) = &self.journey {
            journey.flush();
        }
    }

    #[must_use]
    pub fn stage(&self) -> TopStage {
        self.stage
    }

    #[must_use]
    pub fn nav_mode(&self) -> NavMode {
        self.nav_mode.get()
    }

    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    #[must_use]
    pub fn mission_key(&self) -> &str {
        &self.mission_key
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn ambient_on(&self) -> bool {
        self.context.ambient_on()
    }

    #[must_use]
    pub fn sequencer(&self) -> &TransitionSequencer {
        &self.sequencer
    }

    #[must_use]
    pub fn journey(&self) -> Option<&JourneyMachine> {
        self.journey.as_ref()
    }

    pub fn journey_mut(&mut self) -> Option<&mut JourneyMachine> {
        self.journey.as_mut()
    }
}

impl Clocked for Shell {
    fn next_deadline(&self) -> Option<Millis> {
        let journey = self.journey.as_ref().and_then(|j| j.next_deadline());
        match (self.sequencer.next_deadline(), journey) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn poll(&mut self, now: Millis) {
        self.clock = self.clock.max(now);
        self.sequencer.poll(now, &mut self.stage);
        self.sync_journey_mount();
        if let Some(journey) = self.journey.as_mut() {
            journey.poll(now);
        }
    }
}

fn journey_request(origin: TopStage) -> TransitionRequest {
    TransitionRequest::new(
        "journey-sequence",
        origin,
        JOURNEY_TRANSITION_MESSAGES,
        TopStage::Journey,
    )
    .with_lead(JOURNEY_TRANSITION_LEAD)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{JOURNEY_KEY, PASSPORT_KEY};
    use crate::storage::{MemoryStore, SnapshotStore};
    use crate::timer::TimerSupport;
    use serde_json::json;

    struct Fixture {
        shell: Shell,
        journey: Rc<MemoryStore>,
        passport: Rc<MemoryStore>,
    }

    fn fixture(support: TimerSupport) -> Fixture {
        let journey = Rc::new(MemoryStore::new(JOURNEY_KEY));
        let passport = Rc::new(MemoryStore::new(PASSPORT_KEY));
        let config = ShellConfig {
            transition: TransitionTiming {
                support,
                ..TransitionTiming::default()
            },
            journey: JourneyTiming {
                support,
                ..JourneyTiming::default()
            },
            local_time: LocalTime::new(18, 45),
        };
        let shell = Shell::new(config, journey.clone(), passport.clone());
        Fixture {
            shell,
            journey,
            passport,
        }
    }

    #[test]
    fn passport_flow_unlocks_full_navigation() {
        let mut f = fixture(TimerSupport::Available);
        f.shell.boot(0);
        assert_eq!(f.shell.nav_items().len(), 1);
        assert!(!f.shell.nav_select(TopStage::Story, 0));

        f.shell.submit_passport("ada", "1990-05-17", 0).expect("issue");
        assert_eq!(f.shell.stage(), TopStage::Transition);
        assert_eq!(f.shell.active_nav_stage(), TopStage::Form);
        assert!(f.passport.read_snapshot().is_some());
        assert!(matches!(
            f.shell.submit_passport("bob", "1990-05-17", 0),
            Err(TerraError::PassportLocked)
        ));

        let done = f.shell.next_deadline().expect("deadline");
        f.shell.poll(done);
        f.shell.poll(60_000);
        assert_eq!(f.shell.stage(), TopStage::Passport);
        assert_eq!(f.shell.nav_mode(), NavMode::Full);
        assert!(!f.shell.nav_select(TopStage::Form, 0));
    }

    #[test]
    fn journey_is_mounted_only_on_journey_stage() {
        let mut f = fixture(TimerSupport::Unavailable);
        f.shell.boot(0);
        f.shell.submit_passport("ada", "1990-05-17", 0).expect("issue");
        assert_eq!(f.shell.stage(), TopStage::Passport);
        assert!(f.shell.open_story());
        assert!(f.shell.continue_to_journey(0));
        assert_eq!(f.shell.stage(), TopStage::Journey);
        assert!(f.shell.journey().is_some_and(|j| j.is_hydrated()));
        assert!(f.journey.read_snapshot().is_some());

        assert!(f.shell.nav_select(TopStage::Passport, 0));
        assert!(f.shell.journey().is_none());
    }

    #[test]
    fn boot_restores_passport_and_ambient() {
        let f = fixture(TimerSupport::Available);
        let record = passport::issue("Lin", "1988-11-03").expect("issue");
        f.passport.write_snapshot(&record.to_value());
        f.journey.write_snapshot(&json!({"ambientOn": true}));

        let mut shell = f.shell;
        shell.boot(0);
        assert_eq!(shell.stage(), TopStage::Passport);
        assert!(shell.is_locked());
        assert!(shell.ambient_on());
        assert_eq!(shell.mission_key(), record.mission_key);
    }

    #[test]
    fn ambient_toggle_reaches_mounted_journey() {
        let mut f = fixture(TimerSupport::Unavailable);
        f.shell.submit_passport("ada", "1990-05-17", 0).expect("issue");
        f.shell.nav_select(TopStage::Journey, 0);
        assert!(f.shell.toggle_ambient());
        assert_eq!(f.journey.read_snapshot().expect("stored")["ambientOn"], true);
    }
}
