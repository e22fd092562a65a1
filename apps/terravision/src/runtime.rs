//! # Real-Time Driver
//!
//! Turns wall-clock time into the millisecond instants the core expects.
//!
//! The core is single-threaded (`Rc`), so the driver never spawns: it polls
//! the target on the current task and sleeps until the next deadline, or
//! until Ctrl+C.

use std::io::Write;
use std::time::Duration;
use terravision_core::{Clocked, JourneyMachine, Millis, Shell, StageId, TopStage};
use tokio::time::Instant;

/// Wall clock anchored at driver creation.
#[derive(Debug, Clone, Copy)]
pub struct Driver {
    origin: Instant,
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds since the driver started.
    #[must_use]
    pub fn now(&self) -> Millis {
        Millis::try_from(self.origin.elapsed().as_millis()).unwrap_or(Millis::MAX)
    }

    /// Poll `target` until `done` holds or it has nothing left to do.
    ///
    /// `render` sees the target after every poll. Returns `false` if the
    /// run was interrupted.
    pub async fn run_until<C, R, D>(&self, target: &mut C, mut render: R, mut done: D) -> bool
    where
        C: Clocked,
        R: FnMut(&C),
        D: FnMut(&C) -> bool,
    {
        loop {
            target.poll(self.now());
            render(target);
            if done(target) {
                return true;
            }
            let Some(deadline) = target.next_deadline() else {
                return true;
            };

            let wake = self.origin + Duration::from_millis(deadline);
            tokio::select! {
                _ = tokio::time::sleep_until(wake) => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::warn!("interrupted");
                    return false;
                }
            }
        }
    }

    /// Drive the shell until it leaves `transition`, rendering the typed feed.
    pub async fn run_transition(&self, shell: &mut Shell, quiet: bool) -> bool {
        let mut transcript = Transcript::default();
        self.run_until(
            shell,
            |s| {
                if !quiet {
                    transcript.render(s);
                }
            },
            |s| s.stage() != TopStage::Transition,
        )
        .await
    }

    /// Drive the mounted journey until its countdown and companion feed
    /// settle. Intro cues do not hold the driver.
    pub async fn settle_journey(&self, shell: &mut Shell, quiet: bool) -> bool {
        let mut last_countdown = None;
        let mut feed_seen = 0;
        self.run_until(
            shell,
            |s| {
                let Some(journey) = s.journey() else {
                    return;
                };
                if quiet {
                    return;
                }
                let countdown = journey.state().countdown;
                if countdown.is_some() && countdown != last_countdown {
                    if let Some(n) = countdown {
                        println!("  ... {}", n);
                    }
                }
                last_countdown = countdown;

                let feed = journey.ai_feed();
                if feed.len() < feed_seen {
                    feed_seen = 0;
                }
                for line in &feed[feed_seen..] {
                    println!("  > {}", line);
                }
                feed_seen = feed.len();
            },
            |s| s.journey().is_none_or(journey_settled),
        )
        .await
    }
}

fn journey_settled(journey: &JourneyMachine) -> bool {
    if journey.state().countdown.is_some() {
        return false;
    }
    journey.stage() != StageId::AiGuide || journey.next_deadline().is_none()
}

// =============================================================================
// TRANSCRIPT
// =============================================================================

/// Prints the transition feed incrementally as characters appear.
#[derive(Debug, Default)]
struct Transcript {
    lead_shown: bool,
    printed: Vec<usize>,
}

impl Transcript {
    fn render(&mut self, shell: &Shell) {
        let sequencer = shell.sequencer();
        if !sequencer.is_running() {
            if self.printed.last().is_some() {
                println!();
                self.printed.clear();
            }
            return;
        }

        if !self.lead_shown {
            if let Some(lead) = sequencer.lead() {
                println!("{}", lead);
            }
            self.lead_shown = true;
        }

        for (index, row) in sequencer.rows().iter().enumerate() {
            if index >= self.printed.len() {
                if !self.printed.is_empty() {
                    println!();
                }
                print!("  {}  ", row.label);
                self.printed.push(0);
            }
            let Some(done) = self.printed.get_mut(index) else {
                continue;
            };
            let fresh: String = row.text.chars().skip(*done).collect();
            if !fresh.is_empty() {
                print!("{}", fresh);
                *done = row.text.chars().count();
            }
        }
        if let Err(e) = std::io::stdout().flush() {
            tracing::debug!(error = %e, "stdout flush failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use terravision_core::primitives::{JOURNEY_KEY, PASSPORT_KEY};
    use terravision_core::{
        JourneyTiming, LocalTime, MemoryStore, ShellConfig, TimerSupport, TransitionTiming,
    };

    fn fast_shell() -> Shell {
        let config = ShellConfig {
            transition: TransitionTiming {
                type_interval_ms: 1,
                message_pause_ms: 1,
                completion_pad_ms: 1,
                support: TimerSupport::Available,
            },
            journey: JourneyTiming::default(),
            local_time: LocalTime::new(8, 0),
        };
        let mut shell = Shell::new(
            config,
            Rc::new(MemoryStore::new(JOURNEY_KEY)),
            Rc::new(MemoryStore::new(PASSPORT_KEY)),
        );
        shell.boot(0);
        shell
    }

    #[test]
    fn transcript_follows_rows_and_resets_after_completion() {
        let mut shell = fast_shell();
        shell.submit_passport("Ada", "1990-05-17", 0).expect("issue");
        assert_eq!(shell.stage(), TopStage::Transition);

        let mut transcript = Transcript::default();
        let mut widest = 0;
        while let Some(deadline) = shell.next_deadline() {
            shell.poll(deadline);
            transcript.render(&shell);
            widest = widest.max(transcript.printed.len());
        }

        assert_eq!(shell.stage(), TopStage::Passport);
        assert!(transcript.lead_shown);
        assert!(widest > 1);
        assert!(transcript.printed.is_empty());
    }

    #[tokio::test]
    async fn run_transition_reaches_the_next_stage() {
        let mut shell = fast_shell();
        let driver = Driver::new();
        shell.submit_passport("Lin", "1988-11-03", driver.now()).expect("issue");
        assert!(driver.run_transition(&mut shell, false).await);
        assert_eq!(shell.stage(), TopStage::Passport);
    }
}
