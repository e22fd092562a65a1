//! Time-of-day intro narrative shown before the launch stage.

use crate::Millis;
use crate::primitives::{DEFAULT_CUE_MS, MIN_CUE_MS};
use serde::Serialize;

/// Wall-clock time of day supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalTime {
    pub hour: u8,
    pub minute: u8,
}

impl LocalTime {
    #[must_use]
    pub fn new(hour: u8, minute: u8) -> Self {
        Self {
            hour: hour % 24,
            minute: minute % 60,
        }
    }
}

impl std::fmt::Display for LocalTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBand {
    Dawn,
    Day,
    Dusk,
    Night,
}

impl TimeBand {
    #[must_use]
    pub fn from_hour(hour: u8) -> Self {
        match hour {
            5..=11 => TimeBand::Dawn,
            12..=16 => TimeBand::Day,
            17..=20 => TimeBand::Dusk,
            _ => TimeBand::Night,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeBand::Dawn => "dawn",
            TimeBand::Day => "day",
            TimeBand::Dusk => "dusk",
            TimeBand::Night => "night",
        }
    }
}

/// One line of the intro narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeCue {
    pub text: String,
    pub duration_ms: Option<Millis>,
    pub class_name: String,
}

impl NarrativeCue {
    /// How long the cue stays up, never below the floor.
    #[must_use]
    pub fn hold_ms(&self, floor: Millis) -> Millis {
        self.duration_ms.unwrap_or(DEFAULT_CUE_MS).max(floor)
    }
}

/// Hold time with the standard floor.
#[must_use]
pub fn default_hold(cue: &NarrativeCue) -> Millis {
    cue.hold_ms(MIN_CUE_MS)
}

/// Narrative for the given time of day, addressed to `agent`.
///
/// A blank agent name reads as "Traveler".
#[must_use]
pub fn intro_narratives(time: LocalTime, agent: &str) -> Vec<NarrativeCue> {
    let band = TimeBand::from_hour(time.hour);
    let agent = match agent.trim() {
        "" => "Traveler",
        name => name,
    };
    let ignite = format!("It is precisely {}, and the sky is ours to ignite.", time);
    let tasks = format!("Complete the tasks assigned to you, Agent {}.", agent);

    let lines: Vec<(String, Millis)> = match band {
        TimeBand::Dawn => vec![
            ("Welcome to 2050.".to_string(), 3400),
            ("The oceans have boiled into a toxic haze, leaving behind vast, salt-crusted deserts under a sickly sun".to_string(), 8400),
            ("Our world is a graveyard, scarred by cosmic bombardments and stripped bare by solar winds. ".to_string(), 6400),
            ("We exist only in the deep-earth shelters, forgotten by the stars.".to_string(), 6400),
            (ignite, 6400),
            (tasks, 6400),
        ],
        TimeBand::Day => vec![
            ("Welcome to 2050.".to_string(), 3400),
            ("Unshielded from the relentless solar storms, the surface burns beneath a sky now perpetually alight with deadly radiation.".to_string(), 8400),
            ("The asteroid swarm of '48 shattered our atmospheric shield, turning daylight into a weapon.".to_string(), 6400),
            (ignite, 6400),
            (tasks, 6400),
        ],
        TimeBand::Dusk => vec![
            ("Welcome to 2050.".to_string(), 3400),
            ("The horizon glows not with sunset, but with the impact fires of the daily asteroid rain.".to_string(), 5400),
            ("The dead oceans no longer reflect the sky, only absorb the heat of our planet's final, feverish moments.".to_string(), 8400),
            ("The air itself is a monument to our failure.".to_string(), 4400),
            (format!("Current mission clock reads {} hours.", time), 4400),
            (tasks, 4400),
        ],
        TimeBand::Night => vec![
            ("Welcome to 2050.".to_string(), 3400),
            ("The blackness is absolute, broken only by the auroras of solar radiation poisoning our upper atmosphere.".to_string(), 6400),
            ("The silence of the dead seas is deafening, a constant reminder of a world that drowned in fire and stone. ".to_string(), 3400),
            ("There is nothing left to save, only to witness.".to_string(), 3400),
            (ignite, 3400),
            (tasks, 3400),
        ],
    };

    lines
        .into_iter()
        .enumerate()
        .map(|(index, (text, duration))| NarrativeCue {
            text,
            duration_ms: Some(duration),
            class_name: format!("intro-text intro-text--{}-cue-{}", band.as_str(), index + 1),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_follow_hour() {
        assert_eq!(TimeBand::from_hour(4), TimeBand::Night);
        assert_eq!(TimeBand::from_hour(5), TimeBand::Dawn);
        assert_eq!(TimeBand::from_hour(12), TimeBand::Day);
        assert_eq!(TimeBand::from_hour(20), TimeBand::Dusk);
        assert_eq!(TimeBand::from_hour(21), TimeBand::Night);
    }

    #[test]
    fn narrative_mentions_time_and_agent() {
        let cues = intro_narratives(LocalTime::new(13, 7), "  Ada ");
        assert_eq!(cues.len(), 5);
        assert!(cues[3].text.contains("13:07"));
        assert!(cues[4].text.ends_with("Agent Ada."));
        assert_eq!(cues[0].class_name, "intro-text intro-text--day-cue-1");
    }

    #[test]
    fn blank_agent_is_traveler() {
        let cues = intro_narratives(LocalTime::new(23, 0), " ");
        assert!(cues.last().is_some_and(|c| c.text.ends_with("Agent Traveler.")));
    }

    #[test]
    fn hold_has_floor_and_default() {
        let cue = NarrativeCue {
            text: String::new(),
            duration_ms: Some(200),
            class_name: String::new(),
        };
        assert_eq!(default_hold(&cue), MIN_CUE_MS);
        let cue = NarrativeCue {
            duration_ms: None,
            ..cue
        };
        assert_eq!(default_hold(&cue), DEFAULT_CUE_MS);
    }
}
