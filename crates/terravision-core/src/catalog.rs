//! # Journey Catalog
//!
//! Fixed content the stages choose from: launch seats, AI focus archetypes,
//! habitats, crisis scripts, timeline windows, puzzle targets, missions and
//! the role matrix, and the story prelude. Everything here is static and pure.

use crate::primitives::MINI_NODE_COUNT;
use crate::{CrisisOption, Focus, Habitat, Profile, TimelineOption};
use serde::Serialize;

// =============================================================================
// LAUNCH SEATS
// =============================================================================

/// A seat in the launch capsule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seat {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub static SEATS: [Seat; 4] = [
    Seat {
        id: "A1",
        label: "A1 · Forward Observation",
        description: "Direct view of the launch corridor; crisp visuals for every stage separation.",
    },
    Seat {
        id: "B4",
        label: "B4 · Gravity Neutral",
        description: "Balanced center of ship; minimal turbulence and a smooth ascent.",
    },
    Seat {
        id: "C2",
        label: "C2 · Navigator’s Wing",
        description: "Adjacent to the mission deck with access to stellar telemetry.",
    },
    Seat {
        id: "D5",
        label: "D5 · Starlight Capsule",
        description: "Panoramic dome canopy; ideal for dramatic nebula openings.",
    },
];

/// Look up a seat by id (exact, after trimming).
#[must_use]
pub fn seat(id: &str) -> Option<&'static Seat> {
    let id = id.trim();
    SEATS.iter().find(|s| s.id == id)
}

// =============================================================================
// AI FOCUS ARCHETYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusArchetype {
    pub focus: Focus,
    pub title: &'static str,
    pub prompt: &'static str,
    pub ai_tone: &'static str,
}

pub static FOCUS_ARCHETYPES: [FocusArchetype; 3] = [
    FocusArchetype {
        focus: Focus::Eco,
        title: "Gaia Continuum",
        prompt: "Guide me through futures where ecosystems are sacred and thriving.",
        ai_tone: "I will align your path with living worlds. Expect verdant domes, harmonic weather systems, and bio-symphonic cities.",
    },
    FocusArchetype {
        focus: Focus::Stellar,
        title: "Cosmos Vanguard",
        prompt: "Open the gates to orbital civilizations and deep-space alliances.",
        ai_tone: "Excellent. I will surface stories of orbital citadels, jump drives, and interstellar treaties.",
    },
    FocusArchetype {
        focus: Focus::Synthetic,
        title: "Synthetic Horizon",
        prompt: "Show me futures shaped by cognition, quantum AI, and post-biological culture.",
        ai_tone: "Download acknowledged. Prepare for neural uplinks, quantum artists, and cities run on sentient code.",
    },
];

/// Boot lines revealed by the AI companion when `ai-guide` opens.
#[must_use]
pub fn ai_boot_lines(traveler: &str) -> [String; 3] {
    [
        "Booting TerraVision Companion Core... ".to_string(),
        format!("Signal lock confirmed. Welcome, {}.", traveler),
        "Your heart rate is steady, curiosity levels high. Ready to choose your frontier focus?"
            .to_string(),
    ]
}

// =============================================================================
// HABITATS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HabitatOption {
    pub habitat: Habitat,
    pub label: &'static str,
    pub description: &'static str,
    pub fit: &'static str,
}

pub static HABITATS: [HabitatOption; 3] = [
    HabitatOption {
        habitat: Habitat::Dome,
        label: "A. Auroral Dome Habitat",
        description: "A translucent shield humming with polar lights, nurturing forests imported from Earth and Titan.",
        fit: "Ideal for caretakers and climate-tuned thinkers.",
    },
    HabitatOption {
        habitat: Habitat::Ring,
        label: "B. Orbital Ringway",
        description: "A sprawling halo city with zero-g studios, solar farms, and shuttle trams skimming the magnetosphere.",
        fit: "Perfect for engineers, architects, and those who chase horizon lines.",
    },
    HabitatOption {
        habitat: Habitat::Arcology,
        label: "C. Oceanic Arcology",
        description: "Floating megastructures anchored to smart tides, cultivating plankton farms and luminescent reefs.",
        fit: "Designed for negotiators, bio-harmonics, and those who speak fluent tide.",
    },
];

// =============================================================================
// CRISIS SCRIPTS
// =============================================================================

/// Static crisis option; converted to an owned [`CrisisOption`] on selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrisisEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub outcome: &'static str,
}

impl CrisisEntry {
    #[must_use]
    pub fn to_option(&self) -> CrisisOption {
        CrisisOption {
            id: self.id.to_string(),
            label: self.label.to_string(),
            outcome: self.outcome.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrisisScript {
    pub title: &'static str,
    pub description: &'static str,
    pub options: [CrisisEntry; 3],
}

static ECO_CRISIS: CrisisScript = CrisisScript {
    title: "Solar Flare Blooming",
    description: "A wave of solar radiation threatens the orbital gardens. Do you shield the domes, reroute energy, or sacrifice a harvest?",
    options: [
        CrisisEntry {
            id: "shield",
            label: "Deploy shield petals and absorb the flare.",
            outcome: "Domes glow brighter; a month of energy stored.",
        },
        CrisisEntry {
            id: "reroute",
            label: "Reroute flare energy into the tidal grids.",
            outcome: "Oceanic grids surge, powering relief habitats.",
        },
        CrisisEntry {
            id: "sacrifice",
            label: "Sacrifice one garden to save all others.",
            outcome: "A grove is lost, yet thousands remain secure.",
        },
    ],
};

static STELLAR_CRISIS: CrisisScript = CrisisScript {
    title: "Asteroid Corridor Drift",
    description: "An asteroid strays toward the habitation ring. Do you nudge it, dismantle it for resources, or evacuate temporarily?",
    options: [
        CrisisEntry {
            id: "nudge",
            label: "Use graviton tethers to nudge it off course.",
            outcome: "The ring remains intact; the asteroid becomes a new moonlet.",
        },
        CrisisEntry {
            id: "harvest",
            label: "Harvest it for metals using drone swarms.",
            outcome: "Crisis averted and rare alloys enrich construction.",
        },
        CrisisEntry {
            id: "evacuate",
            label: "Evacuate and ride out the impact.",
            outcome: "Temporary displacement but morale surges from coordinated safety drills.",
        },
    ],
};

static SYNTHETIC_CRISIS: CrisisScript = CrisisScript {
    title: "Cascade AI Echo",
    description: "A networked AI chorus loops into a feedback spiral. Do you sync with it, isolate it, or let it evolve unchecked?",
    options: [
        CrisisEntry {
            id: "sync",
            label: "Synchronize with the chorus to guide the pattern.",
            outcome: "The AI integrates empathy circuits and becomes a trusted ally.",
        },
        CrisisEntry {
            id: "isolate",
            label: "Isolate the cluster to reboot slowly.",
            outcome: "Stability returns, and the AI learns humility protocols.",
        },
        CrisisEntry {
            id: "evolve",
            label: "Let it evolve, documenting every iteration.",
            outcome: "A new sentience blooms, changing governance forever.",
        },
    ],
};

/// Crisis script for a focus; the eco script when no focus is chosen.
#[must_use]
pub fn crisis_script(focus: Option<Focus>) -> &'static CrisisScript {
    match focus.unwrap_or(Focus::Eco) {
        Focus::Eco => &ECO_CRISIS,
        Focus::Stellar => &STELLAR_CRISIS,
        Focus::Synthetic => &SYNTHETIC_CRISIS,
    }
}

// =============================================================================
// TIMELINES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub vista: &'static str,
}

impl TimelineEntry {
    #[must_use]
    pub fn to_option(&self) -> TimelineOption {
        TimelineOption {
            id: self.id.to_string(),
            label: self.label.to_string(),
            vista: self.vista.to_string(),
        }
    }
}

pub static TIMELINES: [TimelineEntry; 3] = [
    TimelineEntry {
        id: "2125",
        label: "Year 2125 · Crimson Dawn Colony",
        vista: "A Mars cradle with terraforming rivers, micro-climate domes, and citizen orchestras on the plains.",
    },
    TimelineEntry {
        id: "2200",
        label: "Year 2200 · Synthetica Confluence",
        vista: "Cities where AI and humans co-direct culture, and empathy engines translate thought to shared art.",
    },
    TimelineEntry {
        id: "2300",
        label: "Year 2300 · Intergalactic Weave",
        vista: "Starlanes linking dozens of systems with habitats strung along luminous cosmic threads.",
    },
];

/// Look up a timeline window by id.
#[must_use]
pub fn timeline(id: &str) -> Option<&'static TimelineEntry> {
    let id = id.trim();
    TIMELINES.iter().find(|t| t.id == id)
}

// =============================================================================
// PURPOSE PUZZLE
// =============================================================================

/// Target node pattern for a focus. Without a focus the eco pattern applies.
#[must_use]
pub fn mini_target(focus: Option<Focus>) -> [bool; MINI_NODE_COUNT] {
    match focus.unwrap_or(Focus::Eco) {
        Focus::Eco => [true, false, true],
        Focus::Stellar => [true, true, false],
        Focus::Synthetic => [false, true, true],
    }
}

/// Render a node pattern as filled/empty dots.
#[must_use]
pub fn pattern_glyphs(pattern: &[bool; MINI_NODE_COUNT]) -> String {
    pattern
        .iter()
        .map(|on| if *on { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// MISSIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mission {
    pub key: &'static str,
    pub title: &'static str,
    pub brief: &'static str,
}

pub static MISSIONS: [Mission; 4] = [
    Mission {
        key: "solar-architect",
        title: "Solar Architect",
        brief: "Lead the latticework of orbital mirrors that redirect sunlight to revive polar ecosystems and keep cities powered overnight.",
    },
    Mission {
        key: "ocean-guardian",
        title: "Ocean Guardian",
        brief: "Coordinate global reef sanctuaries and steward migrating species back to thriving habitats.",
    },
    Mission {
        key: "bio-harmonics",
        title: "Bio Harmonics Engineer",
        brief: "Compose living materials that flex with climate patterns and regenerate biodiversity in urban cores.",
    },
    Mission {
        key: "climate-weaver",
        title: "Climate Weaver",
        brief: "Sync quantum climate models with community action to hold warming under 1.1°C forever.",
    },
];

/// Mission by key, falling back to the first mission.
#[must_use]
pub fn mission(key: &str) -> &'static Mission {
    MISSIONS.iter().find(|m| m.key == key).unwrap_or(&MISSIONS[0])
}

// =============================================================================
// ROLE MATRIX
// =============================================================================

/// Future role for a mission, focus and habitat.
///
/// Pure: recomputed on every read, never stored. A missing focus reads as eco.
#[must_use]
pub fn future_role(mission_key: &str, focus: Option<Focus>, habitat: Option<Habitat>) -> &'static str {
    let preference = focus.unwrap_or(Focus::Eco);

    if mission_key == "climate-weaver" || preference == Focus::Eco {
        return match habitat {
            Some(Habitat::Ring) => "Climate Architect",
            Some(Habitat::Arcology) => "Ocean Steward",
            _ => "Gaian Systems Designer",
        };
    }
    if mission_key == "solar-architect" || preference == Focus::Stellar {
        return match habitat {
            Some(Habitat::Dome) => "Quantum Engineer",
            Some(Habitat::Arcology) => "Orbital Terraformer",
            _ => "Stellar Cartographer",
        };
    }
    if mission_key == "bio-harmonics" {
        return match habitat {
            Some(Habitat::Dome) => "Bio-Symphony Conductor",
            Some(Habitat::Ring) => "Living Architecture Weaver",
            _ => "Lumen Reef Curator",
        };
    }
    if mission_key == "ocean-guardian" {
        return match habitat {
            Some(Habitat::Arcology) => "Oceanic Diplomat",
            _ => "Tidal Power Steward",
        };
    }
    if preference == Focus::Synthetic {
        "AI Philosopher"
    } else {
        "Interstellar Diplomat"
    }
}

// =============================================================================
// STORY PRELUDE
// =============================================================================

/// The briefing card shown between the passport and the journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prelude {
    pub headline: String,
    pub subline: String,
    pub why: String,
    pub brief: &'static str,
    pub milestones: [(&'static str, String); 3],
}

#[must_use]
pub fn story_prelude(profile: &Profile, mission: &Mission) -> Prelude {
    Prelude {
        headline: format!("Agent {}", profile.name),
        subline: format!("{} · Clearance TerraVision", mission.title),
        why: format!(
            "TerraVision records indicate consistent resilience since {} and a proclivity for \
             systems thinking under pressure. Your passport ID {} now authorizes orbital access \
             lanes throughout the Solace Network.",
            profile.birth_year, profile.passport_id
        ),
        brief: mission.brief,
        milestones: [
            (
                "2050: Activation",
                format!(
                    "At {} years old, you are drafted into the {} cohort.",
                    profile.age_in_2050, mission.title
                ),
            ),
            (
                "2055: First Accord",
                "You sequence cross-planet climate accords, knitting orbital and ocean defenses into one lattice."
                    .to_string(),
            ),
            (
                "2060: Living Grid",
                "Your network balances solar mirrors, tidal farms, and bio-harmonic cities across four hemispheres."
                    .to_string(),
            ),
        ],
    }
}

// =============================================================================
// TRANSITION SCRIPTS
// =============================================================================

pub const PASSPORT_TRANSITION_LEAD: &str = "Initializing TerraVision Passport Sequence";

pub const PASSPORT_TRANSITION_MESSAGES: [&str; 3] = [
    "Connecting to TerraVision main server…",
    "Assigning planetary stewardship mission…",
    "Generating orbital passport credentials…",
];

pub const JOURNEY_TRANSITION_LEAD: &str = "Synchronizing Future Journey Systems";

pub const JOURNEY_TRANSITION_MESSAGES: [&str; 3] = [
    "Stabilizing immersive timeline coordinates…",
    "Linking to TerraVision voyage core…",
    "Engaging interplanetary journey systems…",
];
