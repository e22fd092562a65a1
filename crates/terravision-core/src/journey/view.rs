//! Read model of the journey for the presentation layer.

use super::machine::JourneyMachine;
use crate::catalog::{self, FOCUS_ARCHETYPES, HABITATS, SEATS, TIMELINES};
use crate::primitives::MINI_NODE_COUNT;
use crate::{StageId, Stamp};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressState {
    Done,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressStep {
    pub stage: StageId,
    pub title: &'static str,
    pub state: ProgressState,
}

/// A selectable option with its selection flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub id: String,
    pub label: String,
    pub detail: String,
    pub selected: bool,
}

/// Summary shown on the final certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Certificate {
    pub traveler: String,
    pub passport_id: Option<String>,
    pub role: &'static str,
    pub focus: Option<&'static str>,
    pub habitat: Option<&'static str>,
    pub crisis: Option<String>,
    pub timeline: Option<String>,
    pub stamp_count: usize,
}

/// The intro cue currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntroView {
    pub index: usize,
    pub total: usize,
    pub text: String,
    pub class_name: String,
}

/// Stage-specific content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "kebab-case")]
pub enum StagePanel {
    Launch {
        seats: Vec<OptionView>,
        countdown: Option<u8>,
    },
    AiGuide {
        feed: Vec<String>,
        archetypes: Vec<OptionView>,
    },
    Colony {
        habitats: Vec<OptionView>,
    },
    Purpose {
        mission: &'static str,
        brief: &'static str,
        role: &'static str,
        target: [bool; MINI_NODE_COUNT],
        nodes: [bool; MINI_NODE_COUNT],
        solved: bool,
    },
    Crisis {
        title: &'static str,
        description: &'static str,
        options: Vec<OptionView>,
    },
    Vision {
        options: Vec<OptionView>,
    },
    Legacy {
        certificate: Certificate,
    },
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JourneyView {
    pub stage: StageId,
    pub step: usize,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub progress: Vec<ProgressStep>,
    pub stamps: Vec<Stamp>,
    pub panel: StagePanel,
    pub intro: Option<IntroView>,
    pub can_advance: bool,
    pub can_retreat: bool,
    pub ambient_on: bool,
}

pub(super) fn build(machine: &JourneyMachine) -> JourneyView {
    let state = machine.state();
    let stage = state.stage;

    let progress = StageId::ALL
        .into_iter()
        .map(|s| ProgressStep {
            stage: s,
            title: s.title(),
            state: match s.cmp(&stage) {
                std::cmp::Ordering::Less => ProgressState::Done,
                std::cmp::Ordering::Equal => ProgressState::Current,
                std::cmp::Ordering::Greater => ProgressState::Upcoming,
            },
        })
        .collect();

    let panel = match stage {
        StageId::Launch => StagePanel::Launch {
            seats: SEATS
                .iter()
                .map(|s| OptionView {
                    id: s.id.to_string(),
                    label: s.label.to_string(),
                    detail: s.description.to_string(),
                    selected: state.selected_seat.as_deref() == Some(s.id),
                })
                .collect(),
            countdown: state.countdown,
        },
        StageId::AiGuide => StagePanel::AiGuide {
            feed: machine.ai_feed().to_vec(),
            archetypes: FOCUS_ARCHETYPES
                .iter()
                .map(|a| OptionView {
                    id: a.focus.as_str().to_string(),
                    label: a.title.to_string(),
                    detail: if state.ai_focus == Some(a.focus) {
                        a.ai_tone.to_string()
                    } else {
                        a.prompt.to_string()
                    },
                    selected: state.ai_focus == Some(a.focus),
                })
                .collect(),
        },
        StageId::Colony => StagePanel::Colony {
            habitats: HABITATS
                .iter()
                .map(|h| OptionView {
                    id: h.habitat.as_str().to_string(),
                    label: h.label.to_string(),
                    detail: format!("{} {}", h.description, h.fit),
                    selected: state.habitat == Some(h.habitat),
                })
                .collect(),
        },
        StageId::Purpose => {
            let mission = catalog::mission(machine.mission_key());
            StagePanel::Purpose {
                mission: mission.title,
                brief: mission.brief,
                role: machine.future_role(),
                target: catalog::mini_target(state.ai_focus),
                nodes: state.mini_nodes,
                solved: state.mini_complete,
            }
        }
        StageId::Crisis => {
            let script = catalog::crisis_script(state.ai_focus);
            let chosen = state.crisis_choice.as_ref().map(|c| c.id.as_str());
            StagePanel::Crisis {
                title: script.title,
                description: script.description,
                options: script
                    .options
                    .iter()
                    .map(|o| OptionView {
                        id: o.id.to_string(),
                        label: o.label.to_string(),
                        detail: o.outcome.to_string(),
                        selected: chosen == Some(o.id),
                    })
                    .collect(),
            }
        }
        StageId::Vision => {
            let chosen = state.timeline.as_ref().map(|t| t.id.as_str());
            StagePanel::Vision {
                options: TIMELINES
                    .iter()
                    .map(|t| OptionView {
                        id: t.id.to_string(),
                        label: t.label.to_string(),
                        detail: t.vista.to_string(),
                        selected: chosen == Some(t.id),
                    })
                    .collect(),
            }
        }
        StageId::Legacy => StagePanel::Legacy {
            certificate: Certificate {
                traveler: machine.traveler(),
                passport_id: machine.profile().map(|p| p.passport_id.clone()),
                role: machine.future_role(),
                focus: state.ai_focus.map(|f| f.as_str()),
                habitat: state.habitat.map(|h| h.as_str()),
                crisis: state.crisis_choice.as_ref().map(|c| c.label.clone()),
                timeline: state.timeline.as_ref().map(|t| t.label.clone()),
                stamp_count: state.stamps.len(),
            },
        },
    };

    let intro = machine.intro_cue().map(|(index, cue)| IntroView {
        index,
        total: machine.intro_len(),
        text: cue.text.clone(),
        class_name: cue.class_name.clone(),
    });

    JourneyView {
        stage,
        step: stage.index() + 1,
        title: stage.title(),
        subtitle: stage.subtitle(),
        progress,
        stamps: state.stamps.clone(),
        panel,
        intro,
        can_advance: machine.can_advance(),
        can_retreat: machine.can_retreat(),
        ambient_on: machine.ambient_on(),
    }
}
