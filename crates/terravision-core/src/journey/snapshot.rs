//! # Journey Snapshot
//!
//! The persisted shape of the journey and the validating hydration that turns
//! an untrusted stored value back into [`JourneyState`].
//!
//! Every field is checked on its own. A malformed field keeps its default and
//! never prevents its siblings from loading.

use super::state::JourneyState;
use crate::catalog;
use crate::primitives::MINI_NODE_COUNT;
use crate::{CrisisOption, Focus, Habitat, StageId, Stamp, TimelineOption};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Persisted journey snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneySnapshot {
    pub stage_index: usize,
    pub selected_seat: Option<String>,
    pub ai_focus: Option<Focus>,
    pub habitat: Option<Habitat>,
    pub mini_nodes: [bool; MINI_NODE_COUNT],
    pub mini_complete: bool,
    pub crisis_choice: Option<CrisisOption>,
    pub timeline: Option<TimelineOption>,
    pub stamps: Vec<Stamp>,
    pub ambient_on: bool,
    pub intro_dismissed: bool,
}

impl JourneySnapshot {
    /// Capture `state` together with the shared ambient flag.
    #[must_use]
    pub fn capture(state: &JourneyState, ambient_on: bool) -> Self {
        Self {
            stage_index: state.stage.index(),
            selected_seat: state.selected_seat.clone(),
            ai_focus: state.ai_focus,
            habitat: state.habitat,
            mini_nodes: state.mini_nodes,
            mini_complete: state.mini_complete,
            crisis_choice: state.crisis_choice.clone(),
            timeline: state.timeline.clone(),
            stamps: state.stamps.clone(),
            ambient_on,
            intro_dismissed: state.intro_dismissed,
        }
    }

    /// Serialize to the stored JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "journey snapshot serialization failed");
                Value::Null
            }
        }
    }
}

/// Result of hydrating a stored snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hydrated {
    pub state: JourneyState,
    pub ambient_on: bool,
    /// Names of fields that were present but rejected.
    pub rejected: Vec<&'static str>,
}

fn stage_index(raw: &Value) -> Option<usize> {
    if let Some(signed) = raw.as_i64() {
        return Some(usize::try_from(signed.max(0)).unwrap_or(StageId::LAST_INDEX));
    }
    if raw.is_u64() {
        return Some(StageId::LAST_INDEX);
    }
    // Whole-valued floats such as `2.0` count as integers.
    let whole = raw.as_f64().filter(|v| v.is_finite() && v.fract() == 0.0)?;
    Some((whole.max(0.0) as usize).min(StageId::LAST_INDEX))
}

fn mini_nodes(raw: &Value) -> Option<[bool; MINI_NODE_COUNT]> {
    let items = raw.as_array()?;
    if items.len() != MINI_NODE_COUNT {
        return None;
    }
    let mut nodes = [false; MINI_NODE_COUNT];
    for (slot, item) in nodes.iter_mut().zip(items) {
        *slot = item.as_bool()?;
    }
    Some(nodes)
}

fn object<T: serde::de::DeserializeOwned>(raw: &Value) -> Option<T> {
    if !raw.is_object() {
        return None;
    }
    serde_json::from_value(raw.clone()).ok()
}

fn stamps(raw: &Value) -> Option<Vec<Stamp>> {
    let items = raw.as_array()?;
    let mut state = JourneyState::initial();
    for item in items {
        match serde_json::from_value::<Stamp>(item.clone()) {
            Ok(stamp) => state.record_stamp(stamp),
            Err(e) => tracing::warn!(error = %e, "dropping malformed stamp"),
        }
    }
    Some(state.stamps)
}

/// Rebuild journey state from an untrusted stored value.
///
/// - `stageIndex` must be a whole number; it is clamped into `[0, 6]`.
/// - `selectedSeat` must name a known seat.
/// - `aiFocus` and `habitat` are trimmed and lowercased before matching.
/// - `miniNodes` must be exactly three booleans.
/// - `miniComplete` is recomputed, never loaded.
/// - `introDismissed` defaults to "past the first stage".
/// - Fields are never filtered by the loaded stage.
#[must_use]
pub fn hydrate(stored: &Value) -> Hydrated {
    let mut state = JourneyState::initial();
    let mut rejected = Vec::new();

    let mut check = |name: &'static str, accepted: bool| {
        if !accepted {
            tracing::warn!(field = name, "ignoring malformed snapshot field");
            rejected.push(name);
        }
    };

    let field = |name: &str| stored.get(name).filter(|v| !v.is_null());

    if let Some(raw) = field("stageIndex") {
        let parsed = stage_index(raw);
        if let Some(index) = parsed {
            state.stage = StageId::from_index(index);
        }
        check("stageIndex", parsed.is_some());
    }

    if let Some(raw) = field("selectedSeat") {
        let parsed = raw.as_str().and_then(catalog::seat);
        if let Some(seat) = parsed {
            state.selected_seat = Some(seat.id.to_string());
        }
        check("selectedSeat", parsed.is_some());
    }

    if let Some(raw) = field("aiFocus") {
        let parsed = raw.as_str().and_then(Focus::parse);
        state.ai_focus = parsed;
        check("aiFocus", parsed.is_some());
    }

    if let Some(raw) = field("habitat") {
        let parsed = raw.as_str().and_then(Habitat::parse);
        state.habitat = parsed;
        check("habitat", parsed.is_some());
    }

    if let Some(raw) = field("miniNodes") {
        let parsed = mini_nodes(raw);
        if let Some(nodes) = parsed {
            state.mini_nodes = nodes;
        }
        check("miniNodes", parsed.is_some());
    }

    if let Some(raw) = field("crisisChoice") {
        let parsed: Option<CrisisOption> = object(raw);
        check("crisisChoice", parsed.is_some());
        state.crisis_choice = parsed;
    }

    if let Some(raw) = field("timeline") {
        let parsed: Option<TimelineOption> = object(raw);
        check("timeline", parsed.is_some());
        state.timeline = parsed;
    }

    if let Some(raw) = field("stamps") {
        let parsed = stamps(raw);
        check("stamps", parsed.is_some());
        state.stamps = parsed.unwrap_or_default();
    }

    state.intro_dismissed = match field("introDismissed") {
        Some(raw) => {
            check("introDismissed", raw.is_boolean());
            raw.as_bool().unwrap_or(state.stage.index() > 0)
        }
        None => state.stage.index() > 0,
    };

    let ambient_on = match field("ambientOn") {
        Some(raw) => {
            check("ambientOn", raw.is_boolean());
            raw.as_bool().unwrap_or(false)
        }
        None => false,
    };

    state.recompute_mini_complete();

    Hydrated {
        state,
        ambient_on,
        rejected,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::MINI_NODES_BASELINE;
    use serde_json::json;

    #[test]
    fn capture_uses_camel_case_keys() {
        let value = JourneySnapshot::capture(&JourneyState::initial(), true).to_value();
        assert_eq!(value["stageIndex"], 0);
        assert_eq!(value["miniNodes"], json!([false, false, false]));
        assert_eq!(value["ambientOn"], true);
        assert_eq!(value["selectedSeat"], Value::Null);
    }

    #[test]
    fn stage_index_is_clamped() {
        assert_eq!(hydrate(&json!({"stageIndex": 42})).state.stage, StageId::Legacy);
        assert_eq!(hydrate(&json!({"stageIndex": -3})).state.stage, StageId::Launch);
        let h = hydrate(&json!({"stageIndex": "2"}));
        assert_eq!(h.state.stage, StageId::Launch);
        assert_eq!(h.rejected, vec!["stageIndex"]);
    }

    #[test]
    fn short_mini_nodes_fall_back_and_keep_siblings() {
        let h = hydrate(&json!({
            "stageIndex": 3,
            "aiFocus": "eco",
            "habitat": "ring",
            "miniNodes": [true, false],
            "miniComplete": true
        }));
        assert_eq!(h.state.mini_nodes, MINI_NODES_BASELINE);
        assert!(!h.state.mini_complete);
        assert_eq!(h.state.habitat, Some(Habitat::Ring));
        assert_eq!(h.state.ai_focus, Some(Focus::Eco));
        assert_eq!(h.rejected, vec!["miniNodes"]);
    }

    #[test]
    fn mini_complete_is_recomputed() {
        let h = hydrate(&json!({
            "stageIndex": 3,
            "aiFocus": "Eco",
            "miniNodes": [true, false, true],
            "miniComplete": false
        }));
        assert!(h.state.mini_complete);
    }

    #[test]
    fn unknown_ids_are_dropped() {
        let h = hydrate(&json!({
            "stageIndex": 5,
            "selectedSeat": "Z9",
            "aiFocus": 7,
            "habitat": " ARCOLOGY ",
            "crisisChoice": "shield"
        }));
        assert_eq!(h.state.selected_seat, None);
        assert_eq!(h.state.ai_focus, None);
        assert_eq!(h.state.habitat, Some(Habitat::Arcology));
        assert_eq!(h.state.crisis_choice, None);
        assert_eq!(h.rejected, vec!["selectedSeat", "aiFocus", "crisisChoice"]);
    }

    #[test]
    fn malformed_stamps_are_skipped() {
        let h = hydrate(&json!({
            "stageIndex": 3,
            "stamps": [
                {"stageId": "launch", "label": "The Launch", "detail": "ok"},
                {"stageId": "nowhere", "label": "?", "detail": "bad"},
                42
            ]
        }));
        assert_eq!(h.state.stamps.len(), 1);
        assert!(h.rejected.is_empty());
    }

    #[test]
    fn intro_flag_defaults_by_stage() {
        assert!(!hydrate(&json!({})).state.intro_dismissed);
        assert!(hydrate(&json!({"stageIndex": 2})).state.intro_dismissed);
        assert!(hydrate(&json!({"introDismissed": true})).state.intro_dismissed);
    }

    #[test]
    fn non_object_snapshot_yields_defaults() {
        let h = hydrate(&json!([1, 2, 3]));
        assert_eq!(h.state, JourneyState::initial());
        assert!(!h.ambient_on);
    }

    #[test]
    fn whole_floats_count_as_stage_indices() {
        assert_eq!(hydrate(&json!({"stageIndex": 2.0})).state.stage, StageId::Colony);
        assert_eq!(hydrate(&json!({"stageIndex": 9.0})).state.stage, StageId::Legacy);
        assert_eq!(hydrate(&json!({"stageIndex": -1.0})).state.stage, StageId::Launch);
        let h = hydrate(&json!({"stageIndex": 2.5}));
        assert_eq!(h.state.stage, StageId::Launch);
        assert_eq!(h.rejected, vec!["stageIndex"]);
    }

    #[test]
    fn choices_load_regardless_of_stage() {
        let h = hydrate(&json!({
            "stageIndex": 1,
            "selectedSeat": "C2",
            "aiFocus": "stellar",
            "habitat": "dome",
            "timeline": {"id": "2200", "label": "l", "vista": "v"}
        }));
        assert_eq!(h.state.stage, StageId::AiGuide);
        assert_eq!(h.state.selected_seat.as_deref(), Some("C2"));
        assert_eq!(h.state.ai_focus, Some(Focus::Stellar));
        assert_eq!(h.state.habitat, Some(Habitat::Dome));
        assert_eq!(h.state.timeline.map(|t| t.id), Some("2200".to_string()));
    }

    #[test]
    fn corrupt_stage_index_keeps_siblings() {
        let h = hydrate(&json!({
            "stageIndex": "3",
            "selectedSeat": "A1",
            "aiFocus": "eco",
            "habitat": "ring",
            "stamps": [{"stageId": "launch", "label": "The Launch", "detail": "A1"}]
        }));
        assert_eq!(h.state.stage, StageId::Launch);
        assert_eq!(h.state.selected_seat.as_deref(), Some("A1"));
        assert_eq!(h.state.ai_focus, Some(Focus::Eco));
        assert_eq!(h.state.habitat, Some(Habitat::Ring));
        assert_eq!(h.state.stamps.len(), 1);
        assert_eq!(h.rejected, vec!["stageIndex"]);
    }
}
