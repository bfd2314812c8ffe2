//! Assembly of mid (`3.x.x`) difficulty documents.

use serde_json::Value;

use super::DifficultyDocument;
use crate::{
    adapter::v3,
    entity::Lightshow,
    json::{self, Object, Patch},
};

pub(super) fn read(root: &Object, document: &mut DifficultyDocument) {
    document.bpm_events = json::objects(root, "bpmEvents")
        .map(v3::decode_bpm_event)
        .collect();
    document.notes = json::objects(root, "colorNotes")
        .map(v3::decode_note)
        .collect();
    document.bombs = json::objects(root, "bombNotes")
        .map(v3::decode_bomb)
        .collect();
    document.obstacles = json::objects(root, "obstacles")
        .map(v3::decode_obstacle)
        .collect();
    document.arcs = json::objects(root, "sliders").map(v3::decode_arc).collect();
    document.chains = json::objects(root, "burstSliders")
        .map(v3::decode_chain)
        .collect();
    document.lightshow = read_lightshow(root);
}

pub(super) fn read_lightshow(root: &Object) -> Lightshow {
    Lightshow {
        basic_events: json::objects(root, "basicBeatmapEvents")
            .map(v3::decode_basic_event)
            .collect(),
        color_boost_events: json::objects(root, "colorBoostBeatmapEvents")
            .map(v3::decode_color_boost_event)
            .collect(),
        waypoints: json::objects(root, "waypoints")
            .map(v3::decode_waypoint)
            .collect(),
        keyword_filters: json::get_object(root, "basicEventTypesWithKeywords")
            .map(v3::decode_keyword_filters)
            .unwrap_or_default(),
    }
}

fn array<'a, T: 'a>(items: impl IntoIterator<Item = &'a T>, encode: fn(&T) -> Object) -> Value {
    Value::Array(
        items
            .into_iter()
            .map(|item| Value::Object(encode(item)))
            .collect(),
    )
}

pub(super) fn patch(document: &DifficultyDocument) -> Patch {
    let lightshow = &document.lightshow;
    let mut patch = Patch::new();
    patch
        .set("version", document.revision.as_version_str())
        .set("bpmEvents", array(&document.bpm_events, v3::encode_bpm_event))
        .set("colorNotes", array(&document.notes, v3::encode_note))
        .set("bombNotes", array(&document.bombs, v3::encode_bomb))
        .set("obstacles", array(&document.obstacles, v3::encode_obstacle))
        .set("sliders", array(&document.arcs, v3::encode_arc))
        .set("burstSliders", array(&document.chains, v3::encode_chain))
        .set(
            "basicBeatmapEvents",
            array(&lightshow.basic_events, v3::encode_basic_event),
        )
        .set(
            "colorBoostBeatmapEvents",
            array(&lightshow.color_boost_events, v3::encode_color_boost_event),
        )
        .set("waypoints", array(&lightshow.waypoints, v3::encode_waypoint))
        .set(
            "basicEventTypesWithKeywords",
            v3::encode_keyword_filters(&lightshow.keyword_filters),
        );
    patch
}
