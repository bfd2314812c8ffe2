//! Assembly of legacy (`2.x.x`) difficulty documents.

use itertools::Itertools;
use serde_json::Value;

use super::DifficultyDocument;
use crate::{
    adapter::{
        support,
        v2::{self, EventRow},
    },
    entity::{BpmEvent, EntityKind, Lightshow},
    json::{self, Object, Patch},
    revision::BeatmapRevision,
};

pub(super) fn read(root: &Object, document: &mut DifficultyDocument) {
    let revision = document.revision;
    for fragment in json::objects(root, "_notes") {
        if v2::is_bomb(fragment) {
            document.bombs.push(v2::decode_bomb(fragment));
        } else {
            document.notes.push(v2::decode_note(fragment));
        }
    }
    document.obstacles = json::objects(root, "_obstacles")
        .map(v2::decode_obstacle)
        .collect();
    if support(EntityKind::Arc, revision).readable() {
        document.arcs = json::objects(root, "_sliders").map(v2::decode_arc).collect();
    }
    let (lightshow, bpm_events) = read_lightshow(root, revision);
    document.lightshow = lightshow;
    document.bpm_events = bpm_events;
}

/// Splits `_events` into lighting and tempo changes, and reads the other lighting arrays.
pub(super) fn read_lightshow(root: &Object, revision: BeatmapRevision) -> (Lightshow, Vec<BpmEvent>) {
    let mut lightshow = Lightshow::default();
    let mut bpm_events = Vec::new();
    for row in json::objects(root, "_events").map(v2::decode_event) {
        match row {
            EventRow::Bpm(event) => bpm_events.push(event),
            EventRow::ColorBoost(event) => lightshow.color_boost_events.push(event),
            EventRow::Basic(event) => lightshow.basic_events.push(event),
        }
    }
    if support(EntityKind::Waypoint, revision).readable() {
        lightshow.waypoints = json::objects(root, "_waypoints")
            .map(v2::decode_waypoint)
            .collect();
    }
    if support(EntityKind::KeywordFilter, revision).readable() {
        lightshow.keyword_filters = json::get_object(root, "_specialEventsKeywordFilters")
            .map(v2::decode_keyword_filters)
            .unwrap_or_default();
    }
    (lightshow, bpm_events)
}

fn array(fragments: impl IntoIterator<Item = Object>) -> Value {
    Value::Array(fragments.into_iter().map(Value::Object).collect())
}

pub(super) fn patch(document: &DifficultyDocument, base: &Object) -> Patch {
    let revision = document.revision;
    let mut patch = Patch::new();
    patch.set("_version", revision.as_version_str());

    let notes = document
        .notes
        .iter()
        .map(|note| (note.timing.beat, v2::encode_note(note)))
        .chain(
            document
                .bombs
                .iter()
                .map(|bomb| (bomb.timing.beat, v2::encode_bomb(bomb))),
        )
        .sorted_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, fragment)| fragment);
    patch.set("_notes", array(notes));
    patch.set(
        "_obstacles",
        array(
            document
                .obstacles
                .iter()
                .map(|obstacle| v2::encode_obstacle(obstacle, revision)),
        ),
    );
    if support(EntityKind::Arc, revision).writable() {
        patch.set("_sliders", array(document.arcs.iter().map(v2::encode_arc)));
    }

    let lightshow = &document.lightshow;
    let events: Vec<_> = lightshow
        .basic_events
        .iter()
        .copied()
        .map(EventRow::Basic)
        .chain(lightshow.color_boost_events.iter().copied().map(EventRow::ColorBoost))
        .chain(document.bpm_events.iter().copied().map(EventRow::Bpm))
        .sorted_by(|a, b| a.beat().total_cmp(&b.beat()))
        .map(|row| v2::encode_event(&row, revision))
        .collect();
    // An absent array stays absent unless there is something to write.
    if !events.is_empty() || base.contains_key("_events") {
        patch.set("_events", array(events));
    }
    if support(EntityKind::Waypoint, revision).writable() {
        patch.set(
            "_waypoints",
            array(lightshow.waypoints.iter().map(v2::encode_waypoint)),
        );
    }
    if support(EntityKind::KeywordFilter, revision).writable() {
        patch.set(
            "_specialEventsKeywordFilters",
            v2::encode_keyword_filters(&lightshow.keyword_filters),
        );
    }
    patch
}
