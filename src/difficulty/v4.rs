//! Assembly of indexed (`4.x.x`) difficulty and lightshow documents.

use serde_json::Value;

use super::DifficultyDocument;
use crate::{
    adapter::{v3, v4},
    codec::{DataRows, ShapeTables},
    entity::Lightshow,
    json::{self, Object, Patch},
};

pub(super) fn read(root: &Object, document: &mut DifficultyDocument) {
    let notes_data = DataRows::new(root, "colorNotesData");
    let bombs_data = DataRows::new(root, "bombNotesData");
    let obstacles_data = DataRows::new(root, "obstaclesData");
    let arcs_data = DataRows::new(root, "arcsData");
    let chains_data = DataRows::new(root, "chainsData");

    document.notes = json::objects(root, "colorNotes")
        .map(|record| v4::decode_note(record, &notes_data))
        .collect();
    document.bombs = json::objects(root, "bombNotes")
        .map(|record| v4::decode_bomb(record, &bombs_data))
        .collect();
    document.obstacles = json::objects(root, "obstacles")
        .map(|record| v4::decode_obstacle(record, &obstacles_data))
        .collect();
    document.arcs = json::objects(root, "arcs")
        .map(|record| v4::decode_arc(record, &notes_data, &arcs_data))
        .collect();
    document.chains = json::objects(root, "chains")
        .map(|record| v4::decode_chain(record, &notes_data, &chains_data))
        .collect();
    // Tempo changes usually live in the audio document, but are kept when present.
    document.bpm_events = json::objects(root, "bpmEvents")
        .map(v3::decode_bpm_event)
        .collect();
}

pub(super) fn read_lightshow(root: &Object) -> Lightshow {
    let basic_data = DataRows::new(root, "basicEventsData");
    let boost_data = DataRows::new(root, "colorBoostEventsData");
    let waypoints_data = DataRows::new(root, "waypointsData");
    Lightshow {
        basic_events: json::objects(root, "basicEvents")
            .map(|record| v4::decode_basic_event(record, &basic_data))
            .collect(),
        color_boost_events: json::objects(root, "colorBoostEvents")
            .map(|record| v4::decode_color_boost_event(record, &boost_data))
            .collect(),
        waypoints: json::objects(root, "waypoints")
            .map(|record| v4::decode_waypoint(record, &waypoints_data))
            .collect(),
        keyword_filters: json::get_object(root, "basicEventTypesWithKeywords")
            .map(v3::decode_keyword_filters)
            .unwrap_or_default(),
    }
}

fn with_index(mut record: Object, key: &str, index: usize) -> Value {
    record.insert(key.to_owned(), index.into());
    Value::Object(record)
}

/// Builds every object array and data table. Rows are interned in the order objects are visited: notes, bombs, obstacles, arcs, then chains.
pub(super) fn rebuild(document: &DifficultyDocument) -> Patch {
    let mut tables = ShapeTables::default();

    let notes: Vec<_> = document
        .notes
        .iter()
        .map(|note| {
            let (record, shape) = v4::encode_note(note);
            with_index(record, "i", tables.notes.intern(shape))
        })
        .collect();
    let bombs: Vec<_> = document
        .bombs
        .iter()
        .map(|bomb| {
            let (record, shape) = v4::encode_bomb(bomb);
            with_index(record, "i", tables.bombs.intern(shape))
        })
        .collect();
    let obstacles: Vec<_> = document
        .obstacles
        .iter()
        .map(|obstacle| {
            let (record, shape) = v4::encode_obstacle(obstacle);
            with_index(record, "i", tables.obstacles.intern(shape))
        })
        .collect();
    let arcs: Vec<_> = document
        .arcs
        .iter()
        .map(|arc| {
            let (mut record, shapes) = v4::encode_arc(arc);
            record.insert("hi".into(), tables.notes.intern(shapes.head).into());
            record.insert("ti".into(), tables.notes.intern(shapes.tail).into());
            with_index(record, "ai", tables.arcs.intern(shapes.meta))
        })
        .collect();
    let chains: Vec<_> = document
        .chains
        .iter()
        .map(|chain| {
            let (mut record, head, meta) = v4::encode_chain(chain);
            record.insert("i".into(), tables.notes.intern(head).into());
            with_index(record, "ci", tables.chains.intern(meta))
        })
        .collect();

    let mut patch = Patch::new();
    patch
        .set("version", document.revision.as_version_str())
        .set("colorNotes", notes)
        .set("colorNotesData", tables.notes.to_json())
        .set("bombNotes", bombs)
        .set("bombNotesData", tables.bombs.to_json())
        .set("obstacles", obstacles)
        .set("obstaclesData", tables.obstacles.to_json())
        .set("arcs", arcs)
        .set("arcsData", tables.arcs.to_json())
        .set("chains", chains)
        .set("chainsData", tables.chains.to_json());
    patch
}
