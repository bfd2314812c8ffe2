use std::collections::HashSet;

use beatmap_rs::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const DATA_TABLES: [&str; 5] = [
    "colorNotesData",
    "bombNotesData",
    "obstaclesData",
    "arcsData",
    "chainsData",
];

fn parse_v4() -> DifficultyDocument {
    parse_difficulty(include_str!("files/v4_expert.dat")).expect("failed to parse V4 document")
}

#[test]
fn test_v4_document() {
    let document = parse_v4();
    assert_eq!(document.revision, BeatmapRevision::V400);

    let [first, second, third] = document.notes.as_slice() else {
        panic!("expected three notes");
    };
    assert_eq!(first.position, GridPosition::new(1, 0));
    assert_eq!(second.color, 1);
    assert_eq!(third.rotation_lane, Some(1));
    // Two rows with the same content decode to the same shape.
    assert_eq!(
        Note {
            timing: first.timing,
            rotation_lane: first.rotation_lane,
            ..*third
        },
        *first
    );

    assert_eq!(document.bombs[1].position, GridPosition::new(1, 2));
    assert_eq!(document.obstacles[0].duration, 2.0);
    // `i` points past the end of `obstaclesData`.
    let dangling = &document.obstacles[1];
    assert_eq!(dangling.timing.beat, 7.0);
    assert_eq!(
        (dangling.duration, dangling.width, dangling.height),
        (0.0, 1, 5)
    );

    let arc = &document.arcs[0];
    assert_eq!(arc.slider.head.position, GridPosition::new(1, 0));
    assert_eq!(arc.slider.tail.position, GridPosition::new(3, 2));
    assert_eq!(arc.tail_color, 1);
    assert_eq!(arc.tail_direction, CutDirection::Up);

    let chain = &document.chains[0];
    assert_eq!(chain.slider.head.color, 1);
    assert_eq!(chain.slider.tail.position, GridPosition::new(2, 2));
    assert_eq!((chain.segment_count, chain.squish), (4, 1.0));

    assert!(document.lightshow.is_empty());
}

#[test]
fn test_v4_rebuild() {
    let written = parse_v4().rebuild_indexed().expect("V4 documents can be rebuilt");

    assert_eq!(
        written["colorNotes"],
        json!([
            { "b": 1, "r": 0, "i": 0 },
            { "b": 2, "r": 0, "i": 1 },
            { "b": 3, "r": 1, "i": 0 }
        ])
    );
    assert_eq!(
        written["colorNotesData"],
        json!([
            { "x": 1, "y": 0, "c": 0, "d": 1, "a": 0 },
            { "x": 2, "y": 0, "c": 1, "d": 1, "a": 0 },
            { "x": 3, "y": 2, "c": 1, "d": 0, "a": 0 }
        ])
    );
    assert_eq!(
        written["bombNotes"],
        json!([{ "b": 4, "r": 0, "i": 0 }, { "b": 5, "r": 0, "i": 0 }])
    );
    assert_eq!(
        written["obstaclesData"],
        json!([
            { "d": 2, "x": 0, "y": 0, "w": 1, "h": 5 },
            { "d": 0, "x": 0, "y": 0, "w": 1, "h": 5 }
        ])
    );
    assert_eq!(
        written["arcs"],
        json!([{ "hb": 8, "tb": 9, "hr": 0, "tr": 0, "hi": 0, "ti": 2, "ai": 0 }])
    );
    assert_eq!(
        written["chains"],
        json!([{ "hb": 10, "tb": 10.5, "hr": 0, "tr": 0, "i": 1, "ci": 0 }])
    );
    assert_eq!(written["chainsData"], json!([{ "tx": 2, "ty": 2, "c": 4, "s": 1 }]));

    // Fields outside the object arrays come from the original.
    assert_eq!(written["version"], json!("4.0.0"));
    assert_eq!(written["customData"], json!({ "editor": "test" }));
    assert_eq!(written["spawnRotations"], json!([]));
}

#[test]
fn test_v4_data_tables_have_no_duplicates() {
    let mut document = parse_v4();
    // Same content as existing rows, written with float noise.
    document.notes.push(Note {
        timing: Timing::at(11.0),
        position: GridPosition::new(2, 0),
        color: 1,
        direction: CutDirection::Down,
        angle_offset: 0.0001,
        rotation_lane: Some(0),
    });
    document.obstacles.push(Obstacle {
        timing: Timing::at(12.0),
        duration: 2.0004,
        ..Default::default()
    });
    let written = document.rebuild_indexed().expect("V4 documents can be rebuilt");

    for table in DATA_TABLES {
        let rows = written[table].as_array().expect("data tables are arrays");
        let distinct: HashSet<String> = rows.iter().map(Value::to_string).collect();
        assert_eq!(distinct.len(), rows.len(), "duplicate rows in {table}");
    }
    assert_eq!(written["colorNotes"][3]["i"], json!(1));
    assert_eq!(written["obstacles"][2]["i"], json!(0));
}

#[test]
fn test_v4_rebuild_reparses_to_same_objects() {
    let document = parse_v4();
    let written = document.rebuild_indexed().expect("V4 documents can be rebuilt");
    let reparsed = DifficultyDocument::from_value(written).expect("rebuilt document must parse");

    assert_eq!(reparsed.notes, document.notes);
    assert_eq!(reparsed.bombs, document.bombs);
    assert_eq!(reparsed.obstacles, document.obstacles);
    assert_eq!(reparsed.arcs, document.arcs);
    assert_eq!(reparsed.chains, document.chains);
}

#[test]
fn test_v4_lightshow() {
    let lightshow = parse_lightshow(include_str!("files/v4_lightshow.dat"))
        .expect("failed to parse V4 lightshow");

    assert_eq!(
        lightshow.basic_events,
        vec![
            BasicEvent {
                beat: 0.0,
                event_type: 1,
                value: 3,
                float_value: 1.0
            },
            BasicEvent {
                beat: 2.0,
                event_type: 4,
                value: 0,
                float_value: 0.5
            },
            BasicEvent {
                beat: 3.0,
                event_type: 1,
                value: 3,
                float_value: 1.0
            },
        ]
    );
    assert_eq!(
        lightshow.color_boost_events,
        vec![
            ColorBoostEvent {
                beat: 1.0,
                boost: true
            },
            ColorBoostEvent {
                beat: 5.0,
                boost: false
            },
        ]
    );
    assert_eq!(
        lightshow.waypoints,
        vec![WaypointEvent {
            beat: 0.5,
            position: GridPosition::new(1, 0),
            offset_direction: 2
        }]
    );
    assert_eq!(lightshow.keyword_filters[0].event_types, vec![40]);
}

#[test]
fn test_support_matrix_guards_indexed_lighting() {
    for kind in [
        EntityKind::BasicEvent,
        EntityKind::ColorBoostEvent,
        EntityKind::Waypoint,
        EntityKind::KeywordFilter,
        EntityKind::BpmEvent,
    ] {
        assert_eq!(support(kind, BeatmapRevision::V410), Support::ReadOnly);
    }
    assert_eq!(
        support(EntityKind::Chain, BeatmapRevision::V400),
        Support::ReadWrite
    );
}
