//! Mappers for legacy (`2.x.x`) documents.
//!
//! Legacy documents store notes and bombs in one `_notes` array told apart by `_type`, and tempo changes and color boosts as special `_events` rows.

use serde_json::Value;

use crate::{
    entity::{
        Arc, BasicEvent, Bomb, BpmEvent, ColorBoostEvent, CutDirection, GridPosition,
        KeywordFilter, Note, Obstacle, Slider, SliderTail, Timing, WallType, WaypointEvent,
    },
    json::{self, Object},
    revision::BeatmapRevision,
};

/// `_type` of a `_notes` row which is a bomb.
pub const BOMB_TYPE: i32 = 3;
/// `_cutDirection` written on bomb rows.
pub const BOMB_CUT_DIRECTION: i32 = 1;
/// `_type` of an `_events` row which is a tempo change.
pub const BPM_EVENT_TYPE: i32 = 100;
/// `_type` of an `_events` row which is a color boost.
pub const COLOR_BOOST_EVENT_TYPE: i32 = 5;

fn timing(fragment: &Object, key: &str) -> Timing {
    Timing::at(json::get_f32(fragment, key, 0.0))
}

fn position(fragment: &Object) -> GridPosition {
    GridPosition::new(
        json::get_i32(fragment, "_lineIndex", 0),
        json::get_i32(fragment, "_lineLayer", 0),
    )
}

/// Whether a `_notes` row is a bomb.
#[must_use]
pub fn is_bomb(fragment: &Object) -> bool {
    json::get_i32(fragment, "_type", 0) == BOMB_TYPE
}

/// Reads a `_notes` row as a note.
#[must_use]
pub fn decode_note(fragment: &Object) -> Note {
    Note {
        timing: timing(fragment, "_time"),
        position: position(fragment),
        color: json::get_i32(fragment, "_type", 0),
        direction: CutDirection::from_i32(json::get_i32(fragment, "_cutDirection", 0)),
        angle_offset: 0.0,
        rotation_lane: None,
    }
}

/// Writes a note as a `_notes` row. The angle offset cannot be stored.
#[must_use]
pub fn encode_note(note: &Note) -> Object {
    json::object([
        ("_time", json::number(note.timing.beat)),
        ("_lineIndex", Value::from(note.position.x)),
        ("_lineLayer", Value::from(note.position.y)),
        ("_type", Value::from(note.color)),
        ("_cutDirection", Value::from(note.direction.as_i32())),
    ])
}

/// Reads a `_notes` row as a bomb.
#[must_use]
pub fn decode_bomb(fragment: &Object) -> Bomb {
    Bomb {
        timing: timing(fragment, "_time"),
        position: position(fragment),
        rotation_lane: None,
    }
}

/// Writes a bomb as a `_notes` row.
#[must_use]
pub fn encode_bomb(bomb: &Bomb) -> Object {
    json::object([
        ("_time", json::number(bomb.timing.beat)),
        ("_lineIndex", Value::from(bomb.position.x)),
        ("_lineLayer", Value::from(bomb.position.y)),
        ("_type", Value::from(BOMB_TYPE)),
        ("_cutDirection", Value::from(BOMB_CUT_DIRECTION)),
    ])
}

/// Reads an `_obstacles` row.
///
/// Rows without `_lineLayer` but with `_type` take their layer and height from the wall type.
#[must_use]
pub fn decode_obstacle(fragment: &Object) -> Obstacle {
    let (y, height) = if !fragment.contains_key("_lineLayer") && fragment.contains_key("_type") {
        WallType::from_i32(json::get_i32(fragment, "_type", 0)).layer_height()
    } else {
        (
            json::get_i32(fragment, "_lineLayer", 0),
            json::get_i32(fragment, "_height", 5),
        )
    };
    Obstacle {
        timing: timing(fragment, "_time"),
        position: GridPosition::new(json::get_i32(fragment, "_lineIndex", 0), y),
        duration: json::get_f32(fragment, "_duration", 0.0),
        width: json::get_i32(fragment, "_width", 1),
        height,
        rotation_lane: None,
    }
}

/// Writes an `_obstacles` row. `_lineLayer` and `_height` are written only after `2.5.0`.
#[must_use]
pub fn encode_obstacle(obstacle: &Obstacle, revision: BeatmapRevision) -> Object {
    let explicit = revision > BeatmapRevision::V250;
    let mut fragment = json::object([
        ("_time", json::number(obstacle.timing.beat)),
        ("_lineIndex", Value::from(obstacle.position.x)),
        ("_type", Value::from(obstacle.wall_type().as_i32())),
        ("_duration", json::number(obstacle.duration)),
    ]);
    if explicit {
        fragment.insert("_lineLayer".into(), obstacle.position.y.into());
    }
    fragment.insert("_width".into(), obstacle.width.into());
    if explicit {
        fragment.insert("_height".into(), obstacle.height.into());
    }
    fragment
}

/// Reads a `_sliders` row. Both ends take `_colorType`.
#[must_use]
pub fn decode_arc(fragment: &Object) -> Arc {
    let color = json::get_i32(fragment, "_colorType", 0);
    Arc {
        slider: Slider {
            head: Note {
                timing: timing(fragment, "_headTime"),
                position: GridPosition::new(
                    json::get_i32(fragment, "_headLineIndex", 0),
                    json::get_i32(fragment, "_headLineLayer", 0),
                ),
                color,
                direction: CutDirection::from_i32(json::get_i32(
                    fragment,
                    "_headCutDirection",
                    0,
                )),
                angle_offset: 0.0,
                rotation_lane: None,
            },
            tail: SliderTail {
                timing: timing(fragment, "_tailTime"),
                position: GridPosition::new(
                    json::get_i32(fragment, "_tailLineIndex", 0),
                    json::get_i32(fragment, "_tailLineLayer", 0),
                ),
                rotation_lane: None,
            },
        },
        head_multiplier: json::get_f32(fragment, "_headControlPointLengthMultiplier", 0.0),
        tail_multiplier: json::get_f32(fragment, "_tailControlPointLengthMultiplier", 0.0),
        mid_anchor_mode: json::get_i32(fragment, "_sliderMidAnchorMode", 0),
        tail_color: color,
        tail_direction: CutDirection::from_i32(json::get_i32(fragment, "_tailCutDirection", 0)),
    }
}

/// Writes a `_sliders` row. The tail color cannot be stored.
#[must_use]
pub fn encode_arc(arc: &Arc) -> Object {
    let Slider { head, tail } = &arc.slider;
    json::object([
        ("_colorType", Value::from(head.color)),
        ("_headTime", json::number(head.timing.beat)),
        ("_headLineIndex", Value::from(head.position.x)),
        ("_headLineLayer", Value::from(head.position.y)),
        ("_headCutDirection", Value::from(head.direction.as_i32())),
        (
            "_headControlPointLengthMultiplier",
            json::number(arc.head_multiplier),
        ),
        ("_tailTime", json::number(tail.timing.beat)),
        ("_tailLineIndex", Value::from(tail.position.x)),
        ("_tailLineLayer", Value::from(tail.position.y)),
        ("_tailCutDirection", Value::from(arc.tail_direction.as_i32())),
        (
            "_tailControlPointLengthMultiplier",
            json::number(arc.tail_multiplier),
        ),
        ("_sliderMidAnchorMode", Value::from(arc.mid_anchor_mode)),
    ])
}

/// An `_events` row, split by its `_type`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventRow {
    /// `_type` 100.
    Bpm(BpmEvent),
    /// `_type` 5.
    ColorBoost(ColorBoostEvent),
    /// Any other `_type`.
    Basic(BasicEvent),
}

impl EventRow {
    /// The beat of the row.
    #[must_use]
    pub const fn beat(&self) -> f32 {
        match self {
            Self::Bpm(event) => event.beat,
            Self::ColorBoost(event) => event.beat,
            Self::Basic(event) => event.beat,
        }
    }
}

/// Reads an `_events` row.
#[must_use]
pub fn decode_event(fragment: &Object) -> EventRow {
    let beat = json::get_f32(fragment, "_time", 0.0);
    match json::get_i32(fragment, "_type", 0) {
        BPM_EVENT_TYPE => EventRow::Bpm(BpmEvent {
            beat,
            bpm: json::get_f32(fragment, "_floatValue", 0.0),
        }),
        COLOR_BOOST_EVENT_TYPE => EventRow::ColorBoost(ColorBoostEvent {
            beat,
            boost: json::get_i32(fragment, "_value", 0) != 0,
        }),
        event_type => EventRow::Basic(BasicEvent {
            beat,
            event_type,
            value: json::get_i32(fragment, "_value", 0),
            float_value: json::get_f32(fragment, "_floatValue", 0.0),
        }),
    }
}

/// Writes an `_events` row. `_floatValue` is written from `2.5.0` on.
#[must_use]
pub fn encode_event(row: &EventRow, revision: BeatmapRevision) -> Object {
    match row {
        EventRow::Bpm(event) => json::object([
            ("_time", json::number(event.beat)),
            ("_type", Value::from(BPM_EVENT_TYPE)),
            ("_value", Value::from(0)),
            ("_floatValue", json::number(event.bpm)),
        ]),
        EventRow::ColorBoost(event) => json::object([
            ("_time", json::number(event.beat)),
            ("_type", Value::from(COLOR_BOOST_EVENT_TYPE)),
            ("_value", Value::from(i32::from(event.boost))),
        ]),
        EventRow::Basic(event) => {
            let mut fragment = json::object([
                ("_time", json::number(event.beat)),
                ("_type", Value::from(event.event_type)),
                ("_value", Value::from(event.value)),
            ]);
            if revision.supports_since(BeatmapRevision::V250) {
                fragment.insert("_floatValue".into(), json::number(event.float_value));
            }
            fragment
        }
    }
}

/// Reads a `_waypoints` row.
#[must_use]
pub fn decode_waypoint(fragment: &Object) -> WaypointEvent {
    WaypointEvent {
        beat: json::get_f32(fragment, "_time", 0.0),
        position: position(fragment),
        offset_direction: json::get_i32(fragment, "_offsetDirection", 0),
    }
}

/// Writes a `_waypoints` row.
#[must_use]
pub fn encode_waypoint(waypoint: &WaypointEvent) -> Object {
    json::object([
        ("_time", json::number(waypoint.beat)),
        ("_lineIndex", Value::from(waypoint.position.x)),
        ("_lineLayer", Value::from(waypoint.position.y)),
        ("_offsetDirection", Value::from(waypoint.offset_direction)),
    ])
}

/// Reads the `_specialEventsKeywordFilters` object.
#[must_use]
pub fn decode_keyword_filters(fragment: &Object) -> Vec<KeywordFilter> {
    json::objects(fragment, "_keywords")
        .map(|keyword| KeywordFilter {
            keyword: json::get_string(keyword, "_keyword"),
            event_types: json::get_i32_array(keyword, "_specialEvents"),
        })
        .collect()
}

/// Writes the `_specialEventsKeywordFilters` object.
#[must_use]
pub fn encode_keyword_filters(filters: &[KeywordFilter]) -> Object {
    let keywords = filters
        .iter()
        .map(|filter| {
            Value::Object(json::object([
                ("_keyword", Value::from(filter.keyword.as_str())),
                ("_specialEvents", Value::from(filter.event_types.clone())),
            ]))
        })
        .collect();
    json::object([("_keywords", Value::Array(keywords))])
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn obj(value: Value) -> Object {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn obstacle_from_wall_type() {
        let crouch = decode_obstacle(&obj(json!({ "_time": 4, "_type": 1, "_duration": 2 })));
        assert_eq!((crouch.position.y, crouch.height), (2, 3));
        assert_eq!(crouch.width, 1);

        let free = decode_obstacle(&obj(json!({ "_type": 2 })));
        assert_eq!((free.position.y, free.height), (0, 5));

        // An explicit layer wins over the type.
        let explicit = decode_obstacle(&obj(json!({ "_type": 1, "_lineLayer": 1, "_height": 2 })));
        assert_eq!((explicit.position.y, explicit.height), (1, 2));
    }

    #[test]
    fn obstacle_fields_by_revision() {
        let obstacle = Obstacle {
            position: GridPosition::new(1, 2),
            height: 3,
            ..Default::default()
        };
        let old = encode_obstacle(&obstacle, BeatmapRevision::V250);
        assert_eq!(old.get("_type"), Some(&json!(1)));
        assert!(!old.contains_key("_lineLayer"));
        assert!(!old.contains_key("_height"));

        let new = encode_obstacle(&obstacle, BeatmapRevision::V260);
        let keys: Vec<_> = new.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["_time", "_lineIndex", "_type", "_duration", "_lineLayer", "_width", "_height"]
        );
    }

    #[test]
    fn events_by_type() {
        let bpm = decode_event(&obj(json!({ "_time": 8, "_type": 100, "_value": 0, "_floatValue": 150 })));
        assert_eq!(bpm, EventRow::Bpm(BpmEvent { beat: 8.0, bpm: 150.0 }));
        let boost = decode_event(&obj(json!({ "_time": 2, "_type": 5, "_value": 1 })));
        assert_eq!(
            boost,
            EventRow::ColorBoost(ColorBoostEvent { beat: 2.0, boost: true })
        );
        let basic = decode_event(&obj(json!({ "_time": 1, "_type": 0, "_value": 3 })));
        assert!(matches!(basic, EventRow::Basic(BasicEvent { value: 3, .. })));

        let written = encode_event(&basic, BeatmapRevision::V240);
        assert!(!written.contains_key("_floatValue"));
        let written = encode_event(&basic, BeatmapRevision::V250);
        assert_eq!(written.get("_floatValue"), Some(&json!(0)));
    }

    #[test]
    fn bomb_row() {
        let row = obj(json!({ "_time": 1.5, "_lineIndex": 2, "_lineLayer": 0, "_type": 3, "_cutDirection": 0 }));
        assert!(is_bomb(&row));
        let bomb = decode_bomb(&row);
        assert_eq!(
            Value::Object(encode_bomb(&bomb)),
            json!({ "_time": 1.5, "_lineIndex": 2, "_lineLayer": 0, "_type": 3, "_cutDirection": 1 })
        );
    }

    #[test]
    fn keyword_filters() {
        let fragment = obj(json!({
            "_keywords": [{ "_keyword": "SIRA", "_specialEvents": [40, 41] }]
        }));
        let filters = decode_keyword_filters(&fragment);
        assert_eq!(filters[0].keyword, "SIRA");
        assert_eq!(filters[0].event_types, [40, 41]);
        assert_eq!(encode_keyword_filters(&filters), fragment);
    }
}
