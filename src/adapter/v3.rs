//! Mappers for mid (`3.x.x`) documents.

use serde_json::Value;

use crate::{
    entity::{
        Arc, BasicEvent, Bomb, BpmEvent, Chain, ColorBoostEvent, CutDirection, GridPosition,
        KeywordFilter, Note, Obstacle, Slider, SliderTail, Timing, WaypointEvent,
    },
    json::{self, Object},
};

fn timing(fragment: &Object, key: &str) -> Timing {
    Timing::at(json::get_f32(fragment, key, 0.0))
}

fn position(fragment: &Object, x: &str, y: &str) -> GridPosition {
    GridPosition::new(json::get_i32(fragment, x, 0), json::get_i32(fragment, y, 0))
}

fn direction(fragment: &Object, key: &str) -> CutDirection {
    CutDirection::from_i32(json::get_i32(fragment, key, 0))
}

/// Reads the head note shared by every `colorNotes`, `sliders` and `burstSliders` row.
fn head(fragment: &Object) -> Note {
    Note {
        timing: timing(fragment, "b"),
        position: position(fragment, "x", "y"),
        color: json::get_i32(fragment, "c", 0),
        direction: direction(fragment, "d"),
        angle_offset: json::get_f32(fragment, "a", 0.0),
        rotation_lane: None,
    }
}

/// Reads a `colorNotes` row.
#[must_use]
pub fn decode_note(fragment: &Object) -> Note {
    head(fragment)
}

/// Writes a `colorNotes` row.
#[must_use]
pub fn encode_note(note: &Note) -> Object {
    json::object([
        ("b", json::number(note.timing.beat)),
        ("x", Value::from(note.position.x)),
        ("y", Value::from(note.position.y)),
        ("c", Value::from(note.color)),
        ("d", Value::from(note.direction.as_i32())),
        ("a", json::number(note.angle_offset)),
    ])
}

/// Reads a `bombNotes` row.
#[must_use]
pub fn decode_bomb(fragment: &Object) -> Bomb {
    Bomb {
        timing: timing(fragment, "b"),
        position: position(fragment, "x", "y"),
        rotation_lane: None,
    }
}

/// Writes a `bombNotes` row.
#[must_use]
pub fn encode_bomb(bomb: &Bomb) -> Object {
    json::object([
        ("b", json::number(bomb.timing.beat)),
        ("x", Value::from(bomb.position.x)),
        ("y", Value::from(bomb.position.y)),
    ])
}

/// Reads an `obstacles` row.
#[must_use]
pub fn decode_obstacle(fragment: &Object) -> Obstacle {
    Obstacle {
        timing: timing(fragment, "b"),
        position: position(fragment, "x", "y"),
        duration: json::get_f32(fragment, "d", 0.0),
        width: json::get_i32(fragment, "w", 1),
        height: json::get_i32(fragment, "h", 5),
        rotation_lane: None,
    }
}

/// Writes an `obstacles` row.
#[must_use]
pub fn encode_obstacle(obstacle: &Obstacle) -> Object {
    json::object([
        ("b", json::number(obstacle.timing.beat)),
        ("d", json::number(obstacle.duration)),
        ("x", Value::from(obstacle.position.x)),
        ("y", Value::from(obstacle.position.y)),
        ("w", Value::from(obstacle.width)),
        ("h", Value::from(obstacle.height)),
    ])
}

/// Reads a `sliders` row. Both ends take `c`, and `tc` is the tail cut direction.
#[must_use]
pub fn decode_arc(fragment: &Object) -> Arc {
    let head = head(fragment);
    Arc {
        slider: Slider {
            head,
            tail: SliderTail {
                timing: timing(fragment, "tb"),
                position: position(fragment, "tx", "ty"),
                rotation_lane: None,
            },
        },
        head_multiplier: json::get_f32(fragment, "mu", 0.0),
        tail_multiplier: json::get_f32(fragment, "tmu", 0.0),
        mid_anchor_mode: json::get_i32(fragment, "m", 0),
        tail_color: head.color,
        tail_direction: direction(fragment, "tc"),
    }
}

/// Writes a `sliders` row. The tail color cannot be stored.
#[must_use]
pub fn encode_arc(arc: &Arc) -> Object {
    let Slider { head, tail } = &arc.slider;
    json::object([
        ("c", Value::from(head.color)),
        ("b", json::number(head.timing.beat)),
        ("x", Value::from(head.position.x)),
        ("y", Value::from(head.position.y)),
        ("d", Value::from(head.direction.as_i32())),
        ("mu", json::number(arc.head_multiplier)),
        ("tb", json::number(tail.timing.beat)),
        ("tx", Value::from(tail.position.x)),
        ("ty", Value::from(tail.position.y)),
        ("tc", Value::from(arc.tail_direction.as_i32())),
        ("tmu", json::number(arc.tail_multiplier)),
        ("m", Value::from(arc.mid_anchor_mode)),
    ])
}

/// Reads a `burstSliders` row.
#[must_use]
pub fn decode_chain(fragment: &Object) -> Chain {
    Chain {
        slider: Slider {
            head: head(fragment),
            tail: SliderTail {
                timing: timing(fragment, "tb"),
                position: position(fragment, "tx", "ty"),
                rotation_lane: None,
            },
        },
        segment_count: json::get_i32(fragment, "sc", 0),
        squish: json::get_f32(fragment, "s", 1.0),
    }
}

/// Writes a `burstSliders` row.
#[must_use]
pub fn encode_chain(chain: &Chain) -> Object {
    let Slider { head, tail } = &chain.slider;
    json::object([
        ("c", Value::from(head.color)),
        ("b", json::number(head.timing.beat)),
        ("x", Value::from(head.position.x)),
        ("y", Value::from(head.position.y)),
        ("d", Value::from(head.direction.as_i32())),
        ("tb", json::number(tail.timing.beat)),
        ("tx", Value::from(tail.position.x)),
        ("ty", Value::from(tail.position.y)),
        ("sc", Value::from(chain.segment_count)),
        ("s", json::number(chain.squish)),
    ])
}

/// Reads a `bpmEvents` row.
#[must_use]
pub fn decode_bpm_event(fragment: &Object) -> BpmEvent {
    BpmEvent {
        beat: json::get_f32(fragment, "b", 0.0),
        bpm: json::get_f32(fragment, "m", 0.0),
    }
}

/// Writes a `bpmEvents` row.
#[must_use]
pub fn encode_bpm_event(event: &BpmEvent) -> Object {
    json::object([
        ("b", json::number(event.beat)),
        ("m", json::number(event.bpm)),
    ])
}

/// Reads a `basicBeatmapEvents` row.
#[must_use]
pub fn decode_basic_event(fragment: &Object) -> BasicEvent {
    BasicEvent {
        beat: json::get_f32(fragment, "b", 0.0),
        event_type: json::get_i32(fragment, "et", 0),
        value: json::get_i32(fragment, "i", 0),
        float_value: json::get_f32(fragment, "f", 0.0),
    }
}

/// Writes a `basicBeatmapEvents` row.
#[must_use]
pub fn encode_basic_event(event: &BasicEvent) -> Object {
    json::object([
        ("b", json::number(event.beat)),
        ("et", Value::from(event.event_type)),
        ("i", Value::from(event.value)),
        ("f", json::number(event.float_value)),
    ])
}

/// Reads a `colorBoostBeatmapEvents` row.
#[must_use]
pub fn decode_color_boost_event(fragment: &Object) -> ColorBoostEvent {
    ColorBoostEvent {
        beat: json::get_f32(fragment, "b", 0.0),
        boost: json::get_bool(fragment, "o", false),
    }
}

/// Writes a `colorBoostBeatmapEvents` row.
#[must_use]
pub fn encode_color_boost_event(event: &ColorBoostEvent) -> Object {
    json::object([
        ("b", json::number(event.beat)),
        ("o", Value::from(event.boost)),
    ])
}

/// Reads a `waypoints` row.
#[must_use]
pub fn decode_waypoint(fragment: &Object) -> WaypointEvent {
    WaypointEvent {
        beat: json::get_f32(fragment, "b", 0.0),
        position: position(fragment, "x", "y"),
        offset_direction: json::get_i32(fragment, "d", 0),
    }
}

/// Writes a `waypoints` row.
#[must_use]
pub fn encode_waypoint(waypoint: &WaypointEvent) -> Object {
    json::object([
        ("b", json::number(waypoint.beat)),
        ("x", Value::from(waypoint.position.x)),
        ("y", Value::from(waypoint.position.y)),
        ("d", Value::from(waypoint.offset_direction)),
    ])
}

/// Reads the `basicEventTypesWithKeywords` object. Also used by indexed lightshow documents.
#[must_use]
pub fn decode_keyword_filters(fragment: &Object) -> Vec<KeywordFilter> {
    json::objects(fragment, "d")
        .map(|keyword| KeywordFilter {
            keyword: json::get_string(keyword, "k"),
            event_types: json::get_i32_array(keyword, "e"),
        })
        .collect()
}

/// Writes the `basicEventTypesWithKeywords` object.
#[must_use]
pub fn encode_keyword_filters(filters: &[KeywordFilter]) -> Object {
    let keywords = filters
        .iter()
        .map(|filter| {
            Value::Object(json::object([
                ("k", Value::from(filter.keyword.as_str())),
                ("e", Value::from(filter.event_types.clone())),
            ]))
        })
        .collect();
    json::object([("d", Value::Array(keywords))])
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn obj(value: Value) -> Object {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn arc_row() {
        let row = obj(json!({
            "c": 1, "b": 2, "x": 1, "y": 0, "d": 1, "mu": 1,
            "tb": 3, "tx": 2, "ty": 2, "tc": 0, "tmu": 0.5, "m": 0
        }));
        let arc = decode_arc(&row);
        assert_eq!(arc.tail_color, 1);
        assert_eq!(arc.tail_direction, CutDirection::Up);
        assert_eq!(arc.slider.tail.position, GridPosition::new(2, 2));
        assert_eq!(encode_arc(&arc), row);
    }

    #[test]
    fn chain_squish_defaults_to_one() {
        let chain = decode_chain(&obj(json!({ "b": 1, "tb": 1.5, "sc": 4 })));
        assert_eq!(chain.squish, 1.0);
        assert_eq!(chain.segment_count, 4);
    }

    #[test]
    fn defaults_for_mismatched_types() {
        let note = decode_note(&obj(json!({ "b": "soon", "x": [], "d": 8, "a": 15 })));
        assert_eq!(note.timing.beat, 0.0);
        assert_eq!(note.position.x, 0);
        assert_eq!(note.direction, CutDirection::Any);
        assert_eq!(note.angle_offset, 15.0);

        let obstacle = decode_obstacle(&obj(json!({ "w": "wide" })));
        assert_eq!((obstacle.width, obstacle.height), (1, 5));
    }

    #[test]
    fn float_payload_kept() {
        let event = decode_basic_event(&obj(json!({ "b": 4, "et": 1, "i": 3, "f": 0.5 })));
        assert_eq!(event.float_value, 0.5);
        assert_eq!(encode_basic_event(&event).get("f"), Some(&json!(0.5)));
    }
}
