//! Mappers for indexed (`4.x.x`) documents.
//!
//! Decoding takes the [`DataRows`] an object's indices refer to. An index which cannot be resolved leaves the dependent fields at their defaults. Encoding returns the slim record without its indices, plus the shapes to intern; the assembler appends the indices it gets back.

use serde_json::Value;

use crate::{
    codec::{ArcShape, BombShape, ChainShape, DataRows, NoteShape, ObstacleShape, ShapeF32},
    entity::{
        Arc, BasicEvent, Bomb, Chain, ColorBoostEvent, GridPosition, Note, Obstacle, Slider,
        SliderTail, Timing, WaypointEvent,
    },
    json::{self, Object},
};

fn timing(fragment: &Object, key: &str) -> Timing {
    Timing::at(json::get_f32(fragment, key, 0.0))
}

fn lane(fragment: &Object, key: &str) -> Option<i32> {
    Some(json::get_i32(fragment, key, 0))
}

fn note_from_shape(timing: Timing, rotation_lane: Option<i32>, shape: NoteShape) -> Note {
    Note {
        timing,
        position: shape.position,
        color: shape.color,
        direction: shape.direction,
        angle_offset: shape.angle_offset.as_f32(),
        rotation_lane,
    }
}

/// The `colorNotesData` row of a note.
#[must_use]
pub fn note_shape(note: &Note) -> NoteShape {
    NoteShape {
        position: note.position,
        color: note.color,
        direction: note.direction,
        angle_offset: ShapeF32::new(note.angle_offset),
    }
}

/// Reads a `colorNotes` record.
#[must_use]
pub fn decode_note(fragment: &Object, notes_data: &DataRows<'_>) -> Note {
    let shape = notes_data
        .shape(json::get_opt_i32(fragment, "i"))
        .unwrap_or_default();
    note_from_shape(timing(fragment, "b"), lane(fragment, "r"), shape)
}

/// Writes a `colorNotes` record, without `i`.
#[must_use]
pub fn encode_note(note: &Note) -> (Object, NoteShape) {
    let record = json::object([
        ("b", json::number(note.timing.beat)),
        ("r", Value::from(note.rotation_lane.unwrap_or(0))),
    ]);
    (record, note_shape(note))
}

/// Reads a `bombNotes` record.
#[must_use]
pub fn decode_bomb(fragment: &Object, bombs_data: &DataRows<'_>) -> Bomb {
    let shape: BombShape = bombs_data
        .shape(json::get_opt_i32(fragment, "i"))
        .unwrap_or_default();
    Bomb {
        timing: timing(fragment, "b"),
        position: shape.position,
        rotation_lane: lane(fragment, "r"),
    }
}

/// Writes a `bombNotes` record, without `i`.
#[must_use]
pub fn encode_bomb(bomb: &Bomb) -> (Object, BombShape) {
    let record = json::object([
        ("b", json::number(bomb.timing.beat)),
        ("r", Value::from(bomb.rotation_lane.unwrap_or(0))),
    ]);
    (
        record,
        BombShape {
            position: bomb.position,
        },
    )
}

/// Reads an `obstacles` record.
#[must_use]
pub fn decode_obstacle(fragment: &Object, obstacles_data: &DataRows<'_>) -> Obstacle {
    let shape: ObstacleShape = obstacles_data
        .shape(json::get_opt_i32(fragment, "i"))
        .unwrap_or_default();
    Obstacle {
        timing: timing(fragment, "b"),
        position: shape.position,
        duration: shape.duration.as_f32(),
        width: shape.width,
        height: shape.height,
        rotation_lane: lane(fragment, "r"),
    }
}

/// Writes an `obstacles` record, without `i`.
#[must_use]
pub fn encode_obstacle(obstacle: &Obstacle) -> (Object, ObstacleShape) {
    let record = json::object([
        ("b", json::number(obstacle.timing.beat)),
        ("r", Value::from(obstacle.rotation_lane.unwrap_or(0))),
    ]);
    let shape = ObstacleShape {
        duration: ShapeF32::new(obstacle.duration),
        position: obstacle.position,
        width: obstacle.width,
        height: obstacle.height,
    };
    (record, shape)
}

/// Shapes an arc refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArcShapes {
    /// `colorNotesData` row of the head, referred by `hi`.
    pub head: NoteShape,
    /// `colorNotesData` row of the tail, referred by `ti`.
    pub tail: NoteShape,
    /// `arcsData` row, referred by `ai`.
    pub meta: ArcShape,
}

/// Reads an `arcs` record. The tail color and cut direction come from the tail's `colorNotesData` row.
#[must_use]
pub fn decode_arc(fragment: &Object, notes_data: &DataRows<'_>, arcs_data: &DataRows<'_>) -> Arc {
    let head: NoteShape = notes_data
        .shape(json::get_opt_i32(fragment, "hi"))
        .unwrap_or_default();
    let tail: NoteShape = notes_data
        .shape(json::get_opt_i32(fragment, "ti"))
        .unwrap_or_default();
    let meta: ArcShape = arcs_data
        .shape(json::get_opt_i32(fragment, "ai"))
        .unwrap_or_default();
    Arc {
        slider: Slider {
            head: note_from_shape(timing(fragment, "hb"), lane(fragment, "hr"), head),
            tail: SliderTail {
                timing: timing(fragment, "tb"),
                position: tail.position,
                rotation_lane: lane(fragment, "tr"),
            },
        },
        head_multiplier: meta.head_multiplier.as_f32(),
        tail_multiplier: meta.tail_multiplier.as_f32(),
        mid_anchor_mode: meta.mid_anchor_mode,
        tail_color: tail.color,
        tail_direction: tail.direction,
    }
}

/// Writes an `arcs` record, without `hi`, `ti` and `ai`. The tail row carries the head's angle offset.
#[must_use]
pub fn encode_arc(arc: &Arc) -> (Object, ArcShapes) {
    let Slider { head, tail } = &arc.slider;
    let record = json::object([
        ("hb", json::number(head.timing.beat)),
        ("tb", json::number(tail.timing.beat)),
        ("hr", Value::from(head.rotation_lane.unwrap_or(0))),
        ("tr", Value::from(tail.rotation_lane.unwrap_or(0))),
    ]);
    let shapes = ArcShapes {
        head: note_shape(head),
        tail: NoteShape {
            position: tail.position,
            color: arc.tail_color,
            direction: arc.tail_direction,
            angle_offset: ShapeF32::new(head.angle_offset),
        },
        meta: ArcShape {
            head_multiplier: ShapeF32::new(arc.head_multiplier),
            tail_multiplier: ShapeF32::new(arc.tail_multiplier),
            mid_anchor_mode: arc.mid_anchor_mode,
        },
    };
    (record, shapes)
}

/// Reads a `chains` record.
#[must_use]
pub fn decode_chain(
    fragment: &Object,
    notes_data: &DataRows<'_>,
    chains_data: &DataRows<'_>,
) -> Chain {
    let head: NoteShape = notes_data
        .shape(json::get_opt_i32(fragment, "i"))
        .unwrap_or_default();
    let meta: ChainShape = chains_data
        .shape(json::get_opt_i32(fragment, "ci"))
        .unwrap_or_default();
    Chain {
        slider: Slider {
            head: note_from_shape(timing(fragment, "hb"), lane(fragment, "hr"), head),
            tail: SliderTail {
                timing: timing(fragment, "tb"),
                position: meta.tail_position,
                rotation_lane: lane(fragment, "tr"),
            },
        },
        segment_count: meta.segment_count,
        squish: meta.squish.as_f32(),
    }
}

/// Writes a `chains` record, without `i` and `ci`.
#[must_use]
pub fn encode_chain(chain: &Chain) -> (Object, NoteShape, ChainShape) {
    let Slider { head, tail } = &chain.slider;
    let record = json::object([
        ("hb", json::number(head.timing.beat)),
        ("tb", json::number(tail.timing.beat)),
        ("hr", Value::from(head.rotation_lane.unwrap_or(0))),
        ("tr", Value::from(tail.rotation_lane.unwrap_or(0))),
    ]);
    let meta = ChainShape {
        tail_position: tail.position,
        segment_count: chain.segment_count,
        squish: ShapeF32::new(chain.squish),
    };
    (record, note_shape(head), meta)
}

/// Reads a `basicEvents` record of a lightshow document.
#[must_use]
pub fn decode_basic_event(fragment: &Object, events_data: &DataRows<'_>) -> BasicEvent {
    let beat = json::get_f32(fragment, "b", 0.0);
    events_data
        .resolve(json::get_opt_i32(fragment, "i"))
        .map_or(
            BasicEvent {
                beat,
                ..Default::default()
            },
            |data| BasicEvent {
                beat,
                event_type: json::get_i32(data, "t", 0),
                value: json::get_i32(data, "i", 0),
                float_value: json::get_f32(data, "f", 0.0),
            },
        )
}

/// Reads a `colorBoostEvents` record of a lightshow document.
#[must_use]
pub fn decode_color_boost_event(fragment: &Object, events_data: &DataRows<'_>) -> ColorBoostEvent {
    let boost = events_data
        .resolve(json::get_opt_i32(fragment, "i"))
        .is_some_and(|data| json::get_i32(data, "b", 0) != 0);
    ColorBoostEvent {
        beat: json::get_f32(fragment, "b", 0.0),
        boost,
    }
}

/// Reads a `waypoints` record of a lightshow document.
#[must_use]
pub fn decode_waypoint(fragment: &Object, waypoints_data: &DataRows<'_>) -> WaypointEvent {
    let data = waypoints_data.resolve(json::get_opt_i32(fragment, "i"));
    WaypointEvent {
        beat: json::get_f32(fragment, "b", 0.0),
        position: data.map_or_else(GridPosition::default, |data| {
            GridPosition::new(json::get_i32(data, "x", 0), json::get_i32(data, "y", 0))
        }),
        offset_direction: data.map_or(0, |data| json::get_i32(data, "d", 0)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::entity::CutDirection;

    fn obj(value: Value) -> Object {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn arc_ends_from_note_rows() {
        let doc = obj(json!({
            "colorNotesData": [
                { "x": 1, "y": 0, "c": 0, "d": 1, "a": 0 },
                { "x": 2, "y": 2, "c": 1, "d": 0, "a": 0 }
            ],
            "arcsData": [{ "m": 1, "tm": 0.5, "a": 1 }]
        }));
        let notes = DataRows::new(&doc, "colorNotesData");
        let arcs = DataRows::new(&doc, "arcsData");
        let record = obj(json!({ "hb": 2, "tb": 3, "hr": 0, "tr": 1, "hi": 0, "ti": 1, "ai": 0 }));
        let arc = decode_arc(&record, &notes, &arcs);
        assert_eq!(arc.slider.head.direction, CutDirection::Down);
        assert_eq!(arc.slider.tail.position, GridPosition::new(2, 2));
        assert_eq!(arc.slider.tail.rotation_lane, Some(1));
        assert_eq!(arc.tail_color, 1);
        assert_eq!(arc.tail_direction, CutDirection::Up);
        assert_eq!(arc.tail_multiplier, 0.5);
        assert_eq!(arc.mid_anchor_mode, 1);

        let (written, shapes) = encode_arc(&arc);
        assert_eq!(written, obj(json!({ "hb": 2, "tb": 3, "hr": 0, "tr": 1 })));
        assert_eq!(shapes.tail.color, 1);
    }

    #[test]
    fn unresolved_index_keeps_defaults() {
        let doc = obj(json!({ "obstaclesData": [{ "d": 2, "x": 1, "y": 2, "w": 2, "h": 3 }] }));
        let rows = DataRows::new(&doc, "obstaclesData");

        let resolved = decode_obstacle(&obj(json!({ "b": 1, "i": 0 })), &rows);
        assert_eq!(resolved.height, 3);

        for record in [json!({ "b": 1, "i": 7 }), json!({ "b": 1 }), json!({ "b": 1, "i": -1 })] {
            let obstacle = decode_obstacle(&obj(record), &rows);
            assert_eq!(obstacle.timing.beat, 1.0);
            assert_eq!((obstacle.width, obstacle.height), (1, 5));
            assert_eq!(obstacle.duration, 0.0);
        }

        let chain = decode_chain(&obj(json!({ "hb": 1, "i": 3, "ci": 3 })), &rows, &rows);
        assert_eq!(chain.squish, 1.0);
    }

    #[test]
    fn lightshow_records() {
        let doc = obj(json!({
            "basicEventsData": [{ "t": 4, "i": 1, "f": 0.75 }],
            "colorBoostEventsData": [{ "b": 1 }],
            "waypointsData": [{ "x": 1, "y": 0, "d": 3 }]
        }));
        let basic = decode_basic_event(
            &obj(json!({ "b": 8, "i": 0 })),
            &DataRows::new(&doc, "basicEventsData"),
        );
        assert_eq!(
            basic,
            BasicEvent { beat: 8.0, event_type: 4, value: 1, float_value: 0.75 }
        );
        let boost = decode_color_boost_event(
            &obj(json!({ "b": 2, "i": 0 })),
            &DataRows::new(&doc, "colorBoostEventsData"),
        );
        assert!(boost.boost);
        let waypoint = decode_waypoint(
            &obj(json!({ "b": 3, "i": 0 })),
            &DataRows::new(&doc, "waypointsData"),
        );
        assert_eq!(waypoint.offset_direction, 3);
    }
}
