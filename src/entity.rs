//! Typed beatmap objects, independent of the schema revision they came from.
//!
//! Objects are composed from shared field groups instead of a class hierarchy:
//!
//! - [`Timing`] for everything placed on the beat axis,
//! - [`GridPosition`] for everything placed on the lane grid,
//! - [`Slider`] for the head/tail pair shared by [`Arc`] and [`Chain`].
//!
//! [`BeatObject`] borrows any of them as one tagged value, so code walking mixed object lists can match exhaustively on the kind.

pub mod cut_direction;
pub mod events;

pub use self::{
    cut_direction::CutDirection,
    events::{BasicEvent, ColorBoostEvent, KeywordFilter, Lightshow, WaypointEvent},
};

/// Position on the beat axis, with a lazily computed real-time cache.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timing {
    /// Musical position in beats.
    pub beat: f32,
    /// Real time in milliseconds, filled by [`crate::difficulty::DifficultyDocument::compute_milliseconds`].
    pub milliseconds: Option<f32>,
}

impl Timing {
    /// Creates a timing at `beat` with no real-time cache.
    #[must_use]
    pub const fn at(beat: f32) -> Self {
        Self {
            beat,
            milliseconds: None,
        }
    }
}

/// Position on the lane grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPosition {
    /// Lane index, counted from the left.
    pub x: i32,
    /// Layer index, counted from the bottom.
    pub y: i32,
}

impl GridPosition {
    /// Creates a position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A colored note to be cut.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    /// Self explanatory.
    pub timing: Timing,
    /// Self explanatory.
    pub position: GridPosition,
    /// Saber color, `0` for left and `1` for right.
    pub color: i32,
    /// Direction to cut.
    pub direction: CutDirection,
    /// Counter-clockwise rotation added to the direction, in degrees.
    pub angle_offset: f32,
    /// Rotation lane for 90/360 degree characteristics. Only V4 documents store it per note.
    pub rotation_lane: Option<i32>,
}

/// A bomb to be avoided.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bomb {
    /// Self explanatory.
    pub timing: Timing,
    /// Self explanatory.
    pub position: GridPosition,
    /// Rotation lane, only stored by V4 documents.
    pub rotation_lane: Option<i32>,
}

/// Wall type of the V2 schema, derived from layer and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WallType {
    /// Full height wall, `(y, h) = (0, 5)`.
    FullHeight = 0,
    /// Crouch wall, `(y, h) = (2, 3)`.
    Crouch = 1,
    /// Any other shape, which the V2 schema before `2.6.0` cannot express.
    Free = 2,
}

impl WallType {
    /// Derives the wall type from a layer and a height.
    #[must_use]
    pub const fn from_layer_height(y: i32, height: i32) -> Self {
        match (y, height) {
            (0, 5) => Self::FullHeight,
            (2, 3) => Self::Crouch,
            _ => Self::Free,
        }
    }

    /// The layer and height a V2 wall type stands for. [`WallType::Free`] falls back to a full height wall.
    #[must_use]
    pub const fn layer_height(self) -> (i32, i32) {
        match self {
            Self::Crouch => (2, 3),
            Self::FullHeight | Self::Free => (0, 5),
        }
    }

    /// Parses the integer stored in V2 documents.
    #[must_use]
    pub const fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::FullHeight,
            1 => Self::Crouch,
            _ => Self::Free,
        }
    }

    /// The integer stored in V2 documents.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }
}

/// A wall.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    /// Self explanatory.
    pub timing: Timing,
    /// Bottom-left corner.
    pub position: GridPosition,
    /// Length in beats.
    pub duration: f32,
    /// Width in lanes.
    pub width: i32,
    /// Height in layers.
    pub height: i32,
    /// Rotation lane, only stored by V4 documents.
    pub rotation_lane: Option<i32>,
}

impl Default for Obstacle {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            position: GridPosition::default(),
            duration: 0.0,
            width: 1,
            height: 5,
            rotation_lane: None,
        }
    }
}

impl Obstacle {
    /// The V2 wall type of this obstacle. Always recomputed from layer and height.
    #[must_use]
    pub const fn wall_type(&self) -> WallType {
        WallType::from_layer_height(self.position.y, self.height)
    }
}

/// The tail end of a slider.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SliderTail {
    /// Self explanatory.
    pub timing: Timing,
    /// Self explanatory.
    pub position: GridPosition,
    /// Rotation lane, only stored by V4 documents.
    pub rotation_lane: Option<i32>,
}

/// Head and tail shared by arcs and chains.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slider {
    /// The head, a note in every respect.
    pub head: Note,
    /// Self explanatory.
    pub tail: SliderTail,
}

/// An arc (called slider in V2/V3 documents).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arc {
    /// Self explanatory.
    pub slider: Slider,
    /// Head control point length multiplier.
    pub head_multiplier: f32,
    /// Tail control point length multiplier.
    pub tail_multiplier: f32,
    /// Mid-anchor mode.
    pub mid_anchor_mode: i32,
    /// Tail color. V2 and V3 documents store only one color for both ends.
    pub tail_color: i32,
    /// Tail cut direction.
    pub tail_direction: CutDirection,
}

/// A chain (called burst slider in V3 documents).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chain {
    /// Self explanatory.
    pub slider: Slider,
    /// Number of segments, including the head.
    pub segment_count: i32,
    /// Squish factor of the segment spacing.
    pub squish: f32,
}

impl Default for Chain {
    fn default() -> Self {
        Self {
            slider: Slider::default(),
            segment_count: 0,
            squish: 1.0,
        }
    }
}

/// A tempo change as stored in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BpmEvent {
    /// Position of the change in document beats.
    pub beat: f32,
    /// Tempo from this position on.
    pub bpm: f32,
}

/// Kinds of entity a document may hold, used to key the adapter matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    /// [`Note`]
    Note,
    /// [`Bomb`]
    Bomb,
    /// [`Obstacle`]
    Obstacle,
    /// [`Arc`]
    Arc,
    /// [`Chain`]
    Chain,
    /// [`BasicEvent`]
    BasicEvent,
    /// [`ColorBoostEvent`]
    ColorBoostEvent,
    /// [`WaypointEvent`]
    Waypoint,
    /// [`BpmEvent`]
    BpmEvent,
    /// [`KeywordFilter`]
    KeywordFilter,
}

impl EntityKind {
    /// All kinds.
    pub const ALL: [Self; 10] = [
        Self::Note,
        Self::Bomb,
        Self::Obstacle,
        Self::Arc,
        Self::Chain,
        Self::BasicEvent,
        Self::ColorBoostEvent,
        Self::Waypoint,
        Self::BpmEvent,
        Self::KeywordFilter,
    ];
}

/// A borrowed object of any kind which has a position on the beat axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BeatObject<'a> {
    /// Self explanatory.
    Note(&'a Note),
    /// Self explanatory.
    Bomb(&'a Bomb),
    /// Self explanatory.
    Obstacle(&'a Obstacle),
    /// Self explanatory.
    Arc(&'a Arc),
    /// Self explanatory.
    Chain(&'a Chain),
    /// Self explanatory.
    BasicEvent(&'a BasicEvent),
    /// Self explanatory.
    ColorBoostEvent(&'a ColorBoostEvent),
    /// Self explanatory.
    Waypoint(&'a WaypointEvent),
    /// Self explanatory.
    BpmEvent(&'a BpmEvent),
}

impl BeatObject<'_> {
    /// The beat where the object starts.
    #[must_use]
    pub const fn beat(&self) -> f32 {
        match self {
            Self::Note(note) => note.timing.beat,
            Self::Bomb(bomb) => bomb.timing.beat,
            Self::Obstacle(obstacle) => obstacle.timing.beat,
            Self::Arc(arc) => arc.slider.head.timing.beat,
            Self::Chain(chain) => chain.slider.head.timing.beat,
            Self::BasicEvent(event) => event.beat,
            Self::ColorBoostEvent(event) => event.beat,
            Self::Waypoint(event) => event.beat,
            Self::BpmEvent(event) => event.beat,
        }
    }

    /// The kind of the object.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Note(_) => EntityKind::Note,
            Self::Bomb(_) => EntityKind::Bomb,
            Self::Obstacle(_) => EntityKind::Obstacle,
            Self::Arc(_) => EntityKind::Arc,
            Self::Chain(_) => EntityKind::Chain,
            Self::BasicEvent(_) => EntityKind::BasicEvent,
            Self::ColorBoostEvent(_) => EntityKind::ColorBoostEvent,
            Self::Waypoint(_) => EntityKind::Waypoint,
            Self::BpmEvent(_) => EntityKind::BpmEvent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_type_is_derived() {
        let mut obstacle = Obstacle::default();
        assert_eq!(obstacle.wall_type(), WallType::FullHeight);
        obstacle.position.y = 2;
        obstacle.height = 3;
        assert_eq!(obstacle.wall_type(), WallType::Crouch);
        obstacle.height = 2;
        assert_eq!(obstacle.wall_type(), WallType::Free);
        obstacle.position.y = 0;
        obstacle.height = 3;
        assert_eq!(obstacle.wall_type(), WallType::Free);
    }

    #[test]
    fn beat_object_view() {
        let arc = Arc {
            slider: Slider {
                head: Note {
                    timing: Timing::at(4.0),
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };
        let object = BeatObject::Arc(&arc);
        assert_eq!(object.beat(), 4.0);
        assert_eq!(object.kind(), EntityKind::Arc);
    }
}
