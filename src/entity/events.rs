//! Lighting and utility events.

use super::GridPosition;

/// A basic lighting (or utility) event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicEvent {
    /// Self explanatory.
    pub beat: f32,
    /// Event type, selecting the light group or the utility behavior.
    pub event_type: i32,
    /// Integer payload.
    pub value: i32,
    /// Float payload, usually the brightness. Written to V2 documents only from `2.5.0`.
    pub float_value: f32,
}

/// Switches between the primary and the boost color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorBoostEvent {
    /// Self explanatory.
    pub beat: f32,
    /// Whether the boost colors are used from this beat on.
    pub boost: bool,
}

/// A waypoint for the player's position in 90/360 degree characteristics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaypointEvent {
    /// Self explanatory.
    pub beat: f32,
    /// Self explanatory.
    pub position: GridPosition,
    /// Offset direction.
    pub offset_direction: i32,
}

/// Maps a keyword to the special event types it enables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeywordFilter {
    /// Self explanatory.
    pub keyword: String,
    /// Event types enabled by the keyword.
    pub event_types: Vec<i32>,
}

/// Events of a difficulty (V2/V3) or of a separate lightshow document (V4).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lightshow {
    /// Self explanatory.
    pub basic_events: Vec<BasicEvent>,
    /// Self explanatory.
    pub color_boost_events: Vec<ColorBoostEvent>,
    /// Self explanatory.
    pub waypoints: Vec<WaypointEvent>,
    /// Special event keyword filters.
    pub keyword_filters: Vec<KeywordFilter>,
}

impl Lightshow {
    /// Whether no event nor filter is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.basic_events.is_empty()
            && self.color_boost_events.is_empty()
            && self.waypoints.is_empty()
            && self.keyword_filters.is_empty()
    }
}
