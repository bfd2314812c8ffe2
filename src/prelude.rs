//! Crate prelude
//!
//! This module re-exports the commonly used types and functions, so that users can import all needed items in one go.

// Re-export errors
pub use crate::{ParseError, WriteError};

// Re-export revisions
pub use crate::revision::{BeatmapRevision, InfoRevision, SchemaFamily};

// Re-export entity types
pub use crate::entity::{
    Arc, BasicEvent, BeatObject, Bomb, BpmEvent, Chain, ColorBoostEvent, CutDirection, EntityKind,
    GridPosition, KeywordFilter, Lightshow, Note, Obstacle, Slider, SliderTail, Timing, WallType,
    WaypointEvent,
};

// Re-export documents and their parsers
pub use crate::{
    audio::{AudioInfo, BpmSegment, LufsSegment, parse_audio_info},
    difficulty::{DifficultyDocument, parse_difficulty, parse_lightshow},
    info::{
        AudioData, BeatmapAuthors, Contributor, DifficultyInfo, DifficultyRank, SongInfo,
        parse_song_info,
    },
    loader::{LoadError, LoadedMap, load_map_from_directory},
};

// Re-export timing
pub use crate::bpm::{BpmChangeEvent, BpmContext, TempoCursor, TimeScale};

pub use crate::adapter::{Support, support};
