//! The beatmap document (`.dat`) parser and writer.
//!
//! Beatmap documents have been stored in three incompatible schema families over time:
//!
//! - V2 (`2.x.x`): underscore-prefixed keys (`_time`, `_lineIndex`, ...), notes and bombs sharing one array, and tempo changes stored as special lighting events.
//! - V3 (`3.x.x`): short keys (`b`, `x`, `y`, ...) and a separate array per object type.
//! - V4 (`4.x.x`): slim timing records which refer by index into shared, de-duplicated data tables.
//!
//! Whatever the source revision, a difficulty is parsed into one [`difficulty::DifficultyDocument`]. Documents of V2 and V3 can be written back in their own wire shape by patching the parsed original, so that fields this crate does not model are kept. V4 documents are rebuilt from scratch instead, to keep their data tables de-duplicated.
//!
//! Timing queries over the parsed objects (beats, seconds, and the document's own time base) are answered by [`bpm::BpmContext`].
//!
//! # Example
//!
//! ```
//! use beatmap_rs::prelude::*;
//!
//! let source = r#"{
//!     "version": "3.3.0",
//!     "bpmEvents": [{ "b": 32, "m": 180 }],
//!     "colorNotes": [{ "b": 8, "x": 1, "y": 0, "c": 0, "d": 1, "a": 0 }]
//! }"#;
//! let document = parse_difficulty(source).unwrap();
//! assert_eq!(document.revision, BeatmapRevision::V330);
//! assert_eq!(document.notes.len(), 1);
//!
//! let context = document.bpm_context(120.0, 0.0);
//! assert_eq!(context.beat_to_real_time(32.0, true), 16.0);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod adapter;
pub mod audio;
pub mod bpm;
pub mod codec;
pub mod difficulty;
pub mod entity;
pub mod info;
pub mod json;
pub mod jump;
pub mod loader;
pub mod prelude;
pub mod revision;

use thiserror::Error;

use self::revision::BeatmapRevision;

/// An error occurred when parsing a beatmap document.
///
/// Malformed fields are never reported here, they fall back to their defaults instead.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ParseError {
    /// The source text was not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The top-level value was not a JSON object.
    #[error("document root must be an object")]
    NotAnObject,
    /// Neither `version` nor `_version` was present.
    #[error("document has no version field")]
    MissingVersion,
    /// The version token is not a known schema revision.
    #[error("unrecognized revision: {0:?}")]
    UnrecognizedRevision(String),
}

/// An error occurred when writing a beatmap document.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum WriteError {
    /// The document cannot be written in the requested way.
    #[error("cannot write revision {revision}: {reason}")]
    UnsupportedWriteTarget {
        /// The revision of the document which was going to be written.
        revision: BeatmapRevision,
        /// Why the write was rejected.
        reason: &'static str,
    },
    /// Serializing the document tree into text failed.
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The result type used in parsing.
pub type Result<T> = std::result::Result<T, ParseError>;
