//! Difficulty documents: the unified object lists and their assembly from and into each schema family.
//!
//! Parsing dispatches on the resolved revision to the assembler of its schema family, which walks the top-level arrays of that wire shape. Writing takes one of two strategies:
//!
//! - [`DifficultyDocument::to_value`] patches a clone of the parsed document, so every field this crate does not model is kept. Only legacy and mid revisions can be patched.
//! - [`DifficultyDocument::rebuild_indexed`] builds every object array and data table of an indexed document from scratch.

mod v2;
mod v3;
mod v4;

use serde_json::Value;

use crate::{
    ParseError, Result, WriteError,
    bpm::BpmContext,
    entity::{Arc, BeatObject, Bomb, BpmEvent, Chain, Lightshow, Note, Obstacle},
    json::Object,
    revision::{self, BeatmapRevision, SchemaFamily},
};

/// A parsed difficulty, independent of the revision it was stored in.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DifficultyDocument {
    /// Revision of the source document, and of any document written from this one.
    pub revision: BeatmapRevision,
    /// Tempo changes as stored in the document.
    pub bpm_events: Vec<BpmEvent>,
    /// Self explanatory.
    pub notes: Vec<Note>,
    /// Self explanatory.
    pub bombs: Vec<Bomb>,
    /// Self explanatory.
    pub obstacles: Vec<Obstacle>,
    /// Self explanatory.
    pub arcs: Vec<Arc>,
    /// Self explanatory.
    pub chains: Vec<Chain>,
    /// Lighting events. Indexed difficulties keep them in a separate document, see [`parse_lightshow`].
    pub lightshow: Lightshow,
    #[cfg_attr(feature = "serde", serde(skip))]
    original: Option<Object>,
}

impl DifficultyDocument {
    /// Creates an empty document of `revision`, with no original to patch.
    #[must_use]
    pub fn new(revision: BeatmapRevision) -> Self {
        Self {
            revision,
            bpm_events: Vec::new(),
            notes: Vec::new(),
            bombs: Vec::new(),
            obstacles: Vec::new(),
            arcs: Vec::new(),
            chains: Vec::new(),
            lightshow: Lightshow::default(),
            original: None,
        }
    }

    /// Parses a document tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree is not an object or its revision is unknown. Malformed objects never fail, their fields fall back to defaults.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(root) = value else {
            return Err(ParseError::NotAnObject);
        };
        let revision = revision::resolve_revision(&root)?;
        let mut document = Self::new(revision);
        match revision.family() {
            SchemaFamily::Legacy => v2::read(&root, &mut document),
            SchemaFamily::Mid => v3::read(&root, &mut document),
            SchemaFamily::Indexed => v4::read(&root, &mut document),
        }
        document.original = Some(root);
        Ok(document)
    }

    /// The document tree this one was parsed from.
    #[must_use]
    pub const fn original(&self) -> Option<&Object> {
        self.original.as_ref()
    }

    /// Writes the document by patching a clone of the original tree.
    ///
    /// Only the arrays owned by this crate and the version are replaced. Notes and bombs sharing one legacy array are merged in beat order.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::UnsupportedWriteTarget`] for an indexed revision, which must be written with [`DifficultyDocument::rebuild_indexed`].
    pub fn to_value(&self) -> std::result::Result<Value, WriteError> {
        let empty = Object::new();
        let base = self.original.as_ref().unwrap_or(&empty);
        let patch = match self.revision.family() {
            SchemaFamily::Legacy => v2::patch(self, base),
            SchemaFamily::Mid => v3::patch(self),
            SchemaFamily::Indexed => {
                return Err(WriteError::UnsupportedWriteTarget {
                    revision: self.revision,
                    reason: "indexed documents cannot be patched, rebuild them instead",
                });
            }
        };
        Ok(Value::Object(patch.merge_into(base)))
    }

    /// Writes the document as compact JSON text, see [`DifficultyDocument::to_value`].
    ///
    /// # Errors
    ///
    /// Same as [`DifficultyDocument::to_value`].
    pub fn to_json_string(&self) -> std::result::Result<String, WriteError> {
        Ok(serde_json::to_string(&self.to_value()?)?)
    }

    /// Writes an indexed document, rebuilding every object array and data table.
    ///
    /// Top-level fields other than those are taken from the original tree. Lighting is not written.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::UnsupportedWriteTarget`] for a legacy or mid revision.
    pub fn rebuild_indexed(&self) -> std::result::Result<Value, WriteError> {
        if self.revision.family() != SchemaFamily::Indexed {
            return Err(WriteError::UnsupportedWriteTarget {
                revision: self.revision,
                reason: "only indexed documents have data tables to rebuild",
            });
        }
        let empty = Object::new();
        let base = self.original.as_ref().unwrap_or(&empty);
        Ok(Value::Object(v4::rebuild(self).merge_into(base)))
    }

    /// Creates the tempo context of this difficulty from the song's base tempo and time offset in seconds.
    #[must_use]
    pub fn bpm_context(&self, bpm: f32, offset: f32) -> BpmContext {
        BpmContext::new(bpm, &self.bpm_events, offset)
    }

    /// Iterates every object placed on the beat axis, grouped by kind.
    pub fn beat_objects(&self) -> impl Iterator<Item = BeatObject<'_>> {
        let Lightshow {
            basic_events,
            color_boost_events,
            waypoints,
            keyword_filters: _,
        } = &self.lightshow;
        self.notes
            .iter()
            .map(BeatObject::Note)
            .chain(self.bombs.iter().map(BeatObject::Bomb))
            .chain(self.obstacles.iter().map(BeatObject::Obstacle))
            .chain(self.arcs.iter().map(BeatObject::Arc))
            .chain(self.chains.iter().map(BeatObject::Chain))
            .chain(basic_events.iter().map(BeatObject::BasicEvent))
            .chain(color_boost_events.iter().map(BeatObject::ColorBoostEvent))
            .chain(waypoints.iter().map(BeatObject::Waypoint))
            .chain(self.bpm_events.iter().map(BeatObject::BpmEvent))
    }

    /// Fills the real-time cache of every note, bomb, obstacle and slider end.
    pub fn compute_milliseconds(&mut self, context: &BpmContext) {
        let to_ms = |beat: f32| context.beat_to_real_time(beat, true) * 1000.0;
        for note in &mut self.notes {
            note.timing.milliseconds = Some(to_ms(note.timing.beat));
        }
        for bomb in &mut self.bombs {
            bomb.timing.milliseconds = Some(to_ms(bomb.timing.beat));
        }
        for obstacle in &mut self.obstacles {
            obstacle.timing.milliseconds = Some(to_ms(obstacle.timing.beat));
        }
        let sliders = self
            .arcs
            .iter_mut()
            .map(|arc| &mut arc.slider)
            .chain(self.chains.iter_mut().map(|chain| &mut chain.slider));
        for slider in sliders {
            slider.head.timing.milliseconds = Some(to_ms(slider.head.timing.beat));
            slider.tail.timing.milliseconds = Some(to_ms(slider.tail.timing.beat));
        }
    }
}

/// Parses a difficulty document.
///
/// # Errors
///
/// Returns an error if the text is not JSON, the root is not an object or the revision is unknown.
pub fn parse_difficulty(source: &str) -> Result<DifficultyDocument> {
    let value: Value = serde_json::from_str(source)?;
    DifficultyDocument::from_value(value)
}

/// Parses the lighting events of a document.
///
/// For indexed revisions this is the separate lightshow document. For older ones the events are part of the difficulty document itself.
///
/// # Errors
///
/// Same as [`parse_difficulty`].
pub fn parse_lightshow(source: &str) -> Result<Lightshow> {
    let Value::Object(root) = serde_json::from_str::<Value>(source)? else {
        return Err(ParseError::NotAnObject);
    };
    let revision = revision::resolve_revision(&root)?;
    Ok(match revision.family() {
        SchemaFamily::Legacy => v2::read_lightshow(&root, revision).0,
        SchemaFamily::Mid => v3::read_lightshow(&root),
        SchemaFamily::Indexed => v4::read_lightshow(&root),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityKind, Timing};

    #[test]
    fn rejects_non_object_and_unknown_revision() {
        assert!(matches!(parse_difficulty("[1, 2]"), Err(ParseError::NotAnObject)));
        assert!(matches!(parse_difficulty("{ \"colorNotes\": [] }"), Err(ParseError::MissingVersion)));
        assert!(matches!(
            parse_difficulty("{ \"version\": \"9.9.9\" }"),
            Err(ParseError::UnrecognizedRevision(_))
        ));
        assert!(matches!(parse_difficulty("{"), Err(ParseError::Json(_))));
    }

    #[test]
    fn write_strategies_by_family() {
        let indexed = DifficultyDocument::new(BeatmapRevision::V400);
        assert!(matches!(
            indexed.to_value(),
            Err(WriteError::UnsupportedWriteTarget { revision: BeatmapRevision::V400, .. })
        ));
        assert!(indexed.rebuild_indexed().is_ok());

        let mid = DifficultyDocument::new(BeatmapRevision::V330);
        assert!(mid.to_value().is_ok());
        assert!(matches!(
            mid.rebuild_indexed(),
            Err(WriteError::UnsupportedWriteTarget { .. })
        ));
    }

    #[test]
    fn milliseconds_cache() {
        let mut document = DifficultyDocument::new(BeatmapRevision::V330);
        document.notes.push(Note {
            timing: Timing::at(4.0),
            ..Default::default()
        });
        document.arcs.push(Arc::default());
        document.arcs[0].slider.tail.timing = Timing::at(2.0);
        let context = document.bpm_context(120.0, 0.0);
        document.compute_milliseconds(&context);
        assert_eq!(document.notes[0].timing.milliseconds, Some(2000.0));
        assert_eq!(document.arcs[0].slider.head.timing.milliseconds, Some(0.0));
        assert_eq!(document.arcs[0].slider.tail.timing.milliseconds, Some(1000.0));

        let kinds: Vec<_> = document.beat_objects().map(|object| object.kind()).collect();
        assert_eq!(kinds, [EntityKind::Note, EntityKind::Arc]);
    }
}
