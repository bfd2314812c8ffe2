//! Mappers between document fragments and typed objects, one per object kind and schema family.
//!
//! Every `decode_*` function is total: missing keys and values of the wrong type fall back to the field's default. Every `encode_*` function writes one fragment, or for [`v4`] a slim record plus the shapes it refers to.
//!
//! Which cells of the (kind, revision) matrix exist at all is answered by [`support`], which the document assemblers consult before reading or writing an array.

pub mod v2;
pub mod v3;
pub mod v4;

use crate::{
    entity::EntityKind,
    revision::{BeatmapRevision, SchemaFamily},
};

/// How far an object kind is supported by a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Support {
    /// Read on parse and written back.
    ReadWrite,
    /// Read on parse but never written.
    ReadOnly,
    /// The revision cannot store this kind of object.
    Unsupported,
}

impl Support {
    /// Whether objects of this kind are read.
    #[must_use]
    pub const fn readable(self) -> bool {
        matches!(self, Self::ReadWrite | Self::ReadOnly)
    }

    /// Whether objects of this kind are written.
    #[must_use]
    pub const fn writable(self) -> bool {
        matches!(self, Self::ReadWrite)
    }
}

/// Looks up the adapter matrix for `kind` in documents of `revision`.
#[must_use]
pub const fn support(kind: EntityKind, revision: BeatmapRevision) -> Support {
    use EntityKind as K;

    match revision.family() {
        SchemaFamily::Legacy => match kind {
            K::Note | K::Bomb | K::Obstacle | K::BasicEvent | K::ColorBoostEvent | K::BpmEvent => {
                Support::ReadWrite
            }
            K::Waypoint if revision.supports_since(BeatmapRevision::V220) => Support::ReadWrite,
            K::KeywordFilter if revision.supports_since(BeatmapRevision::V240) => Support::ReadWrite,
            K::Arc if revision.supports_since(BeatmapRevision::V260) => Support::ReadWrite,
            // Read at any revision, written only from the one which introduced them.
            K::Waypoint | K::KeywordFilter => Support::ReadOnly,
            K::Arc | K::Chain => Support::Unsupported,
        },
        SchemaFamily::Mid => Support::ReadWrite,
        SchemaFamily::Indexed => match kind {
            K::Note | K::Bomb | K::Obstacle | K::Arc | K::Chain => Support::ReadWrite,
            // Lighting lives in the separate lightshow document, tempo in the audio document.
            K::BasicEvent | K::ColorBoostEvent | K::Waypoint | K::KeywordFilter | K::BpmEvent => {
                Support::ReadOnly
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_cells() {
        assert_eq!(
            support(EntityKind::Chain, BeatmapRevision::V260),
            Support::Unsupported
        );
        assert_eq!(
            support(EntityKind::Arc, BeatmapRevision::V250),
            Support::Unsupported
        );
        assert_eq!(
            support(EntityKind::Arc, BeatmapRevision::V260),
            Support::ReadWrite
        );
        assert_eq!(
            support(EntityKind::Waypoint, BeatmapRevision::V200),
            Support::ReadOnly
        );
        assert_eq!(
            support(EntityKind::BasicEvent, BeatmapRevision::V400),
            Support::ReadOnly
        );
        assert_eq!(
            support(EntityKind::Chain, BeatmapRevision::V410),
            Support::ReadWrite
        );
    }

    #[test]
    fn every_mid_cell_is_read_write() {
        for revision in BeatmapRevision::ALL
            .into_iter()
            .filter(|revision| revision.family() == SchemaFamily::Mid)
        {
            for kind in EntityKind::ALL {
                assert!(support(kind, revision).writable(), "{kind:?} at {revision}");
            }
        }
    }

    #[test]
    fn notes_are_read_everywhere() {
        for revision in BeatmapRevision::ALL {
            assert!(support(EntityKind::Note, revision).readable());
        }
    }
}
