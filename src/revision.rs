//! Schema revisions of beatmap documents.
//!
//! Revisions are totally ordered by their chronological appearance, so "supported since" checks are plain comparisons:
//!
//! ```
//! use beatmap_rs::revision::BeatmapRevision;
//!
//! let revision: BeatmapRevision = "2.5.0".parse().unwrap();
//! assert!(revision >= BeatmapRevision::V240);
//! assert!(revision < BeatmapRevision::V260);
//! ```

use std::{fmt, str::FromStr};

use serde_json::{Map, Value};

use crate::ParseError;

/// Revision of a difficulty (or lightshow) document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum BeatmapRevision {
    /// `2.0.0`
    V200 = 1,
    /// `2.2.0`, adds waypoints.
    V220 = 2,
    /// `2.4.0`, adds special event keyword filters.
    V240 = 3,
    /// `2.5.0`, adds float values on events.
    V250 = 4,
    /// `2.6.0`, adds explicit obstacle layer/height and sliders.
    V260 = 5,
    /// `3.0.0`
    V300 = 6,
    /// `3.1.0`
    V310 = 7,
    /// `3.2.0`
    V320 = 8,
    /// `3.3.0`
    V330 = 9,
    /// `4.0.0`
    V400 = 10,
    /// `4.1.0`
    V410 = 11,
}

/// The wire shape shared by a group of revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchemaFamily {
    /// Underscore-prefixed keys, combined note array.
    Legacy,
    /// Short keys, one array per object type.
    Mid,
    /// Slim records referring into shared data tables.
    Indexed,
}

impl BeatmapRevision {
    /// All known revisions in ascending order.
    pub const ALL: [Self; 11] = [
        Self::V200,
        Self::V220,
        Self::V240,
        Self::V250,
        Self::V260,
        Self::V300,
        Self::V310,
        Self::V320,
        Self::V330,
        Self::V400,
        Self::V410,
    ];

    /// Finds the revision for a version token such as `"3.3.0"`.
    #[must_use]
    pub fn from_version_str(version: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|revision| revision.as_version_str() == version)
    }

    /// The version token written into documents of this revision.
    #[must_use]
    pub const fn as_version_str(self) -> &'static str {
        match self {
            Self::V200 => "2.0.0",
            Self::V220 => "2.2.0",
            Self::V240 => "2.4.0",
            Self::V250 => "2.5.0",
            Self::V260 => "2.6.0",
            Self::V300 => "3.0.0",
            Self::V310 => "3.1.0",
            Self::V320 => "3.2.0",
            Self::V330 => "3.3.0",
            Self::V400 => "4.0.0",
            Self::V410 => "4.1.0",
        }
    }

    /// Integer rank of the revision, strictly increasing with age.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// The wire shape used by this revision.
    #[must_use]
    pub const fn family(self) -> SchemaFamily {
        match self {
            Self::V200 | Self::V220 | Self::V240 | Self::V250 | Self::V260 => SchemaFamily::Legacy,
            Self::V300 | Self::V310 | Self::V320 | Self::V330 => SchemaFamily::Mid,
            Self::V400 | Self::V410 => SchemaFamily::Indexed,
        }
    }

    /// Whether this revision is `since` or newer.
    #[must_use]
    pub const fn supports_since(self, since: Self) -> bool {
        self.rank() >= since.rank()
    }
}

impl fmt::Display for BeatmapRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_version_str())
    }
}

impl FromStr for BeatmapRevision {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_version_str(s).ok_or_else(|| ParseError::UnrecognizedRevision(s.to_owned()))
    }
}

/// Revision of a song info document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum InfoRevision {
    /// `2.0.0`
    V200 = 1,
    /// `2.1.0`
    V210 = 2,
    /// `4.0.0`
    V400 = 3,
    /// `4.0.1`
    V401 = 4,
}

impl InfoRevision {
    /// All known revisions in ascending order.
    pub const ALL: [Self; 4] = [Self::V200, Self::V210, Self::V400, Self::V401];

    /// Finds the revision for a version token such as `"2.1.0"`.
    #[must_use]
    pub fn from_version_str(version: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|revision| revision.as_version_str() == version)
    }

    /// The version token of this revision.
    #[must_use]
    pub const fn as_version_str(self) -> &'static str {
        match self {
            Self::V200 => "2.0.0",
            Self::V210 => "2.1.0",
            Self::V400 => "4.0.0",
            Self::V401 => "4.0.1",
        }
    }

    /// Whether the document uses the underscore-prefixed V2 layout.
    #[must_use]
    pub const fn is_legacy(self) -> bool {
        matches!(self, Self::V200 | Self::V210)
    }
}

impl fmt::Display for InfoRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_version_str())
    }
}

impl FromStr for InfoRevision {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_version_str(s).ok_or_else(|| ParseError::UnrecognizedRevision(s.to_owned()))
    }
}

/// Reads the version token of a document from `version`, or from the legacy `_version` when `version` is absent.
///
/// A present `version` key always wins, so an empty token there is returned as is and fails to resolve.
///
/// # Errors
///
/// Returns [`ParseError::MissingVersion`] when neither key is present, or [`ParseError::UnrecognizedRevision`] when the token is not a string.
pub fn version_token(root: &Map<String, Value>) -> Result<&str, ParseError> {
    let value = ["version", "_version"]
        .into_iter()
        .find_map(|key| root.get(key).filter(|value| !value.is_null()))
        .ok_or(ParseError::MissingVersion)?;
    value
        .as_str()
        .ok_or_else(|| ParseError::UnrecognizedRevision(value.to_string()))
}

/// Resolves the difficulty revision of a document root.
///
/// # Errors
///
/// Returns [`ParseError::MissingVersion`] or [`ParseError::UnrecognizedRevision`].
pub fn resolve_revision(root: &Map<String, Value>) -> Result<BeatmapRevision, ParseError> {
    let token = version_token(root)?;
    let revision = token.parse::<BeatmapRevision>().inspect_err(|_| {
        log::warn!("unrecognized beatmap revision {token:?}");
    })?;
    log::debug!("resolved beatmap revision {revision}");
    Ok(revision)
}

/// Resolves the revision of a song info document root.
///
/// # Errors
///
/// Returns [`ParseError::MissingVersion`] or [`ParseError::UnrecognizedRevision`].
pub fn resolve_info_revision(root: &Map<String, Value>) -> Result<InfoRevision, ParseError> {
    let token = version_token(root)?;
    let revision = token.parse::<InfoRevision>().inspect_err(|_| {
        log::warn!("unrecognized info revision {token:?}");
    })?;
    log::debug!("resolved info revision {revision}");
    Ok(revision)
}
