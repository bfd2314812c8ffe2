//! Song info documents (`Info.dat`), listing the song metadata and the difficulties of a map. Read-only.

use std::{fmt, str::FromStr};

use serde_json::Value;

use crate::{
    ParseError, Result,
    json::{self, Object},
    jump,
    revision::{self, InfoRevision},
};

/// Rank of a difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DifficultyRank {
    /// Self explanatory.
    Easy = 1,
    /// Self explanatory.
    Normal = 3,
    /// Self explanatory.
    Hard = 5,
    /// Self explanatory.
    Expert = 7,
    /// Self explanatory.
    #[default]
    ExpertPlus = 9,
}

impl DifficultyRank {
    /// All ranks in ascending order.
    pub const ALL: [Self; 5] = [
        Self::Easy,
        Self::Normal,
        Self::Hard,
        Self::Expert,
        Self::ExpertPlus,
    ];

    /// Converts the `_difficultyRank` integer of legacy documents. Unknown values fall back to [`DifficultyRank::ExpertPlus`].
    #[must_use]
    pub fn from_i32(value: i32) -> Self {
        Self::ALL
            .into_iter()
            .find(|rank| rank.as_i32() == value)
            .unwrap_or_default()
    }

    /// Self explanatory.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// The difficulty name, as written in indexed documents.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Normal => "Normal",
            Self::Hard => "Hard",
            Self::Expert => "Expert",
            Self::ExpertPlus => "ExpertPlus",
        }
    }

    /// Finds the rank named `name`, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|rank| rank.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for DifficultyRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error of parsing a [`DifficultyRank`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty name: {0:?}")]
pub struct UnknownDifficultyName(pub String);

impl FromStr for DifficultyRank {
    type Err = UnknownDifficultyName;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownDifficultyName(s.to_owned()))
    }
}

/// Song audio metadata.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AudioData {
    /// Self explanatory.
    pub song_filename: String,
    /// Duration in seconds, only stored by indexed documents.
    pub song_duration: f32,
    /// File name of the audio document, only stored by indexed documents.
    pub audio_data_filename: String,
    /// Base tempo of the song.
    pub bpm: f32,
    /// Loudness, only stored by indexed documents.
    pub lufs: f32,
    /// Preview start in seconds.
    pub preview_start_time: f32,
    /// Preview length in seconds.
    pub preview_duration: f32,
    /// Separate preview audio file, only stored by indexed documents.
    pub song_preview_filename: String,
}

/// Mappers and lighters of a difficulty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BeatmapAuthors {
    /// Self explanatory.
    pub mappers: Vec<String>,
    /// Self explanatory.
    pub lighters: Vec<String>,
}

/// A difficulty listed by the song info.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DifficultyInfo {
    /// Characteristic name such as `Standard` or `Lawless`.
    pub characteristic: String,
    /// Difficulty name such as `ExpertPlus`.
    pub difficulty: String,
    /// Custom label, empty if none.
    pub label: String,
    /// Self explanatory.
    pub rank: DifficultyRank,
    /// Only stored by indexed documents.
    pub authors: BeatmapAuthors,
    /// Index into the environment names.
    pub environment_name_index: i32,
    /// Index into the color schemes.
    pub color_scheme_index: i32,
    /// Note jump speed.
    pub note_jump_speed: f32,
    /// Note jump start beat offset.
    pub note_jump_offset: f32,
    /// File name of the difficulty document.
    pub beatmap_filename: String,
    /// File name of the lightshow document, only stored by indexed documents.
    pub lightshow_filename: String,
}

impl DifficultyInfo {
    /// Jump distance of this difficulty at `bpm`, see [`jump::jump_distance`].
    #[must_use]
    pub fn jump_distance(&self, bpm: f32) -> f32 {
        jump::jump_distance(bpm, self.note_jump_speed, self.note_jump_offset)
    }

    /// Reaction time of this difficulty at `bpm` in milliseconds, see [`jump::reaction_time_ms`].
    #[must_use]
    pub fn reaction_time_ms(&self, bpm: f32) -> f32 {
        jump::reaction_time_ms(self.note_jump_speed, self.jump_distance(bpm))
    }
}

/// A contributor listed in the custom data of legacy documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contributor {
    /// Self explanatory.
    pub name: String,
    /// Self explanatory.
    pub role: String,
    /// Self explanatory.
    pub icon_path: String,
}

/// A parsed song info document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SongInfo {
    /// Self explanatory.
    pub revision: InfoRevision,
    /// Self explanatory.
    pub song_name: String,
    /// Self explanatory.
    pub song_sub_name: String,
    /// Song artist.
    pub song_author: String,
    /// Level author for legacy documents, the first mapper of the first difficulty otherwise.
    pub mapper: String,
    /// Self explanatory.
    pub audio: AudioData,
    /// Song time offset in seconds, only stored by legacy documents.
    pub song_time_offset: f32,
    /// Only stored by legacy documents.
    pub shuffle: f32,
    /// Only stored by legacy documents.
    pub shuffle_period: f32,
    /// Self explanatory.
    pub cover_image_filename: String,
    /// Only stored by legacy documents.
    pub environment_name: String,
    /// Only stored by legacy documents.
    pub all_directions_environment_name: String,
    /// Self explanatory.
    pub environment_names: Vec<String>,
    /// Difficulties in document order, across all characteristics.
    pub difficulties: Vec<DifficultyInfo>,
    /// Self explanatory.
    pub contributors: Vec<Contributor>,
}

impl SongInfo {
    fn empty(revision: InfoRevision) -> Self {
        Self {
            revision,
            song_name: String::new(),
            song_sub_name: String::new(),
            song_author: String::new(),
            mapper: String::new(),
            audio: AudioData::default(),
            song_time_offset: 0.0,
            shuffle: 0.0,
            shuffle_period: 0.0,
            cover_image_filename: String::new(),
            environment_name: String::new(),
            all_directions_environment_name: String::new(),
            environment_names: Vec::new(),
            difficulties: Vec::new(),
            contributors: Vec::new(),
        }
    }
}

/// Parses a song info document.
///
/// # Errors
///
/// Returns an error if the text is not JSON, the root is not an object or the revision is unknown.
pub fn parse_song_info(source: &str) -> Result<SongInfo> {
    let Value::Object(root) = serde_json::from_str::<Value>(source)? else {
        return Err(ParseError::NotAnObject);
    };
    let revision = revision::resolve_info_revision(&root)?;
    let mut info = if revision.is_legacy() {
        read_legacy(&root, revision)
    } else {
        read_indexed(&root, revision)
    };
    info.contributors = json::get_object(&root, "_customData")
        .map(|custom| {
            json::objects(custom, "_contributors")
                .map(|contributor| Contributor {
                    name: json::get_string(contributor, "_name"),
                    role: json::get_string(contributor, "_role"),
                    icon_path: json::get_string(contributor, "_iconPath"),
                })
                .collect()
        })
        .unwrap_or_default();
    Ok(info)
}

fn read_legacy(root: &Object, revision: InfoRevision) -> SongInfo {
    let mut info = SongInfo::empty(revision);
    info.song_name = json::get_string(root, "_songName");
    info.song_sub_name = json::get_string(root, "_songSubName");
    info.song_author = json::get_string(root, "_songAuthorName");
    info.mapper = json::get_string(root, "_levelAuthorName");
    info.audio = AudioData {
        song_filename: json::get_string(root, "_songFilename"),
        bpm: json::get_f32(root, "_beatsPerMinute", 0.0),
        preview_start_time: json::get_f32(root, "_previewStartTime", 0.0),
        preview_duration: json::get_f32(root, "_previewDuration", 0.0),
        ..Default::default()
    };
    info.song_time_offset = json::get_f32(root, "_songTimeOffset", 0.0);
    info.shuffle = json::get_f32(root, "_shuffle", 0.0);
    info.shuffle_period = json::get_f32(root, "_shufflePeriod", 0.0);
    info.cover_image_filename = json::get_string(root, "_coverImageFilename");
    info.environment_name = json::get_string(root, "_environmentName");
    info.all_directions_environment_name = json::get_string(root, "_allDirectionsEnvironmentName");
    info.environment_names = json::get_string_array(root, "_environmentNames");

    for set in json::objects(root, "_difficultyBeatmapSets") {
        let characteristic = json::get_string(set, "_beatmapCharacteristicName");
        for beatmap in json::objects(set, "_difficultyBeatmaps") {
            info.difficulties.push(DifficultyInfo {
                characteristic: characteristic.clone(),
                difficulty: json::get_string(beatmap, "_difficulty"),
                label: json::get_object(beatmap, "_customData")
                    .map(|custom| json::get_string(custom, "_difficultyLabel"))
                    .unwrap_or_default(),
                rank: DifficultyRank::from_i32(json::get_i32(beatmap, "_difficultyRank", 9)),
                authors: BeatmapAuthors::default(),
                environment_name_index: json::get_i32(beatmap, "_environmentNameIdx", 0),
                color_scheme_index: json::get_i32(beatmap, "_beatmapColorSchemeIdx", 0),
                note_jump_speed: json::get_f32(beatmap, "_noteJumpMovementSpeed", 10.0),
                note_jump_offset: json::get_f32(beatmap, "_noteJumpStartBeatOffset", 0.0),
                beatmap_filename: json::get_string(beatmap, "_beatmapFilename"),
                lightshow_filename: String::new(),
            });
        }
    }
    info
}

fn read_indexed(root: &Object, revision: InfoRevision) -> SongInfo {
    let empty = Object::new();
    let song = json::get_object(root, "song").unwrap_or(&empty);
    let audio = json::get_object(root, "audio").unwrap_or(&empty);

    let mut info = SongInfo::empty(revision);
    info.song_name = json::get_string(song, "title");
    info.song_sub_name = json::get_string(song, "subTitle");
    info.song_author = json::get_string(song, "author");
    info.audio = AudioData {
        song_filename: json::get_string(audio, "songFilename"),
        song_duration: json::get_f32(audio, "songDuration", 0.0),
        audio_data_filename: json::get_string(audio, "audioDataFilename"),
        bpm: json::get_f32(audio, "bpm", 0.0),
        lufs: json::get_f32(audio, "lufs", 0.0),
        preview_start_time: json::get_f32(audio, "previewStartTime", 0.0),
        preview_duration: json::get_f32(audio, "previewDuration", 0.0),
        song_preview_filename: json::get_string(root, "songPreviewFilename"),
    };
    info.cover_image_filename = json::get_string(root, "coverImageFilename");
    info.environment_names = json::get_string_array(root, "environmentNames");
    info.difficulties = json::objects(root, "difficultyBeatmaps")
        .map(|beatmap| {
            let difficulty = json::get_string(beatmap, "difficulty");
            let authors = json::get_object(beatmap, "beatmapAuthors")
                .map(|authors| BeatmapAuthors {
                    mappers: json::get_string_array(authors, "mappers"),
                    lighters: json::get_string_array(authors, "lighters"),
                })
                .unwrap_or_default();
            DifficultyInfo {
                characteristic: json::get_string(beatmap, "characteristic"),
                rank: DifficultyRank::from_name(&difficulty).unwrap_or_default(),
                difficulty,
                label: String::new(),
                authors,
                environment_name_index: json::get_i32(beatmap, "environmentNameIdx", 0),
                color_scheme_index: json::get_i32(beatmap, "beatmapColorSchemeIdx", 0),
                note_jump_speed: json::get_f32(beatmap, "noteJumpMovementSpeed", 10.0),
                note_jump_offset: json::get_f32(beatmap, "noteJumpStartBeatOffset", 0.0),
                beatmap_filename: json::get_string(beatmap, "beatmapDataFilename"),
                lightshow_filename: json::get_string(beatmap, "lightshowDataFilename"),
            }
        })
        .collect();
    info.mapper = info
        .difficulties
        .first()
        .and_then(|difficulty| difficulty.authors.mappers.first())
        .cloned()
        .unwrap_or_default();
    info
}
