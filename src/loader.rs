//! Loading a whole map from its directory.
//!
//! ```no_run
//! use beatmap_rs::loader::load_map_from_directory;
//!
//! let map = load_map_from_directory("maps/1a2b").unwrap();
//! for (difficulty, document) in &map.difficulties {
//!     match document {
//!         Ok(document) => println!("{}: {} notes", difficulty.difficulty, document.notes.len()),
//!         Err(err) => eprintln!("{}: {err}", difficulty.difficulty),
//!     }
//! }
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{
    ParseError,
    audio::{AudioInfo, parse_audio_info},
    difficulty::{DifficultyDocument, parse_difficulty},
    info::{DifficultyInfo, SongInfo, parse_song_info},
};

/// File name of the song info document, matched ignoring case.
pub const INFO_FILE_NAME: &str = "info.dat";

/// An error occurred when loading a map directory.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading a file or the directory failed.
    #[error("failed to read: {0}")]
    Io(#[from] std::io::Error),
    /// A document failed to parse.
    #[error("failed to parse: {0}")]
    Parse(#[from] ParseError),
    /// The directory has no song info document.
    #[error("no info.dat in {}", .0.display())]
    MissingInfo(PathBuf),
}

/// A map loaded from its directory.
#[derive(Debug)]
pub struct LoadedMap {
    /// The directory the map was loaded from.
    pub path: PathBuf,
    /// Self explanatory.
    pub info: SongInfo,
    /// Every listed difficulty with the result of loading its document.
    pub difficulties: Vec<(DifficultyInfo, Result<DifficultyDocument, LoadError>)>,
    /// The audio document, if the song info names one.
    pub audio: Option<Result<AudioInfo, LoadError>>,
}

impl LoadedMap {
    /// Successfully loaded difficulties.
    pub fn loaded_difficulties(&self) -> impl Iterator<Item = (&DifficultyInfo, &DifficultyDocument)> {
        self.difficulties
            .iter()
            .filter_map(|(info, document)| document.as_ref().ok().map(|document| (info, document)))
    }
}

/// Finds the song info document directly inside `dir`.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the directory cannot be listed.
pub fn find_info_file(dir: &Path) -> Result<Option<PathBuf>, LoadError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.eq_ignore_ascii_case(INFO_FILE_NAME))
        {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}

/// Loads the song info of `dir` and every difficulty it lists.
///
/// A difficulty or audio document which cannot be loaded does not fail the whole map. Its slot holds the error instead.
///
/// # Errors
///
/// Returns an error if the song info document is missing, unreadable or malformed.
pub fn load_map_from_directory(dir: impl AsRef<Path>) -> Result<LoadedMap, LoadError> {
    let dir = dir.as_ref();
    let info_path = find_info_file(dir)?.ok_or_else(|| LoadError::MissingInfo(dir.to_owned()))?;
    let info = parse_song_info(&fs::read_to_string(&info_path)?)?;
    log::debug!(
        "loaded {} listing {} difficulties",
        info_path.display(),
        info.difficulties.len()
    );

    let difficulties = info
        .difficulties
        .iter()
        .map(|difficulty| {
            let document = load_document(&dir.join(&difficulty.beatmap_filename), parse_difficulty);
            (difficulty.clone(), document)
        })
        .collect();
    let audio = (!info.audio.audio_data_filename.is_empty()).then(|| {
        load_document(
            &dir.join(&info.audio.audio_data_filename),
            parse_audio_info,
        )
    });

    Ok(LoadedMap {
        path: dir.to_owned(),
        info,
        difficulties,
        audio,
    })
}

fn load_document<T>(
    path: &Path,
    parse: fn(&str) -> crate::Result<T>,
) -> Result<T, LoadError> {
    let loaded = fs::read_to_string(path)
        .map_err(LoadError::from)
        .and_then(|source| Ok(parse(&source)?));
    if let Err(err) = &loaded {
        log::warn!("failed to load {}: {err}", path.display());
    }
    loaded
}
