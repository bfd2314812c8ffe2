//! Audio documents (`BPMInfo.dat` / `AudioData.dat`) of indexed maps, which carry the tempo track as sample-indexed segments. Read-only.

use serde_json::Value;

use crate::{
    ParseError, Result,
    bpm::BpmContext,
    entity::BpmEvent,
    json::{self, Object},
};

/// A span of samples covering a span of beats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BpmSegment {
    /// Start sample index.
    pub start_index: i32,
    /// End sample index.
    pub end_index: i32,
    /// Start beat.
    pub start_beat: i32,
    /// End beat.
    pub end_beat: i32,
}

impl BpmSegment {
    /// The tempo of this segment at `frequency` samples per second, or `None` if the segment is empty.
    #[must_use]
    pub fn bpm(&self, frequency: i32) -> Option<f32> {
        let samples = i64::from(self.end_index) - i64::from(self.start_index);
        let beats = i64::from(self.end_beat) - i64::from(self.start_beat);
        if frequency <= 0 || samples <= 0 || beats <= 0 {
            return None;
        }
        let minutes = samples as f32 / frequency as f32 / 60.0;
        Some(beats as f32 / minutes)
    }
}

/// Loudness of a span of samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LufsSegment {
    /// Start sample index.
    pub start_index: i32,
    /// End sample index.
    pub end_index: i32,
    /// Loudness.
    pub loudness: f32,
}

/// A parsed audio document.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AudioInfo {
    /// The raw version token.
    pub version: String,
    /// Self explanatory.
    pub song_checksum: String,
    /// Length of the song in samples.
    pub song_sample_count: i32,
    /// Samples per second.
    pub song_frequency: i32,
    /// Self explanatory.
    pub bpm_data: Vec<BpmSegment>,
    /// Self explanatory.
    pub lufs_data: Vec<LufsSegment>,
}

impl AudioInfo {
    /// Derives the tempo changes of the segments, one per segment at its start beat.
    ///
    /// Segments which span no samples or no beats are skipped with a warning.
    #[must_use]
    pub fn bpm_events(&self) -> Vec<BpmEvent> {
        self.bpm_data
            .iter()
            .filter_map(|segment| {
                let Some(bpm) = segment.bpm(self.song_frequency) else {
                    log::warn!("skipping degenerate bpm segment {segment:?}");
                    return None;
                };
                Some(BpmEvent {
                    beat: segment.start_beat as f32,
                    bpm,
                })
            })
            .collect()
    }

    /// Builds the tempo context of the song from its segments.
    ///
    /// The tempo of the first segment is the base tempo. `default_bpm` is used only when no segment yields a tempo.
    #[must_use]
    pub fn to_bpm_context(&self, default_bpm: f32, offset: f32) -> BpmContext {
        let events = self.bpm_events();
        let bpm = events.first().map_or(default_bpm, |event| event.bpm);
        BpmContext::new(bpm, &events, offset)
    }
}

/// Parses an audio document.
///
/// The version token is kept as is and not checked against known revisions.
///
/// # Errors
///
/// Returns an error if the text is not JSON or the root is not an object.
pub fn parse_audio_info(source: &str) -> Result<AudioInfo> {
    let Value::Object(root) = serde_json::from_str::<Value>(source)? else {
        return Err(ParseError::NotAnObject);
    };
    Ok(read(&root))
}

fn read(root: &Object) -> AudioInfo {
    AudioInfo {
        version: json::get_string(root, "version"),
        song_checksum: json::get_string(root, "songChecksum"),
        song_sample_count: json::get_i32(root, "songSampleCount", 0),
        song_frequency: json::get_i32(root, "songFrequency", 0),
        bpm_data: json::objects(root, "bpmData")
            .map(|segment| BpmSegment {
                start_index: json::get_i32(segment, "si", 0),
                end_index: json::get_i32(segment, "ei", 0),
                start_beat: json::get_i32(segment, "sb", 0),
                end_beat: json::get_i32(segment, "eb", 0),
            })
            .collect(),
        lufs_data: json::objects(root, "lufsData")
            .map(|segment| LufsSegment {
                start_index: json::get_i32(segment, "si", 0),
                end_index: json::get_i32(segment, "ei", 0),
                loudness: json::get_f32(segment, "l", 0.0),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_tempo() {
        // 44100 Hz, 2 seconds, 4 beats.
        let segment = BpmSegment {
            start_index: 0,
            end_index: 88200,
            start_beat: 0,
            end_beat: 4,
        };
        assert!((segment.bpm(44100).unwrap() - 120.0).abs() < 1e-3);
        assert_eq!(segment.bpm(0), None);
        let empty = BpmSegment {
            end_index: 0,
            ..segment
        };
        assert_eq!(empty.bpm(44100), None);

        let huge = BpmSegment {
            start_index: i32::MIN,
            end_index: i32::MAX,
            start_beat: i32::MIN,
            end_beat: i32::MAX,
        };
        assert!(huge.bpm(44100).is_some_and(f32::is_finite));
        let reversed = BpmSegment {
            start_index: i32::MAX,
            end_index: i32::MIN,
            ..huge
        };
        assert_eq!(reversed.bpm(44100), None);
    }

    #[test]
    fn base_tempo_comes_from_first_segment() {
        let info = AudioInfo {
            song_frequency: 44100,
            bpm_data: vec![BpmSegment {
                start_index: 0,
                end_index: 88200,
                start_beat: 0,
                end_beat: 4,
            }],
            ..AudioInfo::default()
        };
        assert!((info.to_bpm_context(100.0, 0.0).bpm() - 120.0).abs() < 1e-3);
        assert!((AudioInfo::default().to_bpm_context(100.0, 0.0).bpm() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_segments_are_skipped() {
        let info = parse_audio_info(
            r#"{
                "version": "4.0.0",
                "songFrequency": 44100,
                "bpmData": [
                    { "si": 0, "ei": 88200, "sb": 0, "eb": 4 },
                    { "si": 88200, "ei": 88200, "sb": 4, "eb": 4 },
                    { "si": 88200, "ei": 132300, "sb": 4, "eb": 7 }
                ]
            }"#,
        )
        .unwrap();
        let events = info.bpm_events();
        assert_eq!(events.len(), 2);
        assert!((events[1].beat - 4.0).abs() < 1e-6);
        assert!((events[1].bpm - 180.0).abs() < 1e-3);
    }
}
