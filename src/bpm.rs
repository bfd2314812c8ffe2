//! Conversion between beats, real time and the document's own time base under tempo changes.
//!
//! A [`BpmContext`] is built once from a base tempo, the tempo changes of a document and the song time offset. It is immutable afterwards; the "tempo as of a beat" query is answered through a separate [`TempoCursor`] which the caller owns.
//!
//! ```
//! use beatmap_rs::{bpm::BpmContext, entity::BpmEvent};
//!
//! let context = BpmContext::new(120.0, &[BpmEvent { beat: 32.0, bpm: 180.0 }], 0.0);
//! assert_eq!(context.beat_to_real_time(32.0, true), 16.0);
//! assert!((context.beat_to_real_time(64.0, true) - (16.0 + 32.0 * 60.0 / 180.0)).abs() < 1e-4);
//! ```

use crate::entity::BpmEvent;

/// Epsilon subtracted before rounding normalized beats up, matching the game's snapping at segment boundaries.
const NORMALIZED_BEAT_EPSILON: f64 = 0.01;

/// A tempo change with its position in normalized beats.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BpmChangeEvent {
    /// Position of the change in document beats.
    pub beat: f32,
    /// Tempo from this position on.
    pub bpm: f32,
    /// Position of the change in the beat space of the preceding segment.
    pub normalized_beat: f32,
}

/// One breakpoint of the time-scale table.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeScale {
    /// Beat where the segment starts.
    pub beat: f32,
    /// Base tempo divided by the segment tempo.
    pub scale: f32,
}

/// Tempo context of a difficulty.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BpmContext {
    bpm: f32,
    offset: f32,
    changes: Vec<BpmChangeEvent>,
    time_scale: Vec<TimeScale>,
}

impl BpmContext {
    /// Creates a context from the base tempo, the tempo changes and the song time offset in seconds.
    ///
    /// The changes are sorted by beat, keeping the order of changes at the same beat.
    #[must_use]
    pub fn new(bpm: f32, events: &[BpmEvent], offset: f32) -> Self {
        let mut events = events.to_vec();
        events.sort_by(|a, b| a.beat.total_cmp(&b.beat));

        let mut changes: Vec<BpmChangeEvent> = Vec::with_capacity(events.len());
        for event in &events {
            let unrounded = match changes.last() {
                Some(prev) => f64::from((event.beat - prev.beat) / bpm * prev.bpm + prev.normalized_beat),
                None => f64::from(event.beat - offset * bpm / 60.0),
            };
            changes.push(BpmChangeEvent {
                beat: event.beat,
                bpm: event.bpm,
                normalized_beat: (unrounded - NORMALIZED_BEAT_EPSILON).ceil() as f32,
            });
        }
        let time_scale = events
            .iter()
            .map(|event| TimeScale {
                beat: event.beat,
                scale: bpm / event.bpm,
            })
            .collect();

        Self {
            bpm,
            offset,
            changes,
            time_scale,
        }
    }

    /// Base tempo.
    #[must_use]
    pub const fn bpm(&self) -> f32 {
        self.bpm
    }

    /// Song time offset in seconds.
    #[must_use]
    pub const fn offset(&self) -> f32 {
        self.offset
    }

    /// Tempo changes sorted by beat, with their normalized beats.
    #[must_use]
    pub fn changes(&self) -> &[BpmChangeEvent] {
        &self.changes
    }

    /// The time-scale table, sorted by beat.
    #[must_use]
    pub fn time_scale(&self) -> &[TimeScale] {
        &self.time_scale
    }

    /// Converts beats into seconds.
    ///
    /// Without `apply_timescale` the base tempo is used throughout. With it, every segment after a tempo change is stretched by its scale, walking from the last change back to the first.
    #[must_use]
    pub fn beat_to_real_time(&self, beat: f32, apply_timescale: bool) -> f32 {
        if !apply_timescale {
            return beat / self.bpm * 60.0;
        }
        let mut beat = beat;
        let mut calculated = 0.0;
        for scale in self.time_scale.iter().rev() {
            if beat > scale.beat {
                calculated += (beat - scale.beat) * scale.scale;
                beat = scale.beat;
            }
        }
        (beat + calculated) / self.bpm * 60.0
    }

    /// Converts seconds into beats, the inverse of [`BpmContext::beat_to_real_time`].
    ///
    /// With `apply_timescale`, each breakpoint is first converted into seconds, and the remainder past it is scaled back before the final linear conversion.
    #[must_use]
    pub fn real_time_to_beat(&self, seconds: f32, apply_timescale: bool) -> f32 {
        if !apply_timescale {
            return seconds * self.bpm / 60.0;
        }
        let mut seconds = seconds;
        let mut calculated = 0.0;
        for scale in self.time_scale.iter().rev() {
            let breakpoint = self.beat_to_real_time(scale.beat, true);
            if seconds > breakpoint {
                calculated += (seconds - breakpoint) / scale.scale;
                seconds = breakpoint;
            }
        }
        self.real_time_to_beat(seconds + calculated, false)
    }

    /// Converts beats into the time base the document itself stores.
    ///
    /// Past the normalized beat of a tempo change, the beat is interpolated in that change's segment. Before any change, the song time offset is applied instead.
    #[must_use]
    pub fn to_document_time(&self, beat: f32) -> f32 {
        self.changes
            .iter()
            .rev()
            .find(|change| beat > change.normalized_beat)
            .map_or_else(
                || self.real_time_to_beat(self.beat_to_real_time(beat, false) + self.offset, false),
                |change| (beat - change.normalized_beat) / change.bpm * self.bpm + change.beat,
            )
    }

    /// Creates a cursor at the base tempo.
    #[must_use]
    pub const fn tempo_cursor(&self) -> TempoCursor {
        TempoCursor { bpm: self.bpm }
    }

    /// Moves `cursor` to the tempo of the last change strictly before `beat`.
    ///
    /// If no change lies before `beat` the cursor keeps its tempo.
    pub fn update_current_tempo(&self, cursor: &mut TempoCursor, beat: f32) {
        if let Some(change) = self.changes.iter().rev().find(|change| beat > change.beat) {
            cursor.bpm = change.bpm;
        }
    }
}

/// The tempo "as of" some beat, tracked by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoCursor {
    bpm: f32,
}

impl TempoCursor {
    /// Creates a cursor at `bpm`.
    #[must_use]
    pub const fn new(bpm: f32) -> Self {
        Self { bpm }
    }

    /// The tracked tempo.
    #[must_use]
    pub const fn bpm(&self) -> f32 {
        self.bpm
    }
}
