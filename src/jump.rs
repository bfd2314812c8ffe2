//! Jump metrics of a difficulty: how far ahead notes spawn and how long the player has to react.

/// Note jump speed used when the document stores none.
pub const DEFAULT_NOTE_JUMP_SPEED: f32 = 10.0;

const MAX_HALF_JUMP_DISTANCE: f32 = 17.999;
const MIN_HALF_JUMP_BEATS: f32 = 0.25;

fn effective_njs(njs: f32) -> f32 {
    if njs <= 0.01 {
        DEFAULT_NOTE_JUMP_SPEED
    } else {
        njs
    }
}

/// Half jump duration in beats, after applying the start beat `offset`.
///
/// The base duration of 4 beats is halved until the half jump distance fits, and the result never drops below a quarter beat.
#[must_use]
pub fn half_jump_beats(bpm: f32, njs: f32, offset: f32) -> f32 {
    let seconds_per_beat = 60.0 / bpm;
    let njs = effective_njs(njs);
    let mut half_jump = 4.0;
    while njs * seconds_per_beat * half_jump > MAX_HALF_JUMP_DISTANCE {
        half_jump /= 2.0;
    }
    (half_jump + offset).max(MIN_HALF_JUMP_BEATS)
}

/// Jump distance in world units.
#[must_use]
pub fn jump_distance(bpm: f32, njs: f32, offset: f32) -> f32 {
    effective_njs(njs) * (60.0 / bpm) * half_jump_beats(bpm, njs, offset) * 2.0
}

/// Reaction time in milliseconds for a jump distance. Zero when `njs` is zero.
#[must_use]
pub fn reaction_time_ms(njs: f32, jump_distance: f32) -> f32 {
    if njs.abs() < 0.001 {
        0.0
    } else {
        jump_distance / (njs * 2.0) * 1000.0
    }
}
