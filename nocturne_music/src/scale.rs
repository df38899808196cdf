// The natural-minor scale table.
//
// All pitch material in a composition comes from one fixed scale: the
// natural minor built over the full 88-key piano range. Keys are numbered
// 0-87 (A0 = 0); a key is in the scale when its pitch class within the
// octave is one of {0, 2, 3, 5, 7, 8, 10}. The table lists the kept keys in
// ascending order, so generators work in scale-degree indices and never see
// raw semitones.
//
// Read-only shared data, computed once on first use. A MIDI pitch is
// table[degree] + 21 (A0 in MIDI) + transpose.

use crate::error::{MusicError, Result};
use std::sync::LazyLock;

/// MIDI note number of A0, the lowest piano key.
pub const MIDI_BASE: u8 = 21;

/// Number of keys on the piano.
const KEY_COUNT: u8 = 88;

/// Pitch classes (relative to A) that belong to the natural-minor scale.
const MINOR_CLASSES: [u8; 7] = [0, 2, 3, 5, 7, 8, 10];

/// Ascending key indices (0-87) of every natural-minor scale member.
static MINOR_SCALE: LazyLock<Vec<u8>> = LazyLock::new(|| {
    (0..KEY_COUNT)
        .filter(|key| MINOR_CLASSES.contains(&(key % 12)))
        .collect()
});

/// Number of scale degrees available. Degree ranges in the configuration
/// must stay below this.
pub fn degree_count() -> usize {
    MINOR_SCALE.len()
}

/// Resolve a scale-degree index to an absolute MIDI pitch.
///
/// Fails if the degree falls outside the table or the transposed pitch
/// escapes the MIDI range 0-127.
pub fn degree_to_pitch(degree: usize, transpose: i16) -> Result<u8> {
    let key = *MINOR_SCALE.get(degree).ok_or_else(|| {
        MusicError::invariant(format!(
            "scale degree {degree} outside table of {} entries",
            MINOR_SCALE.len()
        ))
    })?;

    let pitch = key as i16 + MIDI_BASE as i16 + transpose;
    if !(0..=127).contains(&pitch) {
        return Err(MusicError::invariant(format!(
            "degree {degree} with transpose {transpose} gives pitch {pitch}, outside 0-127"
        )));
    }
    Ok(pitch as u8)
}
