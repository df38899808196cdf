// Timed event model shared by the generators and the MIDI encoder.
//
// A track is an ordered list of events: sounding notes and non-sounding
// markers. Time is implicit — each note advances the clock by its duration,
// markers take no time. Events are immutable values; passes that "modify"
// a stream (the dissonance filter) build a new one.
//
// Beat accounting is exact. One beat is 16 ticks, so every duration
// category contributes an integer tick count for any whole-number meter,
// and bar budgets can be compared with plain integer equality.

use serde::{Deserialize, Serialize};

/// Ticks per beat. 16 makes the shortest category (a sixteenth note in
/// common time) land on a whole tick for any integer beats-per-bar.
pub const TICKS_PER_BEAT: u32 = 16;

/// Note duration categories, as fractions of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Duration {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
}

impl Duration {
    /// Every category, largest first. This ordering drives both weighted
    /// sampling and the greedy bar-padding rule.
    pub const ALL: [Duration; 5] = [
        Duration::Whole,
        Duration::Half,
        Duration::Quarter,
        Duration::Eighth,
        Duration::Sixteenth,
    ];

    /// The bar fraction denominator: a half note is 2, a sixteenth is 16.
    pub fn denominator(self) -> u32 {
        match self {
            Duration::Whole => 1,
            Duration::Half => 2,
            Duration::Quarter => 4,
            Duration::Eighth => 8,
            Duration::Sixteenth => 16,
        }
    }

    /// Tick contribution of one note of this duration, in the given meter.
    /// Equals `beats_per_bar / denominator` beats, scaled to ticks.
    pub fn ticks(self, beats_per_bar: u32) -> u32 {
        beats_per_bar * (TICKS_PER_BEAT / self.denominator())
    }
}

/// One sounding note. Velocity 0 is a silenced note: it keeps its timing
/// slot but makes no sound (the dissonance filter's removal mechanism).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub duration: Duration,
    /// Absolute MIDI pitch, 0-127.
    pub pitch: u8,
    pub velocity: u8,
}

impl NoteEvent {
    pub fn is_silenced(&self) -> bool {
        self.velocity == 0
    }

    /// Copy of this note with its velocity zeroed.
    pub fn silenced(&self) -> NoteEvent {
        NoteEvent {
            velocity: 0,
            ..*self
        }
    }
}

/// A track element: a note, or a labeled timeline marker that takes no time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackEvent {
    Note(NoteEvent),
    Marker(String),
}

impl TrackEvent {
    /// How far this event advances the clock.
    pub fn ticks(&self, beats_per_bar: u32) -> u32 {
        match self {
            TrackEvent::Note(note) => note.duration.ticks(beats_per_bar),
            TrackEvent::Marker(_) => 0,
        }
    }
}

/// Total tick span of an event stream.
pub fn stream_ticks(events: &[TrackEvent], beats_per_bar: u32) -> u32 {
    events.iter().map(|e| e.ticks(beats_per_bar)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_contributions_in_common_time() {
        assert_eq!(Duration::Whole.ticks(4), 64);
        assert_eq!(Duration::Half.ticks(4), 32);
        assert_eq!(Duration::Quarter.ticks(4), 16);
        assert_eq!(Duration::Eighth.ticks(4), 8);
        assert_eq!(Duration::Sixteenth.ticks(4), 4);
    }

    #[test]
    fn ticks_are_integral_in_odd_meters() {
        // 16 ticks per beat keeps every category integral even in 3/4 or 5/4.
        for beats in 1..=7 {
            for d in Duration::ALL {
                assert_eq!(d.ticks(beats), beats * TICKS_PER_BEAT / d.denominator());
            }
        }
    }

    #[test]
    fn markers_take_no_time() {
        let events = vec![
            TrackEvent::Marker("intro".to_string()),
            TrackEvent::Note(NoteEvent {
                duration: Duration::Half,
                pitch: 60,
                velocity: 80,
            }),
            TrackEvent::Marker("outro".to_string()),
        ];
        assert_eq!(stream_ticks(&events, 4), 32);
    }

    #[test]
    fn silencing_preserves_timing() {
        let note = NoteEvent {
            duration: Duration::Quarter,
            pitch: 64,
            velocity: 90,
        };
        let silent = note.silenced();
        assert!(silent.is_silenced());
        assert_eq!(silent.duration, note.duration);
        assert_eq!(silent.pitch, note.pitch);
        // Silencing twice changes nothing.
        assert_eq!(silent.silenced(), silent);
    }
}
