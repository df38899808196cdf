// The two hand generators.
//
// Left hand: a chord progression. One root degree per bar (the first is the
// configured tonic, the rest drawn from the left-hand range, skipping the
// scale's 2nd degree), each root expanded through a randomly chosen
// accompaniment shape of duration/interval pairs spanning exactly one bar.
//
// Right hand: a melody. The rhythm sampler fixes the durations, then each
// note gets a uniform degree from the right-hand range with a bounded
// anti-repetition rule so the line never sits on one pitch.

use crate::config::SongConfig;
use crate::error::Result;
use crate::event::{Duration, NoteEvent, TrackEvent};
use crate::rhythm::sample_durations;
use crate::scale::degree_to_pitch;
use nocturne_prng::SongRng;

/// One step of an accompaniment shape. Intervals are scale-degree offsets
/// from the bar's root, 1-indexed (1 = the root itself, 8 = the octave).
struct PatternNote {
    duration: Duration,
    interval: usize,
}

/// The fixed accompaniment vocabulary. Each shape fills exactly one bar of
/// common time: held roots, root-fifth-octave arpeggios, and open fifths.
const LEFT_HAND_PATTERNS: [&[PatternNote]; 6] = [
    &[PatternNote { duration: Duration::Whole, interval: 1 }],
    &[
        PatternNote { duration: Duration::Quarter, interval: 1 },
        PatternNote { duration: Duration::Quarter, interval: 5 },
        PatternNote { duration: Duration::Half, interval: 8 },
    ],
    &[
        PatternNote { duration: Duration::Quarter, interval: 1 },
        PatternNote { duration: Duration::Quarter, interval: 5 },
        PatternNote { duration: Duration::Quarter, interval: 8 },
        PatternNote { duration: Duration::Quarter, interval: 5 },
    ],
    &[
        PatternNote { duration: Duration::Quarter, interval: 1 },
        PatternNote { duration: Duration::Quarter, interval: 3 },
        PatternNote { duration: Duration::Half, interval: 5 },
    ],
    &[
        PatternNote { duration: Duration::Half, interval: 1 },
        PatternNote { duration: Duration::Half, interval: 5 },
    ],
    &[
        PatternNote { duration: Duration::Half, interval: 1 },
        PatternNote { duration: Duration::Half, interval: 8 },
    ],
];

/// How many identical pitches in a row the melody tolerates before a
/// redraw is forced.
const MAX_PITCH_RUN: u32 = 1;

/// Build the chord progression: one root degree per bar. The first bar is
/// always the configured tonic; later bars reject any candidate congruent
/// to 1 mod 7, which would root a chord on the scale's 2nd degree.
fn make_roots(config: &SongConfig, bars: usize, rng: &mut SongRng) -> Vec<usize> {
    let range = &config.left_hand_range;
    let mut roots = Vec::with_capacity(bars);

    roots.push(range.root);
    for _ in 1..bars {
        let root = loop {
            let candidate = rng.range_usize(range.min, range.max);
            if candidate % 7 != 1 {
                break candidate;
            }
        };
        roots.push(root);
    }

    roots
}

/// Generate the left-hand accompaniment for `bars` bars.
pub fn make_left_hand(
    config: &SongConfig,
    bars: usize,
    rng: &mut SongRng,
) -> Result<Vec<TrackEvent>> {
    let mut notes = Vec::new();

    for root in make_roots(config, bars, rng) {
        let pattern = *rng.pick(&LEFT_HAND_PATTERNS);
        for step in pattern {
            let degree = root + step.interval - 1;
            let pitch = degree_to_pitch(degree, config.transpose)?;
            notes.push(TrackEvent::Note(NoteEvent {
                duration: step.duration,
                pitch,
                velocity: sample_velocity(config, rng),
            }));
        }
    }

    Ok(notes)
}

/// Generate the right-hand melody for `bars` bars.
pub fn make_right_hand(
    config: &SongConfig,
    bars: usize,
    rng: &mut SongRng,
) -> Result<Vec<TrackEvent>> {
    let range = &config.right_hand_range;
    let durations = sample_durations(bars, config.beats_per_bar, rng)?;

    let mut notes = Vec::with_capacity(durations.len());
    let mut last_pitch: Option<u8> = None;
    let mut run = 0u32;

    for duration in durations {
        let pitch = loop {
            let candidate =
                degree_to_pitch(rng.range_usize(range.min, range.max), config.transpose)?;
            if Some(candidate) != last_pitch {
                run = 0;
                break candidate;
            }
            run += 1;
            if run < MAX_PITCH_RUN {
                // Tolerated repeat.
                break candidate;
            }
            // Run bound hit: keep drawing until the pitch changes.
        };
        last_pitch = Some(pitch);

        notes.push(TrackEvent::Note(NoteEvent {
            duration,
            pitch,
            velocity: sample_velocity(config, rng),
        }));
    }

    Ok(notes)
}

fn sample_velocity(config: &SongConfig, rng: &mut SongRng) -> u8 {
    rng.range_u8_inclusive(config.velocity_range.min, config.velocity_range.max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{TICKS_PER_BEAT, stream_ticks};

    fn pitches(events: &[TrackEvent]) -> Vec<u8> {
        events
            .iter()
            .map(|e| match e {
                TrackEvent::Note(n) => n.pitch,
                TrackEvent::Marker(_) => panic!("generators emit only notes"),
            })
            .collect()
    }

    #[test]
    fn every_pattern_fills_one_bar() {
        for pattern in LEFT_HAND_PATTERNS {
            let ticks: u32 = pattern.iter().map(|s| s.duration.ticks(4)).sum();
            assert_eq!(ticks, 4 * TICKS_PER_BEAT);
        }
    }

    #[test]
    fn roots_start_on_the_tonic() {
        let config = SongConfig::default();
        for seed in 0..50 {
            let roots = make_roots(&config, 8, &mut SongRng::new(seed));
            assert_eq!(roots[0], config.left_hand_range.root);
            assert_eq!(roots.len(), 8);
        }
    }

    #[test]
    fn roots_never_land_on_the_second_degree() {
        // Holds for the configured tonic too, not just the resampled bars.
        let config = SongConfig::default();
        for seed in 0..200 {
            let roots = make_roots(&config, 16, &mut SongRng::new(seed));
            for &root in &roots {
                assert_ne!(root % 7, 1, "seed {seed} rooted a chord on degree {root}");
            }
        }
    }

    #[test]
    fn narrowest_legal_melody_range_terminates() {
        // Two degrees is the smallest range validation accepts; the
        // anti-repetition redraw must always find the other pitch.
        let config = SongConfig {
            right_hand_range: crate::config::DegreeRange { min: 24, max: 26 },
            ..SongConfig::default()
        };
        config.validate().unwrap();
        for seed in 0..50 {
            let mut rng = SongRng::new(seed);
            let events = make_right_hand(&config, 4, &mut rng).unwrap();
            for window in pitches(&events).windows(2) {
                assert_ne!(window[0], window[1]);
            }
        }
    }

    #[test]
    fn left_hand_spans_exactly_the_requested_bars() {
        let config = SongConfig::default();
        for seed in 0..100 {
            let mut rng = SongRng::new(seed);
            let events = make_left_hand(&config, 3, &mut rng).unwrap();
            assert_eq!(
                stream_ticks(&events, config.beats_per_bar),
                3 * config.beats_per_bar * TICKS_PER_BEAT
            );
        }
    }

    #[test]
    fn right_hand_spans_exactly_the_requested_bars() {
        let config = SongConfig::default();
        for seed in 0..100 {
            let mut rng = SongRng::new(seed);
            let events = make_right_hand(&config, 5, &mut rng).unwrap();
            assert_eq!(
                stream_ticks(&events, config.beats_per_bar),
                5 * config.beats_per_bar * TICKS_PER_BEAT
            );
        }
    }

    #[test]
    fn melody_never_repeats_a_pitch_three_times() {
        let config = SongConfig::default();
        for seed in 0..200 {
            let mut rng = SongRng::new(seed);
            let events = make_right_hand(&config, 8, &mut rng).unwrap();
            for window in pitches(&events).windows(3) {
                assert!(
                    !(window[0] == window[1] && window[1] == window[2]),
                    "seed {seed} produced three consecutive {}s",
                    window[0]
                );
            }
        }
    }

    #[test]
    fn velocities_stay_within_the_configured_range() {
        let config = SongConfig::default();
        let mut rng = SongRng::new(11);
        let events = make_right_hand(&config, 8, &mut rng).unwrap();
        for event in &events {
            if let TrackEvent::Note(note) = event {
                assert!(note.velocity >= config.velocity_range.min);
                assert!(note.velocity <= config.velocity_range.max);
            }
        }
    }

    #[test]
    fn transpose_shifts_every_pitch() {
        let base = SongConfig::default();
        let shifted = SongConfig {
            transpose: 5,
            ..base.clone()
        };
        let a = make_right_hand(&base, 2, &mut SongRng::new(4)).unwrap();
        let b = make_right_hand(&shifted, 2, &mut SongRng::new(4)).unwrap();
        for (x, y) in pitches(&a).iter().zip(pitches(&b).iter()) {
            assert_eq!(x + 5, *y);
        }
    }
}
