// Section assembly: rhythmic reconciliation of the two hands, plus the
// dissonance pass.
//
// The hands may cycle at different bar lengths (say a 2-bar accompaniment
// under a 3-bar melody). A section spans the LCM of the two lengths: each
// hand's material is generated once at its own length and tiled until both
// streams cover the same bar count and re-align on every cycle boundary.
//
// After tiling, the dissonance filter silences any right-hand note whose
// onset coincides with a left-hand note within one semitone. Silencing is
// velocity-zeroing on a fresh copy of the stream, so timing is untouched
// and the pass is idempotent.

use crate::config::SongConfig;
use crate::error::Result;
use crate::event::TrackEvent;
use crate::hands::{make_left_hand, make_right_hand};
use nocturne_prng::SongRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A cached block of generated material for both hands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub left_hand: Vec<TrackEvent>,
    pub right_hand: Vec<TrackEvent>,
}

/// Build one section: generate each hand at its configured length, tile
/// both to the LCM bar count, then run the dissonance filter.
pub fn build_section(
    config: &SongConfig,
    rng: &mut SongRng,
    log: &mut dyn FnMut(&str),
) -> Result<Section> {
    let left_len = config.section_lengths.left_hand;
    let right_len = config.section_lengths.right_hand;
    let bars = lcm(left_len, right_len);

    let left_cycle = make_left_hand(config, left_len, rng)?;
    let right_cycle = make_right_hand(config, right_len, rng)?;

    let left_hand = tile(&left_cycle, bars / left_len);
    let right_tiled = tile(&right_cycle, bars / right_len);
    let right_hand = filter_dissonance(&left_hand, &right_tiled, config.beats_per_bar, log);

    Ok(Section {
        left_hand,
        right_hand,
    })
}

/// Repeat a hand's cycle `times` times.
fn tile(cycle: &[TrackEvent], times: usize) -> Vec<TrackEvent> {
    let mut out = Vec::with_capacity(cycle.len() * times);
    for _ in 0..times {
        out.extend_from_slice(cycle);
    }
    out
}

/// Map from onset tick offset to the pitch sounding there. Markers advance
/// no time and carry no pitch, so they are skipped.
fn onset_map(events: &[TrackEvent], beats_per_bar: u32) -> BTreeMap<u32, u8> {
    let mut map = BTreeMap::new();
    let mut tick = 0u32;
    for event in events {
        if let TrackEvent::Note(note) = event {
            map.insert(tick, note.pitch);
        }
        tick += event.ticks(beats_per_bar);
    }
    map
}

/// Return a copy of the right-hand stream with every note that clashes
/// against a simultaneous left-hand onset (within one semitone) silenced.
pub fn filter_dissonance(
    left: &[TrackEvent],
    right: &[TrackEvent],
    beats_per_bar: u32,
    log: &mut dyn FnMut(&str),
) -> Vec<TrackEvent> {
    let left_onsets = onset_map(left, beats_per_bar);

    let mut filtered = Vec::with_capacity(right.len());
    let mut tick = 0u32;
    for event in right {
        let advance = event.ticks(beats_per_bar);
        let out = match event {
            TrackEvent::Note(note) => {
                let clash = left_onsets
                    .get(&tick)
                    .is_some_and(|&lp| (note.pitch as i16 - lp as i16).abs() <= 1);
                if clash {
                    log(&format!(
                        "filtering dissonance at tick {tick}: right pitch {} against left",
                        note.pitch
                    ));
                    TrackEvent::Note(note.silenced())
                } else {
                    event.clone()
                }
            }
            TrackEvent::Marker(_) => event.clone(),
        };
        filtered.push(out);
        tick += advance;
    }

    filtered
}

/// Least common multiple of two bar counts.
pub fn lcm(a: usize, b: usize) -> usize {
    a / gcd(a, b) * b
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}
