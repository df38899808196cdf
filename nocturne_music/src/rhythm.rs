// Weighted rhythm sampling with exact bar accounting.
//
// Melodies are built rhythm-first: this module produces the ordered list of
// duration categories that will carry a melody's pitches. Durations are
// drawn from a fixed weighted table until the next draw would overshoot the
// bar budget; the remainder is then padded greedily, largest category
// first, so the total always lands exactly on the budget.
//
// Weighting policy: cumulative-probability bins. The weights sum to 100 and
// one draw in 0..100 selects the first category whose cumulative weight
// exceeds it, evaluated whole -> sixteenth.

use crate::error::{MusicError, Result};
use crate::event::{Duration, TICKS_PER_BEAT};
use nocturne_prng::SongRng;

/// Selection weight for one duration category, in percent.
struct DurationWeight {
    duration: Duration,
    chance: u32,
}

/// The rhythm vocabulary. Half notes dominate; whole notes are rare enough
/// to stay special. Sums to exactly 100.
const DURATION_WEIGHTS: [DurationWeight; 5] = [
    DurationWeight { duration: Duration::Whole, chance: 10 },
    DurationWeight { duration: Duration::Half, chance: 30 },
    DurationWeight { duration: Duration::Quarter, chance: 20 },
    DurationWeight { duration: Duration::Eighth, chance: 20 },
    DurationWeight { duration: Duration::Sixteenth, chance: 20 },
];

/// One weighted draw from the duration table.
fn sample_one(rng: &mut SongRng) -> Duration {
    let draw = rng.percent();
    let mut cumulative = 0;
    for weight in &DURATION_WEIGHTS {
        cumulative += weight.chance;
        if draw < cumulative {
            return weight.duration;
        }
    }
    // Weights sum to 100 and draws are below 100, so a bin always matches.
    unreachable!("duration weights must cover the full percent range")
}

/// Produce a duration sequence spanning exactly `bars` bars.
///
/// Post-condition: the tick total equals `bars * beats_per_bar * 16`. A
/// mismatch after padding is an invariant violation and aborts generation.
pub fn sample_durations(
    bars: usize,
    beats_per_bar: u32,
    rng: &mut SongRng,
) -> Result<Vec<Duration>> {
    let budget = bars as u32 * beats_per_bar * TICKS_PER_BEAT;
    let mut durations = Vec::new();
    let mut total = 0u32;

    loop {
        let duration = sample_one(rng);
        let add = duration.ticks(beats_per_bar);

        if total + add > budget {
            // Overshoot: stop sampling and pad the remainder greedily,
            // largest category first.
            for weight in &DURATION_WEIGHTS {
                let add = weight.duration.ticks(beats_per_bar);
                while total + add <= budget {
                    durations.push(weight.duration);
                    total += add;
                }
            }
            if total != budget {
                return Err(MusicError::invariant(format!(
                    "beat mismatch after padding: {total} ticks of {budget}"
                )));
            }
            break;
        }

        total += add;
        durations.push(duration);
    }

    Ok(durations)
}
