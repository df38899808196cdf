// Composition configuration.
//
// A `SongConfig` is the complete, immutable input to generation: tempo,
// transposition, velocity range, per-hand section lengths and degree
// ranges, sustain, meter, and the random seed. Configurations are plain
// serde structs so they can be loaded from JSON files by the CLI.
//
// Validation happens once, up front: `Song::new` refuses a config that
// violates any field invariant, so the generators can assume well-formed
// ranges throughout.

use crate::error::{MusicError, Result};
use crate::scale;
use serde::{Deserialize, Serialize};

/// Inclusive velocity bounds for sampled notes. `min == max` pins every
/// note to one velocity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VelocityRange {
    pub min: u8,
    pub max: u8,
}

/// Section lengths in bars, per hand. The two hands may cycle at different
/// lengths; the section builder reconciles them via their LCM.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SectionLengths {
    pub left_hand: usize,
    pub right_hand: usize,
}

/// Scale-degree range for melody pitches, `min` inclusive, `max` exclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DegreeRange {
    pub min: usize,
    pub max: usize,
}

/// Left-hand degree range plus the tonic degree every progression opens on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RootedRange {
    pub min: usize,
    pub max: usize,
    pub root: usize,
}

/// Complete input to the composer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongConfig {
    /// Tempo in quarter-note beats per minute.
    pub bpm: u16,
    /// Semitone offset applied to every resolved pitch.
    pub transpose: i16,
    pub velocity_range: VelocityRange,
    pub section_lengths: SectionLengths,
    pub left_hand_range: RootedRange,
    pub right_hand_range: DegreeRange,
    /// Hold the sustain pedal down for the whole piece.
    pub sustain: bool,
    /// Beats per bar. 4 (common time) unless the config says otherwise.
    #[serde(default = "default_beats_per_bar")]
    pub beats_per_bar: u32,
    /// Seed for the deterministic PRNG. Equal seeds with equal configs
    /// produce byte-identical output.
    #[serde(default)]
    pub seed: u64,
    /// Optional pattern to generate immediately on construction.
    #[serde(default)]
    pub pattern: Option<String>,
}

fn default_beats_per_bar() -> u32 {
    4
}

/// Slowest encodable tempo: the MIDI tempo meta event stores microseconds
/// per beat in 24 bits, and 60_000_000 / 4 is the largest value that fits.
const MIN_BPM: u16 = 4;

/// Meter bound keeping tick and delta arithmetic inside `u32`/`u28`.
const MAX_BEATS_PER_BAR: u32 = 32;

impl SongConfig {
    /// Check every field invariant, naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.bpm < MIN_BPM {
            return Err(MusicError::config(
                "bpm",
                format!("must be at least {MIN_BPM}"),
            ));
        }
        if self.beats_per_bar == 0 || self.beats_per_bar > MAX_BEATS_PER_BAR {
            return Err(MusicError::config(
                "beats_per_bar",
                format!("must be between 1 and {MAX_BEATS_PER_BAR}"),
            ));
        }
        if self.velocity_range.min > self.velocity_range.max {
            return Err(MusicError::config(
                "velocity_range",
                format!(
                    "min {} exceeds max {}",
                    self.velocity_range.min, self.velocity_range.max
                ),
            ));
        }
        if self.velocity_range.max > 127 {
            return Err(MusicError::config(
                "velocity_range",
                format!("max {} exceeds MIDI limit 127", self.velocity_range.max),
            ));
        }
        if self.section_lengths.left_hand == 0 {
            return Err(MusicError::config(
                "section_lengths.left_hand",
                "must be at least one bar",
            ));
        }
        if self.section_lengths.right_hand == 0 {
            return Err(MusicError::config(
                "section_lengths.right_hand",
                "must be at least one bar",
            ));
        }

        let degrees = scale::degree_count();
        Self::check_degree_range(
            "left_hand_range",
            self.left_hand_range.min,
            self.left_hand_range.max,
            degrees,
        )?;
        Self::check_degree_range(
            "right_hand_range",
            self.right_hand_range.min,
            self.right_hand_range.max,
            degrees,
        )?;
        // The melody resampler redraws until the pitch changes; a
        // single-degree range has nowhere else to go.
        if self.right_hand_range.max - self.right_hand_range.min < 2 {
            return Err(MusicError::config(
                "right_hand_range",
                "must span at least two degrees",
            ));
        }
        // The root resampling loop skips degrees congruent to 1 mod 7; a
        // range with nothing else in it would never terminate.
        if (self.left_hand_range.min..self.left_hand_range.max).all(|d| d % 7 == 1) {
            return Err(MusicError::config(
                "left_hand_range",
                "contains no usable chord root (only the scale's 2nd degree)",
            ));
        }
        if self.left_hand_range.root >= degrees {
            return Err(MusicError::config(
                "left_hand_range.root",
                format!(
                    "degree {} outside scale table of {degrees} entries",
                    self.left_hand_range.root
                ),
            ));
        }
        // The tonic opens every progression unconditionally, so it must
        // honor the same no-2nd-degree rule the resampled roots do.
        if self.left_hand_range.root % 7 == 1 {
            return Err(MusicError::config(
                "left_hand_range.root",
                format!(
                    "degree {} is the scale's 2nd and cannot root a progression",
                    self.left_hand_range.root
                ),
            ));
        }

        Ok(())
    }

    fn check_degree_range(
        field: &'static str,
        min: usize,
        max: usize,
        degrees: usize,
    ) -> Result<()> {
        if min >= max {
            return Err(MusicError::config(
                field,
                format!("min {min} must be below max {max}"),
            ));
        }
        if max > degrees {
            return Err(MusicError::config(
                field,
                format!("max {max} outside scale table of {degrees} entries"),
            ));
        }
        Ok(())
    }
}

impl Default for SongConfig {
    /// A pleasant mid-keyboard starting point: moderate tempo, left hand
    /// in the second and third octaves, melody two octaves above.
    fn default() -> Self {
        SongConfig {
            bpm: 100,
            transpose: 0,
            velocity_range: VelocityRange { min: 40, max: 90 },
            section_lengths: SectionLengths {
                left_hand: 2,
                right_hand: 4,
            },
            left_hand_range: RootedRange {
                min: 7,
                max: 18,
                root: 14,
            },
            right_hand_range: DegreeRange { min: 24, max: 38 },
            sustain: true,
            beats_per_bar: 4,
            seed: 0,
            pattern: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        SongConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_bpm_is_rejected() {
        let cfg = SongConfig {
            bpm: 0,
            ..SongConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("bpm"));
    }

    #[test]
    fn bpm_too_slow_for_the_tempo_meta_is_rejected() {
        // 60_000_000 / 3 exceeds the 24-bit tempo field.
        let cfg = SongConfig {
            bpm: 3,
            ..SongConfig::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = SongConfig {
            bpm: MIN_BPM,
            ..SongConfig::default()
        };
        cfg.validate().unwrap();
    }

    #[test]
    fn oversized_meter_is_rejected() {
        let cfg = SongConfig {
            beats_per_bar: MAX_BEATS_PER_BAR + 1,
            ..SongConfig::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = SongConfig {
            beats_per_bar: MAX_BEATS_PER_BAR,
            ..SongConfig::default()
        };
        cfg.validate().unwrap();
    }

    #[test]
    fn inverted_velocity_range_is_rejected() {
        let cfg = SongConfig {
            velocity_range: VelocityRange { min: 90, max: 40 },
            ..SongConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn equal_velocity_bounds_are_allowed() {
        let cfg = SongConfig {
            velocity_range: VelocityRange { min: 64, max: 64 },
            ..SongConfig::default()
        };
        cfg.validate().unwrap();
    }

    #[test]
    fn velocity_above_midi_limit_is_rejected() {
        let cfg = SongConfig {
            velocity_range: VelocityRange { min: 40, max: 200 },
            ..SongConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_length_section_is_rejected() {
        let cfg = SongConfig {
            section_lengths: SectionLengths {
                left_hand: 0,
                right_hand: 4,
            },
            ..SongConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn single_degree_melody_range_is_rejected() {
        // One degree satisfies min < max but leaves the anti-repetition
        // redraw with no different pitch to land on.
        let cfg = SongConfig {
            right_hand_range: DegreeRange { min: 24, max: 25 },
            ..SongConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("right_hand_range"));
    }

    #[test]
    fn degree_range_outside_table_is_rejected() {
        let cfg = SongConfig {
            right_hand_range: DegreeRange { min: 24, max: 999 },
            ..SongConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rootless_left_range_is_rejected() {
        // The single degree 8 is congruent to 1 mod 7 and can never root a chord.
        let cfg = SongConfig {
            left_hand_range: RootedRange {
                min: 8,
                max: 9,
                root: 8,
            },
            ..SongConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn second_degree_tonic_is_rejected() {
        // Degree 15 is congruent to 1 mod 7; as the fixed first root it
        // would sidestep the progression's no-2nd-degree rule.
        let cfg = SongConfig {
            left_hand_range: RootedRange {
                min: 7,
                max: 18,
                root: 15,
            },
            ..SongConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("root"));
    }

    #[test]
    fn root_outside_table_is_rejected() {
        let cfg = SongConfig {
            left_hand_range: RootedRange {
                min: 7,
                max: 18,
                root: 999,
            },
            ..SongConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn json_roundtrip() {
        let cfg = SongConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: SongConfig = serde_json::from_str(&json).unwrap();
        back.validate().unwrap();
        assert_eq!(back.bpm, cfg.bpm);
        assert_eq!(back.beats_per_bar, cfg.beats_per_bar);
    }

    #[test]
    fn beats_per_bar_defaults_to_four() {
        let json = r#"{
            "bpm": 90,
            "transpose": 0,
            "velocity_range": {"min": 50, "max": 80},
            "section_lengths": {"left_hand": 1, "right_hand": 1},
            "left_hand_range": {"min": 7, "max": 18, "root": 14},
            "right_hand_range": {"min": 24, "max": 38},
            "sustain": false
        }"#;
        let cfg: SongConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.beats_per_bar, 4);
        assert_eq!(cfg.seed, 0);
        assert!(cfg.pattern.is_none());
    }
}
