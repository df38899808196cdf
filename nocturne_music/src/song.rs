// The composer: pattern expansion, section caching, and final assembly.
//
// A `Song` owns a validated configuration and a seeded PRNG. Generating a
// pattern ("AABB", "ABAB", ...) builds each distinct section identifier
// once, caches it, and concatenates the cached material in pattern order
// into the final left/right streams, which are then encoded to MIDI.
// Re-using an identifier — within one pattern or across later `generate`
// calls — always replays the cached material byte for byte.
//
// Progress messages go through an optional injected observer callback;
// generation itself never prints.

use crate::config::SongConfig;
use crate::error::{MusicError, Result};
use crate::event::TrackEvent;
use crate::midi;
use crate::section::{Section, build_section};
use nocturne_prng::SongRng;
use std::collections::BTreeMap;

/// Observer hook for informational messages. Fire-and-forget: it has no
/// effect on generation.
pub type Observer = Box<dyn FnMut(&str)>;

/// A procedurally generated two-hand piano composition.
pub struct Song {
    config: SongConfig,
    rng: SongRng,
    sections: BTreeMap<char, Section>,
    left_hand: Vec<TrackEvent>,
    right_hand: Vec<TrackEvent>,
    midi_data: Option<Vec<u8>>,
    observer: Option<Observer>,
}

impl Song {
    /// Validate the configuration and seed the generator. If the config
    /// carries an initial pattern, generate it immediately.
    pub fn new(config: SongConfig) -> Result<Self> {
        config.validate()?;
        let rng = SongRng::new(config.seed);
        let mut song = Song {
            rng,
            sections: BTreeMap::new(),
            left_hand: Vec::new(),
            right_hand: Vec::new(),
            midi_data: None,
            observer: None,
            config,
        };
        if let Some(pattern) = song.config.pattern.clone() {
            song.generate(&pattern)?;
        }
        Ok(song)
    }

    /// Install an observer for informational messages.
    pub fn set_observer(&mut self, observer: impl FnMut(&str) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Generate (or extend) the composition from a pattern of section
    /// identifiers. Unknown identifiers trigger fresh generation; known
    /// ones reuse their cached section.
    pub fn generate(&mut self, pattern: &str) -> Result<()> {
        if pattern.is_empty() {
            return Err(MusicError::config("pattern", "must not be empty"));
        }

        for id in pattern.chars() {
            if self.sections.contains_key(&id) {
                continue;
            }
            let config = &self.config;
            let rng = &mut self.rng;
            let observer = &mut self.observer;
            let mut log = |msg: &str| {
                if let Some(f) = observer.as_mut() {
                    f(msg);
                }
            };
            log(&format!("generating section '{id}'"));
            let section = build_section(config, rng, &mut log)?;
            self.sections.insert(id, section);
        }

        let mut left_hand = Vec::new();
        let mut right_hand = Vec::new();
        for id in pattern.chars() {
            let section = self.sections.get(&id).ok_or_else(|| {
                MusicError::invariant(format!("section '{id}' missing after generation"))
            })?;
            left_hand.extend_from_slice(&section.left_hand);
            right_hand.extend_from_slice(&section.right_hand);
        }

        self.midi_data = Some(midi::encode(&self.config, &left_hand, &right_hand)?);
        self.left_hand = left_hand;
        self.right_hand = right_hand;
        Ok(())
    }

    /// The encoded MIDI bytes. Fails if `generate` has never succeeded.
    pub fn midi_data(&self) -> Result<&[u8]> {
        self.midi_data
            .as_deref()
            .ok_or_else(|| MusicError::invariant("midi data requested before generate".to_string()))
    }

    /// Assembled left-hand stream from the last `generate` call.
    pub fn left_hand(&self) -> &[TrackEvent] {
        &self.left_hand
    }

    /// Assembled right-hand stream from the last `generate` call.
    pub fn right_hand(&self) -> &[TrackEvent] {
        &self.right_hand
    }

    /// A cached section, if that identifier has been generated.
    pub fn section(&self, id: char) -> Option<&Section> {
        self.sections.get(&id)
    }

    pub fn config(&self) -> &SongConfig {
        &self.config
    }
}
