// Nocturne — procedural two-hand piano composer.
//
// Generates a left-hand accompaniment and a right-hand melody from a small
// set of musical parameters and encodes them as a Standard MIDI File. The
// generator is deterministic given a seed, supporting reproducible output.
//
// Architecture:
// - scale.rs: the natural-minor scale table (degree index -> MIDI pitch)
// - config.rs: the validated, serde-loadable composition configuration
// - event.rs: the note/marker event model and exact tick accounting
// - rhythm.rs: weighted duration sampling with bar-exact padding
// - hands.rs: chord-progression left hand + melodic right hand
// - section.rs: LCM tiling of the two hands and the dissonance filter
// - song.rs: pattern expansion, section caching, final assembly
// - midi.rs: SMF output via `midly`
//
// Randomness comes exclusively from `nocturne_prng`, injected through the
// configuration seed, so equal seeds yield byte-identical MIDI.

pub mod config;
pub mod error;
pub mod event;
pub mod hands;
pub mod midi;
pub mod rhythm;
pub mod scale;
pub mod section;
pub mod song;
