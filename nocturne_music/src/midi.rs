// MIDI encoding of the assembled composition.
//
// Converts the two hand streams into a Standard MIDI File using `midly`:
// SMF Format 1, 480 ticks per quarter note, track 0 carrying the tempo and
// one track per hand. Note order, duration, pitch, and velocity are
// preserved exactly — silenced (velocity 0) notes are still written so
// they occupy their timing slot, and markers become zero-length meta
// events.

use crate::config::SongConfig;
use crate::error::{MusicError, Result};
use crate::event::TrackEvent;
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track,
    TrackEvent as MidiTrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};

/// Ticks per quarter note in the output file.
const TICKS_PER_QUARTER: u32 = 480;

/// Sustain pedal controller number.
const CC_SUSTAIN: u8 = 64;

/// Encode the two hand streams into SMF bytes.
pub fn encode(
    config: &SongConfig,
    left_hand: &[TrackEvent],
    right_hand: &[TrackEvent],
) -> Result<Vec<u8>> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER as u16)),
    ));

    // Track 0: tempo only.
    let tempo_microseconds = 60_000_000 / config.bpm as u32;
    let mut tempo_track: Track<'_> = Vec::new();
    tempo_track.push(MidiTrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds))),
    });
    tempo_track.push(end_of_track());
    smf.tracks.push(tempo_track);

    smf.tracks
        .push(hand_track(config, "Left Hand", u4::new(0), left_hand));
    smf.tracks
        .push(hand_track(config, "Right Hand", u4::new(1), right_hand));

    let mut buf = Vec::new();
    smf.write(&mut buf)
        .map_err(|e| MusicError::invariant(format!("midi encoding failed: {e}")))?;
    Ok(buf)
}

/// Build one hand's track: name, optional sustain pedal, then the events.
fn hand_track<'a>(
    config: &SongConfig,
    name: &'a str,
    channel: u4,
    events: &'a [TrackEvent],
) -> Track<'a> {
    let mut track: Track<'a> = Vec::new();

    track.push(MidiTrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes())),
    });

    if config.sustain {
        track.push(MidiTrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::Controller {
                    controller: u7::new(CC_SUSTAIN),
                    value: u7::new(127),
                },
            },
        });
    }

    for event in events {
        match event {
            TrackEvent::Note(note) => {
                // A duration category is a bar fraction, so a note spans
                // beats_per_bar / denominator quarter-note beats.
                let span = config.beats_per_bar * (TICKS_PER_QUARTER / note.duration.denominator());
                track.push(MidiTrackEvent {
                    delta: u28::new(0),
                    kind: TrackEventKind::Midi {
                        channel,
                        message: MidiMessage::NoteOn {
                            key: u7::new(note.pitch),
                            vel: u7::new(note.velocity),
                        },
                    },
                });
                track.push(MidiTrackEvent {
                    delta: u28::new(span),
                    kind: TrackEventKind::Midi {
                        channel,
                        message: MidiMessage::NoteOff {
                            key: u7::new(note.pitch),
                            vel: u7::new(0),
                        },
                    },
                });
            }
            TrackEvent::Marker(text) => {
                track.push(MidiTrackEvent {
                    delta: u28::new(0),
                    kind: TrackEventKind::Meta(MetaMessage::Marker(text.as_bytes())),
                });
            }
        }
    }

    track.push(end_of_track());
    track
}

fn end_of_track() -> MidiTrackEvent<'static> {
    MidiTrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    }
}
