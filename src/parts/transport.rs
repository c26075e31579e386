use alloc::vec::Vec;

use crate::{
    file::Track,
    message::{MetaMessage, PERCUSSION_CHANNEL, Tempo, TimeSignature, VoiceEvent},
};

/// What a channel plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Instrument {
    /// The General MIDI drum kit on channel 9
    Percussion,
    /// A zero based General MIDI program
    Program(u8),
}

#[doc = r#"
Song-wide settings found in the tracks.

Later events override earlier ones, scanning tracks in file order.

# Example
```rust
# use midiconv::prelude::*;
let mut track = TrackWriter::new();
track
    .set_tempo(90.)
    .set_instrument(Channel::new(9).unwrap(), 0)
    .set_instrument(Channel::new(0).unwrap(), 24);
track.set_time_signature(3, 4).unwrap();

let transport = Transport::from_tracks(&[track.finish()]);
assert_eq!(transport.bpm().map(f64::round), Some(90.));
assert_eq!(transport.instruments, [Instrument::Program(24), Instrument::Percussion]);
assert_eq!(transport.time_signature.unwrap().denominator(), 4);
```
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transport {
    /// The last tempo event
    pub tempo: Option<Tempo>,
    /// The last time signature event
    pub time_signature: Option<TimeSignature>,
    /// The last program of every channel that had one, by ascending channel
    pub instruments: Vec<Instrument>,
}

impl Transport {
    /// Scans `tracks` for tempo, time signature and program changes.
    pub fn from_tracks(tracks: &[Track]) -> Self {
        let mut transport = Self::default();
        let mut programs = [None; 16];

        for event in tracks.iter().flat_map(Track::events) {
            if let Some(meta) = event.message().as_meta() {
                match meta {
                    MetaMessage::SetTempo(tempo) => transport.tempo = Some(*tempo),
                    MetaMessage::TimeSignature(signature) => {
                        transport.time_signature = Some(*signature)
                    }
                    _ => {}
                }
            } else if let Some(channel) = event.message().as_channel()
                && let VoiceEvent::ProgramChange { program } = channel.event()
            {
                programs[usize::from(channel.channel().number())] = Some(*program);
            }
        }

        transport.instruments = programs
            .iter()
            .enumerate()
            .filter_map(|(channel, program)| {
                program.map(|program| {
                    if channel == usize::from(PERCUSSION_CHANNEL.number()) {
                        Instrument::Percussion
                    } else {
                        Instrument::Program(program)
                    }
                })
            })
            .collect();
        transport
    }

    /// Beats per minute of the last tempo event
    pub fn bpm(&self) -> Option<f64> {
        self.tempo.as_ref().map(Tempo::bpm)
    }
}
