#![doc = r#"
Whole-file conversion between bytes and a [`Song`].

[`parse`] decodes a buffer, splits a format 0 file by channel and projects the
tracks into [`Part`]s and a [`Transport`]. [`generate`] goes the other way,
writing one format 1 track per part.

# Example
```rust
use midiconv::{convert, prelude::*};

let song = Song {
    timing: TicksPerQuarterNote::default(),
    transport: Transport {
        tempo: Some(Tempo::from_bpm(100.)),
        ..Default::default()
    },
    parts: vec![Part {
        name: None,
        notes: vec![Note::new(64, 0, 240, Velocity::new(90))],
        sustains: vec![],
    }],
};

let bytes = convert::generate(&song).unwrap();
let decoded = convert::parse(&bytes, &PartsOptions::default()).unwrap();
assert_eq!(decoded.parts[0].notes, song.parts[0].notes);
assert_eq!(decoded.transport.tempo, song.transport.tempo);
```
"#]

use alloc::vec::Vec;

use thiserror::Error;

use crate::{
    file::{FormatType, MidiFile, TicksPerQuarterNote, Track},
    message::{Channel, MetaMessage, PERCUSSION_CHANNEL},
    parts::{Instrument, Part, PartsOptions, Transport, parts, split_by_channel},
    reader::ReaderError,
    reconstruct::{ReconstructError, Reconstructor},
    writer::{TrackWriter, WriterError},
};

/// Anything that can go wrong in [`parse`] or [`generate`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// The input is not a valid file
    #[error("{0}")]
    Read(#[from] ReaderError),
    /// The output could not be encoded
    #[error("{0}")]
    Write(#[from] WriterError),
    /// A part holds notes that cannot be turned into events
    #[error("Part {part}: {source}")]
    Reconstruct {
        /// Index of the part
        part: usize,
        /// What was wrong with it
        source: ReconstructError,
    },
    /// More parts than there are melodic channels
    #[error("Part {part} would play on channel {channel}, outside of 0-15")]
    NoChannelForPart {
        /// Index of the part
        part: usize,
        /// The channel it would need
        channel: usize,
    },
}

/// Notes and settings of a whole file
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Song {
    /// The division every tick value of the parts is expressed in
    pub timing: TicksPerQuarterNote,
    /// Tempo, time signature and instruments
    pub transport: Transport,
    /// One entry per track that holds notes or sustain spans
    pub parts: Vec<Part>,
}

/// Decodes `bytes` into a [`Song`].
///
/// When `options.ppq` is set, the song is expressed in that division instead
/// of the file's.
///
/// # Errors
/// [`ConvertError::Read`] if the file cannot be decoded.
pub fn parse(bytes: &[u8], options: &PartsOptions) -> Result<Song, ConvertError> {
    let file = split_by_channel(MidiFile::parse(bytes)?);

    Ok(Song {
        timing: options.ppq.unwrap_or(file.timing()),
        transport: Transport::from_tracks(file.tracks()),
        parts: parts(&file, options),
    })
}

/// Encodes `song` as a format 1 file with one track per part.
///
/// Each track starts with the tempo, the part's program change and the time
/// signature, when the transport has them. The part at `index` plays on
/// channel `index`, skipping the percussion channel, unless its instrument is
/// [`Instrument::Percussion`].
///
/// # Errors
/// - [`ConvertError::Reconstruct`] for an invalid note or span.
/// - [`ConvertError::NoChannelForPart`] when parts run out of channels.
/// - [`ConvertError::Write`] if encoding fails.
pub fn generate(song: &Song) -> Result<Vec<u8>, ConvertError> {
    let tracks = song
        .parts
        .iter()
        .enumerate()
        .map(|(index, part)| part_track(song, index, part))
        .collect::<Result<Vec<Track>, ConvertError>>()?;

    Ok(MidiFile::new(FormatType::Simultaneous, song.timing, tracks).to_bytes()?)
}

fn part_track(song: &Song, index: usize, part: &Part) -> Result<Track, ConvertError> {
    let instrument = song.transport.instruments.get(index).copied();
    let channel = part_channel(index, instrument)?;

    let mut track = TrackWriter::new();
    if let Some(tempo) = song.transport.tempo {
        track.push(0, MetaMessage::SetTempo(tempo));
    }
    match instrument {
        Some(Instrument::Program(program)) => {
            track.set_instrument(channel, program);
        }
        Some(Instrument::Percussion) => {
            track.set_instrument(channel, 0);
        }
        None => {}
    }
    if let Some(signature) = song.transport.time_signature {
        track.push(0, MetaMessage::TimeSignature(signature));
    }

    let events = Reconstructor::new(song.timing)
        .with_channel(channel)
        .reconstruct(&part.notes, &part.sustains)
        .map_err(|source| ConvertError::Reconstruct {
            part: index,
            source,
        })?
        .into_events();
    for event in events {
        track.push(event.delta_ticks(), event.into_message());
    }

    Ok(track.finish())
}

fn part_channel(index: usize, instrument: Option<Instrument>) -> Result<Channel, ConvertError> {
    if instrument == Some(Instrument::Percussion) {
        return Ok(PERCUSSION_CHANNEL);
    }
    let percussion = usize::from(PERCUSSION_CHANNEL.number());
    let channel = if index >= percussion { index + 1 } else { index };
    u8::try_from(channel)
        .ok()
        .and_then(Channel::new)
        .ok_or(ConvertError::NoChannelForPart {
            part: index,
            channel,
        })
}
