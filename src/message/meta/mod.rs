#![doc = r#"
Meta events: `FF <type> <len> <data>`

Meta events only exist inside MIDI files. Each kind listed in [`MetaType`]
has a payload layout; kinds with a fixed layout reject any other length with
[`ParseError::BadEventLength`]. Text payloads are kept as raw bytes because
files in the wild use every encoding imaginable.
"#]

mod smpte_fps;
pub use smpte_fps::*;

mod smpte_offset;
pub use smpte_offset::*;

mod tempo;
pub use tempo::*;

mod signature;
pub use signature::*;

use alloc::vec::Vec;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{ParseError, writer::WriterErrorKind};

/// The meta kinds this crate understands.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MetaType {
    /// `FF 00 02 ssss`
    SequenceNumber = 0x00,
    /// `FF 01 len text`
    Text = 0x01,
    /// `FF 02 len text`
    CopyrightNotice = 0x02,
    /// `FF 03 len text`
    TrackName = 0x03,
    /// `FF 04 len text`
    InstrumentName = 0x04,
    /// `FF 05 len text`
    Lyrics = 0x05,
    /// `FF 06 len text`
    Marker = 0x06,
    /// `FF 07 len text`
    CuePoint = 0x07,
    /// `FF 20 01 cc`
    MidiChannelPrefix = 0x20,
    /// `FF 2F 00`
    EndOfTrack = 0x2F,
    /// `FF 51 03 tttttt`
    SetTempo = 0x51,
    /// `FF 54 05 hr mn se fr ff`
    SmpteOffset = 0x54,
    /// `FF 58 04 nn dd cc bb`
    TimeSignature = 0x58,
    /// `FF 59 02 sf mi`
    KeySignature = 0x59,
    /// `FF 7F len data`
    SequencerSpecific = 0x7F,
}

impl MetaType {
    /// The payload length required by the kind, if it is fixed.
    pub const fn fixed_len(&self) -> Option<u32> {
        match self {
            Self::SequenceNumber => Some(2),
            Self::MidiChannelPrefix => Some(1),
            Self::EndOfTrack => Some(0),
            Self::SetTempo => Some(Tempo::LEN),
            Self::SmpteOffset => Some(SmpteOffset::LEN),
            Self::TimeSignature => Some(TimeSignature::LEN),
            Self::KeySignature => Some(KeySignature::LEN),
            _ => None,
        }
    }

    /// Checks a payload length against [`MetaType::fixed_len`].
    pub const fn check_len(&self, len: u32) -> Result<(), ParseError> {
        match self.fixed_len() {
            Some(expected) if expected != len => Err(ParseError::bad_length(*self, expected, len)),
            _ => Ok(()),
        }
    }
}

#[doc = r#"
A decoded meta event.

# Example
```rust
# use midiconv::prelude::*;
let tempo = MetaMessage::parse(0x51, &[0x07, 0xA1, 0x20]).unwrap();
assert_eq!(tempo, MetaMessage::SetTempo(Tempo::new(500_000)));

let err = MetaMessage::parse(0x51, &[0x07, 0xA1]).unwrap_err();
assert!(matches!(err, ParseError::BadEventLength { expected: 3, found: 2, .. }));
```
"#]
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaMessage {
    /// Pattern number of a format 2 sequence
    SequenceNumber(u16),
    /// Free text
    Text(Vec<u8>),
    /// Copyright notice
    CopyrightNotice(Vec<u8>),
    /// Sequence or track name
    TrackName(Vec<u8>),
    /// Instrument description
    InstrumentName(Vec<u8>),
    /// A lyric, usually one syllable
    Lyrics(Vec<u8>),
    /// Rehearsal letter or section name
    Marker(Vec<u8>),
    /// Description of something happening on stage or screen
    CuePoint(Vec<u8>),
    /// Channel that following meta and sysex events refer to
    MidiChannelPrefix(u8),
    /// Must be the last event of a track
    EndOfTrack,
    /// Tempo change
    SetTempo(Tempo),
    /// SMPTE start time of the track
    SmpteOffset(SmpteOffset),
    /// Time signature change
    TimeSignature(TimeSignature),
    /// Key signature change
    KeySignature(KeySignature),
    /// Manufacturer specific data
    SequencerSpecific(Vec<u8>),
    /// Any kind this crate does not know about, payload untouched
    Unknown {
        /// The type byte
        meta_type: u8,
        /// The raw payload
        data: Vec<u8>,
    },
}

impl MetaMessage {
    /// Interprets a payload for a type byte.
    ///
    /// # Errors
    /// [`ParseError::BadEventLength`] if the kind has a fixed length that
    /// `data` does not match.
    pub fn parse(meta_type: u8, data: &[u8]) -> Result<Self, ParseError> {
        let Ok(kind) = MetaType::try_from(meta_type) else {
            #[cfg(feature = "tracing")]
            tracing::trace!("capturing unknown meta event {meta_type:#04X}");
            return Ok(Self::Unknown {
                meta_type,
                data: data.to_vec(),
            });
        };
        kind.check_len(data.len() as u32)?;

        Ok(match kind {
            MetaType::SequenceNumber => Self::SequenceNumber(u16::from_be_bytes([data[0], data[1]])),
            MetaType::Text => Self::Text(data.to_vec()),
            MetaType::CopyrightNotice => Self::CopyrightNotice(data.to_vec()),
            MetaType::TrackName => Self::TrackName(data.to_vec()),
            MetaType::InstrumentName => Self::InstrumentName(data.to_vec()),
            MetaType::Lyrics => Self::Lyrics(data.to_vec()),
            MetaType::Marker => Self::Marker(data.to_vec()),
            MetaType::CuePoint => Self::CuePoint(data.to_vec()),
            MetaType::MidiChannelPrefix => Self::MidiChannelPrefix(data[0]),
            MetaType::EndOfTrack => Self::EndOfTrack,
            MetaType::SetTempo => Self::SetTempo(Tempo::from_bytes([data[0], data[1], data[2]])),
            MetaType::SmpteOffset => Self::SmpteOffset(SmpteOffset::from_bytes([
                data[0], data[1], data[2], data[3], data[4],
            ])),
            MetaType::TimeSignature => Self::TimeSignature(TimeSignature::from_bytes([
                data[0], data[1], data[2], data[3],
            ])),
            MetaType::KeySignature => {
                Self::KeySignature(KeySignature::from_bytes([data[0], data[1]]))
            }
            MetaType::SequencerSpecific => Self::SequencerSpecific(data.to_vec()),
        })
    }

    /// Builds a meta event from an optional type byte and a raw payload.
    ///
    /// # Errors
    /// - [`WriterErrorKind::MissingEventType`] if `meta_type` is `None`
    /// - [`WriterErrorKind::InvalidPayload`] if the payload does not fit the kind
    pub fn from_raw(meta_type: Option<u8>, data: &[u8]) -> Result<Self, WriterErrorKind> {
        let meta_type = meta_type.ok_or(WriterErrorKind::MissingEventType)?;
        Ok(Self::parse(meta_type, data)?)
    }

    /// The type byte written after `FF`.
    pub fn type_byte(&self) -> u8 {
        match self {
            Self::Unknown { meta_type, .. } => *meta_type,
            _ => self.known_type().map_or(0, u8::from),
        }
    }

    /// The kind of a known meta event, `None` for [`MetaMessage::Unknown`].
    pub const fn known_type(&self) -> Option<MetaType> {
        Some(match self {
            Self::SequenceNumber(_) => MetaType::SequenceNumber,
            Self::Text(_) => MetaType::Text,
            Self::CopyrightNotice(_) => MetaType::CopyrightNotice,
            Self::TrackName(_) => MetaType::TrackName,
            Self::InstrumentName(_) => MetaType::InstrumentName,
            Self::Lyrics(_) => MetaType::Lyrics,
            Self::Marker(_) => MetaType::Marker,
            Self::CuePoint(_) => MetaType::CuePoint,
            Self::MidiChannelPrefix(_) => MetaType::MidiChannelPrefix,
            Self::EndOfTrack => MetaType::EndOfTrack,
            Self::SetTempo(_) => MetaType::SetTempo,
            Self::SmpteOffset(_) => MetaType::SmpteOffset,
            Self::TimeSignature(_) => MetaType::TimeSignature,
            Self::KeySignature(_) => MetaType::KeySignature,
            Self::SequencerSpecific(_) => MetaType::SequencerSpecific,
            Self::Unknown { .. } => return None,
        })
    }

    /// The payload bytes as written after the length.
    pub fn payload(&self) -> Vec<u8> {
        match self {
            Self::SequenceNumber(n) => n.to_be_bytes().to_vec(),
            Self::Text(d)
            | Self::CopyrightNotice(d)
            | Self::TrackName(d)
            | Self::InstrumentName(d)
            | Self::Lyrics(d)
            | Self::Marker(d)
            | Self::CuePoint(d)
            | Self::SequencerSpecific(d)
            | Self::Unknown { data: d, .. } => d.clone(),
            Self::MidiChannelPrefix(c) => alloc::vec![*c],
            Self::EndOfTrack => Vec::new(),
            Self::SetTempo(t) => t.to_bytes().to_vec(),
            Self::SmpteOffset(o) => o.to_bytes().to_vec(),
            Self::TimeSignature(s) => s.to_bytes().to_vec(),
            Self::KeySignature(k) => k.to_bytes().to_vec(),
        }
    }

    /// The text of the text-like kinds.
    pub fn text(&self) -> Option<&[u8]> {
        match self {
            Self::Text(d)
            | Self::CopyrightNotice(d)
            | Self::TrackName(d)
            | Self::InstrumentName(d)
            | Self::Lyrics(d)
            | Self::Marker(d)
            | Self::CuePoint(d) => Some(d.as_slice()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fixed_lengths_are_enforced() {
        let cases = [
            (0x00, 2),
            (0x20, 1),
            (0x2F, 0),
            (0x51, 3),
            (0x54, 5),
            (0x58, 4),
            (0x59, 2),
        ];
        for (byte, expected) in cases {
            let data = [0u8; 8];
            assert!(MetaMessage::parse(byte, &data[..expected]).is_ok());
            let err = MetaMessage::parse(byte, &data[..expected + 1]).unwrap_err();
            assert_eq!(
                err,
                ParseError::BadEventLength {
                    meta_type: MetaType::try_from(byte).unwrap(),
                    expected: expected as u32,
                    found: expected as u32 + 1,
                }
            );
        }
    }

    #[test]
    fn text_is_kept_as_bytes() {
        let name = MetaMessage::parse(0x03, b"Piano\0").unwrap();
        assert_eq!(name, MetaMessage::TrackName(b"Piano\0".to_vec()));
        assert_eq!(name.text(), Some(&b"Piano\0"[..]));
        assert_eq!(name.payload(), b"Piano\0".to_vec());
    }

    #[test]
    fn unknown_kinds_are_captured() {
        let message = MetaMessage::parse(0x21, &[0x01]).unwrap();
        assert_eq!(
            message,
            MetaMessage::Unknown {
                meta_type: 0x21,
                data: alloc::vec![0x01]
            }
        );
        assert_eq!(message.type_byte(), 0x21);
        assert_eq!(message.known_type(), None);
    }

    #[test]
    fn raw_meta_needs_a_type() {
        assert_eq!(
            MetaMessage::from_raw(None, b"x"),
            Err(WriterErrorKind::MissingEventType)
        );
        assert_eq!(
            MetaMessage::from_raw(Some(0x58), &[4, 2]),
            Err(WriterErrorKind::InvalidPayload(ParseError::BadEventLength {
                meta_type: MetaType::TimeSignature,
                expected: 4,
                found: 2,
            }))
        );
        assert_eq!(
            MetaMessage::from_raw(Some(0x06), b"verse"),
            Ok(MetaMessage::Marker(b"verse".to_vec()))
        );
    }

    #[test]
    fn payloads_match_the_wire_layout() {
        let sequence = MetaMessage::parse(0x00, &[0x01, 0x02]).unwrap();
        assert_eq!(sequence, MetaMessage::SequenceNumber(0x0102));
        assert_eq!(sequence.payload(), alloc::vec![0x01, 0x02]);
        assert_eq!(sequence.type_byte(), 0x00);

        let tempo = MetaMessage::SetTempo(Tempo::new(500_000));
        assert_eq!(tempo.payload(), alloc::vec![0x07, 0xA1, 0x20]);
        assert_eq!(tempo.type_byte(), 0x51);
    }
}
