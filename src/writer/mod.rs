#![doc = r#"
Serialization of files, tracks and events.

The writer is the inverse of [`reader`](crate::reader) for everything the
event model can hold. It never compresses with running status: each channel
event is written with its own status byte. Meta and system exclusive payload
lengths are written as variable-length quantities, which for payloads of up
to 127 bytes is a single byte.

[`TrackWriter`] assembles tracks for generation, accepting raw status bytes
and meta type bytes and validating them as it goes.
"#]

mod error;
pub use error::*;

mod track;
pub use track::*;

use alloc::vec::Vec;

use crate::{
    events::{TrackEvent, TrackMessage},
    file::Header,
    message::{MetaMessage, MetaType},
};

#[doc = r#"
An append-only byte buffer with the MIDI primitive encodings.

# Example
```rust
# use midiconv::writer::Writer;
let mut writer = Writer::new();
writer.write_varlen(128);
writer.write_u16_be(0x1234);

assert_eq!(writer.into_bytes(), vec![0x81, 0x00, 0x12, 0x34]);
```
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Writer {
    bytes: Vec<u8>,
}

impl Writer {
    /// Create an empty writer
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Takes the written bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The bytes written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes written
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if nothing was written
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Appends one byte
    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    /// Appends a big-endian `u16`
    pub fn write_u16_be(&mut self, value: u16) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    /// Appends a big-endian `u32`
    pub fn write_u32_be(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    /// Appends raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Appends a MIDI variable-length quantity.
    ///
    /// Seven bits per byte, most significant group first, every byte but the
    /// last with its high bit set.
    pub fn write_varlen(&mut self, value: u32) {
        let mut groups = [0u8; 5];
        let mut count = 0;
        let mut rest = value;
        loop {
            groups[count] = (rest & 0x7F) as u8;
            count += 1;
            rest >>= 7;
            if rest == 0 {
                break;
            }
        }
        for i in (0..count).rev() {
            let continuation = if i == 0 { 0 } else { 0x80 };
            self.write_u8(groups[i] | continuation);
        }
    }

    /// Writes a chunk identifier, the payload length and the payload.
    pub fn write_chunk(&mut self, id: &[u8; 4], payload: &[u8]) -> Result<(), WriterErrorKind> {
        let len = length_field(payload.len())?;
        self.write_bytes(id);
        self.write_u32_be(len);
        self.write_bytes(payload);
        Ok(())
    }

    /// Writes the `MThd` chunk.
    pub fn write_header(&mut self, header: &Header) {
        self.write_bytes(b"MThd");
        self.write_u32_be(Header::LEN);
        self.write_bytes(&header.to_bytes());
    }

    /// Writes the delta time and the message of one event.
    ///
    /// Channel events whose parameters do not fit seven bit data bytes are
    /// rejected before anything is written for them.
    pub fn write_event(&mut self, event: &TrackEvent) -> Result<(), WriterErrorKind> {
        if let TrackMessage::Channel(message) = event.message() {
            message.event().check_data()?;
        }
        self.write_varlen(event.delta_ticks());
        match event.message() {
            TrackMessage::Channel(message) => {
                self.write_u8(message.status_byte());
                let (param1, param2) = message.event().data_bytes();
                self.write_u8(param1);
                if let Some(param2) = param2 {
                    self.write_u8(param2);
                }
            }
            TrackMessage::Meta(meta) => self.write_meta(meta)?,
            TrackMessage::SysEx(data) => self.write_sysex(0xF0, data)?,
            TrackMessage::DividedSysEx(data) => self.write_sysex(0xF7, data)?,
        }
        Ok(())
    }

    /// Writes an `MTrk` chunk holding `events`.
    ///
    /// # Errors
    /// The first event that cannot be written, by index. A track too long
    /// for its length field reports the event count.
    pub fn write_track(&mut self, events: &[TrackEvent]) -> WriteResult<()> {
        let mut payload = Writer::new();
        for (index, event) in events.iter().enumerate() {
            payload
                .write_event(event)
                .map_err(|kind| WriterError::new(index, kind))?;
        }
        self.write_chunk(b"MTrk", payload.as_bytes())
            .map_err(|kind| WriterError::new(events.len(), kind))
    }

    fn write_meta(&mut self, meta: &MetaMessage) -> Result<(), WriterErrorKind> {
        let payload = meta.payload();
        if let MetaMessage::Unknown { meta_type, .. } = meta
            && let Ok(kind) = MetaType::try_from(*meta_type)
        {
            kind.check_len(length_field(payload.len())?)?;
        }
        self.write_u8(0xFF);
        self.write_u8(meta.type_byte());
        self.write_varlen(length_field(payload.len())?);
        self.write_bytes(&payload);
        Ok(())
    }

    fn write_sysex(&mut self, status: u8, data: &[u8]) -> Result<(), WriterErrorKind> {
        let len = length_field(data.len())?;
        self.write_u8(status);
        self.write_varlen(len);
        self.write_bytes(data);
        Ok(())
    }
}

fn length_field(len: usize) -> Result<u32, WriterErrorKind> {
    u32::try_from(len).map_err(|_| WriterErrorKind::ChunkTooLarge(len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ParseError,
        message::{Channel, ChannelMessage, Tempo, VoiceEvent},
        reader::{Reader, TrackReader},
    };
    use pretty_assertions::assert_eq;

    fn encoded(event: TrackEvent) -> Vec<u8> {
        let mut writer = Writer::new();
        writer.write_event(&event).unwrap();
        writer.into_bytes()
    }

    #[test]
    fn varlen_boundaries() {
        let cases: [(u32, &[u8]); 7] = [
            (0, &[0x00]),
            (127, &[0x7F]),
            (128, &[0x81, 0x00]),
            (16_383, &[0xFF, 0x7F]),
            (16_384, &[0x81, 0x80, 0x00]),
            (0x0FFF_FFFF, &[0xFF, 0xFF, 0xFF, 0x7F]),
            (u32::MAX, &[0x8F, 0xFF, 0xFF, 0xFF, 0x7F]),
        ];
        for (value, expected) in cases {
            let mut writer = Writer::new();
            writer.write_varlen(value);
            assert_eq!(writer.as_bytes(), expected);
            assert_eq!(
                Reader::from_byte_slice(writer.as_bytes()).read_varlen().unwrap(),
                value
            );
        }
    }

    #[test]
    fn channel_events_always_carry_status() {
        let channel = Channel::new(3).unwrap();
        assert_eq!(
            encoded(TrackEvent::new(0, ChannelMessage::note_on(channel, 60, 100))),
            [0x00, 0x93, 60, 100]
        );
        assert_eq!(
            encoded(TrackEvent::new(200, ChannelMessage::program_change(channel, 5))),
            [0x81, 0x48, 0xC3, 5]
        );
        assert_eq!(
            encoded(TrackEvent::new(
                0,
                ChannelMessage::new(channel, VoiceEvent::PitchBend { value: 0x2000 })
            )),
            [0x00, 0xE3, 0x00, 0x40]
        );
    }

    #[test]
    fn out_of_range_data_bytes_are_not_written() {
        let channel = Channel::new(0).unwrap();
        let mut writer = Writer::new();
        assert_eq!(
            writer.write_event(&TrackEvent::new(0, ChannelMessage::program_change(channel, 200))),
            Err(WriterErrorKind::DataByteOutOfRange(200))
        );
        assert!(writer.is_empty());
    }

    #[test]
    fn meta_and_sysex_layouts() {
        assert_eq!(
            encoded(TrackEvent::new(0, MetaMessage::SetTempo(Tempo::new(500_000)))),
            [0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]
        );
        assert_eq!(
            encoded(TrackEvent::new(0, MetaMessage::EndOfTrack)),
            [0x00, 0xFF, 0x2F, 0x00]
        );
        assert_eq!(
            encoded(TrackEvent::new(0, TrackMessage::SysEx(alloc::vec![0x7E, 0xF7]))),
            [0x00, 0xF0, 0x02, 0x7E, 0xF7]
        );
    }

    #[test]
    fn long_meta_payload_uses_a_varlen_length() {
        let text = alloc::vec![b'a'; 200];
        let bytes = encoded(TrackEvent::new(0, MetaMessage::Text(text.clone())));
        assert_eq!(&bytes[..5], &[0x00, 0xFF, 0x01, 0x81, 0x48]);

        let events = TrackReader::new(Reader::from_byte_slice(&bytes))
            .read_all()
            .unwrap();
        assert_eq!(events[0].message().as_meta(), Some(&MetaMessage::Text(text)));
    }

    #[test]
    fn unknown_meta_with_known_type_is_validated() {
        let mut writer = Writer::new();
        let event = TrackEvent::new(
            0,
            MetaMessage::Unknown {
                meta_type: 0x51,
                data: alloc::vec![1],
            },
        );
        assert!(matches!(
            writer.write_event(&event),
            Err(WriterErrorKind::InvalidPayload(ParseError::BadEventLength {
                expected: 3,
                found: 1,
                ..
            }))
        ));
    }

    #[test]
    fn track_errors_carry_the_event_index() {
        let events = [
            TrackEvent::new(0, MetaMessage::EndOfTrack),
            TrackEvent::new(
                0,
                MetaMessage::Unknown {
                    meta_type: 0x2F,
                    data: alloc::vec![0],
                },
            ),
        ];
        let err = Writer::new().write_track(&events).unwrap_err();
        assert_eq!(err.event_index(), 1);
    }
}
