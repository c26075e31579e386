use alloc::vec::Vec;

use super::{RawChunk, ReadResult, Reader, ReaderError};
use crate::{
    ParseError,
    events::{TrackEvent, TrackMessage},
    message::{Channel, ChannelMessage, MetaMessage, MetaType, VoiceEvent, VoiceStatus},
};

#[doc = r#"
Decodes the events of one `MTrk` payload.

The reader owns the running status of its track, so a fresh one must be
created for every track. Status bytes are only remembered for channel events;
meta and system exclusive events neither set nor clear it.

# Example
```rust
# use midiconv::prelude::*;
# use midiconv::reader::TrackReader;
// note on, then a second note on relying on running status
let bytes = [0x00, 0x90, 60, 100, 0x60, 62, 100];
let events = TrackReader::new(Reader::from_byte_slice(&bytes)).read_all().unwrap();

assert_eq!(events.len(), 2);
assert_eq!(events[1].delta_ticks(), 96);
assert_eq!(
    events[1].message().voice(),
    Some(&VoiceEvent::NoteOn { note: 62, velocity: 100 })
);
```
"#]
#[derive(Debug, Clone)]
pub struct TrackReader<'slc> {
    reader: Reader<'slc>,
    running_status: Option<u8>,
    failed: bool,
}

impl<'slc> TrackReader<'slc> {
    /// Reads events from `reader` until it is exhausted.
    pub const fn new(reader: Reader<'slc>) -> Self {
        Self {
            reader,
            running_status: None,
            failed: false,
        }
    }

    /// Reads the payload of a track chunk. The chunk id is not checked.
    pub const fn from_chunk(chunk: &RawChunk<'slc>) -> Self {
        Self::new(chunk.reader())
    }

    /// The status byte a data byte in status position would reuse.
    pub const fn running_status(&self) -> Option<u8> {
        self.running_status
    }

    /// True once the whole payload has been decoded.
    pub const fn is_at_end(&self) -> bool {
        self.reader.is_at_end()
    }

    /// Decodes the next event.
    ///
    /// # Errors
    /// Out of bounds reads and every [`ParseError`] an event can produce.
    /// Parse errors point at the status byte of the offending event.
    pub fn read_event(&mut self) -> ReadResult<TrackEvent> {
        let delta_ticks = self.reader.read_varlen()?;
        let status_position = self.reader.buffer_position();
        let status = self.reader.read_u8()?;

        let message = match status {
            0xFF => TrackMessage::Meta(self.read_meta(status_position)?),
            0xF0 => TrackMessage::SysEx(self.read_sysex()?),
            0xF7 => TrackMessage::DividedSysEx(self.read_sysex()?),
            0xF1..=0xFE => {
                return Err(ReaderError::parse(
                    status_position,
                    ParseError::UnrecognisedEventType(status),
                ));
            }
            _ => TrackMessage::Channel(self.read_channel(status, status_position)?),
        };

        Ok(TrackEvent::new(delta_ticks, message))
    }

    /// Decodes every remaining event.
    pub fn read_all(self) -> ReadResult<Vec<TrackEvent>> {
        self.collect()
    }

    fn read_meta(&mut self, status_position: usize) -> ReadResult<MetaMessage> {
        let meta_type = self.reader.read_u8()?;
        let len = self.reader.read_varlen()?;

        // fixed lengths are checked before the payload is pulled in
        if let Ok(kind) = MetaType::try_from(meta_type) {
            kind.check_len(len)
                .map_err(|e| ReaderError::parse(status_position, e))?;
        }
        let data = self.reader.read_bytes(len as usize)?;

        MetaMessage::parse(meta_type, data).map_err(|e| ReaderError::parse(status_position, e))
    }

    fn read_sysex(&mut self) -> ReadResult<Vec<u8>> {
        let len = self.reader.read_varlen()?;
        Ok(self.reader.read_bytes(len as usize)?.to_vec())
    }

    fn read_channel(&mut self, byte: u8, status_position: usize) -> ReadResult<ChannelMessage> {
        let (status, param1) = if byte & 0x80 == 0 {
            let Some(running) = self.running_status else {
                return Err(ReaderError::parse(
                    status_position,
                    ParseError::UnrecognisedEventType(byte),
                ));
            };
            (running, byte)
        } else {
            let param1 = self.reader.read_u8()?;
            self.running_status = Some(byte);
            (byte, param1)
        };

        let Some(kind) = VoiceStatus::from_status_byte(status) else {
            return Err(ReaderError::parse(
                status_position,
                ParseError::UnrecognisedEventType(status),
            ));
        };
        let param2 = match kind.data_len() {
            2 => self.reader.read_u8()?,
            _ => 0,
        };

        Ok(ChannelMessage::new(
            Channel::from_status(status),
            VoiceEvent::from_parts(kind, param1, param2),
        ))
    }
}

impl Iterator for TrackReader<'_> {
    type Item = ReadResult<TrackEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.is_at_end() {
            return None;
        }
        let event = self.read_event();
        self.failed = event.is_err();
        Some(event)
    }
}
