use alloc::vec::Vec;

use super::{WriteResult, WriterError, WriterErrorKind};
use crate::{
    events::{TrackEvent, TrackMessage},
    file::Track,
    message::{Channel, ChannelMessage, MetaMessage, Tempo, TimeSignature},
};

#[doc = r#"
Assembles the events of one track in order.

Every method takes the delta time of the event it appends, except the
transport setters which are placed at delta zero. Errors carry the index the
rejected event would have had.

# Example
```rust
# use midiconv::prelude::*;
let piano = Channel::new(0).unwrap();

let mut writer = TrackWriter::new();
writer
    .set_tempo(120.)
    .set_instrument(piano, 0)
    .add_note_on(piano, 60, 0, 100)
    .add_note_off(piano, 60, 480, 0);
writer.set_time_signature(3, 4).unwrap();

let track = writer.finish();
assert_eq!(track.len(), 6);
assert!(track.is_terminated());
```
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackWriter {
    events: Vec<TrackEvent>,
}

impl TrackWriter {
    /// Create an empty track writer
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Number of events appended so far
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if nothing was appended
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Appends an already built message.
    pub fn push(&mut self, delta_ticks: u32, message: impl Into<TrackMessage>) -> &mut Self {
        self.events.push(TrackEvent::new(delta_ticks, message));
        self
    }

    /// Appends a channel event from a status byte and raw parameters.
    ///
    /// See [`ChannelMessage::from_raw`] for the validation applied.
    pub fn push_raw_channel(
        &mut self,
        delta_ticks: u32,
        status: u8,
        channel: u8,
        param1: u8,
        param2: Option<u8>,
    ) -> WriteResult<&mut Self> {
        let message = ChannelMessage::from_raw(status, channel, param1, param2)
            .map_err(|kind| self.error(kind))?;
        Ok(self.push(delta_ticks, message))
    }

    /// Appends a meta event from a type byte and a raw payload.
    ///
    /// See [`MetaMessage::from_raw`] for the validation applied.
    pub fn push_raw_meta(
        &mut self,
        delta_ticks: u32,
        meta_type: Option<u8>,
        data: &[u8],
    ) -> WriteResult<&mut Self> {
        let message = MetaMessage::from_raw(meta_type, data).map_err(|kind| self.error(kind))?;
        Ok(self.push(delta_ticks, message))
    }

    /// Sets the tempo in beats per minute.
    pub fn set_tempo(&mut self, bpm: f64) -> &mut Self {
        self.push(0, MetaMessage::SetTempo(Tempo::from_bpm(bpm)))
    }

    /// Sets the time signature.
    ///
    /// # Errors
    /// [`WriterErrorKind::InvalidTimeSignature`] if `denominator` is not a
    /// power of two.
    pub fn set_time_signature(&mut self, numerator: u8, denominator: u32) -> WriteResult<&mut Self> {
        let signature = TimeSignature::new(numerator, denominator)
            .ok_or_else(|| self.error(WriterErrorKind::InvalidTimeSignature(denominator)))?;
        Ok(self.push(0, MetaMessage::TimeSignature(signature)))
    }

    /// Selects the program played by `channel`.
    pub fn set_instrument(&mut self, channel: Channel, program: u8) -> &mut Self {
        self.push(0, ChannelMessage::program_change(channel, program))
    }

    /// Appends a note on.
    pub fn add_note_on(
        &mut self,
        channel: Channel,
        note: u8,
        delta_ticks: u32,
        velocity: u8,
    ) -> &mut Self {
        self.push(delta_ticks, ChannelMessage::note_on(channel, note, velocity))
    }

    /// Appends a note off.
    pub fn add_note_off(
        &mut self,
        channel: Channel,
        note: u8,
        delta_ticks: u32,
        velocity: u8,
    ) -> &mut Self {
        self.push(delta_ticks, ChannelMessage::note_off(channel, note, velocity))
    }

    /// Presses the damper pedal.
    pub fn add_sustain_on(&mut self, channel: Channel, delta_ticks: u32) -> &mut Self {
        self.push(delta_ticks, ChannelMessage::sustain(channel, true))
    }

    /// Releases the damper pedal.
    pub fn add_sustain_off(&mut self, channel: Channel, delta_ticks: u32) -> &mut Self {
        self.push(delta_ticks, ChannelMessage::sustain(channel, false))
    }

    /// Closes the track, appending an end of track marker unless the last
    /// event already is one.
    pub fn finish(mut self) -> Track {
        let terminated = self
            .events
            .last()
            .is_some_and(|e| e.message().is_end_of_track());
        if !terminated {
            self.push(0, MetaMessage::EndOfTrack);
        }
        Track::new(self.events)
    }

    fn error(&self, kind: WriterErrorKind) -> WriterError {
        WriterError::new(self.events.len(), kind)
    }
}
