#![doc = r#"
Events as they appear in a track: a delta time followed by a message.
"#]

use alloc::vec::Vec;

use crate::message::{ChannelMessage, MetaMessage, VoiceEvent};

#[doc = r#"
The tagged union of everything a track chunk can hold.
"#]
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackMessage {
    /// `FF` meta events
    Meta(MetaMessage),
    /// `F0` system exclusive, payload after the length
    SysEx(Vec<u8>),
    /// `F7` continuation (or escaped) system exclusive
    DividedSysEx(Vec<u8>),
    /// Channel voice events
    Channel(ChannelMessage),
}

impl TrackMessage {
    /// The channel message, if this is one
    pub const fn as_channel(&self) -> Option<&ChannelMessage> {
        match self {
            Self::Channel(c) => Some(c),
            _ => None,
        }
    }

    /// The meta message, if this is one
    pub const fn as_meta(&self) -> Option<&MetaMessage> {
        match self {
            Self::Meta(m) => Some(m),
            _ => None,
        }
    }

    /// The voice event of a channel message
    pub fn voice(&self) -> Option<&VoiceEvent> {
        self.as_channel().map(ChannelMessage::event)
    }

    /// True for a note on carrying a non-zero velocity
    pub fn is_note_on(&self) -> bool {
        matches!(self.voice(), Some(VoiceEvent::NoteOn { .. }))
    }

    /// True for note offs, including decoded zero velocity note ons
    pub fn is_note_off(&self) -> bool {
        matches!(self.voice(), Some(VoiceEvent::NoteOff { .. }))
    }

    /// True for the end of track meta event
    pub fn is_end_of_track(&self) -> bool {
        matches!(self, Self::Meta(MetaMessage::EndOfTrack))
    }
}

impl From<ChannelMessage> for TrackMessage {
    fn from(value: ChannelMessage) -> Self {
        Self::Channel(value)
    }
}

impl From<MetaMessage> for TrackMessage {
    fn from(value: MetaMessage) -> Self {
        Self::Meta(value)
    }
}

#[doc = r#"
A message preceded by the ticks elapsed since the previous event of its track.
"#]
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent {
    delta_ticks: u32,
    message: TrackMessage,
}

impl TrackEvent {
    /// Create a new track event
    pub fn new(delta_ticks: u32, message: impl Into<TrackMessage>) -> Self {
        Self {
            delta_ticks,
            message: message.into(),
        }
    }

    /// Ticks since the previous event in the track
    pub const fn delta_ticks(&self) -> u32 {
        self.delta_ticks
    }

    /// Replaces the delta time
    pub fn set_delta_ticks(&mut self, delta_ticks: u32) {
        self.delta_ticks = delta_ticks;
    }

    /// The message
    pub const fn message(&self) -> &TrackMessage {
        &self.message
    }

    /// Takes the message
    pub fn into_message(self) -> TrackMessage {
        self.message
    }
}

#[doc = r#"
A value paired with the number of ticks accumulated since the start of its track.
"#]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Ticked<T> {
    accumulated_ticks: u64,
    event: T,
}

impl<T> Ticked<T> {
    /// Create a new ticked value
    pub const fn new(accumulated_ticks: u64, event: T) -> Self {
        Self {
            accumulated_ticks,
            event,
        }
    }
    /// Absolute position in ticks
    pub const fn accumulated_ticks(&self) -> u64 {
        self.accumulated_ticks
    }
    /// The wrapped value
    pub const fn event(&self) -> &T {
        &self.event
    }
    /// Takes the wrapped value
    pub fn into_event(self) -> T {
        self.event
    }
}
