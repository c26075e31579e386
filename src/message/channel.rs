use core::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::writer::WriterErrorKind;

/// Controller number of the damper (sustain) pedal.
pub const DAMPER_PEDAL: u8 = 64;

/// Channel number of the General MIDI percussion kit.
pub const PERCUSSION_CHANNEL: Channel = Channel(9);

#[doc = r#"
A MIDI channel, `0..=15`.

Channels are zero based on the wire. `Channel::new(9)` is what most
software displays as "channel 10", the percussion channel.
"#]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channel(u8);

impl Channel {
    /// Returns `None` for anything above 15.
    pub const fn new(channel: u8) -> Option<Self> {
        if channel > 15 {
            None
        } else {
            Some(Self(channel))
        }
    }

    /// Takes the low nibble of a status byte.
    pub const fn from_status(status: u8) -> Self {
        Self(status & 0x0F)
    }

    /// The zero based channel number
    pub const fn number(&self) -> u8 {
        self.0
    }

    /// True for the General MIDI percussion channel.
    pub const fn is_percussion(&self) -> bool {
        self.0 == PERCUSSION_CHANNEL.0
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<u8> for Channel {
    type Error = WriterErrorKind;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(WriterErrorKind::ChannelOutOfRange(value))
    }
}

#[doc = r#"
The high nibble of a channel status byte.
"#]
#[derive(Copy, Clone, PartialEq, Eq, Debug, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum VoiceStatus {
    /// `0x8n`
    NoteOff = 0x8,
    /// `0x9n`
    NoteOn = 0x9,
    /// `0xAn`
    NoteAftertouch = 0xA,
    /// `0xBn`
    Controller = 0xB,
    /// `0xCn`
    ProgramChange = 0xC,
    /// `0xDn`
    ChannelAftertouch = 0xD,
    /// `0xEn`
    PitchBend = 0xE,
}

impl VoiceStatus {
    /// Identifies the status of a byte, ignoring the channel nibble.
    pub fn from_status_byte(status: u8) -> Option<Self> {
        Self::try_from(status >> 4).ok()
    }

    /// Status byte for this kind on `channel`.
    pub fn status_byte(self, channel: Channel) -> u8 {
        (u8::from(self) << 4) | channel.number()
    }

    /// Program change and channel aftertouch carry a single data byte.
    pub const fn data_len(self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelAftertouch => 1,
            _ => 2,
        }
    }
}

#[doc = r#"
The payload of a channel voice message.

A note on with velocity zero is decoded as [`VoiceEvent::NoteOff`].
"#]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VoiceEvent {
    /// Release a note
    NoteOff {
        /// MIDI note number
        note: u8,
        /// Release velocity
        velocity: u8,
    },
    /// Press a note
    NoteOn {
        /// MIDI note number
        note: u8,
        /// Attack velocity
        velocity: u8,
    },
    /// Polyphonic pressure on a held note
    NoteAftertouch {
        /// MIDI note number
        note: u8,
        /// Pressure
        amount: u8,
    },
    /// Control change
    Controller {
        /// Controller number, see [`DAMPER_PEDAL`]
        controller: u8,
        /// Controller value
        value: u8,
    },
    /// Instrument selection
    ProgramChange {
        /// Zero based program number
        program: u8,
    },
    /// Channel-wide pressure
    ChannelAftertouch {
        /// Pressure
        amount: u8,
    },
    /// 14-bit pitch wheel position, `0x2000` is centered.
    PitchBend {
        /// `lsb + (msb << 7)`
        value: u16,
    },
}

impl VoiceEvent {
    /// Builds the event from its status and the data bytes that followed it.
    pub(crate) fn from_parts(status: VoiceStatus, param1: u8, param2: u8) -> Self {
        match status {
            VoiceStatus::NoteOff => Self::NoteOff {
                note: param1,
                velocity: param2,
            },
            VoiceStatus::NoteOn if param2 == 0 => Self::NoteOff {
                note: param1,
                velocity: 0,
            },
            VoiceStatus::NoteOn => Self::NoteOn {
                note: param1,
                velocity: param2,
            },
            VoiceStatus::NoteAftertouch => Self::NoteAftertouch {
                note: param1,
                amount: param2,
            },
            VoiceStatus::Controller => Self::Controller {
                controller: param1,
                value: param2,
            },
            VoiceStatus::ProgramChange => Self::ProgramChange { program: param1 },
            VoiceStatus::ChannelAftertouch => Self::ChannelAftertouch { amount: param1 },
            VoiceStatus::PitchBend => Self::PitchBend {
                value: u16::from(param1) + (u16::from(param2) << 7),
            },
        }
    }

    /// The status nibble this event is written with.
    pub const fn status(&self) -> VoiceStatus {
        match self {
            Self::NoteOff { .. } => VoiceStatus::NoteOff,
            Self::NoteOn { .. } => VoiceStatus::NoteOn,
            Self::NoteAftertouch { .. } => VoiceStatus::NoteAftertouch,
            Self::Controller { .. } => VoiceStatus::Controller,
            Self::ProgramChange { .. } => VoiceStatus::ProgramChange,
            Self::ChannelAftertouch { .. } => VoiceStatus::ChannelAftertouch,
            Self::PitchBend { .. } => VoiceStatus::PitchBend,
        }
    }

    /// Data bytes as written after the status byte. The second is `None` for
    /// single parameter events.
    pub const fn data_bytes(&self) -> (u8, Option<u8>) {
        match *self {
            Self::NoteOff { note, velocity } | Self::NoteOn { note, velocity } => {
                (note, Some(velocity))
            }
            Self::NoteAftertouch { note, amount } => (note, Some(amount)),
            Self::Controller { controller, value } => (controller, Some(value)),
            Self::ProgramChange { program } => (program, None),
            Self::ChannelAftertouch { amount } => (amount, None),
            Self::PitchBend { value } => ((value & 0x7F) as u8, Some(((value >> 7) & 0x7F) as u8)),
        }
    }

    /// Checks that every parameter fits its data bytes.
    ///
    /// # Errors
    /// - [`WriterErrorKind::DataByteOutOfRange`] for a parameter above 127
    /// - [`WriterErrorKind::PitchBendOutOfRange`] for a bend above `0x3FFF`
    pub fn check_data(&self) -> Result<(), WriterErrorKind> {
        if let Self::PitchBend { value } = *self {
            if value > 0x3FFF {
                return Err(WriterErrorKind::PitchBendOutOfRange(value));
            }
            return Ok(());
        }
        let (param1, param2) = self.data_bytes();
        if param1 > 0x7F {
            return Err(WriterErrorKind::DataByteOutOfRange(param1));
        }
        if let Some(param2) = param2
            && param2 > 0x7F
        {
            return Err(WriterErrorKind::DataByteOutOfRange(param2));
        }
        Ok(())
    }

    /// The note number, for note on/off and polyphonic aftertouch
    pub const fn note(&self) -> Option<u8> {
        match *self {
            Self::NoteOff { note, .. }
            | Self::NoteOn { note, .. }
            | Self::NoteAftertouch { note, .. } => Some(note),
            _ => None,
        }
    }
}

#[doc = r#"
A channel voice event addressed to one of the sixteen channels.

# Example
```rust
# use midiconv::prelude::*;
let message = ChannelMessage::from_raw(0x90, 3, 60, Some(100)).unwrap();

assert_eq!(message.channel().number(), 3);
assert_eq!(message.event(), &VoiceEvent::NoteOn { note: 60, velocity: 100 });
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelMessage {
    channel: Channel,
    event: VoiceEvent,
}

impl ChannelMessage {
    /// Create a new channel message
    pub const fn new(channel: Channel, event: VoiceEvent) -> Self {
        Self { channel, event }
    }

    /// Builds a message from a status byte, a channel and raw parameters.
    ///
    /// Only the high nibble of `status` is considered. A missing second
    /// parameter is written as zero for the kinds that need one.
    ///
    /// # Errors
    /// - [`WriterErrorKind::UnknownEventType`] if `status` is not a channel voice status
    /// - [`WriterErrorKind::ChannelOutOfRange`] if `channel > 15`
    /// - [`WriterErrorKind::DataByteOutOfRange`] if a parameter is above 127
    pub fn from_raw(
        status: u8,
        channel: u8,
        param1: u8,
        param2: Option<u8>,
    ) -> Result<Self, WriterErrorKind> {
        let status =
            VoiceStatus::from_status_byte(status).ok_or(WriterErrorKind::UnknownEventType(status))?;
        let channel = Channel::try_from(channel)?;
        if let Some(byte) = [Some(param1), param2].into_iter().flatten().find(|b| *b > 0x7F) {
            return Err(WriterErrorKind::DataByteOutOfRange(byte));
        }
        Ok(Self::new(
            channel,
            VoiceEvent::from_parts(status, param1, param2.unwrap_or(0)),
        ))
    }

    /// A note on message
    pub const fn note_on(channel: Channel, note: u8, velocity: u8) -> Self {
        Self::new(channel, VoiceEvent::NoteOn { note, velocity })
    }

    /// A note off message
    pub const fn note_off(channel: Channel, note: u8, velocity: u8) -> Self {
        Self::new(channel, VoiceEvent::NoteOff { note, velocity })
    }

    /// A damper pedal controller message. `on` writes 127, otherwise 0.
    pub const fn sustain(channel: Channel, on: bool) -> Self {
        Self::new(
            channel,
            VoiceEvent::Controller {
                controller: DAMPER_PEDAL,
                value: if on { 127 } else { 0 },
            },
        )
    }

    /// A program change message
    pub const fn program_change(channel: Channel, program: u8) -> Self {
        Self::new(channel, VoiceEvent::ProgramChange { program })
    }

    /// The channel the event is addressed to
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// The voice event
    pub const fn event(&self) -> &VoiceEvent {
        &self.event
    }

    /// The full status byte, channel included.
    pub fn status_byte(&self) -> u8 {
        self.event.status().status_byte(self.channel)
    }
}

#[test]
fn note_on_with_zero_velocity_is_note_off() {
    use pretty_assertions::assert_eq;
    let event = VoiceEvent::from_parts(VoiceStatus::NoteOn, 60, 0);
    assert_eq!(
        event,
        VoiceEvent::NoteOff {
            note: 60,
            velocity: 0
        }
    );
}

#[test]
fn pitch_bend_is_fourteen_bits() {
    use pretty_assertions::assert_eq;
    let event = VoiceEvent::from_parts(VoiceStatus::PitchBend, 0x00, 0x40);
    assert_eq!(event, VoiceEvent::PitchBend { value: 0x2000 });
    assert_eq!(event.data_bytes(), (0x00, Some(0x40)));

    let event = VoiceEvent::from_parts(VoiceStatus::PitchBend, 0x7F, 0x7F);
    assert_eq!(event, VoiceEvent::PitchBend { value: 0x3FFF });
}

#[test]
fn raw_channel_messages_are_validated() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        ChannelMessage::from_raw(0x70, 0, 60, Some(1)),
        Err(WriterErrorKind::UnknownEventType(0x70))
    );
    assert_eq!(
        ChannelMessage::from_raw(0xF0, 0, 60, Some(1)),
        Err(WriterErrorKind::UnknownEventType(0xF0))
    );
    assert_eq!(
        ChannelMessage::from_raw(0x90, 16, 60, Some(1)),
        Err(WriterErrorKind::ChannelOutOfRange(16))
    );
    assert_eq!(
        ChannelMessage::from_raw(0xC0, 0, 200, None),
        Err(WriterErrorKind::DataByteOutOfRange(200))
    );
    assert_eq!(
        ChannelMessage::from_raw(0x90, 0, 60, Some(0x80)),
        Err(WriterErrorKind::DataByteOutOfRange(0x80))
    );
    let message = ChannelMessage::from_raw(0xC5, 2, 10, None).unwrap();
    assert_eq!(message.status_byte(), 0xC2);
    assert_eq!(message.event(), &VoiceEvent::ProgramChange { program: 10 });
}

#[test]
fn data_bytes_are_seven_bits() {
    use pretty_assertions::assert_eq;
    assert_eq!(VoiceEvent::ProgramChange { program: 127 }.check_data(), Ok(()));
    assert_eq!(
        VoiceEvent::NoteOn {
            note: 128,
            velocity: 1
        }
        .check_data(),
        Err(WriterErrorKind::DataByteOutOfRange(128))
    );
    assert_eq!(
        VoiceEvent::PitchBend { value: 0x4000 }.check_data(),
        Err(WriterErrorKind::PitchBendOutOfRange(0x4000))
    );
}
