use crate::ParseError;
use thiserror::Error;

#[doc = r#"
A failure while turning events into bytes.

`event_index` is the position of the offending event within its track. For
the file level kinds ([`WriterErrorKind::TooManyTracks`] and
[`WriterErrorKind::ChunkTooLarge`]) it is the number of tracks or events
that were being written.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Writing event {event_index}, {kind}")]
pub struct WriterError {
    event_index: usize,
    kind: WriterErrorKind,
}

/// A kind of error that a writer can produce
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WriterErrorKind {
    /// A raw meta event was built without a type byte.
    #[error("Meta event has no type byte")]
    MissingEventType,
    /// A raw channel event status outside `0x80..=0xEF`.
    #[error("Unknown channel event type {0:#04X}")]
    UnknownEventType(u8),
    /// A channel event data byte with its high bit set.
    #[error("Data byte {0:#04X} is out of range (0x00-0x7F)")]
    DataByteOutOfRange(u8),
    /// A pitch bend above the 14-bit maximum.
    #[error("Pitch bend {0:#06X} is out of range (0x0000-0x3FFF)")]
    PitchBendOutOfRange(u16),
    /// A channel above 15.
    #[error("Channel {0} is out of range (0-15)")]
    ChannelOutOfRange(u8),
    /// A time signature denominator that is not a power of two.
    #[error("Time signature denominator {0} is not a power of two")]
    InvalidTimeSignature(u32),
    /// A raw meta payload that does not fit its kind.
    #[error("Invalid meta payload: {0}")]
    InvalidPayload(#[from] ParseError),
    /// The header track count is a `u16`.
    #[error("{0} tracks do not fit in a header")]
    TooManyTracks(usize),
    /// A chunk or payload length that does not fit its length field.
    #[error("{0} bytes do not fit in a length field")]
    ChunkTooLarge(usize),
}

impl WriterError {
    /// Create a writer error from an index and kind
    pub const fn new(event_index: usize, kind: WriterErrorKind) -> Self {
        Self { event_index, kind }
    }

    /// Index of the offending event
    pub const fn event_index(&self) -> usize {
        self.event_index
    }

    /// Returns the error kind of the writer.
    pub const fn error_kind(&self) -> &WriterErrorKind {
        &self.kind
    }
}

/// The Write Result type (see [`WriterError`])
pub type WriteResult<T> = Result<T, WriterError>;
