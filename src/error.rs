use thiserror::Error;

use crate::message::MetaType;

#[doc = r#"
Structural problems found while interpreting the bytes of a MIDI file.

Every variant is terminal for the decode that produced it.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The file does not start with a well formed `MThd` chunk.
    #[error("Missing or malformed MThd header chunk")]
    MalformedHeader,
    /// A track chunk had an identifier other than `MTrk`.
    #[error("Expected an MTrk chunk, found {0:?}")]
    UnexpectedChunk([u8; 4]),
    /// The header division has its top bit set (SMPTE timing).
    #[error("SMPTE time division ({0:#06X}) is not supported")]
    UnsupportedTimeDivision(u16),
    /// A status or system byte outside of the known ranges.
    #[error("Unrecognised event type byte {0:#04X}")]
    UnrecognisedEventType(u8),
    /// A variable-length quantity whose value does not fit in 32 bits.
    #[error("Variable-length quantity overflows 32 bits")]
    VarlenOverflow,
    /// A meta event payload length that violates its fixed length.
    #[error("{meta_type:?} expects a payload of {expected} bytes, got {found}")]
    BadEventLength {
        /// The meta event kind
        meta_type: MetaType,
        /// The length required by the kind
        expected: u32,
        /// The length found on the wire
        found: u32,
    },
}

impl ParseError {
    pub(crate) const fn bad_length(meta_type: MetaType, expected: u32, found: u32) -> Self {
        Self::BadEventLength {
            meta_type,
            expected,
            found,
        }
    }
}
