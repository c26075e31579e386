use crate::{
    ParseError,
    file::{FormatType, TicksPerQuarterNote},
    reader::{CHUNK_PREAMBLE_LEN, ReadResult, Reader, ReaderError},
};

#[doc = r#"
The contents of the `MThd` chunk: format, declared track count and time division.

# Example
```rust
# use midiconv::prelude::*;
let bytes = [b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 2, 0x01, 0xE0];
let file_header = Header::parse(&bytes).unwrap();

assert_eq!(file_header.format_type(), FormatType::Simultaneous);
assert_eq!(file_header.track_count(), 2);
assert_eq!(file_header.timing().ticks_per_quarter_note(), 480);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    format: FormatType,
    track_count: u16,
    timing: TicksPerQuarterNote,
}

impl Header {
    /// Payload length of every `MThd` chunk.
    pub const LEN: u32 = 6;

    /// Create a header from its three fields
    pub const fn new(format: FormatType, track_count: u16, timing: TicksPerQuarterNote) -> Self {
        Self {
            format,
            track_count,
            timing,
        }
    }

    /// Reads a header chunk from the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        Self::read(&mut Reader::from_byte_slice(bytes))
    }

    /// Reads the `MThd` chunk at the cursor.
    ///
    /// A missing, truncated or wrongly sized header chunk, and an unknown
    /// format number, are all [`ParseError::MalformedHeader`]. A division with
    /// its top bit set is [`ParseError::UnsupportedTimeDivision`].
    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let start = reader.buffer_position();
        let malformed = |position| ReaderError::parse(position, ParseError::MalformedHeader);

        let id: [u8; 4] = reader.read_exact_size().map_err(|_| malformed(start))?;
        let len = reader.read_u32_be().map_err(|_| malformed(start))?;
        if &id != b"MThd" || len != Self::LEN {
            return Err(malformed(start));
        }
        let payload = reader
            .read_bytes(Self::LEN as usize)
            .map_err(|_| malformed(start))?;
        let mut payload = Reader::with_origin(payload, start + CHUNK_PREAMBLE_LEN);

        let format_position = payload.buffer_position();
        let format = FormatType::try_from(payload.read_u16_be()?)
            .map_err(|_| malformed(format_position))?;
        let track_count = payload.read_u16_be()?;

        let division_position = payload.buffer_position();
        let timing = TicksPerQuarterNote::from_division(payload.read_u16_be()?)
            .map_err(|e| ReaderError::parse(division_position, e))?;

        Ok(Self::new(format, track_count, timing))
    }

    /// The six payload bytes.
    pub fn to_bytes(&self) -> [u8; 6] {
        let [f0, f1] = self.format.number().to_be_bytes();
        let [c0, c1] = self.track_count.to_be_bytes();
        let [d0, d1] = self.timing.ticks_per_quarter_note().to_be_bytes();
        [f0, f1, c0, c1, d0, d1]
    }

    /// How the tracks relate to each other
    pub const fn format_type(&self) -> FormatType {
        self.format
    }

    /// Number of `MTrk` chunks the header announces
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }

    /// The time division
    pub const fn timing(&self) -> TicksPerQuarterNote {
        self.timing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn header(len: u8, format: u16, division: u16) -> alloc::vec::Vec<u8> {
        let mut bytes = alloc::vec::Vec::new();
        bytes.extend_from_slice(b"MThd");
        bytes.extend_from_slice(&[0, 0, 0, len]);
        bytes.extend_from_slice(&format.to_be_bytes());
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.extend_from_slice(&division.to_be_bytes());
        bytes
    }

    #[test]
    fn wrong_length_is_malformed() {
        let err = Header::parse(&header(7, 1, 480)).unwrap_err();
        assert_eq!(err.parse_error(), Some(&ParseError::MalformedHeader));
        assert_eq!(err.position(), 0);
    }

    #[test]
    fn wrong_id_is_malformed() {
        let mut bytes = header(6, 1, 480);
        bytes[0] = b'X';
        assert_eq!(
            Header::parse(&bytes).unwrap_err().parse_error(),
            Some(&ParseError::MalformedHeader)
        );
    }

    #[test]
    fn truncated_header_is_malformed() {
        let bytes = header(6, 1, 480);
        assert_eq!(
            Header::parse(&bytes[..11]).unwrap_err().parse_error(),
            Some(&ParseError::MalformedHeader)
        );
        assert_eq!(
            Header::parse(&[]).unwrap_err().parse_error(),
            Some(&ParseError::MalformedHeader)
        );
    }

    #[test]
    fn unknown_format_is_malformed() {
        let err = Header::parse(&header(6, 3, 480)).unwrap_err();
        assert_eq!(err.parse_error(), Some(&ParseError::MalformedHeader));
        assert_eq!(err.position(), 8);
    }

    #[test]
    fn smpte_division_is_rejected_at_its_offset() {
        let err = Header::parse(&header(6, 1, 0xE728)).unwrap_err();
        assert_eq!(
            err.parse_error(),
            Some(&ParseError::UnsupportedTimeDivision(0xE728))
        );
        assert_eq!(err.position(), 12);
    }

    #[test]
    fn payload_bytes() {
        let bytes = header(6, 0, 96);
        let parsed = Header::parse(&bytes).unwrap();
        assert_eq!(parsed.format_type(), FormatType::SingleMultiChannel);
        assert_eq!(&parsed.to_bytes()[..], &bytes[8..]);
    }
}
