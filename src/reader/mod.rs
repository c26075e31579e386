#![doc = r#"
Sequential reading of MIDI bytes.

[`Reader`] is a cursor over a borrowed byte slice. Every read either returns
the requested value and advances, or fails with
[`ReaderErrorKind::OutOfBounds`] without consuming anything.

Positions reported by a reader are absolute: a reader handed out for a chunk
payload remembers where that payload starts in the original buffer, so errors
deep inside a track still point at the right byte of the file.
"#]

mod error;
pub use error::*;

mod track;
pub use track::*;

use crate::ParseError;

/// Length of a chunk identifier plus its big-endian length field.
pub(crate) const CHUNK_PREAMBLE_LEN: usize = 8;

#[doc = r#"
A cursor over a fixed byte buffer.

# Example
```rust
# use midiconv::reader::Reader;
let mut reader = Reader::from_byte_slice(&[0x81, 0x00, 0x12, 0x34]);

assert_eq!(reader.read_varlen().unwrap(), 128);
assert_eq!(reader.read_u16_be().unwrap(), 0x1234);
assert!(reader.is_at_end());
```
"#]
#[derive(Debug, Clone)]
pub struct Reader<'slc> {
    data: &'slc [u8],
    position: usize,
    origin: usize,
}

impl<'slc> Reader<'slc> {
    /// Create a reader over the full slice
    pub const fn from_byte_slice(data: &'slc [u8]) -> Self {
        Self {
            data,
            position: 0,
            origin: 0,
        }
    }

    /// A reader over `data`, which lives at `origin` in the outer buffer.
    pub(crate) const fn with_origin(data: &'slc [u8], origin: usize) -> Self {
        Self {
            data,
            position: 0,
            origin,
        }
    }

    /// Absolute position of the cursor in the original buffer.
    pub const fn buffer_position(&self) -> usize {
        self.origin + self.position
    }

    /// True once every byte has been consumed.
    pub const fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Bytes left to read.
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    pub(crate) const fn oob(&self) -> ReaderError {
        ReaderError::oob(self.buffer_position())
    }

    /// Returns the next `len` bytes and advances past them.
    pub fn read_bytes(&mut self, len: usize) -> ReadResult<&'slc [u8]> {
        let end = self
            .position
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| self.oob())?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Reads a fixed size array.
    pub fn read_exact_size<const SIZE: usize>(&mut self) -> ReadResult<[u8; SIZE]> {
        let bytes = self.read_bytes(SIZE)?;
        let mut out = [0; SIZE];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Reads one unsigned byte.
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let [byte] = self.read_exact_size()?;
        Ok(byte)
    }

    /// Reads one byte as a two's complement value.
    pub fn read_i8(&mut self) -> ReadResult<i8> {
        let [byte] = self.read_exact_size()?;
        Ok(byte as i8)
    }

    /// Reads a big-endian `u16`.
    pub fn read_u16_be(&mut self) -> ReadResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Reads a big-endian `u32`.
    pub fn read_u32_be(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Reads a MIDI variable-length quantity.
    ///
    /// Each byte contributes its low 7 bits, most significant group first.
    /// A byte with the high bit clear terminates the value. Files only use
    /// up to four bytes; five are accepted while the value fits a `u32`.
    ///
    /// # Errors
    /// [`ParseError::VarlenOverflow`] at the first byte of a quantity that
    /// does not fit, out of bounds if the buffer ends before the last byte.
    pub fn read_varlen(&mut self) -> ReadResult<u32> {
        let start = self.position;
        let mut value: u32 = 0;
        for _ in 0..5 {
            let byte = match self.read_u8() {
                Ok(byte) => byte,
                Err(e) => {
                    self.position = start;
                    return Err(e);
                }
            };
            if value > u32::MAX >> 7 {
                break;
            }
            value = (value << 7) | u32::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        self.position = start;
        Err(ReaderError::parse(
            self.buffer_position(),
            ParseError::VarlenOverflow,
        ))
    }

    /// Reads a chunk identifier, its length, and the payload it announces.
    pub fn read_chunk(&mut self) -> ReadResult<RawChunk<'slc>> {
        let id = self.read_exact_size()?;
        let length = self.read_u32_be()?;
        let origin = self.buffer_position();
        let data = self.read_bytes(length as usize)?;
        Ok(RawChunk { id, data, origin })
    }
}

#[doc = r#"
A tagged, length-prefixed block of a MIDI file.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChunk<'slc> {
    id: [u8; 4],
    data: &'slc [u8],
    origin: usize,
}

impl<'slc> RawChunk<'slc> {
    /// The four byte identifier (`MThd`, `MTrk`, ...)
    pub const fn id(&self) -> &[u8; 4] {
        &self.id
    }
    /// The payload bytes.
    pub const fn data(&self) -> &'slc [u8] {
        self.data
    }
    /// Length of the payload.
    pub const fn len(&self) -> usize {
        self.data.len()
    }
    /// True if the chunk carries no payload.
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// A reader over the payload that reports absolute positions.
    pub const fn reader(&self) -> Reader<'slc> {
        Reader::with_origin(self.data, self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fixed_width_reads_are_big_endian() {
        let mut reader = Reader::from_byte_slice(&[0x00, 0x00, 0x01, 0xE0, 0x12, 0x34, 0xFE]);
        assert_eq!(reader.read_u32_be().unwrap(), 480);
        assert_eq!(reader.read_u16_be().unwrap(), 0x1234);
        assert_eq!(reader.buffer_position(), 6);
        assert_eq!(reader.read_i8().unwrap(), -2);
        assert!(reader.is_at_end());
    }

    #[test]
    fn unsigned_byte_is_not_sign_extended() {
        let mut reader = Reader::from_byte_slice(&[0xFE]);
        assert_eq!(reader.read_u8().unwrap(), 254);
    }

    #[test]
    fn varlen_boundaries() {
        let cases: [(&[u8], u32); 7] = [
            (&[0x00], 0),
            (&[0x7F], 127),
            (&[0x81, 0x00], 128),
            (&[0xFF, 0x7F], 16_383),
            (&[0x81, 0x80, 0x00], 16_384),
            (&[0xFF, 0xFF, 0xFF, 0x7F], 0x0FFF_FFFF),
            (&[0x8F, 0xFF, 0xFF, 0xFF, 0x7F], u32::MAX),
        ];
        for (bytes, expected) in cases {
            let mut reader = Reader::from_byte_slice(bytes);
            assert_eq!(reader.read_varlen().unwrap(), expected);
            assert!(reader.is_at_end());
        }
    }

    #[test]
    fn unterminated_varlen_is_out_of_bounds() {
        let mut reader = Reader::from_byte_slice(&[0x81, 0x80]);
        let err = reader.read_varlen().unwrap_err();
        assert!(err.is_out_of_bounds());
        assert_eq!(reader.buffer_position(), 0);
    }

    #[test]
    fn overlong_varlen_is_rejected() {
        let mut reader = Reader::from_byte_slice(&[0x00, 0x90, 0x80, 0x80, 0x80, 0x00]);
        reader.read_u8().unwrap();
        let err = reader.read_varlen().unwrap_err();
        assert_eq!(err.parse_error(), Some(&ParseError::VarlenOverflow));
        assert_eq!(err.position(), 1);
        assert_eq!(reader.buffer_position(), 1);

        let mut reader = Reader::from_byte_slice(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        assert_eq!(
            reader.read_varlen().unwrap_err().parse_error(),
            Some(&ParseError::VarlenOverflow)
        );
    }

    #[test]
    fn reading_past_the_end_does_not_advance() {
        let mut reader = Reader::from_byte_slice(&[0x01, 0x02]);
        assert!(reader.read_u32_be().unwrap_err().is_out_of_bounds());
        assert_eq!(reader.read_bytes(2).unwrap(), &[0x01, 0x02]);
        assert!(reader.read_u8().unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn chunk_reader_reports_absolute_positions() {
        let bytes = [b'M', b'T', b'r', b'k', 0, 0, 0, 2, 0xAA, 0xBB];
        let mut reader = Reader::from_byte_slice(&bytes);
        let chunk = reader.read_chunk().unwrap();
        assert_eq!(chunk.id(), b"MTrk");
        assert_eq!(chunk.data(), &[0xAA, 0xBB]);

        let mut payload = chunk.reader();
        payload.read_u8().unwrap();
        assert_eq!(payload.buffer_position(), 9);
        assert_eq!(payload.read_u16_be().unwrap_err().position(), 9);
    }

    #[test]
    fn truncated_chunk_payload() {
        let bytes = [b'M', b'T', b'r', b'k', 0, 0, 0, 9, 0xAA];
        let mut reader = Reader::from_byte_slice(&bytes);
        assert!(reader.read_chunk().unwrap_err().is_out_of_bounds());
    }
}
