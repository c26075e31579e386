#![doc = r#"
Rusty representation of a [`MidiFile`]

A file is a header chunk followed by the track chunks it announces:

```text
[MThd: format, track count, ticks per quarter note]
[MTrk 1]
...
[MTrk n]
```

Decoding reads exactly as many `MTrk` chunks as the header declares, so after
[`MidiFile::parse`] the number of tracks always equals
[`Header::track_count`]. Anything after the last declared track is ignored.
"#]

mod format;
pub use format::*;

mod header;
pub use header::*;

mod timing;
pub use timing::*;

mod track;
pub use track::*;

mod timed_event_iter;
pub use timed_event_iter::*;

use alloc::vec::Vec;

use crate::{
    ParseError,
    reader::{ReadResult, Reader, ReaderError, TrackReader},
    writer::{WriteResult, Writer, WriterError, WriterErrorKind},
};

#[doc = r#"
A decoded (or assembled) Standard MIDI File.

# Example
```rust
# use midiconv::prelude::*;
let mut track = TrackWriter::new();
track.set_tempo(120.);
let track = track.finish();

let file = MidiFile::new(FormatType::Simultaneous, TicksPerQuarterNote::default(), vec![track]);
let bytes = file.to_bytes().unwrap();

let decoded = MidiFile::parse(&bytes).unwrap();
assert_eq!(decoded, file);
```
"#]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile {
    header: Header,
    tracks: Vec<Track>,
}

impl MidiFile {
    /// Assembles a file. The declared track count follows `tracks`.
    pub fn new(format: FormatType, timing: TicksPerQuarterNote, tracks: Vec<Track>) -> Self {
        let track_count = u16::try_from(tracks.len()).unwrap_or(u16::MAX);
        Self {
            header: Header::new(format, track_count, timing),
            tracks,
        }
    }

    /// A format 0 file holding one track.
    pub fn single_track(timing: TicksPerQuarterNote, track: Track) -> Self {
        Self::new(FormatType::SingleMultiChannel, timing, alloc::vec![track])
    }

    /// Parse a set of bytes into a file struct
    ///
    /// # Errors
    /// The first structural problem found. Positions are offsets into `bytes`.
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let header = Header::read(&mut reader)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "decoded header: format {:?}, {} tracks, {} ticks per quarter note",
            header.format_type(),
            header.track_count(),
            header.timing().ticks_per_quarter_note()
        );

        let mut tracks = Vec::with_capacity(usize::from(header.track_count()));
        for _ in 0..header.track_count() {
            let position = reader.buffer_position();
            let id: [u8; 4] = reader.clone().read_exact_size()?;
            if &id != b"MTrk" {
                return Err(ReaderError::parse(position, ParseError::UnexpectedChunk(id)));
            }
            let chunk = reader.read_chunk()?;
            tracks.push(Track::new(TrackReader::from_chunk(&chunk).read_all()?));
        }

        if !reader.is_at_end() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "ignoring {} bytes after the last declared track",
                reader.remaining()
            );
        }

        Ok(Self { header, tracks })
    }

    /// Serializes the header and every track.
    ///
    /// The written track count is the number of tracks held, and every channel
    /// event gets an explicit status byte.
    ///
    /// # Errors
    /// - [`WriterErrorKind::TooManyTracks`] for more than `u16::MAX` tracks
    /// - any error from [`Writer::write_track`], indexed by event
    pub fn to_bytes(&self) -> WriteResult<Vec<u8>> {
        let track_count = u16::try_from(self.tracks.len()).map_err(|_| {
            WriterError::new(
                self.tracks.len(),
                WriterErrorKind::TooManyTracks(self.tracks.len()),
            )
        })?;
        let header = Header::new(self.header.format_type(), track_count, self.timing());

        let mut writer = Writer::new();
        writer.write_header(&header);
        for track in &self.tracks {
            writer.write_track(track.events())?;
        }
        Ok(writer.into_bytes())
    }

    /// The header as decoded, or as assembled by [`MidiFile::new`]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Returns header info
    pub const fn timing(&self) -> TicksPerQuarterNote {
        self.header.timing()
    }

    /// Returns the format type for the file.
    pub const fn format_type(&self) -> FormatType {
        self.header.format_type()
    }

    /// Returns the track list
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Takes the tracks
    pub fn into_tracks(self) -> Vec<Track> {
        self.tracks
    }

    /// Executes the provided function for all the tracks in the file.
    pub fn for_each_track<F>(&self, func: F)
    where
        F: FnMut(&Track),
    {
        self.tracks.iter().for_each(func)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: [u8; 14] = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 1, 0x01, 0xE0,
    ];

    #[test]
    fn unexpected_chunk_id() {
        let mut bytes = HEADER.to_vec();
        bytes.extend_from_slice(b"XTrk");
        bytes.extend_from_slice(&[0, 0, 0, 0]);

        let err = MidiFile::parse(&bytes).unwrap_err();
        assert_eq!(
            err.parse_error(),
            Some(&ParseError::UnexpectedChunk(*b"XTrk"))
        );
        assert_eq!(err.position(), 14);
    }

    #[test]
    fn missing_track_is_out_of_bounds() {
        let err = MidiFile::parse(&HEADER).unwrap_err();
        assert!(err.is_out_of_bounds());
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut bytes = HEADER.to_vec();
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&[0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00]);
        bytes.extend_from_slice(b"junk");

        let file = MidiFile::parse(&bytes).unwrap();
        assert_eq!(file.tracks().len(), 1);
        assert!(file.tracks()[0].is_terminated());
    }

    #[test]
    fn errors_inside_tracks_use_file_offsets() {
        let mut bytes = HEADER.to_vec();
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&[0, 0, 0, 3, 0x00, 0xF4, 0x00]);

        let err = MidiFile::parse(&bytes).unwrap_err();
        assert_eq!(err.position(), 23);
        assert_eq!(
            err.parse_error(),
            Some(&ParseError::UnrecognisedEventType(0xF4))
        );
    }

    #[test]
    fn written_track_count_follows_tracks() {
        let file = MidiFile::new(
            FormatType::Simultaneous,
            TicksPerQuarterNote::default(),
            alloc::vec![Track::default(), Track::default()],
        );
        let bytes = file.to_bytes().unwrap();
        assert_eq!(&bytes[10..12], &[0, 2]);
        assert_eq!(MidiFile::parse(&bytes).unwrap().tracks().len(), 2);
    }
}
