#![doc = r#"
Conversion between Standard MIDI Files and timed note data.

The crate has two directions:

```text
bytes ──▶ reader ──▶ MidiFile ──▶ parts / transport projections
notes ──▶ reconstruct ──▶ TrackEvents ──▶ writer ──▶ bytes
```

[`MidiFile::parse`](crate::file::MidiFile::parse) decodes a buffer into a header
and per-track event lists, resolving running status and every meta, system
exclusive and channel event kind. [`MidiFile::to_bytes`](crate::file::MidiFile::to_bytes)
writes it back out.

[`reconstruct`](crate::reconstruct) turns notes with absolute start times and
durations into a single delta-timed event list, with a deterministic order for
events sharing a tick.

# Example
```rust
use midiconv::prelude::*;

let notes = [Note::new(60, 0, 480, Velocity::new(100))];
let track = reconstruct(&notes, &[], 480).unwrap();

let file = MidiFile::single_track(track.timing(), track.into_track());
let bytes = file.to_bytes().unwrap();

let decoded = MidiFile::parse(&bytes).unwrap();
assert_eq!(decoded.tracks().len(), 1);
```
"#]
#![warn(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;
pub use error::*;

pub mod convert;
pub mod events;
pub mod file;
pub mod message;
pub mod note;
pub mod parts;
pub mod reader;
pub mod reconstruct;
pub mod time;
pub mod writer;

#[doc = r#"
Common re-exports
"#]
pub mod prelude {
    pub use crate::{
        ParseError,
        convert::{ConvertError, Song},
        events::*,
        file::*,
        message::*,
        note::*,
        parts::*,
        reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
        reconstruct::*,
        time::*,
        writer::{TrackWriter, WriteResult, WriterError, WriterErrorKind},
    };
}
