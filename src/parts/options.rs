use crate::file::TicksPerQuarterNote;

#[doc = r#"
Controls how tracks are projected into [`Part`](super::Part)s.

# Example
```rust
# use midiconv::prelude::*;
let options = PartsOptions {
    ppq: TicksPerQuarterNote::new(192),
    ..Default::default()
};
assert!(!options.deterministic);
```
"#]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartsOptions {
    /// Rescale every time and duration to this many ticks per quarter note.
    /// `None` keeps the resolution of the file.
    pub ppq: Option<TicksPerQuarterNote>,
    /// Sort notes by time, pitch, longest first, loudest first, instead of
    /// keeping the order in which they started.
    pub deterministic: bool,
}
