use crate::ParseError;

#[doc = r#"
The header time division, expressed in ticks per quarter note.

SMPTE divisions (top bit set) are rejected, as is a division of zero.

# Example
```rust
# use midiconv::prelude::*;
let timing = TicksPerQuarterNote::new(480).unwrap();
assert_eq!(timing.ticks_per_quarter_note(), 480);

assert!(TicksPerQuarterNote::new(0x8000 | 25).is_none());
```
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TicksPerQuarterNote(u16);

impl Default for TicksPerQuarterNote {
    fn default() -> Self {
        Self(480)
    }
}

impl TicksPerQuarterNote {
    /// Returns `None` for zero or for a value with bit 15 set.
    pub const fn new(tpqn: u16) -> Option<Self> {
        match Self::from_division(tpqn) {
            Ok(v) => Some(v),
            Err(_) => None,
        }
    }

    /// Interprets the division field of a header.
    pub(crate) const fn from_division(division: u16) -> Result<Self, ParseError> {
        if division & 0x8000 != 0 {
            return Err(ParseError::UnsupportedTimeDivision(division));
        }
        if division == 0 {
            return Err(ParseError::MalformedHeader);
        }
        Ok(Self(division))
    }

    /// Returns the ticks per quarter note for the file.
    pub const fn ticks_per_quarter_note(&self) -> u16 {
        self.0
    }

    /// Converts `ticks` counted at this resolution to `target` ticks per
    /// quarter note, rounding halves up.
    pub const fn rescale(&self, ticks: u64, target: TicksPerQuarterNote) -> u64 {
        let from = self.0 as u64;
        (ticks * target.0 as u64 * 2 + from) / (from * 2)
    }
}

#[test]
fn smpte_division_is_unsupported() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        TicksPerQuarterNote::from_division(0xE728),
        Err(ParseError::UnsupportedTimeDivision(0xE728))
    );
    assert_eq!(
        TicksPerQuarterNote::from_division(0),
        Err(ParseError::MalformedHeader)
    );
    assert_eq!(TicksPerQuarterNote::from_division(0x7FFF).unwrap().ticks_per_quarter_note(), 0x7FFF);
}

#[test]
fn rescaling_rounds_half_up() {
    use pretty_assertions::assert_eq;
    let from = TicksPerQuarterNote::new(480).unwrap();
    let to = TicksPerQuarterNote::new(192).unwrap();
    assert_eq!(from.rescale(480, to), 192);
    assert_eq!(from.rescale(5, to), 2);
    assert_eq!(from.rescale(3, to), 1);
    assert_eq!(from.rescale(1, to), 0);
}
