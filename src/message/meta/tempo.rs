const MICROS_PER_MINUTE: f64 = 60_000_000.;

#[doc = r#"
The length of a quarter note in microseconds, as carried by `FF 51 03 tt tt tt`.

# Example
```rust
# use midiconv::prelude::*;
let tempo = Tempo::from_bpm(120.);

assert_eq!(tempo.micros_per_quarter_note(), 500_000);
assert_eq!(tempo.to_bytes(), [7, 161, 32]);
assert_eq!(tempo.bpm(), 120.);
```
"#]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo(u32);

impl Default for Tempo {
    /// 120 beats per minute
    fn default() -> Self {
        Self(500_000)
    }
}

impl Tempo {
    /// Payload length on the wire.
    pub const LEN: u32 = 3;

    /// Only the low 24 bits are representable.
    pub const fn new(micros_per_quarter_note: u32) -> Self {
        Self(micros_per_quarter_note & 0x00FF_FFFF)
    }

    /// Tempo for a beats-per-minute value, truncated to whole microseconds.
    pub fn from_bpm(bpm: f64) -> Self {
        Self::new((MICROS_PER_MINUTE / bpm) as u32)
    }

    /// Reads the three big-endian payload bytes.
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self(((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | bytes[2] as u32)
    }

    /// The three big-endian payload bytes.
    pub const fn to_bytes(&self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    /// Microseconds per quarter note
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// Beats (quarter notes) per minute
    pub fn bpm(&self) -> f64 {
        MICROS_PER_MINUTE / self.0 as f64
    }
}
