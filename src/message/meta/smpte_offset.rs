#![doc = r#"
SMPTE Offset - the SMPTE time at which a track is to start.

`FF 54 05 hr mn se fr ff`

The hour byte packs the frame rate in bits 5-6 and the hour in the low five
bits. No range checks are applied to the remaining fields; they are carried
exactly as found so that a re-encoded file is byte identical.
"#]

use super::SmpteFps;

/// A track's starting position in SMPTE time code.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    /// The frame rate for this offset.
    pub fps: SmpteFps,
    /// Hour component, the low five bits of the hour byte.
    pub hour: u8,
    /// Minute component of the time code.
    pub minute: u8,
    /// Second component of the time code.
    pub second: u8,
    /// Frame number within the current second.
    pub frame: u8,
    /// Fractional frames, in hundredths of a frame.
    pub subframe: u8,
}

impl SmpteOffset {
    /// Payload length on the wire.
    pub const LEN: u32 = 5;

    /// Convert this SMPTE offset to microseconds using its own frame rate.
    pub const fn as_micros(&self) -> f64 {
        ((((self.hour as u64 * 3600) + (self.minute as u64) * 60 + self.second as u64) * 1_000_000)
            as f64)
            + ((self.frame as u64) * 1_000_000) as f64 / self.fps.as_f64()
            + ((self.subframe as u32) * 10_000) as f64 / self.fps.as_f64()
    }

    /// Reads the five payload bytes.
    pub const fn from_bytes(data: [u8; 5]) -> Self {
        Self {
            fps: SmpteFps::from_hour_byte(data[0]),
            hour: data[0] & 0b0001_1111,
            minute: data[1],
            second: data[2],
            frame: data[3],
            subframe: data[4],
        }
    }

    /// The five payload bytes.
    pub const fn to_bytes(&self) -> [u8; 5] {
        [
            self.fps.hour_bits() | (self.hour & 0b0001_1111),
            self.minute,
            self.second,
            self.frame,
            self.subframe,
        ]
    }
}

#[test]
fn parse_smpte_offset() {
    use pretty_assertions::assert_eq;
    // these are the bytes after 00 FF 54 05
    let bytes = [0x41, 0x17, 0x2D, 0x0C, 0x22];
    let offset = SmpteOffset::from_bytes(bytes);

    assert_eq!(offset.fps, SmpteFps::TwentyNine);
    assert_eq!(offset.fps.frames(), 29);
    assert_eq!(offset.hour, 1);
    assert_eq!(offset.minute, 23);
    assert_eq!(offset.second, 45);
    assert_eq!(offset.frame, 12);
    assert_eq!(offset.subframe, 34);
    assert_eq!(offset.to_bytes(), bytes);
}

#[test]
fn frame_rate_comes_from_bits_five_and_six() {
    use pretty_assertions::assert_eq;
    for (byte, frames) in [(0x00, 24), (0x20, 25), (0x40, 29), (0x60, 30), (0x7F, 30)] {
        assert_eq!(SmpteOffset::from_bytes([byte, 0, 0, 0, 0]).fps.frames(), frames);
    }
    assert_eq!(SmpteOffset::from_bytes([0x7F, 0, 0, 0, 0]).hour, 31);
}

#[test]
fn smpte_offset_in_micros() {
    use pretty_assertions::assert_eq;
    let offset = SmpteOffset {
        fps: SmpteFps::TwentyFive,
        hour: 0,
        minute: 1,
        second: 2,
        frame: 5,
        subframe: 50,
    };
    assert_eq!(offset.as_micros(), 62_220_000.);
}
