/// The possible FPS (Frames Per Second) of an SMPTE offset
///
/// The MIDI specification defines only four possible frame types:
/// - 24 fps: Standard film rate
/// - 25 fps: PAL/SECAM television standard
/// - 29.97 fps: NTSC color television (drop-frame timecode)
/// - 30 fps: NTSC black & white, some digital video formats
///
/// The rate is stored in bits 5-6 of the hour byte of an SMPTE offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmpteFps {
    /// 24 frames per second - Standard film rate
    TwentyFour,
    /// 25 frames per second - PAL/SECAM television standard
    TwentyFive,
    /// 29.97 frames per second (30000/1001) - NTSC color television drop-frame rate
    TwentyNine,
    /// 30 frames per second - NTSC black & white, some digital formats
    Thirty,
}

impl SmpteFps {
    /// Reads the rate from bits 5-6 of an hour byte.
    pub const fn from_hour_byte(byte: u8) -> Self {
        match byte & 0x60 {
            0x00 => Self::TwentyFour,
            0x20 => Self::TwentyFive,
            0x40 => Self::TwentyNine,
            _ => Self::Thirty,
        }
    }

    /// The rate bits, positioned for an hour byte.
    pub const fn hour_bits(&self) -> u8 {
        match self {
            Self::TwentyFour => 0x00,
            Self::TwentyFive => 0x20,
            Self::TwentyNine => 0x40,
            Self::Thirty => 0x60,
        }
    }

    /// The nominal frame count used to label the rate: 24, 25, 29 or 30.
    pub const fn frames(&self) -> u8 {
        match self {
            Self::TwentyFour => 24,
            Self::TwentyFive => 25,
            Self::TwentyNine => 29,
            Self::Thirty => 30,
        }
    }

    /// Get the actual frame rate as a floating-point value.
    ///
    /// This returns the precise frame rate, including the fractional rate for
    /// drop-frame timecode (29.97 fps = 30000/1001).
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::TwentyFour => 24.,
            Self::TwentyFive => 25.,
            Self::TwentyNine => DROP_FRAME,
            Self::Thirty => 30.,
        }
    }
}

/// The precise value for NTSC drop-frame rate: 29.97002997... fps
const DROP_FRAME: f64 = 30_000. / 1001.;
