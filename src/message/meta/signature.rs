#[doc = r#"
`FF 58 04 nn dd cc bb`

The denominator is stored as a power of two, so `dd = 3` means eighth notes.
"#]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    numerator: u8,
    denominator_power: u8,
    clocks_per_click: u8,
    thirty_seconds_per_quarter: u8,
}

impl TimeSignature {
    /// Payload length on the wire.
    pub const LEN: u32 = 4;

    /// A signature with 24 MIDI clocks per metronome click and
    /// 8 notated 32nd notes per quarter note.
    ///
    /// Returns `None` if `denominator` is not a power of two.
    pub const fn new(numerator: u8, denominator: u32) -> Option<Self> {
        if !denominator.is_power_of_two() {
            return None;
        }
        Some(Self {
            numerator,
            denominator_power: denominator.trailing_zeros() as u8,
            clocks_per_click: 24,
            thirty_seconds_per_quarter: 8,
        })
    }

    /// Reads the four payload bytes.
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self {
            numerator: bytes[0],
            denominator_power: bytes[1],
            clocks_per_click: bytes[2],
            thirty_seconds_per_quarter: bytes[3],
        }
    }

    /// The four payload bytes.
    pub const fn to_bytes(&self) -> [u8; 4] {
        [
            self.numerator,
            self.denominator_power,
            self.clocks_per_click,
            self.thirty_seconds_per_quarter,
        ]
    }

    /// Beats per bar
    pub const fn numerator(&self) -> u8 {
        self.numerator
    }

    /// `2^dd`. Zero if the stored exponent does not fit a `u32`.
    pub const fn denominator(&self) -> u32 {
        match 1u32.checked_shl(self.denominator_power as u32) {
            Some(v) => v,
            None => 0,
        }
    }

    /// The exponent as stored on the wire
    pub const fn denominator_power(&self) -> u8 {
        self.denominator_power
    }

    /// MIDI clocks per metronome click
    pub const fn clocks_per_click(&self) -> u8 {
        self.clocks_per_click
    }

    /// Notated 32nd notes per MIDI quarter note
    pub const fn thirty_seconds_per_quarter(&self) -> u8 {
        self.thirty_seconds_per_quarter
    }
}

#[doc = r#"
`FF 59 02 sf mi`

`sf` counts sharps when positive and flats when negative.
"#]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    /// Sharps (positive) or flats (negative)
    pub key: i8,
    /// 0 for major, 1 for minor
    pub scale: u8,
}

impl KeySignature {
    /// Payload length on the wire.
    pub const LEN: u32 = 2;

    /// Reads the two payload bytes, the first as signed.
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self {
            key: bytes[0] as i8,
            scale: bytes[1],
        }
    }

    /// The two payload bytes.
    pub const fn to_bytes(&self) -> [u8; 2] {
        [self.key as u8, self.scale]
    }

    /// True for a minor key
    pub const fn is_minor(&self) -> bool {
        self.scale == 1
    }
}

#[test]
fn time_signature_denominator_is_a_power_of_two() {
    use pretty_assertions::assert_eq;
    let signature = TimeSignature::from_bytes([6, 3, 36, 8]);
    assert_eq!(signature.numerator(), 6);
    assert_eq!(signature.denominator(), 8);

    let built = TimeSignature::new(3, 4).unwrap();
    assert_eq!(built.to_bytes(), [3, 2, 24, 8]);
    assert!(TimeSignature::new(3, 6).is_none());

    assert_eq!(TimeSignature::from_bytes([4, 40, 24, 8]).denominator(), 0);
}

#[test]
fn key_signature_is_signed() {
    use pretty_assertions::assert_eq;
    let key = KeySignature::from_bytes([0xFD, 1]);
    assert_eq!(key.key, -3);
    assert!(key.is_minor());
    assert_eq!(key.to_bytes(), [0xFD, 1]);
}
