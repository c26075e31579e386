use alloc::{format, string::String};
use core::{fmt, str::FromStr};

use thiserror::Error;

#[doc = r#"
A MIDI note number, `0..=127`, with its scientific pitch name.

Octaves are numbered so that [`Pitch`] `48` is `C3` and `0` is `C-1`.

# Example
```rust
# use midiconv::prelude::*;
let pitch = Pitch::from_name("C#3").unwrap();

assert_eq!(pitch.number(), 49);
assert_eq!(pitch.key(), Key::CSharp);
assert_eq!(pitch.octave(), 3);
assert_eq!(pitch.name(Accidental::Flat), "Db3");
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pitch(u8);

impl Pitch {
    /// Returns `None` above 127.
    pub const fn new(number: u8) -> Option<Self> {
        if number > 127 {
            None
        } else {
            Some(Self(number))
        }
    }

    /// Create a pitch from a key and an octave
    pub const fn from_key(key: Key, octave: i8) -> Option<Self> {
        let number = (octave as i16 + 1) * 12 + key.semitone() as i16;
        if number < 0 || number > 127 {
            None
        } else {
            Some(Self(number as u8))
        }
    }

    /// Parses a name such as `C3`, `F#6`, `Bb1` or `C-1`.
    ///
    /// One accidental is allowed and may cross an octave boundary: `B#2` is
    /// the same pitch as `C3` and `Cb3` the same as `B2`.
    pub fn from_name(name: &str) -> Result<Self, NoteNameError> {
        let mut chars = name.chars();
        let letter = chars.next().ok_or(NoteNameError::Empty)?;
        let natural = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(NoteNameError::UnknownLetter(letter)),
        };

        let rest = chars.as_str();
        let (shift, octave) = if let Some(octave) = rest.strip_prefix('#') {
            (1, octave)
        } else if let Some(octave) = rest.strip_prefix('b') {
            (-1, octave)
        } else {
            (0, rest)
        };

        let octave: i32 = octave
            .parse()
            .map_err(|_| NoteNameError::InvalidOctave(String::from(name)))?;
        let number = octave
            .checked_add(1)
            .and_then(|o| o.checked_mul(12))
            .and_then(|n| n.checked_add(natural + shift))
            .ok_or_else(|| NoteNameError::InvalidOctave(String::from(name)))?;

        u8::try_from(number)
            .ok()
            .and_then(Self::new)
            .ok_or(NoteNameError::OutOfRange(number))
    }

    /// The note number
    pub const fn number(&self) -> u8 {
        self.0
    }

    /// The key within the octave
    pub const fn key(&self) -> Key {
        Key::from_semitone(self.0 % 12)
    }

    /// Octave number, `-1..=9`
    pub const fn octave(&self) -> i8 {
        (self.0 / 12) as i8 - 1
    }

    /// The name of the pitch, spelling black keys with `accidental`.
    pub fn name(&self, accidental: Accidental) -> String {
        format!("{}{}", self.key().name(accidental), self.octave())
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.key().name(Accidental::Sharp), self.octave())
    }
}

impl FromStr for Pitch {
    type Err = NoteNameError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl TryFrom<u8> for Pitch {
    type Error = NoteNameError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(NoteNameError::OutOfRange(i32::from(value)))
    }
}

/// Problems with a pitch name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NoteNameError {
    /// Nothing to parse
    #[error("Empty note name")]
    Empty,
    /// The name does not start with `A` to `G`
    #[error("Unknown note letter {0:?}")]
    UnknownLetter(char),
    /// The octave is not an integer
    #[error("Invalid octave in note name {0:?}")]
    InvalidOctave(String),
    /// The name denotes a note number outside `0..=127`
    #[error("Note number {0} is outside of 0-127")]
    OutOfRange(i32),
}

/// How black keys are spelled
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Accidental {
    /// `C#`, `D#`, ...
    #[default]
    Sharp,
    /// `Db`, `Eb`, ...
    Flat,
}

#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[doc = r#"
One of the twelve keys of an octave

# Example
```rust
# use midiconv::prelude::*;
let key = Key::FSharp;

assert!(key.is_sharp());
assert_eq!(key.name(Accidental::Flat), "Gb");
assert_eq!(Pitch::from_key(key, 4).unwrap().number(), 66);
```
"#]
pub enum Key {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Key {
    /// Returns an array beginning with [`Key::C`] to [`Key::B`]
    pub const fn all() -> [Key; 12] {
        use Key::*;
        [C, CSharp, D, DSharp, E, F, FSharp, G, GSharp, A, ASharp, B]
    }

    /// Returns true for the black keys
    pub const fn is_sharp(&self) -> bool {
        use Key::*;
        matches!(self, CSharp | DSharp | FSharp | GSharp | ASharp)
    }

    /// Semitones above C
    pub const fn semitone(&self) -> u8 {
        *self as u8
    }

    /// The key `semitone % 12` semitones above C.
    pub const fn from_semitone(semitone: u8) -> Self {
        Self::all()[(semitone % 12) as usize]
    }

    /// The spelling of the key.
    pub const fn name(&self, accidental: Accidental) -> &'static str {
        use Key::*;
        match (self, accidental) {
            (C, _) => "C",
            (CSharp, Accidental::Sharp) => "C#",
            (CSharp, Accidental::Flat) => "Db",
            (D, _) => "D",
            (DSharp, Accidental::Sharp) => "D#",
            (DSharp, Accidental::Flat) => "Eb",
            (E, _) => "E",
            (F, _) => "F",
            (FSharp, Accidental::Sharp) => "F#",
            (FSharp, Accidental::Flat) => "Gb",
            (G, _) => "G",
            (GSharp, Accidental::Sharp) => "G#",
            (GSharp, Accidental::Flat) => "Ab",
            (A, _) => "A",
            (ASharp, Accidental::Sharp) => "A#",
            (ASharp, Accidental::Flat) => "Bb",
            (B, _) => "B",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name(Accidental::Sharp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn number(name: &str) -> u8 {
        Pitch::from_name(name).unwrap().number()
    }

    #[test]
    fn names_to_numbers() {
        let cases = [
            ("A1", 33),
            ("B2", 47),
            ("C3", 48),
            ("C#3", 49),
            ("D4", 62),
            ("E5", 76),
            ("F6", 89),
            ("F#6", 90),
            ("G7", 103),
            ("G#7", 104),
            ("Bb1", 34),
            ("Eb4", 63),
            ("C-1", 0),
            ("G9", 127),
        ];
        for (name, expected) in cases {
            assert_eq!(number(name), expected, "{name}");
        }
    }

    #[test]
    fn unconventional_spellings() {
        assert_eq!(number("Fb4"), 64);
        assert_eq!(number("E#4"), 65);
        assert_eq!(number("B#2"), 48);
        assert_eq!(number("Cb3"), 47);
        assert_eq!(number("bb1"), 34);
    }

    #[test]
    fn invalid_names() {
        assert_eq!(Pitch::from_name(""), Err(NoteNameError::Empty));
        assert_eq!(Pitch::from_name("H2"), Err(NoteNameError::UnknownLetter('H')));
        assert_eq!(
            Pitch::from_name("C"),
            Err(NoteNameError::InvalidOctave(String::from("C")))
        );
        assert_eq!(Pitch::from_name("G#9"), Err(NoteNameError::OutOfRange(128)));
        assert_eq!(Pitch::from_name("Cb-1"), Err(NoteNameError::OutOfRange(-1)));
    }

    #[test]
    fn numbers_to_names() {
        let cases = [
            (33, "A1"),
            (47, "B2"),
            (48, "C3"),
            (49, "C#3"),
            (62, "D4"),
            (90, "F#6"),
            (104, "G#7"),
        ];
        for (n, expected) in cases {
            assert_eq!(Pitch::new(n).unwrap().name(Accidental::Sharp), expected);
        }
        assert_eq!(Pitch::new(34).unwrap().name(Accidental::Flat), "Bb1");
        assert_eq!(Pitch::new(63).unwrap().name(Accidental::Flat), "Eb4");
        assert_eq!(Pitch::new(0).unwrap().to_string(), "C-1");
    }

    #[test]
    fn every_pitch_survives_its_name() {
        for n in 0..128 {
            let pitch = Pitch::new(n).unwrap();
            assert_eq!(Pitch::from_name(&pitch.name(Accidental::Sharp)), Ok(pitch));
            assert_eq!(Pitch::from_name(&pitch.name(Accidental::Flat)), Ok(pitch));
        }
    }
}
