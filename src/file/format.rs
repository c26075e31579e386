use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
How the tracks of a file relate to each other, from the first field of `MThd`.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0: a single track holding every channel
    SingleMultiChannel = 0,
    /// Format 1: tracks that play at the same time
    Simultaneous = 1,
    /// Format 2: independent single-track patterns
    SequentiallyIndependent = 2,
}

impl FormatType {
    /// The format number as written in the header
    pub fn number(self) -> u16 {
        self.into()
    }
}
