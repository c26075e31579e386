#![doc = r#"
Notes and pedal spans placed on an absolute tick timeline.

These are the inputs of [`reconstruct`](crate::reconstruct) and the outputs
of the [`parts`](crate::parts) projection. Times are absolute ticks from the
start of the track, not deltas.
"#]

mod pitch;
pub use pitch::*;

#[doc = r#"
Attack velocity, `0..=127`.

Values above 127 are clamped. Some callers think of velocity as a ratio, so
conversions to and from `0.0..=1.0` are provided.

# Example
```rust
# use midiconv::prelude::*;
assert_eq!(Velocity::from_normalized(1.0), Velocity::MAX);
assert_eq!(Velocity::from_normalized(0.5).value(), 64);
assert_eq!(Velocity::new(200).value(), 127);
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Velocity(u8);

impl Velocity {
    /// The loudest velocity
    pub const MAX: Self = Self(127);

    /// Create a new velocity, clamping to 127
    pub const fn new(value: u8) -> Self {
        if value > 127 { Self::MAX } else { Self(value) }
    }

    /// Scales a ratio in `0.0..=1.0` to `0..=127`, rounding to nearest.
    pub fn from_normalized(ratio: f32) -> Self {
        Self::new((ratio.clamp(0., 1.) * 127. + 0.5) as u8)
    }

    /// The raw value
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// The value as a ratio of 127
    pub fn normalized(&self) -> f32 {
        f32::from(self.0) / 127.
    }
}

#[doc = r#"
A note with an absolute start and a length, both in ticks.
"#]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    /// MIDI note number
    pub pitch: u8,
    /// Start tick
    pub time: u32,
    /// Length in ticks
    pub duration: u32,
    /// Attack velocity
    pub velocity: Velocity,
}

impl Note {
    /// Create a new note
    pub const fn new(pitch: u8, time: u32, duration: u32, velocity: Velocity) -> Self {
        Self {
            pitch,
            time,
            duration,
            velocity,
        }
    }

    /// Tick of the release, `None` if it does not fit a `u32`.
    pub const fn end(&self) -> Option<u32> {
        self.time.checked_add(self.duration)
    }

    /// The named pitch, `None` above 127.
    pub const fn pitch(&self) -> Option<Pitch> {
        Pitch::new(self.pitch)
    }
}

#[doc = r#"
A span during which the damper pedal is held.
"#]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SustainSpan {
    /// Tick the pedal goes down
    pub time: u32,
    /// Ticks it stays down
    pub duration: u32,
}

impl SustainSpan {
    /// Create a new span
    pub const fn new(time: u32, duration: u32) -> Self {
        Self { time, duration }
    }

    /// Tick the pedal comes up, `None` if it does not fit a `u32`.
    pub const fn end(&self) -> Option<u32> {
        self.time.checked_add(self.duration)
    }
}

#[test]
fn velocity_ratios() {
    use pretty_assertions::assert_eq;
    assert_eq!(Velocity::from_normalized(0.0).value(), 0);
    assert_eq!(Velocity::from_normalized(-3.0).value(), 0);
    assert_eq!(Velocity::from_normalized(100. / 127.).value(), 100);
    assert_eq!(Velocity::new(127).normalized(), 1.0);
}
