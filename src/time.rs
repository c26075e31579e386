#![doc = r#"
Conversions between ticks and wall clock time at a constant tempo.

# Example
```rust
# use midiconv::prelude::*;
assert_eq!(ticks_to_seconds(128, 120., 128), 0.5);
assert_eq!(seconds_to_ticks(0.5, 120., 128), 128);
```
"#]

use crate::{file::TicksPerQuarterNote, message::Tempo};

const SECONDS_PER_MINUTE: f64 = 60.;

/// Seconds taken by `ticks` at `bpm` beats per minute and `ppq` ticks per beat.
pub fn ticks_to_seconds(ticks: u64, bpm: f64, ppq: u16) -> f64 {
    ticks as f64 / f64::from(ppq) * SECONDS_PER_MINUTE / bpm
}

/// Ticks needed to cover `seconds`, rounded up to the next whole tick.
///
/// Negative durations give zero.
pub fn seconds_to_ticks(seconds: f64, bpm: f64, ppq: u16) -> u64 {
    ceil(seconds * bpm / SECONDS_PER_MINUTE * f64::from(ppq))
}

/// [`ticks_to_seconds`] for a tempo event and a header division.
pub fn ticks_to_seconds_at(ticks: u64, tempo: Tempo, timing: TicksPerQuarterNote) -> f64 {
    ticks as f64 * f64::from(tempo.micros_per_quarter_note())
        / f64::from(timing.ticks_per_quarter_note())
        / 1_000_000.
}

fn ceil(value: f64) -> u64 {
    if value <= 0. {
        return 0;
    }
    let whole = value as u64;
    if (whole as f64) < value {
        whole + 1
    } else {
        whole
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ticks_at_120_bpm() {
        let cases = [
            (0, 0.),
            (1, 0.00390625),
            (126, 0.4921875),
            (128, 0.5),
            (256, 1.),
            (1022, 3.9921875),
            (1024, 4.),
            (1152, 4.5),
            (2046, 7.9921875),
        ];
        for (ticks, seconds) in cases {
            assert_eq!(ticks_to_seconds(ticks, 120., 128), seconds);
        }
    }

    #[test]
    fn seconds_round_up() {
        assert_eq!(seconds_to_ticks(0., 120., 128), 0);
        assert_eq!(seconds_to_ticks(8., 120., 128), 2048);
        assert_eq!(seconds_to_ticks(1.1331065759636707, 120., 128), 291);
        assert_eq!(seconds_to_ticks(-1., 120., 128), 0);
    }

    #[test]
    fn tempo_events() {
        let timing = TicksPerQuarterNote::new(480).unwrap();
        assert_eq!(ticks_to_seconds_at(960, Tempo::default(), timing), 1.);
        assert_eq!(ticks_to_seconds_at(480, Tempo::new(250_000), timing), 0.25);
    }
}
