#![doc = r#"
Turning notes back into a track.

Reconstruction runs in four steps:

1. every [`Note`] and [`SustainSpan`] is expanded into its two ends,
2. the ends are put in a deterministic order (see below),
3. times are converted to deltas from the previous event,
4. each end becomes a wire event: note on/off, or a damper pedal controller.

A note of velocity zero starts with velocity one, so that it is not read back
as a note off.

Events sharing a tick are ordered greedily. Starting from arrival order (notes
first, then sustain spans), an off event is preferred over anything else at
the same tick, and otherwise a note end whose note is strictly longer is
preferred over the default pick. Sustain events are never reordered.
"#]

mod order;
pub use order::*;
use order::order_points;

use alloc::vec::Vec;

use thiserror::Error;

use crate::{
    events::TrackEvent,
    file::{TicksPerQuarterNote, Track},
    message::{Channel, ChannelMessage, MetaMessage},
    note::{Note, SustainSpan},
};

/// Input that cannot be turned into events
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconstructError {
    /// A zero length span, or one ending past `u32::MAX` ticks.
    ///
    /// `index` counts notes first, then sustain spans.
    #[error("Input {index} spans {duration} ticks from tick {start}")]
    InvalidSpan {
        /// Position in arrival order
        index: usize,
        /// Start tick
        start: u32,
        /// Length in ticks
        duration: u32,
    },
    /// A note number above 127.
    #[error("Note {index} has pitch {pitch}, outside of 0-127")]
    PitchOutOfRange {
        /// Position in the note list
        index: usize,
        /// The offending pitch
        pitch: u8,
    },
    /// Zero, or a division with the SMPTE bit set.
    #[error("{0:#06X} is not a ticks per quarter note division")]
    UnsupportedTimeDivision(u16),
}

#[doc = r#"
Builds a single track from notes and sustain spans.

# Example
```rust
# use midiconv::prelude::*;
let reconstructor = Reconstructor::new(TicksPerQuarterNote::default())
    .with_channel(Channel::new(2).unwrap());

let notes = [
    Note::new(60, 0, 480, Velocity::new(100)),
    Note::new(62, 480, 480, Velocity::new(90)),
];
let track = reconstructor.reconstruct(&notes, &[]).unwrap();

let deltas: Vec<u32> = track.events().iter().map(|e| e.delta_ticks()).collect();
assert_eq!(deltas, [0, 480, 0, 480]);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconstructor {
    timing: TicksPerQuarterNote,
    channel: Channel,
}

impl Reconstructor {
    /// Events go to channel 0 unless [`Reconstructor::with_channel`] says otherwise.
    pub const fn new(timing: TicksPerQuarterNote) -> Self {
        Self {
            timing,
            channel: Channel::from_status(0),
        }
    }

    /// Sets the channel of the produced events
    pub const fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    /// The division the output is meant for
    pub const fn timing(&self) -> TicksPerQuarterNote {
        self.timing
    }

    /// The channel of the produced events
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// Expands and orders the ends of every note and span, without converting
    /// them to wire events.
    ///
    /// # Errors
    /// The first invalid note or span, see [`ReconstructError`].
    pub fn schedule(
        &self,
        notes: &[Note],
        sustains: &[SustainSpan],
    ) -> Result<Vec<PointEvent>, ReconstructError> {
        let mut points = Vec::with_capacity((notes.len() + sustains.len()) * 2);

        for (index, note) in notes.iter().enumerate() {
            if note.pitch > 127 {
                return Err(ReconstructError::PitchOutOfRange {
                    index,
                    pitch: note.pitch,
                });
            }
            let end = span_end(index, note.time, note.duration)?;
            points.extend(PointEvent::from_note(note, end));
        }
        for (i, span) in sustains.iter().enumerate() {
            let end = span_end(notes.len() + i, span.time, span.duration)?;
            points.extend(PointEvent::from_sustain(span, end));
        }

        Ok(order_points(points))
    }

    /// Produces the delta timed events for `notes` and `sustains`.
    ///
    /// # Errors
    /// The first invalid note or span, see [`ReconstructError`].
    pub fn reconstruct(
        &self,
        notes: &[Note],
        sustains: &[SustainSpan],
    ) -> Result<ReconstructedTrack, ReconstructError> {
        let points = self.schedule(notes, sustains)?;

        let mut previous = 0;
        let events: Vec<TrackEvent> = points
            .iter()
            .map(|point| {
                let delta = point.time - previous;
                previous = point.time;
                TrackEvent::new(delta, self.message(point))
            })
            .collect();

        #[cfg(feature = "tracing")]
        tracing::trace!(
            "reconstructed {} notes and {} sustain spans into {} events",
            notes.len(),
            sustains.len(),
            events.len()
        );

        Ok(ReconstructedTrack {
            timing: self.timing,
            events,
        })
    }

    fn message(&self, point: &PointEvent) -> ChannelMessage {
        let velocity = point.velocity.value();
        match point.kind {
            // a zero velocity note on reads back as a note off
            PointKind::NoteOn => ChannelMessage::note_on(self.channel, point.pitch, velocity.max(1)),
            PointKind::NoteOff => ChannelMessage::note_off(self.channel, point.pitch, velocity),
            PointKind::SustainOn => ChannelMessage::sustain(self.channel, true),
            PointKind::SustainOff => ChannelMessage::sustain(self.channel, false),
        }
    }
}

fn span_end(index: usize, start: u32, duration: u32) -> Result<u32, ReconstructError> {
    start
        .checked_add(duration)
        .filter(|_| duration > 0)
        .ok_or(ReconstructError::InvalidSpan {
            index,
            start,
            duration,
        })
}

/// Reconstructs on channel 0 for a division of `ticks_per_beat`.
///
/// # Errors
/// [`ReconstructError::UnsupportedTimeDivision`] for a zero or SMPTE
/// division, otherwise as [`Reconstructor::reconstruct`].
pub fn reconstruct(
    notes: &[Note],
    sustains: &[SustainSpan],
    ticks_per_beat: u16,
) -> Result<ReconstructedTrack, ReconstructError> {
    let timing = TicksPerQuarterNote::new(ticks_per_beat)
        .ok_or(ReconstructError::UnsupportedTimeDivision(ticks_per_beat))?;
    Reconstructor::new(timing).reconstruct(notes, sustains)
}

#[doc = r#"
The output of a [`Reconstructor`]: delta timed channel events, without an
end of track marker.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructedTrack {
    timing: TicksPerQuarterNote,
    events: Vec<TrackEvent>,
}

impl ReconstructedTrack {
    /// The division the delta times are counted in
    pub const fn timing(&self) -> TicksPerQuarterNote {
        self.timing
    }

    /// The events in emission order
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    /// Takes the events
    pub fn into_events(self) -> Vec<TrackEvent> {
        self.events
    }

    /// A complete track: the events followed by an end of track marker.
    pub fn into_track(self) -> Track {
        let mut events = self.events;
        events.push(TrackEvent::new(0, MetaMessage::EndOfTrack));
        Track::new(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{message::VoiceEvent, note::Velocity};
    use pretty_assertions::assert_eq;

    #[test]
    fn zero_duration_is_rejected() {
        let notes = [
            Note::new(60, 0, 480, Velocity::new(100)),
            Note::new(62, 10, 0, Velocity::new(100)),
        ];
        assert_eq!(
            reconstruct(&notes, &[], 480),
            Err(ReconstructError::InvalidSpan {
                index: 1,
                start: 10,
                duration: 0
            })
        );
    }

    #[test]
    fn sustain_errors_are_indexed_after_notes() {
        let notes = [Note::new(60, 0, 480, Velocity::new(100))];
        let sustains = [SustainSpan::new(0, 10), SustainSpan::new(u32::MAX, 1)];
        assert_eq!(
            reconstruct(&notes, &sustains, 480),
            Err(ReconstructError::InvalidSpan {
                index: 2,
                start: u32::MAX,
                duration: 1
            })
        );
    }

    #[test]
    fn pitch_and_division_are_validated() {
        let notes = [Note::new(128, 0, 480, Velocity::new(100))];
        assert_eq!(
            reconstruct(&notes, &[], 480),
            Err(ReconstructError::PitchOutOfRange { index: 0, pitch: 128 })
        );
        assert_eq!(
            reconstruct(&[], &[], 0x8000 | 24),
            Err(ReconstructError::UnsupportedTimeDivision(0x8018))
        );
    }

    #[test]
    fn sustain_becomes_damper_pedal() {
        let track = reconstruct(&[], &[SustainSpan::new(120, 240)], 480).unwrap();
        let events = track.events();
        assert_eq!(events[0].delta_ticks(), 120);
        assert_eq!(
            events[0].message().voice(),
            Some(&VoiceEvent::Controller {
                controller: 64,
                value: 127
            })
        );
        assert_eq!(events[1].delta_ticks(), 240);
        assert_eq!(
            events[1].message().voice(),
            Some(&VoiceEvent::Controller {
                controller: 64,
                value: 0
            })
        );
    }

    #[test]
    fn silent_note_on_is_raised_to_velocity_one() {
        let notes = [Note::new(60, 0, 10, Velocity::new(0))];
        let track = reconstruct(&notes, &[], 96).unwrap();
        assert_eq!(
            track.events()[0].message().voice(),
            Some(&VoiceEvent::NoteOn {
                note: 60,
                velocity: 1
            })
        );
        assert_eq!(
            track.events()[1].message().voice(),
            Some(&VoiceEvent::NoteOff {
                note: 60,
                velocity: 0
            })
        );
    }

    #[test]
    fn note_off_keeps_the_velocity() {
        let notes = [Note::new(60, 0, 10, Velocity::new(77))];
        let track = reconstruct(&notes, &[], 96).unwrap().into_track();
        assert_eq!(
            track.events()[1].message().voice(),
            Some(&VoiceEvent::NoteOff {
                note: 60,
                velocity: 77
            })
        );
        assert!(track.is_terminated());
    }
}
