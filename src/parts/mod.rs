#![doc = r#"
Projections from a decoded [`MidiFile`] to note level data.

- [`Part`]: the notes and sustain spans of one track, paired from note on/off
  and damper pedal events.
- [`Transport`]: tempo, time signature and instruments.
- [`split_by_channel`]: prepares a format 0 file so that each channel becomes
  its own part.

Some authoring tools write the note off of a repeated note right after the
note on that replaces it, both at the same tick. Read literally, the second
note would last zero ticks. When a track holds a repeated note on for a pitch
that is still sounding, such pairs are swapped before notes are paired, see
[`permute_implicit_note_offs`].
"#]

mod options;
pub use options::*;

mod split;
pub use split::*;

mod transport;
pub use transport::*;

use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use crate::{
    events::TrackEvent,
    file::{MidiFile, TicksPerQuarterNote, Track},
    message::{DAMPER_PEDAL, MetaMessage, VoiceEvent},
    note::{Note, SustainSpan, Velocity},
};

#[doc = r#"
The notes and sustain spans of one track.

# Example
```rust
# use midiconv::prelude::*;
let piano = Channel::new(0).unwrap();
let mut track = TrackWriter::new();
track
    .push(0, MetaMessage::TrackName(b"Piano\0".to_vec()))
    .add_note_on(piano, 60, 0, 100)
    .add_note_off(piano, 60, 480, 0);
let file = MidiFile::single_track(TicksPerQuarterNote::default(), track.finish());

let parts = parts(&file, &PartsOptions::default());
assert_eq!(parts[0].name.as_deref(), Some("Piano"));
assert_eq!(parts[0].notes, [Note::new(60, 0, 480, Velocity::new(100))]);
```
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Part {
    /// The track name, without NUL characters
    pub name: Option<String>,
    /// Notes in the order they started, unless sorted by
    /// [`PartsOptions::deterministic`]
    pub notes: Vec<Note>,
    /// Damper pedal spans in the order they started
    pub sustains: Vec<SustainSpan>,
}

impl Part {
    /// Pairs the events of `track`. Returns `None` for a track without
    /// notes or sustain spans.
    ///
    /// A note or span that would last zero ticks, because both of its ends
    /// share a tick or because rescaling rounded it away, lasts one tick.
    pub fn from_track(
        track: &Track,
        timing: TicksPerQuarterNote,
        options: &PartsOptions,
    ) -> Option<Self> {
        let mut events = track.events().to_vec();
        permute_implicit_note_offs(&mut events);
        let track = Track::new(events);

        let mut name = None;
        let mut notes: Vec<OpenSpan<(u8, Velocity)>> = Vec::new();
        let mut sustains: Vec<OpenSpan<()>> = Vec::new();
        let mut pedal = false;

        for timed in track.timed_events() {
            let ticks = timed.accumulated_ticks();
            let message = timed.event().message();

            if let Some(MetaMessage::TrackName(text)) = message.as_meta() {
                name = Some(String::from_utf8_lossy(text).replace('\0', ""));
                continue;
            }
            match message.voice() {
                Some(&VoiceEvent::NoteOn { note, velocity }) => {
                    notes.push(OpenSpan::new(ticks, (note, Velocity::new(velocity))));
                }
                Some(&VoiceEvent::NoteOff { note, .. }) => {
                    if let Some(open) = notes
                        .iter_mut()
                        .rev()
                        .find(|n| n.value.0 == note && n.end.is_none())
                    {
                        open.end = Some(ticks);
                    }
                }
                Some(&VoiceEvent::Controller { controller, value }) if controller == DAMPER_PEDAL => {
                    if value >= 64 && !pedal {
                        sustains.push(OpenSpan::new(ticks, ()));
                        pedal = true;
                    } else if value < 64 && pedal {
                        if let Some(open) = sustains.iter_mut().rev().find(|s| s.end.is_none()) {
                            open.end = Some(ticks);
                        }
                        pedal = false;
                    }
                }
                _ => {}
            }
        }

        #[cfg(feature = "tracing")]
        {
            let unterminated = notes.iter().filter(|n| n.end.is_none()).count()
                + sustains.iter().filter(|s| s.end.is_none()).count();
            if unterminated > 0 {
                tracing::warn!("dropping {unterminated} notes or sustain spans that never end");
            }
        }

        let scale = |ticks: u64| -> u32 {
            let ticks = match options.ppq {
                Some(target) => timing.rescale(ticks, target),
                None => ticks,
            };
            u32::try_from(ticks).unwrap_or(u32::MAX)
        };

        // spans are never empty, even when both ends share a tick
        let length = |ticks: u64| scale(ticks).max(1);

        let mut notes: Vec<Note> = notes
            .iter()
            .filter_map(|n| {
                let (start, duration) = n.closed()?;
                let (pitch, velocity) = n.value;
                Some(Note::new(pitch, scale(start), length(duration), velocity))
            })
            .collect();
        let sustains: Vec<SustainSpan> = sustains
            .iter()
            .filter_map(|s| {
                let (start, duration) = s.closed()?;
                Some(SustainSpan::new(scale(start), length(duration)))
            })
            .collect();

        if options.deterministic {
            notes.sort_by(|a, b| {
                a.time
                    .cmp(&b.time)
                    .then(a.pitch.cmp(&b.pitch))
                    .then(b.duration.cmp(&a.duration))
                    .then(b.velocity.cmp(&a.velocity))
            });
        }

        if notes.is_empty() && sustains.is_empty() {
            return None;
        }
        Some(Self {
            name,
            notes,
            sustains,
        })
    }

    /// The name, or `fallback` if the track had none.
    pub fn name_or(&self, fallback: &str) -> String {
        self.name.clone().unwrap_or_else(|| fallback.to_string())
    }
}

/// Projects every track of `file` that holds notes or sustain spans.
pub fn parts(file: &MidiFile, options: &PartsOptions) -> Vec<Part> {
    file.tracks()
        .iter()
        .filter_map(|track| Part::from_track(track, file.timing(), options))
        .collect()
}

/// Swaps each note on that is immediately followed, at the same tick, by a
/// note off of the same pitch.
///
/// The note off takes the note on's delta time and the note on follows it
/// with a delta of zero. Nothing happens unless some pitch has two note ons
/// without a note off between them. Returns true if the track was examined.
pub fn permute_implicit_note_offs(events: &mut [TrackEvent]) -> bool {
    if !has_repeated_note_on(events) {
        return false;
    }
    let mut swapped = 0;
    for i in 1..events.len() {
        let (previous, current) = (&events[i - 1], &events[i]);
        let same_pitch_pair = match (previous.message().voice(), current.message().voice()) {
            (
                Some(VoiceEvent::NoteOn { note: on, .. }),
                Some(VoiceEvent::NoteOff { note: off, .. }),
            ) => on == off,
            _ => false,
        };
        if same_pitch_pair && current.delta_ticks() == 0 {
            let delta = previous.delta_ticks();
            events[i].set_delta_ticks(delta);
            events[i - 1].set_delta_ticks(0);
            events.swap(i - 1, i);
            swapped += 1;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!("moved {swapped} implicit note offs ahead of their note on");
    #[cfg(not(feature = "tracing"))]
    let _ = swapped;

    true
}

fn has_repeated_note_on(events: &[TrackEvent]) -> bool {
    let mut sounding = [false; 128];
    for event in events {
        match event.message().voice() {
            Some(&VoiceEvent::NoteOn { note, .. }) => {
                let slot = &mut sounding[usize::from(note & 0x7F)];
                if *slot {
                    return true;
                }
                *slot = true;
            }
            Some(&VoiceEvent::NoteOff { note, .. }) => sounding[usize::from(note & 0x7F)] = false,
            _ => {}
        }
    }
    false
}

/// Something that started at `start` and may have ended.
struct OpenSpan<T> {
    start: u64,
    end: Option<u64>,
    value: T,
}

impl<T> OpenSpan<T> {
    fn new(start: u64, value: T) -> Self {
        Self {
            start,
            end: None,
            value,
        }
    }

    fn closed(&self) -> Option<(u64, u64)> {
        let end = self.end?;
        Some((self.start, end - self.start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Channel, ChannelMessage};
    use pretty_assertions::assert_eq;

    const CHANNEL: Channel = Channel::from_status(0);

    fn on(delta: u32, note: u8) -> TrackEvent {
        TrackEvent::new(delta, ChannelMessage::note_on(CHANNEL, note, 100))
    }

    fn off(delta: u32, note: u8) -> TrackEvent {
        TrackEvent::new(delta, ChannelMessage::note_off(CHANNEL, note, 0))
    }

    fn pedal(delta: u32, value: u8) -> TrackEvent {
        TrackEvent::new(
            delta,
            ChannelMessage::new(
                CHANNEL,
                VoiceEvent::Controller {
                    controller: DAMPER_PEDAL,
                    value,
                },
            ),
        )
    }

    fn project(events: Vec<TrackEvent>, options: &PartsOptions) -> Option<Part> {
        Part::from_track(&Track::new(events), TicksPerQuarterNote::default(), options)
    }

    #[test]
    fn implicit_note_off_gets_a_duration() {
        let events = alloc::vec![on(0, 60), on(480, 60), off(0, 60), off(480, 60)];
        let part = project(events, &PartsOptions::default()).unwrap();
        let durations: Vec<(u32, u32)> = part.notes.iter().map(|n| (n.time, n.duration)).collect();
        assert_eq!(durations, [(0, 480), (480, 480)]);
    }

    #[test]
    fn permutation_needs_a_repeated_note_on() {
        let mut events = alloc::vec![on(0, 60), off(0, 60)];
        assert!(!permute_implicit_note_offs(&mut events));
        assert_eq!(events, [on(0, 60), off(0, 60)]);

        let mut events = alloc::vec![on(0, 60), on(10, 60), off(0, 60), off(5, 60)];
        assert!(permute_implicit_note_offs(&mut events));
        assert_eq!(events, [on(0, 60), off(10, 60), on(0, 60), off(5, 60)]);
    }

    #[test]
    fn note_off_closes_the_latest_open_note() {
        let events = alloc::vec![on(0, 60), on(10, 62), on(10, 60), off(10, 60), off(10, 60), off(10, 62)];
        let part = project(events, &PartsOptions::default()).unwrap();
        let notes: Vec<(u8, u32, u32)> = part
            .notes
            .iter()
            .map(|n| (n.pitch, n.time, n.duration))
            .collect();
        assert_eq!(notes, [(60, 0, 40), (62, 10, 40), (60, 20, 10)]);
    }

    #[test]
    fn pedal_spans() {
        let events = alloc::vec![pedal(0, 127), pedal(10, 100), pedal(10, 0), pedal(10, 10), pedal(10, 64)];
        let part = project(events, &PartsOptions::default()).unwrap();
        assert!(part.notes.is_empty());
        assert_eq!(part.sustains, [SustainSpan::new(0, 20)]);
    }

    #[test]
    fn unterminated_notes_are_dropped() {
        let events = alloc::vec![on(0, 60), on(0, 64), off(10, 64)];
        let part = project(events, &PartsOptions::default()).unwrap();
        assert_eq!(part.notes, [Note::new(64, 0, 10, Velocity::new(100))]);

        assert_eq!(project(alloc::vec![on(0, 60)], &PartsOptions::default()), None);
    }

    #[test]
    fn ticks_are_rescaled() {
        let options = PartsOptions {
            ppq: TicksPerQuarterNote::new(192),
            deterministic: false,
        };
        let events = alloc::vec![on(480, 60), off(240, 60)];
        let part = project(events, &options).unwrap();
        assert_eq!(part.notes, [Note::new(60, 192, 96, Velocity::new(100))]);
    }

    #[test]
    fn same_tick_pairs_last_one_tick() {
        let events = alloc::vec![on(0, 36), off(0, 36), pedal(10, 127), pedal(0, 0)];
        let part = project(events, &PartsOptions::default()).unwrap();
        assert_eq!(part.notes, [Note::new(36, 0, 1, Velocity::new(100))]);
        assert_eq!(part.sustains, [SustainSpan::new(10, 1)]);
    }

    #[test]
    fn rescaling_never_empties_a_note() {
        let options = PartsOptions {
            ppq: TicksPerQuarterNote::new(48),
            deterministic: false,
        };
        let events = alloc::vec![on(960, 60), off(2, 60)];
        let part = project(events, &options).unwrap();
        assert_eq!(part.notes, [Note::new(60, 96, 1, Velocity::new(100))]);
    }

    #[test]
    fn deterministic_order() {
        let options = PartsOptions {
            ppq: None,
            deterministic: true,
        };
        let events = alloc::vec![
            on(0, 64),
            on(0, 60),
            off(10, 60),
            on(0, 60),
            off(10, 64),
            off(0, 60),
        ];
        let part = project(events, &options).unwrap();
        let notes: Vec<(u32, u8)> = part.notes.iter().map(|n| (n.time, n.pitch)).collect();
        assert_eq!(notes, [(0, 60), (0, 64), (10, 60)]);
    }

    #[test]
    fn track_name_drops_nul_characters() {
        let events = alloc::vec![
            TrackEvent::new(0, MetaMessage::TrackName(b"Bass\0".to_vec())),
            on(0, 40),
            off(10, 40),
        ];
        let part = project(events, &PartsOptions::default()).unwrap();
        assert_eq!(part.name.as_deref(), Some("Bass"));
        assert_eq!(part.name_or("untitled"), "Bass");
    }
}
