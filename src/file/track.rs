use alloc::vec::Vec;

use super::TimedEvents;
use crate::{
    events::TrackEvent,
    message::MetaMessage,
};

#[doc = r#"
The events of one `MTrk` chunk, in wire order.

Delta times are relative to the previous event, so the order is part of the
meaning of the track. Use [`Track::timed_events`] for absolute positions.
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    events: Vec<TrackEvent>,
}

impl Track {
    /// Create a track from its events
    pub const fn new(events: Vec<TrackEvent>) -> Self {
        Self { events }
    }

    /// The events in wire order
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    /// Takes the events
    pub fn into_events(self) -> Vec<TrackEvent> {
        self.events
    }

    /// Appends an event
    pub fn push(&mut self, event: TrackEvent) {
        self.events.push(event);
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the track holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events with their accumulated tick position.
    pub fn timed_events(&self) -> TimedEvents<'_> {
        TimedEvents::new(&self.events)
    }

    /// Raw bytes of the first track name meta event.
    pub fn name(&self) -> Option<&[u8]> {
        self.events.iter().find_map(|e| match e.message().as_meta() {
            Some(MetaMessage::TrackName(name)) => Some(name.as_slice()),
            _ => None,
        })
    }

    /// True if the final event is an end of track marker.
    pub fn is_terminated(&self) -> bool {
        self.events
            .last()
            .is_some_and(|e| e.message().is_end_of_track())
    }
}

impl From<Vec<TrackEvent>> for Track {
    fn from(events: Vec<TrackEvent>) -> Self {
        Self::new(events)
    }
}

#[test]
fn timed_events_accumulate_deltas() {
    use crate::message::{Channel, ChannelMessage};
    use pretty_assertions::assert_eq;

    let channel = Channel::default();
    let track = Track::new(alloc::vec![
        TrackEvent::new(10, ChannelMessage::note_on(channel, 60, 90)),
        TrackEvent::new(0, MetaMessage::TrackName(b"lead".to_vec())),
        TrackEvent::new(470, ChannelMessage::note_off(channel, 60, 0)),
        TrackEvent::new(0, MetaMessage::EndOfTrack),
    ]);

    let ticks: Vec<u64> = track.timed_events().map(|t| t.accumulated_ticks()).collect();
    assert_eq!(ticks, [10, 10, 480, 480]);
    assert_eq!(track.name(), Some(&b"lead"[..]));
    assert!(track.is_terminated());
}
