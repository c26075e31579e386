use crate::events::{Ticked, TrackEvent};

/// An iterator returned from [`Track::timed_events`](super::Track::timed_events).
///
/// Yields each event paired with the sum of the delta times up to and
/// including its own.
#[derive(Debug, Clone)]
pub struct TimedEvents<'a> {
    events: core::slice::Iter<'a, TrackEvent>,
    accumulated_ticks: u64,
}

impl<'a> TimedEvents<'a> {
    pub(super) fn new(events: &'a [TrackEvent]) -> Self {
        Self {
            events: events.iter(),
            accumulated_ticks: 0,
        }
    }
}

impl<'a> Iterator for TimedEvents<'a> {
    type Item = Ticked<&'a TrackEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.events.next()?;
        self.accumulated_ticks += u64::from(event.delta_ticks());
        Some(Ticked::new(self.accumulated_ticks, event))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.events.size_hint()
    }
}

impl ExactSizeIterator for TimedEvents<'_> {}
