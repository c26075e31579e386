use alloc::{vec, vec::Vec};

use crate::note::{Note, SustainSpan, Velocity};

/// What happens at a [`PointEvent`].
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointKind {
    /// A note starts
    NoteOn,
    /// A note ends
    NoteOff,
    /// The damper pedal goes down
    SustainOn,
    /// The damper pedal comes up
    SustainOff,
}

impl PointKind {
    /// True for the kinds that end something.
    pub const fn is_off(&self) -> bool {
        matches!(self, Self::NoteOff | Self::SustainOff)
    }
}

#[doc = r#"
One end of a note or a sustain span, at an absolute tick.

Both ends of a note carry the note's duration; sustain ends carry none.
"#]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointEvent {
    /// Absolute tick
    pub time: u32,
    /// What happens
    pub kind: PointKind,
    /// Note number, zero for sustain events
    pub pitch: u8,
    /// Note velocity, zero for sustain events
    pub velocity: Velocity,
    /// Length of the note this event belongs to
    pub duration: Option<u32>,
}

impl PointEvent {
    /// Both ends of a note. The caller guarantees the end fits a `u32`.
    pub(super) fn from_note(note: &Note, end: u32) -> [Self; 2] {
        let point = |time, kind| Self {
            time,
            kind,
            pitch: note.pitch,
            velocity: note.velocity,
            duration: Some(note.duration),
        };
        [
            point(note.time, PointKind::NoteOn),
            point(end, PointKind::NoteOff),
        ]
    }

    /// Both ends of a sustain span.
    pub(super) fn from_sustain(span: &SustainSpan, end: u32) -> [Self; 2] {
        let point = |time, kind| Self {
            time,
            kind,
            pitch: 0,
            velocity: Velocity::default(),
            duration: None,
        };
        [
            point(span.time, PointKind::SustainOn),
            point(end, PointKind::SustainOff),
        ]
    }
}

/// Puts the points in emission order.
///
/// Points are stably sorted by time, then placed one at a time. The first
/// unplaced point is the default pick. If it belongs to a note, the first
/// unplaced off event at the same tick wins instead, failing that the first
/// one whose note is strictly longer. Ties beyond that keep arrival order.
pub(super) fn order_points(mut points: Vec<PointEvent>) -> Vec<PointEvent> {
    points.sort_by_key(|p| p.time);

    let mut placed = vec![false; points.len()];
    let mut ordered = Vec::with_capacity(points.len());
    let mut first = 0;

    while ordered.len() < points.len() {
        while placed[first] {
            first += 1;
        }
        let pick = match points[first].duration {
            None => first,
            Some(duration) => {
                let same_tick = same_tick_unplaced(&points, &placed, first);
                same_tick
                    .clone()
                    .find(|&i| points[i].kind.is_off())
                    .or_else(|| {
                        same_tick
                            .clone()
                            .find(|&i| points[i].duration.is_some_and(|d| d > duration))
                    })
                    .unwrap_or(first)
            }
        };
        placed[pick] = true;
        ordered.push(points[pick]);
    }
    ordered
}

/// Indices of the unplaced points sharing the tick of `points[first]`.
fn same_tick_unplaced<'a>(
    points: &'a [PointEvent],
    placed: &'a [bool],
    first: usize,
) -> impl Iterator<Item = usize> + Clone + 'a {
    let time = points[first].time;
    (first..points.len())
        .take_while(move |&i| points[i].time == time)
        .filter(move |&i| !placed[i])
}
