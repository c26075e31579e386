use alloc::vec::Vec;

use crate::{
    events::{TrackEvent, TrackMessage},
    file::{FormatType, MidiFile, Track},
    message::MetaMessage,
};

/// Rewrites a format 0 file as format 1 with one track per channel.
///
/// Events without a channel (meta and system exclusive) go with channel 0.
/// Tracks appear in ascending channel order and only for channels that have
/// events. Delta times are recomputed within each new track, and every new
/// track is closed with an end of track marker at its last event.
///
/// Files of any other format are returned unchanged.
pub fn split_by_channel(file: MidiFile) -> MidiFile {
    if file.format_type() != FormatType::SingleMultiChannel {
        return file;
    }
    let timing = file.timing();
    let tracks: Vec<Track> = file
        .into_tracks()
        .iter()
        .flat_map(split_track)
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!("split format 0 file into {} tracks", tracks.len());

    MidiFile::new(FormatType::Simultaneous, timing, tracks)
}

fn split_track(track: &Track) -> Vec<Track> {
    let mut channels: [Option<(u64, Vec<TrackEvent>)>; 16] = Default::default();

    for timed in track.timed_events() {
        let event = timed.event();
        if event.message().is_end_of_track() {
            continue;
        }
        let channel = match event.message() {
            TrackMessage::Channel(message) => usize::from(message.channel().number()),
            _ => 0,
        };
        let (last_tick, events) = channels[channel].get_or_insert_with(|| (0, Vec::new()));
        let delta = timed.accumulated_ticks() - *last_tick;
        *last_tick = timed.accumulated_ticks();
        events.push(TrackEvent::new(
            u32::try_from(delta).unwrap_or(u32::MAX),
            event.message().clone(),
        ));
    }

    channels
        .into_iter()
        .flatten()
        .map(|(_, mut events)| {
            events.push(TrackEvent::new(0, MetaMessage::EndOfTrack));
            Track::new(events)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        file::TicksPerQuarterNote,
        message::{Channel, ChannelMessage, Tempo},
    };
    use pretty_assertions::assert_eq;

    fn deltas(track: &Track) -> Vec<u32> {
        track.events().iter().map(TrackEvent::delta_ticks).collect()
    }

    #[test]
    fn channels_become_tracks() {
        let c0 = Channel::new(0).unwrap();
        let c3 = Channel::new(3).unwrap();
        let track = Track::new(alloc::vec![
            TrackEvent::new(0, MetaMessage::SetTempo(Tempo::default())),
            TrackEvent::new(0, ChannelMessage::note_on(c3, 50, 80)),
            TrackEvent::new(100, ChannelMessage::note_on(c0, 60, 80)),
            TrackEvent::new(100, ChannelMessage::note_off(c3, 50, 0)),
            TrackEvent::new(100, ChannelMessage::note_off(c0, 60, 0)),
            TrackEvent::new(0, MetaMessage::EndOfTrack),
        ]);
        let file = split_by_channel(MidiFile::single_track(
            TicksPerQuarterNote::default(),
            track,
        ));

        assert_eq!(file.format_type(), FormatType::Simultaneous);
        assert_eq!(file.header().track_count(), 2);
        assert_eq!(deltas(&file.tracks()[0]), [0, 100, 200, 0]);
        assert_eq!(deltas(&file.tracks()[1]), [0, 200, 0]);
        assert!(file.tracks().iter().all(Track::is_terminated));
    }

    #[test]
    fn other_formats_are_untouched() {
        let file = MidiFile::new(
            FormatType::Simultaneous,
            TicksPerQuarterNote::default(),
            alloc::vec![Track::default(), Track::default()],
        );
        assert_eq!(split_by_channel(file.clone()), file);
    }
}
