use midiconv::prelude::*;
use pretty_assertions::assert_eq;

/// A format 0 file at 96 ticks per quarter note holding an SMPTE offset and
/// one note.
fn midi_with_smpte_offset(hour_byte: u8, minute: u8, second: u8, frame: u8, subframe: u8) -> Vec<u8> {
    let mut bytes = Vec::new();

    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]);
    bytes.extend_from_slice(&[0x00, 0x00]); // format 0
    bytes.extend_from_slice(&[0x00, 0x01]); // one track
    bytes.extend_from_slice(&[0x00, 0x60]); // 96 ticks per quarter note

    bytes.extend_from_slice(b"MTrk");
    let track_length_pos = bytes.len();
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    let track_start = bytes.len();

    bytes.extend_from_slice(&[0x00, 0xFF, 0x54, 0x05]);
    bytes.extend_from_slice(&[hour_byte, minute, second, frame, subframe]);

    bytes.extend_from_slice(&[0x00, 0x90, 0x3C, 0x64]);
    bytes.extend_from_slice(&[0x60, 0x80, 0x3C, 0x40]);
    bytes.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

    let track_length = (bytes.len() - track_start) as u32;
    bytes[track_length_pos..track_length_pos + 4].copy_from_slice(&track_length.to_be_bytes());

    bytes
}

fn first_offset(bytes: &[u8]) -> SmpteOffset {
    let file = MidiFile::parse(bytes).unwrap();
    match file.tracks()[0].events()[0].message() {
        TrackMessage::Meta(MetaMessage::SmpteOffset(offset)) => *offset,
        other => panic!("Expected an SMPTE offset, got {other:?}"),
    }
}

#[test]
fn smpte_offset_24fps() {
    let offset = first_offset(&midi_with_smpte_offset(12, 30, 15, 18, 50));

    assert_eq!(offset.fps, SmpteFps::TwentyFour);
    assert_eq!(offset.hour, 12);
    assert_eq!(offset.minute, 30);
    assert_eq!(offset.second, 15);
    assert_eq!(offset.frame, 18);
    assert_eq!(offset.subframe, 50);

    let expected_micros = (12 * 3600 + 30 * 60 + 15) as f64 * 1_000_000.0
        + (18.0 / 24.0) * 1_000_000.0
        + (50.0 / 100.0 / 24.0) * 1_000_000.0;
    assert!((offset.as_micros() - expected_micros).abs() < 0.01);
}

#[test]
fn smpte_offset_frame_rates() {
    let rates = [
        (0b0000_0000, SmpteFps::TwentyFour),
        (0b0010_0000, SmpteFps::TwentyFive),
        (0b0100_0000, SmpteFps::TwentyNine),
        (0b0110_0000, SmpteFps::Thirty),
    ];
    for (bits, fps) in rates {
        let offset = first_offset(&midi_with_smpte_offset(bits | 3, 0, 0, 0, 0));
        assert_eq!(offset.fps, fps);
        assert_eq!(offset.hour, 3);
    }
}

#[test]
fn out_of_range_fields_are_kept() {
    // frame 40 does not exist at 25 fps, and nothing complains about it
    let bytes = midi_with_smpte_offset(0x20 | 0x1F, 99, 99, 40, 200);
    let offset = first_offset(&bytes);
    assert_eq!(offset.hour, 31);
    assert_eq!(offset.frame, 40);
    assert_eq!(offset.subframe, 200);

    let written = MidiFile::parse(&bytes).unwrap().to_bytes().unwrap();
    assert_eq!(written, bytes);
}

#[test]
fn smpte_offset_needs_five_bytes() {
    let mut bytes = midi_with_smpte_offset(0, 0, 0, 0, 0);
    // declared length of the offset payload, after the 22 header and chunk bytes
    bytes[25] = 0x04;

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(err.position(), 23);
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::BadEventLength {
            meta_type: MetaType::SmpteOffset,
            expected: 5,
            found: 4,
        })
    );
}

#[test]
fn smpte_time_division_is_rejected() {
    let mut bytes = midi_with_smpte_offset(0, 0, 0, 0, 0);
    // -25 frames per second, 40 ticks per frame
    bytes[12] = 0xE7;
    bytes[13] = 40;

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(err.position(), 12);
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::UnsupportedTimeDivision(0xE728))
    );
}
