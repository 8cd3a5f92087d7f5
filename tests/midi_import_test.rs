// End-to-end tests for MIDI import: SMF bytes in, raw collection out.

use std::fs;
use std::path::Path;

use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind,
};

use midicoll::converters::midi_to_coll::{import_file, ImportError};

const PPQ: u16 = 480;

fn note_on<'a>(delta: u32, key: u8, vel: u8) -> TrackEvent<'a> {
    TrackEvent {
        delta: delta.into(),
        kind: TrackEventKind::Midi {
            channel: 0.into(),
            message: MidiMessage::NoteOn { key: key.into(), vel: vel.into() },
        },
    }
}

fn meta<'a>(delta: u32, message: MetaMessage<'a>) -> TrackEvent<'a> {
    TrackEvent { delta: delta.into(), kind: TrackEventKind::Meta(message) }
}

fn write_smf(path: &Path, events: Vec<TrackEvent>) {
    let mut track = events;
    track.push(meta(0, MetaMessage::EndOfTrack));
    let smf = Smf {
        header: Header { format: Format::SingleTrack, timing: Timing::Metrical(PPQ.into()) },
        tracks: vec![track],
    };
    let mut bytes = Vec::new();
    smf.write(&mut bytes).unwrap();
    fs::write(path, bytes).unwrap();
}

#[test]
fn imports_attacks_with_folded_onsets_and_placeholder_durations() {
    let dir = tempfile::tempdir().unwrap();
    let midi_path = dir.path().join("tune.mid");
    let coll_path = dir.path().join("tune.txt");

    // Four attacks a quarter apart-ish: beats 1 and 2 of measure one, then
    // beats 1 and 3 of measure two. Velocity-0 NoteOns are releases.
    write_smf(
        &midi_path,
        vec![
            meta(0, MetaMessage::TimeSignature(4, 2, 24, 8)),
            note_on(0, 60, 90),
            note_on(480, 60, 0),
            note_on(0, 62, 80),
            note_on(480, 62, 0),
            note_on(960, 64, 70),
            note_on(480, 64, 0),
            note_on(480, 65, 60),
        ],
    );

    let outcome = import_file(&midi_path, &coll_path).unwrap();

    assert_eq!(outcome.note_count, 4);
    assert_eq!(outcome.meter.beats_per_measure, 4);
    assert_eq!(
        fs::read_to_string(&coll_path).unwrap(),
        "0, 0 60 100 90;\n1, 12 62 100 80;\n2, 0 64 100 70;\n3, 24 65 100 60;\n"
    );
}

#[test]
fn defaults_to_four_four_without_a_time_signature() {
    let dir = tempfile::tempdir().unwrap();
    let midi_path = dir.path().join("tune.mid");
    let coll_path = dir.path().join("tune.txt");

    write_smf(&midi_path, vec![note_on(0, 60, 90)]);

    let outcome = import_file(&midi_path, &coll_path).unwrap();
    assert_eq!(outcome.meter.beats_per_measure, 4);
}

#[test]
fn rejects_non_quarter_denominators() {
    let dir = tempfile::tempdir().unwrap();
    let midi_path = dir.path().join("tune.mid");
    let coll_path = dir.path().join("tune.txt");

    // 6/8: denominator power 3
    write_smf(
        &midi_path,
        vec![meta(0, MetaMessage::TimeSignature(6, 3, 24, 8)), note_on(0, 60, 90)],
    );

    let err = import_file(&midi_path, &coll_path).unwrap_err();
    assert!(matches!(
        err,
        ImportError::UnsupportedMeter { numerator: 6, denominator: 8 }
    ));
    assert!(!coll_path.exists());
}
