//! MIDI import
//!
//! Decodes a Standard MIDI File into a raw collection: one line per note
//! attack, onset folded into its measure on the 12-ticks-per-quarter grid,
//! with a placeholder duration. The tidy-up engine owns all duration
//! derivation, so the importer never computes note lengths.

use std::fs;
use std::path::{Path, PathBuf};

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use thiserror::Error;

use crate::coll::{render_coll, write_atomic};
use crate::models::{Event, Meter, Tick};

/// Raw lines carry this duration until the engine derives the real one.
const PLACEHOLDER_DURATION: Tick = 100;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("midi parse error: {0}")]
    Midi(#[from] midly::Error),

    #[error("unsupported timing: SMPTE timecode")]
    NonMetricalTiming,

    #[error("unsupported time signature {numerator}/{denominator}: only /4 meters are supported")]
    UnsupportedMeter { numerator: u8, denominator: u16 },

    #[error("midi file error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ImportError>;

/// What an import produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    pub note_count: usize,
    pub meter: Meter,
}

/// Import one MIDI file, writing the raw collection to `coll_path`.
pub fn import_file(midi_path: &Path, coll_path: &Path) -> Result<ImportOutcome> {
    let bytes = fs::read(midi_path)?;
    let smf = Smf::parse(&bytes)?;

    let ppq = match smf.header.timing {
        // A zero PPQ header is degenerate; treat it as one tick per quarter.
        Timing::Metrical(t) => (t.as_int() as u64).max(1),
        Timing::Timecode(..) => return Err(ImportError::NonMetricalTiming),
    };

    let meter = read_meter(&smf)?;
    let attacks = collect_attacks(&smf);
    let events = fold_into_measures(&attacks, ppq, meter);

    write_atomic(coll_path, &render_coll(&events))?;
    log::info!(
        "imported {} notes from {} into {}",
        events.len(),
        midi_path.display(),
        coll_path.display()
    );
    Ok(ImportOutcome { note_count: events.len(), meter })
}

/// Import every MIDI file under `<midi_dir>/<mood>/`, writing collections
/// to `<coll_dir>/<mood>/<name>.txt`. Per-file failures are logged and
/// skipped so one bad tune does not abort a batch.
pub fn import_dir(midi_dir: &Path, coll_dir: &Path) -> Result<usize> {
    let mut imported = 0;
    for mood_entry in fs::read_dir(midi_dir)? {
        let mood_entry = mood_entry?;
        if !mood_entry.file_type()?.is_dir() || is_hidden(&mood_entry.file_name()) {
            continue;
        }
        let out_dir = coll_dir.join(mood_entry.file_name());
        fs::create_dir_all(&out_dir)?;

        for file_entry in fs::read_dir(mood_entry.path())? {
            let file_entry = file_entry?;
            if is_hidden(&file_entry.file_name()) {
                continue;
            }
            let midi_path = file_entry.path();
            let coll_path = coll_txt_path(&out_dir, &midi_path);
            match import_file(&midi_path, &coll_path) {
                Ok(outcome) => {
                    imported += 1;
                    log::debug!("{}: {} notes", midi_path.display(), outcome.note_count);
                }
                Err(e) => log::warn!("skipping {}: {}", midi_path.display(), e),
            }
        }
    }
    Ok(imported)
}

/// Meter from the file's time-signature events. Only /4 meters are
/// supported; the first signature wins, later numerator changes are a
/// non-goal and ignored with a warning.
fn read_meter(smf: &Smf) -> Result<Meter> {
    let mut meter: Option<Meter> = None;
    for track in &smf.tracks {
        for event in track {
            if let TrackEventKind::Meta(MetaMessage::TimeSignature(num, den_pow2, _, _)) =
                event.kind
            {
                if den_pow2 != 2 {
                    return Err(ImportError::UnsupportedMeter {
                        numerator: num,
                        denominator: 1u16 << den_pow2,
                    });
                }
                match meter {
                    None => meter = Some(Meter::with_beats(num as Tick)),
                    Some(m) if m.beats_per_measure != num as Tick => {
                        log::warn!(
                            "time signature change to {}/4 ignored, keeping {}/4",
                            num,
                            m.beats_per_measure
                        );
                    }
                    Some(_) => {}
                }
            }
        }
    }
    Ok(meter.unwrap_or_default())
}

/// Flatten all tracks to (absolute file tick, key, velocity) attacks.
/// NoteOn with velocity 0 is a release and is ignored.
fn collect_attacks(smf: &Smf) -> Vec<(u64, u8, u8)> {
    let mut attacks = Vec::new();
    for track in &smf.tracks {
        let mut tick: u64 = 0;
        for event in track {
            tick += event.delta.as_int() as u64;
            if let TrackEventKind::Midi { message: MidiMessage::NoteOn { key, vel }, .. } =
                event.kind
            {
                if vel.as_int() > 0 {
                    attacks.push((tick, key.as_int(), vel.as_int()));
                }
            }
        }
    }
    attacks.sort();
    attacks
}

/// Rescale file ticks to the collection grid and fold each attack into its
/// measure. One voice: attacks sharing a quantized tick keep the first.
fn fold_into_measures(attacks: &[(u64, u8, u8)], ppq: u64, meter: Meter) -> Vec<Event> {
    let measure_ticks = meter.measure_ticks() as u64;
    let quarter = crate::models::TICKS_PER_QUARTER as u64;

    let mut events = Vec::new();
    let mut last_grid_tick: Option<u64> = None;
    for &(tick, key, vel) in attacks {
        let grid_tick = (tick * quarter + ppq / 2) / ppq;
        if last_grid_tick == Some(grid_tick) {
            log::warn!("dropping simultaneous note {} at grid tick {}", key, grid_tick);
            continue;
        }
        last_grid_tick = Some(grid_tick);

        let onset = (grid_tick % measure_ticks) as Tick;
        events.push(Event::note(onset, key as i32, PLACEHOLDER_DURATION, vel as i32));
    }
    events
}

fn coll_txt_path(out_dir: &Path, midi_path: &Path) -> PathBuf {
    let stem = midi_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    out_dir.join(format!("{}.txt", stem))
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}
