//! Markov transition-table training
//!
//! Folds raw collections into first-order transition counts for pitch and
//! onset, then renders them in the Max message format consumed downstream:
//!
//! ```text
//! reset
//! states {n}
//! build
//! initial_prob 0 {p0} {p1} ...
//! transitions {i} {p0} {p1} ...
//! ```

use std::path::{Path, PathBuf};

use ndarray::Array2;
use thiserror::Error;

use crate::coll::{self, write_atomic, CollError};
use crate::models::Meter;

/// Pitch symbols are raw MIDI numbers below this bound.
pub const PITCH_STATES: usize = 108;

#[derive(Debug, Error)]
pub enum TrainError {
    #[error("symbol {symbol} does not fit a {states}-state model")]
    SymbolOutOfRange { symbol: usize, states: usize },

    #[error("no tunes for mode '{mode}' in {beats} beats under {}", .dir.display())]
    NoMatchingTunes { dir: PathBuf, mode: char, beats: i32 },

    #[error(transparent)]
    Coll(#[from] CollError),

    #[error("training file error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrainError>;

/// Major or minor, as tagged in collection file names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    /// The single-character tag used in file stems (`name+4.txt`, `name-3.txt`).
    pub fn tag(self) -> char {
        match self {
            Mode::Major => '+',
            Mode::Minor => '-',
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Mode, String> {
        match s {
            "major" => Ok(Mode::Major),
            "minor" => Ok(Mode::Minor),
            other => Err(format!("mode must be 'major' or 'minor', got '{}'", other)),
        }
    }
}

/// First-order transition counts over `0..num_states`.
#[derive(Clone, Debug)]
pub struct TransitionModel {
    transition_counts: Array2<f64>,
    initial_counts: Vec<u64>,
    tune_count: usize,
}

impl TransitionModel {
    pub fn new(num_states: usize) -> TransitionModel {
        TransitionModel {
            transition_counts: Array2::zeros((num_states, num_states)),
            initial_counts: vec![0; num_states],
            tune_count: 0,
        }
    }

    pub fn num_states(&self) -> usize {
        self.initial_counts.len()
    }

    pub fn tune_count(&self) -> usize {
        self.tune_count
    }

    /// Verify every symbol fits the state space.
    pub fn check(&self, seq: &[usize]) -> Result<()> {
        let states = self.num_states();
        match seq.iter().find(|&&s| s >= states) {
            Some(&symbol) => Err(TrainError::SymbolOutOfRange { symbol, states }),
            None => Ok(()),
        }
    }

    /// Count one tune's transitions. Validates first; a failing sequence
    /// leaves the model untouched.
    pub fn add_sequence(&mut self, seq: &[usize]) -> Result<()> {
        self.check(seq)?;
        let mut last = 0usize;
        for (i, &symbol) in seq.iter().enumerate() {
            if i == 0 {
                self.initial_counts[symbol] += 1;
            } else {
                self.transition_counts[[last, symbol]] += 1.0;
            }
            last = symbol;
        }
        self.tune_count += 1;
        Ok(())
    }

    /// Render the Max message format. The `initial_prob` line starts with a
    /// literal 0 and omits the final state, and only states with outgoing
    /// transitions get a `transitions` line, matching what the downstream
    /// patch expects.
    pub fn render(&self) -> String {
        let mut out = format!("reset\nstates {}\nbuild", self.num_states());

        out.push_str("\ninitial_prob 0");
        for &count in &self.initial_counts[..self.num_states() - 1] {
            let prob = count as f64 / self.tune_count.max(1) as f64;
            out.push_str(&format!(" {}", prob));
        }

        for (i, row) in self.transition_counts.outer_iter().enumerate() {
            let total: f64 = row.sum();
            if total == 0.0 {
                continue;
            }
            out.push_str(&format!("\ntransitions {}", i));
            for &count in row.iter() {
                out.push_str(&format!(" {}", count / total));
            }
        }
        out
    }
}

/// What a training run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainOutcome {
    pub tune_count: usize,
    pub pitch_path: PathBuf,
    pub onset_path: PathBuf,
}

/// Train pitch and onset models from every collection under
/// `<coll_dir>/<mood>/` whose stem is tagged `{mode}{beats}`, writing
/// `pitch_markov.txt` and `onset_markov.txt` to `out_dir`.
///
/// Tunes with out-of-range symbols are skipped with a warning rather than
/// poisoning the tables.
pub fn train_dir(
    coll_dir: &Path,
    mood: &str,
    mode: Mode,
    meter: Meter,
    out_dir: &Path,
) -> Result<TrainOutcome> {
    let suffix = format!("{}{}", mode.tag(), meter.beats_per_measure);
    let mut pitch_model = TransitionModel::new(PITCH_STATES);
    let mut onset_model = TransitionModel::new(meter.measure_ticks() as usize);

    let dir = coll_dir.join(mood);
    let mut names: Vec<PathBuf> = std::fs::read_dir(&dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    names.sort();

    for path in names {
        if !matches_tag(&path, &suffix) {
            continue;
        }
        let events = coll::read_coll(&path)?;
        let (onsets, pitches) = match symbol_columns(&events) {
            Some(columns) => columns,
            None => {
                log::warn!("skipping {}: negative symbol", path.display());
                continue;
            }
        };
        if let Err(e) = onset_model.check(&onsets).and_then(|_| pitch_model.check(&pitches)) {
            log::warn!("skipping {}: {}", path.display(), e);
            continue;
        }
        onset_model.add_sequence(&onsets)?;
        pitch_model.add_sequence(&pitches)?;
        log::debug!("trained on {}", path.display());
    }

    if pitch_model.tune_count() == 0 {
        return Err(TrainError::NoMatchingTunes {
            dir,
            mode: mode.tag(),
            beats: meter.beats_per_measure,
        });
    }

    let pitch_path = out_dir.join("pitch_markov.txt");
    let onset_path = out_dir.join("onset_markov.txt");
    write_atomic(&pitch_path, &pitch_model.render())?;
    write_atomic(&onset_path, &onset_model.render())?;

    log::info!("trained {} tunes from {}", pitch_model.tune_count(), dir.display());
    Ok(TrainOutcome { tune_count: pitch_model.tune_count(), pitch_path, onset_path })
}

/// A `*.txt`, not hidden, whose stem ends in the `{mode}{beats}` tag.
fn matches_tag(path: &Path, suffix: &str) -> bool {
    if path.extension().map_or(true, |ext| ext != "txt") {
        return false;
    }
    let stem = match path.file_stem() {
        Some(stem) => stem.to_string_lossy().into_owned(),
        None => return false,
    };
    !stem.starts_with('.') && stem.ends_with(suffix)
}

/// Onset and pitch columns as model symbols; None if any value is negative.
fn symbol_columns(events: &[crate::models::IndexedEvent]) -> Option<(Vec<usize>, Vec<usize>)> {
    let mut onsets = Vec::with_capacity(events.len());
    let mut pitches = Vec::with_capacity(events.len());
    for raw in events {
        onsets.push(usize::try_from(raw.event.onset).ok()?);
        pitches.push(usize::try_from(raw.event.pitch_field()).ok()?);
    }
    Some((onsets, pitches))
}
