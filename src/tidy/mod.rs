//! Tidy-up engine
//!
//! The measure-boundary state machine plus its file driver. The engine is
//! pure (events in, events + group table out); the driver owns the
//! read-run-replace transaction around it.

mod engine;

pub use engine::tidy_up;

use std::path::Path;

use thiserror::Error;

use crate::coll::{self, render_coll, render_groups, write_coll_and_groups, CollError};
use crate::models::{GroupTable, Meter};

/// Input sequence violates the engine's preconditions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("event indices must be strictly increasing: {index} after {previous}")]
    UnsortedIndex { previous: usize, index: usize },
}

/// Anything that can stop a tidy-up run. No output is committed once any
/// of these occurs.
#[derive(Debug, Error)]
pub enum TidyError {
    #[error(transparent)]
    Coll(#[from] CollError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("collection file error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a completed tidy-up run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TidyOutcome {
    pub event_count: usize,
    pub groups: GroupTable,
}

/// Read a collection file, tidy it from `start_index`, and atomically
/// replace it, writing the group table alongside as `group_<basename>`.
///
/// The whole operation is a single logical transaction: errors at any
/// stage leave both files untouched.
pub fn tidy_file(path: &Path, start_index: usize, meter: Meter) -> Result<TidyOutcome, TidyError> {
    let raw = coll::read_coll(path)?;
    let (events, groups) = tidy_up(&raw, start_index, meter.measure_ticks())?;

    write_coll_and_groups(path, &render_coll(&events), &render_groups(&groups))?;

    log::info!(
        "tidied {} from index {}: {} events in {} measures",
        path.display(),
        start_index,
        events.len(),
        groups.len()
    );
    Ok(TidyOutcome { event_count: events.len(), groups })
}
