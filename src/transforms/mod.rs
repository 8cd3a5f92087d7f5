//! Slice transforms
//!
//! Repetition and sequence both grow a collection by appending a copy of an
//! existing slice as raw events, then hand the seam to the tidy-up engine.
//! Rests are dropped from the copy (a statement's rest can only sit at its
//! start, and the engine re-derives the gap by extending the note before
//! the seam).

pub mod repetition;
pub mod sequence;

pub use repetition::{repeat_file, repeat_slice};
pub use sequence::{sequence_file, sequence_slice};

use thiserror::Error;

use crate::coll::CollError;
use crate::models::{EventKind, IndexedEvent};
use crate::tidy::TidyError;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("slice {start}..{end} is out of range for {len} events")]
    SliceOutOfRange { start: usize, end: usize, len: usize },

    #[error("slice {start}..{end} has no events to copy")]
    EmptySlice { start: usize, end: usize },

    #[error(transparent)]
    Coll(#[from] CollError),

    #[error(transparent)]
    Tidy(#[from] TidyError),

    #[error("collection file error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransformError>;

/// Validate `[start, end)` against the collection and return the slice.
fn checked_slice(
    events: &[IndexedEvent],
    start: usize,
    end: usize,
) -> Result<&[IndexedEvent]> {
    if start >= end || end > events.len() {
        return Err(TransformError::SliceOutOfRange { start, end, len: events.len() });
    }
    Ok(&events[start..end])
}

/// Append `copies` as raw events continuing the collection's index
/// sequence, returning the first appended index.
fn append_copies(
    events: &mut Vec<IndexedEvent>,
    copies: Vec<crate::models::Event>,
    start: usize,
    end: usize,
) -> Result<usize> {
    if copies.is_empty() {
        return Err(TransformError::EmptySlice { start, end });
    }
    let base = events.last().map(|raw| raw.index + 1).unwrap_or(0);
    for (k, event) in copies.into_iter().enumerate() {
        events.push(IndexedEvent { index: base + k, event });
    }
    Ok(base)
}

fn is_rest(raw: &IndexedEvent) -> bool {
    matches!(raw.event.kind, EventKind::Rest { .. })
}
