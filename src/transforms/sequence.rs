//! Sequence: append a pitch-shifted copy of a slice
//!
//! Each copied note keeps its interval to the slice's ending pitch, taken
//! relative to a new ending pitch. Non-pitched events are copied unchanged.

use std::path::Path;

use crate::coll::{self, render_coll_indexed, write_atomic};
use crate::models::{EventKind, IndexedEvent, Meter};
use crate::tidy::{self, TidyOutcome};
use crate::transforms::{append_copies, checked_slice, is_rest, Result};

/// Append a transposed copy of the events at positions `[start, end)`,
/// anchored so the copy ends on `end_pitch`. Returns the first appended
/// index.
pub fn sequence_slice(
    events: &mut Vec<IndexedEvent>,
    start: usize,
    end: usize,
    end_pitch: i32,
) -> Result<usize> {
    let slice = checked_slice(events, start, end)?;
    let anchor = slice[slice.len() - 1].event.pitch_field();

    let copies: Vec<_> = slice
        .iter()
        .filter(|raw| !is_rest(raw))
        .map(|raw| {
            let mut event = raw.event;
            if let EventKind::Note { pitch, .. } = &mut event.kind {
                if *pitch > 0 {
                    *pitch = *pitch - anchor + end_pitch;
                }
            }
            event
        })
        .collect();
    append_copies(events, copies, start, end)
}

/// File driver: read, sequence the slice, write the extended collection,
/// then re-tidy from the event just before the seam.
pub fn sequence_file(
    path: &Path,
    start: usize,
    end: usize,
    end_pitch: i32,
    meter: Meter,
) -> Result<TidyOutcome> {
    let mut events = coll::read_coll(path)?;
    let first_appended = sequence_slice(&mut events, start, end, end_pitch)?;
    write_atomic(path, &render_coll_indexed(&events))?;

    log::info!(
        "sequenced events {}..{} of {} onto ending pitch {}, re-tidying from {}",
        start,
        end,
        path.display(),
        end_pitch,
        first_appended.saturating_sub(1)
    );
    Ok(tidy::tidy_file(path, first_appended.saturating_sub(1), meter)?)
}
