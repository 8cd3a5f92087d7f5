//! Repetition: append a verbatim copy of a slice

use std::path::Path;

use crate::coll::{self, render_coll_indexed, write_atomic};
use crate::models::{IndexedEvent, Meter};
use crate::tidy::{self, TidyOutcome};
use crate::transforms::{append_copies, checked_slice, is_rest, Result};

/// Append a copy of the events at positions `[start, end)`, dropping rests.
/// Returns the first appended index.
pub fn repeat_slice(
    events: &mut Vec<IndexedEvent>,
    start: usize,
    end: usize,
) -> Result<usize> {
    let copies: Vec<_> = checked_slice(events, start, end)?
        .iter()
        .filter(|raw| !is_rest(raw))
        .map(|raw| raw.event)
        .collect();
    append_copies(events, copies, start, end)
}

/// File driver: read, repeat the slice, write the extended collection, then
/// re-tidy from the event just before the seam.
pub fn repeat_file(
    path: &Path,
    start: usize,
    end: usize,
    meter: Meter,
) -> Result<TidyOutcome> {
    let mut events = coll::read_coll(path)?;
    let first_appended = repeat_slice(&mut events, start, end)?;
    write_atomic(path, &render_coll_indexed(&events))?;

    log::info!(
        "repeated events {}..{} of {}, re-tidying from {}",
        start,
        end,
        path.display(),
        first_appended.saturating_sub(1)
    );
    Ok(tidy::tidy_file(path, first_appended.saturating_sub(1), meter)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Event;
    use crate::transforms::TransformError;

    fn make_coll(events: &[Event]) -> Vec<IndexedEvent> {
        events
            .iter()
            .enumerate()
            .map(|(index, &event)| IndexedEvent { index, event })
            .collect()
    }

    #[test]
    fn copies_the_slice_after_the_end() {
        let mut events = make_coll(&[
            Event::note(0, 60, 24, 90),
            Event::note(24, 62, 24, 80),
            Event::note(0, 64, 48, 70),
        ]);
        let first = repeat_slice(&mut events, 0, 2).unwrap();

        assert_eq!(first, 3);
        assert_eq!(events.len(), 5);
        assert_eq!(events[3], IndexedEvent { index: 3, event: Event::note(0, 60, 24, 90) });
        assert_eq!(events[4], IndexedEvent { index: 4, event: Event::note(24, 62, 24, 80) });
    }

    #[test]
    fn drops_rests_from_the_copy() {
        let mut events = make_coll(&[
            Event::rest(0, 5),
            Event::note(5, 60, 43, 90),
            Event::note(0, 62, 48, 80),
        ]);
        repeat_slice(&mut events, 0, 2).unwrap();

        assert_eq!(events.len(), 4);
        assert_eq!(events[3].event, Event::note(5, 60, 43, 90));
    }

    #[test]
    fn rejects_bad_slices() {
        let mut events = make_coll(&[Event::note(0, 60, 48, 90)]);
        assert!(matches!(
            repeat_slice(&mut events, 0, 5),
            Err(TransformError::SliceOutOfRange { .. })
        ));
        assert!(matches!(
            repeat_slice(&mut events, 1, 1),
            Err(TransformError::SliceOutOfRange { .. })
        ));

        let mut rests_only = make_coll(&[Event::rest(0, 48)]);
        assert!(matches!(
            repeat_slice(&mut rests_only, 0, 1),
            Err(TransformError::EmptySlice { .. })
        ));
    }
}
