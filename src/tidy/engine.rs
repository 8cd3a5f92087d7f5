//! Measure-boundary state machine
//!
//! Walks a raw event sequence in index order and re-derives measure-aligned
//! timing from onset positions:
//!
//! ```text
//! raw events (placeholder durations) → TIDY-UP → normalized events + group table
//! ```
//!
//! Events at original indices below `start_index` were finalized by an
//! earlier pass and are replayed verbatim (the group table is still
//! re-derived from their onsets). From `start_index` on, each event's true
//! duration is inferred from the distance to the next onset, with ties and
//! rests synthesized at measure boundaries.
//!
//! The most recently emitted event is always reachable through the output
//! buffer's tail, so back-patching never indexes the buffer by arithmetic
//! on original indices. Output line indices are derived from position at
//! render time, which keeps them contiguous across synthetic insertions.

use crate::models::{Event, EventKind, GroupTable, IndexedEvent, Tick};
use crate::tidy::ValidationError;

/// Run the tidy-up pass.
///
/// `start_index` is the first original index whose timing must be
/// re-derived; 0 re-derives everything, a value beyond the last index
/// replays the whole input. `measure_ticks` is the measure length on the
/// tick grid.
pub fn tidy_up(
    input: &[IndexedEvent],
    start_index: usize,
    measure_ticks: Tick,
) -> Result<(Vec<Event>, GroupTable), ValidationError> {
    validate_order(input)?;

    let mut state = TidyState::new(measure_ticks);
    for raw in input {
        if raw.index < start_index {
            state.replay(raw.event);
        } else {
            state.rederive(raw.event);
        }
    }
    Ok(state.finish())
}

fn validate_order(input: &[IndexedEvent]) -> Result<(), ValidationError> {
    let mut previous: Option<usize> = None;
    for raw in input {
        if let Some(prev) = previous {
            if raw.index <= prev {
                return Err(ValidationError::UnsortedIndex { previous: prev, index: raw.index });
            }
        }
        previous = Some(raw.index);
    }
    Ok(())
}

/// Accumulated output of an in-progress pass.
struct TidyState {
    measure_ticks: Tick,
    out: Vec<Event>,
    groups: GroupTable,
    /// Events emitted since the last measure boundary.
    group_len: usize,
}

impl TidyState {
    fn new(measure_ticks: Tick) -> TidyState {
        TidyState {
            measure_ticks,
            out: Vec::new(),
            groups: GroupTable::new(),
            group_len: 0,
        }
    }

    /// Copy an already-finalized event, only tracking measure boundaries.
    fn replay(&mut self, event: Event) {
        if !self.out.is_empty() && event.onset == 0 {
            self.close_group();
        }
        self.out.push(event);
        self.group_len += 1;
    }

    /// Process one event whose timing must be re-derived.
    fn rederive(&mut self, event: Event) {
        match self.out.last().copied() {
            None => {
                // First event of the whole collection: cover any leading
                // silence with a rest so the measure starts at tick 0.
                if event.onset != 0 {
                    log::debug!("leading rest of {} ticks", event.onset);
                    self.out.push(Event::rest(0, event.onset));
                    self.group_len = 1;
                }
            }
            Some(last) => {
                if event.onset == 0 {
                    // New measure, no carry: the previous note fills out its measure.
                    self.patch_last_note(self.measure_ticks);
                    self.close_group();
                } else if event.onset <= last.onset {
                    self.carry_into_new_measure(event, last);
                } else {
                    // Same measure: the previous note ends where this one starts.
                    self.patch_last_note(event.onset);
                }
            }
        }

        // The event itself lands with a provisional full-measure duration;
        // the next boundary decision (or finalization) settles it.
        self.out.push(Event::note(
            event.onset,
            event.pitch_field(),
            self.measure_ticks,
            event.velocity_field(),
        ));
        self.group_len += 1;
    }

    /// New measure whose first event does not start at tick 0: the gap
    /// belongs to the previous event. A held note is split with a tie
    /// marker and a carry-over note; silence is extended with a plain rest.
    fn carry_into_new_measure(&mut self, event: Event, last: Event) {
        match last.kind {
            EventKind::Note { pitch, duration, velocity } if duration > 0 => {
                log::debug!("tie across measure boundary at onset {}", event.onset);
                self.patch_last_note(self.measure_ticks);
                self.out.push(Event::tie(self.measure_ticks));
                self.out.push(Event::note(0, pitch, event.onset, velocity));
            }
            _ => {
                log::debug!("rest carried into new measure, {} ticks", event.onset);
                self.out.push(Event::rest(0, event.onset));
            }
        }
        // The tie marker (or nothing) is credited to the measure being
        // closed; the carried event opens the new one.
        self.groups.push(self.group_len + 1);
        self.group_len = 1;
    }

    /// Back-patch the most recent note so it ends at `boundary`.
    /// Rests and tie markers keep the length they were created with.
    fn patch_last_note(&mut self, boundary: Tick) {
        if let Some(Event { onset, kind: EventKind::Note { duration, .. } }) = self.out.last_mut() {
            if *duration > 0 {
                *duration = boundary - *onset;
            }
        }
    }

    fn close_group(&mut self) {
        self.groups.push(self.group_len);
        self.group_len = 0;
    }

    /// End of input: the final note fills out its measure and the open
    /// group is closed.
    fn finish(mut self) -> (Vec<Event>, GroupTable) {
        if !self.out.is_empty() {
            self.patch_last_note(self.measure_ticks);
            self.groups.push(self.group_len);
        }
        (self.out, self.groups)
    }
}
