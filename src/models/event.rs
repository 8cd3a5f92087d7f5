//! Core event types for collection files
//!
//! A collection is a flat list of events, one voice, spanning consecutive
//! measures. The wire format encodes the note/rest/tie trichotomy through
//! sign-and-zero conventions on the duration field; in memory the three
//! cases are a tagged variant so boundary logic can match exhaustively.

use serde::{Deserialize, Serialize};

/// Smallest time unit. Measure length = ticks-per-quarter × beats-per-measure.
pub type Tick = i32;

/// The three kinds of record a collection line can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A sounding note. `pitch` 0 means non-pitched.
    Note { pitch: i32, duration: Tick, velocity: i32 },
    /// Silence of `length` ticks. Encoded on the wire as a negative duration.
    Rest { length: Tick },
    /// Zero-length placeholder: the next event's pitch continues across the
    /// measure boundary instead of re-attacking.
    Tie,
}

/// One event of a collection: an onset within its measure plus the record kind.
///
/// Events carry no index. The line index is derived from position when a
/// collection is rendered, so synthetic insertions can never leave gaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Tick position within the event's measure, `0..measure_ticks`
    /// (tie markers sit at exactly `measure_ticks`).
    pub onset: Tick,
    pub kind: EventKind,
}

/// An event paired with the index its source line declared.
///
/// Parsed collections keep the file's own indices so the tidy-up engine can
/// honor its `start_index` boundary and validate ordering; they are not an
/// authoritative key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexedEvent {
    pub index: usize,
    pub event: Event,
}

impl Event {
    pub fn note(onset: Tick, pitch: i32, duration: Tick, velocity: i32) -> Event {
        Event { onset, kind: EventKind::Note { pitch, duration, velocity } }
    }

    pub fn rest(onset: Tick, length: Tick) -> Event {
        Event { onset, kind: EventKind::Rest { length } }
    }

    pub fn tie(onset: Tick) -> Event {
        Event { onset, kind: EventKind::Tie }
    }

    /// Classify raw wire fields into an event.
    ///
    /// Total over all integer inputs: a negative duration is a rest, a zero
    /// duration with pitch 0 is a tie marker, and everything else is kept as
    /// a note (including non-pitched notes with pitch 0).
    pub fn from_fields(onset: Tick, pitch: i32, duration: Tick, velocity: i32) -> Event {
        if duration < 0 {
            Event::rest(onset, -duration)
        } else if duration == 0 && pitch == 0 {
            Event::tie(onset)
        } else {
            Event::note(onset, pitch, duration, velocity)
        }
    }

    /// Wire value of the pitch field.
    pub fn pitch_field(&self) -> i32 {
        match self.kind {
            EventKind::Note { pitch, .. } => pitch,
            EventKind::Rest { .. } | EventKind::Tie => 0,
        }
    }

    /// Wire value of the duration field (rests encode as negative lengths).
    pub fn duration_field(&self) -> Tick {
        match self.kind {
            EventKind::Note { duration, .. } => duration,
            EventKind::Rest { length } => -length,
            EventKind::Tie => 0,
        }
    }

    /// Wire value of the velocity field.
    pub fn velocity_field(&self) -> i32 {
        match self.kind {
            EventKind::Note { velocity, .. } => velocity,
            EventKind::Rest { .. } | EventKind::Tie => 0,
        }
    }

    /// Ticks this event occupies inside its measure. Tie markers take none.
    pub fn measure_span(&self) -> Tick {
        match self.kind {
            EventKind::Note { duration, .. } => duration,
            EventKind::Rest { length } => length,
            EventKind::Tie => 0,
        }
    }
}
