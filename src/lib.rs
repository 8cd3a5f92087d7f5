//! Measure tidy-up engine and transforms for monophonic collection files
//!
//! A collection is a flat, line-oriented list of note events for one voice.
//! The tidy-up engine re-derives measure-aligned durations from raw onsets,
//! synthesizing ties and rests at measure boundaries; the surrounding tools
//! import MIDI into the format, grow collections by repetition and
//! sequencing, and train Markov transition tables from them.

pub mod coll;
pub mod converters;
pub mod markov;
pub mod models;
pub mod tidy;
pub mod transforms;

// Re-export commonly used types
pub use models::{Event, EventKind, GroupTable, IndexedEvent, Meter, Tick, TICKS_PER_QUARTER};
pub use tidy::{tidy_file, tidy_up, TidyOutcome};
