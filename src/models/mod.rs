//! Data model for collections
//!
//! This module contains the event types, meter configuration, and
//! per-measure group counts shared by the codec, the tidy-up engine,
//! and the transforms.

pub mod event;
pub mod groups;
pub mod meter;

// Re-export commonly used types
pub use event::{Event, EventKind, IndexedEvent, Tick};
pub use groups::GroupTable;
pub use meter::{Meter, TICKS_PER_QUARTER};
