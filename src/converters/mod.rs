//! Format converters
//!
//! This module contains converters between external formats and the
//! collection format.

pub mod midi_to_coll;

// Re-export for convenience
pub use midi_to_coll::{import_dir, import_file, ImportError, ImportOutcome};
