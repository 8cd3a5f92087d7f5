//! Meter configuration
//!
//! A run is parameterized by one meter: how many ticks make a quarter note
//! and how many beats make a measure. The grid is fixed per run; dynamic
//! time-signature changes are out of scope.

use serde::{Deserialize, Serialize};

use crate::models::event::Tick;

/// Tick resolution of a quarter note. 12 divides duplets and triplets evenly.
pub const TICKS_PER_QUARTER: Tick = 12;

/// Beats-per-measure plus tick resolution for one collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meter {
    pub beats_per_measure: Tick,
    pub ticks_per_quarter: Tick,
}

impl Meter {
    /// Meter with `beats` beats per measure at the default tick resolution.
    pub fn with_beats(beats: Tick) -> Meter {
        Meter { beats_per_measure: beats, ticks_per_quarter: TICKS_PER_QUARTER }
    }

    /// Length of one measure in ticks.
    pub fn measure_ticks(&self) -> Tick {
        self.ticks_per_quarter * self.beats_per_measure
    }
}

impl Default for Meter {
    fn default() -> Meter {
        Meter::with_beats(4)
    }
}
