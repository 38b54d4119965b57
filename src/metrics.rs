//! Statistics types and the metric computation boundary.

use serde::{Deserialize, Serialize};

use crate::{core::range::AlignmentWindow, provider::TourSamples};

/// Derived statistics of a compared tour's selected range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CompareStats {
    /// Average pulse in bpm.
    pub avg_pulse: f32,
    /// Maximum pulse in bpm.
    pub max_pulse: f32,
    /// Average altimeter (VAM) in m/h.
    pub avg_altimeter: f32,
    /// Average speed in km/h.
    pub avg_speed: f32,
    /// Average pace in min/km.
    pub avg_pace: f32,
    /// Elevation gain in meters.
    pub elevation_gain: f32,
    /// Elevation loss in meters.
    pub elevation_loss: f32,
    /// Elapsed time in seconds.
    pub elapsed_time: u32,
    /// Moving time in seconds.
    pub moving_time: u32,
}

/// Computes range statistics from tour samples.
///
/// The comparison core calls this at persist and display-refresh time; the
/// numeric formulas live outside the core.
pub trait TourMetrics {
    /// Computes statistics for `window` of `samples`.
    fn compute(&self, samples: &TourSamples, window: AlignmentWindow) -> CompareStats;
}
