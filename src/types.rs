//! Shared identifiers and core enums.

use serde::{Deserialize, Serialize};

/// Reference tour identifier.
pub type RefId = i64;
/// Tour identifier.
pub type TourId = i64;
/// Storage row identifier of a persisted comparison.
pub type ComparedItemId = i64;
/// Calendar year.
pub type Year = i32;

/// Sentinel id of a comparison that has never been persisted.
pub const UNSAVED_ITEM_ID: ComparedItemId = -1;

/// Three-way visibility filter for compared tours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Show saved and unsaved compared tours.
    #[default]
    AllDisplayed,
    /// Show only persisted compared tours.
    SavedOnly,
    /// Show only compared tours that are not persisted.
    UnsavedOnly,
}

/// Navigation direction within the sorted sibling list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Move to the next sibling, wrapping to the first.
    Next,
    /// Move to the previous sibling, wrapping to the last.
    Previous,
}

/// Child layout below a reference tour node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeLayout {
    /// Compared tours directly below the reference tour.
    #[default]
    Flat,
    /// Compared tours grouped into calendar-year buckets.
    YearBuckets,
}

/// Metrics tracked by the multi-year timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    /// Average speed.
    AvgSpeed,
    /// Average pace.
    AvgPace,
    /// Average pulse.
    AvgPulse,
    /// Maximum pulse.
    MaxPulse,
    /// Average altimeter (VAM).
    AvgAltimeter,
}

impl MetricKind {
    /// All timeline metrics.
    pub const ALL: [MetricKind; 5] = [
        Self::AvgSpeed,
        Self::AvgPace,
        Self::AvgPulse,
        Self::MaxPulse,
        Self::AvgAltimeter,
    ];
}
