//! Notifications produced at the comparison core's boundary.

use crate::{
    core::range::AlignmentWindow,
    metrics::CompareStats,
    types::{ComparedItemId, RefId, TourId},
};

/// Events emitted by save, removal and range-move operations.
///
/// Each event carries the stored row id (`-1` while unsaved), the identity
/// pair of the comparison and the window/statistics at the time the event
/// was created. Dispatch to presentation layers is the caller's concern.
#[derive(Debug, Clone, PartialEq)]
pub enum CompareEvent {
    /// A comparison was inserted or updated in storage.
    CompareSaved {
        /// Stored row id.
        item_id: ComparedItemId,
        /// Reference tour identifier.
        ref_id: RefId,
        /// Compared tour identifier.
        tour_id: TourId,
        /// Persisted window.
        window: AlignmentWindow,
        /// Statistics persisted with the window.
        stats: CompareStats,
    },
    /// A stored comparison was deleted.
    CompareRemoved {
        /// Row id the comparison had before removal.
        item_id: ComparedItemId,
        /// Reference tour identifier.
        ref_id: RefId,
        /// Compared tour identifier.
        tour_id: TourId,
        /// Displayed window after the reset.
        window: AlignmentWindow,
        /// Last known statistics.
        stats: CompareStats,
    },
    /// The displayed range of a comparison was moved.
    CompareRangeChanged {
        /// Stored row id, `-1` while unsaved.
        item_id: ComparedItemId,
        /// Reference tour identifier.
        ref_id: RefId,
        /// Compared tour identifier.
        tour_id: TourId,
        /// Displayed window after the move.
        window: AlignmentWindow,
        /// Last known statistics.
        stats: CompareStats,
    },
}
