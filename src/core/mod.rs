//! Alignment and range bookkeeping primitives.

/// Distance-axis resampling of a compared tour onto its reference tour.
pub mod align;
/// Alignment window and the computed/saved/moved range state.
pub mod range;
