//! Comparison result tree.

/// Filtering, sorting and navigation over the tree.
pub mod model;
/// Node kinds and the compared tour item.
pub mod node;
