//! Reference-tour comparison and alignment core.
//!
//! Resamples compared tours onto a reference tour's distance axis, tracks
//! the computed/saved/moved range of every compared tour and maintains a
//! lazily fetched, filterable result tree with a multi-year statistics
//! timeline.
//!
//! # Examples
//!
//! Aligning a compared tour and tracking its range:
//! ```
//! use tourcompare::core::{
//!     align::align_to_reference,
//!     range::{AlignmentWindow, RangeState},
//! };
//!
//! let comp_distance = [0.0, 5.0, 15.0, 25.0, 35.0];
//! let ref_distance = [0.0, 10.0, 20.0, 30.0];
//! let ref_elevation = [100.0, 110.0, 130.0, 125.0];
//!
//! let window = AlignmentWindow::new(0, 4).expect("window");
//! let aligned = align_to_reference(&comp_distance, window, &ref_elevation, &ref_distance, 0)
//!     .expect("align");
//! assert_eq!(aligned, vec![100.0, 100.0, 110.0, 130.0, 125.0]);
//!
//! let mut range = RangeState::new(window, comp_distance.len()).expect("range");
//! assert!(!range.is_dirty());
//! range
//!     .apply_user_move(AlignmentWindow::new(1, 4).expect("window"))
//!     .expect("move");
//! assert!(range.is_dirty());
//! ```
//!
//! Loading the result tree from a SQLite store:
//! ```no_run
//! use tourcompare::{
//!     context::CompareContext,
//!     persist::sqlite::SqliteCompareStore,
//!     tree::model::ResultTreeModel,
//!     types::TreeLayout,
//! };
//!
//! let store = SqliteCompareStore::open("compare.db").expect("open store");
//! let mut context = CompareContext::new();
//! let mut model = ResultTreeModel::new(TreeLayout::Flat);
//! model.load(&store, &mut context).expect("load");
//! ```
#![deny(missing_docs)]

/// Explicit reference-tour configuration context.
pub mod context;
/// Alignment and range bookkeeping primitives.
pub mod core;
/// Event payloads produced at the core's boundary.
pub mod events;
/// Statistics types and the metric computation boundary.
pub mod metrics;
/// Store collaborator boundary and SQLite implementation.
pub mod persist;
/// External tour-data provider boundary.
pub mod provider;
/// Timeline bucketing and min/max synchronization.
pub mod timeline;
/// Comparison result tree nodes and model.
pub mod tree;
/// Shared identifiers and enums.
pub mod types;
