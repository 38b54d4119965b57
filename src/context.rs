//! Explicit reference-tour configuration context.

use hashbrown::HashMap;

use crate::{
    core::range::AlignmentWindow,
    types::{RefId, TourId},
};

/// Configuration of one reference tour.
#[derive(Debug, Clone, PartialEq)]
pub struct RefTourConfig {
    /// Reference identifier.
    pub ref_id: RefId,
    /// Tour the reference range was taken from.
    pub tour_id: TourId,
    /// Reference tour title.
    pub title: String,
    /// Sample range of the reference within its tour.
    pub window: AlignmentWindow,
}

/// Key-value cache of reference-tour configurations.
///
/// Passed explicitly to the components that need reference configuration
/// and invalidated when a reference tour changes.
#[derive(Debug, Default)]
pub struct CompareContext {
    configs: HashMap<RefId, RefTourConfig>,
}

impl CompareContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached configuration for `ref_id`.
    pub fn config(&self, ref_id: RefId) -> Option<&RefTourConfig> {
        self.configs.get(&ref_id)
    }

    /// Caches `config`, replacing a previous entry for the same reference.
    pub fn put(&mut self, config: RefTourConfig) {
        self.configs.insert(config.ref_id, config);
    }

    /// Drops the cached configuration for `ref_id`.
    pub fn invalidate(&mut self, ref_id: RefId) {
        self.configs.remove(&ref_id);
    }

    /// Drops all cached configurations.
    pub fn clear(&mut self) {
        self.configs.clear();
    }

    /// Number of cached configurations.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// True when no configuration is cached.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
