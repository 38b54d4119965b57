//! Store collaborator boundary and SQLite implementation.

/// SQLite-backed compare store.
pub mod sqlite;

use serde::{Deserialize, Serialize};

use crate::{
    core::range::{AlignmentWindow, RangeError},
    metrics::CompareStats,
    provider::ProviderError,
    types::{ComparedItemId, RefId, TourId, Year},
};

/// Errors from the store collaborator.
#[derive(Debug)]
pub enum PersistError {
    /// SQLite failure.
    Sqlite(rusqlite::Error),
    /// Stats payload (de)serialization failure.
    Serde(serde_json::Error),
    /// No stored comparison for the given row id.
    MissingCompared(ComparedItemId),
    /// Any other persistence failure.
    Message(String),
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

impl From<ProviderError> for PersistError {
    fn from(value: ProviderError) -> Self {
        Self::Message(format!("provider error: {value:?}"))
    }
}

impl From<RangeError> for PersistError {
    fn from(value: RangeError) -> Self {
        Self::Message(format!("invalid stored range: {value:?}"))
    }
}

/// Store collaborator result alias.
pub type PersistResult<T> = Result<T, PersistError>;

/// Stored reference tour row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefTourRow {
    /// Reference identifier.
    pub ref_id: RefId,
    /// Tour the reference range was taken from.
    pub tour_id: TourId,
    /// Reference tour title.
    pub title: String,
    /// First sample index of the reference range.
    pub start_index: usize,
    /// Last sample index of the reference range.
    pub end_index: usize,
}

/// Insert payload for a new stored comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComparedTour {
    /// Reference tour identifier.
    pub ref_id: RefId,
    /// Compared tour identifier.
    pub tour_id: TourId,
    /// Calendar year of the compared tour.
    pub year: Year,
    /// Day of year of the compared tour, 1 based.
    pub doy: u16,
    /// Persisted alignment window.
    pub window: AlignmentWindow,
    /// Minimum alignment difference from the comparison algorithm.
    pub min_altitude_diff: f32,
    /// Statistics computed for the persisted window.
    pub stats: CompareStats,
}

/// Stored comparison row.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredComparedTour {
    /// Stored row identifier.
    pub item_id: ComparedItemId,
    /// Reference tour identifier.
    pub ref_id: RefId,
    /// Compared tour identifier.
    pub tour_id: TourId,
    /// Calendar year of the compared tour.
    pub year: Year,
    /// Day of year of the compared tour, 1 based.
    pub doy: u16,
    /// Persisted alignment window.
    pub window: AlignmentWindow,
    /// Minimum alignment difference from the comparison algorithm.
    pub min_altitude_diff: f32,
    /// Statistics persisted with the window.
    pub stats: CompareStats,
}

/// Transactional persistence of compared tours.
///
/// Every operation is a single transaction that succeeds or fails
/// atomically; the core never retries, queues or batches calls.
pub trait CompareStore {
    /// Inserts a new comparison and returns the generated row id.
    fn insert_compared(&mut self, row: &NewComparedTour) -> PersistResult<ComparedItemId>;

    /// Updates window and statistics of a stored comparison.
    fn update_compared(
        &mut self,
        item_id: ComparedItemId,
        window: AlignmentWindow,
        stats: &CompareStats,
    ) -> PersistResult<()>;

    /// Deletes a stored comparison, returning whether a row was removed.
    fn delete_compared(&mut self, item_id: ComparedItemId) -> PersistResult<bool>;

    /// Loads all reference tours.
    fn fetch_ref_tours(&self) -> PersistResult<Vec<RefTourRow>>;

    /// Loads all stored comparisons of one reference tour.
    fn fetch_compared(&self, ref_id: RefId) -> PersistResult<Vec<StoredComparedTour>>;
}
