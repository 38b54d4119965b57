//! External tour-data provider boundary.

use serde::{Deserialize, Serialize};

use crate::types::{TourId, Year};

/// Errors from the external tour-data provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// No tour exists for the requested id.
    MissingTour(TourId),
    /// Any other provider failure.
    Message(String),
}

/// Per-sample series of one tour, immutable once loaded.
///
/// All series have the same length; distance values are monotonically
/// non-decreasing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TourSamples {
    /// Distance values in meters.
    pub distance: Vec<f64>,
    /// Elevation values in meters.
    pub elevation: Vec<f64>,
    /// Heart-rate values in bpm.
    pub pulse: Vec<f64>,
    /// Recording time values in seconds.
    pub time: Vec<u32>,
}

/// Descriptive attributes of one tour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourMetadata {
    /// Tour identifier.
    pub tour_id: TourId,
    /// Calendar year of the tour start.
    pub year: Year,
    /// Day of year of the tour start, 1 based.
    pub doy: u16,
    /// Tour title.
    pub title: String,
    /// Tour tags.
    pub tags: Vec<String>,
    /// Tour type name.
    pub tour_type: String,
    /// Number of samples in the tour's series.
    pub sample_count: usize,
}

/// Synchronous access to tour samples and metadata.
pub trait TourDataProvider {
    /// Loads the sample series of `tour_id`.
    fn samples(&self, tour_id: TourId) -> Result<TourSamples, ProviderError>;

    /// Loads descriptive attributes of `tour_id`.
    fn metadata(&self, tour_id: TourId) -> Result<TourMetadata, ProviderError>;
}
