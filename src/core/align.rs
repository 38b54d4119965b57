//! Resamples a compared tour's series onto its reference tour's distance axis.

use crate::core::range::AlignmentWindow;

/// Errors for invalid aligner input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignError {
    /// A distance series contains no samples.
    EmptySeries,
    /// Reference elevation and distance series differ in length.
    LengthMismatch {
        /// Reference elevation sample count.
        elevation: usize,
        /// Reference distance sample count.
        distance: usize,
    },
    /// A distance series decreases at `index`.
    NonMonotonic {
        /// Index of the first decreasing sample.
        index: usize,
    },
    /// Reference start index is outside the reference series.
    StartIndexOutOfBounds {
        /// Requested start index.
        start_index: usize,
        /// Reference sample count.
        sample_count: usize,
    },
    /// The compared window is outside the compared distance series.
    WindowOutOfBounds {
        /// Last window index.
        last: usize,
        /// Compared sample count.
        sample_count: usize,
    },
}

/// Resamples the reference tour's elevation onto the compared tour's
/// distance coordinate.
///
/// Walks the compared window once while a forward-only reference cursor
/// tracks the matching distance delta: the cursor rests on the last
/// reference sample whose delta does not exceed the compared sample's
/// delta, and clamps at the reference end when the reference series is
/// shorter than needed.
///
/// The returned vector is sized like `comp_distance`; only entries inside
/// `window` carry meaningful values, the rest stay zero. Either a fully
/// valid output or an error is returned, never partial output.
pub fn align_to_reference(
    comp_distance: &[f64],
    window: AlignmentWindow,
    ref_elevation: &[f64],
    ref_distance: &[f64],
    ref_start_index: usize,
) -> Result<Vec<f64>, AlignError> {
    if comp_distance.is_empty() || ref_distance.is_empty() {
        return Err(AlignError::EmptySeries);
    }
    if ref_elevation.len() != ref_distance.len() {
        return Err(AlignError::LengthMismatch {
            elevation: ref_elevation.len(),
            distance: ref_distance.len(),
        });
    }
    check_monotonic(comp_distance)?;
    check_monotonic(ref_distance)?;
    if ref_start_index >= ref_distance.len() {
        return Err(AlignError::StartIndexOutOfBounds {
            start_index: ref_start_index,
            sample_count: ref_distance.len(),
        });
    }
    if window.last() >= comp_distance.len() {
        return Err(AlignError::WindowOutOfBounds {
            last: window.last(),
            sample_count: comp_distance.len(),
        });
    }

    let num_ref = ref_distance.len();
    let mut out = vec![0.0; comp_distance.len()];

    let comp_start = comp_distance[window.first()];
    let ref_start = ref_distance[ref_start_index];
    let mut ref_index = ref_start_index;

    for comp_index in window.first()..=window.last() {
        let comp_diff = comp_distance[comp_index] - comp_start;

        while ref_index + 1 < num_ref && ref_distance[ref_index + 1] - ref_start <= comp_diff {
            ref_index += 1;
        }

        out[comp_index] = ref_elevation[ref_index];
    }

    Ok(out)
}

fn check_monotonic(series: &[f64]) -> Result<(), AlignError> {
    for index in 1..series.len() {
        if series[index] < series[index - 1] {
            return Err(AlignError::NonMonotonic { index });
        }
    }
    Ok(())
}
