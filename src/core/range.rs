//! Alignment window and the computed/saved/moved range state machine.

use serde::{Deserialize, Serialize};

/// Errors for invalid alignment windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// Window start is greater than window end.
    Inverted {
        /// First sample index.
        first: usize,
        /// Last sample index.
        last: usize,
    },
    /// Window end is outside the compared tour's sample array.
    OutOfBounds {
        /// Last sample index.
        last: usize,
        /// Number of samples in the compared tour.
        sample_count: usize,
    },
}

/// Inclusive `(first, last)` sample-index range of a compared tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentWindow {
    first: usize,
    last: usize,
}

impl AlignmentWindow {
    /// Creates a window, rejecting `first > last`.
    pub fn new(first: usize, last: usize) -> Result<Self, RangeError> {
        if first > last {
            return Err(RangeError::Inverted { first, last });
        }
        Ok(Self { first, last })
    }

    /// First sample index.
    pub fn first(&self) -> usize {
        self.first
    }

    /// Last sample index, inclusive.
    pub fn last(&self) -> usize {
        self.last
    }

    /// Number of samples covered by the window.
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// A window always covers at least one sample.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub(crate) fn check_bounds(&self, sample_count: usize) -> Result<(), RangeError> {
        if self.last >= sample_count {
            return Err(RangeError::OutOfBounds {
                last: self.last,
                sample_count,
            });
        }
        Ok(())
    }
}

/// Single source of truth for a compared tour's selected range.
///
/// Tracks three competing windows: the range produced by the comparison
/// algorithm, the range persisted in storage and the range currently
/// displayed or edited. Dirtiness is always derived, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeState {
    sample_count: usize,
    computed: AlignmentWindow,
    saved: Option<AlignmentWindow>,
    moved: AlignmentWindow,
}

impl RangeState {
    /// Creates the state for a freshly computed comparison.
    pub fn new(computed: AlignmentWindow, sample_count: usize) -> Result<Self, RangeError> {
        computed.check_bounds(sample_count)?;
        Ok(Self {
            sample_count,
            computed,
            saved: None,
            moved: computed,
        })
    }

    /// Creates the state for a comparison reloaded from storage.
    pub fn from_persisted(
        saved: AlignmentWindow,
        computed: AlignmentWindow,
        sample_count: usize,
    ) -> Result<Self, RangeError> {
        saved.check_bounds(sample_count)?;
        computed.check_bounds(sample_count)?;
        Ok(Self {
            sample_count,
            computed,
            saved: Some(saved),
            moved: saved,
        })
    }

    /// Applies an interactive range move.
    pub fn apply_user_move(&mut self, moved: AlignmentWindow) -> Result<(), RangeError> {
        moved.check_bounds(self.sample_count)?;
        self.moved = moved;
        Ok(())
    }

    /// Records a successful persist of `window`.
    pub fn mark_saved(&mut self, window: AlignmentWindow) -> Result<(), RangeError> {
        window.check_bounds(self.sample_count)?;
        self.saved = Some(window);
        self.moved = window;
        Ok(())
    }

    /// Reverts the displayed range to the saved range, or to the computed
    /// range when the comparison was never persisted.
    pub fn undo(&mut self) {
        self.moved = self.saved.unwrap_or(self.computed);
    }

    /// Resets to unsaved-clean after the stored row was deleted externally.
    ///
    /// The computed window is kept unchanged.
    pub fn reset(&mut self) {
        self.saved = None;
        self.moved = self.computed;
    }

    /// True when the displayed range differs from the persisted range, or
    /// from the computed range while unsaved.
    pub fn is_dirty(&self) -> bool {
        self.moved != self.saved.unwrap_or(self.computed)
    }

    /// True when a stored row exists for this comparison.
    pub fn is_persisted(&self) -> bool {
        self.saved.is_some()
    }

    /// Algorithm-computed window.
    pub fn computed(&self) -> AlignmentWindow {
        self.computed
    }

    /// Currently persisted window, if any.
    pub fn saved(&self) -> Option<AlignmentWindow> {
        self.saved
    }

    /// Currently displayed window.
    pub fn moved(&self) -> AlignmentWindow {
        self.moved
    }

    /// Number of samples in the compared tour.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }
}
