//! Tree nodes of the comparison result hierarchy.

use hashbrown::HashSet;

use crate::{
    core::range::{AlignmentWindow, RangeError, RangeState},
    events::CompareEvent,
    metrics::{CompareStats, TourMetrics},
    persist::{CompareStore, NewComparedTour, PersistError, PersistResult, StoredComparedTour},
    provider::{ProviderError, TourDataProvider, TourMetadata},
    types::{ComparedItemId, RefId, TourId, TreeLayout, UNSAVED_ITEM_ID, Year},
};

/// Output of the external comparison algorithm for one candidate tour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonOutcome {
    /// Algorithm-computed alignment window.
    pub window: AlignmentWindow,
    /// Minimum alignment difference of the best match.
    pub min_altitude_diff: f32,
}

/// One compared tour in the result tree.
///
/// Owns the range state and derived statistics; identity is the
/// `(ref_id, tour_id)` pair regardless of save status, so cross-view
/// selections can find the same compared tour even when its save status
/// changed concurrently.
#[derive(Debug, Clone)]
pub struct ComparedTourItem {
    item_id: ComparedItemId,
    ref_id: RefId,
    tour_id: TourId,
    year: Year,
    doy: u16,
    min_altitude_diff: f32,
    range: RangeState,
    stats: CompareStats,
}

impl PartialEq for ComparedTourItem {
    fn eq(&self, other: &Self) -> bool {
        self.ref_id == other.ref_id && self.tour_id == other.tour_id
    }
}

impl Eq for ComparedTourItem {}

impl ComparedTourItem {
    /// Creates an unsaved item from a comparison outcome.
    pub fn from_comparison(
        ref_id: RefId,
        metadata: &TourMetadata,
        outcome: ComparisonOutcome,
    ) -> Result<Self, RangeError> {
        Ok(Self {
            item_id: UNSAVED_ITEM_ID,
            ref_id,
            tour_id: metadata.tour_id,
            year: metadata.year,
            doy: metadata.doy,
            min_altitude_diff: outcome.min_altitude_diff,
            range: RangeState::new(outcome.window, metadata.sample_count)?,
            stats: CompareStats::default(),
        })
    }

    /// Recreates a saved item from its stored row.
    ///
    /// The computed window of a reloaded comparison is unknown, the stored
    /// window doubles as both.
    pub fn from_stored(stored: &StoredComparedTour, sample_count: usize) -> Result<Self, RangeError> {
        Ok(Self {
            item_id: stored.item_id,
            ref_id: stored.ref_id,
            tour_id: stored.tour_id,
            year: stored.year,
            doy: stored.doy,
            min_altitude_diff: stored.min_altitude_diff,
            range: RangeState::from_persisted(stored.window, stored.window, sample_count)?,
            stats: stored.stats,
        })
    }

    /// Stored row id, [`UNSAVED_ITEM_ID`] while unsaved.
    pub fn item_id(&self) -> ComparedItemId {
        self.item_id
    }

    /// Reference tour identifier.
    pub fn ref_id(&self) -> RefId {
        self.ref_id
    }

    /// Compared tour identifier.
    pub fn tour_id(&self) -> TourId {
        self.tour_id
    }

    /// Calendar year of the compared tour.
    pub fn year(&self) -> Year {
        self.year
    }

    /// Day of year of the compared tour, 1 based.
    pub fn doy(&self) -> u16 {
        self.doy
    }

    /// Minimum alignment difference from the comparison algorithm.
    pub fn min_altitude_diff(&self) -> f32 {
        self.min_altitude_diff
    }

    /// Current statistics.
    pub fn stats(&self) -> CompareStats {
        self.stats
    }

    /// Range state of this comparison.
    pub fn range(&self) -> &RangeState {
        &self.range
    }

    /// True when a stored row exists for this comparison.
    pub fn is_saved(&self) -> bool {
        self.range.is_persisted()
    }

    /// True when the displayed range needs persisting.
    pub fn is_dirty(&self) -> bool {
        self.range.is_dirty()
    }

    /// Applies an interactive range move and reports it.
    pub fn move_range(&mut self, window: AlignmentWindow) -> Result<CompareEvent, RangeError> {
        self.range.apply_user_move(window)?;
        Ok(CompareEvent::CompareRangeChanged {
            item_id: self.item_id,
            ref_id: self.ref_id,
            tour_id: self.tour_id,
            window,
            stats: self.stats,
        })
    }

    /// Reverts the displayed range to the saved or computed range.
    pub fn undo_range(&mut self) -> CompareEvent {
        self.range.undo();
        CompareEvent::CompareRangeChanged {
            item_id: self.item_id,
            ref_id: self.ref_id,
            tour_id: self.tour_id,
            window: self.range.moved(),
            stats: self.stats,
        }
    }

    /// Recomputes display statistics for the current range.
    pub fn refresh_stats(
        &mut self,
        provider: &dyn TourDataProvider,
        metrics: &dyn TourMetrics,
    ) -> Result<CompareStats, ProviderError> {
        let samples = provider.samples(self.tour_id)?;
        self.stats = metrics.compute(&samples, self.range.moved());
        Ok(self.stats)
    }

    /// Persists the displayed range.
    ///
    /// Inserts a new row when unsaved, updates the stored row when saved and
    /// dirty, does nothing when saved and clean. Statistics are recomputed
    /// from the current samples before they reach the store. On failure the
    /// range state is left untouched and the error surfaces to the caller.
    pub fn persist(
        &mut self,
        store: &mut dyn CompareStore,
        provider: &dyn TourDataProvider,
        metrics: &dyn TourMetrics,
    ) -> PersistResult<Option<CompareEvent>> {
        if self.is_saved() && !self.is_dirty() {
            return Ok(None);
        }

        let window = self.range.moved();
        let samples = provider.samples(self.tour_id)?;
        let stats = metrics.compute(&samples, window);

        if self.is_saved() {
            store.update_compared(self.item_id, window, &stats)?;
        } else {
            let row = NewComparedTour {
                ref_id: self.ref_id,
                tour_id: self.tour_id,
                year: self.year,
                doy: self.doy,
                window,
                min_altitude_diff: self.min_altitude_diff,
                stats,
            };
            self.item_id = store.insert_compared(&row)?;
        }

        self.stats = stats;
        self.range.mark_saved(window)?;

        Ok(Some(CompareEvent::CompareSaved {
            item_id: self.item_id,
            ref_id: self.ref_id,
            tour_id: self.tour_id,
            window,
            stats,
        }))
    }

    /// Deletes the stored row and resets the range state.
    ///
    /// The item stays in the tree with the unsaved sentinel id; the caller
    /// decides whether to also drop it from the model. Returns `None` when
    /// the comparison was never persisted.
    pub fn remove_from_storage(
        &mut self,
        store: &mut dyn CompareStore,
    ) -> PersistResult<Option<CompareEvent>> {
        if !self.is_saved() {
            return Ok(None);
        }

        let removed_id = self.item_id;
        if !store.delete_compared(removed_id)? {
            return Err(PersistError::MissingCompared(removed_id));
        }

        self.item_id = UNSAVED_ITEM_ID;
        self.range.reset();

        Ok(Some(CompareEvent::CompareRemoved {
            item_id: removed_id,
            ref_id: self.ref_id,
            tour_id: self.tour_id,
            window: self.range.moved(),
            stats: self.stats,
        }))
    }
}

/// Closed set of node kinds in the result tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    /// Reference tour root entry.
    RefTour(RefTourNode),
    /// Year bucket below a reference tour.
    Year(YearNode),
    /// Compared tour leaf.
    ComparedTour(ComparedTourItem),
}

/// Year bucket grouping compared tours of one calendar year.
///
/// Buckets are materialized together with their parent's fetch, their
/// children are never lazy.
#[derive(Debug, Clone, PartialEq)]
pub struct YearNode {
    /// Owning reference identifier.
    pub ref_id: RefId,
    /// Calendar year of the bucket.
    pub year: Year,
    children: Vec<TreeNode>,
}

impl YearNode {
    /// Compared tours of this bucket.
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }
}

/// Reference tour entry owning lazily fetched children.
#[derive(Debug, Clone, PartialEq)]
pub struct RefTourNode {
    /// Reference identifier.
    pub ref_id: RefId,
    /// Tour the reference range was taken from.
    pub tour_id: TourId,
    /// Reference tour title.
    pub title: String,
    children: Option<Vec<TreeNode>>,
}

impl RefTourNode {
    /// Creates an unfetched reference tour node.
    pub fn new(ref_id: RefId, tour_id: TourId, title: String) -> Self {
        Self {
            ref_id,
            tour_id,
            title,
            children: None,
        }
    }

    /// True when children were fetched.
    pub fn is_fetched(&self) -> bool {
        self.children.is_some()
    }

    /// Fetched children, empty while not yet fetched.
    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Fetches child nodes from the store, resolving sample counts through
    /// the provider.
    ///
    /// Idempotent until [`Self::invalidate_children`]: repeated calls return
    /// the cached set. On failure no children are kept.
    pub fn fetch_children(
        &mut self,
        store: &dyn CompareStore,
        provider: &dyn TourDataProvider,
        layout: TreeLayout,
    ) -> PersistResult<&[TreeNode]> {
        if self.children.is_none() {
            let stored = store.fetch_compared(self.ref_id)?;

            let mut items = Vec::with_capacity(stored.len());
            let mut seen: HashSet<TourId> = HashSet::new();
            for row in &stored {
                if !seen.insert(row.tour_id) {
                    continue;
                }
                let metadata = provider.metadata(row.tour_id)?;
                items.push(ComparedTourItem::from_stored(row, metadata.sample_count)?);
            }

            self.children = Some(layout_children(self.ref_id, items, layout));
        }

        Ok(self.children.as_deref().unwrap_or(&[]))
    }

    /// Discards fetched children, the next fetch reloads them.
    pub fn invalidate_children(&mut self) {
        self.children = None;
    }

    /// Compared tours below this reference tour, year buckets flattened.
    pub fn compared_tours(&self) -> Vec<&ComparedTourItem> {
        let mut out = Vec::new();
        for child in self.children() {
            match child {
                TreeNode::ComparedTour(item) => out.push(item),
                TreeNode::Year(bucket) => {
                    for node in bucket.children() {
                        if let TreeNode::ComparedTour(item) = node {
                            out.push(item);
                        }
                    }
                }
                TreeNode::RefTour(_) => {}
            }
        }
        out
    }

    /// Mutable access to one compared tour, for range edits and persistence.
    pub fn compared_tour_mut(&mut self, tour_id: TourId) -> Option<&mut ComparedTourItem> {
        let children = self.children.as_mut()?;
        for child in children.iter_mut() {
            match child {
                TreeNode::ComparedTour(item) => {
                    if item.tour_id() == tour_id {
                        return Some(item);
                    }
                }
                TreeNode::Year(bucket) => {
                    for node in bucket.children.iter_mut() {
                        if let TreeNode::ComparedTour(item) = node {
                            if item.tour_id() == tour_id {
                                return Some(item);
                            }
                        }
                    }
                }
                TreeNode::RefTour(_) => {}
            }
        }
        None
    }

    pub(crate) fn push_item(&mut self, item: ComparedTourItem, layout: TreeLayout) {
        let ref_id = self.ref_id;
        let year = item.year();
        let children = self.children.get_or_insert_with(Vec::new);

        match layout {
            TreeLayout::Flat => children.push(TreeNode::ComparedTour(item)),
            TreeLayout::YearBuckets => {
                for child in children.iter_mut() {
                    if let TreeNode::Year(bucket) = child {
                        if bucket.year == year {
                            bucket.children.push(TreeNode::ComparedTour(item));
                            return;
                        }
                    }
                }
                children.push(TreeNode::Year(YearNode {
                    ref_id,
                    year,
                    children: vec![TreeNode::ComparedTour(item)],
                }));
            }
        }
    }
}

fn layout_children(
    ref_id: RefId,
    items: Vec<ComparedTourItem>,
    layout: TreeLayout,
) -> Vec<TreeNode> {
    match layout {
        TreeLayout::Flat => items.into_iter().map(TreeNode::ComparedTour).collect(),
        TreeLayout::YearBuckets => {
            let mut buckets: Vec<YearNode> = Vec::new();
            for item in items {
                let year = item.year();
                match buckets.iter_mut().find(|b| b.year == year) {
                    Some(bucket) => bucket.children.push(TreeNode::ComparedTour(item)),
                    None => buckets.push(YearNode {
                        ref_id,
                        year,
                        children: vec![TreeNode::ComparedTour(item)],
                    }),
                }
            }
            buckets.sort_by_key(|b| b.year);
            buckets.into_iter().map(TreeNode::Year).collect()
        }
    }
}
