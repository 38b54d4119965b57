//! Result tree model with filtering, sorting and navigation.

use hashbrown::HashMap;

use crate::{
    context::{CompareContext, RefTourConfig},
    core::range::AlignmentWindow,
    persist::{CompareStore, PersistError, PersistResult},
    provider::{TourDataProvider, TourMetadata},
    tree::node::{ComparedTourItem, ComparisonOutcome, RefTourNode},
    types::{Direction, FilterMode, RefId, TourId, TreeLayout},
};

/// Owns the reference tour roots, the visibility filter and the cached
/// navigation order.
///
/// Invariant: at most one in-memory item exists per `(ref_id, tour_id)`
/// pair at any time.
#[derive(Debug, Default)]
pub struct ResultTreeModel {
    layout: TreeLayout,
    filter: FilterMode,
    roots: Vec<RefTourNode>,
    sorted_order: HashMap<RefId, Vec<TourId>>,
}

impl ResultTreeModel {
    /// Creates an empty model with `layout`.
    pub fn new(layout: TreeLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Loads the reference tour roots and refreshes the context cache.
    ///
    /// Children stay unfetched until requested. On failure the model and
    /// the context keep their previous state.
    pub fn load(
        &mut self,
        store: &dyn CompareStore,
        context: &mut CompareContext,
    ) -> PersistResult<()> {
        let rows = store.fetch_ref_tours()?;

        let mut roots = Vec::with_capacity(rows.len());
        let mut configs = Vec::with_capacity(rows.len());
        for row in rows {
            let window = AlignmentWindow::new(row.start_index, row.end_index)?;
            configs.push(RefTourConfig {
                ref_id: row.ref_id,
                tour_id: row.tour_id,
                title: row.title.clone(),
                window,
            });
            roots.push(RefTourNode::new(row.ref_id, row.tour_id, row.title));
        }

        context.clear();
        for config in configs {
            context.put(config);
        }
        self.roots = roots;
        self.sorted_order.clear();
        Ok(())
    }

    /// Discards all fetched children and reloads the roots from the store.
    ///
    /// Any previously returned item reference is stale after a successful
    /// reload; on failure the pre-reload state is kept.
    pub fn reload(
        &mut self,
        store: &dyn CompareStore,
        context: &mut CompareContext,
    ) -> PersistResult<()> {
        self.load(store, context)
    }

    /// Child layout used below reference tours.
    pub fn layout(&self) -> TreeLayout {
        self.layout
    }

    /// Current visibility filter.
    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    /// Sets the visibility filter.
    ///
    /// Pure state change: already fetched children are kept, only their
    /// visibility to callers changes.
    pub fn set_filter(&mut self, filter: FilterMode) {
        self.filter = filter;
    }

    /// Reference tour roots.
    pub fn ref_tours(&self) -> &[RefTourNode] {
        &self.roots
    }

    /// Fetches the children of `ref_id`; repeated calls return the cached
    /// set until the model is reloaded.
    pub fn fetch_children(
        &mut self,
        ref_id: RefId,
        store: &dyn CompareStore,
        provider: &dyn TourDataProvider,
    ) -> PersistResult<()> {
        let layout = self.layout;
        let Some(root) = self.roots.iter_mut().find(|r| r.ref_id == ref_id) else {
            return Err(PersistError::Message(format!(
                "unknown reference tour: {ref_id}"
            )));
        };

        let was_fetched = root.is_fetched();
        root.fetch_children(store, provider, layout)?;
        if !was_fetched {
            self.refresh_sorted_order(ref_id);
        }
        Ok(())
    }

    /// Inserts an unsaved comparison outcome below its reference tour.
    ///
    /// Stored children are fetched first so they are not shadowed. Returns
    /// `false` when an item for the same `(ref_id, tour_id)` pair already
    /// exists.
    pub fn add_comparison(
        &mut self,
        ref_id: RefId,
        metadata: &TourMetadata,
        outcome: ComparisonOutcome,
        store: &dyn CompareStore,
        provider: &dyn TourDataProvider,
    ) -> PersistResult<bool> {
        self.fetch_children(ref_id, store, provider)?;

        let layout = self.layout;
        let Some(root) = self.roots.iter_mut().find(|r| r.ref_id == ref_id) else {
            return Err(PersistError::Message(format!(
                "unknown reference tour: {ref_id}"
            )));
        };

        if root
            .compared_tours()
            .iter()
            .any(|item| item.tour_id() == metadata.tour_id)
        {
            return Ok(false);
        }

        let item = ComparedTourItem::from_comparison(ref_id, metadata, outcome)?;
        root.push_item(item, layout);
        self.refresh_sorted_order(ref_id);
        Ok(true)
    }

    /// Visible compared tours of `ref_id` in navigation order.
    ///
    /// Ordered ascending by minimum alignment difference, ties keep their
    /// insertion order. The order is cached per reference tour and only
    /// recomputed when children are (re)fetched; the visibility filter is
    /// applied on every call.
    pub fn sorted_children_of(&self, ref_id: RefId) -> Vec<&ComparedTourItem> {
        let Some(order) = self.sorted_order.get(&ref_id) else {
            return Vec::new();
        };
        let Some(root) = self.roots.iter().find(|r| r.ref_id == ref_id) else {
            return Vec::new();
        };

        let items: HashMap<TourId, &ComparedTourItem> = root
            .compared_tours()
            .into_iter()
            .map(|item| (item.tour_id(), item))
            .collect();

        order
            .iter()
            .filter_map(|tour_id| items.get(tour_id).copied())
            .filter(|item| self.is_visible(item))
            .collect()
    }

    /// Returns the neighbour of `current` in the visible sorted sibling
    /// list, wrapping around at both ends.
    ///
    /// Returns `None` when the visible list holds fewer than two entries or
    /// `current` is not part of it.
    pub fn navigate(
        &self,
        current: (RefId, TourId),
        direction: Direction,
    ) -> Option<&ComparedTourItem> {
        let (ref_id, tour_id) = current;
        let siblings = self.sorted_children_of(ref_id);
        if siblings.len() < 2 {
            return None;
        }

        let index = siblings.iter().position(|item| item.tour_id() == tour_id)?;
        let next = match direction {
            Direction::Next => (index + 1) % siblings.len(),
            Direction::Previous => (index + siblings.len() - 1) % siblings.len(),
        };
        Some(siblings[next])
    }

    /// Compared tour for an identity pair.
    pub fn item(&self, ref_id: RefId, tour_id: TourId) -> Option<&ComparedTourItem> {
        self.roots
            .iter()
            .find(|r| r.ref_id == ref_id)?
            .compared_tours()
            .into_iter()
            .find(|item| item.tour_id() == tour_id)
    }

    /// Mutable compared tour for an identity pair, for range edits and
    /// persistence calls.
    pub fn item_mut(&mut self, ref_id: RefId, tour_id: TourId) -> Option<&mut ComparedTourItem> {
        self.roots
            .iter_mut()
            .find(|r| r.ref_id == ref_id)?
            .compared_tour_mut(tour_id)
    }

    fn is_visible(&self, item: &ComparedTourItem) -> bool {
        match self.filter {
            FilterMode::AllDisplayed => true,
            FilterMode::SavedOnly => item.is_saved(),
            FilterMode::UnsavedOnly => !item.is_saved(),
        }
    }

    fn refresh_sorted_order(&mut self, ref_id: RefId) {
        let Some(root) = self.roots.iter().find(|r| r.ref_id == ref_id) else {
            return;
        };

        let mut keyed: Vec<(f32, TourId)> = root
            .compared_tours()
            .into_iter()
            .map(|item| (item.min_altitude_diff(), item.tour_id()))
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

        self.sorted_order
            .insert(ref_id, keyed.into_iter().map(|(_, id)| id).collect());
    }
}
