use hashbrown::HashMap;

use tourcompare::{
    context::CompareContext,
    core::range::AlignmentWindow,
    metrics::{CompareStats, TourMetrics},
    persist::{CompareStore, NewComparedTour, sqlite::SqliteCompareStore},
    provider::{ProviderError, TourDataProvider, TourMetadata, TourSamples},
    tree::{
        model::ResultTreeModel,
        node::{ComparisonOutcome, TreeNode},
    },
    types::{Direction, FilterMode, TourId, TreeLayout, UNSAVED_ITEM_ID, Year},
};

struct StubProvider {
    tours: HashMap<TourId, TourMetadata>,
}

impl StubProvider {
    fn new() -> Self {
        Self {
            tours: HashMap::new(),
        }
    }

    fn with_tour(mut self, metadata: TourMetadata) -> Self {
        self.tours.insert(metadata.tour_id, metadata);
        self
    }
}

impl TourDataProvider for StubProvider {
    fn samples(&self, tour_id: TourId) -> Result<TourSamples, ProviderError> {
        let metadata = self
            .tours
            .get(&tour_id)
            .ok_or(ProviderError::MissingTour(tour_id))?;
        let n = metadata.sample_count;
        Ok(TourSamples {
            distance: (0..n).map(|i| i as f64 * 10.0).collect(),
            elevation: vec![500.0; n],
            pulse: vec![120.0; n],
            time: (0..n).map(|i| i as u32 * 10).collect(),
        })
    }

    fn metadata(&self, tour_id: TourId) -> Result<TourMetadata, ProviderError> {
        self.tours
            .get(&tour_id)
            .cloned()
            .ok_or(ProviderError::MissingTour(tour_id))
    }
}

struct StubMetrics;

impl TourMetrics for StubMetrics {
    fn compute(&self, _samples: &TourSamples, window: AlignmentWindow) -> CompareStats {
        CompareStats {
            avg_speed: window.len() as f32,
            ..CompareStats::default()
        }
    }
}

fn metadata(tour_id: TourId, year: Year, doy: u16, sample_count: usize) -> TourMetadata {
    TourMetadata {
        tour_id,
        year,
        doy,
        title: format!("tour {tour_id}"),
        tags: Vec::new(),
        tour_type: "cycling".into(),
        sample_count,
    }
}

fn outcome(first: usize, last: usize, min_diff: f32) -> ComparisonOutcome {
    ComparisonOutcome {
        window: AlignmentWindow::new(first, last).expect("window"),
        min_altitude_diff: min_diff,
    }
}

/// Store with one reference tour, model loaded on top of it.
fn loaded_model(
    store: &mut SqliteCompareStore,
    layout: TreeLayout,
) -> (ResultTreeModel, CompareContext, i64) {
    let ref_id = store
        .insert_ref_tour(1, "climb", AlignmentWindow::new(0, 99).expect("window"))
        .expect("insert ref");

    let mut context = CompareContext::new();
    let mut model = ResultTreeModel::new(layout);
    model.load(store, &mut context).expect("load");
    (model, context, ref_id)
}

#[test]
fn load_populates_roots_and_context() {
    let mut store = SqliteCompareStore::open_in_memory().expect("store");
    let (model, context, ref_id) = loaded_model(&mut store, TreeLayout::Flat);

    assert_eq!(model.ref_tours().len(), 1);
    let root = &model.ref_tours()[0];
    assert_eq!(root.ref_id, ref_id);
    assert_eq!(root.title, "climb");
    assert!(!root.is_fetched());

    let config = context.config(ref_id).expect("config");
    assert_eq!(config.tour_id, 1);
    assert_eq!(config.window, AlignmentWindow::new(0, 99).expect("window"));
}

#[test]
fn duplicate_comparison_pair_is_rejected() {
    let mut store = SqliteCompareStore::open_in_memory().expect("store");
    let provider = StubProvider::new().with_tour(metadata(10, 2024, 100, 50));
    let (mut model, _context, ref_id) = loaded_model(&mut store, TreeLayout::Flat);

    let added = model
        .add_comparison(ref_id, &metadata(10, 2024, 100, 50), outcome(0, 40, 3.0), &store, &provider)
        .expect("add");
    assert!(added);

    let added = model
        .add_comparison(ref_id, &metadata(10, 2024, 100, 50), outcome(5, 45, 1.0), &store, &provider)
        .expect("add");
    assert!(!added);

    assert_eq!(model.sorted_children_of(ref_id).len(), 1);
}

#[test]
fn children_are_ordered_by_min_diff_with_stable_ties() {
    let mut store = SqliteCompareStore::open_in_memory().expect("store");
    let provider = StubProvider::new()
        .with_tour(metadata(10, 2024, 10, 50))
        .with_tour(metadata(11, 2024, 11, 50))
        .with_tour(metadata(12, 2024, 12, 50))
        .with_tour(metadata(13, 2024, 13, 50));
    let (mut model, _context, ref_id) = loaded_model(&mut store, TreeLayout::Flat);

    for (tour_id, min_diff) in [(10, 5.0), (11, 1.0), (12, 3.0), (13, 3.0)] {
        let added = model
            .add_comparison(
                ref_id,
                &metadata(tour_id, 2024, 10, 50),
                outcome(0, 40, min_diff),
                &store,
                &provider,
            )
            .expect("add");
        assert!(added);
    }

    let order: Vec<TourId> = model
        .sorted_children_of(ref_id)
        .iter()
        .map(|item| item.tour_id())
        .collect();
    assert_eq!(order, vec![11, 12, 13, 10]);
}

#[test]
fn navigation_wraps_around_in_both_directions() {
    let mut store = SqliteCompareStore::open_in_memory().expect("store");
    let provider = StubProvider::new()
        .with_tour(metadata(10, 2024, 10, 50))
        .with_tour(metadata(11, 2024, 11, 50))
        .with_tour(metadata(12, 2024, 12, 50));
    let (mut model, _context, ref_id) = loaded_model(&mut store, TreeLayout::Flat);

    for (tour_id, min_diff) in [(10, 1.0), (11, 2.0), (12, 3.0)] {
        model
            .add_comparison(
                ref_id,
                &metadata(tour_id, 2024, 10, 50),
                outcome(0, 40, min_diff),
                &store,
                &provider,
            )
            .expect("add");
    }

    // full forward cycle returns to the start
    let mut current = 10;
    for expected in [11, 12, 10] {
        let next = model
            .navigate((ref_id, current), Direction::Next)
            .expect("next");
        assert_eq!(next.tour_id(), expected);
        current = next.tour_id();
    }

    let previous = model
        .navigate((ref_id, 10), Direction::Previous)
        .expect("previous");
    assert_eq!(previous.tour_id(), 12);
}

#[test]
fn navigation_needs_at_least_two_visible_siblings() {
    let mut store = SqliteCompareStore::open_in_memory().expect("store");
    let provider = StubProvider::new().with_tour(metadata(10, 2024, 10, 50));
    let (mut model, _context, ref_id) = loaded_model(&mut store, TreeLayout::Flat);

    model
        .add_comparison(ref_id, &metadata(10, 2024, 10, 50), outcome(0, 40, 1.0), &store, &provider)
        .expect("add");

    assert!(model.navigate((ref_id, 10), Direction::Next).is_none());
    assert!(model.navigate((ref_id, 10), Direction::Previous).is_none());
}

#[test]
fn filter_hides_items_without_dropping_them() {
    let mut store = SqliteCompareStore::open_in_memory().expect("store");
    let provider = StubProvider::new()
        .with_tour(metadata(10, 2024, 10, 50))
        .with_tour(metadata(11, 2024, 11, 50))
        .with_tour(metadata(12, 2024, 12, 50));
    let (mut model, _context, ref_id) = loaded_model(&mut store, TreeLayout::Flat);

    for (tour_id, min_diff) in [(10, 1.0), (11, 2.0), (12, 3.0)] {
        model
            .add_comparison(
                ref_id,
                &metadata(tour_id, 2024, 10, 50),
                outcome(0, 40, min_diff),
                &store,
                &provider,
            )
            .expect("add");
    }

    // persist tour 11 only
    let item = model.item_mut(ref_id, 11).expect("item");
    let event = item
        .persist(&mut store, &provider, &StubMetrics)
        .expect("persist");
    assert!(event.is_some());

    model.set_filter(FilterMode::SavedOnly);
    let visible: Vec<TourId> = model
        .sorted_children_of(ref_id)
        .iter()
        .map(|item| item.tour_id())
        .collect();
    assert_eq!(visible, vec![11]);

    model.set_filter(FilterMode::UnsavedOnly);
    let visible: Vec<TourId> = model
        .sorted_children_of(ref_id)
        .iter()
        .map(|item| item.tour_id())
        .collect();
    assert_eq!(visible, vec![10, 12]);

    // hidden sibling is skipped when navigating
    let next = model
        .navigate((ref_id, 10), Direction::Next)
        .expect("next");
    assert_eq!(next.tour_id(), 12);

    model.set_filter(FilterMode::AllDisplayed);
    assert_eq!(model.sorted_children_of(ref_id).len(), 3);
}

#[test]
fn reload_discards_unsaved_items() {
    let mut store = SqliteCompareStore::open_in_memory().expect("store");
    let provider = StubProvider::new()
        .with_tour(metadata(10, 2024, 10, 50))
        .with_tour(metadata(11, 2024, 11, 50));
    let (mut model, mut context, ref_id) = loaded_model(&mut store, TreeLayout::Flat);

    model
        .add_comparison(ref_id, &metadata(10, 2024, 10, 50), outcome(0, 40, 1.0), &store, &provider)
        .expect("add");
    model
        .add_comparison(ref_id, &metadata(11, 2024, 11, 50), outcome(0, 40, 2.0), &store, &provider)
        .expect("add");

    let item = model.item_mut(ref_id, 11).expect("item");
    item.persist(&mut store, &provider, &StubMetrics)
        .expect("persist");

    model.reload(&store, &mut context).expect("reload");
    model
        .fetch_children(ref_id, &store, &provider)
        .expect("fetch");

    let visible: Vec<TourId> = model
        .sorted_children_of(ref_id)
        .iter()
        .map(|item| item.tour_id())
        .collect();
    assert_eq!(visible, vec![11]);
}

#[test]
fn fetch_failure_leaves_children_unfetched() {
    let mut store = SqliteCompareStore::open_in_memory().expect("store");
    let (mut model, _context, ref_id) = loaded_model(&mut store, TreeLayout::Flat);

    store
        .insert_compared(&NewComparedTour {
            ref_id,
            tour_id: 77,
            year: 2024,
            doy: 10,
            window: AlignmentWindow::new(0, 40).expect("window"),
            min_altitude_diff: 2.0,
            stats: CompareStats::default(),
        })
        .expect("insert");

    // provider does not know tour 77
    let provider = StubProvider::new();
    assert!(model.fetch_children(ref_id, &store, &provider).is_err());
    assert!(!model.ref_tours()[0].is_fetched());
    assert!(model.sorted_children_of(ref_id).is_empty());

    // once the provider resolves, the fetch succeeds
    let provider = StubProvider::new().with_tour(metadata(77, 2024, 10, 50));
    model
        .fetch_children(ref_id, &store, &provider)
        .expect("fetch");
    assert_eq!(model.sorted_children_of(ref_id).len(), 1);
}

#[test]
fn year_buckets_group_and_sort_children() {
    let mut store = SqliteCompareStore::open_in_memory().expect("store");
    let provider = StubProvider::new()
        .with_tour(metadata(10, 2023, 10, 50))
        .with_tour(metadata(11, 2024, 11, 50))
        .with_tour(metadata(12, 2023, 12, 50));
    let (mut model, _context, ref_id) = loaded_model(&mut store, TreeLayout::YearBuckets);

    for (tour_id, year, min_diff) in [(11, 2024, 1.0), (10, 2023, 2.0), (12, 2023, 3.0)] {
        model
            .add_comparison(
                ref_id,
                &metadata(tour_id, year, 10, 50),
                outcome(0, 40, min_diff),
                &store,
                &provider,
            )
            .expect("add");
    }

    let root = &model.ref_tours()[0];
    let years: Vec<_> = root
        .children()
        .iter()
        .map(|child| match child {
            TreeNode::Year(bucket) => bucket.year,
            other => panic!("expected year bucket, got {other:?}"),
        })
        .collect();
    assert_eq!(years, vec![2024, 2023]);

    // navigation crosses bucket boundaries
    let next = model
        .navigate((ref_id, 11), Direction::Next)
        .expect("next");
    assert_eq!(next.tour_id(), 10);
    let wrapped = model
        .navigate((ref_id, 12), Direction::Next)
        .expect("next");
    assert_eq!(wrapped.tour_id(), 11);
}

#[test]
fn new_comparisons_start_unsaved() {
    let mut store = SqliteCompareStore::open_in_memory().expect("store");
    let provider = StubProvider::new().with_tour(metadata(10, 2024, 10, 50));
    let (mut model, _context, ref_id) = loaded_model(&mut store, TreeLayout::Flat);

    model
        .add_comparison(ref_id, &metadata(10, 2024, 10, 50), outcome(0, 40, 1.0), &store, &provider)
        .expect("add");

    let item = model.item(ref_id, 10).expect("item");
    assert_eq!(item.item_id(), UNSAVED_ITEM_ID);
    assert!(!item.is_saved());
    assert!(!item.is_dirty());
}
