use tourcompare::core::range::{AlignmentWindow, RangeError, RangeState};

fn window(first: usize, last: usize) -> AlignmentWindow {
    AlignmentWindow::new(first, last).expect("window")
}

#[test]
fn inverted_window_is_rejected() {
    assert_eq!(
        AlignmentWindow::new(5, 2),
        Err(RangeError::Inverted { first: 5, last: 2 })
    );
}

#[test]
fn window_length_is_inclusive() {
    assert_eq!(window(3, 3).len(), 1);
    assert_eq!(window(2, 7).len(), 6);
    assert!(!window(3, 3).is_empty());
}

#[test]
fn out_of_bounds_windows_are_rejected_on_ingestion() {
    assert_eq!(
        RangeState::new(window(0, 10), 10).unwrap_err(),
        RangeError::OutOfBounds {
            last: 10,
            sample_count: 10
        }
    );
    assert_eq!(
        RangeState::from_persisted(window(0, 12), window(0, 5), 10).unwrap_err(),
        RangeError::OutOfBounds {
            last: 12,
            sample_count: 10
        }
    );
}

#[test]
fn fresh_comparison_starts_unsaved_and_clean() {
    let state = RangeState::new(window(5, 20), 30).expect("state");

    assert!(!state.is_persisted());
    assert!(!state.is_dirty());
    assert_eq!(state.computed(), window(5, 20));
    assert_eq!(state.saved(), None);
    assert_eq!(state.moved(), window(5, 20));
    assert_eq!(state.sample_count(), 30);
}

#[test]
fn reloaded_comparison_starts_saved_and_clean() {
    let state = RangeState::from_persisted(window(6, 20), window(5, 20), 30).expect("state");

    assert!(state.is_persisted());
    assert!(!state.is_dirty());
    assert_eq!(state.saved(), Some(window(6, 20)));
    assert_eq!(state.moved(), window(6, 20));
}

#[test]
fn moving_away_and_back_flips_dirtiness() {
    let mut state = RangeState::new(window(5, 20), 30).expect("state");

    state.apply_user_move(window(6, 21)).expect("move");
    assert!(state.is_dirty());

    // back onto the computed window, nothing left to persist
    state.apply_user_move(window(5, 20)).expect("move");
    assert!(!state.is_dirty());
}

#[test]
fn out_of_bounds_move_leaves_displayed_range_unchanged() {
    let mut state = RangeState::new(window(5, 20), 30).expect("state");

    let result = state.apply_user_move(window(5, 30));
    assert_eq!(
        result,
        Err(RangeError::OutOfBounds {
            last: 30,
            sample_count: 30
        })
    );
    assert_eq!(state.moved(), window(5, 20));
    assert!(!state.is_dirty());
}

#[test]
fn mark_saved_transitions_to_saved_clean() {
    let mut state = RangeState::new(window(5, 20), 30).expect("state");
    state.apply_user_move(window(6, 21)).expect("move");

    state.mark_saved(window(6, 21)).expect("mark saved");
    assert!(state.is_persisted());
    assert!(!state.is_dirty());
    assert_eq!(state.saved(), Some(window(6, 21)));
    assert_eq!(state.moved(), window(6, 21));
    assert_eq!(state.computed(), window(5, 20));
}

#[test]
fn undo_reverts_to_saved_or_computed() {
    let mut state = RangeState::new(window(5, 20), 30).expect("state");
    state.apply_user_move(window(10, 25)).expect("move");

    state.undo();
    assert_eq!(state.moved(), window(5, 20));
    assert!(!state.is_dirty());

    state.mark_saved(window(8, 22)).expect("mark saved");
    state.apply_user_move(window(1, 2)).expect("move");
    state.undo();
    assert_eq!(state.moved(), window(8, 22));
    assert!(!state.is_dirty());

    // undo on a clean state is a no-op
    state.undo();
    assert_eq!(state.moved(), window(8, 22));
}

#[test]
fn reset_returns_to_unsaved_clean() {
    let mut state = RangeState::from_persisted(window(6, 20), window(5, 20), 30).expect("state");
    state.apply_user_move(window(7, 21)).expect("move");

    state.reset();
    assert!(!state.is_persisted());
    assert!(!state.is_dirty());
    assert_eq!(state.saved(), None);
    assert_eq!(state.computed(), window(5, 20));
    assert_eq!(state.moved(), window(5, 20));
}

#[test]
fn moving_onto_saved_window_clears_dirtiness() {
    let mut state = RangeState::from_persisted(window(6, 20), window(5, 20), 30).expect("state");

    state.apply_user_move(window(5, 20)).expect("move");
    assert!(state.is_dirty());

    state.apply_user_move(window(6, 20)).expect("move");
    assert!(!state.is_dirty());
}
