//! Integration tests for tracked-state.
//!
//! These tests exercise the public API from outside the crate: the hook, the
//! host runtime underneath it, and the pilot driving both together.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use tracked_state::host::{self, HostError};
use tracked_state::testing::{Pilot, PilotConfig, PilotError};
use tracked_state::tracked::{use_tracked_state, CurrentState, LatestState};
use tracked_state::updater::Updater;

type Handles<T> = Rc<RefCell<Option<(CurrentState<T>, LatestState<T>)>>>;

/// Mount a counter component and capture its accessor pair.
fn mount(initial: i32) -> (Pilot<i32>, CurrentState<i32>, LatestState<i32>) {
    let captured: Handles<i32> = Rc::new(RefCell::new(None));
    let cap = captured.clone();
    let pilot = Pilot::mount(move || {
        let (cur, latest) = use_tracked_state(initial);
        *cap.borrow_mut() = Some((cur, latest));
        cur.get()
    });
    let (cur, latest) = (*captured.borrow()).expect("body ran");
    (pilot, cur, latest)
}

// ---------------------------------------------------------------------------
// Hook contract
// ---------------------------------------------------------------------------

#[test]
fn test_initial_value_visible_on_both_facets() {
    let (pilot, cur, latest) = mount(42);
    assert_eq!(cur.get(), 42);
    assert_eq!(latest.get(), 42);
    assert_eq!(pilot.output(), &42);
}

#[test]
fn test_literal_set_is_sync_on_latest_and_deferred_on_current() {
    let (mut pilot, cur, latest) = mount(0);

    cur.set(5);
    assert_eq!(latest.get(), 5);
    assert_eq!(cur.get(), 0);

    pilot.process().expect("settles");
    assert_eq!(cur.get(), 5);
    assert_eq!(latest.get(), 5);
}

#[test]
fn test_both_setters_reach_the_same_end_state() {
    let (mut pa, cur_a, latest_a) = mount(0);
    let (mut pb, cur_b, latest_b) = mount(0);

    cur_a.set(9);
    latest_b.set(9);
    pa.process().expect("settles");
    pb.process().expect("settles");

    assert_eq!((cur_a.get(), latest_a.get()), (9, 9));
    assert_eq!((cur_b.get(), latest_b.get()), (9, 9));
}

#[test]
fn test_latest_facet_increments_compose() {
    let (mut pilot, cur, latest) = mount(0);
    latest.update(|n| n + 1);
    latest.update(|n| n + 1);
    latest.update(|n| n + 1);
    assert_eq!(latest.get(), 3);
    pilot.process().expect("settles");
    assert_eq!(cur.get(), 3);
}

#[test]
fn test_current_facet_increments_undercount() {
    // The two facets use different bases for functional updates; the same
    // three increments land on different values.
    let (mut pa, cur_a, latest_a) = mount(0);
    let (mut pb, _cur_b, latest_b) = mount(0);

    for _ in 0..3 {
        cur_a.update(|n| n + 1);
        latest_b.update(|n| n + 1);
    }
    assert_eq!(latest_a.get(), 1);
    assert_eq!(latest_b.get(), 3);

    pa.process().expect("settles");
    pb.process().expect("settles");
    assert_eq!(cur_a.get(), 1);
    assert_eq!(latest_b.get(), 3);
}

#[test]
fn test_facets_converge_after_every_commit() {
    let (mut pilot, cur, latest) = mount(1);
    for step in 0..5 {
        if step % 2 == 0 {
            latest.update(move |n| n * 2);
        } else {
            cur.set(step);
        }
        pilot.process().expect("settles");
        assert_eq!(cur.get(), latest.get());
    }
}

#[test]
fn test_accessor_identity_is_stable_across_renders() {
    let captured = Rc::new(RefCell::new(Vec::new()));
    let cap = captured.clone();
    let mut pilot = Pilot::mount(move || {
        cap.borrow_mut().push(use_tracked_state(0));
    });
    pilot.rerender();
    pilot.rerender();
    let seen = captured.borrow();
    assert_eq!(seen[0], seen[1]);
    assert_eq!(seen[1], seen[2]);
}

#[test]
fn test_callable_state_is_replaced_not_invoked() {
    type Op = fn(i32) -> i32;
    fn succ(x: i32) -> i32 {
        x + 1
    }
    fn pred(x: i32) -> i32 {
        x - 1
    }

    let captured: Handles<Op> = Rc::new(RefCell::new(None));
    let cap = captured.clone();
    let mut pilot = Pilot::mount(move || {
        let pair = use_tracked_state(succ as Op);
        *cap.borrow_mut() = Some(pair);
    });
    let (cur, latest) = (*captured.borrow()).expect("body ran");

    // Positional argument: the function is the new value.
    latest.set(pred as Op);
    assert_eq!((latest.get())(10), 9);

    // Computing arm: the function derives the new value.
    latest.set(Updater::compute(|_prev: &Op| succ as Op));
    assert_eq!((latest.get())(10), 11);

    pilot.process().expect("settles");
    assert_eq!((cur.get())(10), 11);
}

// ---------------------------------------------------------------------------
// Host runtime through the public API
// ---------------------------------------------------------------------------

#[test]
fn test_components_are_isolated() {
    let (mut pa, cur_a, _) = mount(0);
    let (mut pb, cur_b, _) = mount(50);
    cur_a.set(1);
    pa.process().expect("settles");
    pb.process().expect("settles");
    assert_eq!(cur_a.get(), 1);
    assert_eq!(cur_b.get(), 50);
}

#[test]
fn test_drop_disposes_component() {
    let (pilot, _cur, _latest) = mount(0);
    let id = pilot.component_id();
    drop(pilot);
    assert!(matches!(
        host::is_dirty(id),
        Err(HostError::UnknownComponent(_))
    ));
}

#[test]
fn test_raw_host_drive_without_pilot() {
    let id = host::create_component();
    let (cur, latest) = host::render(id, || use_tracked_state(String::from("x"))).expect("renders");

    latest.update(|s| format!("{s}y"));
    assert_eq!(latest.get(), "xy");
    assert_eq!(cur.get(), "x");

    assert!(host::commit(id).expect("commits"));
    assert_eq!(cur.get(), "xy");

    assert!(host::dispose_component(id));
}

#[test]
fn test_pending_updates_coalesce() {
    let (mut pilot, cur, latest) = mount(0);
    cur.set(1);
    cur.set(2);
    latest.set(3);
    pilot.process().expect("settles");
    // One commit applies the final merged value.
    assert_eq!(pilot.generation(), 1);
    assert_eq!(cur.get(), 3);
    assert_eq!(latest.get(), 3);
}

#[test]
fn test_runaway_update_loop_is_bounded() {
    let mut pilot = Pilot::with_config(PilotConfig::new().with_max_update_passes(8), || {
        let (_cur, latest) = use_tracked_state(0);
        latest.update(|n| n + 1);
    });
    let err = pilot.process().expect_err("never settles");
    assert!(matches!(err, PilotError::UpdateLimitExceeded { passes: 8 }));
}
