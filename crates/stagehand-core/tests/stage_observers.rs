//! Stage input as seen by observers of the published pointer state.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use stagehand_core::{CoordinateSpace, Point, PointerEvent, Rect, Size, Stage, StageOptions};

#[test]
fn subscribers_see_stage_local_pointer() {
    let mut stage = Stage::new(StageOptions::default());
    assert!(stage.observe_rect(Rect::new(100.0, 50.0, 800.0, 600.0), true));

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = stage
        .pointer_observable()
        .subscribe(move |p| sink.borrow_mut().push(*p));

    stage.handle_pointer(PointerEvent::down(110.0, 60.0));
    stage.handle_pointer(PointerEvent::moved(110.0, 60.0));
    stage.handle_pointer(PointerEvent::moved(130.0, 90.0));

    // The repeated position is not re-published.
    assert_eq!(
        *seen.borrow(),
        vec![Point::new(10.0, 10.0), Point::new(30.0, 40.0)]
    );
}

#[test]
fn release_clears_button_and_wheel_capture() {
    let mut stage = Stage::default();
    let lmb_log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&lmb_log);
    let _sub = stage
        .lmb_observable()
        .subscribe(move |down| sink.borrow_mut().push(*down));

    stage.set_wheel_busy(true);
    assert!(!stage.wheel_busy(), "capture needs a held button");

    stage.handle_pointer(PointerEvent::down(5.0, 5.0));
    stage.set_wheel_busy(true);
    assert!(stage.wheel_busy());

    stage.handle_pointer(PointerEvent::up(5.0, 5.0).with_touches(0));
    assert!(!stage.wheel_busy());
    assert_eq!(*lmb_log.borrow(), vec![true, false]);
}

#[test]
fn wheel_capture_is_published_until_release() {
    let mut stage = Stage::default();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let _sub = stage
        .wheel_busy_observable()
        .subscribe(move |busy| sink.borrow_mut().push(*busy));

    // Refused while the button is up, so nothing is published.
    stage.set_wheel_busy(true);
    stage.handle_pointer(PointerEvent::down(5.0, 5.0));
    stage.set_wheel_busy(true);
    stage.set_wheel_busy(true);
    stage.handle_pointer(PointerEvent::up(5.0, 5.0));

    assert_eq!(*log.borrow(), vec![true, false]);
    assert_eq!(stage.wheel_busy_observable().version(), 2);
}

#[test]
fn dropped_subscription_stops_notifications() {
    let mut stage = Stage::default();
    let count = Rc::new(RefCell::new(0u32));
    let sink = Rc::clone(&count);
    let sub = stage
        .pointer_observable()
        .subscribe(move |_| *sink.borrow_mut() += 1);

    stage.handle_pointer(PointerEvent::moved(1.0, 1.0));
    drop(sub);
    stage.handle_pointer(PointerEvent::moved(2.0, 2.0));
    assert_eq!(*count.borrow(), 1);
}

proptest! {
    #[test]
    fn clamp_stays_within_bounds(
        w in 0.0f64..2_000.0,
        h in 0.0f64..2_000.0,
        min in 50.0f64..300.0,
        extra in 0.0f64..500.0,
    ) {
        let max = Size::new(min + extra, min + extra);
        let clamped = Size::new(w, h).clamp(Size::new(min, min), Some(max));
        prop_assert!(clamped.width >= min && clamped.width <= max.width);
        prop_assert!(clamped.height >= min && clamped.height <= max.height);
        if w >= min && w <= max.width {
            prop_assert_eq!(clamped.width, w);
        }
    }

    #[test]
    fn resize_reports_previous_size(w in 1.0f64..4_000.0, h in 1.0f64..4_000.0) {
        let mut stage = Stage::default();
        let before = stage.frame();
        let previous = stage.resize(Size::new(w, h));
        prop_assert_eq!(previous, stagehand_core::stage::STAGE_DEFAULT_SIZE);
        prop_assert_eq!(stage.frame().size(), Size::new(w, h));
        prop_assert_eq!(before.size(), previous);
    }
}
