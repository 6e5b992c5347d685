use dial::config::DialConfig;
use dial::dial::{DialGeometry, DialState, DragTracker, Point, Size, Value};
use std::cell::RefCell;
use std::rc::Rc;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Replays a drag the way the GTK host feeds it: a press, then offsets from
/// the press position, then release.
#[test]
fn drag_around_the_ring_updates_subscribers() {
    let config = DialConfig::default();
    let geometry = DialGeometry::from_size(Size::new(300.0, 300.0), config.inset);
    let state = DialState::new(0.0).into_handle();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    state
        .borrow_mut()
        .subscribe(move |v: Value| sink.borrow_mut().push(v.get()));

    let mut drag = DragTracker::new();
    let knob = geometry.knob_position(state.borrow().get());
    assert_eq!(knob, Point::new(150.0, 20.0));

    let press = Point::new(152.0, 22.0);
    assert!(drag.begin(press, knob, config.hit_radius()));
    state.borrow_mut().set(geometry.value_at(press).get());

    // straight right, straight down, then past the center to the left side
    for (dx, dy) in [(128.0, 128.0), (-2.0, 258.0), (-132.0, 128.0)] {
        let pointer = drag.update(dx, dy).unwrap();
        let value = geometry.value_at(pointer);
        state.borrow_mut().set(value.get());
    }
    drag.end();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 4);
    assert!(seen[0] > 0.0 && seen[0] < 1.0);
    assert!(close(seen[1], 25.0));
    assert!(close(seen[2], 50.0));
    assert!(close(seen[3], 75.0));
    assert!(close(state.borrow().get().get(), 75.0));
}

#[test]
fn press_away_from_knob_leaves_value_alone() {
    let config = DialConfig::default();
    let geometry = DialGeometry::default();
    let mut state = DialState::new(40.0);
    let mut drag = DragTracker::new();

    let knob = geometry.knob_position(state.get());
    if drag.begin(Point::new(150.0, 280.0), knob, config.hit_radius()) {
        state.set(geometry.value_at(Point::new(150.0, 280.0)).get());
    }

    assert!(!drag.is_active());
    assert_eq!(state.get().get(), 40.0);
}

#[test]
fn grab_anywhere_jumps_to_pointer() {
    let config = DialConfig {
        grab_anywhere: true,
        ..DialConfig::default()
    };
    let geometry = DialGeometry::default();
    let mut state = DialState::new(40.0);
    let mut drag = DragTracker::new();

    let press = Point::new(150.0, 280.0);
    assert!(drag.begin(press, geometry.knob_position(state.get()), config.hit_radius()));
    state.set(geometry.value_at(press).get());

    assert!(close(state.get().get(), 50.0));
}

#[test]
fn resize_keeps_value_but_moves_knob() {
    let state = DialState::new(25.0);
    let small = DialGeometry::from_size(Size::new(300.0, 300.0), 20.0);
    let large = DialGeometry::from_size(Size::new(600.0, 400.0), 20.0);

    let a = small.knob_position(state.get());
    let b = large.knob_position(state.get());

    assert!(close(a.x, 280.0) && close(a.y, 150.0));
    assert!(close(b.x, 480.0) && close(b.y, 200.0));
    assert!(close(large.value_at(b).get(), 25.0));
}
