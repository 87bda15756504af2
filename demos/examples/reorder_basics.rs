// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag one row of an in-memory list and apply the resulting order.
//!
//! This example plays the host: it hit-tests pointer positions, routes events
//! and expired timers to the list, and re-renders (by reordering the scene's
//! children) when `on_drag_update` reports a new order.
//!
//! Run:
//! - `cargo run -p understory_reorder_demos --example reorder_basics`

use std::sync::{Arc, Mutex};
use std::time::Duration;

use kurbo::Point;
use understory_reorder::animation::AnimationDuration;
use understory_reorder::input::RawPointerEvent;
use understory_reorder::list::DragList;
use understory_reorder::options::ListOptions;
use understory_reorder::surface::NativeEvent;
use understory_reorder_scene::{LocalNode, NodeId, Scene};

fn main() {
    let mut scene = Scene::new();
    let container = scene.insert(
        None,
        LocalNode {
            width: Some(240.0),
            height: Some(400.0),
            ..Default::default()
        },
    );
    let ul = scene.insert(Some(container), LocalNode::tag("ul"));
    let labels = ["apples", "bread", "cheese", "dates", "eggs"];
    let mut rows: Vec<(NodeId, &str)> = labels
        .iter()
        .map(|&label| {
            let node = scene.insert(Some(ul), LocalNode::tag("li").with_height(40.0));
            (node, label)
        })
        .collect();

    let pending: Arc<Mutex<Option<Vec<usize>>>> = Arc::default();
    let sink = Arc::clone(&pending);
    let options = ListOptions::new()
        .with_duration("0.25s".parse::<AnimationDuration>().unwrap())
        .on_drag_start(|i| println!("drag start: {i}"))
        .on_drag_complete(|i| println!("drag complete: {i}"))
        .on_drag_update(move |order| {
            println!("new order: {order:?}");
            *sink.lock().unwrap() = Some(order.to_vec());
        });

    let mut list = DragList::new(container, options);
    list.initialize(&mut scene);
    print_rows(&scene, &rows);

    // Press on "cheese", drag it below "dates", release.
    let hit = |scene: &Scene, y: f64| scene.hit_test_point(Point::new(20.0, y)).map(|h| h.node);
    let down = RawPointerEvent::mouse(
        NativeEvent::MouseDown,
        hit(&scene, 90.0),
        Point::new(20.0, 90.0),
    );
    list.handle_event(&mut scene, &down);
    for y in [100.0, 120.0, 150.0] {
        let mv = RawPointerEvent::mouse(NativeEvent::MouseMove, None, Point::new(20.0, y));
        let outcome = list.handle_event(&mut scene, &mv);
        let target = list.session().map(|s| s.target_index());
        println!("move to y={y}: {outcome:?}, target {target:?}");
    }
    let up = RawPointerEvent::mouse(NativeEvent::MouseUp, None, Point::new(20.0, 150.0));
    list.handle_event(&mut scene, &up);
    println!("phase after release: {:?}", list.phase());

    // Let the settle animation run out.
    for timer in scene.advance(Duration::from_millis(250)) {
        list.handle_timer(&mut scene, timer);
    }
    println!("phase after settle: {:?}", list.phase());

    // Apply the update the way a host re-renders, then re-initialize.
    if let Some(order) = pending.lock().unwrap().take() {
        assert!(scene.reorder_children(ul, &order), "order is a permutation");
        rows = order.iter().map(|&i| rows[i]).collect();
        list.initialize(&mut scene);
    }
    print_rows(&scene, &rows);
}

fn print_rows(scene: &Scene, rows: &[(NodeId, &str)]) {
    for (node, label) in rows {
        let r = scene.bounding_rect(*node);
        println!("  {label:<8} y={:>5.1}", r.y0);
    }
}
