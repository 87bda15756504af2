// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch input and a fixed header row.
//!
//! The scene reports touch support, so the list listens for `touchstart` on
//! the container and `touchmove`/`touchend`/`touchcancel` on the window while a
//! drag is active. The `.header` row never moves.
//!
//! Run:
//! - `cargo run -p understory_reorder_demos --example reorder_fixed_touch`

use std::time::Duration;

use kurbo::Point;
use understory_reorder::input::RawPointerEvent;
use understory_reorder::list::DragList;
use understory_reorder::options::{ContainerStyle, ListOptions};
use understory_reorder::surface::NativeEvent;
use understory_reorder_scene::{ListenerTarget, LocalNode, Scene};

fn main() {
    let mut scene = Scene::with_touch();
    let container = scene.insert(
        None,
        LocalNode {
            origin: Point::new(0.0, 100.0),
            width: Some(320.0),
            height: Some(200.0),
            ..Default::default()
        },
    );
    let ul = scene.insert(Some(container), LocalNode::tag("ul"));
    let header = scene.insert(
        Some(ul),
        LocalNode::tag("li").with_class("header").with_height(30.0),
    );
    let row = LocalNode::tag("li")
        .with_height(50.0)
        .with_margins(0.0, 5.0);
    let rows: Vec<_> = (0..4)
        .map(|_| scene.insert(Some(ul), row.clone()))
        .collect();

    let options = ListOptions::new()
        .with_fixed(".header")
        .with_duration(120_u64)
        .with_style(ContainerStyle::Default(vec![("height".into(), "200px".into())]))
        .on_drag(|i| println!("dragging {i}"))
        .on_drag_update(|order| println!("new order: {order:?}"));
    let mut list = DragList::new(container, options);
    list.initialize(&mut scene);
    println!(
        "touchstart bound: {}, header fixed: {}",
        scene.is_listening(ListenerTarget::Node(container), "touchstart"),
        list.items()[0].fixed
    );

    // A press on the header does nothing.
    let start = RawPointerEvent::touch(
        NativeEvent::TouchStart,
        Some(header),
        vec![Point::new(10.0, 110.0)],
    );
    list.handle_event(&mut scene, &start);
    println!("after header press: {:?}", list.phase());

    // Drag the last row to the top; it stops below the header.
    let last = rows[3];
    let y0 = scene.bounding_rect(last).y0 + 10.0;
    let start = RawPointerEvent::touch(
        NativeEvent::TouchStart,
        Some(last),
        vec![Point::new(10.0, y0)],
    );
    list.handle_event(&mut scene, &start);
    let listening = scene.window_listener_count();
    println!("window listeners during drag: {listening}");
    for y in [y0 - 60.0, y0 - 120.0, y0 - 200.0] {
        let mv = RawPointerEvent::touch(NativeEvent::TouchMove, None, vec![Point::new(10.0, y)]);
        list.handle_event(&mut scene, &mv);
    }
    let end = RawPointerEvent::touch(NativeEvent::TouchEnd, None, vec![]);
    list.handle_event(&mut scene, &end);

    for timer in scene.advance(Duration::from_millis(120)) {
        list.handle_timer(&mut scene, timer);
    }
    let listening = scene.window_listener_count();
    println!("window listeners after settle: {listening}");

    list.destroy(&mut scene);
}
