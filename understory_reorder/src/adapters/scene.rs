// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`ListSurface`] for the in-memory Understory reorder scene.
//!
//! ## Feature
//!
//! Enable with `scene_adapter`.
//!
//! ## Notes
//!
//! Elements are [`NodeId`]s and timers are the scene's [`TimerId`]s. Listener
//! registration is recorded in the scene; the host still delivers events by
//! calling [`DragList::handle_event`](crate::list::DragList::handle_event), and
//! the ids returned from [`Scene::advance`] by calling
//! [`DragList::handle_timer`](crate::list::DragList::handle_timer).

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::time::Duration;

use kurbo::Rect;
use understory_reorder_scene::{ListenerTarget, NodeId, Scene, TimerId};

use crate::surface::{EventTarget, ListSurface, NativeEvent};

fn listener_target(target: EventTarget<NodeId>) -> ListenerTarget {
    match target {
        EventTarget::Element(node) => ListenerTarget::Node(node),
        EventTarget::Window => ListenerTarget::Window,
    }
}

impl ListSurface for Scene {
    type Element = NodeId;
    type Timer = TimerId;

    fn children(&self, element: NodeId) -> Vec<NodeId> {
        Self::children(self, element).to_vec()
    }

    fn parent(&self, element: NodeId) -> Option<NodeId> {
        Self::parent(self, element)
    }

    fn bounding_rect(&self, element: NodeId) -> Rect {
        Self::bounding_rect(self, element)
    }

    fn vertical_margins(&self, element: NodeId) -> (f64, f64) {
        self.margins(element)
    }

    fn scroll_top(&self, element: NodeId) -> f64 {
        Self::scroll_top(self, element)
    }

    fn inline_style(&self, element: NodeId, name: &str) -> Option<String> {
        self.style(element, name).map(ToString::to_string)
    }

    fn set_inline_style(&mut self, element: NodeId, name: &str, value: Option<&str>) {
        self.set_style(element, name, value);
    }

    fn add_class(&mut self, element: NodeId, class: &str) {
        Self::add_class(self, element, class);
    }

    fn remove_class(&mut self, element: NodeId, class: &str) {
        Self::remove_class(self, element, class);
    }

    fn matches(&self, element: NodeId, selector: &str) -> bool {
        Self::matches(self, element, selector)
    }

    fn supports_touch(&self) -> bool {
        Self::supports_touch(self)
    }

    fn add_listener(&mut self, target: EventTarget<NodeId>, event: NativeEvent) {
        Self::add_listener(self, listener_target(target), event.name());
    }

    fn remove_listener(&mut self, target: EventTarget<NodeId>, event: NativeEvent) {
        Self::remove_listener(self, listener_target(target), event.name());
    }

    fn set_timer(&mut self, delay: Duration) -> TimerId {
        Self::set_timer(self, delay)
    }

    fn clear_timer(&mut self, timer: TimerId) {
        Self::clear_timer(self, timer);
    }
}
