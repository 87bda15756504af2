// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session-scoped drag state.
//!
//! A [`DragSession`] is created when a valid `Down` starts a drag and dropped
//! when the drag is cleaned up, so no state outlives the gesture it belongs to.
//! It owns the [`GeometrySnapshot`] and applies [`engine`](crate::engine)
//! results to the surface.

use alloc::vec::Vec;
use kurbo::{Point, Vec2};

use crate::engine::{self, ItemState};
use crate::geometry::{GeometrySnapshot, InlineStyle, ItemGeometry};
use crate::surface::{ListSurface, StyleProperty, SurfaceExt};

/// One list entry as seen by a drag.
#[derive(Clone, Debug, PartialEq)]
pub struct DragItem<E> {
    /// Host element handle (non-owning).
    pub element: E,
    /// Original index, stable for the session.
    pub index: usize,
    /// True if the item never changes position.
    pub fixed: bool,
    /// Geometry measured at drag start.
    pub geometry: ItemGeometry,
    /// Inline styles before the drag.
    pub original_style: InlineStyle,
    /// Target offset in the current (or final) reorder.
    pub tmp_top: f64,
}

/// State of one drag gesture.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession<E> {
    drag_index: usize,
    target_index: usize,
    pointer_offset: Vec2,
    pub(crate) dragging: bool,
    pub(crate) finishing: bool,
    snapshot: GeometrySnapshot<E>,
    tmp_order: Vec<usize>,
}

impl<E: Copy + Eq> DragSession<E> {
    /// Start a session for `drag_index` with the pointer at `pointer`.
    ///
    /// The pointer offset is taken from the snapshot so the item keeps its
    /// position relative to the pointer for the whole drag.
    pub fn new(drag_index: usize, pointer: Point, snapshot: GeometrySnapshot<E>) -> Self {
        let geometry = snapshot
            .items
            .get(drag_index)
            .map(|item| item.geometry)
            .unwrap_or_default();
        let item_origin = Point::new(
            snapshot.container_origin.x + geometry.left,
            snapshot.container_origin.y + geometry.top - snapshot.scroll_top,
        );
        Self {
            drag_index,
            target_index: drag_index,
            pointer_offset: item_origin - pointer,
            dragging: false,
            finishing: false,
            tmp_order: (0..snapshot.items.len()).collect(),
            snapshot,
        }
    }

    /// Original index of the dragged item.
    pub fn drag_index(&self) -> usize {
        self.drag_index
    }

    /// Index the dragged item would land at if released now.
    pub fn target_index(&self) -> usize {
        self.target_index
    }

    /// Vector from the pointer to the dragged item's margin-box top-left.
    pub fn pointer_offset(&self) -> Vec2 {
        self.pointer_offset
    }

    /// True once the pointer has moved since `Down`.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// True between release and the end of the settle phase.
    pub fn is_finishing(&self) -> bool {
        self.finishing
    }

    /// Items in original order.
    pub fn items(&self) -> &[DragItem<E>] {
        &self.snapshot.items
    }

    /// The snapshot taken at drag start.
    pub fn snapshot(&self) -> &GeometrySnapshot<E> {
        &self.snapshot
    }

    /// The dragged item.
    pub fn drag_item(&self) -> Option<&DragItem<E>> {
        self.snapshot.items.get(self.drag_index)
    }

    /// Original indices by new position for the latest reflow.
    pub fn tmp_order(&self) -> &[usize] {
        &self.tmp_order
    }

    /// True if releasing now would change the order.
    pub fn order_changed(&self) -> bool {
        self.drag_index != self.target_index
    }

    /// Write the dragged item's `top` so it sits under a pointer at `pointer_y`.
    ///
    /// Returns the written offset.
    pub(crate) fn place_drag_element<S>(
        &self,
        surface: &mut S,
        container: E,
        pointer_y: f64,
    ) -> f64
    where
        S: ListSurface<Element = E> + ?Sized,
    {
        let origin = self.snapshot.container_origin.y - surface.scroll_top(container);
        let top = pointer_y + self.pointer_offset.y - origin;
        if let Some(item) = self.drag_item() {
            surface.set_px(item.element, StyleProperty::Top, top);
        }
        top
    }

    /// Re-measure and recompute the target index from current layout.
    pub(crate) fn update_target<S>(&mut self, surface: &S) -> usize
    where
        S: ListSurface<Element = E> + ?Sized,
    {
        let Some(drag) = self.drag_item() else {
            return self.target_index;
        };
        let drag_top = surface.bounding_rect(drag.element).y0;
        let states = self.states(|item| surface.bounding_rect(item.element).y0);
        let target = engine::target_index(&states, self.drag_index, drag_top);
        if target != self.target_index {
            rdebug!(
                drag_index = self.drag_index,
                from = self.target_index,
                to = target,
                "target index changed"
            );
        }
        self.target_index = target;
        target
    }

    /// Reflow every item for the current target and move all but the dragged one.
    pub(crate) fn reflow<S>(&mut self, surface: &mut S)
    where
        S: ListSurface<Element = E> + ?Sized,
    {
        let states = self.states(|item| item.geometry.top);
        let reflow = engine::reflow(&states, self.drag_index, self.target_index);
        for item in &mut self.snapshot.items {
            item.tmp_top = reflow.tops()[item.index];
            if item.index != self.drag_index {
                surface.set_px(item.element, StyleProperty::Top, item.tmp_top);
            }
        }
        self.tmp_order = reflow.into_order();
    }

    /// Give every item except the dragged one the settle transition.
    pub(crate) fn enable_transitions<S>(&self, surface: &mut S, transition: &str)
    where
        S: ListSurface<Element = E> + ?Sized,
    {
        for item in &self.snapshot.items {
            if item.index != self.drag_index {
                surface.set_style(item.element, StyleProperty::Transition, Some(transition));
            }
        }
    }

    /// Animate the dragged item to its resolved offset.
    pub(crate) fn settle_drag_element<S>(&self, surface: &mut S, transition: &str)
    where
        S: ListSurface<Element = E> + ?Sized,
    {
        if let Some(item) = self.drag_item() {
            surface.set_style(item.element, StyleProperty::Transition, Some(transition));
            surface.set_px(item.element, StyleProperty::Top, item.tmp_top);
        }
    }

    /// Restore all inline styles touched by the drag.
    pub(crate) fn restore<S>(&self, surface: &mut S)
    where
        S: ListSurface<Element = E> + ?Sized,
    {
        self.snapshot.restore(surface);
    }

    fn states(&self, top: impl Fn(&DragItem<E>) -> f64) -> Vec<ItemState> {
        self.snapshot
            .items
            .iter()
            .map(|item| ItemState {
                top: top(item),
                height: item.geometry.height,
                fixed: item.fixed,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use understory_reorder_scene::{LocalNode, NodeId, Scene};

    use crate::types::ManagedItem;

    fn start(
        scene: &mut Scene,
        pointer: Point,
        drag_index: usize,
    ) -> (NodeId, DragSession<NodeId>) {
        let container = scene.insert(
            None,
            LocalNode {
                origin: Point::new(0.0, 100.0),
                width: Some(100.0),
                height: Some(400.0),
                ..Default::default()
            },
        );
        scene.set_style(container, "position", Some("relative"));
        let list = scene.insert(Some(container), LocalNode::tag("ul"));
        let managed: Vec<_> = (0..4)
            .map(|index| ManagedItem {
                element: scene.insert(Some(list), LocalNode::tag("li").with_height(30.0)),
                index,
                fixed: false,
            })
            .collect();
        let snapshot = GeometrySnapshot::capture(scene, container, list, &managed);
        snapshot.apply(scene, drag_index);
        let session = DragSession::new(drag_index, pointer, snapshot);
        session.place_drag_element(scene, container, pointer.y);
        (container, session)
    }

    #[test]
    fn pointer_offset_is_rigid() {
        let mut scene = Scene::new();
        let (container, session) = start(&mut scene, Point::new(10.0, 145.0), 1);
        assert_eq!(session.pointer_offset(), Vec2::new(-10.0, -15.0));
        let el = session.drag_item().unwrap().element;
        assert_eq!(
            scene.bounding_rect(el).y0,
            130.0,
            "first placement does not snap"
        );

        let top = session.place_drag_element(&mut scene, container, 200.0);
        assert_eq!(top, 85.0);
        assert_eq!(scene.bounding_rect(el).y0, 185.0);

        scene.set_scroll_top(container, 20.0);
        session.place_drag_element(&mut scene, container, 200.0);
        assert_eq!(
            scene.bounding_rect(el).y0,
            185.0,
            "scroll does not detach the item"
        );
    }

    #[test]
    fn update_target_and_reflow() {
        let mut scene = Scene::new();
        let (container, mut session) = start(&mut scene, Point::new(10.0, 145.0), 1);
        assert_eq!(session.update_target(&scene), 1);
        assert!(!session.order_changed());

        session.place_drag_element(&mut scene, container, 180.0);
        assert_eq!(session.update_target(&scene), 2);
        session.reflow(&mut scene);
        assert_eq!(session.tmp_order(), &[0, 2, 1, 3]);
        let tmp: Vec<f64> = session.items().iter().map(|i| i.tmp_top).collect();
        assert_eq!(tmp, vec![0.0, 60.0, 30.0, 90.0]);
        assert_eq!(scene.style(session.items()[2].element, "top"), Some("30px"));
        assert_ne!(
            scene.style(session.items()[1].element, "top"),
            Some("60px"),
            "the dragged item follows the pointer"
        );
        assert!(session.order_changed());

        session.settle_drag_element(&mut scene, "top 0.3s");
        assert_eq!(scene.style(session.items()[1].element, "top"), Some("60px"));
        assert_eq!(
            scene.style(session.items()[1].element, "transition"),
            Some("top 0.3s")
        );
    }

    #[test]
    fn enable_transitions_skips_dragged_item() {
        let mut scene = Scene::new();
        let (_, session) = start(&mut scene, Point::new(0.0, 105.0), 0);
        session.enable_transitions(&mut scene, "top 0.3s");
        let items = session.items();
        assert_eq!(scene.style(items[0].element, "transition"), None);
        assert!(
            items[1..]
                .iter()
                .all(|i| scene.style(i.element, "transition") == Some("top 0.3s"))
        );
        session.restore(&mut scene);
        assert!(
            items
                .iter()
                .all(|i| scene.style(i.element, "transition").is_none())
        );
    }
}
