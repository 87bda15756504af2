// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pre-drag geometry capture and the layout switch to absolute positioning.
//!
//! ## Passes
//!
//! [`GeometrySnapshot::capture`] first pins the list wrapper's height so it
//! does not collapse once its children leave the flow, then measures every
//! item and records its inline styles. [`GeometrySnapshot::apply`] is a
//! separate pass that makes every item `position: absolute` at its measured
//! offset: switching one item before the later ones are measured would shift
//! them.
//!
//! Offsets are relative to the container's top-left and include the
//! container's scroll offset. `top` is the item's margin-box top, so writing it
//! back as an absolute `top` reproduces the flow position exactly.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use kurbo::Point;

use crate::session::DragItem;
use crate::surface::{ListSurface, StyleProperty, SurfaceExt};
use crate::types::ManagedItem;

/// Measured position of an item relative to the container.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ItemGeometry {
    /// Border-box left edge.
    pub left: f64,
    /// Margin-box top edge, scroll-adjusted.
    pub top: f64,
    /// Height including vertical margins.
    pub height: f64,
}

/// Inline style values recorded before a drag and restored after it.
///
/// `None` means the property had no inline value; restoring clears it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineStyle {
    /// `position`.
    pub position: Option<String>,
    /// `left`.
    pub left: Option<String>,
    /// `top`.
    pub top: Option<String>,
    /// `transition`.
    pub transition: Option<String>,
    /// `z-index`.
    pub z_index: Option<String>,
}

impl InlineStyle {
    /// Record `element`'s current inline values.
    pub fn capture<S: ListSurface + ?Sized>(surface: &S, element: S::Element) -> Self {
        Self {
            position: surface.style(element, StyleProperty::Position),
            left: surface.style(element, StyleProperty::Left),
            top: surface.style(element, StyleProperty::Top),
            transition: surface.style(element, StyleProperty::Transition),
            z_index: surface.style(element, StyleProperty::ZIndex),
        }
    }

    /// Write the recorded values back onto `element`.
    pub fn restore<S: ListSurface + ?Sized>(&self, surface: &mut S, element: S::Element) {
        let fields = [
            (StyleProperty::Position, &self.position),
            (StyleProperty::Left, &self.left),
            (StyleProperty::Top, &self.top),
            (StyleProperty::Transition, &self.transition),
            (StyleProperty::ZIndex, &self.z_index),
        ];
        for (prop, value) in fields {
            surface.set_style(element, prop, value.as_deref());
        }
    }
}

/// Everything measured when a drag starts.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometrySnapshot<E> {
    /// Container top-left in viewport coordinates.
    pub container_origin: Point,
    /// Container scroll offset at capture time.
    pub scroll_top: f64,
    /// The list wrapper whose height was pinned.
    pub list: E,
    /// The wrapper's inline `height` before pinning.
    pub list_height: Option<String>,
    /// One entry per managed item, in document order.
    pub items: Vec<DragItem<E>>,
}

impl<E: Copy + Eq> GeometrySnapshot<E> {
    /// Pin the wrapper height, then measure every managed item.
    ///
    /// Fixed roles are copied from `managed`; no selector is evaluated here.
    pub fn capture<S>(surface: &mut S, container: E, list: E, managed: &[ManagedItem<E>]) -> Self
    where
        S: ListSurface<Element = E> + ?Sized,
    {
        let container_rect = surface.bounding_rect(container);
        let scroll_top = surface.scroll_top(container);

        let list_height = surface.style(list, StyleProperty::Height);
        let pinned = surface.bounding_rect(list).height();
        surface.set_px(list, StyleProperty::Height, pinned);

        let items = managed
            .iter()
            .map(|m| {
                let rect = surface.bounding_rect(m.element);
                let (margin_top, margin_bottom) = surface.vertical_margins(m.element);
                let geometry = ItemGeometry {
                    left: rect.x0 - container_rect.x0,
                    top: rect.y0 - margin_top - container_rect.y0 + scroll_top,
                    height: rect.height() + margin_top + margin_bottom,
                };
                DragItem {
                    element: m.element,
                    index: m.index,
                    fixed: m.fixed,
                    geometry,
                    original_style: InlineStyle::capture(surface, m.element),
                    tmp_top: geometry.top,
                }
            })
            .collect();

        rtrace!(
            items = managed.len(),
            pinned_height = pinned,
            "captured list geometry"
        );

        Self {
            container_origin: container_rect.origin(),
            scroll_top,
            list,
            list_height,
            items,
        }
    }

    /// Switch every item to absolute positioning at its measured offset.
    ///
    /// The dragged item is raised above its siblings and left without a `top`;
    /// the caller places it under the pointer.
    pub fn apply<S>(&self, surface: &mut S, drag_index: usize)
    where
        S: ListSurface<Element = E> + ?Sized,
    {
        let raised = self.items.len().to_string();
        for item in &self.items {
            surface.set_px(item.element, StyleProperty::Left, item.geometry.left);
            surface.set_style(item.element, StyleProperty::Position, Some("absolute"));
            if item.index == drag_index {
                surface.set_style(item.element, StyleProperty::ZIndex, Some(&raised));
            } else {
                surface.set_px(item.element, StyleProperty::Top, item.geometry.top);
            }
        }
    }

    /// Restore every item's inline styles and the wrapper's height.
    pub fn restore<S>(&self, surface: &mut S)
    where
        S: ListSurface<Element = E> + ?Sized,
    {
        for item in &self.items {
            item.original_style.restore(surface, item.element);
        }
        surface.set_style(
            self.list,
            StyleProperty::Height,
            self.list_height.as_deref(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_reorder_scene::{LocalNode, NodeId, Scene};

    fn build(scene: &mut Scene, margins: (f64, f64)) -> (NodeId, NodeId, Vec<ManagedItem<NodeId>>) {
        let container = scene.insert(
            None,
            LocalNode {
                origin: Point::new(5.0, 50.0),
                width: Some(100.0),
                height: Some(60.0),
                ..Default::default()
            },
        );
        scene.set_style(container, "position", Some("relative"));
        let list = scene.insert(Some(container), LocalNode::tag("ul"));
        let managed = (0..3)
            .map(|index| {
                let element = scene.insert(
                    Some(list),
                    LocalNode::tag("li")
                        .with_height(20.0)
                        .with_margins(margins.0, margins.1),
                );
                ManagedItem {
                    element,
                    index,
                    fixed: index == 1,
                }
            })
            .collect();
        (container, list, managed)
    }

    #[test]
    fn capture_measures_relative_to_container() {
        let mut scene = Scene::new();
        let (container, list, managed) = build(&mut scene, (2.0, 3.0));
        scene.set_scroll_top(container, 10.0);
        let snap = GeometrySnapshot::capture(&mut scene, container, list, &managed);

        assert_eq!(snap.container_origin, Point::new(5.0, 50.0));
        assert_eq!(snap.scroll_top, 10.0);
        assert_eq!(snap.list_height, None);
        assert_eq!(scene.style(list, "height"), Some("75px"));
        let tops: Vec<f64> = snap.items.iter().map(|i| i.geometry.top).collect();
        assert_eq!(tops, [0.0, 25.0, 50.0]);
        assert!(snap.items.iter().all(|i| i.geometry.height == 25.0));
        assert!(snap.items[1].fixed);
        assert_eq!(snap.items[2].tmp_top, 50.0);
    }

    #[test]
    fn apply_preserves_layout_and_restore_undoes_it() {
        let mut scene = Scene::new();
        let (container, list, managed) = build(&mut scene, (2.0, 3.0));
        scene.set_style(managed[0].element, "transition", Some("color 1s"));
        let before: Vec<_> = managed
            .iter()
            .map(|m| scene.bounding_rect(m.element))
            .collect();

        let snap = GeometrySnapshot::capture(&mut scene, container, list, &managed);
        snap.apply(&mut scene, 0);
        for m in &managed[1..] {
            assert_eq!(scene.style(m.element, "position"), Some("absolute"));
            assert_eq!(
                scene.bounding_rect(m.element),
                before[m.index],
                "absolute placement matches flow placement"
            );
        }
        assert_eq!(scene.style(managed[0].element, "z-index"), Some("3"));
        assert_eq!(scene.style(managed[0].element, "top"), None);

        snap.restore(&mut scene);
        for m in &managed {
            assert_eq!(scene.style(m.element, "position"), None);
            assert_eq!(scene.style(m.element, "left"), None);
            assert_eq!(scene.style(m.element, "top"), None);
            assert_eq!(scene.style(m.element, "z-index"), None);
            assert_eq!(scene.bounding_rect(m.element), before[m.index]);
        }
        assert_eq!(
            scene.style(managed[0].element, "transition"),
            Some("color 1s")
        );
        assert_eq!(scene.style(list, "height"), None);
    }

    #[test]
    fn restore_keeps_previous_list_height() {
        let mut scene = Scene::new();
        let (container, list, managed) = build(&mut scene, (0.0, 0.0));
        scene.set_style(list, "height", Some("200px"));
        let snap = GeometrySnapshot::capture(&mut scene, container, list, &managed);
        assert_eq!(snap.list_height.as_deref(), Some("200px"));
        snap.restore(&mut scene);
        assert_eq!(scene.style(list, "height"), Some("200px"));
    }
}
