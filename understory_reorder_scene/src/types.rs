// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: node identifiers, flags, and local box data.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::Point;

/// Identifier for a node in the scene.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`Scene::is_alive`](crate::Scene::is_alive) to check whether a `NodeId`
/// still refers to a live node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible (takes part in layout and hit testing).
        const VISIBLE  = 0b0000_0001;
        /// Node is pickable (participates in hit testing).
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// Local data for a node: identity for selector matching plus its box.
///
/// Boxes follow a reduced block model. Children stack vertically inside their
/// parent unless their inline `position` is `absolute`. Widths and heights of
/// `None` mean `auto`: the parent's width, and the sum of the in-flow
/// children's margin boxes respectively.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalNode {
    /// Element tag, matched by bare selectors such as `li`.
    pub tag: String,
    /// Optional element id, matched by `#id` selectors.
    pub id: Option<String>,
    /// Class list, matched by `.class` selectors.
    pub classes: Vec<String>,
    /// Explicit border-box width, or `None` for auto.
    pub width: Option<f64>,
    /// Explicit border-box height, or `None` for auto.
    pub height: Option<f64>,
    /// Top margin.
    pub margin_top: f64,
    /// Bottom margin.
    pub margin_bottom: f64,
    /// Position of a root node in viewport coordinates. Ignored for children.
    pub origin: Point,
    /// Stacking order used when no inline `z-index` is set. Higher is on top.
    pub z_index: i32,
    /// Visibility and picking flags.
    pub flags: NodeFlags,
}

impl LocalNode {
    /// A node with the given tag and otherwise default values.
    pub fn tag(tag: &str) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder-style helper adding a class.
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Builder-style helper setting an explicit height.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Builder-style helper setting vertical margins.
    pub fn with_margins(mut self, top: f64, bottom: f64) -> Self {
        self.margin_top = top;
        self.margin_bottom = bottom;
        self
    }
}

impl Default for LocalNode {
    fn default() -> Self {
        Self {
            tag: String::from("div"),
            id: None,
            classes: Vec::new(),
            width: None,
            height: None,
            margin_top: 0.0,
            margin_bottom: 0.0,
            origin: Point::ZERO,
            z_index: 0,
            flags: NodeFlags::default(),
        }
    }
}

/// Target of a native event listener.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ListenerTarget {
    /// A node in the scene.
    Node(NodeId),
    /// The global input surface, receiving events regardless of position.
    Window,
}

/// Handle for a timer armed with [`Scene::set_timer`](crate::Scene::set_timer).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub(crate) u64);
