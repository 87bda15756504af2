// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: structure, styles, layout queries, listeners, and timers.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;
use kurbo::{Point, Rect};

use crate::types::{ListenerTarget, LocalNode, NodeFlags, NodeId, TimerId};

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level element scene.
pub struct Scene {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    touch: bool,
    listeners: Vec<(ListenerTarget, &'static str)>,
    now: Duration,
    next_timer: u64,
    timers: Vec<(TimerId, Duration)>,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Scene")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("touch", &self.touch)
            .field("listeners", &self.listeners.len())
            .field("now", &self.now)
            .field("timers", &self.timers.len())
            .finish_non_exhaustive()
    }
}

/// Results of a hit test.
#[derive(Clone, Debug)]
pub struct Hit {
    /// The matched node.
    pub node: NodeId,
    /// Path from root to node (inclusive).
    pub path: Vec<NodeId>,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: LocalNode,
    styles: BTreeMap<String, String>,
    scroll_top: f64,
}

impl Node {
    fn new(generation: u32, local: LocalNode) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
            styles: BTreeMap::new(),
            scroll_top: 0.0,
        }
    }
}

impl Scene {
    /// Create a new empty scene without touch support.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            touch: false,
            listeners: Vec::new(),
            now: Duration::ZERO,
            next_timer: 0,
            timers: Vec::new(),
        }
    }

    /// Create a new empty scene that reports touch support.
    pub fn with_touch() -> Self {
        Self {
            touch: true,
            ..Self::new()
        }
    }

    /// Whether this scene reports touch input support.
    pub fn supports_touch(&self) -> bool {
        self.touch
    }

    // --- structure ---

    /// Insert a new node as the last child of `parent` (or as a root if `None`).
    pub fn insert(&mut self, parent: Option<NodeId>, local: LocalNode) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.node_mut(p).children.push(id);
            self.node_mut(id).parent = Some(p);
        }
        id
    }

    /// Remove a node (and its subtree) from the scene.
    ///
    /// Listeners registered on removed nodes are dropped.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.listeners
            .retain(|(target, _)| *target != ListenerTarget::Node(id));
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Rearrange the children of `parent` so that the new child at position `i`
    /// is the old child at position `order[i]`.
    ///
    /// Returns `false` and leaves the scene untouched if `order` is not a
    /// permutation of the current child positions.
    pub fn reorder_children(&mut self, parent: NodeId, order: &[usize]) -> bool {
        let Some(node) = self.node_opt(parent) else {
            return false;
        };
        let old = &node.children;
        if order.len() != old.len() {
            return false;
        }
        let mut seen = alloc::vec![false; old.len()];
        for &i in order {
            if i >= old.len() || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        let reordered: Vec<NodeId> = order.iter().map(|&i| old[i]).collect();
        self.node_mut(parent).children = reordered;
        true
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Parent of a live node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Children of a live node in document order; empty for stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Local data of a live node.
    pub fn local(&self, id: NodeId) -> Option<&LocalNode> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// Update node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags = flags;
        }
    }

    // --- styles and classes ---

    /// Inline style value of `name`, if set.
    pub fn style(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node_opt(id)?.styles.get(name).map(String::as_str)
    }

    /// Set (`Some`) or remove (`None`) the inline style `name`.
    pub fn set_style(&mut self, id: NodeId, name: &str, value: Option<&str>) {
        if let Some(n) = self.node_opt_mut(id) {
            match value {
                Some(v) => {
                    n.styles.insert(name.into(), v.into());
                }
                None => {
                    n.styles.remove(name);
                }
            }
        }
    }

    /// Add `class` to the node's class list if it is not already present.
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(n) = self.node_opt_mut(id)
            && !n.local.classes.iter().any(|c| c == class)
        {
            n.local.classes.push(class.into());
        }
    }

    /// Remove `class` from the node's class list.
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.classes.retain(|c| c != class);
        }
    }

    /// Returns true if the node carries `class`.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.local.classes.iter().any(|c| c == class))
    }

    /// Returns true if the node matches a compound selector such as `li`,
    /// `.fixed`, `#head`, `li.fixed.pinned`, or `*`.
    ///
    /// Combinators and attribute selectors are not supported and never match.
    pub fn matches(&self, id: NodeId, selector: &str) -> bool {
        let Some(node) = self.node_opt(id) else {
            return false;
        };
        let selector = selector.trim();
        if selector.is_empty() || selector.contains([' ', '>', '+', '~', '[', ',']) {
            return false;
        }
        let local = &node.local;
        let mut rest = selector;
        let tag_end = rest.find(['.', '#']).unwrap_or(rest.len());
        let (tag, tail) = rest.split_at(tag_end);
        if !(tag.is_empty() || tag == "*" || tag.eq_ignore_ascii_case(&local.tag)) {
            return false;
        }
        rest = tail;
        while !rest.is_empty() {
            let (sigil, body) = rest.split_at(1);
            let end = body.find(['.', '#']).unwrap_or(body.len());
            let (name, tail) = body.split_at(end);
            if name.is_empty() {
                return false;
            }
            let ok = match sigil {
                "." => local.classes.iter().any(|c| c == name),
                _ => local.id.as_deref() == Some(name),
            };
            if !ok {
                return false;
            }
            rest = tail;
        }
        true
    }

    // --- scrolling and layout ---

    /// Vertical scroll offset of a node's content.
    pub fn scroll_top(&self, id: NodeId) -> f64 {
        self.node_opt(id).map(|n| n.scroll_top).unwrap_or(0.0)
    }

    /// Scroll a node's content.
    pub fn set_scroll_top(&mut self, id: NodeId, scroll_top: f64) {
        if let Some(n) = self.node_opt_mut(id) {
            n.scroll_top = scroll_top.max(0.0);
        }
    }

    /// Vertical margins `(top, bottom)` of a node.
    pub fn margins(&self, id: NodeId) -> (f64, f64) {
        self.node_opt(id)
            .map(|n| (n.local.margin_top, n.local.margin_bottom))
            .unwrap_or((0.0, 0.0))
    }

    /// Border box of a node in viewport coordinates. Stale ids yield [`Rect::ZERO`].
    pub fn bounding_rect(&self, id: NodeId) -> Rect {
        let Some(node) = self.node_opt(id) else {
            return Rect::ZERO;
        };
        let width = self.border_width(id);
        let height = self.border_height(id);
        let Some(parent) = node.parent else {
            return Rect::from_origin_size(node.local.origin, (width, height));
        };
        let origin = if self.is_absolute(id) {
            let cb = self.containing_block(id);
            let cb_rect = self.bounding_rect(cb);
            let content_top = cb_rect.y0 - self.scroll_top(cb);
            let static_origin = self.static_origin(parent, id);
            let top = self
                .style(id, "top")
                .and_then(parse_px)
                .map(|t| content_top + t + node.local.margin_top)
                .unwrap_or(static_origin.y);
            let left = self
                .style(id, "left")
                .and_then(parse_px)
                .map(|l| cb_rect.x0 + l)
                .unwrap_or(static_origin.x);
            Point::new(left, top)
        } else {
            let mut origin = self.static_origin(parent, id);
            if self.style(id, "position") == Some("relative") {
                origin.y += self.style(id, "top").and_then(parse_px).unwrap_or(0.0);
                origin.x += self.style(id, "left").and_then(parse_px).unwrap_or(0.0);
            }
            origin
        };
        Rect::from_origin_size(origin, (width, height))
    }

    /// Hit test a viewport point. Returns the topmost visible, pickable node.
    ///
    /// Nodes are ranked by inline `z-index` (falling back to
    /// [`LocalNode::z_index`]); ties go to the node painted later in document order.
    pub fn hit_test_point(&self, pt: Point) -> Option<Hit> {
        let mut order = Vec::new();
        for root in self.roots() {
            self.collect_paint_order(root, &mut order);
        }
        let mut best: Option<(NodeId, i32)> = None;
        for id in order {
            let node = self.node(id);
            if !node.local.flags.contains(NodeFlags::PICKABLE) {
                continue;
            }
            if !self.bounding_rect(id).contains(pt) {
                continue;
            }
            let z = self.z_index(id);
            match best {
                Some((_, z_best)) if z < z_best => {}
                _ => best = Some((id, z)),
            }
        }
        best.map(|(node, _)| Hit {
            node,
            path: self.path_to_root(node),
        })
    }

    // --- listeners ---

    /// Register a native listener. Registering the same pair twice keeps two entries.
    pub fn add_listener(&mut self, target: ListenerTarget, event: &'static str) {
        self.listeners.push((target, event));
    }

    /// Remove one registration of a native listener, if present.
    pub fn remove_listener(&mut self, target: ListenerTarget, event: &'static str) {
        if let Some(pos) = self
            .listeners
            .iter()
            .position(|&(t, e)| t == target && e == event)
        {
            self.listeners.remove(pos);
        }
    }

    /// Number of registrations for `event` on `target`.
    pub fn listener_count(&self, target: ListenerTarget, event: &str) -> usize {
        self.listeners
            .iter()
            .filter(|&&(t, e)| t == target && e == event)
            .count()
    }

    /// Returns true if `event` has at least one registration on `target`.
    pub fn is_listening(&self, target: ListenerTarget, event: &str) -> bool {
        self.listener_count(target, event) > 0
    }

    /// Total number of registrations on the window target.
    pub fn window_listener_count(&self) -> usize {
        self.listeners
            .iter()
            .filter(|(t, _)| *t == ListenerTarget::Window)
            .count()
    }

    // --- clock ---

    /// Current time of the virtual clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Arm a one-shot timer that expires `delay` after [`Scene::now`].
    pub fn set_timer(&mut self, delay: Duration) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        self.timers.push((id, self.now + delay));
        id
    }

    /// Disarm a timer. Unknown or expired ids are ignored.
    pub fn clear_timer(&mut self, id: TimerId) {
        self.timers.retain(|(t, _)| *t != id);
    }

    /// Number of armed timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Advance the clock by `dt` and return the timers that expired, earliest first.
    ///
    /// Expired timers are disarmed. The host delivers each returned id to
    /// whatever armed it.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerId> {
        self.now += dt;
        let now = self.now;
        let (mut expired, pending): (Vec<(TimerId, Duration)>, Vec<_>) =
            self.timers.drain(..).partition(|&(_, at)| at <= now);
        self.timers = pending;
        expired.sort_by_key(|&(id, at)| (at, id));
        expired.into_iter().map(|(id, _)| id).collect()
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn roots(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n {
                Some(n) if n.parent.is_none() =>
                {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "NodeId uses 32-bit indices by design."
                    )]
                    Some(NodeId::new(i as u32, n.generation))
                }
                _ => None,
            })
            .collect()
    }

    fn collect_paint_order(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let node = self.node(id);
        if !node.local.flags.contains(NodeFlags::VISIBLE) {
            return;
        }
        out.push(id);
        for &child in &node.children {
            self.collect_paint_order(child, out);
        }
    }

    fn path_to_root(&self, mut id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        loop {
            out.push(id);
            match self.node(id).parent {
                Some(p) => id = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    fn z_index(&self, id: NodeId) -> i32 {
        self.style(id, "z-index")
            .and_then(|z| z.trim().parse().ok())
            .unwrap_or(self.node(id).local.z_index)
    }

    fn is_absolute(&self, id: NodeId) -> bool {
        self.style(id, "position") == Some("absolute")
    }

    fn in_flow(&self, id: NodeId) -> bool {
        self.node(id).local.flags.contains(NodeFlags::VISIBLE) && !self.is_absolute(id)
    }

    /// Nearest positioned ancestor, or the root when none is positioned.
    fn containing_block(&self, id: NodeId) -> NodeId {
        let mut cur = self.node(id).parent;
        let mut last = id;
        while let Some(p) = cur {
            if matches!(self.style(p, "position"), Some("relative" | "absolute")) {
                return p;
            }
            last = p;
            cur = self.node(p).parent;
        }
        last
    }

    /// Where `id`'s border box would start if it were laid out in flow.
    fn static_origin(&self, parent: NodeId, id: NodeId) -> Point {
        let parent_rect = self.bounding_rect(parent);
        let mut y = parent_rect.y0 - self.scroll_top(parent);
        for &sibling in &self.node(parent).children {
            if sibling == id {
                break;
            }
            if self.in_flow(sibling) {
                y += self.outer_height(sibling);
            }
        }
        Point::new(parent_rect.x0, y + self.node(id).local.margin_top)
    }

    fn outer_height(&self, id: NodeId) -> f64 {
        let local = &self.node(id).local;
        local.margin_top + self.border_height(id) + local.margin_bottom
    }

    fn border_height(&self, id: NodeId) -> f64 {
        if let Some(h) = self.style(id, "height").and_then(parse_px) {
            return h;
        }
        let node = self.node(id);
        if let Some(h) = node.local.height {
            return h;
        }
        node.children
            .iter()
            .filter(|&&c| self.in_flow(c))
            .map(|&c| self.outer_height(c))
            .sum()
    }

    fn border_width(&self, id: NodeId) -> f64 {
        let node = self.node(id);
        match (node.local.width, node.parent) {
            (Some(w), _) => w,
            (None, Some(p)) => self.border_width(p),
            (None, None) => 0.0,
        }
    }
}

/// Parse a CSS pixel length such as `12px`, `-3.5px`, or `0`.
pub(crate) fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value);
    number.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
