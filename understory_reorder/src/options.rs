// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration for a [`DragList`](crate::list::DragList).

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::animation::AnimationDuration;
use crate::surface::ListSurface;

/// A lifecycle callback receiving the dragged item's original index.
pub type IndexCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// Callback receiving the new order: `order[new_position] == original_index`.
pub type OrderCallback = Arc<dyn Fn(&[usize]) + Send + Sync>;

/// Declarations applied to the container when it is not styled by default.
const DEFAULT_CONTAINER_STYLE: [(&str, &str); 5] = [
    ("position", "relative"),
    ("overflow-x", "hidden"),
    ("overflow-y", "auto"),
    ("width", "100%"),
    ("height", "100%"),
];

/// Inline styling applied to the container on initialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContainerStyle {
    /// The default declarations, with these `(property, value)` overrides merged in.
    Default(Vec<(String, String)>),
    /// Leave the container's inline style alone.
    None,
}

impl Default for ContainerStyle {
    fn default() -> Self {
        Self::Default(Vec::new())
    }
}

impl ContainerStyle {
    /// Resolved declarations in application order.
    ///
    /// An override of a default property replaces it in place; other overrides
    /// follow the defaults.
    pub fn declarations(&self) -> Vec<(String, String)> {
        let Self::Default(overrides) = self else {
            return Vec::new();
        };
        let mut out: Vec<(String, String)> = DEFAULT_CONTAINER_STYLE
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (name, value) in overrides {
            match out.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => slot.1.clone_from(value),
                None => out.push((name.clone(), value.clone())),
            }
        }
        out
    }
}

/// Options for a [`DragList`](crate::list::DragList).
///
/// Cheap to clone: callbacks are stored in `Arc`s.
#[derive(Clone, Default)]
pub struct ListOptions {
    /// Selectors naming items that never move.
    pub fixed: Vec<String>,
    /// Settle animation length.
    pub duration: AnimationDuration,
    /// Container styling.
    pub style: ContainerStyle,
    /// Fired when a drag starts.
    pub on_drag_start: Option<IndexCallback>,
    /// Fired after every processed move.
    pub on_drag: Option<IndexCallback>,
    /// Fired when a drag has been cleaned up.
    pub on_drag_complete: Option<IndexCallback>,
    /// Fired after completion when the order changed.
    pub on_drag_update: Option<OrderCallback>,
}

impl ListOptions {
    /// Options with defaults: no fixed items, 300 ms, default container style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a selector for fixed items.
    pub fn with_fixed(mut self, selector: impl Into<String>) -> Self {
        self.fixed.push(selector.into());
        self
    }

    /// Set the settle duration (milliseconds, a [`core::time::Duration`], or a parsed string).
    pub fn with_duration(mut self, duration: impl Into<AnimationDuration>) -> Self {
        self.duration = duration.into();
        self
    }

    /// Set the container styling.
    pub fn with_style(mut self, style: ContainerStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the drag-start callback.
    pub fn on_drag_start(mut self, f: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_drag_start = Some(Arc::new(f));
        self
    }

    /// Set the per-move callback.
    pub fn on_drag(mut self, f: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_drag = Some(Arc::new(f));
        self
    }

    /// Set the completion callback.
    pub fn on_drag_complete(mut self, f: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_drag_complete = Some(Arc::new(f));
        self
    }

    /// Set the order-update callback.
    pub fn on_drag_update(mut self, f: impl Fn(&[usize]) + Send + Sync + 'static) -> Self {
        self.on_drag_update = Some(Arc::new(f));
        self
    }

    /// Returns true if `element` matches any fixed selector.
    pub fn is_fixed<S: ListSurface + ?Sized>(&self, surface: &S, element: S::Element) -> bool {
        self.fixed.iter().any(|sel| surface.matches(element, sel))
    }
}

impl core::fmt::Debug for ListOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListOptions")
            .field("fixed", &self.fixed)
            .field("duration", &self.duration)
            .field("style", &self.style)
            .field("on_drag_start", &self.on_drag_start.is_some())
            .field("on_drag", &self.on_drag.is_some())
            .field("on_drag_complete", &self.on_drag_complete.is_some())
            .field("on_drag_update", &self.on_drag_update.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec;
    use core::time::Duration;
    use understory_reorder_scene::{LocalNode, Scene};

    #[test]
    fn default_style_declarations() {
        let decls = ContainerStyle::default().declarations();
        assert_eq!(decls.len(), 5);
        assert_eq!(decls[0], ("position".into(), "relative".into()));
        assert_eq!(decls[2], ("overflow-y".into(), "auto".into()));
        assert!(ContainerStyle::None.declarations().is_empty());
    }

    #[test]
    fn overrides_merge_into_defaults() {
        let style = ContainerStyle::Default(vec![
            ("height".into(), "300px".into()),
            ("background".into(), "white".into()),
        ]);
        let decls = style.declarations();
        assert_eq!(decls.len(), 6);
        assert_eq!(decls[4], ("height".into(), "300px".into()));
        assert_eq!(decls[5], ("background".into(), "white".into()));
    }

    #[test]
    fn builder_sets_fields() {
        let opts = ListOptions::new()
            .with_fixed(".fixed")
            .with_fixed("#header")
            .with_duration(Duration::from_millis(120))
            .on_drag_complete(|_| {});
        assert_eq!(opts.fixed, [".fixed", "#header"]);
        assert_eq!(opts.duration, AnimationDuration::from_millis(120));
        assert!(opts.on_drag_complete.is_some());
        assert!(opts.on_drag_update.is_none());
        let dbg = format!("{opts:?}");
        assert!(dbg.contains("on_drag_complete: true"));
    }

    #[test]
    fn fixed_selectors_use_surface_matching() {
        let mut scene = Scene::new();
        let a = scene.insert(None, LocalNode::tag("li").with_class("fixed"));
        let b = scene.insert(None, LocalNode::tag("li"));
        let opts = ListOptions::new().with_fixed(".fixed");
        assert!(opts.is_fixed(&scene, a));
        assert!(!opts.is_fixed(&scene, b));
        assert!(!ListOptions::new().is_fixed(&scene, a));
    }
}
