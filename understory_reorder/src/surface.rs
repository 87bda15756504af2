// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host surface the engine reads layout from and writes styles to.
//!
//! ## Overview
//!
//! The engine never owns elements. Everything it needs from a rendering
//! environment goes through [`ListSurface`]: element structure, synchronous
//! layout reads, inline style and class writes, native listener registration,
//! and one-shot timers. A browser binding, a retained scene such as
//! `understory_reorder_scene`, or a test double can all implement it.

use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;
use kurbo::Rect;

/// Inline style properties the engine snapshots, writes, and restores.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum StyleProperty {
    /// `position`.
    Position,
    /// `left`.
    Left,
    /// `top`.
    Top,
    /// `transition`.
    Transition,
    /// `z-index`.
    ZIndex,
    /// `height`.
    Height,
}

impl StyleProperty {
    /// CSS property name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Left => "left",
            Self::Top => "top",
            Self::Transition => "transition",
            Self::ZIndex => "z-index",
            Self::Height => "height",
        }
    }
}

/// Native input events the engine listens for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NativeEvent {
    /// `mousedown`.
    MouseDown,
    /// `mousemove`.
    MouseMove,
    /// `mouseup`.
    MouseUp,
    /// `touchstart`.
    TouchStart,
    /// `touchmove`.
    TouchMove,
    /// `touchend`.
    TouchEnd,
    /// `touchcancel`.
    TouchCancel,
    /// `click`.
    Click,
}

impl NativeEvent {
    /// DOM event type name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::MouseDown => "mousedown",
            Self::MouseMove => "mousemove",
            Self::MouseUp => "mouseup",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
            Self::TouchCancel => "touchcancel",
            Self::Click => "click",
        }
    }

    /// Returns true for the `touch*` family.
    pub const fn is_touch(self) -> bool {
        matches!(
            self,
            Self::TouchStart | Self::TouchMove | Self::TouchEnd | Self::TouchCancel
        )
    }
}

/// Where a native listener is attached.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventTarget<E> {
    /// An element, typically the list container.
    Element(E),
    /// The global input surface, so drags keep tracking outside the list.
    Window,
}

/// Host services required by [`DragList`](crate::list::DragList).
///
/// Layout reads must reflect every style write made before them; the reorder
/// decision depends on current, not cached, positions.
pub trait ListSurface {
    /// Non-owning element handle.
    type Element: Copy + Eq + core::fmt::Debug;
    /// Handle of an armed one-shot timer.
    type Timer: Copy + Eq + core::fmt::Debug;

    /// Children of `element` in document order.
    fn children(&self, element: Self::Element) -> Vec<Self::Element>;

    /// Parent of `element`, if any.
    fn parent(&self, element: Self::Element) -> Option<Self::Element>;

    /// Border box of `element` in viewport coordinates.
    fn bounding_rect(&self, element: Self::Element) -> Rect;

    /// Vertical margins `(top, bottom)` of `element`.
    fn vertical_margins(&self, element: Self::Element) -> (f64, f64);

    /// Vertical scroll offset of `element`'s content.
    fn scroll_top(&self, element: Self::Element) -> f64;

    /// Inline style value of `name` on `element`, if set.
    fn inline_style(&self, element: Self::Element, name: &str) -> Option<String>;

    /// Set (`Some`) or clear (`None`) the inline style `name` on `element`.
    fn set_inline_style(&mut self, element: Self::Element, name: &str, value: Option<&str>);

    /// Add `class` to `element`.
    fn add_class(&mut self, element: Self::Element, class: &str);

    /// Remove `class` from `element`.
    fn remove_class(&mut self, element: Self::Element, class: &str);

    /// Returns true if `element` matches `selector`.
    fn matches(&self, element: Self::Element, selector: &str) -> bool;

    /// Returns true if the environment delivers touch events.
    fn supports_touch(&self) -> bool;

    /// Register a native listener that routes `event` to the engine.
    fn add_listener(&mut self, target: EventTarget<Self::Element>, event: NativeEvent);

    /// Remove a listener added with [`ListSurface::add_listener`].
    fn remove_listener(&mut self, target: EventTarget<Self::Element>, event: NativeEvent);

    /// Arm a one-shot timer. A zero delay means "on the next tick".
    fn set_timer(&mut self, delay: Duration) -> Self::Timer;

    /// Disarm a timer. Unknown or expired handles are ignored.
    fn clear_timer(&mut self, timer: Self::Timer);
}

/// Typed helpers over the string-keyed style API.
pub(crate) trait SurfaceExt: ListSurface {
    fn style(&self, element: Self::Element, prop: StyleProperty) -> Option<String> {
        self.inline_style(element, prop.name())
    }

    fn set_style(&mut self, element: Self::Element, prop: StyleProperty, value: Option<&str>) {
        self.set_inline_style(element, prop.name(), value);
    }

    fn set_px(&mut self, element: Self::Element, prop: StyleProperty, value: f64) {
        let px = alloc::format!("{value}px");
        self.set_inline_style(element, prop.name(), Some(&px));
    }
}

impl<S: ListSurface + ?Sized> SurfaceExt for S {}
