// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input normalization and scoped listener registration.
//!
//! ## Overview
//!
//! Mouse and touch streams are folded into one vocabulary of
//! [`InputKind::Down`], [`InputKind::Move`], and [`InputKind::Up`]. The
//! [`Modality`] is chosen once per initialization by asking the surface whether
//! it delivers touch events; raw events of the other modality are dropped.
//!
//! `Down` (and `click`, for click suppression) is heard on the container.
//! `Move` and `Up` are heard on the window, and only while a drag is active, so
//! the drag keeps tracking when the pointer leaves the list. For touch, `Up`
//! also covers `touchcancel`.
//!
//! [`PointerInputAdapter`] records what it has registered in [`Bindings`], so
//! binding twice never registers twice and unbinding is always safe.

use alloc::vec::Vec;
use kurbo::Point;

use crate::surface::{EventTarget, ListSurface, NativeEvent};

/// Input modality of the host environment.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Modality {
    /// Mouse events.
    #[default]
    Mouse,
    /// Touch events.
    Touch,
}

impl Modality {
    /// Feature-detect the modality from the surface.
    pub fn detect<S: ListSurface + ?Sized>(surface: &S) -> Self {
        if surface.supports_touch() {
            Self::Touch
        } else {
            Self::Mouse
        }
    }

    /// Native events that make up `kind` in this modality.
    pub const fn native_events(self, kind: InputKind) -> &'static [NativeEvent] {
        match (self, kind) {
            (Self::Mouse, InputKind::Down) => &[NativeEvent::MouseDown],
            (Self::Mouse, InputKind::Move) => &[NativeEvent::MouseMove],
            (Self::Mouse, InputKind::Up) => &[NativeEvent::MouseUp],
            (Self::Touch, InputKind::Down) => &[NativeEvent::TouchStart],
            (Self::Touch, InputKind::Move) => &[NativeEvent::TouchMove],
            (Self::Touch, InputKind::Up) => &[NativeEvent::TouchEnd, NativeEvent::TouchCancel],
        }
    }

    /// Classify a native event, or `None` if it is not part of this modality's vocabulary.
    pub fn classify(self, event: NativeEvent) -> Option<InputKind> {
        [InputKind::Down, InputKind::Move, InputKind::Up]
            .into_iter()
            .find(|&kind| self.native_events(kind).contains(&event))
    }
}

/// Normalized pointer vocabulary.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InputKind {
    /// Press on the container.
    Down,
    /// Motion while a drag is active.
    Move,
    /// Release or cancellation.
    Up,
}

/// A native pointer event as delivered by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct RawPointerEvent<E> {
    /// Native event type.
    pub event: NativeEvent,
    /// Element the event was dispatched to, if any.
    pub target: Option<E>,
    /// Client position for mouse events.
    pub client: Point,
    /// Active touch points for touch events, first one primary.
    pub touches: Vec<Point>,
}

impl<E> RawPointerEvent<E> {
    /// A mouse (or click) event at `client`.
    pub fn mouse(event: NativeEvent, target: Option<E>, client: Point) -> Self {
        Self {
            event,
            target,
            client,
            touches: Vec::new(),
        }
    }

    /// A touch event with the given active touch points.
    pub fn touch(event: NativeEvent, target: Option<E>, touches: Vec<Point>) -> Self {
        Self {
            event,
            target,
            client: touches.first().copied().unwrap_or(Point::ZERO),
            touches,
        }
    }

    /// Pointer position: the first touch for touch events, the client position otherwise.
    ///
    /// `None` for touch events without active touches (e.g. `touchend`).
    pub fn position(&self) -> Option<Point> {
        if self.event.is_touch() {
            self.touches.first().copied()
        } else {
            Some(self.client)
        }
    }
}

/// A pointer event in the normalized vocabulary.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerInput<E> {
    /// Normalized kind.
    pub kind: InputKind,
    /// Pointer position, when the native event carries one.
    pub position: Option<Point>,
    /// Element the event was dispatched to, if any.
    pub target: Option<E>,
}

bitflags::bitflags! {
    /// Listener groups currently registered by a [`PointerInputAdapter`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Bindings: u8 {
        /// `Down` on the container.
        const DOWN  = 0b0000_0001;
        /// `click` on the container.
        const CLICK = 0b0000_0010;
        /// `Move` on the window.
        const MOVE  = 0b0000_0100;
        /// `Up` on the window.
        const UP    = 0b0000_1000;
    }
}

impl Bindings {
    /// Groups bound on the container for the list's lifetime.
    pub const CONTAINER: Self = Self::DOWN.union(Self::CLICK);
    /// Groups bound on the window for a drag's lifetime.
    pub const WINDOW: Self = Self::MOVE.union(Self::UP);
}

/// Window listener groups and the input kinds they carry.
const WINDOW_GROUPS: [(Bindings, InputKind); 2] = [
    (Bindings::MOVE, InputKind::Move),
    (Bindings::UP, InputKind::Up),
];

/// Normalizes native pointer events and owns listener registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointerInputAdapter<E> {
    modality: Modality,
    container: Option<E>,
    bound: Bindings,
}

impl<E: Copy + Eq> PointerInputAdapter<E> {
    /// Create an adapter with nothing bound.
    pub fn new(modality: Modality) -> Self {
        Self {
            modality,
            container: None,
            bound: Bindings::empty(),
        }
    }

    /// Active modality.
    pub fn modality(&self) -> Modality {
        self.modality
    }

    /// Listener groups currently registered.
    pub fn bindings(&self) -> Bindings {
        self.bound
    }

    /// Returns true while the window-level `Move`/`Up` listeners are registered.
    pub fn is_window_bound(&self) -> bool {
        self.bound.intersects(Bindings::WINDOW)
    }

    /// Switch modality. Everything bound under the old modality is released first.
    pub fn set_modality<S>(&mut self, surface: &mut S, modality: Modality)
    where
        S: ListSurface<Element = E> + ?Sized,
    {
        if modality == self.modality {
            return;
        }
        let container = self.container;
        let rebind_container = self.bound.intersects(Bindings::CONTAINER);
        let rebind_window = self.is_window_bound();
        self.unbind_window(surface);
        self.unbind_container(surface);
        self.modality = modality;
        if let (true, Some(c)) = (rebind_container, container) {
            self.bind_container(surface, c);
        }
        if rebind_window {
            self.bind_window(surface);
        }
    }

    /// Register `Down` and `click` on `container`.
    ///
    /// Binding a different container releases the previous one.
    pub fn bind_container<S>(&mut self, surface: &mut S, container: E)
    where
        S: ListSurface<Element = E> + ?Sized,
    {
        if self.container != Some(container) {
            self.unbind_container(surface);
        }
        self.container = Some(container);
        let target = EventTarget::Element(container);
        if !self.bound.contains(Bindings::DOWN) {
            for &event in self.modality.native_events(InputKind::Down) {
                surface.add_listener(target, event);
            }
            self.bound.insert(Bindings::DOWN);
        }
        if !self.bound.contains(Bindings::CLICK) {
            surface.add_listener(target, NativeEvent::Click);
            self.bound.insert(Bindings::CLICK);
        }
    }

    /// Release the container listeners, if bound.
    pub fn unbind_container<S>(&mut self, surface: &mut S)
    where
        S: ListSurface<Element = E> + ?Sized,
    {
        let Some(container) = self.container else {
            return;
        };
        let target = EventTarget::Element(container);
        if self.bound.contains(Bindings::DOWN) {
            for &event in self.modality.native_events(InputKind::Down) {
                surface.remove_listener(target, event);
            }
        }
        if self.bound.contains(Bindings::CLICK) {
            surface.remove_listener(target, NativeEvent::Click);
        }
        self.bound.remove(Bindings::CONTAINER);
    }

    /// Register `Move` and `Up` on the window.
    pub fn bind_window<S>(&mut self, surface: &mut S)
    where
        S: ListSurface<Element = E> + ?Sized,
    {
        for (flag, kind) in WINDOW_GROUPS {
            if self.bound.contains(flag) {
                continue;
            }
            for &event in self.modality.native_events(kind) {
                surface.add_listener(EventTarget::Window, event);
            }
            self.bound.insert(flag);
        }
    }

    /// Release the window listeners, if bound.
    pub fn unbind_window<S>(&mut self, surface: &mut S)
    where
        S: ListSurface<Element = E> + ?Sized,
    {
        for (flag, kind) in WINDOW_GROUPS {
            if !self.bound.contains(flag) {
                continue;
            }
            for &event in self.modality.native_events(kind) {
                surface.remove_listener(EventTarget::Window, event);
            }
            self.bound.remove(flag);
        }
    }

    /// Translate a native event into the normalized vocabulary.
    ///
    /// Returns `None` for `click`, for events of the other modality, and for
    /// window events that arrive while the window listeners are not bound.
    pub fn normalize(&self, raw: &RawPointerEvent<E>) -> Option<PointerInput<E>> {
        let kind = self.modality.classify(raw.event)?;
        let required = match kind {
            InputKind::Down => Bindings::DOWN,
            InputKind::Move => Bindings::MOVE,
            InputKind::Up => Bindings::UP,
        };
        if !self.bound.contains(required) {
            return None;
        }
        Some(PointerInput {
            kind,
            position: raw.position(),
            target: raw.target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use understory_reorder_scene::{ListenerTarget, LocalNode, NodeId, Scene};

    fn setup(touch: bool) -> (Scene, NodeId, PointerInputAdapter<NodeId>) {
        let mut scene = if touch {
            Scene::with_touch()
        } else {
            Scene::new()
        };
        let container = scene.insert(None, LocalNode::default());
        let adapter = PointerInputAdapter::new(Modality::detect(&scene));
        (scene, container, adapter)
    }

    #[test]
    fn detects_modality_from_surface() {
        assert_eq!(Modality::detect(&Scene::new()), Modality::Mouse);
        assert_eq!(Modality::detect(&Scene::with_touch()), Modality::Touch);
    }

    #[test]
    fn classify_maps_vocabulary() {
        assert_eq!(
            Modality::Mouse.classify(NativeEvent::MouseDown),
            Some(InputKind::Down)
        );
        assert_eq!(Modality::Mouse.classify(NativeEvent::TouchStart), None);
        assert_eq!(
            Modality::Touch.classify(NativeEvent::TouchCancel),
            Some(InputKind::Up)
        );
        assert_eq!(Modality::Touch.classify(NativeEvent::Click), None);
    }

    #[test]
    fn binding_is_not_duplicated() {
        let (mut scene, container, mut adapter) = setup(false);
        adapter.bind_container(&mut scene, container);
        adapter.bind_container(&mut scene, container);
        adapter.bind_window(&mut scene);
        adapter.bind_window(&mut scene);
        let node = ListenerTarget::Node(container);
        assert_eq!(scene.listener_count(node, "mousedown"), 1);
        assert_eq!(scene.listener_count(node, "click"), 1);
        assert_eq!(scene.listener_count(ListenerTarget::Window, "mousemove"), 1);
        assert_eq!(scene.listener_count(ListenerTarget::Window, "mouseup"), 1);

        adapter.unbind_window(&mut scene);
        adapter.unbind_window(&mut scene);
        assert_eq!(scene.window_listener_count(), 0);
        assert!(!adapter.is_window_bound());
        adapter.unbind_container(&mut scene);
        assert!(!scene.is_listening(node, "mousedown"));
        assert_eq!(adapter.bindings(), Bindings::empty());
    }

    #[test]
    fn touch_up_includes_cancel() {
        let (mut scene, _, mut adapter) = setup(true);
        adapter.bind_window(&mut scene);
        assert!(scene.is_listening(ListenerTarget::Window, "touchmove"));
        assert!(scene.is_listening(ListenerTarget::Window, "touchend"));
        assert!(scene.is_listening(ListenerTarget::Window, "touchcancel"));
        assert!(!scene.is_listening(ListenerTarget::Window, "mouseup"));

        let cancel = RawPointerEvent::<NodeId>::touch(NativeEvent::TouchCancel, None, vec![]);
        let input = adapter.normalize(&cancel).unwrap();
        assert_eq!(input.kind, InputKind::Up);
        assert_eq!(input.position, None);
    }

    #[test]
    fn normalize_requires_binding_and_modality() {
        let (mut scene, container, mut adapter) = setup(false);
        let down = RawPointerEvent::mouse(
            NativeEvent::MouseDown,
            Some(container),
            Point::new(3.0, 4.0),
        );
        assert!(adapter.normalize(&down).is_none(), "not bound yet");
        adapter.bind_container(&mut scene, container);
        let input = adapter.normalize(&down).unwrap();
        assert_eq!(input.kind, InputKind::Down);
        assert_eq!(input.position, Some(Point::new(3.0, 4.0)));
        assert_eq!(input.target, Some(container));

        let touch = RawPointerEvent::touch(
            NativeEvent::TouchStart,
            Some(container),
            vec![Point::new(1.0, 1.0)],
        );
        assert!(adapter.normalize(&touch).is_none(), "other modality");

        let mv = RawPointerEvent::mouse(NativeEvent::MouseMove, None, Point::ZERO);
        assert!(adapter.normalize(&mv).is_none(), "window not bound");
    }

    #[test]
    fn touch_position_uses_first_touch() {
        let ev = RawPointerEvent::<NodeId>::touch(
            NativeEvent::TouchMove,
            None,
            vec![Point::new(5.0, 6.0), Point::new(50.0, 60.0)],
        );
        assert_eq!(ev.position(), Some(Point::new(5.0, 6.0)));
    }

    #[test]
    fn switching_modality_rebinds() {
        let (mut scene, container, mut adapter) = setup(false);
        adapter.bind_container(&mut scene, container);
        adapter.set_modality(&mut scene, Modality::Touch);
        let node = ListenerTarget::Node(container);
        assert!(!scene.is_listening(node, "mousedown"));
        assert_eq!(scene.listener_count(node, "touchstart"), 1);
        assert_eq!(scene.listener_count(node, "click"), 1);
    }
}
