// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag lifecycle of one list.
//!
//! ## Phases
//!
//! ```text
//! Idle --down--> Pressed --move--> Dragging --up--> Finishing --settle--> Idle
//!                   |
//!                   +--up--> Idle
//! ```
//!
//! - `down` on a managed, non-fixed item captures geometry, switches items to
//!   absolute layout, binds the window listeners and fires `on_drag_start`.
//! - `move` repositions the dragged item, recomputes the target index from
//!   current layout, reflows the siblings and fires `on_drag`.
//! - `up` releases the window listeners. Without a prior `move` the drag is
//!   cleaned up at once; otherwise the dragged item animates to its slot and
//!   the settle timer is armed.
//! - The settle timer restores every touched style, fires `on_drag_complete`
//!   and, if the order changed, `on_drag_update` with the new order.
//!
//! A `down` while any session exists is ignored.
//!
//! ## Host loop
//!
//! The host owns the surface. It forwards native events to
//! [`DragList::handle_event`] (honoring the returned [`Outcome`]) and expired
//! timers to [`DragList::handle_timer`]. After applying an order update it
//! re-renders and calls [`DragList::initialize`] again.

use alloc::vec::Vec;

use crate::animation::{AnimationCoordinator, TimerKind};
use crate::geometry::GeometrySnapshot;
use crate::input::{
    Bindings, InputKind, Modality, PointerInput, PointerInputAdapter, RawPointerEvent,
};
use crate::options::ListOptions;
use crate::session::DragSession;
use crate::surface::{ListSurface, NativeEvent};
use crate::types::{DragPhase, ManagedItem, Outcome};
use crate::{CLASS_ACTIVE, CLASS_CONTAINER, CLASS_DRAG_ELEMENT};

/// A reorderable list bound to one container element.
pub struct DragList<S: ListSurface + ?Sized> {
    container: S::Element,
    options: ListOptions,
    list: Option<S::Element>,
    items: Vec<ManagedItem<S::Element>>,
    input: PointerInputAdapter<S::Element>,
    animation: AnimationCoordinator<S::Timer>,
    session: Option<DragSession<S::Element>>,
}

impl<S: ListSurface + ?Sized> core::fmt::Debug for DragList<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DragList")
            .field("container", &self.container)
            .field("list", &self.list)
            .field("items", &self.items.len())
            .field("phase", &self.phase())
            .field("bindings", &self.input.bindings())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<S: ListSurface + ?Sized> DragList<S> {
    /// Create an unbound list for `container`. Call [`DragList::initialize`] to start managing it.
    pub fn new(container: S::Element, options: ListOptions) -> Self {
        Self {
            container,
            animation: AnimationCoordinator::new(options.duration),
            options,
            list: None,
            items: Vec::new(),
            input: PointerInputAdapter::new(Modality::default()),
            session: None,
        }
    }

    /// The container element.
    pub fn container(&self) -> S::Element {
        self.container
    }

    /// Current options.
    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    /// Replace the options.
    ///
    /// Callbacks are read when they fire, so new ones apply at once, even
    /// mid-drag. Fixed selectors, the duration and the container style are
    /// read by the next [`DragList::initialize`].
    pub fn set_options(&mut self, options: ListOptions) {
        self.options = options;
    }

    /// Discover the list wrapper and its items and bind the container listeners.
    ///
    /// May be called again after the host re-renders. Pending timers are
    /// cancelled, window listeners released, and the styles of a lingering
    /// session restored without firing callbacks. A container without children
    /// is left un-managed.
    pub fn initialize(&mut self, surface: &mut S) {
        self.animation.cancel_all(surface);
        self.input.unbind_window(surface);
        if self.end_session(surface).is_some() {
            rdebug!("initialize: discarded a lingering drag");
        }

        for (name, value) in self.options.style.declarations() {
            surface.set_inline_style(self.container, &name, Some(&value));
        }
        surface.add_class(self.container, CLASS_CONTAINER);
        self.animation = AnimationCoordinator::new(self.options.duration);

        let Some(&list) = surface.children(self.container).first() else {
            rdebug!("initialize: container has no list wrapper");
            self.list = None;
            self.items.clear();
            self.input.unbind_container(surface);
            return;
        };
        self.list = Some(list);
        self.items = surface
            .children(list)
            .into_iter()
            .enumerate()
            .map(|(index, element)| ManagedItem {
                element,
                index,
                fixed: self.options.is_fixed(surface, element),
            })
            .collect();

        let modality = Modality::detect(surface);
        self.input.set_modality(surface, modality);
        self.input.bind_container(surface, self.container);
        rdebug!(
            items = self.items.len(),
            fixed = self.items.iter().filter(|m| m.fixed).count(),
            ?modality,
            "initialized"
        );
    }

    /// Stop managing the container.
    ///
    /// Unbinds every listener, cancels timers and cleans up an active drag,
    /// firing `on_drag_complete` for it. Safe to call repeatedly.
    pub fn destroy(&mut self, surface: &mut S) {
        self.input.unbind_container(surface);
        self.input.unbind_window(surface);
        self.animation.cancel_all(surface);
        if let Some(session) = self.end_session(surface) {
            self.notify_complete(session.drag_index());
        }
        self.list = None;
        self.items.clear();
    }

    /// Handle a native event routed from the host.
    pub fn handle_event(&mut self, surface: &mut S, raw: &RawPointerEvent<S::Element>) -> Outcome {
        if raw.event == NativeEvent::Click {
            return self.on_click();
        }
        let Some(input) = self.input.normalize(raw) else {
            return Outcome::Continue;
        };
        match input.kind {
            InputKind::Down => self.on_down(surface, input),
            InputKind::Move => self.on_move(surface, input),
            InputKind::Up => self.on_up(surface),
        }
    }

    /// Handle an expired timer. Returns `false` for timers this list does not own.
    pub fn handle_timer(&mut self, surface: &mut S, timer: S::Timer) -> bool {
        match self.animation.fire(timer) {
            None => false,
            Some(TimerKind::EnableTransitions) => {
                if let Some(session) = &self.session {
                    session.enable_transitions(surface, self.animation.transition());
                }
                true
            }
            Some(TimerKind::Settle) => {
                self.settle(surface);
                true
            }
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> DragPhase {
        match &self.session {
            None => DragPhase::Idle,
            Some(s) if s.is_finishing() => DragPhase::Finishing,
            Some(s) if s.is_dragging() => DragPhase::Dragging,
            Some(_) => DragPhase::Pressed,
        }
    }

    /// Returns true once the pointer has moved during the current drag, until it settles.
    pub fn is_dragging(&self) -> bool {
        self.session.as_ref().is_some_and(DragSession::is_dragging)
    }

    /// Returns true while items animate to their final offsets.
    pub fn is_finishing(&self) -> bool {
        self.session.as_ref().is_some_and(DragSession::is_finishing)
    }

    /// The active drag, if any.
    pub fn session(&self) -> Option<&DragSession<S::Element>> {
        self.session.as_ref()
    }

    /// Managed items in document order.
    pub fn items(&self) -> &[ManagedItem<S::Element>] {
        &self.items
    }

    /// Returns true if the container has a list wrapper and listeners bound.
    pub fn is_managed(&self) -> bool {
        self.list.is_some() && self.input.bindings().contains(Bindings::DOWN)
    }

    fn on_click(&self) -> Outcome {
        if self.input.bindings().contains(Bindings::CLICK) && self.is_dragging() {
            Outcome::StopAndConsume
        } else {
            Outcome::Continue
        }
    }

    fn on_down(&mut self, surface: &mut S, input: PointerInput<S::Element>) -> Outcome {
        if self.session.is_some() {
            rdebug!(phase = ?self.phase(), "down ignored: drag in progress");
            return Outcome::Continue;
        }
        let (Some(list), Some(target)) = (self.list, input.target) else {
            return Outcome::Continue;
        };
        let Some(pointer) = input.position else {
            return Outcome::Continue;
        };
        let Some(item) = self.item_containing(surface, target) else {
            return Outcome::Continue;
        };
        if item.fixed {
            rtrace!(index = item.index, "down ignored: fixed item");
            return Outcome::Continue;
        }

        let drag_index = item.index;
        let snapshot = GeometrySnapshot::capture(surface, self.container, list, &self.items);
        snapshot.apply(surface, drag_index);
        let session = DragSession::new(drag_index, pointer, snapshot);
        session.place_drag_element(surface, self.container, pointer.y);

        surface.add_class(self.container, CLASS_ACTIVE);
        surface.add_class(item.element, CLASS_DRAG_ELEMENT);
        self.input.bind_window(surface);
        self.animation.arm_enable_transitions(surface);
        self.session = Some(session);
        rdebug!(drag_index, "drag started");

        if let Some(cb) = &self.options.on_drag_start {
            cb(drag_index);
        }
        Outcome::Continue
    }

    fn on_move(&mut self, surface: &mut S, input: PointerInput<S::Element>) -> Outcome {
        let Some(session) = self.session.as_mut() else {
            return Outcome::Continue;
        };
        if session.is_finishing() {
            return Outcome::Continue;
        }
        let Some(pointer) = input.position else {
            return Outcome::PreventDefault;
        };
        session.dragging = true;
        session.place_drag_element(surface, self.container, pointer.y);
        session.update_target(surface);
        session.reflow(surface);
        let drag_index = session.drag_index();
        if let Some(cb) = &self.options.on_drag {
            cb(drag_index);
        }
        Outcome::PreventDefault
    }

    fn on_up(&mut self, surface: &mut S) -> Outcome {
        self.input.unbind_window(surface);
        let Some(session) = self.session.as_mut() else {
            return Outcome::Continue;
        };
        if !session.is_dragging() {
            self.animation.cancel_all(surface);
            if let Some(session) = self.end_session(surface) {
                rdebug!(
                    drag_index = session.drag_index(),
                    "released without moving"
                );
                self.notify_complete(session.drag_index());
            }
            return Outcome::Continue;
        }
        session.finishing = true;
        session.reflow(surface);
        session.settle_drag_element(surface, self.animation.transition());
        rdebug!(
            drag_index = session.drag_index(),
            target_index = session.target_index(),
            "released; settling"
        );
        self.animation.arm_settle(surface);
        Outcome::Continue
    }

    fn settle(&mut self, surface: &mut S) {
        self.animation.cancel_all(surface);
        let Some(session) = self.end_session(surface) else {
            return;
        };
        self.notify_complete(session.drag_index());
        if session.order_changed() {
            rdebug!(order = ?session.tmp_order(), "order updated");
            if let Some(cb) = &self.options.on_drag_update {
                cb(session.tmp_order());
            }
        }
    }

    /// Take the session out of its slot and undo everything it did to the surface.
    fn end_session(&mut self, surface: &mut S) -> Option<DragSession<S::Element>> {
        let session = self.session.take()?;
        session.restore(surface);
        surface.remove_class(self.container, CLASS_ACTIVE);
        if let Some(item) = session.drag_item() {
            surface.remove_class(item.element, CLASS_DRAG_ELEMENT);
        }
        Some(session)
    }

    fn notify_complete(&self, drag_index: usize) {
        if let Some(cb) = &self.options.on_drag_complete {
            cb(drag_index);
        }
    }

    /// The managed item that is `element` or contains it.
    fn item_containing(&self, surface: &S, element: S::Element) -> Option<ManagedItem<S::Element>> {
        let mut cur = Some(element);
        while let Some(el) = cur {
            if let Some(item) = self.items.iter().find(|m| m.element == el) {
                return Some(*item);
            }
            if el == self.container {
                return None;
            }
            cur = surface.parent(el);
        }
        None
    }
}
