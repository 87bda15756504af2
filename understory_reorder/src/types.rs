// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types shared across the engine: handler outcomes, phases, and managed items.

/// What the host should do with the native event after the engine handled it.
///
/// Returned by [`DragList::handle_event`](crate::list::DragList::handle_event).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Let the event continue with its default behavior.
    Continue,
    /// Prevent the default action (e.g. scrolling while a finger drags).
    PreventDefault,
    /// Stop propagation and prevent the default action (e.g. a click ending a drag).
    StopAndConsume,
}

/// Lifecycle phase of a [`DragList`](crate::list::DragList).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DragPhase {
    /// No session.
    Idle,
    /// A session exists but the pointer has not moved since `Down`.
    Pressed,
    /// The pointer has moved at least once.
    Dragging,
    /// Released; items are animating to their final offsets.
    Finishing,
}

/// An element under the list's management, discovered at initialization.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ManagedItem<E> {
    /// Host element handle.
    pub element: E,
    /// Position among the list wrapper's children.
    pub index: usize,
    /// True if the element matched one of the fixed selectors.
    pub fixed: bool,
}
