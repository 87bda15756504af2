// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_reorder --heading-base-level=0

//! Understory Reorder: a headless, `no_std` drag-to-reorder engine for vertical lists.
//!
//! ## Overview
//!
//! A user presses on an item, drags it along the list, and releases it. The
//! other items slide out of the way while the pointer moves and everything
//! animates into its final slot on release. The host then receives the new
//! order and re-renders.
//!
//! The engine owns no elements. Everything it needs from a rendering
//! environment goes through [`ListSurface`](crate::surface::ListSurface):
//! layout reads, inline style and class writes, listener registration and
//! one-shot timers.
//!
//! ## Pieces
//!
//! - [`input`]: folds mouse and touch streams into `Down`/`Move`/`Up` and
//!   scopes listener registration.
//! - [`geometry`]: captures item geometry at drag start and switches items to
//!   absolute layout.
//! - [`engine`]: pure target-index and reflow computation.
//! - [`session`]: per-drag state, created on `Down` and dropped on cleanup.
//! - [`animation`]: the settle duration and its cancellable timers.
//! - [`list`]: [`DragList`](crate::list::DragList), the state machine tying
//!   the pieces together.
//!
//! ## Fixed items
//!
//! Items matching one of the [`ListOptions::fixed`](crate::options::ListOptions::fixed)
//! selectors keep their index in every order: they cannot be dragged, and
//! other items flow around them.
//!
//! ## Example
//!
//! The reorder decision itself is a pure function of item geometry:
//!
//! ```
//! use understory_reorder::engine::{ItemState, reflow, target_index};
//!
//! // Three 30px rows; the first one is dragged down to a top of 35.
//! let items: Vec<ItemState> = (0..3_u32)
//!     .map(|i| ItemState {
//!         top: f64::from(i) * 30.0,
//!         height: 30.0,
//!         fixed: false,
//!     })
//!     .collect();
//! let target = target_index(&items, 0, 35.0);
//! assert_eq!(target, 1);
//!
//! let r = reflow(&items, 0, target);
//! assert_eq!(r.order(), [1, 0, 2]);
//! assert_eq!(r.tops(), [30.0, 0.0, 60.0]);
//! ```
//!
//! A full host loop driving a [`DragList`](crate::list::DragList) over the
//! in-memory scene, from hit testing to applying the new order, lives in
//! `demos/examples/reorder_basics.rs`.
//!
//! ## Logging
//!
//! With the `tracing` feature, lifecycle transitions are logged at `debug` and
//! geometry capture at `trace`, under the `understory_reorder` target.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

pub mod adapters;
pub mod animation;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod input;
pub mod list;
pub mod options;
pub mod session;
pub mod surface;
pub mod types;

/// Class added to the container on initialization.
pub const CLASS_CONTAINER: &str = "reorder-list";

/// Class added to the container while a drag is in progress.
pub const CLASS_ACTIVE: &str = "reorder-list-active";

/// Class added to the dragged item while a drag is in progress.
pub const CLASS_DRAG_ELEMENT: &str = "reorder-list-element";
