// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_reorder_scene --heading-base-level=0

//! Understory Reorder Scene: an in-memory retained element scene.
//!
//! The scene stands in for a document object model when driving headless UI
//! engines such as `understory_reorder` in tests, demos, and non-browser hosts.
//!
//! - Represents a hierarchy of elements with tags, ids, classes, and inline styles.
//! - Lays boxes out with a reduced block model: children stack vertically, and
//!   `position: absolute` takes a child out of flow and places it with `top`/`left`
//!   against its nearest positioned ancestor.
//! - Answers bounding-box, hit-test, and simple selector queries.
//! - Keeps a registry of native listeners and a virtual clock with one-shot timers.
//!
//! ## Not a renderer
//!
//! Nothing is painted and transitions are not interpolated: a style write is
//! visible to the next layout query immediately.
//!
//! ## API overview
//!
//! - [`Scene`]: container managing nodes, styles, listeners, and timers.
//! - [`LocalNode`]: per-node identity and box data.
//! - [`NodeFlags`]: visibility and picking controls.
//! - [`NodeId`]: generational handle of a node.
//! - [`ListenerTarget`] and [`TimerId`]: listener and timer bookkeeping.
//!
//! ### Minimal usage
//!
//! ```
//! use understory_reorder_scene::{LocalNode, Scene};
//! use kurbo::{Point, Rect};
//!
//! let mut scene = Scene::new();
//! let list = scene.insert(
//!     None,
//!     LocalNode { origin: Point::new(0.0, 0.0), width: Some(100.0), ..Default::default() },
//! );
//! let a = scene.insert(Some(list), LocalNode::tag("li").with_height(20.0));
//! let b = scene.insert(Some(list), LocalNode::tag("li").with_height(20.0).with_class("fixed"));
//!
//! assert_eq!(scene.bounding_rect(b), Rect::new(0.0, 20.0, 100.0, 40.0));
//! assert!(scene.matches(b, "li.fixed"));
//!
//! // Take `a` out of flow; `b` moves up.
//! scene.set_style(a, "position", Some("absolute"));
//! scene.set_style(a, "top", Some("40px"));
//! assert_eq!(scene.bounding_rect(b).y0, 0.0);
//! assert_eq!(scene.hit_test_point(Point::new(5.0, 45.0)).unwrap().node, a);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod scene;
mod types;

pub use scene::{Hit, Scene};
pub use types::{ListenerTarget, LocalNode, NodeFlags, NodeId, TimerId};
