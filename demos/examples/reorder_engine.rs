// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The pure reorder engine, without any surface.
//!
//! Shows how the target index follows the dragged item's top and how the
//! reflow keeps a fixed item in place.
//!
//! Run:
//! - `cargo run -p understory_reorder_demos --example reorder_engine`

use understory_reorder::engine::{ItemState, reflow, target_index};

fn main() {
    // Five 40px rows; row 1 is fixed.
    let items: Vec<ItemState> = (0..5_u32)
        .map(|i| ItemState {
            top: f64::from(i) * 40.0,
            height: 40.0,
            fixed: i == 1,
        })
        .collect();

    let drag = 3;
    println!("dragging row {drag}");
    for drag_top in [125.0, 90.0, 30.0, -10.0, 170.0] {
        let target = target_index(&items, drag, drag_top);
        let r = reflow(&items, drag, target);
        println!(
            "  top {drag_top:>6.1} -> target {target}  order {:?}  tops {:?}",
            r.order(),
            r.tops()
        );
    }
}
