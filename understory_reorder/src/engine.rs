// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reorder computation.
//!
//! ## Overview
//!
//! Pure functions over plain item data; nothing here touches a surface.
//!
//! - [`target_index`] decides where the dragged item would land if it were
//!   released now, from the current tops of all items.
//! - [`reflow`] builds the temporary order for that target and the vertical
//!   offset every item should move to.
//!
//! ## Target selection
//!
//! Starting from the dragged item's original index, movable items above it
//! whose top lies below the dragged top are upward candidates (the lowest index
//! wins). Movable items below it whose top lies above the dragged top are
//! downward candidates (the highest index wins). Fixed items are never
//! candidates. When both directions yield a candidate, which a consistent
//! layout does not produce, the one closer to the original index wins and an
//! equal distance goes to the downward candidate.

use alloc::vec::Vec;

/// Per-item input to the engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ItemState {
    /// Current top of the item's box, in any coordinate space shared by all items.
    pub top: f64,
    /// Margin-inclusive height.
    pub height: f64,
    /// True if the item keeps its index in every order.
    pub fixed: bool,
}

/// Result of [`reflow`].
#[derive(Clone, Debug, PartialEq)]
pub struct Reflow {
    order: Vec<usize>,
    tops: Vec<f64>,
}

impl Reflow {
    /// Original indices by new position: `order()[new] == original`.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Target offsets indexed by original index.
    pub fn tops(&self) -> &[f64] {
        &self.tops
    }

    /// Target offset of the item with original index `index`.
    pub fn top_of(&self, index: usize) -> Option<f64> {
        self.tops.get(index).copied()
    }

    /// Consume into the new order.
    pub fn into_order(self) -> Vec<usize> {
        self.order
    }
}

/// Index the dragged item would land at if released with its top at `drag_top`.
///
/// Returns `drag_index` when no item has been crossed, or when `drag_index`
/// is out of range.
pub fn target_index(items: &[ItemState], drag_index: usize, drag_top: f64) -> usize {
    if drag_index >= items.len() {
        rwarn!(
            drag_index,
            len = items.len(),
            "target_index: drag index out of range"
        );
        return drag_index;
    }
    let up = (0..drag_index)
        .filter(|&i| !items[i].fixed && drag_top < items[i].top)
        .min();
    let down = (drag_index + 1..items.len())
        .filter(|&i| !items[i].fixed && drag_top > items[i].top)
        .max();
    match (up, down) {
        (None, None) => drag_index,
        (Some(u), None) => u,
        (None, Some(d)) => d,
        (Some(u), Some(d)) => {
            rtrace!(up = u, down = d, "target_index: both directions matched");
            if drag_index - u < d - drag_index {
                u
            } else {
                d
            }
        }
    }
}

/// Temporary order and offsets with the dragged item placed at `target_index`.
///
/// Fixed items keep their original index. The dragged item goes to
/// `target_index`, and the remaining movable items fill the free positions in
/// their original relative order. Offsets accumulate item heights from `0`
/// down the new order.
///
/// A `target_index` that is out of range or names a fixed item is treated as
/// `drag_index`. An out-of-range or fixed `drag_index` yields the original order.
pub fn reflow(items: &[ItemState], drag_index: usize, target_index: usize) -> Reflow {
    let n = items.len();
    let order: Vec<usize> = if drag_index >= n || items[drag_index].fixed {
        rwarn!(
            drag_index,
            len = n,
            "reflow: invalid drag index, keeping order"
        );
        (0..n).collect()
    } else {
        let target = if target_index < n && !items[target_index].fixed {
            target_index
        } else {
            rwarn!(
                target_index,
                "reflow: invalid target index, using drag index"
            );
            drag_index
        };
        let mut movable = (0..n).filter(|&i| !items[i].fixed && i != drag_index);
        (0..n)
            .map(|slot| {
                if items[slot].fixed {
                    slot
                } else if slot == target {
                    drag_index
                } else {
                    // Free slots and remaining movable items are equal in number.
                    movable.next().unwrap_or(drag_index)
                }
            })
            .collect()
    };

    let mut tops = alloc::vec![0.0; n];
    let mut y = 0.0;
    for &index in &order {
        tops[index] = y;
        y += items[index].height;
    }
    Reflow { order, tops }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn uniform(n: usize, height: f64, fixed: &[usize]) -> Vec<ItemState> {
        (0..n)
            .map(|i| ItemState {
                top: i as f64 * height,
                height,
                fixed: fixed.contains(&i),
            })
            .collect()
    }

    fn movable_at(top: f64) -> ItemState {
        ItemState {
            top,
            height: 10.0,
            fixed: false,
        }
    }

    fn is_permutation(order: &[usize]) -> bool {
        let mut sorted = order.to_vec();
        sorted.sort_unstable();
        sorted == (0..order.len()).collect::<Vec<_>>()
    }

    #[test]
    fn no_crossing_keeps_index() {
        let items = uniform(5, 40.0, &[]);
        assert_eq!(target_index(&items, 2, 80.0), 2);
        assert_eq!(target_index(&items, 2, 95.0), 2);
        assert_eq!(target_index(&items, 2, 41.0), 2);
    }

    #[test]
    fn crossing_down_and_up() {
        let items = uniform(5, 40.0, &[]);
        assert_eq!(target_index(&items, 2, 121.0), 3);
        assert_eq!(target_index(&items, 2, 161.0), 4);
        assert_eq!(target_index(&items, 2, 39.0), 1);
        assert_eq!(target_index(&items, 2, -1.0), 0);
    }

    #[test]
    fn fixed_items_are_never_targets() {
        let items = uniform(4, 40.0, &[1]);
        // Dragging 0 past item 1 (fixed) but not past item 2.
        assert_eq!(target_index(&items, 0, 60.0), 0);
        assert_eq!(target_index(&items, 0, 81.0), 2);
        // Dragging 3 above item 1 only lands at 2 or 0.
        assert_eq!(target_index(&items, 3, 30.0), 2);
        assert_eq!(target_index(&items, 3, -5.0), 0);
    }

    #[test]
    fn conflicting_candidates_prefer_nearest() {
        // Inconsistent layout: item 0 sits below the dragged top and item 3
        // above it, so both scans match.
        let items = vec![
            movable_at(100.0),
            movable_at(10.0),
            movable_at(20.0),
            movable_at(0.0),
        ];
        assert_eq!(target_index(&items, 2, 50.0), 3, "delta 1 beats delta 2");
        let items = vec![movable_at(100.0), movable_at(10.0), movable_at(0.0)];
        assert_eq!(target_index(&items, 1, 50.0), 2, "equal delta goes down");
    }

    #[test]
    fn out_of_range_drag_index() {
        let items = uniform(2, 10.0, &[]);
        assert_eq!(target_index(&items, 7, 0.0), 7);
        assert_eq!(reflow(&items, 7, 0).order(), &[0, 1]);
    }

    #[test]
    fn reflow_moves_dragged_item_down() {
        let items = uniform(5, 40.0, &[]);
        let r = reflow(&items, 2, 3);
        assert_eq!(r.order(), &[0, 1, 3, 2, 4]);
        assert_eq!(r.tops(), &[0.0, 40.0, 120.0, 80.0, 160.0]);
        assert_eq!(r.top_of(2), Some(120.0));
        assert_eq!(r.top_of(9), None);
    }

    #[test]
    fn reflow_identity_when_target_is_origin() {
        let items = uniform(3, 10.0, &[1]);
        let r = reflow(&items, 2, 2);
        assert_eq!(r.order(), &[0, 1, 2]);
        assert_eq!(r.tops(), &[0.0, 10.0, 20.0]);
    }

    #[test]
    fn reflow_keeps_fixed_items_in_place() {
        let items = uniform(4, 40.0, &[1]);
        let r = reflow(&items, 0, 2);
        assert_eq!(r.order(), &[2, 1, 0, 3]);
        assert_eq!(r.order()[1], 1);

        let items = uniform(6, 10.0, &[0, 3]);
        let r = reflow(&items, 5, 1);
        assert_eq!(r.order(), &[0, 5, 1, 3, 2, 4]);
    }

    #[test]
    fn reflow_rejects_fixed_target() {
        let items = uniform(3, 10.0, &[1]);
        assert_eq!(reflow(&items, 0, 1).order(), &[0, 1, 2]);
        assert_eq!(reflow(&items, 1, 0).order(), &[0, 1, 2], "fixed drag index");
    }

    #[test]
    fn orders_are_permutations_with_monotonic_offsets() {
        let heights = [12.0, 30.0, 7.5, 40.0, 21.0, 9.0, 16.0];
        for fixed in [&[][..], &[0][..], &[3][..], &[1, 5][..], &[0, 6][..]] {
            let items: Vec<ItemState> = heights
                .iter()
                .enumerate()
                .map(|(i, &height)| ItemState {
                    top: 0.0,
                    height,
                    fixed: fixed.contains(&i),
                })
                .collect();
            for drag in (0..items.len()).filter(|i| !fixed.contains(i)) {
                for target in (0..items.len()).filter(|i| !fixed.contains(i)) {
                    let r = reflow(&items, drag, target);
                    let order = r.order();
                    assert!(is_permutation(order), "{order:?}");
                    assert_eq!(order[target], drag);
                    for &f in fixed {
                        assert_eq!(order[f], f, "fixed index {f} moved");
                    }
                    let mut expected = 0.0;
                    for &index in order {
                        assert_eq!(r.tops()[index], expected);
                        expected += items[index].height;
                    }
                }
            }
        }
    }
}
