// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle predicates shared by the index and the embedder.
//!
//! Bounding boxes are [`kurbo::Rect`] values treated as half-open regions:
//! two rectangles that only share an edge do not overlap, and a rectangle
//! with zero width or height overlaps nothing. Float inputs are assumed to be
//! finite (no NaNs).

use alloc::vec::Vec;

use kurbo::Rect;

/// Returns `true` if the interiors of `a` and `b` overlap.
///
/// Both rectangles must be normalized (`x0 <= x1`, `y0 <= y1`). An empty
/// rectangle has no interior and overlaps nothing, not even itself.
#[inline]
#[must_use]
pub fn overlaps(a: Rect, b: Rect) -> bool {
    !a.is_zero_area()
        && !b.is_zero_area()
        && a.x0 < b.x1
        && b.x0 < a.x1
        && a.y0 < b.y1
        && b.y0 < a.y1
}

/// Returns the smallest rectangle containing every rectangle in `rects`, or
/// `None` if `rects` is empty.
#[must_use]
pub fn union_all(rects: &[Rect]) -> Option<Rect> {
    let (first, rest) = rects.split_first()?;
    Some(rest.iter().fold(*first, |acc, r| acc.union(*r)))
}

/// Merges overlapping rectangles until the set is pairwise disjoint.
///
/// Each input rectangle is joined with every already-merged rectangle it
/// overlaps; the joined box may then swallow further entries, so the scan
/// repeats until it finds nothing left to absorb. The output covers every
/// input rectangle and no two output rectangles overlap.
#[must_use]
pub fn merge_overlapping(rects: impl IntoIterator<Item = Rect>) -> Vec<Rect> {
    let mut merged: Vec<Rect> = Vec::new();
    for rect in rects {
        let mut current = rect;
        while let Some(pos) = merged.iter().position(|m| overlaps(*m, current)) {
            current = current.union(merged.swap_remove(pos));
        }
        merged.push(current);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(!overlaps(a, b));
        assert!(!overlaps(b, a));
    }

    #[test]
    fn zero_area_rect_overlaps_nothing() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let line = Rect::new(5.0, 0.0, 5.0, 10.0);
        assert!(!overlaps(a, line));
        assert!(!overlaps(line, a));
        assert!(!overlaps(line, line));
        assert!(!overlaps(Rect::new(3.0, 3.0, 3.0, 3.0), a));
    }

    #[test]
    fn union_all_of_empty_is_none() {
        assert_eq!(union_all(&[]), None);
        assert_eq!(
            union_all(&[
                Rect::new(0.0, 0.0, 1.0, 1.0),
                Rect::new(4.0, 5.0, 6.0, 7.0)
            ]),
            Some(Rect::new(0.0, 0.0, 6.0, 7.0))
        );
    }

    #[test]
    fn merge_chains_through_bridging_rect() {
        // `a` and `c` are disjoint until `b` joins them.
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let c = Rect::new(20.0, 0.0, 30.0, 10.0);
        let b = Rect::new(5.0, 0.0, 25.0, 10.0);
        let merged = merge_overlapping([a, c, b]);
        assert_eq!(merged, [Rect::new(0.0, 0.0, 30.0, 10.0)]);
    }

    #[test]
    fn merge_output_is_pairwise_disjoint() {
        let rects = [
            Rect::new(0.0, 0.0, 4.0, 4.0),
            Rect::new(3.0, 3.0, 8.0, 8.0),
            Rect::new(20.0, 20.0, 24.0, 24.0),
            Rect::new(7.0, 0.0, 9.0, 2.0),
            Rect::new(22.0, 0.0, 23.0, 1.0),
        ];
        let merged = merge_overlapping(rects);
        for (i, a) in merged.iter().enumerate() {
            for b in &merged[i + 1..] {
                assert!(!overlaps(*a, *b), "{a:?} overlaps {b:?}");
            }
        }
        for r in rects {
            assert!(
                merged.iter().any(|m| m.union(r) == *m),
                "{r:?} is not covered"
            );
        }
    }
}
