// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region-overlap queries.

use alloc::vec::Vec;

use kurbo::Rect;

use super::{BoundedVolumeIndex, Branch, BranchKind};
use crate::geometry::{merge_overlapping, overlaps};

impl BoundedVolumeIndex {
    /// Returns the payload ids of every draw operation whose box overlaps
    /// `query`, in ascending id order.
    #[must_use]
    pub fn search(&self, query: Rect) -> Vec<u32> {
        let mut results = Vec::new();
        if let Some(root) = self.root {
            self.search_branch(&root, query.abs(), &mut results);
        }
        results
    }

    /// Returns a pairwise-disjoint set of rectangles covering the boxes of
    /// every draw operation that overlaps `query`.
    ///
    /// Overlapping boxes are merged into their union, so each output
    /// rectangle bounds one cluster of mutually overlapping draw operations.
    /// Disjoint boxes stay separate. The result is what must be carved out of
    /// a surface to exclude the drawn content, which is usually much less
    /// than `query` itself. Rectangles are not clipped to `query`.
    ///
    /// Each cluster is replaced by its bounding box, so the covered area is
    /// at least the union of the hit boxes and equals it only when every
    /// cluster fills its own bounding box (a single box, or boxes nested in
    /// one of them). An L-shaped pair of boxes, for example, is carved as
    /// the full rectangle around it.
    #[must_use]
    pub fn search_non_overlapping_drawn_rects(&self, query: Rect) -> Vec<Rect> {
        merge_overlapping(
            self.search(query)
                .into_iter()
                .map(|id| self.op_bounds[id as usize]),
        )
    }

    fn search_branch(&self, branch: &Branch, query: Rect, results: &mut Vec<u32>) {
        if !overlaps(branch.bounds, query) {
            return;
        }
        match branch.kind {
            BranchKind::Leaf(id) => results.push(id),
            BranchKind::Subtree(idx) => {
                let node = self.nodes[idx as usize];
                for child in self.children(&node) {
                    self.search_branch(child, query, results);
                }
            }
        }
    }
}
