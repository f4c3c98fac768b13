// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sequential bulk packing.

use alloc::vec::Vec;

use kurbo::Rect;

use super::{BoundedVolumeIndex, Branch, BranchKind, MAX_CHILDREN, MIN_CHILDREN, Node};
use crate::geometry::union_all;

impl BoundedVolumeIndex {
    /// Builds an index over `boxes`, one per draw operation.
    ///
    /// The payload id of each box is its position in the iterator. Boxes are
    /// normalized before insertion. An empty input yields an empty index with
    /// depth 0.
    ///
    /// Packing is sequential: each level is split into consecutive groups of
    /// at most [`MAX_CHILDREN`] branches, every group becomes one node, and
    /// the resulting node branches are packed again until a single root
    /// remains. A short final group borrows from its predecessor so that it
    /// holds at least [`MIN_CHILDREN`] branches.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "payload ids are u32; a display list never nears 2^32 operations"
    )]
    pub fn build(boxes: impl IntoIterator<Item = Rect>) -> Self {
        let op_bounds: Vec<Rect> = boxes.into_iter().map(|r| r.abs()).collect();
        let mut index = Self {
            nodes: Vec::new(),
            branches: Vec::with_capacity(op_bounds.len() + op_bounds.len() / 4),
            root: None,
            op_bounds,
        };
        if index.op_bounds.is_empty() {
            return index;
        }

        let mut level_branches: Vec<Branch> = index
            .op_bounds
            .iter()
            .enumerate()
            .map(|(id, bounds)| Branch {
                bounds: *bounds,
                kind: BranchKind::Leaf(id as u32),
            })
            .collect();

        // A root node always exists, even over a single leaf.
        let mut level = 0_u16;
        loop {
            level_branches = index.pack_level(&level_branches, level);
            if level_branches.len() == 1 {
                break;
            }
            level += 1;
        }
        index.root = level_branches.pop();
        index
    }

    /// Wraps each group of `input` in a node at `level`, returning one branch
    /// per new node.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "node and branch counts are bounded by the u32 payload range"
    )]
    fn pack_level(&mut self, input: &[Branch], level: u16) -> Vec<Branch> {
        let sizes = group_sizes(input.len());
        let mut out = Vec::with_capacity(sizes.len());
        let mut start = 0;
        for size in sizes {
            let group = &input[start..start + size];
            start += size;

            let first = self.branches.len() as u32;
            self.branches.extend_from_slice(group);
            let node_idx = self.nodes.len() as u32;
            self.nodes.push(Node {
                level,
                first,
                len: size as u16,
            });

            let group_bounds: Vec<Rect> = group.iter().map(|b| b.bounds).collect();
            out.push(Branch {
                bounds: union_all(&group_bounds).unwrap_or(Rect::ZERO),
                kind: BranchKind::Subtree(node_idx),
            });
        }
        out
    }
}

/// Splits `count` branches into consecutive group sizes.
///
/// All groups hold [`MAX_CHILDREN`] except possibly the last two: when the
/// remainder is below [`MIN_CHILDREN`] the last group takes what it needs
/// from the one before it. A count that fits in one node yields one group.
fn group_sizes(count: usize) -> Vec<usize> {
    if count <= MAX_CHILDREN {
        return alloc::vec![count];
    }
    let mut sizes = alloc::vec![MAX_CHILDREN; count / MAX_CHILDREN];
    let remainder = count % MAX_CHILDREN;
    if remainder > 0 {
        if remainder < MIN_CHILDREN {
            let borrow = MIN_CHILDREN - remainder;
            if let Some(prev) = sizes.last_mut() {
                *prev -= borrow;
            }
            sizes.push(MIN_CHILDREN);
        } else {
            sizes.push(remainder);
        }
    }
    sizes
}
