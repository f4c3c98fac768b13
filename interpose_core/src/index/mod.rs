// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bulk-loaded bounding volume index over recorded draw operations.
//!
//! A [`BoundedVolumeIndex`] is built once, from the complete ordered list of
//! draw-operation bounding boxes of one recorded picture, and is read-only
//! afterwards. There is no insertion or removal.
//!
//! Nodes live in a flat arena and address their children as a contiguous
//! range of [`Branch`] entries, so the whole index is two vectors plus the
//! root. Each branch is either a reference to a child node or the payload id
//! of a leaf draw operation (its position in the input list).
//!
//! # Fan-out
//!
//! Every node other than the root holds between [`MIN_CHILDREN`] and
//! [`MAX_CHILDREN`] branches. Depth is therefore bounded by
//! `log(N) / log(MIN_CHILDREN)`, which keeps the recursive queries shallow.

mod build;
mod query;

use alloc::vec::Vec;

use kurbo::Rect;

/// Minimum number of branches in a non-root node.
pub const MIN_CHILDREN: usize = 6;

/// Maximum number of branches in any node.
pub const MAX_CHILDREN: usize = 11;

/// What a [`Branch`] points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BranchKind {
    /// An interior node, by arena index.
    Subtree(u32),
    /// A leaf draw operation, by payload id.
    Leaf(u32),
}

/// One child entry of a node, together with the box enclosing everything
/// beneath it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Branch {
    /// Union of the boxes reachable through this branch.
    pub bounds: Rect,
    /// The child node or leaf payload.
    pub kind: BranchKind,
}

/// An interior node: a level and a contiguous run of branches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Node {
    /// Distance from the leaves; nodes holding leaf branches are level 0.
    pub(crate) level: u16,
    /// Index of the first branch in [`BoundedVolumeIndex::branches`].
    pub(crate) first: u32,
    /// Number of branches.
    pub(crate) len: u16,
}

/// Immutable, bulk-loaded spatial index answering rectangle-overlap queries
/// over the draw operations of one recorded picture.
///
/// Built with [`BoundedVolumeIndex::build`]; queried with
/// [`search`](Self::search) and
/// [`search_non_overlapping_drawn_rects`](Self::search_non_overlapping_drawn_rects).
#[derive(Clone, Debug, Default)]
pub struct BoundedVolumeIndex {
    pub(crate) nodes: Vec<Node>,
    pub(crate) branches: Vec<Branch>,
    /// Root branch, `None` for an empty index.
    pub(crate) root: Option<Branch>,
    /// Original (normalized) box of each payload id.
    pub(crate) op_bounds: Vec<Rect>,
}

impl BoundedVolumeIndex {
    /// Returns the number of indexed draw operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.op_bounds.len()
    }

    /// Returns `true` if the index holds no draw operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.op_bounds.is_empty()
    }

    /// Returns the number of node levels; 0 for an empty index.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self.root {
            Some(Branch {
                kind: BranchKind::Subtree(idx),
                ..
            }) => usize::from(self.nodes[idx as usize].level) + 1,
            _ => 0,
        }
    }

    /// Returns the union of all indexed boxes, or `None` if empty.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.root.map(|r| r.bounds)
    }

    /// Returns the box recorded for payload `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a payload id of this index.
    #[must_use]
    pub fn op_bounds(&self, id: u32) -> Rect {
        assert!(
            (id as usize) < self.op_bounds.len(),
            "payload id {id} out of range (len {})",
            self.op_bounds.len()
        );
        self.op_bounds[id as usize]
    }

    pub(crate) fn children(&self, node: &Node) -> &[Branch] {
        let start = node.first as usize;
        &self.branches[start..start + usize::from(node.len)]
    }
}
