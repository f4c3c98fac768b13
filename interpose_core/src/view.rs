// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Embedded view identity and placement parameters.

use core::fmt;

use kurbo::{Point, Rect, Size};

/// Identifies an embedded (platform-hosted) view.
///
/// Hosts assign view ids; core treats them as opaque keys.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewId(pub i64);

impl fmt::Debug for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewId({})", self.0)
    }
}

/// Placement of an embedded view for one frame.
///
/// The offset is already in physical pixels; the size is in logical points
/// and is scaled by the device pixel ratio when the placement rectangle is
/// computed (see [`placement_rect`](Self::placement_rect)).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EmbeddedViewParams {
    /// Top-left corner, in physical pixels.
    pub offset_pixels: Point,
    /// Size, in logical points.
    pub size_points: Size,
}

impl EmbeddedViewParams {
    /// Creates params from an offset in pixels and a size in points.
    #[must_use]
    pub const fn new(offset_pixels: Point, size_points: Size) -> Self {
        Self {
            offset_pixels,
            size_points,
        }
    }

    /// Returns the view's placement rectangle in physical pixels.
    #[must_use]
    pub fn placement_rect(&self, device_pixel_ratio: f64) -> Rect {
        Rect::from_origin_size(self.offset_pixels, self.size_points * device_pixel_ratio)
    }
}
