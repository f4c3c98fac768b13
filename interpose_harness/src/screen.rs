// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What the user would see.
//!
//! [`compose`] stacks the background, the embedded views, and the overlays
//! the way a platform compositor would, following the host's placement
//! notifications. [`reference`] paints the same scene as if every view could
//! be drawn into a single canvas. For a correct frame the two agree pixel
//! for pixel.

use alloc::vec::Vec;

use interpose_core::backend::{Canvas, OverlayId};
use interpose_core::view::ViewId;
use kurbo::{Rect, Size};

use crate::display_list::DisplayList;
use crate::host::HostEvent;
use crate::raster::{Pixel, PixelCanvas};

/// One embedded view of a scene, with the content stacked beneath it.
#[derive(Clone, Debug)]
pub struct SceneView<'a> {
    /// Placement in physical pixels.
    pub rect: Rect,
    /// Opaque color standing in for the native view's pixels.
    pub color: Pixel,
    /// Content recorded for the view.
    pub content: &'a DisplayList,
}

/// Paints `base`, then each view's content followed by the view itself.
#[must_use]
pub fn reference(size: Size, base: &DisplayList, views: &[SceneView<'_>]) -> PixelCanvas {
    let mut screen = PixelCanvas::new(size);
    screen.draw_picture(base);
    for view in views {
        screen.draw_picture(view.content);
        screen.fill_rect(view.rect, view.color);
    }
    screen
}

/// Stacks `background`, views, and overlays in the order `events` places
/// them.
///
/// Each view is painted opaque with `view_color`. Overlays placed after a
/// view and before the next one sit over that view, the first placed on top.
/// `overlay` supplies the last presented canvas of an overlay layer.
#[must_use]
pub fn compose(
    background: &PixelCanvas,
    events: &[HostEvent],
    view_color: impl Fn(ViewId) -> Pixel,
    overlay: impl Fn(OverlayId) -> Option<PixelCanvas>,
) -> PixelCanvas {
    let mut screen = background.clone();
    let mut pending: Vec<(OverlayId, Rect)> = Vec::new();
    let flush = |screen: &mut PixelCanvas, pending: &mut Vec<(OverlayId, Rect)>| {
        for (id, rect) in pending.drain(..).rev() {
            if let Some(content) = overlay(id) {
                screen.blit(&content, rect);
            }
        }
    };

    for event in events {
        match *event {
            HostEvent::PositionView(view, rect) => {
                flush(&mut screen, &mut pending);
                screen.fill_rect(rect, view_color(view));
            }
            HostEvent::PositionOverlay(id, rect) => pending.push((id, rect)),
            _ => {}
        }
    }
    flush(&mut screen, &mut pending);
    screen
}
