// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tiny software rasterizer for display lists.
//!
//! Pixels are sampled at their centers: pixel `(x, y)` is covered by a rect
//! when `(x + 0.5, y + 0.5)` lies inside it (half-open on the far edges).
//! Clip-outs are stored in target coordinates, so a later translation does
//! not move them.

use alloc::vec;
use alloc::vec::Vec;

use interpose_core::backend::Canvas;
use kurbo::{Point, Rect, Size, Vec2};

use crate::display_list::DisplayList;

/// A pixel value. Zero is transparent.
pub type Pixel = u32;

/// The transparent pixel.
pub const TRANSPARENT: Pixel = 0;

#[derive(Clone, Debug, Default)]
struct DrawState {
    offset: Vec2,
    clip_outs: Vec<Rect>,
}

impl DrawState {
    fn excludes(&self, p: Point) -> bool {
        self.clip_outs
            .iter()
            .any(|c| c.x0 <= p.x && p.x < c.x1 && c.y0 <= p.y && p.y < c.y1)
    }
}

/// A pixel grid that implements [`Canvas`] for [`DisplayList`]s.
#[derive(Clone, Debug)]
pub struct PixelCanvas {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
    state: DrawState,
    saved: Vec<DrawState>,
}

impl PixelCanvas {
    /// Creates a transparent canvas covering `size`, rounded up to whole
    /// pixels.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "test canvases are small and non-negative"
    )]
    pub fn new(size: Size) -> Self {
        let whole = Rect::from_origin_size(Point::ORIGIN, size).expand();
        let width = whole.width().max(0.0) as usize;
        let height = whole.height().max(0.0) as usize;
        Self {
            width,
            height,
            pixels: vec![TRANSPARENT; width * height],
            state: DrawState::default(),
            saved: Vec::new(),
        }
    }

    /// Returns the width in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the canvas.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Pixel> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Returns all pixels, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Returns the number of save levels currently pushed.
    #[must_use]
    pub fn save_depth(&self) -> usize {
        self.saved.len()
    }

    /// Fills `rect` with `color` under the current translation and clip.
    pub fn fill_rect(&mut self, rect: Rect, color: Pixel) {
        let r = rect.abs() + self.state.offset;
        self.for_each_pixel_in(r, |canvas, x, y, center| {
            if !canvas.state.excludes(center) {
                canvas.pixels[y * canvas.width + x] = color;
            }
        });
    }

    /// Copies the opaque pixels of `source` inside `rect`, where source pixel
    /// `(0, 0)` lands on `rect`'s origin. Ignores translation and clip.
    pub fn blit(&mut self, source: &Self, rect: Rect) {
        let origin = rect.origin();
        self.for_each_pixel_in(rect, |canvas, x, y, center| {
            let local = center - origin.to_vec2();
            if local.x < 0.0 || local.y < 0.0 {
                return;
            }
            #[expect(
                clippy::cast_possible_truncation,
                reason = "local coordinates are non-negative pixel centers"
            )]
            let (sx, sy) = (local.x as usize, local.y as usize);
            if let Some(p) = source.pixel(sx, sy)
                && p != TRANSPARENT
            {
                canvas.pixels[y * canvas.width + x] = p;
            }
        });
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "bounds are clamped to the canvas before casting"
    )]
    fn for_each_pixel_in(&mut self, r: Rect, mut f: impl FnMut(&mut Self, usize, usize, Point)) {
        let r = r.abs();
        let span = r.expand();
        let x0 = span.x0.max(0.0) as usize;
        let y0 = span.y0.max(0.0) as usize;
        let x1 = (span.x1.max(0.0) as usize).min(self.width);
        let y1 = (span.y1.max(0.0) as usize).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if r.x0 <= center.x && center.x < r.x1 && r.y0 <= center.y && center.y < r.y1 {
                    f(self, x, y, center);
                }
            }
        }
    }
}

impl Canvas<DisplayList> for PixelCanvas {
    fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn clip_out_rect(&mut self, rect: Rect) {
        let r = rect.abs() + self.state.offset;
        self.state.clip_outs.push(r);
    }

    fn translate(&mut self, offset: Vec2) {
        self.state.offset += offset;
    }

    fn clear(&mut self) {
        self.pixels.fill(TRANSPARENT);
    }

    fn draw_picture(&mut self, picture: &DisplayList) {
        for op in picture.ops() {
            self.fill_rect(op.rect, op.color);
        }
    }
}
