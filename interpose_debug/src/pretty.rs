// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Rectangles
//! are printed as `x0,y0 wxh` in physical pixels.

use std::io::Write;

use interpose_core::trace::{
    FrameBeginEvent, FrameEndEvent, FrameSubmitEvent, OverlayEvent, TraceSink,
    ViewPlacementEvent,
};
use kurbo::Rect;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

struct DisplayRect(Rect);

impl std::fmt::Display for DisplayRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = self.0;
        write!(f, "{},{} {}x{}", r.x0, r.y0, r.width(), r.height())
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[begin] frame={} size={}x{} dpr={} context={}",
            e.frame_index,
            e.frame_size.width,
            e.frame_size.height,
            e.device_pixel_ratio,
            e.context.0,
        );
    }

    fn on_view_placement(&mut self, e: &ViewPlacementEvent) {
        let changed = if e.params_changed { " changed" } else { "" };
        let _ = writeln!(
            self.writer,
            "[view] frame={} view={} at {} ops={}{changed}",
            e.frame_index,
            e.view.0,
            DisplayRect(e.rect),
            e.op_count,
        );
    }

    fn on_overlay(&mut self, e: &OverlayEvent) {
        let status = if e.submitted { "ok" } else { "FAILED" };
        let collapsed = if e.collapsed { " collapsed" } else { "" };
        let _ = writeln!(
            self.writer,
            "[overlay] frame={} layer={} view={} over={} at {} {status}{collapsed}",
            e.frame_index,
            e.overlay.0,
            e.owner.0,
            e.obscured.0,
            DisplayRect(e.rect),
        );
    }

    fn on_frame_submit(&mut self, e: &FrameSubmitEvent) {
        let status = if e.success { "ok" } else { "FAILED" };
        let _ = writeln!(
            self.writer,
            "[submit] frame={} views={} overlays={} created={} unused={} {status}",
            e.frame_index, e.view_count, e.overlay_count, e.layers_created, e.unused_layers,
        );
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        let how = if e.cancelled { "cancelled" } else { "finished" };
        let _ = writeln!(self.writer, "[end] frame={} {how}", e.frame_index);
    }
}
