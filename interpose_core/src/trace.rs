// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for embedded-view frames.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`ViewEmbedder`](crate::embedder::ViewEmbedder) calls at each stage of a
//! frame. All method bodies default to no-ops, so implementing only the
//! events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use kurbo::{Rect, Size};

use crate::backend::{ContextId, OverlayId};
use crate::view::ViewId;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a frame begins.
#[derive(Clone, Copy, Debug)]
pub struct FrameBeginEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Size of the background surface, in physical pixels.
    pub frame_size: Size,
    /// Graphics context the caller is drawing with.
    pub context: ContextId,
    /// Scale between logical points and physical pixels.
    pub device_pixel_ratio: f64,
}

/// Emitted when an embedded view's final placement is sent to the host.
#[derive(Clone, Copy, Debug)]
pub struct ViewPlacementEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// The placed view.
    pub view: ViewId,
    /// Placement rectangle, in physical pixels.
    pub rect: Rect,
    /// Whether the view's params changed since they were last stored.
    pub params_changed: bool,
    /// Number of draw operations recorded for this view.
    pub op_count: u32,
}

/// Emitted for each overlay drawn during submission.
#[derive(Clone, Copy, Debug)]
pub struct OverlayEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// The view whose recorded content is replayed on the overlay.
    pub owner: ViewId,
    /// The lower view the content covers.
    pub obscured: ViewId,
    /// The pool layer used.
    pub overlay: OverlayId,
    /// Overlay rectangle (also carved out of the background).
    pub rect: Rect,
    /// Whether the obscuring rectangles were collapsed into their union.
    pub collapsed: bool,
    /// Whether the overlay frame was acquired and submitted successfully.
    pub submitted: bool,
}

/// Emitted once `submit_frame` has drawn everything.
#[derive(Clone, Copy, Debug)]
pub struct FrameSubmitEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Number of embedded views in the frame.
    pub view_count: u32,
    /// Number of overlays drawn.
    pub overlay_count: u32,
    /// Number of overlay layers newly created for this frame.
    pub layers_created: u32,
    /// Number of pooled layers left unclaimed.
    pub unused_layers: u32,
    /// Whether every overlay submission succeeded.
    pub success: bool,
}

/// Emitted when a frame is finished or cancelled.
#[derive(Clone, Copy, Debug)]
pub struct FrameEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// `true` for a cancelled frame.
    pub cancelled: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the embedder.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a frame begins.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called when a view's placement is sent to the host.
    fn on_view_placement(&mut self, e: &ViewPlacementEvent) {
        _ = e;
    }

    /// Called after each overlay is drawn.
    fn on_overlay(&mut self, e: &OverlayEvent) {
        _ = e;
    }

    /// Called when submission completes.
    fn on_frame_submit(&mut self, e: &FrameSubmitEvent) {
        _ = e;
    }

    /// Called when a frame is finished or cancelled.
    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ViewPlacementEvent`].
    #[inline]
    pub fn view_placement(&mut self, e: &ViewPlacementEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_view_placement(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`OverlayEvent`].
    #[inline]
    pub fn overlay(&mut self, e: &OverlayEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_overlay(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSubmitEvent`].
    #[inline]
    pub fn frame_submit(&mut self, e: &FrameSubmitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_submit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEndEvent`].
    #[inline]
    pub fn frame_end(&mut self, e: &FrameEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
