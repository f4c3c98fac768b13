// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator contracts for platform integrations.
//!
//! The embedder never rasterizes, creates windows, or talks to the platform
//! itself. A backend provides the following pieces:
//!
//! - **Recording**: A [`Recorder`] opens one [`Recording`] per embedded view
//!   per frame. Finishing a recording yields a replayable picture plus the
//!   ordered bounding boxes of its draw operations ([`RecordedPicture`]).
//!
//! - **Drawing**: Any surface the embedder draws into implements
//!   [`Canvas`]: the background surface, and every overlay frame.
//!
//! - **Surfaces**: A [`SurfaceFactory`] binds a native window to a render
//!   surface for a given graphics context. Surfaces hand out one
//!   [`SurfaceFrame`] at a time; submitting a frame reports success.
//!
//! - **Host**: The [`Host`] receives placement notifications and creates
//!   overlay windows. It is passed to the embedder at construction and lives
//!   exactly as long as the embedder.
//!
//! # Threading
//!
//! All collaborators are driven from the single raster context that runs the
//! frame. None of the traits require `Send` or `Sync`, and the embedder does
//! no internal locking.
//!
//! # Graphics contexts
//!
//! [`ContextId`] is an opaque tag for the graphics context a surface was
//! built against. Any resources a factory shares between surfaces of the same
//! context are the factory's own state; the embedder only compares tags to
//! decide when a pooled surface must be rebuilt.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Rect, Size, Vec2};

use crate::view::ViewId;

/// Opaque tag for the graphics context a surface is bound to.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ContextId(pub u64);

impl fmt::Debug for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextId({})", self.0)
    }
}

/// Opaque handle to a native window created by the host for an overlay.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowHandle(pub u64);

impl fmt::Debug for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WindowHandle({})", self.0)
    }
}

/// Stable identifier of an overlay layer, assigned by the host.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayId(pub u64);

impl fmt::Debug for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OverlayId({})", self.0)
    }
}

/// A drawing target.
///
/// `P` is the picture type produced by the backend's [`Recorder`].
pub trait Canvas<P: ?Sized> {
    /// Pushes the current clip and transform.
    fn save(&mut self);

    /// Pops the clip and transform pushed by the matching [`save`](Self::save).
    fn restore(&mut self);

    /// Excludes `rect` from all subsequent drawing until the next
    /// [`restore`](Self::restore).
    fn clip_out_rect(&mut self, rect: Rect);

    /// Translates subsequent drawing by `offset`.
    fn translate(&mut self, offset: Vec2);

    /// Clears the whole target to transparent, ignoring clips.
    fn clear(&mut self);

    /// Replays `picture` under the current clip and transform.
    fn draw_picture(&mut self, picture: &P);
}

/// The finished output of a [`Recording`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedPicture<P> {
    /// Replayable content.
    pub picture: P,
    /// Bounding box of each draw operation, in recording order.
    pub op_bounds: Vec<Rect>,
}

/// An open recording for one embedded view.
pub trait Recording {
    /// The canvas callers draw into while recording.
    type Canvas: ?Sized;
    /// The replayable picture produced by [`finish`](Self::finish).
    type Picture;

    /// Returns the recording canvas.
    fn canvas(&mut self) -> &mut Self::Canvas;

    /// Closes the recording.
    fn finish(self) -> RecordedPicture<Self::Picture>;
}

/// Opens recordings.
pub trait Recorder {
    /// The recording type this recorder produces.
    type Recording: Recording;

    /// Opens a recording whose content is expected to lie within `bounds`.
    fn open_recording(&mut self, bounds: Rect) -> Self::Recording;
}

/// One frame of an overlay surface, drawn and then submitted.
pub trait SurfaceFrame {
    /// The canvas for this frame.
    type Canvas: ?Sized;

    /// Returns the canvas to draw this frame into.
    fn canvas(&mut self) -> &mut Self::Canvas;

    /// Submits the frame for display. Returns `false` on failure.
    fn submit(self) -> bool;
}

/// A render surface backing an overlay window.
pub trait OverlaySurface {
    /// The frame type handed out by [`acquire_frame`](Self::acquire_frame).
    type Frame: SurfaceFrame;

    /// Acquires a frame of the given size, or `None` if the surface cannot
    /// produce one right now.
    fn acquire_frame(&mut self, size: Size) -> Option<Self::Frame>;
}

/// Creates render surfaces for native windows.
pub trait SurfaceFactory {
    /// The surface type produced.
    type Surface: OverlaySurface;

    /// Builds a surface drawing into `window` through `context`.
    fn create_surface(&mut self, window: WindowHandle, context: ContextId) -> Self::Surface;
}

/// Receives placement notifications from the embedder.
///
/// A frame is bracketed by [`on_begin_frame`](Self::on_begin_frame) and
/// [`on_end_frame`](Self::on_end_frame); a cancelled frame receives no end
/// notification.
pub trait Host {
    /// A frame has started.
    fn on_begin_frame(&mut self);

    /// Embedded view `view` occupies `rect` (physical pixels) this frame.
    fn on_position_embedded_view(&mut self, view: ViewId, rect: Rect);

    /// Overlay `overlay` occupies `rect` (physical pixels) this frame.
    ///
    /// Overlays are positioned right after the view they cover and before
    /// the next view, so they stack above that view and beneath every higher
    /// one. Overlays covering the same view arrive from the highest owning
    /// content down; each stacks beneath the ones positioned before it.
    fn on_position_overlay(&mut self, overlay: OverlayId, rect: Rect);

    /// Creates a new overlay window, returning its stable id and native handle.
    fn on_create_overlay_window(&mut self) -> (OverlayId, WindowHandle);

    /// The frame has been fully submitted.
    fn on_end_frame(&mut self);
}

impl<H: Host + ?Sized> Host for &mut H {
    fn on_begin_frame(&mut self) {
        (**self).on_begin_frame();
    }

    fn on_position_embedded_view(&mut self, view: ViewId, rect: Rect) {
        (**self).on_position_embedded_view(view, rect);
    }

    fn on_position_overlay(&mut self, overlay: OverlayId, rect: Rect) {
        (**self).on_position_overlay(overlay, rect);
    }

    fn on_create_overlay_window(&mut self) -> (OverlayId, WindowHandle) {
        (**self).on_create_overlay_window()
    }

    fn on_end_frame(&mut self) {
        (**self).on_end_frame();
    }
}
