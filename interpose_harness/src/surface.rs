// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory overlay surfaces.
//!
//! Each [`MemorySurface`] keeps the last canvas submitted to it. All surfaces
//! built by one [`MemorySurfaceFactory`] share a [`FrameFailure`] switch, so a
//! test can make frames fail after the surfaces already exist.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use interpose_core::backend::{
    ContextId, OverlaySurface, SurfaceFactory, SurfaceFrame, WindowHandle,
};
use kurbo::Size;

use crate::raster::PixelCanvas;

/// Which step of an overlay frame should fail.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameFailure {
    /// Frames are acquired and submitted normally.
    #[default]
    None,
    /// `acquire_frame` returns `None`.
    Acquire,
    /// `submit` returns `false` and discards the frame.
    Submit,
}

type PresentedSlot = Rc<RefCell<Option<PixelCanvas>>>;

/// A frame drawing into a fresh [`PixelCanvas`].
#[derive(Debug)]
pub struct MemoryFrame {
    canvas: PixelCanvas,
    presented: PresentedSlot,
    fail: bool,
}

impl SurfaceFrame for MemoryFrame {
    type Canvas = PixelCanvas;

    fn canvas(&mut self) -> &mut PixelCanvas {
        &mut self.canvas
    }

    fn submit(self) -> bool {
        if self.fail {
            return false;
        }
        *self.presented.borrow_mut() = Some(self.canvas);
        true
    }
}

/// An overlay surface backed by memory.
#[derive(Debug)]
pub struct MemorySurface {
    window: WindowHandle,
    context: ContextId,
    presented: PresentedSlot,
    failure: Rc<Cell<FrameFailure>>,
}

impl MemorySurface {
    /// Returns the window this surface was built for.
    #[must_use]
    pub fn window(&self) -> WindowHandle {
        self.window
    }

    /// Returns the graphics context this surface was built against.
    #[must_use]
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Returns a copy of the last successfully submitted canvas.
    #[must_use]
    pub fn presented(&self) -> Option<PixelCanvas> {
        self.presented.borrow().clone()
    }
}

impl OverlaySurface for MemorySurface {
    type Frame = MemoryFrame;

    fn acquire_frame(&mut self, size: Size) -> Option<MemoryFrame> {
        match self.failure.get() {
            FrameFailure::Acquire => None,
            failure => Some(MemoryFrame {
                canvas: PixelCanvas::new(size),
                presented: self.presented.clone(),
                fail: failure == FrameFailure::Submit,
            }),
        }
    }
}

/// Builds [`MemorySurface`]s and logs every build.
#[derive(Debug, Default)]
pub struct MemorySurfaceFactory {
    failure: Rc<Cell<FrameFailure>>,
    built: Vec<(WindowHandle, ContextId)>,
}

impl MemorySurfaceFactory {
    /// Creates a factory whose frames succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failure mode of every surface from this factory, including
    /// those already built.
    pub fn set_failure(&self, failure: FrameFailure) {
        self.failure.set(failure);
    }

    /// Returns every `(window, context)` pair a surface was built for.
    #[must_use]
    pub fn built(&self) -> &[(WindowHandle, ContextId)] {
        &self.built
    }
}

impl SurfaceFactory for MemorySurfaceFactory {
    type Surface = MemorySurface;

    fn create_surface(&mut self, window: WindowHandle, context: ContextId) -> MemorySurface {
        self.built.push((window, context));
        MemorySurface {
            window,
            context,
            presented: Rc::default(),
            failure: self.failure.clone(),
        }
    }
}
