// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable overlay layers.
//!
//! An [`OverlayPool`] owns every overlay layer created so far and a cursor
//! marking the first layer not yet claimed in the current frame:
//!
//! ```text
//!   layers:  [ L0 | L1 | L2 | L3 ]
//!                     ^
//!                     available index
//! ```
//!
//! Layers before the cursor are in use this frame; layers at or after it can
//! be handed out by [`get_layer`](OverlayPool::get_layer). A request past the
//! end creates a new layer and appends it. [`recycle_layers`](OverlayPool::recycle_layers)
//! moves the cursor back to 0 without releasing anything, so surfaces are
//! reused across frames and only dropped with the pool.
//!
//! # Threading
//!
//! The pool is mutated only from the raster context that runs frames. It does
//! no locking; callers must not share it across threads while a frame is in
//! progress.

use alloc::vec::Vec;

use crate::backend::{ContextId, Host, OverlayId, SurfaceFactory, WindowHandle};

/// A reusable render target bound to a native overlay window.
#[derive(Debug)]
pub struct OverlayLayer<S> {
    id: OverlayId,
    window: WindowHandle,
    surface: S,
    context: ContextId,
    pub(crate) did_submit_last_frame: bool,
}

impl<S> OverlayLayer<S> {
    /// Returns the host-assigned overlay id.
    #[must_use]
    pub fn id(&self) -> OverlayId {
        self.id
    }

    /// Returns the native window this layer draws into.
    #[must_use]
    pub fn window(&self) -> WindowHandle {
        self.window
    }

    /// Returns the graphics context the surface was last built against.
    #[must_use]
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Returns whether the most recent frame submitted on this layer
    /// succeeded.
    #[must_use]
    pub fn did_submit_last_frame(&self) -> bool {
        self.did_submit_last_frame
    }

    /// Returns the backing surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Returns the backing surface mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

/// Pool of overlay layers reused across frames.
#[derive(Debug)]
pub struct OverlayPool<S> {
    layers: Vec<OverlayLayer<S>>,
    available: usize,
}

impl<S> Default for OverlayPool<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> OverlayPool<S> {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            layers: Vec::new(),
            available: 0,
        }
    }

    /// Claims the next layer for this frame.
    ///
    /// Reuses the layer at the cursor when there is one, rebuilding its
    /// surface through `factory` if it was last built for a different
    /// `context`. Otherwise asks `host` for a new overlay window, builds a
    /// surface for it, and appends the new layer. The cursor advances either
    /// way.
    pub fn get_layer<F, H>(
        &mut self,
        context: ContextId,
        factory: &mut F,
        host: &mut H,
    ) -> &mut OverlayLayer<S>
    where
        F: SurfaceFactory<Surface = S>,
        H: Host + ?Sized,
    {
        if self.available >= self.layers.len() {
            let (id, window) = host.on_create_overlay_window();
            let surface = factory.create_surface(window, context);
            log::debug!("created overlay layer {id:?} on {window:?} for {context:?}");
            self.layers.push(OverlayLayer {
                id,
                window,
                surface,
                context,
                did_submit_last_frame: false,
            });
        }

        let layer = &mut self.layers[self.available];
        if layer.context != context {
            log::debug!(
                "rebuilding overlay layer {:?}: context {:?} -> {context:?}",
                layer.id,
                layer.context
            );
            layer.surface = factory.create_surface(layer.window, context);
            layer.context = context;
        }
        self.available += 1;
        layer
    }

    /// Makes every layer available again. Releases nothing.
    pub fn recycle_layers(&mut self) {
        self.available = 0;
    }

    /// Returns the layers not claimed since the last recycle.
    #[must_use]
    pub fn unused_layers(&self) -> &[OverlayLayer<S>] {
        &self.layers[self.available..]
    }

    /// Returns every layer, claimed or not.
    #[must_use]
    pub fn layers(&self) -> &[OverlayLayer<S>] {
        &self.layers
    }

    /// Returns the position of the first unclaimed layer.
    #[must_use]
    pub fn available_index(&self) -> usize {
        self.available
    }

    /// Returns the number of layers created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if no layer has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
