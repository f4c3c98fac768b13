// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Software reference collaborators for the interpose view embedder.
//!
//! Everything here runs in memory: display lists stand in for recorded
//! pictures, a pixel grid stands in for every drawing surface, and the host
//! just logs what it is told. [`screen`] turns a submitted frame back into
//! the image a platform compositor would show, so whole frames can be
//! checked against a single-canvas rendering of the same scene.

#![no_std]

extern crate alloc;

pub mod display_list;
pub mod host;
pub mod raster;
pub mod screen;
pub mod surface;

#[cfg(test)]
mod scenarios;

use interpose_core::backend::OverlayId;
use interpose_core::embedder::ViewEmbedder;

use crate::display_list::ListRecorder;
use crate::host::HostLog;
use crate::raster::PixelCanvas;
use crate::surface::MemorySurfaceFactory;

/// A [`ViewEmbedder`] wired to the in-memory collaborators.
pub type SoftwareEmbedder = ViewEmbedder<HostLog, ListRecorder, MemorySurfaceFactory>;

/// Creates a [`SoftwareEmbedder`] with the default configuration.
#[must_use]
pub fn software_embedder() -> SoftwareEmbedder {
    ViewEmbedder::new(HostLog::new(), ListRecorder::new(), MemorySurfaceFactory::new())
}

/// Returns the last canvas presented on overlay `id`, if any.
#[must_use]
pub fn presented_overlay(embedder: &SoftwareEmbedder, id: OverlayId) -> Option<PixelCanvas> {
    embedder
        .pool()
        .layers()
        .iter()
        .find(|layer| layer.id() == id)
        .and_then(|layer| layer.surface().presented())
}
