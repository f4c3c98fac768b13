// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame compositing around embedded native views.
//!
//! `interpose_core` lets a renderer interleave its own content with embedded
//! platform views it cannot draw into. Content recorded for each view is
//! indexed, and wherever it covers a lower view it is moved onto an overlay
//! surface stacked over that view. The same region is carved out of the
//! background surface. The crate is `no_std` compatible (with `alloc`) and
//! does no drawing of its own: rasterization, windows, and surfaces are
//! supplied by a backend.
//!
//! # Architecture
//!
//! ```text
//!   begin_frame ──► preroll / composite (one Recording per view)
//!                                 │
//!                                 ▼
//!   submit_frame ──► BoundedVolumeIndex per recording
//!                         │
//!                         ▼
//!        occluding rects ──► OverlayPool::get_layer ──► overlay frames
//!                         │
//!                         └──► background: clip out, draw pictures
//!                                 │
//!                                 ▼
//!   finish_frame / cancel_frame ──► OverlayPool::recycle_layers
//! ```
//!
//! **[`index`]**: Bulk-loaded R-tree over draw-operation bounding boxes,
//! answering overlap and disjoint-cover queries.
//!
//! **[`pool`]**: Overlay layers reused across frames and rebuilt when the
//! graphics context changes.
//!
//! **[`embedder`]**: The per-frame [`ViewEmbedder`](embedder::ViewEmbedder)
//! state machine and its submission algorithm.
//!
//! **[`backend`]**: Traits that platform integrations implement: recorder,
//! canvases, surfaces, and the host.
//!
//! **[`view`]**: View ids and placement parameters.
//!
//! **[`geometry`]**: Rectangle overlap and merge helpers.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod embedder;
pub mod geometry;
pub mod index;
pub mod pool;
pub mod trace;
pub mod view;
