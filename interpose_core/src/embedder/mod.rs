// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame coordination of embedded views and overlays.
//!
//! A [`ViewEmbedder`] interleaves host-rendered content with embedded views
//! that it cannot draw into. Each frame, every embedded view gets its own
//! recording. A view's recording holds the content stacked directly beneath
//! that view: above every lower view, but covered by the view itself. At
//! submission the embedder works out which parts of each view lie under
//! content recorded for higher views, moves that content onto pooled overlay
//! surfaces stacked over the view, and carves the same regions out of the
//! background so nothing is drawn twice.
//!
//! Content meant to appear beneath every embedded view is drawn straight into
//! the background surface before [`submit_frame`](ViewEmbedder::submit_frame).
//!
//! # Frame lifecycle
//!
//! ```text
//!   Idle ──begin_frame──► Recording ──submit_frame──► Submitted
//!    ▲                      │  ▲                         │
//!    │                      │  └─ preroll / composite    │
//!    └──── finish_frame / cancel_frame ◄─────────────────┘
//! ```
//!
//! `finish_frame` and `cancel_frame` are accepted in any state and always
//! leave the embedder `Idle` with the layer pool recycled.
//!
//! # Threading
//!
//! The embedder, its pool, and all collaborators are driven from one raster
//! context. Nothing here is `Sync`-aware; callers must not interleave two
//! frames.

mod submit;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::{HashMap, HashSet};
use kurbo::{Point, Rect, Size};

use crate::backend::{ContextId, Host, Recorder, Recording, SurfaceFactory};
use crate::index::BoundedVolumeIndex;
use crate::pool::{OverlayLayer, OverlayPool};
use crate::trace::{FrameBeginEvent, FrameEndEvent, TraceSink, Tracer};
use crate::view::{EmbeddedViewParams, ViewId};

/// Default cap on disjoint overlay rectangles per obscured view before they
/// are collapsed into their union.
pub const MAX_LAYER_ALLOCATIONS: usize = 2;

/// Picture type produced by a recorder.
pub type PictureOf<R> = <<R as Recorder>::Recording as Recording>::Picture;

/// Recording canvas type of a recorder.
pub type RecordingCanvasOf<R> = <<R as Recorder>::Recording as Recording>::Canvas;

/// Configuration for the [`ViewEmbedder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmbedderConfig {
    /// Maximum number of overlay rectangles produced for one obscured view
    /// from one higher view's content. Beyond this, the rectangles are
    /// replaced by their union.
    pub max_layer_allocations: usize,
    /// Expand overlay rectangles outward to whole pixels before use.
    pub round_out_overlays: bool,
}

impl EmbedderConfig {
    /// Default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_layer_allocations: MAX_LAYER_ALLOCATIONS,
            round_out_overlays: true,
        }
    }
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the embedder is in its frame lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameState {
    /// No frame in progress.
    Idle,
    /// Between `begin_frame` and `submit_frame`.
    Recording,
    /// `submit_frame` has run; waiting for `finish_frame`.
    Submitted,
}

/// A closed recording and the index over its draw operations.
#[derive(Debug)]
pub(crate) struct RecordedView<P> {
    pub(crate) picture: P,
    pub(crate) index: BoundedVolumeIndex,
}

/// Coordinates one frame of embedded views at a time.
///
/// Owns the host capability, the recorder, the surface factory, and the
/// overlay pool for its whole lifetime. Overlay layers persist across frames
/// and are released when the embedder is dropped.
pub struct ViewEmbedder<H, R, F>
where
    R: Recorder,
    F: SurfaceFactory,
{
    host: H,
    recorder: R,
    factory: F,
    config: EmbedderConfig,
    pool: OverlayPool<F::Surface>,

    // -- Frame --
    state: FrameState,
    frame_index: u64,
    frame_size: Size,
    device_pixel_ratio: f64,

    // -- Per-frame views --
    composition_order: Vec<ViewId>,
    recordings: HashMap<ViewId, R::Recording>,
    recorded: HashMap<ViewId, RecordedView<PictureOf<R>>>,

    // -- Params (persist across frames) --
    view_params: HashMap<ViewId, EmbeddedViewParams>,
    changed_params: HashSet<ViewId>,

    trace_sink: Option<Box<dyn TraceSink>>,
}

impl<H, R, F> fmt::Debug for ViewEmbedder<H, R, F>
where
    R: Recorder,
    F: SurfaceFactory,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewEmbedder")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("frame_index", &self.frame_index)
            .field("frame_size", &self.frame_size)
            .field("composition_order", &self.composition_order)
            .field("pool_len", &self.pool.len())
            .finish_non_exhaustive()
    }
}

impl<H, R, F> ViewEmbedder<H, R, F>
where
    H: Host,
    R: Recorder,
    F: SurfaceFactory,
{
    /// Creates an embedder with the default [`EmbedderConfig`].
    #[must_use]
    pub fn new(host: H, recorder: R, factory: F) -> Self {
        Self::with_config(host, recorder, factory, EmbedderConfig::new())
    }

    /// Creates an embedder with the given configuration.
    #[must_use]
    pub fn with_config(host: H, recorder: R, factory: F, config: EmbedderConfig) -> Self {
        Self {
            host,
            recorder,
            factory,
            config,
            pool: OverlayPool::new(),
            state: FrameState::Idle,
            frame_index: 0,
            frame_size: Size::ZERO,
            device_pixel_ratio: 1.0,
            composition_order: Vec::new(),
            recordings: HashMap::new(),
            recorded: HashMap::new(),
            view_params: HashMap::new(),
            changed_params: HashSet::new(),
            trace_sink: None,
        }
    }

    /// Installs (or removes) the sink receiving trace events.
    ///
    /// Events are only dispatched when the `trace` feature is enabled.
    pub fn set_trace_sink(&mut self, sink: Option<Box<dyn TraceSink>>) {
        self.trace_sink = sink;
    }

    // -- Frame API --

    /// Starts a frame of `frame_size` physical pixels.
    ///
    /// # Panics
    ///
    /// Panics if a frame is already in progress.
    pub fn begin_frame(&mut self, frame_size: Size, context: ContextId, device_pixel_ratio: f64) {
        assert!(
            self.state == FrameState::Idle,
            "begin_frame called while a frame is in progress ({:?})",
            self.state
        );
        self.frame_index += 1;
        self.frame_size = frame_size;
        self.device_pixel_ratio = device_pixel_ratio;
        self.state = FrameState::Recording;
        self.host.on_begin_frame();

        tracer(&mut self.trace_sink).frame_begin(&FrameBeginEvent {
            frame_index: self.frame_index,
            frame_size,
            context,
            device_pixel_ratio,
        });
    }

    /// Registers `view` for this frame and opens a fresh recording for the
    /// content stacked beneath it.
    ///
    /// The first preroll of a view in a frame fixes its z-order slot; a
    /// repeated preroll replaces the recording but keeps the slot. Params
    /// equal to the stored value are left untouched.
    ///
    /// # Panics
    ///
    /// Panics if no frame is recording.
    pub fn preroll_composite_embedded_view(&mut self, view: ViewId, params: EmbeddedViewParams) {
        assert!(
            self.state == FrameState::Recording,
            "preroll_composite_embedded_view called outside a recording frame ({:?})",
            self.state
        );
        let bounds = Rect::from_origin_size(Point::ORIGIN, self.frame_size);
        let recording = self.recorder.open_recording(bounds);
        self.recordings.insert(view, recording);

        if !self.composition_order.contains(&view) {
            self.composition_order.push(view);
        }

        if self.view_params.get(&view) != Some(&params) {
            self.view_params.insert(view, params);
            self.changed_params.insert(view);
        }
    }

    /// Returns the open recording canvas for `view`.
    ///
    /// # Panics
    ///
    /// Panics if `view` was not prerolled in the current frame, or if the
    /// frame has already been submitted.
    pub fn composite_embedded_view(&mut self, view: ViewId) -> &mut RecordingCanvasOf<R> {
        assert!(
            self.state == FrameState::Recording,
            "composite_embedded_view called outside a recording frame ({:?})",
            self.state
        );
        match self.recordings.get_mut(&view) {
            Some(recording) => recording.canvas(),
            None => panic!("composite_embedded_view: {view:?} was not prerolled this frame"),
        }
    }

    /// Returns the recording canvases of all views, in composition order.
    pub fn current_canvases(&mut self) -> Vec<&mut RecordingCanvasOf<R>> {
        let order = &self.composition_order;
        let mut canvases: Vec<(usize, &mut RecordingCanvasOf<R>)> = self
            .recordings
            .iter_mut()
            .filter_map(|(view, recording)| {
                let slot = order.iter().position(|v| v == view)?;
                Some((slot, recording.canvas()))
            })
            .collect();
        canvases.sort_by_key(|(slot, _)| *slot);
        canvases.into_iter().map(|(_, canvas)| canvas).collect()
    }

    /// Ends the frame: notifies the host, then discards all per-frame state
    /// and recycles the overlay pool.
    ///
    /// Does nothing but recycle when no frame is in progress.
    pub fn finish_frame(&mut self) {
        if self.state != FrameState::Idle {
            self.host.on_end_frame();
        }
        self.clear_frame(false);
    }

    /// Abandons the frame without producing output or notifying the host.
    ///
    /// Safe to call in any state, any number of times.
    pub fn cancel_frame(&mut self) {
        self.clear_frame(true);
    }

    fn clear_frame(&mut self, cancelled: bool) {
        if self.state != FrameState::Idle {
            tracer(&mut self.trace_sink).frame_end(&FrameEndEvent {
                frame_index: self.frame_index,
                cancelled,
            });
            let order = &self.composition_order;
            self.view_params.retain(|view, _| order.contains(view));
        }
        self.composition_order.clear();
        self.recordings.clear();
        self.recorded.clear();
        self.changed_params.clear();
        self.frame_size = Size::ZERO;
        self.pool.recycle_layers();
        self.state = FrameState::Idle;
    }

    // -- Introspection --

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Returns the counter of the most recently begun frame.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Returns the current frame size; zero when idle.
    #[must_use]
    pub fn frame_size(&self) -> Size {
        self.frame_size
    }

    /// Returns the device pixel ratio of the current or last frame.
    #[must_use]
    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EmbedderConfig {
        &self.config
    }

    /// Returns this frame's views, bottom to top.
    #[must_use]
    pub fn composition_order(&self) -> &[ViewId] {
        &self.composition_order
    }

    /// Returns the stored params of `view`.
    #[must_use]
    pub fn view_params(&self, view: ViewId) -> Option<&EmbeddedViewParams> {
        self.view_params.get(&view)
    }

    /// Returns `true` if `view`'s params were replaced during this frame.
    #[must_use]
    pub fn params_changed(&self, view: ViewId) -> bool {
        self.changed_params.contains(&view)
    }

    /// Returns the placement rectangle of `view` in physical pixels.
    ///
    /// The device pixel ratio is applied here and only here.
    #[must_use]
    pub fn placement_rect(&self, view: ViewId) -> Option<Rect> {
        self.view_params
            .get(&view)
            .map(|params| params.placement_rect(self.device_pixel_ratio))
    }

    /// Returns the index built over `view`'s recorded content, once the
    /// frame has been submitted.
    #[must_use]
    pub fn recorded_index(&self, view: ViewId) -> Option<&BoundedVolumeIndex> {
        self.recorded.get(&view).map(|recorded| &recorded.index)
    }

    /// Returns the overlay pool.
    #[must_use]
    pub fn pool(&self) -> &OverlayPool<F::Surface> {
        &self.pool
    }

    /// Returns the overlay layers not claimed in the current frame.
    ///
    /// Call between `submit_frame` and `finish_frame` to hide the overlays
    /// this frame did not need.
    #[must_use]
    pub fn unused_overlays(&self) -> &[OverlayLayer<F::Surface>] {
        self.pool.unused_layers()
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the host mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Returns the recorder.
    #[must_use]
    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    /// Returns the surface factory.
    #[must_use]
    pub fn surface_factory(&self) -> &F {
        &self.factory
    }

    /// Returns the surface factory mutably.
    pub fn surface_factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }
}

/// Borrows the installed sink as a [`Tracer`].
fn tracer(sink: &mut Option<Box<dyn TraceSink>>) -> Tracer<'_> {
    match sink {
        Some(sink) => Tracer::new(sink.as_mut()),
        None => Tracer::none(),
    }
}
