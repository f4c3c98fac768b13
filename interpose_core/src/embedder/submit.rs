// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame submission: overlay placement and background carving.

use alloc::vec::Vec;

use kurbo::{Rect, Size};

use super::{EmbedderConfig, FrameState, PictureOf, RecordedView, ViewEmbedder, tracer};
use crate::backend::{
    Canvas, ContextId, Host, OverlaySurface, RecordedPicture, Recorder, Recording,
    SurfaceFactory, SurfaceFrame,
};
use crate::geometry::union_all;
use crate::index::BoundedVolumeIndex;
use crate::trace::{FrameSubmitEvent, OverlayEvent, ViewPlacementEvent};

/// Canvas type of the frames produced by a factory's surfaces.
type FrameCanvasOf<F> =
    <<<F as SurfaceFactory>::Surface as OverlaySurface>::Frame as SurfaceFrame>::Canvas;

impl<H, R, F> ViewEmbedder<H, R, F>
where
    H: Host,
    R: Recorder,
    F: SurfaceFactory,
    FrameCanvasOf<F>: Canvas<PictureOf<R>>,
{
    /// Composites the frame into `background` and onto overlay layers.
    ///
    /// All recordings are closed and indexed first. Then, for each view from
    /// the bottom up, the host is told the view's placement and every higher
    /// view is checked (top-down) for recorded content over it. Each
    /// rectangle of such content is carved out of `background` and drawn on
    /// its own overlay layer from the pool. Finally the view's own recorded
    /// content is drawn into `background`, under every exclusion made so far.
    ///
    /// Overlay layers are claimed against `context`; pooled surfaces built
    /// for another context are rebuilt before use.
    ///
    /// Returns `false` if any overlay frame could not be acquired or
    /// submitted. Drawing continues past a failure.
    ///
    /// # Panics
    ///
    /// Panics unless a frame is recording.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "trace counters are u32; view and layer counts stay far below that"
    )]
    pub fn submit_frame<B>(&mut self, context: ContextId, background: &mut B) -> bool
    where
        B: Canvas<PictureOf<R>> + ?Sized,
    {
        assert!(
            self.state == FrameState::Recording,
            "submit_frame called outside a recording frame ({:?})",
            self.state
        );
        self.state = FrameState::Submitted;

        let placements: Vec<Rect> = self
            .composition_order
            .iter()
            .map(|view| self.placement_rect(*view).unwrap_or(Rect::ZERO))
            .collect();

        for view in &self.composition_order {
            if let Some(recording) = self.recordings.remove(view) {
                let RecordedPicture {
                    picture,
                    op_bounds,
                } = recording.finish();
                let index = BoundedVolumeIndex::build(op_bounds);
                self.recorded.insert(*view, RecordedView { picture, index });
            }
        }

        let mut tracer = tracer(&mut self.trace_sink);
        let layers_before = self.pool.len();
        let mut overlay_count = 0_u32;
        let mut success = true;

        background.save();
        for (i, &view) in self.composition_order.iter().enumerate() {
            let rect = placements[i];
            self.host.on_position_embedded_view(view, rect);
            tracer.view_placement(&ViewPlacementEvent {
                frame_index: self.frame_index,
                view,
                rect,
                params_changed: self.changed_params.contains(&view),
                op_count: self.recorded.get(&view).map_or(0, |r| r.index.len() as u32),
            });

            for &owner in self.composition_order[i + 1..].iter().rev() {
                let Some(above) = self.recorded.get(&owner) else {
                    continue;
                };
                let (rects, collapsed) = occluding_rects(&above.index, rect, &self.config);
                for overlay_rect in rects {
                    background.clip_out_rect(overlay_rect);

                    let layer = self.pool.get_layer(context, &mut self.factory, &mut self.host);
                    self.host.on_position_overlay(layer.id(), overlay_rect);
                    let submitted = draw_overlay(
                        layer.surface_mut(),
                        &above.picture,
                        overlay_rect,
                        self.frame_size,
                    );
                    layer.did_submit_last_frame = submitted;
                    success &= submitted;
                    overlay_count += 1;

                    tracer.overlay(&OverlayEvent {
                        frame_index: self.frame_index,
                        owner,
                        obscured: view,
                        overlay: layer.id(),
                        rect: overlay_rect,
                        collapsed,
                        submitted,
                    });
                }
            }

            if let Some(own) = self.recorded.get(&view) {
                background.draw_picture(&own.picture);
            }
        }
        background.restore();

        if !success {
            log::warn!("frame {}: one or more overlays failed to submit", self.frame_index);
        }
        tracer.frame_submit(&FrameSubmitEvent {
            frame_index: self.frame_index,
            view_count: self.composition_order.len() as u32,
            overlay_count,
            layers_created: (self.pool.len() - layers_before) as u32,
            unused_layers: self.pool.unused_layers().len() as u32,
            success,
        });
        success
    }
}

/// Returns the rectangles of `index`'s content that must be lifted off the
/// view at `view_rect`, and whether they were collapsed into their union.
///
/// Content clusters are clipped to the view, capped at
/// `max_layer_allocations` by taking their union, then optionally expanded to
/// whole pixels. When rounding, the view itself is expanded first and used
/// for both the query and the clip, so every picture touching a carved pixel
/// is found for that pixel.
pub(crate) fn occluding_rects(
    index: &BoundedVolumeIndex,
    view_rect: Rect,
    config: &EmbedderConfig,
) -> (Vec<Rect>, bool) {
    let bound = if config.round_out_overlays {
        view_rect.expand()
    } else {
        view_rect
    };
    let mut rects: Vec<Rect> = index
        .search_non_overlapping_drawn_rects(bound)
        .into_iter()
        .map(|r| r.intersect(bound))
        .collect();

    let collapsed = rects.len() > config.max_layer_allocations.max(1);
    if collapsed {
        rects = union_all(&rects).into_iter().collect();
    }
    if config.round_out_overlays {
        for r in &mut rects {
            *r = r.expand();
        }
    }
    (rects, collapsed)
}

/// Replays `picture` onto a fresh frame of `surface`, shifted so that
/// `rect`'s origin lands at the frame origin.
fn draw_overlay<S, P>(surface: &mut S, picture: &P, rect: Rect, frame_size: Size) -> bool
where
    S: OverlaySurface,
    <S::Frame as SurfaceFrame>::Canvas: Canvas<P>,
{
    let Some(mut frame) = surface.acquire_frame(frame_size) else {
        log::warn!("failed to acquire overlay frame for {rect:?}");
        return false;
    };
    let canvas = frame.canvas();
    canvas.clear();
    canvas.translate(-rect.origin().to_vec2());
    canvas.draw_picture(picture);
    let submitted = frame.submit();
    if !submitted {
        log::warn!("overlay frame for {rect:?} was not submitted");
    }
    submitted
}
