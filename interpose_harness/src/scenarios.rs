// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Whole-frame tests against the software collaborators.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use interpose_core::backend::{Canvas, ContextId, OverlayId, WindowHandle};
use interpose_core::embedder::FrameState;
use interpose_core::trace::{
    FrameBeginEvent, FrameEndEvent, FrameSubmitEvent, OverlayEvent, TraceSink,
    ViewPlacementEvent,
};
use interpose_core::view::{EmbeddedViewParams, ViewId};
use interpose_debug::recorder::{RecordedEvent, RecorderSink, decode};
use kurbo::{Point, Rect, Size};

use crate::display_list::DisplayList;
use crate::host::HostEvent;
use crate::raster::{Pixel, PixelCanvas};
use crate::screen::{SceneView, compose, reference};
use crate::surface::FrameFailure;
use crate::{SoftwareEmbedder, presented_overlay, software_embedder};

const FRAME: Size = Size::new(96.0, 64.0);
const CTX: ContextId = ContextId(1);
const BASE_COLOR: Pixel = 0x01;

struct Scene {
    base: DisplayList,
    views: Vec<(ViewId, EmbeddedViewParams, DisplayList)>,
    device_pixel_ratio: f64,
}

impl Scene {
    fn new() -> Self {
        let mut base = DisplayList::new();
        base.fill_rect(Rect::from_origin_size(Point::ORIGIN, FRAME), BASE_COLOR);
        Self {
            base,
            views: Vec::new(),
            device_pixel_ratio: 1.0,
        }
    }

    fn view(mut self, id: i64, rect: Rect, content: &[(Rect, Pixel)]) -> Self {
        let mut list = DisplayList::new();
        for (r, color) in content {
            list.fill_rect(*r, *color);
        }
        let size = Size::new(rect.width(), rect.height()) / self.device_pixel_ratio;
        let params = EmbeddedViewParams::new(rect.origin(), size);
        self.views.push((ViewId(id), params, list));
        self
    }

    /// Runs one frame through `e`, returning the background and the submit
    /// result. Leaves the frame submitted.
    fn submit(&self, e: &mut SoftwareEmbedder, context: ContextId) -> (PixelCanvas, bool) {
        e.begin_frame(FRAME, context, self.device_pixel_ratio);
        for (id, params, list) in &self.views {
            e.preroll_composite_embedded_view(*id, *params);
            let canvas = e.composite_embedded_view(*id);
            for op in list.ops() {
                canvas.fill_rect(op.rect, op.color);
            }
        }
        let mut background = PixelCanvas::new(FRAME);
        background.draw_picture(&self.base);
        let ok = e.submit_frame(context, &mut background);
        (background, ok)
    }

    fn reference(&self) -> PixelCanvas {
        let views: Vec<SceneView<'_>> = self
            .views
            .iter()
            .map(|(id, params, list)| SceneView {
                rect: params.placement_rect(self.device_pixel_ratio),
                color: view_color(*id),
                content: list,
            })
            .collect();
        reference(FRAME, &self.base, &views)
    }
}

fn view_color(view: ViewId) -> Pixel {
    u32::try_from(view.0).map_or(0xff, |n| 0x100 + n)
}

fn composed(e: &SoftwareEmbedder, background: &PixelCanvas) -> PixelCanvas {
    compose(background, e.host().frame_events(), view_color, |id| {
        presented_overlay(e, id)
    })
}

fn assert_matches_reference(scene: &Scene, e: &SoftwareEmbedder, background: &PixelCanvas) {
    let expected = scene.reference();
    let actual = composed(e, background);
    for y in 0..expected.height() {
        for x in 0..expected.width() {
            assert_eq!(
                actual.pixel(x, y),
                expected.pixel(x, y),
                "pixel ({x}, {y}) differs from single-canvas rendering"
            );
        }
    }
}

fn count(canvas: &PixelCanvas, rect: Rect, color: Pixel) -> usize {
    let mut n = 0;
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            if rect.contains(center) && canvas.pixel(x, y) == Some(color) {
                n += 1;
            }
        }
    }
    n
}

#[test]
fn empty_frame_draws_background_only() {
    let scene = Scene::new();
    let mut e = software_embedder();
    let (background, ok) = scene.submit(&mut e, CTX);

    assert!(ok, "empty frame submits");
    assert!(background.pixels().iter().all(|p| *p == BASE_COLOR));
    assert_eq!(e.pool().available_index(), 0);
    assert_eq!(e.host().events(), [HostEvent::BeginFrame]);
    assert_eq!(background.save_depth(), 0);

    e.finish_frame();
    assert_eq!(e.host().events(), [HostEvent::BeginFrame, HostEvent::EndFrame]);
}

#[test]
fn lone_view_needs_no_overlay() {
    let scene = Scene::new().view(
        1,
        Rect::new(10.0, 10.0, 40.0, 40.0),
        &[(Rect::new(50.0, 10.0, 60.0, 20.0), 0x20)],
    );
    let mut e = software_embedder();
    let (background, ok) = scene.submit(&mut e, CTX);

    assert!(ok, "lone view submits");
    assert!(e.pool().is_empty());
    assert!(e.host().overlay_placements().is_empty());
    assert_eq!(
        count(&background, Rect::new(10.0, 10.0, 40.0, 40.0), BASE_COLOR),
        900,
        "background under the view is untouched"
    );
    assert_matches_reference(&scene, &e, &background);
}

#[test]
fn covering_content_gets_one_overlay_over_the_lower_view() {
    let b_rect = Rect::new(8.0, 8.0, 40.0, 40.0);
    let scene = Scene::new()
        .view(2, b_rect, &[(Rect::new(30.0, 30.0, 50.0, 50.0), 0x30)])
        .view(
            1,
            Rect::new(60.0, 8.0, 90.0, 40.0),
            &[(Rect::new(0.0, 0.0, 48.0, 48.0), 0x40)],
        );
    let mut e = software_embedder();
    let (background, ok) = scene.submit(&mut e, CTX);

    assert!(ok, "overlay submits");
    assert_eq!(e.host().overlay_placements(), [(OverlayId(1), b_rect)]);
    assert_eq!(e.pool().available_index(), 1);
    assert_eq!(
        count(&background, b_rect, BASE_COLOR),
        32 * 32,
        "neither picture is drawn under the carved view"
    );
    assert_eq!(
        count(&background, Rect::new(40.0, 40.0, 48.0, 48.0), 0x40),
        64,
        "covering content outside the view stays in the background"
    );
    assert_matches_reference(&scene, &e, &background);
}

#[test]
fn overlays_from_several_views_stack_in_content_order() {
    let low = Rect::new(0.0, 0.0, 30.0, 30.0);
    let scene = Scene::new()
        .view(1, low, &[])
        .view(
            2,
            Rect::new(40.0, 0.0, 60.0, 20.0),
            &[(Rect::new(5.0, 5.0, 20.0, 20.0), 0x50)],
        )
        .view(
            3,
            Rect::new(70.0, 0.0, 90.0, 20.0),
            &[(Rect::new(10.0, 10.0, 25.0, 25.0), 0x60)],
        );
    let mut e = software_embedder();
    let (background, ok) = scene.submit(&mut e, CTX);

    assert!(ok, "overlays submit");
    assert_eq!(
        e.host().overlay_placements(),
        [
            (OverlayId(1), Rect::new(10.0, 10.0, 25.0, 25.0)),
            (OverlayId(2), Rect::new(5.0, 5.0, 20.0, 20.0)),
        ]
    );
    assert_matches_reference(&scene, &e, &background);
}

#[test]
fn overlapping_views_each_get_their_share() {
    let scene = Scene::new()
        .view(1, Rect::new(0.0, 0.0, 40.0, 40.0), &[])
        .view(
            2,
            Rect::new(20.0, 20.0, 60.0, 60.0),
            &[(Rect::new(10.0, 10.0, 30.0, 30.0), 0x70)],
        )
        .view(
            3,
            Rect::new(80.0, 0.0, 90.0, 10.0),
            &[(Rect::new(30.0, 30.0, 50.0, 50.0), 0x80)],
        );
    let mut e = software_embedder();
    let (background, ok) = scene.submit(&mut e, CTX);

    assert!(ok, "overlays submit");
    assert_matches_reference(&scene, &e, &background);
}

#[test]
fn scattered_content_collapses_into_one_overlay() {
    let scene = Scene::new().view(1, Rect::new(0.0, 0.0, 90.0, 60.0), &[]).view(
        2,
        Rect::new(92.0, 0.0, 96.0, 4.0),
        &[
            (Rect::new(5.0, 5.0, 10.0, 10.0), 0x11),
            (Rect::new(30.0, 5.0, 35.0, 10.0), 0x12),
            (Rect::new(60.0, 40.0, 70.0, 50.0), 0x13),
        ],
    );
    let mut e = software_embedder();
    let (background, ok) = scene.submit(&mut e, CTX);

    assert!(ok, "overlay submits");
    assert_eq!(
        e.host().overlay_placements(),
        [(OverlayId(1), Rect::new(5.0, 5.0, 70.0, 50.0))]
    );
    assert_matches_reference(&scene, &e, &background);
}

#[test]
fn fractional_content_rounds_out_to_whole_pixels() {
    let scene = Scene::new().view(1, Rect::new(0.0, 0.0, 60.0, 60.0), &[]).view(
        2,
        Rect::new(70.0, 0.0, 90.0, 20.0),
        &[(Rect::new(10.3, 10.3, 20.6, 20.6), 0x21)],
    );
    let mut e = software_embedder();
    let (background, ok) = scene.submit(&mut e, CTX);

    assert!(ok, "overlay submits");
    assert_eq!(
        e.host().overlay_placements(),
        [(OverlayId(1), Rect::new(10.0, 10.0, 21.0, 21.0))]
    );
    assert_matches_reference(&scene, &e, &background);
}

#[test]
fn content_in_a_partial_view_pixel_gets_its_own_overlay() {
    // View 1 ends halfway through column 10. View 3's content rounds out to
    // cover that whole column, and view 2's content starts exactly at the
    // view edge, so column 10 must come from view 2's overlay.
    let scene = Scene::new()
        .view(1, Rect::new(0.0, 0.0, 10.5, 10.0), &[])
        .view(
            2,
            Rect::new(60.0, 40.0, 70.0, 50.0),
            &[(Rect::new(10.5, 0.0, 20.0, 10.0), 0x22)],
        )
        .view(
            3,
            Rect::new(80.0, 40.0, 90.0, 50.0),
            &[(Rect::new(5.0, 0.0, 10.5, 10.0), 0x33)],
        );
    let mut e = software_embedder();
    let (background, ok) = scene.submit(&mut e, CTX);

    assert!(ok, "overlays submit");
    assert_eq!(
        e.host().overlay_placements(),
        [
            (OverlayId(1), Rect::new(5.0, 0.0, 11.0, 10.0)),
            (OverlayId(2), Rect::new(10.0, 0.0, 11.0, 10.0)),
        ]
    );
    let screen = composed(&e, &background);
    assert_eq!(screen.pixel(10, 5), Some(0x22));
    assert_eq!(screen.pixel(9, 5), Some(0x33));
    assert_matches_reference(&scene, &e, &background);
}

#[test]
fn hairline_content_allocates_no_overlay() {
    let scene = Scene::new().view(1, Rect::new(0.0, 0.0, 40.0, 40.0), &[]).view(
        2,
        Rect::new(50.0, 0.0, 60.0, 10.0),
        &[(Rect::new(20.0, 0.0, 20.0, 30.0), 0x21)],
    );
    let mut e = software_embedder();
    let (background, ok) = scene.submit(&mut e, CTX);

    assert!(ok, "nothing to submit");
    assert!(e.host().overlay_placements().is_empty());
    assert!(e.pool().is_empty());
    assert_matches_reference(&scene, &e, &background);
}

#[test]
fn device_pixel_ratio_scales_view_size() {
    let mut scene = Scene::new();
    scene.device_pixel_ratio = 2.0;
    let scene = scene
        .view(1, Rect::new(4.0, 4.0, 44.0, 44.0), &[])
        .view(
            2,
            Rect::new(50.0, 0.0, 70.0, 20.0),
            &[(Rect::new(30.0, 30.0, 60.0, 60.0), 0x31)],
        );
    let mut e = software_embedder();
    let (background, ok) = scene.submit(&mut e, CTX);

    assert!(ok, "overlay submits");
    assert_eq!(
        e.host().frame_events()[1],
        HostEvent::PositionView(ViewId(1), Rect::new(4.0, 4.0, 44.0, 44.0))
    );
    assert_eq!(
        e.host().overlay_placements(),
        [(OverlayId(1), Rect::new(30.0, 30.0, 44.0, 44.0))]
    );
    assert_matches_reference(&scene, &e, &background);
}

#[test]
fn layers_persist_and_rebuild_on_context_change() {
    let scene = Scene::new().view(1, Rect::new(0.0, 0.0, 40.0, 40.0), &[]).view(
        2,
        Rect::new(50.0, 0.0, 60.0, 10.0),
        &[(Rect::new(5.0, 5.0, 15.0, 15.0), 0x41)],
    );
    let mut e = software_embedder();

    for _ in 0..3 {
        let (background, ok) = scene.submit(&mut e, CTX);
        assert!(ok, "frame submits");
        assert_matches_reference(&scene, &e, &background);
        e.finish_frame();
    }
    assert_eq!(e.host().overlays_created(), 1);
    assert_eq!(e.surface_factory().built(), [(WindowHandle(0x1001), CTX)]);

    let other = ContextId(2);
    let (background, ok) = scene.submit(&mut e, other);
    assert!(ok, "frame submits after context change");
    assert_matches_reference(&scene, &e, &background);
    e.finish_frame();

    assert_eq!(e.host().overlays_created(), 1);
    assert_eq!(
        e.surface_factory().built(),
        [(WindowHandle(0x1001), CTX), (WindowHandle(0x1001), other)]
    );
    assert_eq!(e.pool().layers()[0].context(), other);
}

#[test]
fn unused_layers_are_reported_for_hiding() {
    let two = Scene::new().view(1, Rect::new(0.0, 0.0, 60.0, 60.0), &[]).view(
        2,
        Rect::new(70.0, 0.0, 90.0, 20.0),
        &[
            (Rect::new(5.0, 5.0, 10.0, 10.0), 0x51),
            (Rect::new(40.0, 40.0, 50.0, 50.0), 0x52),
        ],
    );
    let none = Scene::new().view(1, Rect::new(0.0, 0.0, 60.0, 60.0), &[]);
    let mut e = software_embedder();

    let _ = two.submit(&mut e, CTX);
    assert!(e.unused_overlays().is_empty());
    e.finish_frame();

    let _ = none.submit(&mut e, CTX);
    let unused: Vec<OverlayId> = e.unused_overlays().iter().map(|l| l.id()).collect();
    assert_eq!(unused, [OverlayId(1), OverlayId(2)]);
    e.finish_frame();
}

#[test]
fn failed_overlay_fails_the_frame() {
    let scene = Scene::new().view(1, Rect::new(0.0, 0.0, 40.0, 40.0), &[]).view(
        2,
        Rect::new(50.0, 0.0, 60.0, 10.0),
        &[(Rect::new(5.0, 5.0, 15.0, 15.0), 0x61)],
    );
    let mut e = software_embedder();

    for failure in [FrameFailure::Acquire, FrameFailure::Submit] {
        e.surface_factory().set_failure(failure);
        let (background, ok) = scene.submit(&mut e, CTX);
        assert!(!ok, "{failure:?} is reported");
        assert!(!e.pool().layers()[0].did_submit_last_frame());
        assert!(presented_overlay(&e, OverlayId(1)).is_none());
        assert_eq!(
            count(&background, Rect::new(5.0, 5.0, 15.0, 15.0), BASE_COLOR),
            100,
            "region stays carved even when the overlay fails"
        );
        e.finish_frame();
    }

    e.surface_factory().set_failure(FrameFailure::None);
    let (_, ok) = scene.submit(&mut e, CTX);
    assert!(ok, "recovers once surfaces work again");
    assert!(e.pool().layers()[0].did_submit_last_frame());
}

#[test]
fn cancelled_frame_leaves_no_state_behind() {
    let scene = Scene::new().view(1, Rect::new(0.0, 0.0, 40.0, 40.0), &[]).view(
        2,
        Rect::new(50.0, 0.0, 60.0, 10.0),
        &[(Rect::new(5.0, 5.0, 15.0, 15.0), 0x71)],
    );
    let mut e = software_embedder();

    let _ = scene.submit(&mut e, CTX);
    e.cancel_frame();
    assert_eq!(e.state(), FrameState::Idle);
    assert_eq!(e.pool().available_index(), 0);
    assert!(e.composition_order().is_empty());
    assert!(!e.host().events().contains(&HostEvent::EndFrame));

    let (background, ok) = scene.submit(&mut e, CTX);
    assert!(ok, "next frame submits");
    assert_eq!(e.host().overlays_created(), 1);
    assert_matches_reference(&scene, &e, &background);
}

/// Forwards events to a shared [`RecorderSink`].
struct SharedRecorder(Rc<RefCell<RecorderSink>>);

impl TraceSink for SharedRecorder {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.0.borrow_mut().on_frame_begin(e);
    }
    fn on_view_placement(&mut self, e: &ViewPlacementEvent) {
        self.0.borrow_mut().on_view_placement(e);
    }
    fn on_overlay(&mut self, e: &OverlayEvent) {
        self.0.borrow_mut().on_overlay(e);
    }
    fn on_frame_submit(&mut self, e: &FrameSubmitEvent) {
        self.0.borrow_mut().on_frame_submit(e);
    }
    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        self.0.borrow_mut().on_frame_end(e);
    }
}

#[test]
fn trace_events_describe_the_frame() {
    let scene = Scene::new().view(1, Rect::new(0.0, 0.0, 40.0, 40.0), &[]).view(
        2,
        Rect::new(50.0, 0.0, 60.0, 10.0),
        &[(Rect::new(5.0, 5.0, 15.0, 15.0), 0x81)],
    );
    let shared = Rc::new(RefCell::new(RecorderSink::new()));
    let mut e = software_embedder();
    e.set_trace_sink(Some(Box::new(SharedRecorder(shared.clone()))));

    let _ = scene.submit(&mut e, CTX);
    e.finish_frame();

    let bytes = shared.borrow().as_bytes().to_vec();
    let events: Vec<RecordedEvent> = decode(&bytes).collect();
    assert_eq!(events.len(), 6);
    match &events[2] {
        RecordedEvent::Overlay(o) => {
            assert_eq!(o.owner, ViewId(2));
            assert_eq!(o.obscured, ViewId(1));
            assert_eq!(o.rect, Rect::new(5.0, 5.0, 15.0, 15.0));
            assert!(o.submitted);
            assert!(!o.collapsed);
        }
        other => panic!("expected Overlay, got {other:?}"),
    }
    match &events[4] {
        RecordedEvent::FrameSubmit(s) => {
            assert_eq!(s.view_count, 2);
            assert_eq!(s.overlay_count, 1);
            assert_eq!(s.layers_created, 1);
            assert!(s.success);
        }
        other => panic!("expected FrameSubmit, got {other:?}"),
    }

    let mut json = Vec::new();
    interpose_debug::report::export(&bytes, &mut json).unwrap();
    let report: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(report[0]["end"], "finished");
    assert_eq!(report[0]["overlays"][0]["layer"], 1);
}
