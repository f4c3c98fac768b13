// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A host that logs every notification.

use alloc::vec::Vec;

use interpose_core::backend::{Host, OverlayId, WindowHandle};
use interpose_core::view::ViewId;
use kurbo::Rect;

/// One notification received by a [`HostLog`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    /// `on_begin_frame`.
    BeginFrame,
    /// `on_position_embedded_view`.
    PositionView(ViewId, Rect),
    /// `on_position_overlay`.
    PositionOverlay(OverlayId, Rect),
    /// `on_create_overlay_window`, with the handles it returned.
    CreateOverlay(OverlayId, WindowHandle),
    /// `on_end_frame`.
    EndFrame,
}

/// Records host notifications and hands out sequential overlay windows.
#[derive(Debug, Default)]
pub struct HostLog {
    events: Vec<HostEvent>,
    overlays_created: u64,
}

impl HostLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every event received so far.
    #[must_use]
    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Returns the events since the most recent `BeginFrame`, inclusive.
    #[must_use]
    pub fn frame_events(&self) -> &[HostEvent] {
        let start = self
            .events
            .iter()
            .rposition(|e| *e == HostEvent::BeginFrame)
            .unwrap_or(0);
        &self.events[start..]
    }

    /// Returns the number of overlay windows created.
    #[must_use]
    pub fn overlays_created(&self) -> u64 {
        self.overlays_created
    }

    /// Returns the overlay placements of the current frame, in order.
    #[must_use]
    pub fn overlay_placements(&self) -> Vec<(OverlayId, Rect)> {
        self.frame_events()
            .iter()
            .filter_map(|e| match e {
                HostEvent::PositionOverlay(id, rect) => Some((*id, *rect)),
                _ => None,
            })
            .collect()
    }
}

impl Host for HostLog {
    fn on_begin_frame(&mut self) {
        self.events.push(HostEvent::BeginFrame);
    }

    fn on_position_embedded_view(&mut self, view: ViewId, rect: Rect) {
        self.events.push(HostEvent::PositionView(view, rect));
    }

    fn on_position_overlay(&mut self, overlay: OverlayId, rect: Rect) {
        self.events.push(HostEvent::PositionOverlay(overlay, rect));
    }

    fn on_create_overlay_window(&mut self) -> (OverlayId, WindowHandle) {
        self.overlays_created += 1;
        let id = OverlayId(self.overlays_created);
        let window = WindowHandle(0x1000 + self.overlays_created);
        self.events.push(HostEvent::CreateOverlay(id, window));
        (id, window)
    }

    fn on_end_frame(&mut self) {
        self.events.push(HostEvent::EndFrame);
    }
}
