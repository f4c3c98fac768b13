// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].

use interpose_core::backend::{ContextId, OverlayId};
use interpose_core::trace::{
    FrameBeginEvent, FrameEndEvent, FrameSubmitEvent, OverlayEvent, TraceSink,
    ViewPlacementEvent,
};
use interpose_core::view::ViewId;
use kurbo::{Rect, Size};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME_BEGIN: u8 = 1;
const TAG_VIEW_PLACEMENT: u8 = 2;
const TAG_OVERLAY: u8 = 3;
const TAG_FRAME_SUBMIT: u8 = 4;
const TAG_FRAME_END: u8 = 5;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_rect(&mut self, r: Rect) {
        self.write_f64(r.x0);
        self.write_f64(r.y0);
        self.write_f64(r.x1);
        self.write_f64(r.y1);
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.write_u8(TAG_FRAME_BEGIN);
        self.write_u64(e.frame_index);
        self.write_f64(e.frame_size.width);
        self.write_f64(e.frame_size.height);
        self.write_u64(e.context.0);
        self.write_f64(e.device_pixel_ratio);
    }

    fn on_view_placement(&mut self, e: &ViewPlacementEvent) {
        self.write_u8(TAG_VIEW_PLACEMENT);
        self.write_u64(e.frame_index);
        self.write_i64(e.view.0);
        self.write_rect(e.rect);
        self.write_bool(e.params_changed);
        self.write_u32(e.op_count);
    }

    fn on_overlay(&mut self, e: &OverlayEvent) {
        self.write_u8(TAG_OVERLAY);
        self.write_u64(e.frame_index);
        self.write_i64(e.owner.0);
        self.write_i64(e.obscured.0);
        self.write_u64(e.overlay.0);
        self.write_rect(e.rect);
        self.write_bool(e.collapsed);
        self.write_bool(e.submitted);
    }

    fn on_frame_submit(&mut self, e: &FrameSubmitEvent) {
        self.write_u8(TAG_FRAME_SUBMIT);
        self.write_u64(e.frame_index);
        self.write_u32(e.view_count);
        self.write_u32(e.overlay_count);
        self.write_u32(e.layers_created);
        self.write_u32(e.unused_layers);
        self.write_bool(e.success);
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        self.write_u8(TAG_FRAME_END);
        self.write_u64(e.frame_index);
        self.write_bool(e.cancelled);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`FrameBeginEvent`].
    FrameBegin(FrameBeginEvent),
    /// A [`ViewPlacementEvent`].
    ViewPlacement(ViewPlacementEvent),
    /// An [`OverlayEvent`].
    Overlay(OverlayEvent),
    /// A [`FrameSubmitEvent`].
    FrameSubmit(FrameSubmitEvent),
    /// A [`FrameEndEvent`].
    FrameEnd(FrameEndEvent),
}

impl RecordedEvent {
    /// Returns the frame counter carried by the event.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        match self {
            Self::FrameBegin(e) => e.frame_index,
            Self::ViewPlacement(e) => e.frame_index,
            Self::Overlay(e) => e.frame_index,
            Self::FrameSubmit(e) => e.frame_index,
            Self::FrameEnd(e) => e.frame_index,
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_bool(&mut self) -> Option<bool> {
        self.read_u8().map(|b| b != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_i64(&mut self) -> Option<i64> {
        self.take().map(i64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn read_rect(&mut self) -> Option<Rect> {
        Some(Rect::new(
            self.read_f64()?,
            self.read_f64()?,
            self.read_f64()?,
            self.read_f64()?,
        ))
    }

    fn decode_frame_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameBegin(FrameBeginEvent {
            frame_index: self.read_u64()?,
            frame_size: Size::new(self.read_f64()?, self.read_f64()?),
            context: ContextId(self.read_u64()?),
            device_pixel_ratio: self.read_f64()?,
        }))
    }

    fn decode_view_placement(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ViewPlacement(ViewPlacementEvent {
            frame_index: self.read_u64()?,
            view: ViewId(self.read_i64()?),
            rect: self.read_rect()?,
            params_changed: self.read_bool()?,
            op_count: self.read_u32()?,
        }))
    }

    fn decode_overlay(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Overlay(OverlayEvent {
            frame_index: self.read_u64()?,
            owner: ViewId(self.read_i64()?),
            obscured: ViewId(self.read_i64()?),
            overlay: OverlayId(self.read_u64()?),
            rect: self.read_rect()?,
            collapsed: self.read_bool()?,
            submitted: self.read_bool()?,
        }))
    }

    fn decode_frame_submit(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSubmit(FrameSubmitEvent {
            frame_index: self.read_u64()?,
            view_count: self.read_u32()?,
            overlay_count: self.read_u32()?,
            layers_created: self.read_u32()?,
            unused_layers: self.read_u32()?,
            success: self.read_bool()?,
        }))
    }

    fn decode_frame_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameEnd(FrameEndEvent {
            frame_index: self.read_u64()?,
            cancelled: self.read_bool()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_FRAME_BEGIN => self.decode_frame_begin(),
            TAG_VIEW_PLACEMENT => self.decode_view_placement(),
            TAG_OVERLAY => self.decode_overlay(),
            TAG_FRAME_SUBMIT => self.decode_frame_submit(),
            TAG_FRAME_END => self.decode_frame_end(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
