// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON frame reports.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes a JSON array with one object per frame: its size, each view
//! placement, each overlay, the submission summary, and how the frame ended.
//! Rectangles are written as `[x0, y0, x1, y1]` in physical pixels.

use std::io::{self, Write};

use kurbo::Rect;
use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

#[derive(Default)]
struct FrameReport {
    frame_index: u64,
    begin: Value,
    views: Vec<Value>,
    overlays: Vec<Value>,
    submit: Value,
    end: Value,
}

impl FrameReport {
    fn into_json(self) -> Value {
        json!({
            "frame_index": self.frame_index,
            "begin": self.begin,
            "views": self.views,
            "overlays": self.overlays,
            "submit": self.submit,
            "end": self.end,
        })
    }
}

fn rect_json(r: Rect) -> Value {
    json!([r.x0, r.y0, r.x1, r.y1])
}

/// Exports recorded events as a JSON array of per-frame reports.
///
/// Events are grouped by frame index. An event whose frame was never begun
/// in the recording opens a report of its own with a `null` `begin`.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut frames: Vec<FrameReport> = Vec::new();

    for recorded in decode(bytes) {
        let frame_index = recorded.frame_index();
        let starts_frame = matches!(recorded, RecordedEvent::FrameBegin(_));
        if starts_frame || frames.last().is_none_or(|f| f.frame_index != frame_index) {
            frames.push(FrameReport {
                frame_index,
                ..FrameReport::default()
            });
        }
        let Some(frame) = frames.last_mut() else {
            continue;
        };

        match recorded {
            RecordedEvent::FrameBegin(e) => {
                frame.begin = json!({
                    "size": [e.frame_size.width, e.frame_size.height],
                    "device_pixel_ratio": e.device_pixel_ratio,
                    "context": e.context.0,
                });
            }
            RecordedEvent::ViewPlacement(e) => {
                frame.views.push(json!({
                    "view": e.view.0,
                    "rect": rect_json(e.rect),
                    "params_changed": e.params_changed,
                    "op_count": e.op_count,
                }));
            }
            RecordedEvent::Overlay(e) => {
                frame.overlays.push(json!({
                    "layer": e.overlay.0,
                    "owner": e.owner.0,
                    "obscured": e.obscured.0,
                    "rect": rect_json(e.rect),
                    "collapsed": e.collapsed,
                    "submitted": e.submitted,
                }));
            }
            RecordedEvent::FrameSubmit(e) => {
                frame.submit = json!({
                    "view_count": e.view_count,
                    "overlay_count": e.overlay_count,
                    "layers_created": e.layers_created,
                    "unused_layers": e.unused_layers,
                    "success": e.success,
                });
            }
            RecordedEvent::FrameEnd(e) => {
                frame.end = json!(if e.cancelled { "cancelled" } else { "finished" });
            }
        }
    }

    let report: Vec<Value> = frames.into_iter().map(FrameReport::into_json).collect();
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writer.write_all(b"\n")
}
