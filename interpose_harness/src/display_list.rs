// Copyright 2026 the Interpose Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recorded pictures as flat lists of solid fills.

use alloc::vec::Vec;

use interpose_core::backend::{RecordedPicture, Recorder, Recording};
use kurbo::Rect;

use crate::raster::Pixel;

/// A solid fill of `rect` with `color`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillRect {
    /// Area to fill, in frame coordinates.
    pub rect: Rect,
    /// Fill color.
    pub color: Pixel,
}

/// A replayable picture: fills applied in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    ops: Vec<FillRect>,
}

impl DisplayList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fill.
    pub fn fill_rect(&mut self, rect: Rect, color: Pixel) {
        self.ops.push(FillRect { rect, color });
    }

    /// Returns the fills in order.
    #[must_use]
    pub fn ops(&self) -> &[FillRect] {
        &self.ops
    }

    /// Returns `true` if nothing was drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// The canvas handed out while recording.
#[derive(Debug, Default)]
pub struct ListCanvas {
    list: DisplayList,
}

impl ListCanvas {
    /// Records a fill.
    pub fn fill_rect(&mut self, rect: Rect, color: Pixel) {
        self.list.fill_rect(rect, color);
    }
}

/// An open display-list recording.
#[derive(Debug)]
pub struct ListRecording {
    bounds: Rect,
    canvas: ListCanvas,
}

impl ListRecording {
    /// Returns the bounds hint the recording was opened with.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}

impl Recording for ListRecording {
    type Canvas = ListCanvas;
    type Picture = DisplayList;

    fn canvas(&mut self) -> &mut ListCanvas {
        &mut self.canvas
    }

    fn finish(self) -> RecordedPicture<DisplayList> {
        let op_bounds = self.canvas.list.ops.iter().map(|op| op.rect).collect();
        RecordedPicture {
            picture: self.canvas.list,
            op_bounds,
        }
    }
}

/// Opens [`ListRecording`]s and counts them.
#[derive(Debug, Default)]
pub struct ListRecorder {
    opened: usize,
    last_bounds: Option<Rect>,
}

impl ListRecorder {
    /// Creates a recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many recordings have been opened.
    #[must_use]
    pub fn opened(&self) -> usize {
        self.opened
    }

    /// Returns the bounds hint of the most recent recording.
    #[must_use]
    pub fn last_bounds(&self) -> Option<Rect> {
        self.last_bounds
    }
}

impl Recorder for ListRecorder {
    type Recording = ListRecording;

    fn open_recording(&mut self, bounds: Rect) -> ListRecording {
        self.opened += 1;
        self.last_bounds = Some(bounds);
        ListRecording {
            bounds,
            canvas: ListCanvas::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finished_recording_reports_one_box_per_fill() {
        let mut recorder = ListRecorder::new();
        let mut recording = recorder.open_recording(Rect::new(0.0, 0.0, 64.0, 64.0));
        recording.canvas().fill_rect(Rect::new(1.0, 1.0, 4.0, 4.0), 7);
        recording.canvas().fill_rect(Rect::new(2.0, 2.0, 9.0, 3.0), 8);
        assert_eq!(recording.bounds(), Rect::new(0.0, 0.0, 64.0, 64.0));

        let RecordedPicture { picture, op_bounds } = recording.finish();
        assert_eq!(
            op_bounds,
            [Rect::new(1.0, 1.0, 4.0, 4.0), Rect::new(2.0, 2.0, 9.0, 3.0)]
        );
        assert_eq!(picture.ops()[1].color, 8);
        assert_eq!(recorder.opened(), 1);
    }
}
