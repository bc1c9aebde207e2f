// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Visualization sinks
//!
//! A sink receives the projected boxes in insertion order together with the
//! playback mode; it decides how to show them.

use std::io::Write;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::playback::{Frame, Timeline};
use crate::projector::BoxDescriptor;

/// Receiver for projected boxes
pub trait VisualizationSink {
    /// Show `boxes`; revealed one by one when `incremental` is set
    fn render(&mut self, boxes: &[BoxDescriptor], incremental: bool) -> Result<()>;
}

#[derive(Serialize)]
struct Recording<'a> {
    incremental: bool,
    frames: Vec<Frame<'a>>,
}

/// Writes one JSON document per render call, newline terminated
///
/// ```
/// use arclayout_geometry::{JsonSink, VisualizationSink};
///
/// let mut sink = JsonSink::new(Vec::new());
/// sink.render(&[], true).unwrap();
/// let out = String::from_utf8(sink.into_inner()).unwrap();
/// assert!(out.starts_with("{\"incremental\":true"));
/// ```
pub struct JsonSink<W: Write> {
    writer: W,
    timeline: Timeline,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self::with_timeline(writer, Timeline::default())
    }

    pub fn with_timeline(writer: W, timeline: Timeline) -> Self {
        Self { writer, timeline }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> VisualizationSink for JsonSink<W> {
    fn render(&mut self, boxes: &[BoxDescriptor], incremental: bool) -> Result<()> {
        let recording = Recording {
            incremental,
            frames: self.timeline.frames(boxes, incremental),
        };

        serde_json::to_writer(&mut self.writer, &recording)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;

        info!(
            boxes = boxes.len(),
            frames = recording.frames.len(),
            "wrote layout recording"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_box() -> BoxDescriptor {
        BoxDescriptor {
            id: "wall_0".to_string(),
            class: "wall".to_string(),
            label: "wall".to_string(),
            center: [2.5, 0.0, 1.4],
            extents: [5.0, 0.2, 2.8],
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    #[test]
    fn test_json_sink_writes_frames() {
        let mut sink = JsonSink::new(Vec::new());
        sink.render(&[wall_box()], true).unwrap();

        let out = sink.into_inner();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let frames = value["frames"].as_array().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1]["time"], 0.5);
        assert_eq!(frames[1]["boxes"][0]["id"], "wall_0");
        assert_eq!(frames[1]["boxes"][0]["extents"][0], 5.0);
    }

    #[test]
    fn test_one_line_per_render() {
        let mut sink = JsonSink::new(Vec::new());
        sink.render(&[wall_box()], false).unwrap();
        sink.render(&[], false).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out.lines().count(), 2);
    }
}
