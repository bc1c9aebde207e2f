// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reveal timeline for box playback

use serde::Serialize;

use crate::projector::BoxDescriptor;

/// Time between two revealed boxes
pub const DEFAULT_STEP_SECS: f64 = 0.5;

/// Boxes visible from `time` on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame<'a> {
    pub time: f64,
    pub boxes: &'a [BoxDescriptor],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    pub step_secs: f64,
}

impl Timeline {
    pub fn new(step_secs: f64) -> Self {
        Self { step_secs }
    }

    /// Frames for `boxes`
    ///
    /// Incremental playback yields `n + 1` frames: frame `i` at
    /// `i * step_secs` shows the first `i` boxes, starting empty. Otherwise
    /// a single frame at time 0 shows everything.
    pub fn frames<'a>(&self, boxes: &'a [BoxDescriptor], incremental: bool) -> Vec<Frame<'a>> {
        if !incremental {
            return vec![Frame { time: 0.0, boxes }];
        }

        (0..=boxes.len())
            .map(|i| Frame {
                time: i as f64 * self.step_secs,
                boxes: &boxes[..i],
            })
            .collect()
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn boxes(n: usize) -> Vec<BoxDescriptor> {
        (0..n)
            .map(|i| BoxDescriptor {
                id: format!("bbox_{i}"),
                class: "chair".to_string(),
                label: "chair".to_string(),
                center: [i as f64, 0.0, 0.0],
                extents: [1.0; 3],
                rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            })
            .collect()
    }

    #[test]
    fn test_incremental_frames() {
        let boxes = boxes(3);
        let frames = Timeline::default().frames(&boxes, true);
        assert_eq!(frames.len(), 4);
        assert!(frames[0].boxes.is_empty());
        assert_relative_eq!(frames[3].time, 1.5);
        assert_eq!(frames[3].boxes.len(), 3);
        assert_eq!(frames[2].boxes[1].id, "bbox_1");
    }

    #[test]
    fn test_all_at_once() {
        let boxes = boxes(3);
        let frames = Timeline::default().frames(&boxes, false);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].boxes.len(), 3);
    }

    #[test]
    fn test_empty_incremental() {
        let frames = Timeline::new(1.0).frames(&[], true);
        assert_eq!(frames.len(), 1);
        assert!(frames[0].boxes.is_empty());
    }
}
