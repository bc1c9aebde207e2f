// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Description text to [`Layout`]

use tracing::info;

use crate::codec;
use crate::entity::Layout;
use crate::extract::{ExtractDefaults, ExtractorPipeline, IdCounters};
use crate::floors::resolve_floors;

/// Rule-based converter from a room description to a layout
///
/// Holds no per-call state: id counters are created fresh for every
/// [`generate_layout`](Self::generate_layout) call, so one converter can
/// be shared across threads.
///
/// ```
/// use arclayout_core::TextToLayout;
///
/// let layout = TextToLayout::new().generate_layout(
///     "wall from (0,0,0) to (5,0,0)\ndoor on wall 0 at position (2.5,0,0)",
/// );
/// assert_eq!(layout.walls.len(), 1);
/// assert_eq!(layout.doors.len(), 1);
/// ```
pub struct TextToLayout {
    defaults: ExtractDefaults,
    pipeline: ExtractorPipeline,
}

impl TextToLayout {
    pub fn new() -> Self {
        Self::with_defaults(ExtractDefaults::default())
    }

    /// Converter using custom values for omitted fields
    pub fn with_defaults(defaults: ExtractDefaults) -> Self {
        Self {
            defaults,
            pipeline: ExtractorPipeline::with_default_patterns(),
        }
    }

    /// Converter running a custom pattern pipeline
    pub fn with_pipeline(defaults: ExtractDefaults, pipeline: ExtractorPipeline) -> Self {
        Self { defaults, pipeline }
    }

    pub fn defaults(&self) -> &ExtractDefaults {
        &self.defaults
    }

    /// Extract every entity in `text`
    ///
    /// The full text is scanned once per floor, in floor-table order. Walls
    /// without z take that floor's height; `wall N` references resolve
    /// only against walls of the same pass.
    pub fn generate_layout(&self, text: &str) -> Layout {
        let floors = resolve_floors(text);
        let mut counters = IdCounters::new();
        let mut layout = Layout::new();

        for floor in floors.iter() {
            self.pipeline.run_floor(
                text,
                floor.height,
                &mut counters,
                &self.defaults,
                &mut layout,
            );
        }

        info!(
            floors = floors.len(),
            walls = layout.walls.len(),
            doors = layout.doors.len(),
            windows = layout.windows.len(),
            bboxes = layout.bboxes.len(),
            "generated layout"
        );

        layout
    }

    /// Extract and serialize to the line format
    pub fn generate_layout_string(&self, text: &str) -> String {
        codec::serialize(&self.generate_layout(text))
    }
}

impl Default for TextToLayout {
    fn default() -> Self {
        Self::new()
    }
}
