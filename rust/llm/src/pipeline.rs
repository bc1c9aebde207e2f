// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Free-form text to layout, boxes and visualization.

use arclayout_core::{codec, TextToLayout};
use arclayout_geometry::{project, BoxDescriptor, VisualizationSink};

use crate::client::{ClaudeClient, StructuredTextGenerator};
use crate::error::Result;

/// End-to-end pipeline: remote generator, rule-based converter, projection.
pub struct ArcLayout<G = ClaudeClient> {
    generator: G,
    converter: TextToLayout,
}

impl ArcLayout<ClaudeClient> {
    /// Pipeline backed by a client configured from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ClaudeClient::from_env()?))
    }
}

impl<G: StructuredTextGenerator> ArcLayout<G> {
    pub fn new(generator: G) -> Self {
        Self::with_converter(generator, TextToLayout::new())
    }

    pub fn with_converter(generator: G, converter: TextToLayout) -> Self {
        Self {
            generator,
            converter,
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Free-form text to line-format layout.
    pub async fn convert_text_to_layout(&self, text: &str) -> Result<String> {
        let description = self.generator.generate_structured_text(text).await?;
        tracing::debug!(lines = description.lines().count(), "Received structured description");
        Ok(self.converter.generate_layout_string(&description))
    }

    /// Free-form text to projected boxes.
    pub async fn text_to_boxes(&self, text: &str) -> Result<Vec<BoxDescriptor>> {
        let description = self.generator.generate_structured_text(text).await?;
        Ok(project(&self.converter.generate_layout(&description)))
    }

    /// Parse line-format text, project it and hand the boxes to `sink`.
    pub fn visualize<S: VisualizationSink>(
        &self,
        layout_str: &str,
        sink: &mut S,
        incremental: bool,
    ) -> Result<()> {
        let boxes = project(&codec::parse(layout_str));
        tracing::info!(boxes = boxes.len(), incremental, "Visualizing layout");
        sink.render(&boxes, incremental)?;
        Ok(())
    }

    /// Convert, visualize, and return the line-format layout.
    pub async fn text_to_visualization<S: VisualizationSink>(
        &self,
        text: &str,
        sink: &mut S,
        incremental: bool,
    ) -> Result<String> {
        let layout_str = self.convert_text_to_layout(text).await?;
        self.visualize(&layout_str, sink, incremental)?;
        Ok(layout_str)
    }
}
