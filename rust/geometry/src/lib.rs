// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ArcLayout Geometry
//!
//! Projection of layout entities into oriented boxes using nalgebra
//! rotations, plus the playback timeline and sinks that consume them.

pub mod error;
pub mod playback;
pub mod projector;
pub mod sink;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix3, Vector3};

pub use error::{Error, Result};
pub use playback::{Frame, Timeline, DEFAULT_STEP_SECS};
pub use projector::{project, project_bbox, project_opening, project_wall, BoxDescriptor};
pub use sink::{JsonSink, VisualizationSink};
pub use transform::rotation_z;
