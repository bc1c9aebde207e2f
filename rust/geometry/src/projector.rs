// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layout to oriented boxes
//!
//! Every entity becomes one [`BoxDescriptor`] with full extents and a
//! rotation about the vertical axis:
//!
//! - walls: centered between their endpoints, lifted by half the height,
//!   heading taken from the endpoints
//! - doors and windows: lifted by half their height, depth and heading taken
//!   from the host wall
//! - bboxes: stored position, scale and yaw

use arclayout_core::{Bbox, EntityKind, Layout, Opening, Wall};
use nalgebra::Matrix3;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::transform::{from_rows, rotation_z, to_rows};

/// Oriented box handed to a visualization sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxDescriptor {
    /// Line-format key, e.g. `wall_0`
    pub id: String,
    /// Grouping used by renderers: `wall`, `door`, `window` or the bbox class
    pub class: String,
    pub label: String,
    pub center: [f64; 3],
    /// Full size along the box's local axes
    pub extents: [f64; 3],
    /// Row-major rotation about +Z
    pub rotation: [[f64; 3]; 3],
}

impl BoxDescriptor {
    fn new(
        kind: EntityKind,
        id: u32,
        class: &str,
        center: [f64; 3],
        extents: [f64; 3],
        angle: f64,
    ) -> Self {
        Self {
            id: format!("{}_{}", kind.prefix(), id),
            class: class.to_string(),
            label: class.to_string(),
            center,
            extents,
            rotation: to_rows(&rotation_z(angle)),
        }
    }

    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        from_rows(&self.rotation)
    }

    /// Half sizes, for renderers that take them instead of full extents
    pub fn half_extents(&self) -> [f64; 3] {
        self.extents.map(|e| 0.5 * e)
    }
}

pub fn project_wall(wall: &Wall) -> BoxDescriptor {
    let mid = wall.a.midpoint(&wall.b);
    BoxDescriptor::new(
        EntityKind::Wall,
        wall.id,
        EntityKind::Wall.prefix(),
        [mid.x, mid.y, mid.z + wall.height / 2.0],
        [wall.length(), wall.thickness, wall.height],
        wall.angle(),
    )
}

pub fn project_opening(kind: EntityKind, opening: &Opening, host: &Wall) -> BoxDescriptor {
    let p = &opening.position;
    BoxDescriptor::new(
        kind,
        opening.id,
        kind.prefix(),
        [p.x, p.y, p.z + opening.height / 2.0],
        [opening.width, host.thickness, opening.height],
        host.angle(),
    )
}

pub fn project_bbox(bbox: &Bbox) -> BoxDescriptor {
    BoxDescriptor::new(
        EntityKind::Bbox,
        bbox.id,
        &bbox.class_name,
        bbox.position.to_array(),
        bbox.scale.to_array(),
        bbox.angle_z,
    )
}

/// Project a layout in insertion order: walls, doors, windows, bboxes
///
/// Openings whose host wall id is not in the layout are left out. When
/// several walls share an id the first one hosts.
pub fn project(layout: &Layout) -> Vec<BoxDescriptor> {
    let mut walls_by_id: FxHashMap<u32, &Wall> = FxHashMap::default();
    for wall in &layout.walls {
        walls_by_id.entry(wall.id).or_insert(wall);
    }

    let mut boxes = Vec::with_capacity(layout.entity_count());
    boxes.extend(layout.walls.iter().map(project_wall));

    let openings = layout
        .doors
        .iter()
        .map(|o| (EntityKind::Door, o))
        .chain(layout.windows.iter().map(|o| (EntityKind::Window, o)));

    for (kind, opening) in openings {
        match walls_by_id.get(&opening.wall_id) {
            Some(host) => boxes.push(project_opening(kind, opening, host)),
            None => debug!(
                %kind,
                id = opening.id,
                wall_id = opening.wall_id,
                "skipping opening without host wall"
            ),
        }
    }

    boxes.extend(layout.bboxes.iter().map(project_bbox));
    boxes
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use arclayout_core::Point3D;
    use std::f64::consts::FRAC_PI_2;

    fn wall(id: u32, b: (f64, f64)) -> Wall {
        Wall {
            id,
            a: Point3D::new(0.0, 0.0, 1.0),
            b: Point3D::new(b.0, b.1, 1.0),
            height: 3.0,
            thickness: 0.25,
        }
    }

    #[test]
    fn test_wall_box() {
        let b = project_wall(&wall(2, (0.0, 4.0)));
        assert_eq!(b.id, "wall_2");
        assert_eq!(b.class, "wall");
        assert_eq!(b.label, "wall");
        assert_relative_eq!(b.center[1], 2.0);
        assert_relative_eq!(b.center[2], 2.5);
        assert_eq!(b.extents, [4.0, 0.25, 3.0]);
        assert_relative_eq!(b.rotation[1][0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_wall_has_zero_length() {
        let b = project_wall(&wall(0, (0.0, 0.0)));
        assert_relative_eq!(b.extents[0], 0.0);
        assert_relative_eq!(b.rotation[0][0], 1.0);
    }

    #[test]
    fn test_opening_inherits_host() {
        let host = wall(5, (0.0, 4.0));
        let window = Opening {
            id: 1,
            wall_id: 5,
            position: Point3D::new(0.0, 2.0, 0.9),
            width: 1.2,
            height: 1.0,
        };
        let b = project_opening(EntityKind::Window, &window, &host);
        assert_eq!(b.id, "window_1");
        assert_relative_eq!(b.center[2], 1.4);
        assert_eq!(b.extents, [1.2, 0.25, 1.0]);
        let yaw = crate::transform::yaw(&b.rotation_matrix());
        assert_relative_eq!(yaw, FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_orphan_opening_is_skipped() {
        let mut layout = Layout::new();
        layout.walls.push(wall(0, (4.0, 0.0)));
        layout.doors.push(Opening {
            id: 0,
            wall_id: 3,
            position: Point3D::default(),
            width: 1.0,
            height: 2.0,
        });
        let boxes = project(&layout);
        assert_eq!(boxes.len(), 1);
    }

    #[test]
    fn test_half_extents() {
        let b = project_bbox(&Bbox {
            id: 4,
            class_name: "bed".to_string(),
            position: Point3D::new(1.0, 1.0, 0.0),
            angle_z: 0.0,
            scale: Point3D::new(2.0, 1.6, 0.5),
        });
        assert_eq!(b.id, "bbox_4");
        assert_eq!(b.label, "bed");
        assert_eq!(b.half_extents(), [1.0, 0.8, 0.25]);
    }
}
