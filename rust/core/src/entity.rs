// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layout entities: walls, wall openings and free-standing boxes
//!
//! Entities are plain records. They are created by the phrase extractor or
//! the line-format codec and never mutated afterwards.

use std::borrow::Cow;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 3D point (also used for box extents)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Distance to `other` ignoring the vertical component
    pub fn horizontal_distance_to(&self, other: &Point3D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: &Point3D) -> Point3D {
        Point3D::new(
            (self.x + other.x) / 2.0,
            (self.y + other.y) / 2.0,
            (self.z + other.z) / 2.0,
        )
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Entity category, used for id counters and line-format prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntityKind {
    Wall,
    Door,
    Window,
    Bbox,
}

impl EntityKind {
    /// Lowercase prefix used in line-format keys (`wall_0`)
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::Wall => "wall",
            EntityKind::Door => "door",
            EntityKind::Window => "window",
            EntityKind::Bbox => "bbox",
        }
    }

    /// Constructor name used in line-format values (`Wall(...)`)
    pub fn type_name(&self) -> &'static str {
        match self {
            EntityKind::Wall => "Wall",
            EntityKind::Door => "Door",
            EntityKind::Window => "Window",
            EntityKind::Bbox => "Bbox",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "wall" => Some(EntityKind::Wall),
            "door" => Some(EntityKind::Door),
            "window" => Some(EntityKind::Window),
            "bbox" => Some(EntityKind::Bbox),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Straight wall between two endpoints
///
/// Degenerate walls (`a == b`) are accepted; they project to zero-length
/// boxes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wall {
    pub id: u32,
    pub a: Point3D,
    pub b: Point3D,
    pub height: f64,
    pub thickness: f64,
}

impl Wall {
    /// Heading of the wall in the XY plane, `atan2(dy, dx)` from `a` to `b`
    pub fn angle(&self) -> f64 {
        (self.b.y - self.a.y).atan2(self.b.x - self.a.x)
    }

    /// Horizontal length
    pub fn length(&self) -> f64 {
        self.a.horizontal_distance_to(&self.b)
    }
}

/// Opening type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OpeningType {
    Door,
    Window,
}

impl OpeningType {
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            OpeningType::Door => EntityKind::Door,
            OpeningType::Window => EntityKind::Window,
        }
    }
}

/// Door or window hosted by a wall
///
/// `wall_id` is the id of the host wall, not its index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Opening {
    pub id: u32,
    pub wall_id: u32,
    pub position: Point3D,
    pub width: f64,
    pub height: f64,
}

/// Oriented box for furniture, fixtures, built-ins and architectural features
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bbox {
    pub id: u32,
    /// Word characters only (`[A-Za-z0-9_]`, Unicode letters allowed).
    /// Use [`Bbox::new`] to normalize arbitrary input.
    pub class_name: String,
    pub position: Point3D,
    /// Yaw about the vertical axis, radians
    pub angle_z: f64,
    /// Full extents along each axis
    pub scale: Point3D,
}

impl Bbox {
    /// Build a box, normalizing `class_name` with [`normalize_class_name`]
    pub fn new(
        id: u32,
        class_name: &str,
        position: Point3D,
        angle_z: f64,
        scale: Point3D,
    ) -> Self {
        Self {
            id,
            class_name: normalize_class_name(class_name).into_owned(),
            position,
            angle_z,
            scale,
        }
    }
}

/// Trim `name` and replace every non-word character with `_`
///
/// The result survives a trip through the line format unchanged.
pub fn normalize_class_name(name: &str) -> Cow<'_, str> {
    let trimmed = name.trim();
    if trimmed.chars().all(is_word_char) {
        return Cow::Borrowed(trimmed);
    }
    Cow::Owned(
        trimmed
            .chars()
            .map(|c| if is_word_char(c) { c } else { '_' })
            .collect(),
    )
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Any single layout entity
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Wall(Wall),
    Door(Opening),
    Window(Opening),
    Bbox(Bbox),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Wall(_) => EntityKind::Wall,
            Entity::Door(_) => EntityKind::Door,
            Entity::Window(_) => EntityKind::Window,
            Entity::Bbox(_) => EntityKind::Bbox,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            Entity::Wall(w) => w.id,
            Entity::Door(o) | Entity::Window(o) => o.id,
            Entity::Bbox(b) => b.id,
        }
    }
}

/// All entities parsed from one description
///
/// Ids are scoped per entity kind.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layout {
    pub walls: Vec<Wall>,
    pub doors: Vec<Opening>,
    pub windows: Vec<Opening>,
    pub bboxes: Vec<Bbox>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity to the collection for its kind
    pub fn push(&mut self, entity: Entity) {
        match entity {
            Entity::Wall(w) => self.walls.push(w),
            Entity::Door(o) => self.doors.push(o),
            Entity::Window(o) => self.windows.push(o),
            Entity::Bbox(b) => self.bboxes.push(b),
        }
    }

    /// First wall carrying `id`
    pub fn wall(&self, id: u32) -> Option<&Wall> {
        self.walls.iter().find(|w| w.id == id)
    }

    pub fn entity_count(&self) -> usize {
        self.walls.len() + self.doors.len() + self.windows.len() + self.bboxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entity_count() == 0
    }

    /// Entities in line-format order: walls, doors, windows, bboxes
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.walls
            .iter()
            .cloned()
            .map(Entity::Wall)
            .chain(self.doors.iter().cloned().map(Entity::Door))
            .chain(self.windows.iter().cloned().map(Entity::Window))
            .chain(self.bboxes.iter().cloned().map(Entity::Bbox))
    }
}
