// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Phrase extraction
//!
//! Each entity phrase ("wall from (A) to (B)", "door on wall N at position
//! (P)", ...) is recognized by one [`PhrasePattern`]. The
//! [`ExtractorPipeline`] runs every registered pattern over the full text
//! once per floor, wall patterns first so that openings and built-ins can
//! resolve `wall N` against the walls of the same pass.

pub mod grammar;
pub mod patterns;

use crate::entity::{Entity, EntityKind, Layout, Wall};

pub use patterns::{
    BuiltInPattern, DoorPattern, FeaturePattern, FixturePattern, ObjectPattern, WallPattern,
    WindowPattern,
};

/// Which phrase a pattern recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Wall,
    Door,
    Window,
    Object,
    Fixture,
    BuiltIn,
    Feature,
}

impl PatternKind {
    /// Whether matches index into the walls of the current pass
    pub fn references_walls(&self) -> bool {
        matches!(
            self,
            PatternKind::Door | PatternKind::Window | PatternKind::BuiltIn
        )
    }

    pub fn produces(&self) -> EntityKind {
        match self {
            PatternKind::Wall => EntityKind::Wall,
            PatternKind::Door => EntityKind::Door,
            PatternKind::Window => EntityKind::Window,
            PatternKind::Object
            | PatternKind::Fixture
            | PatternKind::BuiltIn
            | PatternKind::Feature => EntityKind::Bbox,
        }
    }
}

/// Values used when a phrase omits a field
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractDefaults {
    pub wall_height: f64,
    pub wall_thickness: f64,
    pub door_width: f64,
    pub door_height: f64,
    pub window_width: f64,
    pub window_height: f64,
    pub object_angle: f64,
    pub object_scale: f64,
    /// Vertical extent of a fixture given only two dimensions
    pub fixture_depth_z: f64,
    /// Depth of a built-in measured away from its wall
    pub built_in_depth: f64,
    pub built_in_height: f64,
    /// Vertical extent of a feature given only two dimensions
    pub feature_height: f64,
    pub feature_style: String,
}

impl Default for ExtractDefaults {
    fn default() -> Self {
        Self {
            wall_height: 2.8,
            wall_thickness: 0.2,
            door_width: 1.0,
            door_height: 2.0,
            window_width: 1.5,
            window_height: 1.0,
            object_angle: 0.0,
            object_scale: 1.0,
            fixture_depth_z: 0.5,
            built_in_depth: 0.6,
            built_in_height: 2.0,
            feature_height: 3.0,
            feature_style: "default".to_string(),
        }
    }
}

/// Per-kind id counters for one generation call
///
/// Owned by the caller and passed explicitly, so a converter holds no
/// mutable state and can be shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdCounters {
    wall: u32,
    door: u32,
    window: u32,
    bbox: u32,
}

impl IdCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the next id for `kind` and advance its counter
    pub fn next(&mut self, kind: EntityKind) -> u32 {
        let counter = match kind {
            EntityKind::Wall => &mut self.wall,
            EntityKind::Door => &mut self.door,
            EntityKind::Window => &mut self.window,
            EntityKind::Bbox => &mut self.bbox,
        };
        let id = *counter;
        *counter += 1;
        id
    }

    /// Number of ids handed out so far for `kind`
    pub fn issued(&self, kind: EntityKind) -> u32 {
        match kind {
            EntityKind::Wall => self.wall,
            EntityKind::Door => self.door,
            EntityKind::Window => self.window,
            EntityKind::Bbox => self.bbox,
        }
    }
}

/// State of one floor pass
pub struct ExtractContext<'c> {
    /// Elevation given to wall endpoints that omit z
    pub floor_height: f64,
    /// Walls extracted so far in this pass, in source order
    pub walls: Vec<Wall>,
    pub counters: &'c mut IdCounters,
    pub defaults: &'c ExtractDefaults,
}

impl<'c> ExtractContext<'c> {
    pub fn new(
        floor_height: f64,
        counters: &'c mut IdCounters,
        defaults: &'c ExtractDefaults,
    ) -> Self {
        Self {
            floor_height,
            walls: Vec::new(),
            counters,
            defaults,
        }
    }

    /// Wall referenced as `wall N` in this pass
    pub fn wall_at(&self, index: usize) -> Option<&Wall> {
        self.walls.get(index)
    }

    pub fn next_id(&mut self, kind: EntityKind) -> u32 {
        self.counters.next(kind)
    }
}

/// A phrase recognizer
///
/// `extract` scans the whole text and returns one entity per successful
/// match. Matches that cannot be built (bad numbers, dangling wall
/// references) are dropped.
pub trait PhrasePattern: Send + Sync {
    fn kind(&self) -> PatternKind;

    fn extract(&self, text: &str, ctx: &mut ExtractContext<'_>) -> Vec<Entity>;
}

/// Ordered set of phrase patterns
pub struct ExtractorPipeline {
    patterns: Vec<Box<dyn PhrasePattern>>,
}

impl ExtractorPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Create a pipeline with every built-in pattern registered
    ///
    /// Order: walls, doors, windows, objects, fixtures, built-ins,
    /// architectural features.
    pub fn with_default_patterns() -> Self {
        let mut pipeline = Self::new();
        pipeline.register(Box::new(WallPattern));
        pipeline.register(Box::new(DoorPattern));
        pipeline.register(Box::new(WindowPattern));
        pipeline.register(Box::new(ObjectPattern));
        pipeline.register(Box::new(FixturePattern));
        pipeline.register(Box::new(BuiltInPattern));
        pipeline.register(Box::new(FeaturePattern));
        pipeline
    }

    pub fn register(&mut self, pattern: Box<dyn PhrasePattern>) {
        self.patterns.push(pattern);
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Run one floor pass over `text`, appending entities to `layout`
    ///
    /// Wall-producing patterns run before all others regardless of
    /// registration order; the rest keep their registration order.
    pub fn run_floor(
        &self,
        text: &str,
        floor_height: f64,
        counters: &mut IdCounters,
        defaults: &ExtractDefaults,
        layout: &mut Layout,
    ) {
        let mut ctx = ExtractContext::new(floor_height, counters, defaults);

        let walls_first = self
            .patterns
            .iter()
            .filter(|p| p.kind() == PatternKind::Wall)
            .chain(self.patterns.iter().filter(|p| p.kind() != PatternKind::Wall));

        for pattern in walls_first {
            for entity in pattern.extract(text, &mut ctx) {
                if let Entity::Wall(wall) = &entity {
                    ctx.walls.push(wall.clone());
                }
                layout.push(entity);
            }
        }
    }
}

impl Default for ExtractorPipeline {
    fn default() -> Self {
        Self::with_default_patterns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_per_kind() {
        let mut counters = IdCounters::new();
        assert_eq!(counters.next(EntityKind::Wall), 0);
        assert_eq!(counters.next(EntityKind::Wall), 1);
        assert_eq!(counters.next(EntityKind::Door), 0);
        assert_eq!(counters.issued(EntityKind::Wall), 2);
        assert_eq!(counters.issued(EntityKind::Bbox), 0);
    }

    #[test]
    fn test_walls_run_first_regardless_of_registration() {
        let mut pipeline = ExtractorPipeline::new();
        pipeline.register(Box::new(DoorPattern));
        pipeline.register(Box::new(WallPattern));

        let text = "door on wall 0 at position (1,0)\nwall from (0,0) to (4,0)";
        let mut layout = Layout::new();
        pipeline.run_floor(
            text,
            0.0,
            &mut IdCounters::new(),
            &ExtractDefaults::default(),
            &mut layout,
        );

        assert_eq!(layout.walls.len(), 1);
        assert_eq!(layout.doors.len(), 1);
        assert_eq!(layout.doors[0].wall_id, 0);
    }

    #[test]
    fn test_default_pipeline_registers_all_patterns() {
        let pipeline = ExtractorPipeline::default();
        assert_eq!(pipeline.len(), 7);
    }

    #[test]
    fn test_pattern_kind_references() {
        assert!(PatternKind::Door.references_walls());
        assert!(PatternKind::BuiltIn.references_walls());
        assert!(!PatternKind::Fixture.references_walls());
        assert_eq!(PatternKind::Feature.produces(), EntityKind::Bbox);
    }
}
