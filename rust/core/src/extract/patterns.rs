// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Built-in phrase patterns
//!
//! Each pattern is split in two steps: a nom parser that recognizes the
//! phrase and captures raw fields, and a builder that converts the capture
//! into an entity using the pass context. A capture whose groups do not
//! hold numbers is dropped by the builder, after the parser has already
//! consumed its text.

use std::f64::consts::{FRAC_PI_2, PI};

use nom::{
    branch::alt,
    combinator::opt,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};
use tracing::debug;

use super::grammar::{
    clause, components, direction, group, group_clause, index, kw, loose_clause, phrase, scan_all,
    word, word_clause, ws1, Components,
};
use super::{ExtractContext, PatternKind, PhrasePattern};
use crate::entity::{Bbox, Entity, EntityKind, Opening, Point3D, Wall};

/// Point from a raw group; x and y are required, z falls back to `default_z`
fn point(raw: &str, default_z: f64) -> Option<Point3D> {
    let parts = components(raw)?;
    point_from(&parts, default_z)
}

fn point_from(parts: &Components, default_z: f64) -> Option<Point3D> {
    match parts.as_slice() {
        [x, y] => Some(Point3D::new(*x, *y, default_z)),
        [x, y, z, ..] => Some(Point3D::new(*x, *y, *z)),
        _ => None,
    }
}

// ============================================================================
// Walls
// ============================================================================

struct WallCapture<'a> {
    start: &'a str,
    end: &'a str,
    height: Option<f64>,
    thickness: Option<f64>,
}

/// `wall from (A) to (B) [with height H] [and thickness T]`
pub struct WallPattern;

impl WallPattern {
    fn parse(input: &str) -> IResult<&str, WallCapture<'_>> {
        let (input, (start, end, height, thickness)) = tuple((
            preceded(pair(phrase(&["wall", "from"]), ws1), group),
            group_clause(&["to"]),
            opt(clause(&["with", "height"])),
            opt(loose_clause(&["and", "thickness"])),
        ))(input)?;

        Ok((
            input,
            WallCapture {
                start,
                end,
                height,
                thickness: thickness.flatten(),
            },
        ))
    }
}

impl PhrasePattern for WallPattern {
    fn kind(&self) -> PatternKind {
        PatternKind::Wall
    }

    fn extract(&self, text: &str, ctx: &mut ExtractContext<'_>) -> Vec<Entity> {
        let mut walls = Vec::new();

        for capture in scan_all(text, Self::parse) {
            let (Some(a), Some(b)) = (
                point(capture.start, ctx.floor_height),
                point(capture.end, ctx.floor_height),
            ) else {
                debug!(start = capture.start, end = capture.end, "skipping wall with bad endpoints");
                continue;
            };

            walls.push(Entity::Wall(Wall {
                id: ctx.next_id(EntityKind::Wall),
                a,
                b,
                height: capture.height.unwrap_or(ctx.defaults.wall_height),
                thickness: capture.thickness.unwrap_or(ctx.defaults.wall_thickness),
            }));
        }

        walls
    }
}

// ============================================================================
// Doors and windows
// ============================================================================

struct OpeningCapture<'a> {
    wall_index: usize,
    position: &'a str,
    width: Option<f64>,
    height: Option<f64>,
}

fn parse_opening<'a>(
    keyword: &'static [&'static str],
    input: &'a str,
) -> IResult<&'a str, OpeningCapture<'a>> {
    let (input, (_, _, wall_index, position, width, height)) = tuple((
        phrase(keyword),
        pair(ws1, phrase(&["on", "wall"])),
        preceded(ws1, index),
        group_clause(&["at", "position"]),
        opt(clause(&["with", "width"])),
        opt(loose_clause(&["and", "height"])),
    ))(input)?;

    Ok((
        input,
        OpeningCapture {
            wall_index,
            position,
            width,
            height: height.flatten(),
        },
    ))
}

/// Build an opening hosted by the `wall_index`-th wall of the pass
fn build_opening(
    capture: OpeningCapture<'_>,
    kind: EntityKind,
    default_width: f64,
    default_height: f64,
    ctx: &mut ExtractContext<'_>,
) -> Option<Opening> {
    let Some(host) = ctx.wall_at(capture.wall_index) else {
        debug!(
            %kind,
            wall_index = capture.wall_index,
            walls = ctx.walls.len(),
            "skipping opening on missing wall"
        );
        return None;
    };
    let wall_id = host.id;

    let Some(position) = point(capture.position, 0.0) else {
        debug!(%kind, position = capture.position, "skipping opening with bad position");
        return None;
    };

    Some(Opening {
        id: ctx.next_id(kind),
        wall_id,
        position,
        width: capture.width.unwrap_or(default_width),
        height: capture.height.unwrap_or(default_height),
    })
}

/// `door on wall N at position (P) [with width W] [and height H]`
pub struct DoorPattern;

impl PhrasePattern for DoorPattern {
    fn kind(&self) -> PatternKind {
        PatternKind::Door
    }

    fn extract(&self, text: &str, ctx: &mut ExtractContext<'_>) -> Vec<Entity> {
        let (width, height) = (ctx.defaults.door_width, ctx.defaults.door_height);
        scan_all(text, |i| parse_opening(&["door"], i))
            .into_iter()
            .filter_map(|c| build_opening(c, EntityKind::Door, width, height, ctx))
            .map(Entity::Door)
            .collect()
    }
}

/// `window on wall N at position (P) [with width W] [and height H]`
pub struct WindowPattern;

impl PhrasePattern for WindowPattern {
    fn kind(&self) -> PatternKind {
        PatternKind::Window
    }

    fn extract(&self, text: &str, ctx: &mut ExtractContext<'_>) -> Vec<Entity> {
        let (width, height) = (ctx.defaults.window_width, ctx.defaults.window_height);
        scan_all(text, |i| parse_opening(&["window"], i))
            .into_iter()
            .filter_map(|c| build_opening(c, EntityKind::Window, width, height, ctx))
            .map(Entity::Window)
            .collect()
    }
}

// ============================================================================
// Free-standing objects
// ============================================================================

/// Leading article `a ` or `an `
fn article(input: &str) -> IResult<&str, ()> {
    let (input, _) = alt((terminated(kw("an"), ws1), terminated(kw("a"), ws1)))(input)?;
    Ok((input, ()))
}

struct ObjectCapture<'a> {
    name: &'a str,
    position: &'a str,
    angle: Option<f64>,
    scale: Option<&'a str>,
}

/// `a|an NAME at position (P) [with angle A] [and scale (S)]`
pub struct ObjectPattern;

impl ObjectPattern {
    fn parse(input: &str) -> IResult<&str, ObjectCapture<'_>> {
        let (input, (_, name, position, angle, scale)) = tuple((
            article,
            word,
            group_clause(&["at", "position"]),
            opt(clause(&["with", "angle"])),
            opt(group_clause(&["and", "scale"])),
        ))(input)?;

        Ok((
            input,
            ObjectCapture {
                name,
                position,
                angle,
                scale,
            },
        ))
    }

    /// Fill a default scale left to right from the given components
    fn scale(raw: Option<&str>, default: f64) -> Option<Point3D> {
        let mut scale = [default; 3];
        if let Some(raw) = raw {
            let parts = components(raw)?;
            for (slot, value) in scale.iter_mut().zip(parts.iter()) {
                *slot = *value;
            }
        }
        Some(Point3D::new(scale[0], scale[1], scale[2]))
    }
}

impl PhrasePattern for ObjectPattern {
    fn kind(&self) -> PatternKind {
        PatternKind::Object
    }

    fn extract(&self, text: &str, ctx: &mut ExtractContext<'_>) -> Vec<Entity> {
        let mut objects = Vec::new();

        for capture in scan_all(text, Self::parse) {
            let position = point(capture.position, 0.0);
            let scale = Self::scale(capture.scale, ctx.defaults.object_scale);
            let (Some(position), Some(scale)) = (position, scale) else {
                debug!(name = capture.name, "skipping object with bad position or scale");
                continue;
            };

            objects.push(Entity::Bbox(Bbox::new(
                ctx.next_id(EntityKind::Bbox),
                capture.name,
                position,
                capture.angle.unwrap_or(ctx.defaults.object_angle),
                scale,
            )));
        }

        objects
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Yaw for a compass word or literal radian value; 0 if neither
pub fn direction_angle(token: &str) -> f64 {
    match token.to_ascii_lowercase().as_str() {
        "north" => 0.0,
        "east" => FRAC_PI_2,
        "south" => PI,
        "west" => 3.0 * FRAC_PI_2,
        other => lexical_core::parse::<f64>(other.as_bytes()).unwrap_or(0.0),
    }
}

struct FixtureCapture<'a> {
    name: &'a str,
    position: &'a str,
    direction: &'a str,
    dimensions: &'a str,
}

/// `a NAME at position (P) facing direction D with dimensions (S)`
pub struct FixturePattern;

impl FixturePattern {
    fn parse(input: &str) -> IResult<&str, FixtureCapture<'_>> {
        let (input, (_, name, position, _, direction, dimensions)) = tuple((
            terminated(kw("a"), ws1),
            word,
            group_clause(&["at", "position"]),
            pair(ws1, phrase(&["facing", "direction"])),
            preceded(ws1, direction),
            group_clause(&["with", "dimensions"]),
        ))(input)?;

        Ok((
            input,
            FixtureCapture {
                name,
                position,
                direction,
                dimensions,
            },
        ))
    }
}

impl PhrasePattern for FixturePattern {
    fn kind(&self) -> PatternKind {
        PatternKind::Fixture
    }

    fn extract(&self, text: &str, ctx: &mut ExtractContext<'_>) -> Vec<Entity> {
        let mut fixtures = Vec::new();

        for capture in scan_all(text, Self::parse) {
            let position = point(capture.position, 0.0);
            let scale = point(capture.dimensions, ctx.defaults.fixture_depth_z);
            let (Some(position), Some(scale)) = (position, scale) else {
                debug!(name = capture.name, "skipping fixture with bad position or dimensions");
                continue;
            };

            fixtures.push(Entity::Bbox(Bbox::new(
                ctx.next_id(EntityKind::Bbox),
                capture.name,
                position,
                direction_angle(capture.direction),
                scale,
            )));
        }

        fixtures
    }
}

// ============================================================================
// Built-ins
// ============================================================================

struct BuiltInCapture<'a> {
    name: &'a str,
    wall_index: usize,
    start: &'a str,
    end: &'a str,
    height: Option<f64>,
}

/// `a built-in NAME along wall N from position (P1) to (P2) [with height H]`
///
/// The box spans the two points horizontally, sits at the average of their
/// elevations and takes the heading of the referenced wall.
pub struct BuiltInPattern;

impl BuiltInPattern {
    fn parse(input: &str) -> IResult<&str, BuiltInCapture<'_>> {
        let (input, (_, _, name, _, wall_index, start, end, height)) = tuple((
            terminated(kw("a"), ws1),
            terminated(kw("built-in"), ws1),
            word,
            pair(ws1, phrase(&["along", "wall"])),
            preceded(ws1, index),
            group_clause(&["from", "position"]),
            group_clause(&["to"]),
            opt(loose_clause(&["with", "height"])),
        ))(input)?;

        Ok((
            input,
            BuiltInCapture {
                name,
                wall_index,
                start,
                end,
                height: height.flatten(),
            },
        ))
    }
}

impl PhrasePattern for BuiltInPattern {
    fn kind(&self) -> PatternKind {
        PatternKind::BuiltIn
    }

    fn extract(&self, text: &str, ctx: &mut ExtractContext<'_>) -> Vec<Entity> {
        let mut built_ins = Vec::new();

        for capture in scan_all(text, Self::parse) {
            let Some(angle) = ctx.wall_at(capture.wall_index).map(Wall::angle) else {
                debug!(
                    name = capture.name,
                    wall_index = capture.wall_index,
                    "skipping built-in on missing wall"
                );
                continue;
            };

            let (Some(start), Some(end)) = (point(capture.start, 0.0), point(capture.end, 0.0))
            else {
                debug!(name = capture.name, "skipping built-in with bad endpoints");
                continue;
            };

            built_ins.push(Entity::Bbox(Bbox {
                id: ctx.next_id(EntityKind::Bbox),
                class_name: capture.name.to_string(),
                position: start.midpoint(&end),
                angle_z: angle,
                scale: Point3D::new(
                    start.horizontal_distance_to(&end),
                    ctx.defaults.built_in_depth,
                    capture.height.unwrap_or(ctx.defaults.built_in_height),
                ),
            }));
        }

        built_ins
    }
}

// ============================================================================
// Architectural features
// ============================================================================

struct FeatureCapture<'a> {
    name: &'a str,
    position: &'a str,
    dimensions: &'a str,
    style: Option<&'a str>,
}

/// `a NAME at position (P) with dimensions (S) [and style STYLE]`
///
/// The class name is `NAME_STYLE`.
pub struct FeaturePattern;

impl FeaturePattern {
    fn parse(input: &str) -> IResult<&str, FeatureCapture<'_>> {
        let (input, (_, name, position, dimensions, style)) = tuple((
            terminated(kw("a"), ws1),
            word,
            group_clause(&["at", "position"]),
            group_clause(&["with", "dimensions"]),
            opt(word_clause(&["and", "style"])),
        ))(input)?;

        Ok((
            input,
            FeatureCapture {
                name,
                position,
                dimensions,
                style,
            },
        ))
    }
}

impl PhrasePattern for FeaturePattern {
    fn kind(&self) -> PatternKind {
        PatternKind::Feature
    }

    fn extract(&self, text: &str, ctx: &mut ExtractContext<'_>) -> Vec<Entity> {
        let mut features = Vec::new();

        for capture in scan_all(text, Self::parse) {
            let position = point(capture.position, 0.0);
            let scale = point(capture.dimensions, ctx.defaults.feature_height);
            let (Some(position), Some(scale)) = (position, scale) else {
                debug!(name = capture.name, "skipping feature with bad position or dimensions");
                continue;
            };

            let style = capture
                .style
                .unwrap_or(ctx.defaults.feature_style.as_str());

            features.push(Entity::Bbox(Bbox {
                id: ctx.next_id(EntityKind::Bbox),
                class_name: format!("{}_{}", capture.name, style),
                position,
                angle_z: 0.0,
                scale,
            }));
        }

        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{ExtractDefaults, IdCounters};
    use approx::assert_relative_eq;

    fn run(pattern: &dyn PhrasePattern, text: &str, floor_height: f64, walls: &[Wall]) -> Vec<Entity> {
        let defaults = ExtractDefaults::default();
        let mut counters = IdCounters::new();
        let mut ctx = ExtractContext::new(floor_height, &mut counters, &defaults);
        ctx.walls.extend_from_slice(walls);
        pattern.extract(text, &mut ctx)
    }

    fn bboxes(entities: Vec<Entity>) -> Vec<Bbox> {
        entities
            .into_iter()
            .filter_map(|e| match e {
                Entity::Bbox(b) => Some(b),
                _ => None,
            })
            .collect()
    }

    fn wall(id: u32, a: (f64, f64), b: (f64, f64)) -> Wall {
        Wall {
            id,
            a: Point3D::new(a.0, a.1, 0.0),
            b: Point3D::new(b.0, b.1, 0.0),
            height: 2.8,
            thickness: 0.2,
        }
    }

    #[test]
    fn test_wall_explicit_fields() {
        let found = run(
            &WallPattern,
            "Wall from (0,0,0) to (5,0,0) with height 3 and thickness 0.3",
            0.0,
            &[],
        );
        assert_eq!(found.len(), 1);
        let Entity::Wall(w) = &found[0] else {
            panic!("expected wall");
        };
        assert_eq!(w.id, 0);
        assert_relative_eq!(w.b.x, 5.0);
        assert_relative_eq!(w.height, 3.0);
        assert_relative_eq!(w.thickness, 0.3);
    }

    #[test]
    fn test_wall_inherits_floor_height() {
        let found = run(&WallPattern, "wall from (0,0) to (5,0)", 3.0, &[]);
        let Entity::Wall(w) = &found[0] else {
            panic!("expected wall");
        };
        assert_relative_eq!(w.a.z, 3.0);
        assert_relative_eq!(w.b.z, 3.0);
        assert_relative_eq!(w.height, 2.8);
        assert_relative_eq!(w.thickness, 0.2);
    }

    #[test]
    fn test_wall_thickness_without_number_uses_default() {
        let found = run(
            &WallPattern,
            "wall from (0,0) to (1,0) with height 2.5 and thickness",
            0.0,
            &[],
        );
        let Entity::Wall(w) = &found[0] else {
            panic!("expected wall");
        };
        assert_relative_eq!(w.height, 2.5);
        assert_relative_eq!(w.thickness, 0.2);
    }

    #[test]
    fn test_wall_bad_numbers_are_dropped_and_ids_stay_dense() {
        let text = "wall from (x,0) to (1,0)\nwall from (0) to (1,0)\nwall from (0,0) to (1,0)";
        let found = run(&WallPattern, text, 0.0, &[]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), 0);
    }

    #[test]
    fn test_door_resolves_wall_id() {
        let walls = [wall(4, (0.0, 0.0), (5.0, 0.0)), wall(9, (5.0, 0.0), (5.0, 5.0))];
        let found = run(&DoorPattern, "door on wall 1 at position (5,2)", 0.0, &walls);
        let Entity::Door(d) = &found[0] else {
            panic!("expected door");
        };
        assert_eq!(d.wall_id, 9);
        assert_relative_eq!(d.position.z, 0.0);
        assert_relative_eq!(d.width, 1.0);
        assert_relative_eq!(d.height, 2.0);
    }

    #[test]
    fn test_door_on_missing_wall_is_skipped() {
        let walls = [wall(0, (0.0, 0.0), (5.0, 0.0)), wall(1, (5.0, 0.0), (5.0, 5.0))];
        let found = run(&DoorPattern, "door on wall 5 at position (1,1,0)", 0.0, &walls);
        assert!(found.is_empty());
    }

    #[test]
    fn test_window_defaults() {
        let walls = [wall(0, (0.0, 0.0), (5.0, 0.0))];
        let found = run(
            &WindowPattern,
            "window on wall 0 at position (3,0,1) with width 1.2",
            0.0,
            &walls,
        );
        let Entity::Window(w) = &found[0] else {
            panic!("expected window");
        };
        assert_relative_eq!(w.width, 1.2);
        assert_relative_eq!(w.height, 1.0);
        assert_relative_eq!(w.position.z, 1.0);
    }

    #[test]
    fn test_object_with_partial_scale() {
        let found = bboxes(run(
            &ObjectPattern,
            "an armchair at position (1,2) and scale (0.9, 0.8)",
            0.0,
            &[],
        ));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].class_name, "armchair");
        assert_relative_eq!(found[0].angle_z, 0.0);
        assert_relative_eq!(found[0].scale.x, 0.9);
        assert_relative_eq!(found[0].scale.y, 0.8);
        assert_relative_eq!(found[0].scale.z, 1.0);
    }

    #[test]
    fn test_object_with_angle() {
        let found = bboxes(run(
            &ObjectPattern,
            "a sofa at position (2.5,3,0) with angle 3.14 and scale (2.0,0.8,0.8)",
            0.0,
            &[],
        ));
        assert_eq!(found.len(), 1);
        assert_relative_eq!(found[0].angle_z, 3.14);
        assert_relative_eq!(found[0].scale.x, 2.0);
    }

    #[test]
    fn test_fixture_directions() {
        assert_relative_eq!(direction_angle("North"), 0.0);
        assert_relative_eq!(direction_angle("east"), FRAC_PI_2);
        assert_relative_eq!(direction_angle("south"), PI);
        assert_relative_eq!(direction_angle("west"), 3.0 * FRAC_PI_2);
        assert_relative_eq!(direction_angle("0.5"), 0.5);
        assert_relative_eq!(direction_angle("upward"), 0.0);
    }

    #[test]
    fn test_fixture_numeric_direction_and_default_depth() {
        let found = bboxes(run(
            &FixturePattern,
            "a sink at position (2,4,0) facing direction 1.57 with dimensions (0.6,0.5)",
            0.0,
            &[],
        ));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].class_name, "sink");
        assert_relative_eq!(found[0].angle_z, 1.57);
        assert_relative_eq!(found[0].scale.z, 0.5);
    }

    #[test]
    fn test_built_in_follows_wall_heading() {
        let walls = [wall(0, (0.0, 0.0), (0.0, 4.0))];
        let found = bboxes(run(
            &BuiltInPattern,
            "a built-in cabinet along wall 0 from position (0,1,0) to (0,3,1)",
            0.0,
            &walls,
        ));
        assert_eq!(found.len(), 1);
        let b = &found[0];
        assert_eq!(b.class_name, "cabinet");
        assert_relative_eq!(b.angle_z, FRAC_PI_2);
        assert_relative_eq!(b.position.y, 2.0);
        assert_relative_eq!(b.position.z, 0.5);
        assert_relative_eq!(b.scale.x, 2.0);
        assert_relative_eq!(b.scale.y, 0.6);
        assert_relative_eq!(b.scale.z, 2.0);
    }

    #[test]
    fn test_built_in_on_missing_wall_is_skipped() {
        let found = run(
            &BuiltInPattern,
            "a built-in shelf along wall 2 from position (0,0) to (1,0) with height 1.5",
            0.0,
            &[],
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_feature_style() {
        let found = bboxes(run(
            &FeaturePattern,
            "a column at position (2,4,0) with dimensions (0.5,0.5) and style doric\n\
             a fireplace at position (0,1) with dimensions (1.5,0.4,1.2)",
            0.0,
            &[],
        ));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].class_name, "column_doric");
        assert_relative_eq!(found[0].scale.z, 3.0);
        assert_eq!(found[1].class_name, "fireplace_default");
        assert_relative_eq!(found[1].scale.z, 1.2);
    }
}
