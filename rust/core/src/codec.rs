// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line-format codec
//!
//! One entity per line:
//!
//! ```text
//! wall_0=Wall(0.0,0.0,0.0,5.0,0.0,0.0,2.8,0.2)
//! door_0=Door(wall_0,2.5,0.0,0.0,1.0,2.0)
//! window_0=Window(wall_0,1.0,0.0,1.0,1.5,1.0)
//! bbox_0=Bbox(sofa,2.5,3.0,0.0,3.14,2.0,0.8,0.8)
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Parsing is lenient:
//! a line that cannot be decoded is dropped and the rest of the text is
//! still used.

use memchr::memchr;
use nom::{
    bytes::complete::{take_till, take_while, take_while1},
    character::complete::char,
    combinator::{opt, peek},
    sequence::{pair, terminated, tuple},
    IResult,
};
use smallvec::SmallVec;
use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::entity::{
    normalize_class_name, Bbox, Entity, EntityKind, Layout, Opening, Point3D, Wall,
};
use crate::error::LineSkip;

/// Field slices of one entity value, `Wall(a,b,c)` -> `["a", "b", "c"]`
type Fields<'a> = SmallVec<[&'a str; 8]>;

const WALL_FIELDS: usize = 8;
const OPENING_FIELDS: usize = 6;
const BBOX_FIELDS: usize = 8;

// ============================================================================
// Serialization
// ============================================================================

/// Serialize a layout: walls, then doors, then windows, then bboxes
///
/// Floats use the shortest representation that parses back to the same
/// value, so `parse(serialize(l)) == l`. Box class names are written
/// through [`normalize_class_name`], so a name that is not a single word
/// comes back normalized rather than breaking its line.
pub fn serialize(layout: &Layout) -> String {
    let mut out = String::new();
    for entity in layout.entities() {
        if !out.is_empty() {
            out.push('\n');
        }
        write_entity(&mut out, &entity);
    }
    out
}

/// Format a single entity as one line (no trailing newline)
pub fn serialize_entity(entity: &Entity) -> String {
    let mut out = String::new();
    write_entity(&mut out, entity);
    out
}

fn write_entity(out: &mut String, entity: &Entity) {
    let kind = entity.kind();
    // Writing into a String cannot fail
    let _ = match entity {
        Entity::Wall(w) => write!(
            out,
            "{}_{}={}({:?},{:?},{:?},{:?},{:?},{:?},{:?},{:?})",
            kind.prefix(),
            w.id,
            kind.type_name(),
            w.a.x,
            w.a.y,
            w.a.z,
            w.b.x,
            w.b.y,
            w.b.z,
            w.height,
            w.thickness
        ),
        Entity::Door(o) | Entity::Window(o) => write!(
            out,
            "{}_{}={}({}_{},{:?},{:?},{:?},{:?},{:?})",
            kind.prefix(),
            o.id,
            kind.type_name(),
            EntityKind::Wall.prefix(),
            o.wall_id,
            o.position.x,
            o.position.y,
            o.position.z,
            o.width,
            o.height
        ),
        Entity::Bbox(b) => write!(
            out,
            "{}_{}={}({},{:?},{:?},{:?},{:?},{:?},{:?},{:?})",
            kind.prefix(),
            b.id,
            kind.type_name(),
            normalize_class_name(&b.class_name),
            b.position.x,
            b.position.y,
            b.position.z,
            b.angle_z,
            b.scale.x,
            b.scale.y,
            b.scale.z
        ),
    };
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize(self))
    }
}

impl FromStr for Layout {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse(s))
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse layout text, silently dropping lines that cannot be decoded
pub fn parse(text: &str) -> Layout {
    parse_with_diagnostics(text).0
}

/// Parse layout text and report every dropped line
///
/// Returns the layout and `(line_number, reason)` pairs, line numbers
/// starting at 1. Blank and comment lines are not reported.
pub fn parse_with_diagnostics(text: &str) -> (Layout, Vec<(usize, LineSkip)>) {
    let mut layout = Layout::new();
    let mut skipped = Vec::new();

    for (index, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(entity)) => layout.push(entity),
            Ok(None) => {}
            Err(reason) => {
                tracing::debug!(line = index + 1, %reason, "dropping layout line");
                skipped.push((index + 1, reason));
            }
        }
    }

    (layout, skipped)
}

/// Decode one line
///
/// `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<Entity>, LineSkip> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let eq = memchr(b'=', line.as_bytes()).ok_or(LineSkip::MissingSeparator)?;
    let key = line[..eq].trim();
    let value = line[eq + 1..].trim();

    let mut key_parts = key.split('_');
    let prefix = key_parts.next().unwrap_or_default();
    let kind =
        EntityKind::from_prefix(prefix).ok_or_else(|| LineSkip::UnknownType(prefix.to_string()))?;
    let id_str = key_parts.next().ok_or_else(|| LineSkip::invalid_id(key))?;
    let id = parse_id(id_str)?;

    let fields = value_fields(value);

    let entity = match kind {
        EntityKind::Wall => {
            require_fields(&fields, WALL_FIELDS)?;
            Entity::Wall(Wall {
                id,
                a: point_at(&fields, 0)?,
                b: point_at(&fields, 3)?,
                height: parse_f64(fields[6])?,
                thickness: parse_f64(fields[7])?,
            })
        }
        EntityKind::Door | EntityKind::Window => {
            require_fields(&fields, OPENING_FIELDS)?;
            let opening = Opening {
                id,
                wall_id: parse_wall_ref(fields[0])?,
                position: point_at(&fields, 1)?,
                width: parse_f64(fields[4])?,
                height: parse_f64(fields[5])?,
            };
            if kind == EntityKind::Door {
                Entity::Door(opening)
            } else {
                Entity::Window(opening)
            }
        }
        EntityKind::Bbox => {
            require_fields(&fields, BBOX_FIELDS)?;
            Entity::Bbox(Bbox {
                id,
                class_name: fields[0].to_string(),
                position: point_at(&fields, 1)?,
                angle_z: parse_f64(fields[4])?,
                scale: point_at(&fields, 5)?,
            })
        }
    };

    Ok(Some(entity))
}

/// Split `Type(f1,f2,...)` into trimmed fields
///
/// The constructor name and both parentheses are optional so that a
/// truncated line still yields whatever fields it has. A name is only
/// taken when `(` follows it, so a bare `1,2,3` keeps its first field.
fn value_fields(value: &str) -> Fields<'_> {
    let body = match entity_body(value) {
        Ok((_, (_, _, _, body))) => body,
        Err(_) => value,
    };

    if body.trim().is_empty() {
        return Fields::new();
    }
    body.split(',').map(str::trim).collect()
}

fn entity_body(input: &str) -> IResult<&str, (Option<&str>, &str, Option<char>, &str)> {
    tuple((
        opt(terminated(
            take_while1(|c: char| c.is_alphanumeric() || c == '_'),
            peek(pair(take_while(char::is_whitespace), char('('))),
        )),
        take_while(char::is_whitespace),
        opt(char('(')),
        take_till(|c: char| c == ')'),
    ))(input)
}

fn require_fields(fields: &Fields<'_>, expected: usize) -> Result<(), LineSkip> {
    if fields.len() < expected {
        return Err(LineSkip::TooFewFields {
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

fn point_at(fields: &Fields<'_>, start: usize) -> Result<Point3D, LineSkip> {
    Ok(Point3D::new(
        parse_f64(fields[start])?,
        parse_f64(fields[start + 1])?,
        parse_f64(fields[start + 2])?,
    ))
}

fn parse_f64(field: &str) -> Result<f64, LineSkip> {
    lexical_core::parse::<f64>(field.trim().as_bytes()).map_err(|_| LineSkip::invalid_number(field))
}

fn parse_id(field: &str) -> Result<u32, LineSkip> {
    field
        .trim()
        .parse::<u32>()
        .map_err(|_| LineSkip::invalid_id(field))
}

/// `wall_3` -> 3
fn parse_wall_ref(field: &str) -> Result<u32, LineSkip> {
    let id = field
        .split('_')
        .nth(1)
        .ok_or_else(|| LineSkip::invalid_id(field))?;
    parse_id(id)
}
