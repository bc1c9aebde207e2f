// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor and room declarations
//!
//! ```text
//! floor 1 at height 3.2 with dimensions (12, 9)
//! room kitchen on floor 1 with dimensions (4, 3) connected to hall via archway
//! ```
//!
//! The only value consumed downstream is each floor's height, which walls
//! without an explicit z inherit. Rooms and their connections are recorded
//! but have no geometric effect.

use nom::{
    combinator::opt,
    sequence::{pair, preceded, tuple},
    IResult,
};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::extract::grammar::{
    clause, components, group_clause, integer, phrase, scan_all, word, word_clause, ws1,
};

/// Footprint given to the implicit floor and the minimum for synthesized ones
pub const DEFAULT_FLOOR_SIZE: f64 = 10.0;

/// Height offset per floor number for floors only known through rooms
pub const STOREY_HEIGHT: f64 = 3.0;

/// Link from a room to another room
#[derive(Debug, Clone, PartialEq)]
pub struct RoomConnection {
    /// Name of the other room, not checked for existence
    pub to: String,
    /// Free label such as `door`, `opening` or `archway`
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub name: String,
    pub width: f64,
    pub length: f64,
    pub connection: Option<RoomConnection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Floor {
    pub number: i32,
    /// Elevation inherited by walls on this floor
    pub height: f64,
    pub width: f64,
    pub length: f64,
    /// Rooms keyed by name; a later declaration replaces an earlier one
    pub rooms: FxHashMap<String, Room>,
}

impl Floor {
    fn new(number: i32, height: f64, width: f64, length: f64) -> Self {
        Self {
            number,
            height,
            width,
            length,
            rooms: FxHashMap::default(),
        }
    }
}

/// Floors in the order extraction visits them
///
/// Declared floors come first in declaration order, followed by floors
/// synthesized from room declarations. Floor numbers are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloorTable {
    floors: Vec<Floor>,
}

impl FloorTable {
    pub fn get(&self, number: i32) -> Option<&Floor> {
        self.floors.iter().find(|f| f.number == number)
    }

    fn get_mut(&mut self, number: i32) -> Option<&mut Floor> {
        self.floors.iter_mut().find(|f| f.number == number)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Floor> {
        self.floors.iter()
    }

    pub fn len(&self) -> usize {
        self.floors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    /// Insert or replace a declared floor, keeping its first position
    fn declare(&mut self, floor: Floor) {
        match self.get_mut(floor.number) {
            Some(existing) => *existing = floor,
            None => self.floors.push(floor),
        }
    }
}

struct FloorCapture<'a> {
    number: i32,
    height: f64,
    dimensions: &'a str,
}

struct RoomCapture<'a> {
    name: &'a str,
    floor: i32,
    dimensions: &'a str,
    connection: Option<(&'a str, &'a str)>,
}

/// `floor N at height H with dimensions (W[,L])`
fn floor_declaration(input: &str) -> IResult<&str, FloorCapture<'_>> {
    let (input, (_, number, height, dimensions)) = tuple((
        phrase(&["floor"]),
        preceded(ws1, integer),
        clause(&["at", "height"]),
        group_clause(&["with", "dimensions"]),
    ))(input)?;

    Ok((
        input,
        FloorCapture {
            number,
            height,
            dimensions,
        },
    ))
}

/// `room NAME on floor N with dimensions (W[,L]) [connected to OTHER via KIND]`
fn room_declaration(input: &str) -> IResult<&str, RoomCapture<'_>> {
    let (input, (_, name, _, floor, dimensions, connection)) = tuple((
        phrase(&["room"]),
        preceded(ws1, word),
        pair(ws1, phrase(&["on", "floor"])),
        preceded(ws1, integer),
        group_clause(&["with", "dimensions"]),
        opt(pair(word_clause(&["connected", "to"]), word_clause(&["via"]))),
    ))(input)?;

    Ok((
        input,
        RoomCapture {
            name,
            floor,
            dimensions,
            connection,
        },
    ))
}

/// Width and length from `(W)` or `(W, L)`; length defaults to width
fn footprint(raw: &str) -> Option<(f64, f64)> {
    let parts = components(raw)?;
    let width = *parts.first()?;
    let length = parts.get(1).copied().unwrap_or(width);
    Some((width, length))
}

/// Build the floor table for a description
///
/// Without any floor declaration the table holds a single floor 0 at
/// height 0 with a 10 x 10 footprint. A room on an undeclared floor N adds
/// that floor at height `N * 3.0`, sized to hold the room.
pub fn resolve_floors(text: &str) -> FloorTable {
    let mut table = FloorTable::default();

    for capture in scan_all(text, floor_declaration) {
        let Some((width, length)) = footprint(capture.dimensions) else {
            debug!(floor = capture.number, "skipping floor with bad dimensions");
            continue;
        };
        table.declare(Floor::new(capture.number, capture.height, width, length));
    }

    if table.is_empty() {
        table.declare(Floor::new(0, 0.0, DEFAULT_FLOOR_SIZE, DEFAULT_FLOOR_SIZE));
    }

    for capture in scan_all(text, room_declaration) {
        let Some((width, length)) = footprint(capture.dimensions) else {
            debug!(room = capture.name, "skipping room with bad dimensions");
            continue;
        };

        if table.get(capture.floor).is_none() {
            debug!(floor = capture.floor, room = capture.name, "synthesizing floor");
            table.declare(Floor::new(
                capture.floor,
                capture.floor as f64 * STOREY_HEIGHT,
                width.max(DEFAULT_FLOOR_SIZE),
                length.max(DEFAULT_FLOOR_SIZE),
            ));
        }

        let room = Room {
            name: capture.name.to_string(),
            width,
            length,
            connection: capture.connection.map(|(to, kind)| RoomConnection {
                to: to.to_string(),
                kind: kind.to_string(),
            }),
        };

        if let Some(floor) = table.get_mut(capture.floor) {
            floor.rooms.insert(room.name.clone(), room);
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_floor() {
        let table = resolve_floors("wall from (0,0) to (1,0)");
        assert_eq!(table.len(), 1);
        let floor = table.get(0).unwrap();
        assert_relative_eq!(floor.height, 0.0);
        assert_relative_eq!(floor.width, 10.0);
        assert_relative_eq!(floor.length, 10.0);
    }

    #[test]
    fn test_declared_floors_keep_order() {
        let table = resolve_floors(
            "Floor 1 at height 3.5 with dimensions (12, 8)\n\
             floor 0 at height 0 with dimensions (9)",
        );
        let numbers: Vec<_> = table.iter().map(|f| f.number).collect();
        assert_eq!(numbers, vec![1, 0]);
        assert_relative_eq!(table.get(1).unwrap().height, 3.5);
        assert_relative_eq!(table.get(0).unwrap().length, 9.0);
    }

    #[test]
    fn test_redeclared_floor_takes_last_values() {
        let table = resolve_floors(
            "floor 0 at height 0 with dimensions (10,10)\n\
             floor 1 at height 3 with dimensions (10,10)\n\
             floor 0 at height 0.5 with dimensions (20,20)",
        );
        let numbers: Vec<_> = table.iter().map(|f| f.number).collect();
        assert_eq!(numbers, vec![0, 1]);
        assert_relative_eq!(table.get(0).unwrap().height, 0.5);
    }

    #[test]
    fn test_room_synthesizes_floor() {
        let table = resolve_floors("room attic on floor 2 with dimensions (14, 6)");
        // Implicit floor 0 plus the synthesized floor 2
        assert_eq!(table.len(), 2);
        let floor = table.get(2).unwrap();
        assert_relative_eq!(floor.height, 6.0);
        assert_relative_eq!(floor.width, 14.0);
        assert_relative_eq!(floor.length, 10.0);
        assert!(floor.rooms.contains_key("attic"));
    }

    #[test]
    fn test_negative_floor_numbers() {
        let table = resolve_floors(
            "floor -1 at height 0 with dimensions (10, 10)\n\
             room cellar on floor -2 with dimensions (4, 4)",
        );
        let levels: Vec<_> = table.iter().map(|f| (f.number, f.height)).collect();
        assert_eq!(levels, vec![(-1, 0.0), (-2, -6.0)]);
        assert!(table.get(0).is_none());
        assert!(table.get(-2).unwrap().rooms.contains_key("cellar"));
    }

    #[test]
    fn test_room_connection_is_recorded() {
        let table = resolve_floors(
            "floor 0 at height 0 with dimensions (10, 15)\n\
             room living_room on floor 0 with dimensions (5, 7) connected to kitchen via opening\n\
             room kitchen on floor 0 with dimensions (4)",
        );
        let floor = table.get(0).unwrap();
        let living = &floor.rooms["living_room"];
        assert_eq!(
            living.connection,
            Some(RoomConnection {
                to: "kitchen".to_string(),
                kind: "opening".to_string(),
            })
        );
        let kitchen = &floor.rooms["kitchen"];
        assert!(kitchen.connection.is_none());
        assert_relative_eq!(kitchen.length, 4.0);
    }

    #[test]
    fn test_bad_dimensions_are_skipped() {
        let table = resolve_floors("floor 3 at height 9 with dimensions (wide, 2)");
        assert_eq!(table.len(), 1);
        assert!(table.get(3).is_none());
    }
}
