// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # ArcLayout Core
//!
//! Compiler from declarative room descriptions to a line-oriented layout
//! format, built with [nom](https://docs.rs/nom).
//!
//! ## Overview
//!
//! - **Phrase extraction**: case-insensitive phrase patterns for walls,
//!   doors, windows, objects, fixtures, built-ins and architectural features
//! - **Floors**: floor and room declarations supply the elevation that
//!   walls without z inherit
//! - **Line format**: one `key=Type(fields)` line per entity, parsed
//!   leniently (bad lines are skipped, never fatal)
//!
//! ## Quick Start
//!
//! ```rust
//! use arclayout_core::{codec, TextToLayout};
//!
//! let text = "wall from (0,0,0) to (5,0,0) with height 2.8 and thickness 0.2\n\
//!             door on wall 0 at position (2.5,0,0) with width 1.0 and height 2.0\n\
//!             a sofa at position (2.5,3,0) with angle 3.14 and scale (2.0,0.8,0.8)";
//!
//! let layout = TextToLayout::new().generate_layout(text);
//! let lines = codec::serialize(&layout);
//! assert_eq!(lines.lines().count(), 3);
//!
//! let reparsed = codec::parse(&lines);
//! assert_eq!(reparsed, layout);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for entities and layouts

pub mod codec;
pub mod converter;
pub mod entity;
pub mod error;
pub mod extract;
pub mod floors;

pub use codec::{parse, parse_line, parse_with_diagnostics, serialize, serialize_entity};
pub use converter::TextToLayout;
pub use entity::{
    normalize_class_name, Bbox, Entity, EntityKind, Layout, Opening, OpeningType, Point3D, Wall,
};
pub use error::LineSkip;
pub use extract::{
    ExtractContext, ExtractDefaults, ExtractorPipeline, IdCounters, PatternKind, PhrasePattern,
};
pub use floors::{resolve_floors, Floor, FloorTable, Room, RoomConnection};
