// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reasons a layout line is dropped during parsing
//!
//! Parsing never fails as a whole. A line that cannot be turned into an
//! entity is skipped, and the reason is only reported through
//! [`parse_with_diagnostics`](crate::codec::parse_with_diagnostics).

use thiserror::Error;

/// Why a single line of layout text was skipped
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LineSkip {
    /// No `=` between key and value
    #[error("missing '=' separator")]
    MissingSeparator,

    /// Key prefix is not one of wall/door/window/bbox
    #[error("unknown entity type '{0}'")]
    UnknownType(String),

    /// Key or wall reference lacks a numeric id
    #[error("invalid entity id '{0}'")]
    InvalidId(String),

    /// Value has fewer fields than the entity type needs
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    /// A numeric field failed to parse
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

impl LineSkip {
    pub fn invalid_number(field: &str) -> Self {
        LineSkip::InvalidNumber(field.to_string())
    }

    pub fn invalid_id(field: &str) -> Self {
        LineSkip::InvalidId(field.to_string())
    }
}
