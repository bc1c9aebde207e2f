// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the remote generator and pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Claude API key not provided; set CLAUDE_API_KEY or pass a key")]
    MissingApiKey,

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// Non-success status; `body` is the raw response payload.
    #[error("API request failed with status {status}: {body}")]
    RemoteCall { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Response decoding failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response contained no text content")]
    EmptyResponse,

    #[error("Visualization failed: {0}")]
    Visualization(#[from] arclayout_geometry::Error),
}
