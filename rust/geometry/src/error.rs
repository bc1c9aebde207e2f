// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for visualization output
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while handing boxes to a sink
#[derive(Error, Debug)]
pub enum Error {
    #[error("Sink I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frame encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}
