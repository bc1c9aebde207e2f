// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # ArcLayout LLM
//!
//! Turns loose prose into a layout in two steps: a messages-API call
//! rewrites the prose into the phrase grammar understood by
//! [`arclayout_core`], then the rule-based converter compiles it.
//!
//! ```rust,ignore
//! use arclayout_geometry::JsonSink;
//! use arclayout_llm::ArcLayout;
//!
//! let pipeline = ArcLayout::from_env()?;
//! let mut sink = JsonSink::new(std::fs::File::create("layout.jsonl")?);
//! let layout = pipeline
//!     .text_to_visualization("a small studio with a bed and a desk", &mut sink, true)
//!     .await?;
//! println!("{layout}");
//! ```
//!
//! Configuration is read from `CLAUDE_*` environment variables, see
//! [`Config::from_env`].

pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompt;

pub use client::{response_text, ClaudeClient, MessagesRequest, StructuredTextGenerator};
pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::ArcLayout;
