// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client configuration loaded from environment variables.

use std::str::FromStr;

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_API_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-3-opus-20240229";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Messages-API client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// API key sent as `x-api-key`. Required to build a client.
    pub api_key: Option<String>,
    /// Messages endpoint.
    pub api_url: String,
    /// Value of the `anthropic-version` header.
    pub api_version: String,
    pub model: String,
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Config {
    /// Configuration with built-in defaults and the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            api_url: DEFAULT_API_URL.into(),
            api_version: DEFAULT_API_VERSION.into(),
            model: DEFAULT_MODEL.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("CLAUDE_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            api_url: std::env::var("CLAUDE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()),
            api_version: std::env::var("CLAUDE_API_VERSION")
                .unwrap_or_else(|_| DEFAULT_API_VERSION.into()),
            model: std::env::var("CLAUDE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
            max_tokens: parse_or(std::env::var("CLAUDE_MAX_TOKENS").ok(), DEFAULT_MAX_TOKENS),
            temperature: parse_or(std::env::var("CLAUDE_TEMPERATURE").ok(), DEFAULT_TEMPERATURE),
            request_timeout_secs: parse_or(
                std::env::var("CLAUDE_TIMEOUT_SECS").ok(),
                DEFAULT_TIMEOUT_SECS,
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Parse an optional variable value, falling back when absent or malformed.
fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let config = Config::new("key");
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.model, "claude-3-opus-20240229");
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.request_timeout_secs, 120);
    }

    #[test]
    fn test_parse_or() {
        assert_eq!(parse_or(Some(" 512 ".into()), 4096u32), 512);
        assert_eq!(parse_or(Some("lots".into()), 4096u32), 4096);
        assert_eq!(parse_or(None, 0.7f32), 0.7);
    }
}
