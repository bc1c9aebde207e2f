// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Messages-API client.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::prompt::{layout_prompt, DEFAULT_SYSTEM_PROMPT, LAYOUT_SYSTEM_PROMPT};

/// Produces phrase-grammar text from loose prose.
///
/// The output is fed to the rule-based converter as ordinary input.
pub trait StructuredTextGenerator {
    fn generate_structured_text(&self, text: &str) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// Request body for one messages call.
#[derive(Debug, Serialize)]
pub struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Text of the first content block of a messages response.
pub fn response_text(body: &[u8]) -> Result<String> {
    let response: MessagesResponse = serde_json::from_slice(body)?;
    response
        .content
        .into_iter()
        .next()
        .and_then(|block| block.text)
        .ok_or(Error::EmptyResponse)
}

/// Messages-API client.
pub struct ClaudeClient {
    config: Config,
    headers: HeaderMap,
    http: reqwest::Client,
}

impl ClaudeClient {
    /// Create a client; fails when the configuration carries no API key.
    pub fn new(config: Config) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(Error::MissingApiKey)?;

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
        headers.insert("anthropic-version", HeaderValue::from_str(&config.api_version)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            config,
            headers,
            http,
        })
    }

    /// Create a client from `CLAUDE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Request body for `prompt` under `system`.
    pub fn request<'a>(&'a self, prompt: &'a str, system: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        }
    }

    /// Send one user message and return the first text block of the reply.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        let system = system.unwrap_or(DEFAULT_SYSTEM_PROMPT);

        let resp = self
            .http
            .post(&self.config.api_url)
            .headers(self.headers.clone())
            .json(&self.request(prompt, system))
            .send()
            .await?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Messages API call failed");
            return Err(Error::RemoteCall {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await?;
        let text = response_text(&body)?;

        tracing::info!(
            model = %self.config.model,
            prompt_chars = prompt.len(),
            reply_chars = text.len(),
            "Messages API call succeeded"
        );

        Ok(text)
    }

    /// Ask for the structured phrase form of a free-form description.
    pub async fn generate_layout_description(&self, text: &str) -> Result<String> {
        self.generate(&layout_prompt(text), Some(LAYOUT_SYSTEM_PROMPT))
            .await
    }
}

impl StructuredTextGenerator for ClaudeClient {
    async fn generate_structured_text(&self, text: &str) -> Result<String> {
        self.generate_layout_description(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyless() -> Config {
        Config {
            api_key: None,
            ..Config::new("")
        }
    }

    #[test]
    fn test_missing_key_is_rejected() {
        assert!(matches!(ClaudeClient::new(keyless()), Err(Error::MissingApiKey)));
        assert!(matches!(
            ClaudeClient::new(Config::new("   ")),
            Err(Error::MissingApiKey)
        ));
    }

    #[test]
    fn test_invalid_key_header() {
        assert!(matches!(
            ClaudeClient::new(Config::new("bad\nkey")),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_request_body() {
        let client = ClaudeClient::new(Config::new("sk-test")).unwrap();
        assert_eq!(client.headers["x-api-key"], "sk-test");
        assert_eq!(client.headers["anthropic-version"], "2023-06-01");

        let body = serde_json::to_value(client.request("two rooms", "be brief")).unwrap();
        assert_eq!(body["model"], "claude-3-opus-20240229");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["system"], "be brief");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "two rooms");
    }

    #[test]
    fn test_response_text() {
        let body = br#"{"id":"msg_1","content":[{"type":"text","text":"wall from (0,0) to (1,0)"}]}"#;
        assert_eq!(response_text(body).unwrap(), "wall from (0,0) to (1,0)");
    }

    #[test]
    fn test_response_without_text() {
        assert!(matches!(
            response_text(br#"{"content":[]}"#),
            Err(Error::EmptyResponse)
        ));
        assert!(matches!(response_text(b"not json"), Err(Error::Decode(_))));
    }
}
