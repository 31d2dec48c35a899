// src/completion.rs
//! DeepSeek chat-completion client. Transport and upstream failures are
//! classified so callers can decide which ones the fallback path covers.

use crate::pipeline::prompt::Prompt;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

const MODEL: &str = "deepseek-chat";
const PRIMARY_PATH: &str = "/v1/chat/completions";
const ALTERNATE_PATH: &str = "/chat/completions";

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion service is not configured")]
    NotConfigured,
    #[error("completion service rejected the API key")]
    Auth,
    #[error("completion service rate limit exceeded")]
    RateLimited,
    #[error("completion request timed out")]
    Timeout,
    #[error("could not reach completion service: {0}")]
    Network(String),
    #[error("completion service returned status {0}")]
    Status(u16),
    #[error("completion response had no message content")]
    Malformed,
}

/// Decoding parameters and timeout, fixed per feature by the caller.
#[derive(Debug, Clone, Copy)]
pub struct CompletionParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl CompletionParams {
    pub fn new(max_tokens: u32, temperature: f32, timeout_secs: u64) -> Self {
        Self {
            max_tokens,
            temperature,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

pub struct CompletionClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl CompletionClient {
    pub fn new(api_key: Option<String>, base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }

    /// Send the prompt and return the first choice's message content.
    /// A 404 on the primary path gets exactly one retry on the alternate
    /// path before failing.
    pub async fn complete(
        &self,
        prompt: &Prompt,
        params: CompletionParams,
    ) -> Result<String, CompletionError> {
        let api_key = match self.api_key.as_deref().filter(|key| !key.is_empty()) {
            Some(key) => key,
            None => return Err(CompletionError::NotConfigured),
        };

        let url = format!("{}{}", self.base_url, PRIMARY_PATH);
        let response = self.send(&url, api_key, prompt, params).await?;

        let response = if response.status() == reqwest::StatusCode::NOT_FOUND {
            let alternate = format!("{}{}", self.base_url, ALTERNATE_PATH);
            warn!("Completion endpoint returned 404, retrying on {}", alternate);
            self.send(&alternate, api_key, prompt, params).await?
        } else {
            response
        };

        let status = response.status();
        match status.as_u16() {
            200..=299 => {}
            401 => return Err(CompletionError::Auth),
            429 => return Err(CompletionError::RateLimited),
            code => return Err(CompletionError::Status(code)),
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|_| CompletionError::Malformed)?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(CompletionError::Malformed)?;

        info!("Received completion ({} chars)", content.len());
        Ok(content)
    }

    async fn send(
        &self,
        url: &str,
        api_key: &str,
        prompt: &Prompt,
        params: CompletionParams,
    ) -> Result<reqwest::Response, CompletionError> {
        let request = ChatCompletionRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        self.client
            .post(url)
            .bearer_auth(api_key)
            .timeout(params.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Network(e.to_string())
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::prompt;

    #[test]
    fn test_unconfigured_client_is_reported() {
        let client = CompletionClient::new(None, "https://example.com".to_string()).unwrap();
        assert!(!client.is_configured());

        let empty =
            CompletionClient::new(Some(String::new()), "https://example.com".to_string()).unwrap();
        assert!(!empty.is_configured());

        let configured =
            CompletionClient::new(Some("sk-test".to_string()), "https://example.com".to_string())
                .unwrap();
        assert!(configured.is_configured());
    }

    #[tokio::test]
    async fn test_complete_without_key_fails_before_network() {
        let client = CompletionClient::new(None, "https://example.invalid".to_string()).unwrap();
        let params = CompletionParams::new(100, 0.5, 30);
        let err = client
            .complete(&prompt::job_analysis("any"), params)
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::NotConfigured));
    }
}
