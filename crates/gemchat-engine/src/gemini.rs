//! HTTP client for the Gemini `generateContent` API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::{ClientError, ModelClient};
use crate::config::ChatConfig;

const API_VERSION_PATH: &str = "/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Client for Google's Gemini generative language API.
///
/// Each call is single-shot: only the current prompt is sent, never the
/// conversation history.
///
/// ```text
/// POST {base_url}/v1beta/models/{model}:generateContent
/// x-goog-api-key: <api key>
/// ```
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    /// Full endpoint URL.
    url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: &str,
        request_timeout: Option<Duration>,
    ) -> Self {
        let model = model.into();
        let url = endpoint_url(base_url, &model);

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            client: builder.build().unwrap_or_default(),
            api_key: api_key.into(),
            model,
            url,
        }
    }

    /// Build a client from the session configuration.
    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(
            config.api_key.clone(),
            config.model.clone(),
            &config.base_url,
            config.request_timeout(),
        )
    }

    /// The endpoint this client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ClientError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "Sending generateContent request");

        let response = self
            .client
            .post(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&build_request(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(model = %self.model, %status, "Gemini API returned an error status");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_response(&body)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn endpoint_url(base_url: &str, model: &str) -> String {
    let base = base_url.trim_end_matches('/');
    format!("{base}{API_VERSION_PATH}/{model}:generateContent")
}

fn build_request(prompt: &str) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![RequestContent {
            role: "user",
            parts: vec![RequestPart { text: prompt }],
        }],
    }
}

/// Finish reasons that mean the candidate text must not be shown.
const BLOCKED_FINISH_REASONS: &[&str] = &["RECITATION", "SAFETY", "LANGUAGE"];

/// Extract the response text from a `generateContent` body.
///
/// The text is every part of the first candidate, concatenated, and may be
/// empty. A candidate stopped for safety, recitation or language reasons is
/// an error even when it carries partial text. A body without candidates is
/// an empty reply unless the prompt itself was flagged.
fn parse_response(body: &str) -> Result<String, ClientError> {
    let response: GenerateResponse = serde_json::from_str(body).map_err(ClientError::Decode)?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        return match response.prompt_feedback {
            Some(feedback) => Err(ClientError::Blocked(
                feedback.block_reason.unwrap_or_else(|| "unspecified".into()),
            )),
            None => Ok(String::new()),
        };
    };

    if let Some(reason) = candidate
        .finish_reason
        .filter(|r| BLOCKED_FINISH_REASONS.contains(&r.as_str()))
    {
        return Err(ClientError::Blocked(reason));
    }

    Ok(candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("https://generativelanguage.googleapis.com/", "gemini-pro"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
        assert_eq!(
            endpoint_url("http://localhost:8080", "test"),
            "http://localhost:8080/v1beta/models/test:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let json = serde_json::to_value(build_request("Hello")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "Hello"}]}]
            })
        );
    }

    #[test]
    fn test_parse_joins_parts() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hi "}, {"text": "there!"}]},
                "finishReason": "STOP"
            }]
        }"#;
        assert_eq!(parse_response(body).unwrap(), "Hi there!");
    }

    #[test]
    fn test_parse_preserves_text_exactly() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "  spaced\n\n"}]}}]}"#;
        assert_eq!(parse_response(body).unwrap(), "  spaced\n\n");
    }

    #[test]
    fn test_parse_blocked_prompt() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        assert!(matches!(
            parse_response(body),
            Err(ClientError::Blocked(reason)) if reason == "SAFETY"
        ));
    }

    #[test]
    fn test_parse_prompt_feedback_without_reason() {
        let body = r#"{"promptFeedback": {"safetyRatings": []}}"#;
        assert!(matches!(parse_response(body), Err(ClientError::Blocked(_))));
    }

    #[test]
    fn test_parse_blocked_finish_reason_hides_partial_text() {
        for reason in ["SAFETY", "RECITATION", "LANGUAGE"] {
            let body = format!(
                r#"{{"candidates": [{{"content": {{"parts": [{{"text": "partial"}}]}}, "finishReason": "{reason}"}}]}}"#
            );
            assert!(matches!(
                parse_response(&body),
                Err(ClientError::Blocked(r)) if r == reason
            ));
        }

        let body = r#"{"candidates": [{"finishReason": "RECITATION"}]}"#;
        assert!(matches!(
            parse_response(body),
            Err(ClientError::Blocked(reason)) if reason == "RECITATION"
        ));
    }

    #[test]
    fn test_parse_max_tokens_keeps_text() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "cut sh"}]}, "finishReason": "MAX_TOKENS"}]}"#;
        assert_eq!(parse_response(body).unwrap(), "cut sh");
    }

    #[test]
    fn test_parse_empty_text_is_a_reply() {
        let stop = r#"{"candidates": [{"content": {"parts": [{"text": ""}]}, "finishReason": "STOP"}]}"#;
        assert_eq!(parse_response(stop).unwrap(), "");

        let no_parts = r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#;
        assert_eq!(parse_response(no_parts).unwrap(), "");

        assert_eq!(parse_response("{}").unwrap(), "");
        assert_eq!(parse_response(r#"{"candidates": []}"#).unwrap(), "");
    }

    #[test]
    fn test_parse_malformed_body() {
        assert!(matches!(
            parse_response("<html>oops</html>"),
            Err(ClientError::Decode(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let config = ChatConfig {
            model: "gemini-1.5-flash".into(),
            base_url: "http://localhost:9999/".into(),
            ..ChatConfig::default()
        };
        let client = GeminiClient::from_config(&config);
        assert_eq!(client.model_name(), "gemini-1.5-flash");
        assert_eq!(
            client.url(),
            "http://localhost:9999/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        // Port 9 (discard) on localhost is almost never listening.
        let client = GeminiClient::new(
            "",
            "gemini-pro",
            "http://127.0.0.1:9",
            Some(Duration::from_secs(2)),
        );
        assert!(client.generate("Hello").await.is_err());
    }
}
