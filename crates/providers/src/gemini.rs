//! Google Gemini native provider implementation.
//!
//! Uses the `generateContent` REST endpoint directly.
//!
//! Differences from the OpenAI-compatible wire format:
//! - `x-goog-api-key` header authentication (not Bearer)
//! - model name is part of the URL path
//! - system prompt goes in a top-level `systemInstruction`
//! - replies come back as `candidates[].content.parts[].text`

use async_trait::async_trait;
use learnveda_core::error::ProviderError;
use learnveda_core::message::{Message, Role};
use learnveda_core::provider::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::{DEFAULT_TIMEOUT, http_client, status_error, transport_error};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_VERSION: &str = "v1beta";

/// Gemini `generateContent` provider.
pub struct GeminiProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// Fails when the key is blank or the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini requires an API key".into(),
            ));
        }

        Ok(Self {
            name: "gemini".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key,
            client: http_client(DEFAULT_TIMEOUT)?,
        })
    }

    /// Create with a custom base URL (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ProviderError> {
        self.client = http_client(timeout)?;
        Ok(self)
    }

    fn generate_url(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!(
            "{}/{API_VERSION}/models/{model}:generateContent",
            self.base_url
        )
    }

    fn models_url(&self) -> String {
        format!("{}/{API_VERSION}/models", self.base_url)
    }

    /// Build the JSON body for `generateContent`.
    ///
    /// System messages are merged into `systemInstruction`; the rest become
    /// `contents` with Gemini's `user` / `model` roles.
    fn request_body(request: &ProviderRequest) -> serde_json::Value {
        let mut system_parts: Vec<&str> = Vec::new();
        let mut contents: Vec<GeminiContent> = Vec::new();

        for msg in &request.messages {
            match msg.role {
                Role::System => system_parts.push(&msg.content),
                Role::User | Role::Assistant => contents.push(GeminiContent {
                    role: Some(
                        if msg.role == Role::User {
                            "user"
                        } else {
                            "model"
                        }
                        .into(),
                    ),
                    parts: vec![GeminiPart {
                        text: Some(msg.content.clone()),
                    }],
                }),
            }
        }

        let mut generation_config = serde_json::json!({
            "temperature": request.temperature,
        });
        if let Some(max_tokens) = request.max_tokens {
            generation_config["maxOutputTokens"] = serde_json::json!(max_tokens);
        }
        if !request.stop.is_empty() {
            generation_config["stopSequences"] = serde_json::json!(request.stop);
        }

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": generation_config,
        });

        if !system_parts.is_empty() {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": system_parts.join("\n\n") }],
            });
        }

        body
    }

    /// Map an error status, recognizing Gemini's invalid-key and missing-model replies.
    fn error_for(status: u16, body: String, model: &str) -> ProviderError {
        if status == 400 && (body.contains("API_KEY_INVALID") || body.contains("API key not valid"))
        {
            return ProviderError::AuthenticationFailed("Gemini rejected the API key".into());
        }
        if status == 404 {
            return ProviderError::ModelNotFound(model.to_string());
        }
        status_error(status, body)
    }

    /// Convert a Gemini response to our ProviderResponse.
    fn response_to_provider_response(
        resp: GeminiResponse,
        requested_model: &str,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let candidate = resp.candidates.into_iter().next().ok_or_else(|| {
            let reason = resp
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".into());
            ProviderError::MalformedResponse(format!("Gemini returned no answer: {reason}"))
        })?;

        let text = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "empty".into());
            return Err(ProviderError::MalformedResponse(format!(
                "Gemini answer contained no text (finish reason: {reason})"
            )));
        }

        let usage = resp.usage_metadata.map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        let mut metadata = serde_json::Map::new();
        if let Some(reason) = candidate.finish_reason {
            metadata.insert("finish_reason".into(), serde_json::Value::String(reason));
        }

        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage,
            model: resp
                .model_version
                .unwrap_or_else(|| requested_model.to_string()),
            metadata,
        })
    }
}

#[async_trait]
impl learnveda_core::Provider for GeminiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let url = self.generate_url(&request.model);
        let body = Self::request_body(&request);

        debug!(provider = %self.name, model = %request.model, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Gemini returned error");
            return Err(Self::error_for(status, error_body, &request.model));
        }

        let resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        Self::response_to_provider_response(resp, &request.model)
    }

    async fn list_models(&self) -> std::result::Result<Vec<String>, ProviderError> {
        let response = self
            .client
            .get(self.models_url())
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Ok(Vec::new());
        }

        let list: GeminiModelList = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        Ok(list.model_names())
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let response = self
            .client
            .get(self.models_url())
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(transport_error)?;

        Ok(response.status().is_success())
    }
}

// --- Gemini API types ---

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
    #[serde(default)]
    model_version: Option<String>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiModelList {
    #[serde(default)]
    models: Vec<GeminiModel>,
}

#[derive(Debug, Deserialize)]
struct GeminiModel {
    name: String,
}

impl GeminiModelList {
    fn model_names(self) -> Vec<String> {
        self.models
            .into_iter()
            .map(|m| {
                m.name
                    .strip_prefix("models/")
                    .map(String::from)
                    .unwrap_or(m.name)
            })
            .collect()
    }
}
