// =============================================================================
// HUGGING FACE CLIENT - hosted text-generation inference
// =============================================================================
//
// Secondary classifier, only reached when the primary fails. Small generative
// models rarely return clean JSON, so the generated text goes through the
// lenient parser (first `{...}` span).
//
// The endpoint answers in one of a few shapes:
// - `[{"generated_text": "..."}]`
// - `{"generated_text": "..."}`
// - `"..."` or `["...", ...]` (plain generated text)
// - anything else, which is stringified and handed to the parser as-is

use crate::core::classifier::{
    parse_verdict_lenient, ModerationProvider, ProviderError, ProviderKind, Verdict,
};
use crate::core::config::HuggingFaceSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const MAX_NEW_TOKENS: u32 = 120;

pub struct HuggingFaceClient {
    client: Client,
    api_token: String,
    model: String,
    base_url: String,
}

impl HuggingFaceClient {
    pub fn new(settings: &HuggingFaceSettings, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_token: settings.api_token.clone(),
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn generated_text(data: Value) -> String {
        // A bare string, or an object carrying `generated_text`.
        let text_of = |v: &Value| match v {
            Value::String(s) => Some(s.clone()),
            Value::Object(_) => v
                .get("generated_text")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        };

        match &data {
            Value::Array(items) => items.first().and_then(text_of),
            _ => text_of(&data),
        }
        .unwrap_or_else(|| data.to_string())
    }
}

#[async_trait]
impl ModerationProvider for HuggingFaceClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::HuggingFace
    }

    async fn classify(&self, prompt: &str) -> Result<Verdict, ProviderError> {
        let url = format!("{}/{}", self.base_url, self.model);
        let payload = json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": MAX_NEW_TOKENS,
                "temperature": 0.0,
            },
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let data: Value = response.json().await?;
        let text = Self::generated_text(data);
        let verdict = parse_verdict_lenient(&text);
        if verdict.is_err() {
            tracing::warn!("Hugging Face produced non-JSON output: {}", text);
        }
        verdict
    }
}
