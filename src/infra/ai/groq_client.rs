// =============================================================================
// GROQ CLIENT - OpenAI-compatible chat completions
// =============================================================================
//
// Primary classifier. Sends a system + user message pair with temperature 0
// and asks for a JSON object response (`response_format: json_object`).
//
// Response text lives at `choices[0].message.content`; some compatible
// servers put it at `choices[0].text` instead, so both are accepted.
//
// **Environment Variables:**
// - `GROQ_API_KEY` - API key from https://console.groq.com/keys
// - `GROQ_MODEL` - defaults to `llama-3.1-8b-instant`

use crate::core::classifier::{
    parse_verdict, ModerationProvider, ProviderError, ProviderKind, Verdict, SYSTEM_PROMPT,
};
use crate::core::config::GroqSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub struct GroqClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GroqClient {
    pub fn new(settings: &GroqSettings, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "temperature": 0.0,
            "response_format": { "type": "json_object" },
        })
    }

    fn extract_content(response: &Value) -> Option<&str> {
        let choice = response.get("choices")?.get(0)?;
        choice
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .or_else(|| choice.get("text").and_then(Value::as_str))
    }
}

#[async_trait]
impl ModerationProvider for GroqClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Groq
    }

    async fn classify(&self, prompt: &str) -> Result<Verdict, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let response_json: Value = response.json().await?;
        let content = Self::extract_content(&response_json).ok_or(ProviderError::EmptyResponse)?;

        parse_verdict(content)
    }

    async fn probe(&self) -> Result<(), ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self.client.get(&url).bearer_auth(&self.api_key).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(ProviderError::Status { status, body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};

    /// Serves `router` on an ephemeral local port and returns its base URL.
    async fn spawn_fake_api(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> GroqClient {
        let settings = GroqSettings {
            api_key: "gsk_test".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            base_url,
        };
        GroqClient::new(&settings, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let client = client_for("http://localhost".to_string());
        let body = client.request_body("classify me");

        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "classify me");
    }

    #[test]
    fn test_extract_content_shapes() {
        let chat = json!({"choices": [{"message": {"content": "{\"score\": 0.1}"}}]});
        assert_eq!(GroqClient::extract_content(&chat), Some("{\"score\": 0.1}"));

        let legacy = json!({"choices": [{"text": "{\"score\": 0.2}"}]});
        assert_eq!(GroqClient::extract_content(&legacy), Some("{\"score\": 0.2}"));

        assert_eq!(GroqClient::extract_content(&json!({"choices": []})), None);
    }

    #[tokio::test]
    async fn test_classify_against_fake_api() {
        let router = Router::new().route(
            "/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer gsk_test");
                assert_eq!(body["model"], "llama-3.1-8b-instant");
                Json(json!({
                    "choices": [{
                        "message": {
                            "role": "assistant",
                            "content": "{\"score\": 0.91, \"label\": \"hate\", \"matched_seed\": \"vermin\"}"
                        }
                    }]
                }))
            }),
        );
        let client = client_for(spawn_fake_api(router).await);

        let verdict = client.classify("prompt").await.unwrap();

        assert_eq!(verdict.score, 0.91);
        assert_eq!(verdict.label, "hate");
        assert_eq!(verdict.matched_seed, Some("vermin".to_string()));
    }

    #[tokio::test]
    async fn test_error_status_is_a_failure() {
        let router = Router::new()
            .route(
                "/chat/completions",
                post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
            )
            .route("/models", get(|| async { StatusCode::UNAUTHORIZED }));
        let client = client_for(spawn_fake_api(router).await);

        let err = client.classify("prompt").await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 429, .. }));

        assert!(client.probe().await.is_err());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_failure() {
        // Port 9 (discard) on localhost is not expected to be listening.
        let client = client_for("http://127.0.0.1:9".to_string());

        let err = client.classify("prompt").await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
    }
}
