// HTTP router for the gateway.
//
// Routes:
//   GET  /health       status snapshot
//   GET  /_debug_env   credential presence (optional, see EXPOSE_DEBUG_ENV)
//   POST /moderate     run the moderation pipeline
//   GET  /admin/logs   recent blocked entries
//
// CORS wraps everything; with `*` no credentials are allowed, with an explicit
// origin list credentials are allowed and methods/headers are mirrored.

use crate::api::endpoints;
use crate::api::state::AppState;
use crate::core::config::CorsOrigins;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

pub fn build_router(state: AppState, cors: &CorsOrigins, expose_debug_env: bool) -> Router {
    let mut router = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/moderate", post(endpoints::moderate::moderate))
        .route("/admin/logs", get(endpoints::admin::logs));

    if expose_debug_env {
        router = router.route("/_debug_env", get(endpoints::health::debug_env));
    }

    router.with_state(state).layer(cors_layer(cors))
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    match origins {
        CorsOrigins::Any => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsOrigins::List(list) => {
            let allowed: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed))
                .allow_credentials(true)
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::CredentialPresence;
    use crate::core::audit::audit_service::tests::MockAuditStore;
    use crate::core::audit::AuditLogger;
    use crate::core::classifier::classifier_service::tests::StubProvider;
    use crate::core::classifier::{ProviderChain, ProviderKind};
    use crate::core::moderation::{DecisionPolicy, ModerationService};
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        store: Option<Arc<MockAuditStore>>,
        provider: Arc<StubProvider>,
    }

    fn test_app(provider: StubProvider, with_store: bool, mock_mode: bool) -> TestApp {
        let provider = Arc::new(provider);
        let store = with_store.then(|| Arc::new(MockAuditStore::new()));
        let audit = match &store {
            Some(store) => AuditLogger::new(Some(store.clone())),
            None => AuditLogger::disabled(),
        };
        let service = ModerationService::new(
            ProviderChain::new().with_provider(provider.clone()),
            DecisionPolicy::default(),
            audit,
            mock_mode,
        );
        let credentials = CredentialPresence::new(
            true,
            false,
            with_store.then_some("sqlite://data/textsense.db?mode=rwc"),
        );
        let state = AppState::new(service, credentials);

        TestApp {
            router: build_router(state, &CorsOrigins::Any, true),
            store,
            provider,
        }
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn moderate_request(body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/moderate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_configuration() {
        let app = test_app(
            StubProvider::answering(ProviderKind::Groq, 0.1, "other", None),
            false,
            true,
        );

        let (status, json) = send(&app.router, get_request("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
        assert_eq!(json["groq_configured"], true);
        assert_eq!(json["database_configured"], false);
        assert_eq!(json["hf_token_set"], false);
        assert_eq!(json["mock_mode"], true);
        assert!(json["time_utc"].as_f64().unwrap() > 1_600_000_000.0);
    }

    #[tokio::test]
    async fn test_moderate_allows_kind_text() {
        let app = test_app(
            StubProvider::answering(ProviderKind::Groq, 0.02, "other", None),
            true,
            false,
        );

        let (status, json) = send(
            &app.router,
            moderate_request(json!({"text": "you are wonderful"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["action"], "allow");
        assert_eq!(json["score"], 0.02);
        assert!(json["matched_seed"].is_null());
        assert_eq!(app.store.unwrap().write_count(), 0);
    }

    #[tokio::test]
    async fn test_moderate_blocks_and_audits() {
        let app = test_app(
            StubProvider::answering(ProviderKind::Groq, 0.91, "hate", Some("vermin")),
            true,
            false,
        );

        let (status, json) = send(
            &app.router,
            moderate_request(json!({"text": "they are vermin", "mode": "chat"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({
                "action": "block",
                "score": 0.91,
                "reason": "llm_hate",
                "matched_seed": "vermin"
            })
        );
        assert_eq!(app.store.unwrap().write_count(), 1);
    }

    #[tokio::test]
    async fn test_moderate_in_mock_mode() {
        let app = test_app(
            StubProvider::answering(ProviderKind::Groq, 0.91, "hate", None),
            false,
            true,
        );

        let (_, json) = send(&app.router, moderate_request(json!({"text": "anything"}))).await;

        assert_eq!(json["action"], "allow");
        assert_eq!(json["score"], 0.05);
        assert_eq!(json["reason"], "mock");
        assert_eq!(app.provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_moderate_empty_text() {
        let app = test_app(StubProvider::failing(ProviderKind::Groq), false, false);

        let (status, json) = send(&app.router, moderate_request(json!({"text": "   "}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({"action": "allow", "score": 0.0, "reason": "empty_text", "matched_seed": null})
        );
    }

    #[tokio::test]
    async fn test_moderate_provider_down_still_answers() {
        let app = test_app(StubProvider::failing(ProviderKind::Groq), false, false);

        let (status, json) = send(&app.router, moderate_request(json!({"text": "hello"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["score"], 0.5);
        assert_eq!(json["action"], "review");
    }

    #[tokio::test]
    async fn test_moderate_rejects_missing_text() {
        let app = test_app(StubProvider::failing(ProviderKind::Groq), false, false);

        let (status, _) = send(&app.router, moderate_request(json!({"mode": "comment"}))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_admin_logs_without_database() {
        let app = test_app(StubProvider::failing(ProviderKind::Groq), false, false);

        let (status, json) = send(&app.router, get_request("/admin/logs")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "DATABASE_NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn test_admin_logs_newest_first_with_limit() {
        let app = test_app(StubProvider::failing(ProviderKind::Groq), true, false);
        let store = app.store.clone().unwrap();
        for (id, ts) in [(1u64, 100i64), (2, 300), (3, 200)] {
            store.entries.insert(
                id,
                crate::core::audit::audit_service::tests::entry(
                    ts,
                    crate::core::moderation::Action::Block,
                ),
            );
        }

        let (status, json) = send(&app.router, get_request("/admin/logs?limit=2")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["n"], 2);
        assert_eq!(json["results"][0]["timestamp"], 300);
        assert_eq!(json["results"][0]["_id"], "2");
        assert_eq!(json["results"][1]["timestamp"], 200);
    }

    #[tokio::test]
    async fn test_debug_env_masks_database_uri() {
        let app = test_app(StubProvider::failing(ProviderKind::Groq), true, false);

        let (status, json) = send(&app.router, get_request("/_debug_env")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["database_present"], true);
        assert_eq!(json["database_masked"], "sqlite...de=rwc");
        assert_eq!(json["groq_present"], true);
        assert_eq!(json["hf_present"], false);
    }

    #[tokio::test]
    async fn test_debug_env_can_be_hidden() {
        let service = ModerationService::new(
            ProviderChain::new(),
            DecisionPolicy::default(),
            AuditLogger::disabled(),
            false,
        );
        let state = AppState::new(service, CredentialPresence::default());
        let router = build_router(state, &CorsOrigins::Any, false);

        let response = router.oneshot(get_request("/_debug_env")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_preflight_with_origin_list() {
        let service = ModerationService::new(
            ProviderChain::new(),
            DecisionPolicy::default(),
            AuditLogger::disabled(),
            false,
        );
        let state = AppState::new(service, CredentialPresence::default());
        let cors = CorsOrigins::List(vec!["https://app.example".to_string()]);
        let router = build_router(state, &cors, true);

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/moderate")
            .header("origin", "https://app.example")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        let headers = response.headers();
        assert_eq!(
            headers["access-control-allow-origin"],
            "https://app.example"
        );
        assert_eq!(headers["access-control-allow-credentials"], "true");
    }
}
