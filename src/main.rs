// This is the entry point of the moderation gateway.
//
// **Architecture Overview:**
// - `core/` = Business logic (decision pipeline, provider contract, audit policy)
// - `infra/` = Implementations of core traits (LLM HTTP clients, SQLite store)
// - `api/` = HTTP adapters (axum handlers and router)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize the optional clients (dependency injection)
// 3. Build the router
// 4. Serve until Ctrl-C

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "api/api_layer.rs"]
mod api;
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::api::{build_router, AppState, CredentialPresence};
use crate::core::audit::AuditLogger;
use crate::core::classifier::{ModerationProvider, ProviderChain};
use crate::core::config::{mask_uri, GatewayConfig};
use crate::core::moderation::{DecisionPolicy, ModerationService};
use crate::infra::ai::{GroqClient, HuggingFaceClient};
use crate::infra::audit::SqliteAuditStore;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DATABASE_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the provider chain: Groq first, Hugging Face second.
///
/// A provider that cannot be constructed, or whose startup probe fails, is
/// left out. Probes are skipped in mock mode since no calls go out anyway.
async fn build_provider_chain(config: &GatewayConfig) -> ProviderChain {
    let mut chain = ProviderChain::new();

    match &config.groq {
        Some(settings) => match GroqClient::new(settings, config.provider_timeout) {
            Ok(client) => {
                let probe = if config.mock_mode {
                    Ok(())
                } else {
                    client.probe().await
                };
                match probe {
                    Ok(()) => {
                        tracing::info!(model = %settings.model, "Groq client created.");
                        chain = chain.with_provider(Arc::new(client));
                    }
                    Err(e) => tracing::warn!("Groq probe failed; primary provider disabled: {}", e),
                }
            }
            Err(e) => tracing::warn!("Failed to create Groq client: {}", e),
        },
        None => tracing::info!("GROQ_API_KEY not set; Groq disabled."),
    }

    match &config.huggingface {
        Some(settings) => match HuggingFaceClient::new(settings, config.provider_timeout) {
            Ok(client) => {
                tracing::info!(model = %settings.model, "Hugging Face fallback enabled.");
                chain = chain.with_provider(Arc::new(client));
            }
            Err(e) => tracing::warn!("Failed to create Hugging Face client: {}", e),
        },
        None => tracing::info!("HF_API_TOKEN not set; Hugging Face fallback disabled."),
    }

    chain
}

/// Connects the audit store if a URI is configured. Failure disables audit
/// logging but never stops the server from starting.
async fn build_audit_logger(config: &GatewayConfig) -> AuditLogger {
    let Some(database) = &config.database else {
        tracing::info!("No database URI provided; audit logging disabled.");
        return AuditLogger::disabled();
    };
    let masked = mask_uri(Some(&database.uri), 6).unwrap_or_default();

    ensure_sqlite_parent_dir(&database.uri);

    match SqliteAuditStore::connect(&database.uri, database.table_name(), DATABASE_CONNECT_TIMEOUT)
        .await
    {
        Ok(store) => {
            tracing::info!(
                table = %database.table_name(),
                "Connected to audit database (masked): {}",
                masked
            );
            AuditLogger::new(Some(Arc::new(store)))
        }
        Err(e) => {
            tracing::warn!(
                "Audit database connection failed: {}. Masked URI: {}",
                e,
                masked
            );
            AuditLogger::disabled()
        }
    }
}

/// SQLite creates the file but not its directory, so make sure it exists.
fn ensure_sqlite_parent_dir(uri: &str) {
    let Some(rest) = uri.strip_prefix("sqlite://") else {
        return;
    };
    let file = rest.split('?').next().unwrap_or_default();
    if let Some(parent) = Path::new(file).parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!("Failed to create data directory {}: {}", parent.display(), e);
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = GatewayConfig::from_env().context("Invalid gateway configuration")?;

    if config.review_threshold > config.block_threshold {
        tracing::warn!(
            block = config.block_threshold,
            review = config.review_threshold,
            "REVIEW_THRESHOLD is above BLOCK_THRESHOLD; no score will map to review"
        );
    }
    if config.mock_mode {
        tracing::warn!("MOCK_MODE is on; every request gets the fixed mock verdict.");
    }

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // The clients are created once here and only read afterwards.

    let providers = build_provider_chain(&config).await;
    tracing::info!(providers = ?providers.kinds(), "Provider chain ready");
    let audit = build_audit_logger(&config).await;

    let moderation = ModerationService::new(
        providers,
        DecisionPolicy::new(config.block_threshold, config.review_threshold),
        audit,
        config.mock_mode,
    );
    let credentials = CredentialPresence::new(
        config.groq.is_some(),
        config.huggingface.is_some(),
        config.database.as_ref().map(|db| db.uri.as_str()),
    );
    let state = AppState::new(moderation, credentials);
    let router = build_router(state, &config.cors_origins, config.expose_debug_env);

    // ========================================================================
    // SERVE
    // ========================================================================

    let listener = tokio::net::TcpListener::bind((config.bind_addr.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.bind_addr, config.port))?;
    tracing::info!("TextSense gateway listening on {}:{}", config.bind_addr, config.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    Ok(())
}
