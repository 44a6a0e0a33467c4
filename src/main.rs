// Entry point of the document gateway.
//
// **Architecture Overview:**
// - `core/` = Dispatch core: operations, routing, response envelopes (platform-agnostic)
// - `infra/` = Implementations of core traits (Google Docs/Drive, in-memory store)
// - `web/` = HTTP adapter (axum routes for doGet/doPost)
//
// This file's job is to:
// 1. Load configuration
// 2. Pick the document store (real Google backend or mock mode)
// 3. Wire the services together (dependency injection)
// 4. Serve HTTP until Ctrl-C

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;
#[path = "web/web_layer.rs"]
mod web;

mod config;

use std::sync::Arc;

use anyhow::Context;

use crate::config::{AppConfig, CredentialSource};
use crate::core::documents::{
    ApiSettings, DocumentApi, DocumentService, DocumentStore, RequestDispatcher,
};
use crate::core::identity::{AnonymousIdentity, IdentityProvider};
use crate::infra::documents::InMemoryDocumentStore;
use crate::infra::google_docs::{
    AccessTokenSource, GoogleDocsStore, GoogleTokenInfoIdentity, ServiceAccountAuth,
    StaticAccessToken,
};

/// Builds the bearer credential source named by the config.
async fn build_token_source(
    source: &CredentialSource,
    scopes: &[String],
) -> anyhow::Result<Box<dyn AccessTokenSource>> {
    match source {
        CredentialSource::KeyFile(path) => {
            let auth = ServiceAccountAuth::from_file(path, scopes.to_vec())
                .await
                .with_context(|| format!("Failed to load service account key from {}", path.display()))?;
            tracing::info!("Using service account {}", auth.client_email());
            Ok(Box::new(auth))
        }
        CredentialSource::InlineJson(json) => {
            let auth = ServiceAccountAuth::from_json(json, scopes.to_vec())
                .context("Failed to parse GOOGLE_SERVICE_ACCOUNT_JSON")?;
            tracing::info!("Using service account {}", auth.client_email());
            Ok(Box::new(auth))
        }
        CredentialSource::AccessToken(token) => {
            tracing::info!("Using static access token from GOOGLE_ACCESS_TOKEN");
            Ok(Box::new(StaticAccessToken::new(token.clone())))
        }
    }
}

/// Picks the store: Google when `USE_REAL_BACKEND` is on, otherwise mock mode.
async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    if !config.use_real_backend {
        tracing::warn!("USE_REAL_BACKEND=false: serving synthesized documents from memory");
        return Ok(Arc::new(InMemoryDocumentStore::new()));
    }

    let source = config
        .credentials
        .as_ref()
        .context("No Google credentials configured")?;
    let tokens = build_token_source(source, &config.scopes).await?;
    Ok(Arc::new(GoogleDocsStore::new(tokens)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().context("Invalid configuration")?;

    if config.oauth_client.is_configured() {
        tracing::info!(
            redirect_uri = ?config.oauth_client.redirect_uri,
            "OAuth client settings present; run the consent flow elsewhere and pass GOOGLE_ACCESS_TOKEN"
        );
    }

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================

    let store = build_store(&config).await?;

    let identity: Arc<dyn IdentityProvider> = if config.resolve_caller_identity {
        Arc::new(GoogleTokenInfoIdentity::new())
    } else {
        Arc::new(AnonymousIdentity)
    };

    if config.require_auth && !config.resolve_caller_identity {
        tracing::warn!(
            "REQUIRE_AUTH is on but RESOLVE_CALLER_IDENTITY is off; every POST will be rejected"
        );
    }

    let settings = ApiSettings {
        service_name: config.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        require_auth: config.require_auth,
        scopes: config.scopes.clone(),
        endpoints: web::endpoints(),
    };

    let dispatcher = RequestDispatcher::new(DocumentService::new(store));
    let api = Arc::new(DocumentApi::new(dispatcher, identity, settings));
    let app = web::router(api);

    // ========================================================================
    // SERVE
    // ========================================================================

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!(
        "Document gateway listening on {} (real backend: {})",
        config.bind_addr,
        config.use_real_backend
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
