/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (HTTP 横断 / Bearer)
 * - axum::serve() で起動
 */
use anyhow::{Context, Result};
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use std::{panic, process, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::repos::user_repo::{PgUserRepo, UserLookup};
use crate::services::auth::{SigningKey, TokenIssuer, TokenService, TokenVerifier};
use crate::state::AppState;

pub fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,eyeson_auth=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost"
        tracing::error!(?info, "panic");

        // Development: fail fast. Production: default hook, server keeps running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting auth API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("failed to connect to DATABASE_URL")?;

    let state = build_state(&config, Arc::new(PgUserRepo::new(pool)))?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build process-level services and inject them into the shared state.
///
/// The signing key is derived here exactly once; a bad secret aborts startup.
pub fn build_state(config: &Config, users: Arc<dyn UserLookup>) -> Result<AppState> {
    let tokens = build_token_service(config, users)?;
    Ok(AppState::new(Arc::new(tokens)))
}

pub fn build_token_service(config: &Config, users: Arc<dyn UserLookup>) -> Result<TokenService> {
    let key = SigningKey::from_base64_secret(&config.jwt_secret)
        .context("invalid JWT_SECRET")?;
    tracing::info!(key_fingerprint = key.fingerprint(), "loaded HS512 signing key");

    if config.refresh_token_ttl_seconds <= config.access_token_ttl_seconds {
        tracing::warn!(
            access_ttl_seconds = config.access_token_ttl_seconds,
            refresh_ttl_seconds = config.refresh_token_ttl_seconds,
            "refresh token TTL does not exceed access token TTL"
        );
    }

    let key = Arc::new(key);
    let issuer = TokenIssuer::new(
        key.clone(),
        config.access_token_ttl_seconds,
        config.refresh_token_ttl_seconds,
    );
    let verifier = TokenVerifier::new(key);

    Ok(TokenService::new(issuer, verifier, users))
}

pub fn build_router(state: AppState) -> Router {
    async fn health() -> &'static str {
        "ok"
    }

    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    middleware::http::apply(router)
}
