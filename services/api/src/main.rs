use anyhow::Context as _;
use sea_orm::Database;
use tracing::{info, warn};

use soundcave_api::config::ApiConfig;
use soundcave_api::domain::password::PasswordHasher;
use soundcave_api::infra::storage::LocalObjectStore;
use soundcave_api::router::{RouterOptions, build_router};
use soundcave_api::state::AppState;
use soundcave_auth_types::token::JwtKeys;
use soundcave_core::config::Config as _;
use soundcave_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env().context("load configuration")?;
    init_tracing(config.log_format(), "soundcave_api=info,tower_http=info,sea_orm=warn");
    if config.uses_development_secret() {
        warn!("JWT_SECRET is unset; signing tokens with the insecure development secret");
    }

    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;

    let state = AppState {
        db,
        jwt: JwtKeys::new(config.jwt_secret().as_bytes(), config.token_ttl_secs),
        hasher: PasswordHasher::new(config.bcrypt_cost),
        object_store: LocalObjectStore::new(config.asset_dir.clone(), &config.asset_base_url),
    };

    let router = build_router(state, RouterOptions::from(&config));
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!(%addr, env = ?config.app_env, "api service listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve http")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
