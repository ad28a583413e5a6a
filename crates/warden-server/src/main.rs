//! Warden Server — application entry point.
//!
//! Wires configuration, SurrealDB, the session cache and the token
//! verifier into the router, then serves until Ctrl-C / SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use warden_auth::JwtScopeVerifier;
use warden_cache::SessionCacheBackend;
use warden_db::DbManager;
use warden_server::{AppState, ServerConfig, build_router, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let config = ServerConfig::from_env().context("load configuration")?;
    info!(bind = %config.bind_addr, "starting warden server");

    let db = DbManager::connect(&config.db)
        .await
        .context("connect to SurrealDB")?;
    warden_db::run_migrations(db.client())
        .await
        .context("run schema migrations")?;

    let cache = SessionCacheBackend::from_config(&config.cache)
        .await
        .context("connect session cache")?;

    let verifier = JwtScopeVerifier::new(&config.auth).context("build token verifier")?;

    let state = AppState::new(
        db.client().clone(),
        cache,
        config.auth.pepper.clone(),
        Arc::new(verifier),
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "warden server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP")?;

    info!("warden server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
