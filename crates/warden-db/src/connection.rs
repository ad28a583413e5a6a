//! SurrealDB connection management.

use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::{error, info, warn};

use crate::error::DbError;

/// Where and as whom to connect.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket endpoint, `host:port`.
    pub url: String,
    pub namespace: String,
    pub database: String,
    /// Root credentials.
    pub username: String,
    pub password: String,
    /// Attempts before giving up on an unreachable server. At least one
    /// attempt is always made.
    pub connect_attempts: u32,
    /// Delay before the second attempt; doubles after each failure.
    pub retry_delay: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "warden".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
            connect_attempts: 5,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// Delay before retry number `attempt` (1-based), capped at 30s.
fn backoff(base: Duration, attempt: u32) -> Duration {
    let factor = 1u32 << attempt.saturating_sub(1).min(16);
    base.saturating_mul(factor).min(Duration::from_secs(30))
}

/// An authenticated client bound to the configured namespace and
/// database. Cloning shares the underlying connection.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Connect, retrying while the server is unreachable. Rejected
    /// credentials fail immediately.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "connecting to SurrealDB"
        );

        let attempts = config.connect_attempts.max(1);
        let mut attempt = 1;
        let db = loop {
            match Surreal::new::<Ws>(&config.url).await {
                Ok(db) => break db,
                Err(e) if attempt < attempts => {
                    let delay = backoff(config.retry_delay, attempt);
                    warn!(
                        url = %config.url,
                        attempt,
                        retry_in_ms = delay.as_millis() as u64,
                        error = %e,
                        "SurrealDB unreachable, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(url = %config.url, attempts, error = %e, "SurrealDB unreachable");
                    return Err(e.into());
                }
            }
        };

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await
        .inspect_err(|e| error!(error = %e, "SurrealDB root sign-in rejected"))?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        info!(attempt, "connected to SurrealDB");
        Ok(Self { db })
    }

    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }
}
