use sqlx::PgPool;

use crate::config::RetryConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub session_ttl_seconds: u64,
    pub retry: RetryConfig,
}
