use std::path::Path;

use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::hash_password;
use crate::config::{ConfigError, SeedConfig, ServerConfig};

pub async fn connect_db(config: &ServerConfig) -> Result<AppState, ConfigError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.postgres_url())
        .await
        .map_err(|e| ConfigError::Invalid(format!("postgres connect failed: {e}")))?;

    Ok(AppState {
        db: pool,
        session_ttl_seconds: config.auth.session_ttl_seconds,
        retry: config.retry,
    })
}

pub async fn apply_server_schema(state: &AppState, config_path: &Path) -> Result<(), ConfigError> {
    let base_dir = config_path
        .parent()
        .ok_or_else(|| ConfigError::Invalid("config path has no parent".into()))?;
    let schema_path = base_dir.join("sql").join("postgres").join("schema.sql");
    let content = tokio::fs::read_to_string(&schema_path).await.map_err(|_| {
        ConfigError::Invalid(format!("schema not found at {}", schema_path.display()))
    })?;

    for stmt in content.split(';') {
        let trimmed = stmt.trim();
        if trimmed.is_empty() {
            continue;
        }
        sqlx::query(trimmed)
            .execute(&state.db)
            .await
            .map_err(|e| ConfigError::Invalid(format!("schema apply error: {e}")))?;
    }
    Ok(())
}

/// Dev-mode wipe. Children first so the foreign keys never complain.
pub async fn reset_server_data(state: &AppState) -> Result<(), ConfigError> {
    let tables = [
        "comunicacoes",
        "eventos",
        "tarefas",
        "propostas",
        "negocios",
        "etapas",
        "pipelines",
        "contatos",
        "empresas",
        "sessions",
        "users",
        "orgs",
    ];

    for table in tables {
        let query = format!("DELETE FROM {table}");
        if let Err(e) = sqlx::query(&query).execute(&state.db).await {
            if !is_missing_table_error(&e) {
                return Err(ConfigError::Invalid(format!("cleanup {table} failed: {e}")));
            }
        }
    }
    Ok(())
}

/// Provisions the seed org and its admin user when absent.
pub async fn ensure_seed(state: &AppState, seed: &SeedConfig) -> Result<(), ConfigError> {
    let org_id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM orgs WHERE nome = $1")
        .bind(&seed.org)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| ConfigError::Invalid(format!("seed org lookup failed: {e}")))?;

    let org_id = match org_id {
        Some(id) => id,
        None => {
            let id: Uuid =
                sqlx::query_scalar("INSERT INTO orgs (nome) VALUES ($1) RETURNING id")
                    .bind(&seed.org)
                    .fetch_one(&state.db)
                    .await
                    .map_err(|e| ConfigError::Invalid(format!("seed org insert failed: {e}")))?;
            tracing::info!(org = %seed.org, "seed org created");
            id
        }
    };

    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&seed.email)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| ConfigError::Invalid(format!("seed user lookup failed: {e}")))?;
    if existing.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(&seed.password)
        .map_err(|e| ConfigError::Invalid(format!("hash password: {e}")))?;
    sqlx::query(
        "INSERT INTO users (org_id, email, nome, cargo, password_hash) \
         VALUES ($1, $2, $3, 'admin', $4)",
    )
    .bind(org_id)
    .bind(&seed.email)
    .bind(&seed.nome)
    .bind(&password_hash)
    .execute(&state.db)
    .await
    .map_err(|e| ConfigError::Invalid(format!("seed user insert failed: {e}")))?;
    tracing::info!(email = %seed.email, "seed user created");

    Ok(())
}

fn is_missing_table_error(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("42P01")
    )
}
