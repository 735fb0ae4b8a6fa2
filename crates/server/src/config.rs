use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config invalid: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    Dev,
    Prod,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub app: AppConfig,
    pub http: HttpConfig,
    pub postgres: PostgresConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    pub retry: RetryConfig,
    pub dev: DevConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub mode: AppMode,
    pub timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub ssl_mode: String,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    pub session_ttl_seconds: u64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
    pub jitter: f64,
}

impl RetryConfig {
    pub fn base_backoff(&self) -> Duration {
        Duration::from_millis(self.base_backoff_ms)
    }
}

#[derive(Debug, Deserialize)]
pub struct DevConfig {
    pub reset_on_start: bool,
}

#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    pub org: String,
    pub email: String,
    pub password: String,
    pub nome: String,
}

impl ServerConfig {
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let base_dir = path
            .parent()
            .ok_or_else(|| ConfigError::Invalid("config path has no parent".into()))?;
        let schema_path = base_dir.join("schemas").join("server.schema.json");
        let schema = load_schema(&schema_path).await?;
        let content = tokio::fs::read_to_string(path).await?;
        validate_toml(&schema, &content, &path.display().to_string())?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn postgres_url(&self) -> String {
        let pg = &self.postgres;
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            pg.user, pg.password, pg.host, pg.port, pg.database, pg.ssl_mode
        )
    }
}

async fn load_schema(path: &Path) -> Result<String, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|_| ConfigError::Invalid(format!("schema not found at {}", path.display())))?;
    Ok(content)
}

pub(crate) fn validate_toml(schema: &str, toml_input: &str, name: &str) -> Result<(), ConfigError> {
    let schema_json: serde_json::Value = serde_json::from_str(schema)
        .map_err(|e| ConfigError::Invalid(format!("schema parse error: {e}")))?;
    let compiled = jsonschema::validator_for(&schema_json)
        .map_err(|e| ConfigError::Invalid(format!("schema compile error: {e}")))?;

    let toml_value: toml::Value =
        toml::from_str(toml_input).map_err(|e| ConfigError::Invalid(format!("{name}: {e}")))?;
    let json_value =
        serde_json::to_value(toml_value).map_err(|e| ConfigError::Invalid(e.to_string()))?;

    if let Err(mut errors) = compiled.validate(&json_value) {
        if let Some(err) = errors.next() {
            let mut messages = vec![err.to_string()];
            for e in errors.take(4) {
                messages.push(e.to_string());
            }
            return Err(ConfigError::Invalid(format!(
                "schema validation failed for {name}: {}",
                messages.join("; ")
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = include_str!("../res/schemas/server.schema.json");
    const SAMPLE: &str = include_str!("../res/config.toml");

    #[test]
    fn sample_config_passes_schema_and_parses() {
        validate_toml(SCHEMA, SAMPLE, "config.toml").expect("schema");
        let config: ServerConfig = toml::from_str(SAMPLE).expect("parse");
        assert_eq!(config.app.mode, AppMode::Dev);
        assert_eq!(config.auth.session_ttl_seconds, 86400);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn unknown_section_is_rejected() {
        let bad = format!("{SAMPLE}\n[extra]\nfoo = 1\n");
        let err = validate_toml(SCHEMA, &bad, "config.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn out_of_range_port_is_rejected() {
        let bad = SAMPLE.replace("port = 8087", "port = 70000");
        assert!(validate_toml(SCHEMA, &bad, "config.toml").is_err());
    }

    #[test]
    fn postgres_url_includes_ssl_mode() {
        let config: ServerConfig = toml::from_str(SAMPLE).expect("parse");
        let url = config.postgres_url();
        assert!(url.starts_with("postgres://vendaflow:"));
        assert!(url.ends_with("sslmode=disable"));
    }
}
