use argon2::{
    password_hash::{rand_core::OsRng, rand_core::RngCore, SaltString},
    Argon2,
    PasswordHash,
    PasswordHasher,
    PasswordVerifier,
};
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::errors::ApiError;

pub const SESSION_COOKIE: &str = "vf_session";

/// Identity resolved by the session middleware and attached to every
/// protected request. `org_id` is the tenant boundary for all queries.
#[derive(Debug, Clone, Copy)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub org_id: Uuid,
}

/// Validates the session token on every protected request and slides the
/// expiry forward once less than half the TTL remains.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(req.headers())?;
    let token_hash = hash_token(&token);

    let ids = sqlx::query_as::<_, (Uuid, Uuid)>(
        "SELECT s.user_id, u.org_id FROM sessions s \
         JOIN users u ON u.id = s.user_id \
         WHERE s.token_hash = $1 AND s.expires_at > NOW()",
    )
    .bind(&token_hash)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::new(axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
    .ok_or_else(|| ApiError::unauthorized("sessao invalida ou expirada"))?;

    let ttl = state.session_ttl_seconds as i64;
    sqlx::query(
        "UPDATE sessions SET expires_at = NOW() + ($2 || ' seconds')::interval \
         WHERE token_hash = $1 AND expires_at < NOW() + (($2 || ' seconds')::interval / 2)",
    )
    .bind(&token_hash)
    .bind(ttl)
    .execute(&state.db)
    .await
    .map_err(|e| ApiError::new(axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    req.extensions_mut().insert(AuthSession {
        user_id: ids.0,
        org_id: ids.1,
    });
    Ok(next.run(req).await)
}

/// Accepts the token as `Authorization: Bearer <token>` or as the session
/// cookie set by the web client.
pub fn session_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let token = value.strip_prefix("Bearer ").unwrap_or("").trim();
    if !token.is_empty() {
        return Ok(token.to_string());
    }

    if let Some(token) = cookie_value(headers, SESSION_COOKIE) {
        if !token.is_empty() {
            return Ok(token);
        }
    }

    Err(ApiError::unauthorized("sessao ausente"))
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())?;
    for pair in raw.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        if parts.next() == Some(name) {
            return parts.next().map(|v| v.trim().to_string());
        }
    }
    None
}

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| format!("password hash error: {e}"))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(hash: &str, password: &str) -> Result<(), String> {
    let parsed = PasswordHash::new(hash).map_err(|e| format!("password hash parse error: {e}"))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|e| format!("password verify error: {e}"))
}

pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use axum::http::header::{AUTHORIZATION, COOKIE};

    use super::*;

    #[test]
    fn password_roundtrip() {
        let hash = hash_password("s3nha-forte").expect("hash");
        assert!(verify_password(&hash, "s3nha-forte").is_ok());
        assert!(verify_password(&hash, "outra").is_err());
    }

    #[test]
    fn generated_tokens_are_unique_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn token_hash_is_deterministic() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer tok-header".parse().unwrap());
        headers.insert(COOKIE, "vf_session=tok-cookie".parse().unwrap());
        assert_eq!(session_token(&headers).unwrap(), "tok-header");
    }

    #[test]
    fn cookie_is_accepted_without_header() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "theme=dark; vf_session=tok-cookie".parse().unwrap());
        assert_eq!(session_token(&headers).unwrap(), "tok-cookie");
    }

    #[test]
    fn missing_token_is_unauthorized() {
        let headers = HeaderMap::new();
        let err = session_token(&headers).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
