use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::{Extension, Json};

use crate::app_state::AppState;
use crate::auth::{
    generate_token, hash_password, hash_token, session_token, verify_password, AuthSession,
};
use crate::errors::{map_db_error, ApiError};
use crate::models::auth::{
    LoginRequest, ProfileUpdateRequest, RegisterRequest, RegisterResponse, SessionResponse,
    TokenResponse,
};
use crate::repo;
use crate::validate::Validator;

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let mut v = Validator::new();
    let org = v.require("org", &payload.org);
    let nome = v.require("nome", &payload.nome);
    let email = v.email("email", &payload.email);
    v.min_len("password", &payload.password, 8);
    let cargo = v.optional(payload.cargo.as_deref());
    v.finish()?;

    let password_hash = hash_password(payload.password.trim())
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    let (user, org) = repo::users::register(
        &state.db,
        &org,
        &nome,
        &email,
        cargo.as_deref(),
        &password_hash,
    )
    .await
    .map_err(|e| map_db_error(e, "email ja cadastrado"))?;

    let token = generate_token();
    let token_hash = hash_token(&token);
    repo::sessions::create(
        &state.db,
        user.id,
        &token_hash,
        state.session_ttl_seconds as i64,
    )
    .await
    .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user,
            org,
            session: TokenResponse {
                token,
                token_type: "bearer".to_string(),
                expires_in: state.session_ttl_seconds,
            },
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = payload.email.trim();
    let password = payload.password.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "email e password obrigatorios",
        ));
    }

    let (user_id, password_hash) = repo::users::find_credentials(&state.db, email)
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or_else(|| ApiError::unauthorized("credenciais invalidas"))?;

    verify_password(&password_hash, password)
        .map_err(|_| ApiError::unauthorized("credenciais invalidas"))?;

    let token = generate_token();
    let token_hash = hash_token(&token);
    repo::sessions::create(
        &state.db,
        user_id,
        &token_hash,
        state.session_ttl_seconds as i64,
    )
    .await
    .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(TokenResponse {
        token,
        token_type: "bearer".to_string(),
        expires_in: state.session_ttl_seconds,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token = session_token(&headers)?;
    let token_hash = hash_token(&token);
    repo::sessions::delete_by_hash(&state.db, &token_hash)
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = repo::users::get(&state.db, auth.user_id)
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or_else(|| ApiError::not_found("usuario nao encontrado"))?;
    let org = repo::users::get_org(&state.db, auth.org_id)
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or_else(|| ApiError::not_found("org nao encontrada"))?;
    Ok(Json(SessionResponse { user, org }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(payload): Json<ProfileUpdateRequest>,
) -> Result<Json<crate::models::auth::UserRow>, ApiError> {
    let mut v = Validator::new();
    let nome = v.require("nome", &payload.nome);
    let cargo = v.optional(payload.cargo.as_deref());
    v.finish()?;

    let user = repo::users::update_profile(&state.db, auth.user_id, &nome, cargo.as_deref())
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or_else(|| ApiError::not_found("usuario nao encontrado"))?;
    Ok(Json(user))
}
