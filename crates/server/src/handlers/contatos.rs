use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::AuthSession;
use crate::errors::{map_db_error, ApiError};
use crate::handlers::ensure_empresa_ref;
use crate::models::contatos::{ContatoListQuery, ContatoPayload, ContatoRow};
use crate::repo;
use crate::retry::with_db_retry;
use crate::validate::{page_params, Validator};

const STATUS_VALUES: &[&str] = &["ativo", "inativo", "arquivado"];

fn validate_contato(payload: ContatoPayload) -> Result<ContatoPayload, ApiError> {
    let mut v = Validator::new();
    let nome = v.require("nome", &payload.nome);
    let email = v.optional_email("email", payload.email.as_deref());
    let telefone = v.optional(payload.telefone.as_deref());
    let celular = v.optional(payload.celular.as_deref());
    let cargo = v.optional(payload.cargo.as_deref());
    let origem = v.optional(payload.origem.as_deref());
    let status = payload
        .status
        .as_deref()
        .map(|s| v.one_of("status", s, STATUS_VALUES));
    let notas = v.optional(payload.notas.as_deref());
    v.finish()?;

    Ok(ContatoPayload {
        nome,
        empresa_id: payload.empresa_id,
        email,
        telefone,
        celular,
        cargo,
        origem,
        status,
        notas,
    })
}

pub async fn list_contatos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Query(query): Query<ContatoListQuery>,
) -> Result<Json<Vec<ContatoRow>>, ApiError> {
    let (limit, offset) = page_params(query.limit, query.offset);
    let rows = with_db_retry(&state.retry, || {
        repo::contatos::list(&state.db, auth.org_id, &query, limit, offset)
    })
    .await
    .map_err(|e| map_db_error(e, "contato list failed"))?;
    Ok(Json(rows))
}

pub async fn get_contato(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContatoRow>, ApiError> {
    let row = with_db_retry(&state.retry, || {
        repo::contatos::get(&state.db, auth.org_id, id)
    })
    .await
    .map_err(|e| map_db_error(e, "contato lookup failed"))?
    .ok_or_else(|| ApiError::not_found("contato nao encontrado"))?;
    Ok(Json(row))
}

pub async fn create_contato(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(payload): Json<ContatoPayload>,
) -> Result<(StatusCode, Json<ContatoRow>), ApiError> {
    let payload = validate_contato(payload)?;
    ensure_empresa_ref(&state, auth.org_id, payload.empresa_id).await?;

    let row = repo::contatos::create(&state.db, auth.org_id, &payload)
        .await
        .map_err(|e| map_db_error(e, "contato create failed"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_contato(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContatoPayload>,
) -> Result<Json<ContatoRow>, ApiError> {
    let payload = validate_contato(payload)?;
    ensure_empresa_ref(&state, auth.org_id, payload.empresa_id).await?;

    let row = repo::contatos::update(&state.db, auth.org_id, id, &payload)
        .await
        .map_err(|e| map_db_error(e, "contato update failed"))?
        .ok_or_else(|| ApiError::not_found("contato nao encontrado"))?;
    Ok(Json(row))
}

pub async fn delete_contato(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let rows = repo::contatos::delete(&state.db, auth.org_id, id)
        .await
        .map_err(|e| map_db_error(e, "contato delete failed"))?;
    if rows == 0 {
        return Err(ApiError::not_found("contato nao encontrado"));
    }
    Ok(StatusCode::NO_CONTENT)
}
