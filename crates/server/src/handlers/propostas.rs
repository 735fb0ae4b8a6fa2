use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::AuthSession;
use crate::errors::{map_db_error, ApiError};
use crate::handlers::ensure_negocio_ref;
use crate::models::propostas::{PropostaCreate, PropostaListQuery, PropostaRow, PropostaUpdate};
use crate::repo;
use crate::retry::with_db_retry;
use crate::validate::{page_params, Validator};

const STATUS_VALUES: &[&str] = &["rascunho", "enviada", "aceita", "recusada"];

pub async fn list_propostas(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Query(query): Query<PropostaListQuery>,
) -> Result<Json<Vec<PropostaRow>>, ApiError> {
    let (limit, offset) = page_params(query.limit, query.offset);
    let rows = with_db_retry(&state.retry, || {
        repo::propostas::list(&state.db, auth.org_id, &query, limit, offset)
    })
    .await
    .map_err(|e| map_db_error(e, "proposta list failed"))?;
    Ok(Json(rows))
}

pub async fn get_proposta(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<PropostaRow>, ApiError> {
    let row = with_db_retry(&state.retry, || {
        repo::propostas::get(&state.db, auth.org_id, id)
    })
    .await
    .map_err(|e| map_db_error(e, "proposta lookup failed"))?
    .ok_or_else(|| ApiError::not_found("proposta nao encontrada"))?;
    Ok(Json(row))
}

pub async fn create_proposta(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(payload): Json<PropostaCreate>,
) -> Result<(StatusCode, Json<PropostaRow>), ApiError> {
    let mut v = Validator::new();
    let titulo = v.require("titulo", &payload.titulo);
    if let Some(valor) = payload.valor {
        v.check(valor >= 0.0, "valor", "deve ser maior ou igual a zero");
    }
    let status = payload
        .status
        .as_deref()
        .map(|s| v.one_of("status", s, STATUS_VALUES));
    let conteudo = v.optional(payload.conteudo.as_deref());
    v.finish()?;

    ensure_negocio_ref(&state, auth.org_id, Some(payload.negocio_id)).await?;

    let data = PropostaCreate {
        titulo,
        status,
        conteudo,
        ..payload
    };
    let row = repo::propostas::create(&state.db, auth.org_id, &data)
        .await
        .map_err(|e| map_db_error(e, "proposta create failed"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_proposta(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PropostaUpdate>,
) -> Result<Json<PropostaRow>, ApiError> {
    let mut v = Validator::new();
    let titulo = v.require("titulo", &payload.titulo);
    if let Some(valor) = payload.valor {
        v.check(valor >= 0.0, "valor", "deve ser maior ou igual a zero");
    }
    let status = payload
        .status
        .as_deref()
        .map(|s| v.one_of("status", s, STATUS_VALUES));
    let conteudo = v.optional(payload.conteudo.as_deref());
    v.finish()?;

    let data = PropostaUpdate {
        titulo,
        status,
        conteudo,
        ..payload
    };
    let row = repo::propostas::update(&state.db, auth.org_id, id, &data)
        .await
        .map_err(|e| map_db_error(e, "proposta update failed"))?
        .ok_or_else(|| ApiError::not_found("proposta nao encontrada"))?;
    Ok(Json(row))
}

pub async fn delete_proposta(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let rows = repo::propostas::delete(&state.db, auth.org_id, id)
        .await
        .map_err(|e| map_db_error(e, "proposta delete failed"))?;
    if rows == 0 {
        return Err(ApiError::not_found("proposta nao encontrada"));
    }
    Ok(StatusCode::NO_CONTENT)
}
