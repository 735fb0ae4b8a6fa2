use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::AuthSession;
use crate::errors::{map_db_error, ApiError};
use crate::handlers::{ensure_contato_ref, ensure_negocio_ref};
use crate::models::calendario::{EventoListQuery, EventoPayload, EventoRow};
use crate::repo;
use crate::retry::with_db_retry;
use crate::validate::{page_params, Validator};

fn validate_evento(payload: EventoPayload) -> Result<EventoPayload, ApiError> {
    let mut v = Validator::new();
    let titulo = v.require("titulo", &payload.titulo);
    let descricao = v.optional(payload.descricao.as_deref());
    let local = v.optional(payload.local.as_deref());
    v.check(
        payload.fim >= payload.inicio,
        "fim",
        "deve ser maior ou igual ao inicio",
    );
    v.finish()?;

    Ok(EventoPayload {
        titulo,
        descricao,
        local,
        ..payload
    })
}

pub async fn list_eventos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Query(query): Query<EventoListQuery>,
) -> Result<Json<Vec<EventoRow>>, ApiError> {
    let (limit, offset) = page_params(query.limit, query.offset);
    let rows = with_db_retry(&state.retry, || {
        repo::calendario::list(&state.db, auth.org_id, &query, limit, offset)
    })
    .await
    .map_err(|e| map_db_error(e, "evento list failed"))?;
    Ok(Json(rows))
}

pub async fn get_evento(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventoRow>, ApiError> {
    let row = with_db_retry(&state.retry, || {
        repo::calendario::get(&state.db, auth.org_id, id)
    })
    .await
    .map_err(|e| map_db_error(e, "evento lookup failed"))?
    .ok_or_else(|| ApiError::not_found("evento nao encontrado"))?;
    Ok(Json(row))
}

pub async fn create_evento(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(payload): Json<EventoPayload>,
) -> Result<(StatusCode, Json<EventoRow>), ApiError> {
    let payload = validate_evento(payload)?;
    ensure_contato_ref(&state, auth.org_id, payload.contato_id).await?;
    ensure_negocio_ref(&state, auth.org_id, payload.negocio_id).await?;

    let row = repo::calendario::create(&state.db, auth.org_id, &payload)
        .await
        .map_err(|e| map_db_error(e, "evento create failed"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_evento(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EventoPayload>,
) -> Result<Json<EventoRow>, ApiError> {
    let payload = validate_evento(payload)?;
    ensure_contato_ref(&state, auth.org_id, payload.contato_id).await?;
    ensure_negocio_ref(&state, auth.org_id, payload.negocio_id).await?;

    let row = repo::calendario::update(&state.db, auth.org_id, id, &payload)
        .await
        .map_err(|e| map_db_error(e, "evento update failed"))?
        .ok_or_else(|| ApiError::not_found("evento nao encontrado"))?;
    Ok(Json(row))
}

pub async fn delete_evento(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let rows = repo::calendario::delete(&state.db, auth.org_id, id)
        .await
        .map_err(|e| map_db_error(e, "evento delete failed"))?;
    if rows == 0 {
        return Err(ApiError::not_found("evento nao encontrado"));
    }
    Ok(StatusCode::NO_CONTENT)
}
