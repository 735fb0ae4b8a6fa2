use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::AuthSession;
use crate::errors::{map_db_error, ApiError};
use crate::handlers::{ensure_contato_ref, ensure_negocio_ref};
use crate::models::tarefas::{TarefaListQuery, TarefaPayload, TarefaRow};
use crate::repo;
use crate::retry::with_db_retry;
use crate::validate::{page_params, Validator};

const STATUS_VALUES: &[&str] = &["pendente", "concluida"];
const PRIORIDADE_VALUES: &[&str] = &["baixa", "media", "alta"];

fn validate_tarefa(payload: TarefaPayload) -> Result<TarefaPayload, ApiError> {
    let mut v = Validator::new();
    let titulo = v.require("titulo", &payload.titulo);
    let descricao = v.optional(payload.descricao.as_deref());
    let prioridade = payload
        .prioridade
        .as_deref()
        .map(|p| v.one_of("prioridade", p, PRIORIDADE_VALUES));
    let status = payload
        .status
        .as_deref()
        .map(|s| v.one_of("status", s, STATUS_VALUES));
    v.finish()?;

    Ok(TarefaPayload {
        titulo,
        descricao,
        prioridade,
        status,
        ..payload
    })
}

/// Completion stamps once, reopening clears.
fn concluida_em_for(
    status: Option<&str>,
    previous: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if status == Some("concluida") {
        previous.or(Some(now))
    } else {
        None
    }
}

pub async fn list_tarefas(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Query(query): Query<TarefaListQuery>,
) -> Result<Json<Vec<TarefaRow>>, ApiError> {
    let (limit, offset) = page_params(query.limit, query.offset);
    let rows = with_db_retry(&state.retry, || {
        repo::tarefas::list(&state.db, auth.org_id, &query, limit, offset)
    })
    .await
    .map_err(|e| map_db_error(e, "tarefa list failed"))?;
    Ok(Json(rows))
}

pub async fn get_tarefa(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<TarefaRow>, ApiError> {
    let row = with_db_retry(&state.retry, || {
        repo::tarefas::get(&state.db, auth.org_id, id)
    })
    .await
    .map_err(|e| map_db_error(e, "tarefa lookup failed"))?
    .ok_or_else(|| ApiError::not_found("tarefa nao encontrada"))?;
    Ok(Json(row))
}

pub async fn create_tarefa(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(payload): Json<TarefaPayload>,
) -> Result<(StatusCode, Json<TarefaRow>), ApiError> {
    let payload = validate_tarefa(payload)?;
    ensure_negocio_ref(&state, auth.org_id, payload.negocio_id).await?;
    ensure_contato_ref(&state, auth.org_id, payload.contato_id).await?;

    let concluida_em = concluida_em_for(payload.status.as_deref(), None, Utc::now());
    let row = repo::tarefas::create(&state.db, auth.org_id, &payload, concluida_em)
        .await
        .map_err(|e| map_db_error(e, "tarefa create failed"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_tarefa(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TarefaPayload>,
) -> Result<Json<TarefaRow>, ApiError> {
    let payload = validate_tarefa(payload)?;

    let existing = repo::tarefas::get(&state.db, auth.org_id, id)
        .await
        .map_err(|e| map_db_error(e, "tarefa lookup failed"))?
        .ok_or_else(|| ApiError::not_found("tarefa nao encontrada"))?;

    ensure_negocio_ref(&state, auth.org_id, payload.negocio_id).await?;
    ensure_contato_ref(&state, auth.org_id, payload.contato_id).await?;

    let concluida_em = concluida_em_for(
        payload.status.as_deref(),
        existing.concluida_em,
        Utc::now(),
    );
    let row = repo::tarefas::update(&state.db, auth.org_id, id, &payload, concluida_em)
        .await
        .map_err(|e| map_db_error(e, "tarefa update failed"))?
        .ok_or_else(|| ApiError::not_found("tarefa nao encontrada"))?;
    Ok(Json(row))
}

pub async fn delete_tarefa(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let rows = repo::tarefas::delete(&state.db, auth.org_id, id)
        .await
        .map_err(|e| map_db_error(e, "tarefa delete failed"))?;
    if rows == 0 {
        return Err(ApiError::not_found("tarefa nao encontrada"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completing_stamps_once() {
        let antes = Utc::now() - chrono::Duration::hours(1);
        let now = Utc::now();
        assert_eq!(concluida_em_for(Some("concluida"), None, now), Some(now));
        assert_eq!(
            concluida_em_for(Some("concluida"), Some(antes), now),
            Some(antes)
        );
    }

    #[test]
    fn reopening_clears_stamp() {
        let antes = Utc::now() - chrono::Duration::hours(1);
        let now = Utc::now();
        assert_eq!(concluida_em_for(Some("pendente"), Some(antes), now), None);
        assert_eq!(concluida_em_for(None, Some(antes), now), None);
    }
}
