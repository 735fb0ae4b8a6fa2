use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::AuthSession;
use crate::errors::{map_db_error, ApiError};
use crate::handlers::{ensure_contato_ref, ensure_negocio_ref};
use crate::models::comunicacoes::{ComunicacaoListQuery, ComunicacaoPayload, ComunicacaoRow};
use crate::repo;
use crate::retry::with_db_retry;
use crate::validate::{page_params, Validator};

const TIPO_VALUES: &[&str] = &["email", "ligacao", "whatsapp", "reuniao"];
const DIRECAO_VALUES: &[&str] = &["entrada", "saida"];

fn validate_comunicacao(payload: ComunicacaoPayload) -> Result<ComunicacaoPayload, ApiError> {
    let mut v = Validator::new();
    let tipo = v.one_of("tipo", &payload.tipo, TIPO_VALUES);
    let direcao = payload
        .direcao
        .as_deref()
        .map(|d| v.one_of("direcao", d, DIRECAO_VALUES));
    let assunto = v.optional(payload.assunto.as_deref());
    let conteudo = v.require("conteudo", &payload.conteudo);
    v.finish()?;

    Ok(ComunicacaoPayload {
        tipo,
        direcao,
        assunto,
        conteudo,
        ..payload
    })
}

pub async fn list_comunicacoes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Query(query): Query<ComunicacaoListQuery>,
) -> Result<Json<Vec<ComunicacaoRow>>, ApiError> {
    let (limit, offset) = page_params(query.limit, query.offset);
    let rows = with_db_retry(&state.retry, || {
        repo::comunicacoes::list(&state.db, auth.org_id, &query, limit, offset)
    })
    .await
    .map_err(|e| map_db_error(e, "comunicacao list failed"))?;
    Ok(Json(rows))
}

pub async fn get_comunicacao(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<ComunicacaoRow>, ApiError> {
    let row = with_db_retry(&state.retry, || {
        repo::comunicacoes::get(&state.db, auth.org_id, id)
    })
    .await
    .map_err(|e| map_db_error(e, "comunicacao lookup failed"))?
    .ok_or_else(|| ApiError::not_found("comunicacao nao encontrada"))?;
    Ok(Json(row))
}

pub async fn create_comunicacao(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(payload): Json<ComunicacaoPayload>,
) -> Result<(StatusCode, Json<ComunicacaoRow>), ApiError> {
    let payload = validate_comunicacao(payload)?;
    ensure_contato_ref(&state, auth.org_id, payload.contato_id).await?;
    ensure_negocio_ref(&state, auth.org_id, payload.negocio_id).await?;

    let ocorrida_em = payload.ocorrida_em.unwrap_or_else(Utc::now);
    let row = repo::comunicacoes::create(&state.db, auth.org_id, &payload, ocorrida_em)
        .await
        .map_err(|e| map_db_error(e, "comunicacao create failed"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_comunicacao(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ComunicacaoPayload>,
) -> Result<Json<ComunicacaoRow>, ApiError> {
    let payload = validate_comunicacao(payload)?;
    ensure_contato_ref(&state, auth.org_id, payload.contato_id).await?;
    ensure_negocio_ref(&state, auth.org_id, payload.negocio_id).await?;

    let existing = repo::comunicacoes::get(&state.db, auth.org_id, id)
        .await
        .map_err(|e| map_db_error(e, "comunicacao lookup failed"))?
        .ok_or_else(|| ApiError::not_found("comunicacao nao encontrada"))?;

    let ocorrida_em = payload.ocorrida_em.unwrap_or(existing.ocorrida_em);
    let row = repo::comunicacoes::update(&state.db, auth.org_id, id, &payload, ocorrida_em)
        .await
        .map_err(|e| map_db_error(e, "comunicacao update failed"))?
        .ok_or_else(|| ApiError::not_found("comunicacao nao encontrada"))?;
    Ok(Json(row))
}

pub async fn delete_comunicacao(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let rows = repo::comunicacoes::delete(&state.db, auth.org_id, id)
        .await
        .map_err(|e| map_db_error(e, "comunicacao delete failed"))?;
    if rows == 0 {
        return Err(ApiError::not_found("comunicacao nao encontrada"));
    }
    Ok(StatusCode::NO_CONTENT)
}
