use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::AuthSession;
use crate::errors::{map_db_error, ApiError};
use crate::models::pipelines::{
    EtapaPayload, EtapaRow, PipelineDetail, PipelineListQuery, PipelinePayload, PipelineRow,
};
use crate::repo;
use crate::retry::with_db_retry;
use crate::validate::{page_params, Validator};

fn validate_pipeline(payload: PipelinePayload) -> Result<PipelinePayload, ApiError> {
    let mut v = Validator::new();
    let nome = v.require("nome", &payload.nome);
    let descricao = v.optional(payload.descricao.as_deref());
    v.finish()?;

    Ok(PipelinePayload {
        nome,
        descricao,
        padrao: payload.padrao,
    })
}

fn validate_etapa(payload: EtapaPayload) -> Result<EtapaPayload, ApiError> {
    let mut v = Validator::new();
    let nome = v.require("nome", &payload.nome);
    if let Some(probabilidade) = payload.probabilidade {
        v.range_0_100("probabilidade", probabilidade);
    }
    v.check(
        !(payload.ganho && payload.perdido),
        "ganho",
        "etapa nao pode ser ganho e perdido ao mesmo tempo",
    );
    let cor = v.optional(payload.cor.as_deref());
    v.finish()?;

    Ok(EtapaPayload {
        nome,
        ordem: payload.ordem,
        probabilidade: payload.probabilidade,
        cor,
        ganho: payload.ganho,
        perdido: payload.perdido,
    })
}

pub async fn list_pipelines(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Query(query): Query<PipelineListQuery>,
) -> Result<Json<Vec<PipelineRow>>, ApiError> {
    let (limit, offset) = page_params(query.limit, query.offset);
    let rows = with_db_retry(&state.retry, || {
        repo::pipelines::list(&state.db, auth.org_id, limit, offset)
    })
    .await
    .map_err(|e| map_db_error(e, "pipeline list failed"))?;
    Ok(Json(rows))
}

pub async fn get_pipeline(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<PipelineDetail>, ApiError> {
    let pipeline = with_db_retry(&state.retry, || {
        repo::pipelines::get(&state.db, auth.org_id, id)
    })
    .await
    .map_err(|e| map_db_error(e, "pipeline lookup failed"))?
    .ok_or_else(|| ApiError::not_found("pipeline nao encontrado"))?;

    let etapas = with_db_retry(&state.retry, || {
        repo::pipelines::list_etapas(&state.db, auth.org_id, id)
    })
    .await
    .map_err(|e| map_db_error(e, "etapa list failed"))?;

    Ok(Json(PipelineDetail { pipeline, etapas }))
}

pub async fn create_pipeline(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(payload): Json<PipelinePayload>,
) -> Result<(StatusCode, Json<PipelineRow>), ApiError> {
    let payload = validate_pipeline(payload)?;
    let row = repo::pipelines::create(&state.db, auth.org_id, &payload)
        .await
        .map_err(|e| map_db_error(e, "pipeline create failed"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_pipeline(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PipelinePayload>,
) -> Result<Json<PipelineRow>, ApiError> {
    let payload = validate_pipeline(payload)?;
    let row = repo::pipelines::update(&state.db, auth.org_id, id, &payload)
        .await
        .map_err(|e| map_db_error(e, "pipeline update failed"))?
        .ok_or_else(|| ApiError::not_found("pipeline nao encontrado"))?;
    Ok(Json(row))
}

pub async fn delete_pipeline(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let rows = repo::pipelines::delete(&state.db, auth.org_id, id)
        .await
        .map_err(|e| map_db_error(e, "pipeline delete failed"))?;
    if rows == 0 {
        return Err(ApiError::not_found("pipeline nao encontrado"));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_etapas(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(pipeline_id): Path<Uuid>,
) -> Result<Json<Vec<EtapaRow>>, ApiError> {
    let pipeline = with_db_retry(&state.retry, || {
        repo::pipelines::get(&state.db, auth.org_id, pipeline_id)
    })
    .await
    .map_err(|e| map_db_error(e, "pipeline lookup failed"))?;
    if pipeline.is_none() {
        return Err(ApiError::not_found("pipeline nao encontrado"));
    }

    let rows = with_db_retry(&state.retry, || {
        repo::pipelines::list_etapas(&state.db, auth.org_id, pipeline_id)
    })
    .await
    .map_err(|e| map_db_error(e, "etapa list failed"))?;
    Ok(Json(rows))
}

pub async fn create_etapa(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(pipeline_id): Path<Uuid>,
    Json(payload): Json<EtapaPayload>,
) -> Result<(StatusCode, Json<EtapaRow>), ApiError> {
    let payload = validate_etapa(payload)?;

    let pipeline = repo::pipelines::get(&state.db, auth.org_id, pipeline_id)
        .await
        .map_err(|e| map_db_error(e, "pipeline lookup failed"))?;
    if pipeline.is_none() {
        return Err(ApiError::not_found("pipeline nao encontrado"));
    }

    let row = repo::pipelines::create_etapa(&state.db, auth.org_id, pipeline_id, &payload)
        .await
        .map_err(|e| map_db_error(e, "etapa create failed"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_etapa(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EtapaPayload>,
) -> Result<Json<EtapaRow>, ApiError> {
    let payload = validate_etapa(payload)?;
    let row = repo::pipelines::update_etapa(&state.db, auth.org_id, id, &payload)
        .await
        .map_err(|e| map_db_error(e, "etapa update failed"))?
        .ok_or_else(|| ApiError::not_found("etapa nao encontrada"))?;
    Ok(Json(row))
}

pub async fn delete_etapa(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let rows = repo::pipelines::delete_etapa(&state.db, auth.org_id, id)
        .await
        .map_err(|e| map_db_error(e, "etapa em uso por negocios"))?;
    if rows == 0 {
        return Err(ApiError::not_found("etapa nao encontrada"));
    }
    Ok(StatusCode::NO_CONTENT)
}
