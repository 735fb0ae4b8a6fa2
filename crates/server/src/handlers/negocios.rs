use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::AuthSession;
use crate::errors::{map_db_error, ApiError, FieldError};
use crate::handlers::{ensure_contato_ref, ensure_empresa_ref};
use crate::models::negocios::{
    EtapaResumo, NegocioCreate, NegocioListQuery, NegocioRow, NegocioUpdate, ResumoQuery,
};
use crate::models::pipelines::EtapaRow;
use crate::repo;
use crate::retry::with_db_retry;
use crate::validate::{page_params, Validator};

/// A negocio parked on a ganho/perdido etapa is closed; anywhere else it
/// is open. `previous` keeps the original closing instant when the deal
/// stays closed across edits.
fn status_for_etapa(
    etapa: &EtapaRow,
    previous: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> (&'static str, Option<DateTime<Utc>>) {
    if etapa.ganho {
        ("ganho", previous.or(Some(now)))
    } else if etapa.perdido {
        ("perdido", previous.or(Some(now)))
    } else {
        ("aberto", None)
    }
}

async fn resolve_etapa(
    state: &AppState,
    org_id: Uuid,
    pipeline_id: Uuid,
    etapa_id: Option<Uuid>,
) -> Result<EtapaRow, ApiError> {
    let etapa = match etapa_id {
        Some(id) => repo::pipelines::get_etapa(&state.db, org_id, id)
            .await
            .map_err(|e| map_db_error(e, "etapa lookup failed"))?
            .filter(|etapa| etapa.pipeline_id == pipeline_id)
            .ok_or_else(|| {
                ApiError::validation(vec![FieldError::new(
                    "etapa_id",
                    "etapa nao pertence ao pipeline",
                )])
            })?,
        None => repo::pipelines::first_etapa(&state.db, org_id, pipeline_id)
            .await
            .map_err(|e| map_db_error(e, "etapa lookup failed"))?
            .ok_or_else(|| {
                ApiError::validation(vec![FieldError::new(
                    "pipeline_id",
                    "pipeline nao possui etapas",
                )])
            })?,
    };
    Ok(etapa)
}

pub async fn list_negocios(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Query(query): Query<NegocioListQuery>,
) -> Result<Json<Vec<NegocioRow>>, ApiError> {
    let (limit, offset) = page_params(query.limit, query.offset);
    let rows = with_db_retry(&state.retry, || {
        repo::negocios::list(&state.db, auth.org_id, &query, limit, offset)
    })
    .await
    .map_err(|e| map_db_error(e, "negocio list failed"))?;
    Ok(Json(rows))
}

pub async fn resumo_negocios(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Query(query): Query<ResumoQuery>,
) -> Result<Json<Vec<EtapaResumo>>, ApiError> {
    let rows = with_db_retry(&state.retry, || {
        repo::negocios::resumo(&state.db, auth.org_id, query.pipeline_id)
    })
    .await
    .map_err(|e| map_db_error(e, "negocio resumo failed"))?;
    Ok(Json(rows))
}

pub async fn get_negocio(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<NegocioRow>, ApiError> {
    let row = with_db_retry(&state.retry, || {
        repo::negocios::get(&state.db, auth.org_id, id)
    })
    .await
    .map_err(|e| map_db_error(e, "negocio lookup failed"))?
    .ok_or_else(|| ApiError::not_found("negocio nao encontrado"))?;
    Ok(Json(row))
}

pub async fn create_negocio(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(payload): Json<NegocioCreate>,
) -> Result<(StatusCode, Json<NegocioRow>), ApiError> {
    let mut v = Validator::new();
    let titulo = v.require("titulo", &payload.titulo);
    if let Some(probabilidade) = payload.probabilidade {
        v.range_0_100("probabilidade", probabilidade);
    }
    if let Some(valor) = payload.valor {
        v.check(valor >= 0.0, "valor", "deve ser maior ou igual a zero");
    }
    let origem = v.optional(payload.origem.as_deref());
    let moeda = v.optional(payload.moeda.as_deref());
    v.finish()?;

    let pipeline = repo::pipelines::get(&state.db, auth.org_id, payload.pipeline_id)
        .await
        .map_err(|e| map_db_error(e, "pipeline lookup failed"))?;
    if pipeline.is_none() {
        return Err(ApiError::validation(vec![FieldError::new(
            "pipeline_id",
            "pipeline nao encontrado",
        )]));
    }
    ensure_contato_ref(&state, auth.org_id, payload.contato_id).await?;
    ensure_empresa_ref(&state, auth.org_id, payload.empresa_id).await?;

    let etapa = resolve_etapa(&state, auth.org_id, payload.pipeline_id, payload.etapa_id).await?;
    let probabilidade = payload.probabilidade.unwrap_or(etapa.probabilidade);
    let (status, fechado_em) = status_for_etapa(&etapa, None, Utc::now());

    let data = NegocioCreate {
        titulo,
        origem,
        moeda,
        ..payload
    };
    let row = repo::negocios::create(
        &state.db,
        auth.org_id,
        &data,
        etapa.id,
        probabilidade,
        status,
        fechado_em,
    )
    .await
    .map_err(|e| map_db_error(e, "negocio create failed"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_negocio(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NegocioUpdate>,
) -> Result<Json<NegocioRow>, ApiError> {
    let mut v = Validator::new();
    let titulo = v.require("titulo", &payload.titulo);
    if let Some(probabilidade) = payload.probabilidade {
        v.range_0_100("probabilidade", probabilidade);
    }
    if let Some(valor) = payload.valor {
        v.check(valor >= 0.0, "valor", "deve ser maior ou igual a zero");
    }
    let origem = v.optional(payload.origem.as_deref());
    let moeda = v.optional(payload.moeda.as_deref());
    let motivo_perda = v.optional(payload.motivo_perda.as_deref());
    v.finish()?;

    let existing = repo::negocios::get(&state.db, auth.org_id, id)
        .await
        .map_err(|e| map_db_error(e, "negocio lookup failed"))?
        .ok_or_else(|| ApiError::not_found("negocio nao encontrado"))?;

    ensure_contato_ref(&state, auth.org_id, payload.contato_id).await?;
    ensure_empresa_ref(&state, auth.org_id, payload.empresa_id).await?;

    let etapa = resolve_etapa(
        &state,
        auth.org_id,
        existing.pipeline_id,
        Some(payload.etapa_id),
    )
    .await?;
    let probabilidade = payload.probabilidade.unwrap_or(etapa.probabilidade);
    let (status, fechado_em) = status_for_etapa(&etapa, existing.fechado_em, Utc::now());
    let motivo_perda = if status == "perdido" { motivo_perda } else { None };

    let data = NegocioUpdate {
        titulo,
        origem,
        moeda,
        motivo_perda,
        ..payload
    };
    let row = repo::negocios::update(
        &state.db,
        auth.org_id,
        id,
        &data,
        probabilidade,
        status,
        fechado_em,
    )
    .await
    .map_err(|e| map_db_error(e, "negocio update failed"))?
    .ok_or_else(|| ApiError::not_found("negocio nao encontrado"))?;
    Ok(Json(row))
}

pub async fn delete_negocio(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let rows = repo::negocios::delete(&state.db, auth.org_id, id)
        .await
        .map_err(|e| map_db_error(e, "negocio delete failed"))?;
    if rows == 0 {
        return Err(ApiError::not_found("negocio nao encontrado"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn etapa(ganho: bool, perdido: bool) -> EtapaRow {
        EtapaRow {
            id: Uuid::new_v4(),
            org_id: Uuid::new_v4(),
            pipeline_id: Uuid::new_v4(),
            nome: "Fechamento".to_string(),
            ordem: 3,
            probabilidade: 90,
            cor: None,
            ganho,
            perdido,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn open_etapa_clears_closing() {
        let now = Utc::now();
        let (status, fechado_em) = status_for_etapa(&etapa(false, false), Some(now), now);
        assert_eq!(status, "aberto");
        assert!(fechado_em.is_none());
    }

    #[test]
    fn winning_etapa_stamps_now() {
        let now = Utc::now();
        let (status, fechado_em) = status_for_etapa(&etapa(true, false), None, now);
        assert_eq!(status, "ganho");
        assert_eq!(fechado_em, Some(now));
    }

    #[test]
    fn closed_deal_keeps_original_instant() {
        let antes = Utc::now() - chrono::Duration::days(2);
        let now = Utc::now();
        let (status, fechado_em) = status_for_etapa(&etapa(false, true), Some(antes), now);
        assert_eq!(status, "perdido");
        assert_eq!(fechado_em, Some(antes));
    }
}
