use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::AuthSession;
use crate::errors::{map_db_error, ApiError};
use crate::models::contatos::ContatoPayload;
use crate::models::empresas::{EmpresaListQuery, EmpresaPayload, EmpresaRow};
use crate::repo;
use crate::retry::with_db_retry;
use crate::validate::{page_params, Validator};

fn validate_empresa(payload: EmpresaPayload) -> Result<EmpresaPayload, ApiError> {
    let mut v = Validator::new();
    let nome = v.require("nome", &payload.nome);
    let cnpj = v.optional(payload.cnpj.as_deref());
    let site = v.optional(payload.site.as_deref());
    let setor = v.optional(payload.setor.as_deref());
    let telefone = v.optional(payload.telefone.as_deref());
    let email = v.optional_email("email", payload.email.as_deref());
    let cidade = v.optional(payload.cidade.as_deref());
    let estado = v.optional(payload.estado.as_deref());
    let notas = v.optional(payload.notas.as_deref());
    v.finish()?;

    Ok(EmpresaPayload {
        nome,
        cnpj,
        site,
        setor,
        telefone,
        email,
        cidade,
        estado,
        notas,
    })
}

pub async fn list_empresas(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Query(query): Query<EmpresaListQuery>,
) -> Result<Json<Vec<EmpresaRow>>, ApiError> {
    let (limit, offset) = page_params(query.limit, query.offset);
    let rows = with_db_retry(&state.retry, || {
        repo::empresas::list(&state.db, auth.org_id, &query, limit, offset)
    })
    .await
    .map_err(|e| map_db_error(e, "empresa list failed"))?;
    Ok(Json(rows))
}

pub async fn get_empresa(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmpresaRow>, ApiError> {
    let row = with_db_retry(&state.retry, || {
        repo::empresas::get(&state.db, auth.org_id, id)
    })
    .await
    .map_err(|e| map_db_error(e, "empresa lookup failed"))?
    .ok_or_else(|| ApiError::not_found("empresa nao encontrada"))?;
    Ok(Json(row))
}

pub async fn create_empresa(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(payload): Json<EmpresaPayload>,
) -> Result<(StatusCode, Json<EmpresaRow>), ApiError> {
    let payload = validate_empresa(payload)?;

    let row = repo::empresas::create(&state.db, auth.org_id, &payload)
        .await
        .map_err(|e| map_db_error(e, "empresa create failed"))?;

    provision_primary_contato(&state, auth.org_id, &row).await;

    Ok((StatusCode::CREATED, Json(row)))
}

/// Every empresa gets a primary contato carrying its own name and reach
/// data, unless one already exists.
async fn provision_primary_contato(state: &AppState, org_id: Uuid, empresa: &EmpresaRow) {
    let has_contato =
        match repo::contatos::exists_for_empresa(&state.db, org_id, empresa.id).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(empresa_id = %empresa.id, error = %e, "contato provisioning check failed");
                return;
            }
        };
    if has_contato {
        return;
    }

    let contato = ContatoPayload {
        nome: empresa.nome.clone(),
        empresa_id: Some(empresa.id),
        email: empresa.email.clone(),
        telefone: empresa.telefone.clone(),
        celular: None,
        cargo: None,
        origem: Some("empresa".to_string()),
        status: Some("ativo".to_string()),
        notas: None,
    };
    if let Err(e) = repo::contatos::create(&state.db, org_id, &contato).await {
        tracing::warn!(empresa_id = %empresa.id, error = %e, "contato provisioning failed");
    }
}

pub async fn update_empresa(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EmpresaPayload>,
) -> Result<Json<EmpresaRow>, ApiError> {
    let payload = validate_empresa(payload)?;

    let row = repo::empresas::update(&state.db, auth.org_id, id, &payload)
        .await
        .map_err(|e| map_db_error(e, "empresa update failed"))?
        .ok_or_else(|| ApiError::not_found("empresa nao encontrada"))?;
    Ok(Json(row))
}

pub async fn delete_empresa(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let rows = repo::empresas::delete(&state.db, auth.org_id, id)
        .await
        .map_err(|e| map_db_error(e, "empresa delete failed"))?;
    if rows == 0 {
        return Err(ApiError::not_found("empresa nao encontrada"));
    }
    Ok(StatusCode::NO_CONTENT)
}
