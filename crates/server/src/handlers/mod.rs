mod auth;
mod calendario;
mod comunicacoes;
mod contatos;
mod docs;
mod empresas;
mod health;
mod negocios;
mod pipelines;
mod propostas;
mod tarefas;

use axum::routing::{delete, get, post, put};
use axum::{middleware, Router};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::require_session;
use crate::errors::{ApiError, FieldError};
use crate::repo;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/session", get(auth::session))
        .route("/api/auth/profile", put(auth::update_profile))
        .route("/api/crm/contatos", get(contatos::list_contatos))
        .route("/api/crm/contatos", post(contatos::create_contato))
        .route("/api/crm/contatos/:id", get(contatos::get_contato))
        .route("/api/crm/contatos/:id", put(contatos::update_contato))
        .route("/api/crm/contatos/:id", delete(contatos::delete_contato))
        .route("/api/crm/empresas", get(empresas::list_empresas))
        .route("/api/crm/empresas", post(empresas::create_empresa))
        .route("/api/crm/empresas/:id", get(empresas::get_empresa))
        .route("/api/crm/empresas/:id", put(empresas::update_empresa))
        .route("/api/crm/empresas/:id", delete(empresas::delete_empresa))
        .route("/api/crm/pipelines", get(pipelines::list_pipelines))
        .route("/api/crm/pipelines", post(pipelines::create_pipeline))
        .route("/api/crm/pipelines/:id", get(pipelines::get_pipeline))
        .route("/api/crm/pipelines/:id", put(pipelines::update_pipeline))
        .route("/api/crm/pipelines/:id", delete(pipelines::delete_pipeline))
        .route("/api/crm/pipelines/:id/etapas", get(pipelines::list_etapas))
        .route("/api/crm/pipelines/:id/etapas", post(pipelines::create_etapa))
        .route("/api/crm/etapas/:id", put(pipelines::update_etapa))
        .route("/api/crm/etapas/:id", delete(pipelines::delete_etapa))
        .route("/api/crm/negocios", get(negocios::list_negocios))
        .route("/api/crm/negocios", post(negocios::create_negocio))
        .route("/api/crm/negocios/resumo", get(negocios::resumo_negocios))
        .route("/api/crm/negocios/:id", get(negocios::get_negocio))
        .route("/api/crm/negocios/:id", put(negocios::update_negocio))
        .route("/api/crm/negocios/:id", delete(negocios::delete_negocio))
        .route("/api/crm/propostas", get(propostas::list_propostas))
        .route("/api/crm/propostas", post(propostas::create_proposta))
        .route("/api/crm/propostas/:id", get(propostas::get_proposta))
        .route("/api/crm/propostas/:id", put(propostas::update_proposta))
        .route("/api/crm/propostas/:id", delete(propostas::delete_proposta))
        .route("/api/crm/tarefas", get(tarefas::list_tarefas))
        .route("/api/crm/tarefas", post(tarefas::create_tarefa))
        .route("/api/crm/tarefas/:id", get(tarefas::get_tarefa))
        .route("/api/crm/tarefas/:id", put(tarefas::update_tarefa))
        .route("/api/crm/tarefas/:id", delete(tarefas::delete_tarefa))
        .route("/api/crm/calendario", get(calendario::list_eventos))
        .route("/api/crm/calendario", post(calendario::create_evento))
        .route("/api/crm/calendario/:id", get(calendario::get_evento))
        .route("/api/crm/calendario/:id", put(calendario::update_evento))
        .route("/api/crm/calendario/:id", delete(calendario::delete_evento))
        .route("/api/crm/comunicacoes", get(comunicacoes::list_comunicacoes))
        .route("/api/crm/comunicacoes", post(comunicacoes::create_comunicacao))
        .route("/api/crm/comunicacoes/:id", get(comunicacoes::get_comunicacao))
        .route("/api/crm/comunicacoes/:id", put(comunicacoes::update_comunicacao))
        .route("/api/crm/comunicacoes/:id", delete(comunicacoes::delete_comunicacao))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/health", get(health::health))
        .route("/openapi.json", get(docs::openapi))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .merge(protected)
        .with_state(state)
}

/// A supplied contato reference must resolve within the caller's org.
pub(crate) async fn ensure_contato_ref(
    state: &AppState,
    org_id: Uuid,
    contato_id: Option<Uuid>,
) -> Result<(), ApiError> {
    let Some(id) = contato_id else {
        return Ok(());
    };
    let found = repo::contatos::get(&state.db, org_id, id)
        .await
        .map_err(|e| {
            ApiError::new(axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    if found.is_none() {
        return Err(ApiError::validation(vec![FieldError::new(
            "contato_id",
            "contato nao encontrado",
        )]));
    }
    Ok(())
}

/// Same rule for negocio references.
pub(crate) async fn ensure_negocio_ref(
    state: &AppState,
    org_id: Uuid,
    negocio_id: Option<Uuid>,
) -> Result<(), ApiError> {
    let Some(id) = negocio_id else {
        return Ok(());
    };
    let found = repo::negocios::get(&state.db, org_id, id)
        .await
        .map_err(|e| {
            ApiError::new(axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    if found.is_none() {
        return Err(ApiError::validation(vec![FieldError::new(
            "negocio_id",
            "negocio nao encontrado",
        )]));
    }
    Ok(())
}

/// Same rule for empresa references.
pub(crate) async fn ensure_empresa_ref(
    state: &AppState,
    org_id: Uuid,
    empresa_id: Option<Uuid>,
) -> Result<(), ApiError> {
    let Some(id) = empresa_id else {
        return Ok(());
    };
    let found = repo::empresas::get(&state.db, org_id, id)
        .await
        .map_err(|e| {
            ApiError::new(axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    if found.is_none() {
        return Err(ApiError::validation(vec![FieldError::new(
            "empresa_id",
            "empresa nao encontrada",
        )]));
    }
    Ok(())
}
