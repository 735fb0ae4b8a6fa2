use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct EmpresaRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub nome: String,
    pub cnpj: Option<String>,
    pub site: Option<String>,
    pub setor: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub notas: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct EmpresaPayload {
    pub nome: String,
    pub cnpj: Option<String>,
    pub site: Option<String>,
    pub setor: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub notas: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmpresaListQuery {
    pub busca: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
