use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ContatoRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub empresa_id: Option<Uuid>,
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub celular: Option<String>,
    pub cargo: Option<String>,
    pub origem: Option<String>,
    pub status: String,
    pub notas: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ContatoPayload {
    pub nome: String,
    #[serde(default)]
    pub empresa_id: Option<Uuid>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub celular: Option<String>,
    pub cargo: Option<String>,
    pub origem: Option<String>,
    pub status: Option<String>,
    pub notas: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContatoListQuery {
    pub empresa_id: Option<Uuid>,
    pub status: Option<String>,
    pub busca: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
