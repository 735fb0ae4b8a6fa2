use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct EventoRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub titulo: String,
    pub descricao: Option<String>,
    pub inicio: DateTime<Utc>,
    pub fim: DateTime<Utc>,
    pub local: Option<String>,
    pub contato_id: Option<Uuid>,
    pub negocio_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct EventoPayload {
    pub titulo: String,
    pub descricao: Option<String>,
    pub inicio: DateTime<Utc>,
    pub fim: DateTime<Utc>,
    pub local: Option<String>,
    #[serde(default)]
    pub contato_id: Option<Uuid>,
    #[serde(default)]
    pub negocio_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct EventoListQuery {
    pub de: Option<DateTime<Utc>>,
    pub ate: Option<DateTime<Utc>>,
    pub negocio_id: Option<Uuid>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
