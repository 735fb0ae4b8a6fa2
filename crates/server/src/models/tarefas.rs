use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TarefaRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub negocio_id: Option<Uuid>,
    pub contato_id: Option<Uuid>,
    pub titulo: String,
    pub descricao: Option<String>,
    pub prioridade: String,
    pub status: String,
    pub data_vencimento: Option<DateTime<Utc>>,
    pub concluida_em: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct TarefaPayload {
    pub titulo: String,
    pub descricao: Option<String>,
    pub prioridade: Option<String>,
    pub status: Option<String>,
    pub data_vencimento: Option<DateTime<Utc>>,
    #[serde(default)]
    pub negocio_id: Option<Uuid>,
    #[serde(default)]
    pub contato_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct TarefaListQuery {
    pub status: Option<String>,
    pub negocio_id: Option<Uuid>,
    pub contato_id: Option<Uuid>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
