use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PipelineRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub nome: String,
    pub descricao: Option<String>,
    pub padrao: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct PipelinePayload {
    pub nome: String,
    pub descricao: Option<String>,
    #[serde(default)]
    pub padrao: bool,
}

#[derive(Debug, Serialize)]
pub struct PipelineDetail {
    #[serde(flatten)]
    pub pipeline: PipelineRow,
    pub etapas: Vec<EtapaRow>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct EtapaRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub pipeline_id: Uuid,
    pub nome: String,
    pub ordem: i32,
    pub probabilidade: i32,
    pub cor: Option<String>,
    pub ganho: bool,
    pub perdido: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct EtapaPayload {
    pub nome: String,
    pub ordem: Option<i32>,
    pub probabilidade: Option<i32>,
    pub cor: Option<String>,
    #[serde(default)]
    pub ganho: bool,
    #[serde(default)]
    pub perdido: bool,
}

#[derive(Debug, Deserialize)]
pub struct PipelineListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
