use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct NegocioRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub pipeline_id: Uuid,
    pub etapa_id: Uuid,
    pub contato_id: Option<Uuid>,
    pub empresa_id: Option<Uuid>,
    pub titulo: String,
    pub valor: Option<f64>,
    pub moeda: String,
    pub probabilidade: i32,
    pub origem: Option<String>,
    pub data_fechamento_prevista: Option<NaiveDate>,
    pub status: String,
    pub motivo_perda: Option<String>,
    pub fechado_em: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NegocioCreate {
    pub pipeline_id: Uuid,
    pub etapa_id: Option<Uuid>,
    pub contato_id: Option<Uuid>,
    pub empresa_id: Option<Uuid>,
    pub titulo: String,
    pub valor: Option<f64>,
    pub moeda: Option<String>,
    pub probabilidade: Option<i32>,
    pub origem: Option<String>,
    pub data_fechamento_prevista: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct NegocioUpdate {
    pub etapa_id: Uuid,
    pub contato_id: Option<Uuid>,
    pub empresa_id: Option<Uuid>,
    pub titulo: String,
    pub valor: Option<f64>,
    pub moeda: Option<String>,
    pub probabilidade: Option<i32>,
    pub origem: Option<String>,
    pub data_fechamento_prevista: Option<NaiveDate>,
    pub motivo_perda: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NegocioListQuery {
    pub pipeline_id: Option<Uuid>,
    pub etapa_id: Option<Uuid>,
    pub status: Option<String>,
    pub contato_id: Option<Uuid>,
    pub empresa_id: Option<Uuid>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ResumoQuery {
    pub pipeline_id: Option<Uuid>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct EtapaResumo {
    pub etapa_id: Uuid,
    pub quantidade: i64,
    pub valor_total: Option<f64>,
}
