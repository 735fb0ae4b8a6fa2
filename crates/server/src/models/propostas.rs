use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PropostaRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub negocio_id: Uuid,
    pub titulo: String,
    pub valor: Option<f64>,
    pub status: String,
    pub validade: Option<NaiveDate>,
    pub conteudo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct PropostaCreate {
    pub negocio_id: Uuid,
    pub titulo: String,
    pub valor: Option<f64>,
    pub status: Option<String>,
    pub validade: Option<NaiveDate>,
    pub conteudo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PropostaUpdate {
    pub titulo: String,
    pub valor: Option<f64>,
    pub status: Option<String>,
    pub validade: Option<NaiveDate>,
    pub conteudo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PropostaListQuery {
    pub negocio_id: Option<Uuid>,
    pub status: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
