use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ComunicacaoRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub contato_id: Option<Uuid>,
    pub negocio_id: Option<Uuid>,
    pub tipo: String,
    pub direcao: String,
    pub assunto: Option<String>,
    pub conteudo: String,
    pub ocorrida_em: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ComunicacaoPayload {
    pub tipo: String,
    pub direcao: Option<String>,
    pub assunto: Option<String>,
    pub conteudo: String,
    #[serde(default)]
    pub contato_id: Option<Uuid>,
    #[serde(default)]
    pub negocio_id: Option<Uuid>,
    pub ocorrida_em: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ComunicacaoListQuery {
    pub contato_id: Option<Uuid>,
    pub negocio_id: Option<Uuid>,
    pub tipo: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
