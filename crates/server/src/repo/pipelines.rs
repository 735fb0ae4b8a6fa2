use sqlx::PgPool;
use uuid::Uuid;

use crate::models::pipelines::{EtapaPayload, EtapaRow, PipelinePayload, PipelineRow};

const PIPELINE_COLUMNS: &str = "id, org_id, nome, descricao, padrao, created_at, updated_at";
const ETAPA_COLUMNS: &str =
    "id, org_id, pipeline_id, nome, ordem, probabilidade, cor, ganho, perdido, created_at";

pub async fn list(
    pool: &PgPool,
    org_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PipelineRow>, sqlx::Error> {
    sqlx::query_as::<_, PipelineRow>(&format!(
        "SELECT {PIPELINE_COLUMNS} FROM pipelines WHERE org_id = $1 \
         ORDER BY padrao DESC, nome LIMIT $2 OFFSET $3"
    ))
    .bind(org_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn get(
    pool: &PgPool,
    org_id: Uuid,
    id: Uuid,
) -> Result<Option<PipelineRow>, sqlx::Error> {
    sqlx::query_as::<_, PipelineRow>(&format!(
        "SELECT {PIPELINE_COLUMNS} FROM pipelines WHERE id = $1 AND org_id = $2"
    ))
    .bind(id)
    .bind(org_id)
    .fetch_optional(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    org_id: Uuid,
    data: &PipelinePayload,
) -> Result<PipelineRow, sqlx::Error> {
    sqlx::query_as::<_, PipelineRow>(&format!(
        "INSERT INTO pipelines (org_id, nome, descricao, padrao) VALUES ($1, $2, $3, $4) \
         RETURNING {PIPELINE_COLUMNS}"
    ))
    .bind(org_id)
    .bind(&data.nome)
    .bind(&data.descricao)
    .bind(data.padrao)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    org_id: Uuid,
    id: Uuid,
    data: &PipelinePayload,
) -> Result<Option<PipelineRow>, sqlx::Error> {
    sqlx::query_as::<_, PipelineRow>(&format!(
        "UPDATE pipelines SET nome = $3, descricao = $4, padrao = $5, updated_at = NOW() \
         WHERE id = $1 AND org_id = $2 \
         RETURNING {PIPELINE_COLUMNS}"
    ))
    .bind(id)
    .bind(org_id)
    .bind(&data.nome)
    .bind(&data.descricao)
    .bind(data.padrao)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, org_id: Uuid, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM pipelines WHERE id = $1 AND org_id = $2")
        .bind(id)
        .bind(org_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn list_etapas(
    pool: &PgPool,
    org_id: Uuid,
    pipeline_id: Uuid,
) -> Result<Vec<EtapaRow>, sqlx::Error> {
    sqlx::query_as::<_, EtapaRow>(&format!(
        "SELECT {ETAPA_COLUMNS} FROM etapas WHERE pipeline_id = $1 AND org_id = $2 \
         ORDER BY ordem, nome"
    ))
    .bind(pipeline_id)
    .bind(org_id)
    .fetch_all(pool)
    .await
}

pub async fn get_etapa(
    pool: &PgPool,
    org_id: Uuid,
    id: Uuid,
) -> Result<Option<EtapaRow>, sqlx::Error> {
    sqlx::query_as::<_, EtapaRow>(&format!(
        "SELECT {ETAPA_COLUMNS} FROM etapas WHERE id = $1 AND org_id = $2"
    ))
    .bind(id)
    .bind(org_id)
    .fetch_optional(pool)
    .await
}

/// First etapa of a pipeline in board order; deals land here when no
/// etapa is given at creation.
pub async fn first_etapa(
    pool: &PgPool,
    org_id: Uuid,
    pipeline_id: Uuid,
) -> Result<Option<EtapaRow>, sqlx::Error> {
    sqlx::query_as::<_, EtapaRow>(&format!(
        "SELECT {ETAPA_COLUMNS} FROM etapas WHERE pipeline_id = $1 AND org_id = $2 \
         ORDER BY ordem, nome LIMIT 1"
    ))
    .bind(pipeline_id)
    .bind(org_id)
    .fetch_optional(pool)
    .await
}

pub async fn create_etapa(
    pool: &PgPool,
    org_id: Uuid,
    pipeline_id: Uuid,
    data: &EtapaPayload,
) -> Result<EtapaRow, sqlx::Error> {
    sqlx::query_as::<_, EtapaRow>(&format!(
        "INSERT INTO etapas (org_id, pipeline_id, nome, ordem, probabilidade, cor, ganho, perdido) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING {ETAPA_COLUMNS}"
    ))
    .bind(org_id)
    .bind(pipeline_id)
    .bind(&data.nome)
    .bind(data.ordem.unwrap_or(0))
    .bind(data.probabilidade.unwrap_or(0))
    .bind(&data.cor)
    .bind(data.ganho)
    .bind(data.perdido)
    .fetch_one(pool)
    .await
}

pub async fn update_etapa(
    pool: &PgPool,
    org_id: Uuid,
    id: Uuid,
    data: &EtapaPayload,
) -> Result<Option<EtapaRow>, sqlx::Error> {
    sqlx::query_as::<_, EtapaRow>(&format!(
        "UPDATE etapas SET nome = $3, ordem = $4, probabilidade = $5, cor = $6, ganho = $7, \
         perdido = $8 \
         WHERE id = $1 AND org_id = $2 \
         RETURNING {ETAPA_COLUMNS}"
    ))
    .bind(id)
    .bind(org_id)
    .bind(&data.nome)
    .bind(data.ordem.unwrap_or(0))
    .bind(data.probabilidade.unwrap_or(0))
    .bind(&data.cor)
    .bind(data.ganho)
    .bind(data.perdido)
    .fetch_optional(pool)
    .await
}

pub async fn delete_etapa(pool: &PgPool, org_id: Uuid, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM etapas WHERE id = $1 AND org_id = $2")
        .bind(id)
        .bind(org_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
