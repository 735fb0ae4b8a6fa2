use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::negocios::{
    EtapaResumo, NegocioCreate, NegocioListQuery, NegocioRow, NegocioUpdate,
};

const COLUMNS: &str = "id, org_id, pipeline_id, etapa_id, contato_id, empresa_id, titulo, \
                       valor, moeda, probabilidade, origem, data_fechamento_prevista, status, \
                       motivo_perda, fechado_em, created_at, updated_at";

pub async fn list(
    pool: &PgPool,
    org_id: Uuid,
    query: &NegocioListQuery,
    limit: i64,
    offset: i64,
) -> Result<Vec<NegocioRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {COLUMNS} FROM negocios WHERE org_id = "
    ));
    builder.push_bind(org_id);
    if let Some(pipeline_id) = query.pipeline_id {
        builder.push(" AND pipeline_id = ");
        builder.push_bind(pipeline_id);
    }
    if let Some(etapa_id) = query.etapa_id {
        builder.push(" AND etapa_id = ");
        builder.push_bind(etapa_id);
    }
    if let Some(status) = &query.status {
        builder.push(" AND status = ");
        builder.push_bind(status.trim().to_string());
    }
    if let Some(contato_id) = query.contato_id {
        builder.push(" AND contato_id = ");
        builder.push_bind(contato_id);
    }
    if let Some(empresa_id) = query.empresa_id {
        builder.push(" AND empresa_id = ");
        builder.push_bind(empresa_id);
    }
    builder.push(" ORDER BY created_at DESC LIMIT ");
    builder.push_bind(limit);
    builder.push(" OFFSET ");
    builder.push_bind(offset);

    builder.build_query_as::<NegocioRow>().fetch_all(pool).await
}

pub async fn get(pool: &PgPool, org_id: Uuid, id: Uuid) -> Result<Option<NegocioRow>, sqlx::Error> {
    sqlx::query_as::<_, NegocioRow>(&format!(
        "SELECT {COLUMNS} FROM negocios WHERE id = $1 AND org_id = $2"
    ))
    .bind(id)
    .bind(org_id)
    .fetch_optional(pool)
    .await
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &PgPool,
    org_id: Uuid,
    data: &NegocioCreate,
    etapa_id: Uuid,
    probabilidade: i32,
    status: &str,
    fechado_em: Option<DateTime<Utc>>,
) -> Result<NegocioRow, sqlx::Error> {
    sqlx::query_as::<_, NegocioRow>(&format!(
        "INSERT INTO negocios (org_id, pipeline_id, etapa_id, contato_id, empresa_id, titulo, \
         valor, moeda, probabilidade, origem, data_fechamento_prevista, status, fechado_em) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         RETURNING {COLUMNS}"
    ))
    .bind(org_id)
    .bind(data.pipeline_id)
    .bind(etapa_id)
    .bind(data.contato_id)
    .bind(data.empresa_id)
    .bind(&data.titulo)
    .bind(data.valor)
    .bind(data.moeda.as_deref().unwrap_or("BRL"))
    .bind(probabilidade)
    .bind(&data.origem)
    .bind(data.data_fechamento_prevista)
    .bind(status)
    .bind(fechado_em)
    .fetch_one(pool)
    .await
}

#[allow(clippy::too_many_arguments)]
pub async fn update(
    pool: &PgPool,
    org_id: Uuid,
    id: Uuid,
    data: &NegocioUpdate,
    probabilidade: i32,
    status: &str,
    fechado_em: Option<DateTime<Utc>>,
) -> Result<Option<NegocioRow>, sqlx::Error> {
    sqlx::query_as::<_, NegocioRow>(&format!(
        "UPDATE negocios SET etapa_id = $3, contato_id = $4, empresa_id = $5, titulo = $6, \
         valor = $7, moeda = $8, probabilidade = $9, origem = $10, \
         data_fechamento_prevista = $11, status = $12, motivo_perda = $13, fechado_em = $14, \
         updated_at = NOW() \
         WHERE id = $1 AND org_id = $2 \
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(org_id)
    .bind(data.etapa_id)
    .bind(data.contato_id)
    .bind(data.empresa_id)
    .bind(&data.titulo)
    .bind(data.valor)
    .bind(data.moeda.as_deref().unwrap_or("BRL"))
    .bind(probabilidade)
    .bind(&data.origem)
    .bind(data.data_fechamento_prevista)
    .bind(status)
    .bind(&data.motivo_perda)
    .bind(fechado_em)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, org_id: Uuid, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM negocios WHERE id = $1 AND org_id = $2")
        .bind(id)
        .bind(org_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Per-etapa deal count and total value, in board order.
pub async fn resumo(
    pool: &PgPool,
    org_id: Uuid,
    pipeline_id: Option<Uuid>,
) -> Result<Vec<EtapaResumo>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT n.etapa_id, COUNT(*) AS quantidade, SUM(n.valor) AS valor_total \
         FROM negocios n JOIN etapas e ON e.id = n.etapa_id \
         WHERE n.org_id = ",
    );
    builder.push_bind(org_id);
    if let Some(pipeline_id) = pipeline_id {
        builder.push(" AND n.pipeline_id = ");
        builder.push_bind(pipeline_id);
    }
    builder.push(" GROUP BY n.etapa_id, e.ordem ORDER BY e.ordem");

    builder.build_query_as::<EtapaResumo>().fetch_all(pool).await
}
