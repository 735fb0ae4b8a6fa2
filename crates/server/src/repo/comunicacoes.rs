use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::comunicacoes::{ComunicacaoListQuery, ComunicacaoPayload, ComunicacaoRow};

const COLUMNS: &str = "id, org_id, contato_id, negocio_id, tipo, direcao, assunto, conteudo, \
                       ocorrida_em, created_at";

pub async fn list(
    pool: &PgPool,
    org_id: Uuid,
    query: &ComunicacaoListQuery,
    limit: i64,
    offset: i64,
) -> Result<Vec<ComunicacaoRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {COLUMNS} FROM comunicacoes WHERE org_id = "
    ));
    builder.push_bind(org_id);
    if let Some(contato_id) = query.contato_id {
        builder.push(" AND contato_id = ");
        builder.push_bind(contato_id);
    }
    if let Some(negocio_id) = query.negocio_id {
        builder.push(" AND negocio_id = ");
        builder.push_bind(negocio_id);
    }
    if let Some(tipo) = &query.tipo {
        builder.push(" AND tipo = ");
        builder.push_bind(tipo.trim().to_string());
    }
    builder.push(" ORDER BY ocorrida_em DESC LIMIT ");
    builder.push_bind(limit);
    builder.push(" OFFSET ");
    builder.push_bind(offset);

    builder
        .build_query_as::<ComunicacaoRow>()
        .fetch_all(pool)
        .await
}

pub async fn get(
    pool: &PgPool,
    org_id: Uuid,
    id: Uuid,
) -> Result<Option<ComunicacaoRow>, sqlx::Error> {
    sqlx::query_as::<_, ComunicacaoRow>(&format!(
        "SELECT {COLUMNS} FROM comunicacoes WHERE id = $1 AND org_id = $2"
    ))
    .bind(id)
    .bind(org_id)
    .fetch_optional(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    org_id: Uuid,
    data: &ComunicacaoPayload,
    ocorrida_em: DateTime<Utc>,
) -> Result<ComunicacaoRow, sqlx::Error> {
    sqlx::query_as::<_, ComunicacaoRow>(&format!(
        "INSERT INTO comunicacoes (org_id, contato_id, negocio_id, tipo, direcao, assunto, \
         conteudo, ocorrida_em) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING {COLUMNS}"
    ))
    .bind(org_id)
    .bind(data.contato_id)
    .bind(data.negocio_id)
    .bind(&data.tipo)
    .bind(data.direcao.as_deref().unwrap_or("saida"))
    .bind(&data.assunto)
    .bind(&data.conteudo)
    .bind(ocorrida_em)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    org_id: Uuid,
    id: Uuid,
    data: &ComunicacaoPayload,
    ocorrida_em: DateTime<Utc>,
) -> Result<Option<ComunicacaoRow>, sqlx::Error> {
    sqlx::query_as::<_, ComunicacaoRow>(&format!(
        "UPDATE comunicacoes SET contato_id = $3, negocio_id = $4, tipo = $5, direcao = $6, \
         assunto = $7, conteudo = $8, ocorrida_em = $9 \
         WHERE id = $1 AND org_id = $2 \
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(org_id)
    .bind(data.contato_id)
    .bind(data.negocio_id)
    .bind(&data.tipo)
    .bind(data.direcao.as_deref().unwrap_or("saida"))
    .bind(&data.assunto)
    .bind(&data.conteudo)
    .bind(ocorrida_em)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, org_id: Uuid, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comunicacoes WHERE id = $1 AND org_id = $2")
        .bind(id)
        .bind(org_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
