use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::propostas::{PropostaCreate, PropostaListQuery, PropostaRow, PropostaUpdate};

const COLUMNS: &str =
    "id, org_id, negocio_id, titulo, valor, status, validade, conteudo, created_at, updated_at";

pub async fn list(
    pool: &PgPool,
    org_id: Uuid,
    query: &PropostaListQuery,
    limit: i64,
    offset: i64,
) -> Result<Vec<PropostaRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {COLUMNS} FROM propostas WHERE org_id = "
    ));
    builder.push_bind(org_id);
    if let Some(negocio_id) = query.negocio_id {
        builder.push(" AND negocio_id = ");
        builder.push_bind(negocio_id);
    }
    if let Some(status) = &query.status {
        builder.push(" AND status = ");
        builder.push_bind(status.trim().to_string());
    }
    builder.push(" ORDER BY created_at DESC LIMIT ");
    builder.push_bind(limit);
    builder.push(" OFFSET ");
    builder.push_bind(offset);

    builder.build_query_as::<PropostaRow>().fetch_all(pool).await
}

pub async fn get(
    pool: &PgPool,
    org_id: Uuid,
    id: Uuid,
) -> Result<Option<PropostaRow>, sqlx::Error> {
    sqlx::query_as::<_, PropostaRow>(&format!(
        "SELECT {COLUMNS} FROM propostas WHERE id = $1 AND org_id = $2"
    ))
    .bind(id)
    .bind(org_id)
    .fetch_optional(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    org_id: Uuid,
    data: &PropostaCreate,
) -> Result<PropostaRow, sqlx::Error> {
    sqlx::query_as::<_, PropostaRow>(&format!(
        "INSERT INTO propostas (org_id, negocio_id, titulo, valor, status, validade, conteudo) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {COLUMNS}"
    ))
    .bind(org_id)
    .bind(data.negocio_id)
    .bind(&data.titulo)
    .bind(data.valor)
    .bind(data.status.as_deref().unwrap_or("rascunho"))
    .bind(data.validade)
    .bind(&data.conteudo)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    org_id: Uuid,
    id: Uuid,
    data: &PropostaUpdate,
) -> Result<Option<PropostaRow>, sqlx::Error> {
    sqlx::query_as::<_, PropostaRow>(&format!(
        "UPDATE propostas SET titulo = $3, valor = $4, status = $5, validade = $6, \
         conteudo = $7, updated_at = NOW() \
         WHERE id = $1 AND org_id = $2 \
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(org_id)
    .bind(&data.titulo)
    .bind(data.valor)
    .bind(data.status.as_deref().unwrap_or("rascunho"))
    .bind(data.validade)
    .bind(&data.conteudo)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, org_id: Uuid, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM propostas WHERE id = $1 AND org_id = $2")
        .bind(id)
        .bind(org_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
