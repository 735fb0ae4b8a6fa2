use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::calendario::{EventoListQuery, EventoPayload, EventoRow};

const COLUMNS: &str = "id, org_id, titulo, descricao, inicio, fim, local, contato_id, \
                       negocio_id, created_at, updated_at";

pub async fn list(
    pool: &PgPool,
    org_id: Uuid,
    query: &EventoListQuery,
    limit: i64,
    offset: i64,
) -> Result<Vec<EventoRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {COLUMNS} FROM eventos WHERE org_id = "
    ));
    builder.push_bind(org_id);
    if let Some(de) = query.de {
        builder.push(" AND fim >= ");
        builder.push_bind(de);
    }
    if let Some(ate) = query.ate {
        builder.push(" AND inicio <= ");
        builder.push_bind(ate);
    }
    if let Some(negocio_id) = query.negocio_id {
        builder.push(" AND negocio_id = ");
        builder.push_bind(negocio_id);
    }
    builder.push(" ORDER BY inicio LIMIT ");
    builder.push_bind(limit);
    builder.push(" OFFSET ");
    builder.push_bind(offset);

    builder.build_query_as::<EventoRow>().fetch_all(pool).await
}

pub async fn get(pool: &PgPool, org_id: Uuid, id: Uuid) -> Result<Option<EventoRow>, sqlx::Error> {
    sqlx::query_as::<_, EventoRow>(&format!(
        "SELECT {COLUMNS} FROM eventos WHERE id = $1 AND org_id = $2"
    ))
    .bind(id)
    .bind(org_id)
    .fetch_optional(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    org_id: Uuid,
    data: &EventoPayload,
) -> Result<EventoRow, sqlx::Error> {
    sqlx::query_as::<_, EventoRow>(&format!(
        "INSERT INTO eventos (org_id, titulo, descricao, inicio, fim, local, contato_id, \
         negocio_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING {COLUMNS}"
    ))
    .bind(org_id)
    .bind(&data.titulo)
    .bind(&data.descricao)
    .bind(data.inicio)
    .bind(data.fim)
    .bind(&data.local)
    .bind(data.contato_id)
    .bind(data.negocio_id)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    org_id: Uuid,
    id: Uuid,
    data: &EventoPayload,
) -> Result<Option<EventoRow>, sqlx::Error> {
    sqlx::query_as::<_, EventoRow>(&format!(
        "UPDATE eventos SET titulo = $3, descricao = $4, inicio = $5, fim = $6, local = $7, \
         contato_id = $8, negocio_id = $9, updated_at = NOW() \
         WHERE id = $1 AND org_id = $2 \
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(org_id)
    .bind(&data.titulo)
    .bind(&data.descricao)
    .bind(data.inicio)
    .bind(data.fim)
    .bind(&data.local)
    .bind(data.contato_id)
    .bind(data.negocio_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, org_id: Uuid, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM eventos WHERE id = $1 AND org_id = $2")
        .bind(id)
        .bind(org_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
