use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::contatos::{ContatoListQuery, ContatoPayload, ContatoRow};

const COLUMNS: &str = "id, org_id, empresa_id, nome, email, telefone, celular, cargo, origem, \
                       status, notas, created_at, updated_at";

pub async fn list(
    pool: &PgPool,
    org_id: Uuid,
    query: &ContatoListQuery,
    limit: i64,
    offset: i64,
) -> Result<Vec<ContatoRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {COLUMNS} FROM contatos WHERE org_id = "
    ));
    builder.push_bind(org_id);
    if let Some(empresa_id) = query.empresa_id {
        builder.push(" AND empresa_id = ");
        builder.push_bind(empresa_id);
    }
    if let Some(status) = &query.status {
        builder.push(" AND status = ");
        builder.push_bind(status.trim().to_string());
    }
    if let Some(busca) = &query.busca {
        let pattern = format!("%{}%", busca.trim());
        builder.push(" AND (nome ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR email ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
    builder.push(" ORDER BY nome LIMIT ");
    builder.push_bind(limit);
    builder.push(" OFFSET ");
    builder.push_bind(offset);

    builder.build_query_as::<ContatoRow>().fetch_all(pool).await
}

pub async fn get(pool: &PgPool, org_id: Uuid, id: Uuid) -> Result<Option<ContatoRow>, sqlx::Error> {
    sqlx::query_as::<_, ContatoRow>(&format!(
        "SELECT {COLUMNS} FROM contatos WHERE id = $1 AND org_id = $2"
    ))
    .bind(id)
    .bind(org_id)
    .fetch_optional(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    org_id: Uuid,
    data: &ContatoPayload,
) -> Result<ContatoRow, sqlx::Error> {
    sqlx::query_as::<_, ContatoRow>(&format!(
        "INSERT INTO contatos (org_id, empresa_id, nome, email, telefone, celular, cargo, \
         origem, status, notas) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {COLUMNS}"
    ))
    .bind(org_id)
    .bind(data.empresa_id)
    .bind(&data.nome)
    .bind(&data.email)
    .bind(&data.telefone)
    .bind(&data.celular)
    .bind(&data.cargo)
    .bind(&data.origem)
    .bind(data.status.as_deref().unwrap_or("ativo"))
    .bind(&data.notas)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    org_id: Uuid,
    id: Uuid,
    data: &ContatoPayload,
) -> Result<Option<ContatoRow>, sqlx::Error> {
    sqlx::query_as::<_, ContatoRow>(&format!(
        "UPDATE contatos SET empresa_id = $3, nome = $4, email = $5, telefone = $6, \
         celular = $7, cargo = $8, origem = $9, status = $10, notas = $11, updated_at = NOW() \
         WHERE id = $1 AND org_id = $2 \
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(org_id)
    .bind(data.empresa_id)
    .bind(&data.nome)
    .bind(&data.email)
    .bind(&data.telefone)
    .bind(&data.celular)
    .bind(&data.cargo)
    .bind(&data.origem)
    .bind(data.status.as_deref().unwrap_or("ativo"))
    .bind(&data.notas)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, org_id: Uuid, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM contatos WHERE id = $1 AND org_id = $2")
        .bind(id)
        .bind(org_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn exists_for_empresa(
    pool: &PgPool,
    org_id: Uuid,
    empresa_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let found: Option<i32> = sqlx::query_scalar(
        "SELECT 1 FROM contatos WHERE org_id = $1 AND empresa_id = $2 LIMIT 1",
    )
    .bind(org_id)
    .bind(empresa_id)
    .fetch_optional(pool)
    .await?;
    Ok(found.is_some())
}
