use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::empresas::{EmpresaListQuery, EmpresaPayload, EmpresaRow};

const COLUMNS: &str = "id, org_id, nome, cnpj, site, setor, telefone, email, cidade, estado, \
                       notas, created_at, updated_at";

pub async fn list(
    pool: &PgPool,
    org_id: Uuid,
    query: &EmpresaListQuery,
    limit: i64,
    offset: i64,
) -> Result<Vec<EmpresaRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {COLUMNS} FROM empresas WHERE org_id = "
    ));
    builder.push_bind(org_id);
    if let Some(busca) = &query.busca {
        let pattern = format!("%{}%", busca.trim());
        builder.push(" AND (nome ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR cnpj ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
    builder.push(" ORDER BY nome LIMIT ");
    builder.push_bind(limit);
    builder.push(" OFFSET ");
    builder.push_bind(offset);

    builder.build_query_as::<EmpresaRow>().fetch_all(pool).await
}

pub async fn get(pool: &PgPool, org_id: Uuid, id: Uuid) -> Result<Option<EmpresaRow>, sqlx::Error> {
    sqlx::query_as::<_, EmpresaRow>(&format!(
        "SELECT {COLUMNS} FROM empresas WHERE id = $1 AND org_id = $2"
    ))
    .bind(id)
    .bind(org_id)
    .fetch_optional(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    org_id: Uuid,
    data: &EmpresaPayload,
) -> Result<EmpresaRow, sqlx::Error> {
    sqlx::query_as::<_, EmpresaRow>(&format!(
        "INSERT INTO empresas (org_id, nome, cnpj, site, setor, telefone, email, cidade, \
         estado, notas) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {COLUMNS}"
    ))
    .bind(org_id)
    .bind(&data.nome)
    .bind(&data.cnpj)
    .bind(&data.site)
    .bind(&data.setor)
    .bind(&data.telefone)
    .bind(&data.email)
    .bind(&data.cidade)
    .bind(&data.estado)
    .bind(&data.notas)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    org_id: Uuid,
    id: Uuid,
    data: &EmpresaPayload,
) -> Result<Option<EmpresaRow>, sqlx::Error> {
    sqlx::query_as::<_, EmpresaRow>(&format!(
        "UPDATE empresas SET nome = $3, cnpj = $4, site = $5, setor = $6, telefone = $7, \
         email = $8, cidade = $9, estado = $10, notas = $11, updated_at = NOW() \
         WHERE id = $1 AND org_id = $2 \
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(org_id)
    .bind(&data.nome)
    .bind(&data.cnpj)
    .bind(&data.site)
    .bind(&data.setor)
    .bind(&data.telefone)
    .bind(&data.email)
    .bind(&data.cidade)
    .bind(&data.estado)
    .bind(&data.notas)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, org_id: Uuid, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM empresas WHERE id = $1 AND org_id = $2")
        .bind(id)
        .bind(org_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
