use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::tarefas::{TarefaListQuery, TarefaPayload, TarefaRow};

const COLUMNS: &str = "id, org_id, negocio_id, contato_id, titulo, descricao, prioridade, \
                       status, data_vencimento, concluida_em, created_at, updated_at";

pub async fn list(
    pool: &PgPool,
    org_id: Uuid,
    query: &TarefaListQuery,
    limit: i64,
    offset: i64,
) -> Result<Vec<TarefaRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {COLUMNS} FROM tarefas WHERE org_id = "
    ));
    builder.push_bind(org_id);
    if let Some(status) = &query.status {
        builder.push(" AND status = ");
        builder.push_bind(status.trim().to_string());
    }
    if let Some(negocio_id) = query.negocio_id {
        builder.push(" AND negocio_id = ");
        builder.push_bind(negocio_id);
    }
    if let Some(contato_id) = query.contato_id {
        builder.push(" AND contato_id = ");
        builder.push_bind(contato_id);
    }
    builder.push(" ORDER BY data_vencimento ASC NULLS LAST, created_at DESC LIMIT ");
    builder.push_bind(limit);
    builder.push(" OFFSET ");
    builder.push_bind(offset);

    builder.build_query_as::<TarefaRow>().fetch_all(pool).await
}

pub async fn get(pool: &PgPool, org_id: Uuid, id: Uuid) -> Result<Option<TarefaRow>, sqlx::Error> {
    sqlx::query_as::<_, TarefaRow>(&format!(
        "SELECT {COLUMNS} FROM tarefas WHERE id = $1 AND org_id = $2"
    ))
    .bind(id)
    .bind(org_id)
    .fetch_optional(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    org_id: Uuid,
    data: &TarefaPayload,
    concluida_em: Option<DateTime<Utc>>,
) -> Result<TarefaRow, sqlx::Error> {
    sqlx::query_as::<_, TarefaRow>(&format!(
        "INSERT INTO tarefas (org_id, negocio_id, contato_id, titulo, descricao, prioridade, \
         status, data_vencimento, concluida_em) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING {COLUMNS}"
    ))
    .bind(org_id)
    .bind(data.negocio_id)
    .bind(data.contato_id)
    .bind(&data.titulo)
    .bind(&data.descricao)
    .bind(data.prioridade.as_deref().unwrap_or("media"))
    .bind(data.status.as_deref().unwrap_or("pendente"))
    .bind(data.data_vencimento)
    .bind(concluida_em)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    org_id: Uuid,
    id: Uuid,
    data: &TarefaPayload,
    concluida_em: Option<DateTime<Utc>>,
) -> Result<Option<TarefaRow>, sqlx::Error> {
    sqlx::query_as::<_, TarefaRow>(&format!(
        "UPDATE tarefas SET negocio_id = $3, contato_id = $4, titulo = $5, descricao = $6, \
         prioridade = $7, status = $8, data_vencimento = $9, concluida_em = $10, \
         updated_at = NOW() \
         WHERE id = $1 AND org_id = $2 \
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(org_id)
    .bind(data.negocio_id)
    .bind(data.contato_id)
    .bind(&data.titulo)
    .bind(&data.descricao)
    .bind(data.prioridade.as_deref().unwrap_or("media"))
    .bind(data.status.as_deref().unwrap_or("pendente"))
    .bind(data.data_vencimento)
    .bind(concluida_em)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, org_id: Uuid, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tarefas WHERE id = $1 AND org_id = $2")
        .bind(id)
        .bind(org_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
