use sqlx::PgPool;
use uuid::Uuid;

use crate::models::auth::{OrgRow, UserRow};

const USER_COLUMNS: &str = "id, org_id, email, nome, cargo, created_at, updated_at";
const ORG_COLUMNS: &str = "id, nome, created_at";

pub async fn find_credentials(
    pool: &PgPool,
    email: &str,
) -> Result<Option<(Uuid, String)>, sqlx::Error> {
    sqlx::query_as::<_, (Uuid, String)>("SELECT id, password_hash FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn get_org(pool: &PgPool, org_id: Uuid) -> Result<Option<OrgRow>, sqlx::Error> {
    sqlx::query_as::<_, OrgRow>(&format!("SELECT {ORG_COLUMNS} FROM orgs WHERE id = $1"))
        .bind(org_id)
        .fetch_optional(pool)
        .await
}

/// Creates the org and its first user atomically.
pub async fn register(
    pool: &PgPool,
    org_nome: &str,
    nome: &str,
    email: &str,
    cargo: Option<&str>,
    password_hash: &str,
) -> Result<(UserRow, OrgRow), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let org = sqlx::query_as::<_, OrgRow>(&format!(
        "INSERT INTO orgs (nome) VALUES ($1) RETURNING {ORG_COLUMNS}"
    ))
    .bind(org_nome)
    .fetch_one(&mut *tx)
    .await?;

    let user = sqlx::query_as::<_, UserRow>(&format!(
        "INSERT INTO users (org_id, email, nome, cargo, password_hash) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {USER_COLUMNS}"
    ))
    .bind(org.id)
    .bind(email)
    .bind(nome)
    .bind(cargo)
    .bind(password_hash)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok((user, org))
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    nome: &str,
    cargo: Option<&str>,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(&format!(
        "UPDATE users SET nome = $2, cargo = $3, updated_at = NOW() WHERE id = $1 \
         RETURNING {USER_COLUMNS}"
    ))
    .bind(user_id)
    .bind(nome)
    .bind(cargo)
    .fetch_optional(pool)
    .await
}
