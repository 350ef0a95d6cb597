use sqlx::PgPool;

use crate::db::models::User;
use crate::db::types::UserRole;

const USER_COLUMNS: &str = "id, username, email, full_name, role, created_at, updated_at";

pub(crate) struct CreateUser<'a> {
    pub(crate) username: &'a str,
    pub(crate) email: &'a str,
    pub(crate) full_name: &'a str,
    pub(crate) role: UserRole,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (username, email, full_name, role, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {USER_COLUMNS}",
    ))
    .bind(params.username)
    .bind(params.email)
    .bind(params.full_name)
    .bind(params.role)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, user_id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(pool: &PgPool, skip: i64, limit: i64) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY id OFFSET $1 LIMIT $2",
    ))
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(pool: &PgPool, user: &User) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET
            username = $1, email = $2, full_name = $3, role = $4, updated_at = $5
         WHERE id = $6
         RETURNING {USER_COLUMNS}",
    ))
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.full_name)
    .bind(user.role)
    .bind(user.updated_at)
    .bind(user.id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, user_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
