use sqlx::PgPool;

use crate::db::models::Tag;

pub(crate) async fn create(pool: &PgPool, name: &str) -> Result<Tag, sqlx::Error> {
    sqlx::query_as::<_, Tag>("INSERT INTO tags (name) VALUES ($1) RETURNING id, name")
        .bind(name)
        .fetch_one(pool)
        .await
}

pub(crate) async fn find_by_id(pool: &PgPool, tag_id: i64) -> Result<Option<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE id = $1")
        .bind(tag_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(pool: &PgPool, skip: i64, limit: i64) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY id OFFSET $1 LIMIT $2")
        .bind(skip)
        .bind(limit)
        .fetch_all(pool)
        .await
}

pub(crate) async fn update(pool: &PgPool, tag: &Tag) -> Result<Tag, sqlx::Error> {
    sqlx::query_as::<_, Tag>("UPDATE tags SET name = $1 WHERE id = $2 RETURNING id, name")
        .bind(&tag.name)
        .bind(tag.id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn delete(pool: &PgPool, tag_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tags WHERE id = $1").bind(tag_id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
