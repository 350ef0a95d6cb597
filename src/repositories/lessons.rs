use sqlx::PgPool;

use crate::db::models::Lesson;

const LESSON_COLUMNS: &str = "id, module_id, title, content, order_index, created_at, updated_at";

pub(crate) struct CreateLesson<'a> {
    pub(crate) module_id: i64,
    pub(crate) title: &'a str,
    pub(crate) content: &'a str,
    pub(crate) order_index: i32,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateLesson<'_>) -> Result<Lesson, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "INSERT INTO lessons (module_id, title, content, order_index, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {LESSON_COLUMNS}",
    ))
    .bind(params.module_id)
    .bind(params.title)
    .bind(params.content)
    .bind(params.order_index)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    lesson_id: i64,
) -> Result<Option<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE id = $1"))
        .bind(lesson_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(pool: &PgPool, skip: i64, limit: i64) -> Result<Vec<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "SELECT {LESSON_COLUMNS} FROM lessons ORDER BY id OFFSET $1 LIMIT $2",
    ))
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_module(
    pool: &PgPool,
    module_id: i64,
) -> Result<Vec<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "SELECT {LESSON_COLUMNS} FROM lessons WHERE module_id = $1 ORDER BY order_index, id",
    ))
    .bind(module_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(pool: &PgPool, lesson: &Lesson) -> Result<Lesson, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "UPDATE lessons SET
            module_id = $1, title = $2, content = $3, order_index = $4, updated_at = $5
         WHERE id = $6
         RETURNING {LESSON_COLUMNS}",
    ))
    .bind(lesson.module_id)
    .bind(&lesson.title)
    .bind(&lesson.content)
    .bind(lesson.order_index)
    .bind(lesson.updated_at)
    .bind(lesson.id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, lesson_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
        .bind(lesson_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
