use sqlx::PgPool;

use crate::db::models::Assignment;

const ASSIGNMENT_COLUMNS: &str =
    "id, lesson_id, title, description, due_date, max_score, created_at, updated_at";

pub(crate) struct CreateAssignment<'a> {
    pub(crate) lesson_id: i64,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) due_date: Option<time::PrimitiveDateTime>,
    pub(crate) max_score: i32,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateAssignment<'_>,
) -> Result<Assignment, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "INSERT INTO assignments (
            lesson_id, title, description, due_date, max_score, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7)
         RETURNING {ASSIGNMENT_COLUMNS}",
    ))
    .bind(params.lesson_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.due_date)
    .bind(params.max_score)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    assignment_id: i64,
) -> Result<Option<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = $1",
    ))
    .bind(assignment_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list(
    pool: &PgPool,
    skip: i64,
    limit: i64,
) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "SELECT {ASSIGNMENT_COLUMNS} FROM assignments ORDER BY id OFFSET $1 LIMIT $2",
    ))
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_lesson(
    pool: &PgPool,
    lesson_id: i64,
) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE lesson_id = $1 ORDER BY id",
    ))
    .bind(lesson_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    assignment: &Assignment,
) -> Result<Assignment, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "UPDATE assignments SET
            lesson_id = $1, title = $2, description = $3, due_date = $4, max_score = $5,
            updated_at = $6
         WHERE id = $7
         RETURNING {ASSIGNMENT_COLUMNS}",
    ))
    .bind(assignment.lesson_id)
    .bind(&assignment.title)
    .bind(&assignment.description)
    .bind(assignment.due_date)
    .bind(assignment.max_score)
    .bind(assignment.updated_at)
    .bind(assignment.id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, assignment_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM assignments WHERE id = $1")
        .bind(assignment_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
