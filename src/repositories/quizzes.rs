use sqlx::PgPool;

use crate::db::models::Quiz;

const QUIZ_COLUMNS: &str = "id, module_id, title, time_limit_minutes, created_at, updated_at";

pub(crate) struct CreateQuiz<'a> {
    pub(crate) module_id: i64,
    pub(crate) title: &'a str,
    pub(crate) time_limit_minutes: Option<i32>,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateQuiz<'_>) -> Result<Quiz, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "INSERT INTO quizzes (module_id, title, time_limit_minutes, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {QUIZ_COLUMNS}",
    ))
    .bind(params.module_id)
    .bind(params.title)
    .bind(params.time_limit_minutes)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, quiz_id: i64) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1"))
        .bind(quiz_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(pool: &PgPool, skip: i64, limit: i64) -> Result<Vec<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "SELECT {QUIZ_COLUMNS} FROM quizzes ORDER BY id OFFSET $1 LIMIT $2",
    ))
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_module(
    pool: &PgPool,
    module_id: i64,
) -> Result<Vec<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "SELECT {QUIZ_COLUMNS} FROM quizzes WHERE module_id = $1 ORDER BY id",
    ))
    .bind(module_id)
    .fetch_all(pool)
    .await
}

/// Quizzes across all modules of a course.
pub(crate) async fn list_by_course(
    pool: &PgPool,
    course_id: i64,
) -> Result<Vec<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(
        "SELECT q.id, q.module_id, q.title, q.time_limit_minutes, q.created_at, q.updated_at
         FROM quizzes q
         JOIN modules m ON m.id = q.module_id
         WHERE m.course_id = $1
         ORDER BY q.id",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(pool: &PgPool, quiz: &Quiz) -> Result<Quiz, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "UPDATE quizzes SET module_id = $1, title = $2, time_limit_minutes = $3, updated_at = $4
         WHERE id = $5
         RETURNING {QUIZ_COLUMNS}",
    ))
    .bind(quiz.module_id)
    .bind(&quiz.title)
    .bind(quiz.time_limit_minutes)
    .bind(quiz.updated_at)
    .bind(quiz.id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, quiz_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
        .bind(quiz_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
