use sqlx::PgPool;

use crate::db::models::Question;
use crate::db::types::QuestionType;

const QUESTION_COLUMNS: &str = "id, quiz_id, text, question_type, created_at, updated_at";

pub(crate) struct CreateQuestion<'a> {
    pub(crate) quiz_id: i64,
    pub(crate) text: &'a str,
    pub(crate) question_type: QuestionType,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateQuestion<'_>,
) -> Result<Question, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "INSERT INTO questions (quiz_id, text, question_type, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {QUESTION_COLUMNS}",
    ))
    .bind(params.quiz_id)
    .bind(params.text)
    .bind(params.question_type)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    question_id: i64,
) -> Result<Option<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1",
    ))
    .bind(question_id)
    .fetch_optional(pool)
    .await
}

/// Questions in insertion order; grading relies on this ordering.
pub(crate) async fn list_by_quiz(
    pool: &PgPool,
    quiz_id: i64,
) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE quiz_id = $1 ORDER BY id",
    ))
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(pool: &PgPool, question: &Question) -> Result<Question, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "UPDATE questions SET quiz_id = $1, text = $2, question_type = $3, updated_at = $4
         WHERE id = $5
         RETURNING {QUESTION_COLUMNS}",
    ))
    .bind(question.quiz_id)
    .bind(&question.text)
    .bind(question.question_type)
    .bind(question.updated_at)
    .bind(question.id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, question_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(question_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
