use sqlx::PgPool;

use crate::db::models::AnswerOption;

const OPTION_COLUMNS: &str = "id, question_id, text, is_correct, created_at";

pub(crate) struct CreateAnswerOption<'a> {
    pub(crate) question_id: i64,
    pub(crate) text: &'a str,
    pub(crate) is_correct: bool,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateAnswerOption<'_>,
) -> Result<AnswerOption, sqlx::Error> {
    sqlx::query_as::<_, AnswerOption>(&format!(
        "INSERT INTO answer_options (question_id, text, is_correct, created_at)
         VALUES ($1,$2,$3,$4)
         RETURNING {OPTION_COLUMNS}",
    ))
    .bind(params.question_id)
    .bind(params.text)
    .bind(params.is_correct)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    option_id: i64,
) -> Result<Option<AnswerOption>, sqlx::Error> {
    sqlx::query_as::<_, AnswerOption>(&format!(
        "SELECT {OPTION_COLUMNS} FROM answer_options WHERE id = $1",
    ))
    .bind(option_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_question(
    pool: &PgPool,
    question_id: i64,
) -> Result<Vec<AnswerOption>, sqlx::Error> {
    sqlx::query_as::<_, AnswerOption>(&format!(
        "SELECT {OPTION_COLUMNS} FROM answer_options WHERE question_id = $1 ORDER BY id",
    ))
    .bind(question_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    option: &AnswerOption,
) -> Result<AnswerOption, sqlx::Error> {
    sqlx::query_as::<_, AnswerOption>(&format!(
        "UPDATE answer_options SET question_id = $1, text = $2, is_correct = $3
         WHERE id = $4
         RETURNING {OPTION_COLUMNS}",
    ))
    .bind(option.question_id)
    .bind(&option.text)
    .bind(option.is_correct)
    .bind(option.id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, option_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM answer_options WHERE id = $1")
        .bind(option_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
