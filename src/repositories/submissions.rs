use sqlx::PgPool;

use crate::db::models::Submission;

const SUBMISSION_COLUMNS: &str =
    "id, assignment_id, student_id, content, submitted_at, score, feedback";

pub(crate) struct CreateSubmission<'a> {
    pub(crate) assignment_id: i64,
    pub(crate) student_id: i64,
    pub(crate) content: &'a str,
    pub(crate) submitted_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateSubmission<'_>,
) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "INSERT INTO submissions (assignment_id, student_id, content, submitted_at)
         VALUES ($1,$2,$3,$4)
         RETURNING {SUBMISSION_COLUMNS}",
    ))
    .bind(params.assignment_id)
    .bind(params.student_id)
    .bind(params.content)
    .bind(params.submitted_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn exists(
    pool: &PgPool,
    student_id: i64,
    assignment_id: i64,
) -> Result<bool, sqlx::Error> {
    let found: Option<i32> = sqlx::query_scalar(
        "SELECT 1 FROM submissions WHERE student_id = $1 AND assignment_id = $2",
    )
    .bind(student_id)
    .bind(assignment_id)
    .fetch_optional(pool)
    .await?;
    Ok(found.is_some())
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    submission_id: i64,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = $1",
    ))
    .bind(submission_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list(
    pool: &PgPool,
    skip: i64,
    limit: i64,
) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions ORDER BY id OFFSET $1 LIMIT $2",
    ))
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_assignment(
    pool: &PgPool,
    assignment_id: i64,
) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE assignment_id = $1 ORDER BY id",
    ))
    .bind(assignment_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_student(
    pool: &PgPool,
    student_id: i64,
) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE student_id = $1 ORDER BY id",
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    submission: &Submission,
) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "UPDATE submissions SET
            assignment_id = $1, student_id = $2, content = $3, score = $4, feedback = $5
         WHERE id = $6
         RETURNING {SUBMISSION_COLUMNS}",
    ))
    .bind(submission.assignment_id)
    .bind(submission.student_id)
    .bind(&submission.content)
    .bind(submission.score)
    .bind(&submission.feedback)
    .bind(submission.id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, submission_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM submissions WHERE id = $1")
        .bind(submission_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
