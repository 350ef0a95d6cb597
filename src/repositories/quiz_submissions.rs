use sqlx::PgPool;

use crate::db::models::QuizSubmission;

const QUIZ_SUBMISSION_COLUMNS: &str = "id, quiz_id, student_id, score, taken_at";

pub(crate) struct CreateQuizSubmission {
    pub(crate) quiz_id: i64,
    pub(crate) student_id: i64,
    pub(crate) score: i32,
    pub(crate) taken_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateQuizSubmission,
) -> Result<QuizSubmission, sqlx::Error> {
    sqlx::query_as::<_, QuizSubmission>(&format!(
        "INSERT INTO quiz_submissions (quiz_id, student_id, score, taken_at)
         VALUES ($1,$2,$3,$4)
         RETURNING {QUIZ_SUBMISSION_COLUMNS}",
    ))
    .bind(params.quiz_id)
    .bind(params.student_id)
    .bind(params.score)
    .bind(params.taken_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    submission_id: i64,
) -> Result<Option<QuizSubmission>, sqlx::Error> {
    sqlx::query_as::<_, QuizSubmission>(&format!(
        "SELECT {QUIZ_SUBMISSION_COLUMNS} FROM quiz_submissions WHERE id = $1",
    ))
    .bind(submission_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list(
    pool: &PgPool,
    skip: i64,
    limit: i64,
) -> Result<Vec<QuizSubmission>, sqlx::Error> {
    sqlx::query_as::<_, QuizSubmission>(&format!(
        "SELECT {QUIZ_SUBMISSION_COLUMNS} FROM quiz_submissions ORDER BY id OFFSET $1 LIMIT $2",
    ))
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_quiz(
    pool: &PgPool,
    quiz_id: i64,
) -> Result<Vec<QuizSubmission>, sqlx::Error> {
    sqlx::query_as::<_, QuizSubmission>(&format!(
        "SELECT {QUIZ_SUBMISSION_COLUMNS} FROM quiz_submissions WHERE quiz_id = $1 ORDER BY id",
    ))
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_student(
    pool: &PgPool,
    student_id: i64,
) -> Result<Vec<QuizSubmission>, sqlx::Error> {
    sqlx::query_as::<_, QuizSubmission>(&format!(
        "SELECT {QUIZ_SUBMISSION_COLUMNS} FROM quiz_submissions WHERE student_id = $1 ORDER BY id",
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

/// Attempts across all quizzes of a course.
pub(crate) async fn list_by_course(
    pool: &PgPool,
    course_id: i64,
) -> Result<Vec<QuizSubmission>, sqlx::Error> {
    sqlx::query_as::<_, QuizSubmission>(
        "SELECT s.id, s.quiz_id, s.student_id, s.score, s.taken_at
         FROM quiz_submissions s
         JOIN quizzes q ON q.id = s.quiz_id
         JOIN modules m ON m.id = q.module_id
         WHERE m.course_id = $1
         ORDER BY s.id",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    submission: &QuizSubmission,
) -> Result<QuizSubmission, sqlx::Error> {
    sqlx::query_as::<_, QuizSubmission>(&format!(
        "UPDATE quiz_submissions SET quiz_id = $1, student_id = $2, score = $3, taken_at = $4
         WHERE id = $5
         RETURNING {QUIZ_SUBMISSION_COLUMNS}",
    ))
    .bind(submission.quiz_id)
    .bind(submission.student_id)
    .bind(submission.score)
    .bind(submission.taken_at)
    .bind(submission.id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, submission_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM quiz_submissions WHERE id = $1")
        .bind(submission_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
