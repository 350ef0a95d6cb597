use sqlx::PgPool;

use crate::db::models::{Enrollment, User};
use crate::db::types::EnrollmentStatus;

const ENROLLMENT_COLUMNS: &str = "id, user_id, course_id, enroll_date, status";

pub(crate) struct CreateEnrollment {
    pub(crate) user_id: i64,
    pub(crate) course_id: i64,
    pub(crate) enroll_date: time::PrimitiveDateTime,
    pub(crate) status: EnrollmentStatus,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateEnrollment,
) -> Result<Enrollment, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "INSERT INTO enrollments (user_id, course_id, enroll_date, status)
         VALUES ($1,$2,$3,$4)
         RETURNING {ENROLLMENT_COLUMNS}",
    ))
    .bind(params.user_id)
    .bind(params.course_id)
    .bind(params.enroll_date)
    .bind(params.status)
    .fetch_one(pool)
    .await
}

pub(crate) async fn exists(
    pool: &PgPool,
    user_id: i64,
    course_id: i64,
) -> Result<bool, sqlx::Error> {
    let found: Option<i32> = sqlx::query_scalar(
        "SELECT 1 FROM enrollments WHERE user_id = $1 AND course_id = $2",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(pool)
    .await?;
    Ok(found.is_some())
}

pub(crate) async fn find_by_user_course(
    pool: &PgPool,
    user_id: i64,
    course_id: i64,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE user_id = $1 AND course_id = $2",
    ))
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_user(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE user_id = $1 ORDER BY id",
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_course(
    pool: &PgPool,
    course_id: i64,
) -> Result<Vec<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE course_id = $1 ORDER BY id",
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

/// Users currently enrolled in a course.
pub(crate) async fn students_by_course(
    pool: &PgPool,
    course_id: i64,
) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT u.id, u.username, u.email, u.full_name, u.role, u.created_at, u.updated_at
         FROM users u
         JOIN enrollments e ON e.user_id = u.id
         WHERE e.course_id = $1
         ORDER BY u.id",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, enrollment_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM enrollments WHERE id = $1")
        .bind(enrollment_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
