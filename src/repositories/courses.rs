use sqlx::PgPool;
use time::Date;

use crate::db::models::Course;

const COURSE_COLUMNS: &str =
    "id, title, description, teacher_id, category_id, start_date, duration_days, \
     created_at, updated_at";

pub(crate) struct CreateCourse<'a> {
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) teacher_id: i64,
    pub(crate) category_id: i64,
    pub(crate) start_date: Option<Date>,
    pub(crate) duration_days: Option<i32>,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateCourse<'_>) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (
            title, description, teacher_id, category_id, start_date, duration_days,
            created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
         RETURNING {COURSE_COLUMNS}",
    ))
    .bind(params.title)
    .bind(params.description)
    .bind(params.teacher_id)
    .bind(params.category_id)
    .bind(params.start_date)
    .bind(params.duration_days)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    course_id: i64,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
        .bind(course_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(pool: &PgPool, skip: i64, limit: i64) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses ORDER BY id OFFSET $1 LIMIT $2",
    ))
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Courses a user is enrolled in.
pub(crate) async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT c.id, c.title, c.description, c.teacher_id, c.category_id, c.start_date,
                c.duration_days, c.created_at, c.updated_at
         FROM courses c
         JOIN enrollments e ON e.course_id = c.id
         WHERE e.user_id = $1
         ORDER BY c.id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(pool: &PgPool, course: &Course) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "UPDATE courses SET
            title = $1, description = $2, teacher_id = $3, category_id = $4,
            start_date = $5, duration_days = $6, updated_at = $7
         WHERE id = $8
         RETURNING {COURSE_COLUMNS}",
    ))
    .bind(&course.title)
    .bind(&course.description)
    .bind(course.teacher_id)
    .bind(course.category_id)
    .bind(course.start_date)
    .bind(course.duration_days)
    .bind(course.updated_at)
    .bind(course.id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, course_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE id = $1")
        .bind(course_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
