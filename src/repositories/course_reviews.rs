use sqlx::PgPool;

use crate::db::models::CourseReview;

const REVIEW_COLUMNS: &str = "id, course_id, user_id, rating, comment, created_at";

pub(crate) struct CreateCourseReview<'a> {
    pub(crate) course_id: i64,
    pub(crate) user_id: i64,
    pub(crate) rating: i32,
    pub(crate) comment: Option<&'a str>,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateCourseReview<'_>,
) -> Result<CourseReview, sqlx::Error> {
    sqlx::query_as::<_, CourseReview>(&format!(
        "INSERT INTO course_reviews (course_id, user_id, rating, comment, created_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {REVIEW_COLUMNS}",
    ))
    .bind(params.course_id)
    .bind(params.user_id)
    .bind(params.rating)
    .bind(params.comment)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    review_id: i64,
) -> Result<Option<CourseReview>, sqlx::Error> {
    sqlx::query_as::<_, CourseReview>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM course_reviews WHERE id = $1",
    ))
    .bind(review_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_course(
    pool: &PgPool,
    course_id: i64,
) -> Result<Vec<CourseReview>, sqlx::Error> {
    sqlx::query_as::<_, CourseReview>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM course_reviews WHERE course_id = $1 ORDER BY id",
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    review: &CourseReview,
) -> Result<CourseReview, sqlx::Error> {
    sqlx::query_as::<_, CourseReview>(&format!(
        "UPDATE course_reviews SET rating = $1, comment = $2 WHERE id = $3
         RETURNING {REVIEW_COLUMNS}",
    ))
    .bind(review.rating)
    .bind(&review.comment)
    .bind(review.id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, review_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM course_reviews WHERE id = $1")
        .bind(review_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
