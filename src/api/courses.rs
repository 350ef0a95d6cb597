use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use time::Date;

use crate::api::errors::ApiError;
use crate::api::pagination::ListQuery;
use crate::core::state::AppState;
use crate::core::time::{parse_date, primitive_now_utc};
use crate::repositories;
use crate::schemas::course::{
    CourseCreate, CourseResponse, CourseUpdate, EnrollmentResponse, ReviewCreate, ReviewResponse,
    ReviewUpdate,
};
use crate::schemas::content::ModuleResponse;
use crate::schemas::quiz::{QuizResponse, QuizSubmissionResponse};
use crate::schemas::user::UserResponse;
use crate::services::course::{self, CoursePatch, NewCourse};
use crate::services::enrollment;
use crate::services::merge::Merge;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/:course_id", get(get_course).patch(update_course).delete(delete_course))
        .route("/:course_id/students", get(list_students))
        .route("/:course_id/modules", get(list_course_modules))
        .route("/:course_id/quizzes", get(list_course_quizzes))
        .route("/:course_id/quiz-submissions", get(list_course_quiz_submissions))
        .route("/:course_id/enrollments", get(list_enrollments))
        .route(
            "/:course_id/enrollments/:user_id",
            get(get_enrollment).post(enroll).delete(unenroll),
        )
        .route("/:course_id/enrollments/:user_id/status", get(enrollment_status))
        .route("/:course_id/reviews", get(list_reviews).post(create_review))
}

/// Standalone review router; creation hangs off the course.
pub(crate) fn reviews_router() -> Router<AppState> {
    Router::new()
        .route("/:review_id", get(get_review).patch(update_review).delete(delete_review))
}

fn parse_start_date(value: &str) -> Result<Date, ApiError> {
    parse_date(value)
        .map_err(|_| ApiError::BadRequest(format!("Invalid start_date (want YYYY-MM-DD): {value}")))
}

fn validate_rating(rating: i32) -> Result<(), ApiError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("Rating must be between 1 and 5, got {rating}")))
    }
}

async fn list_courses(
    Query(params): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = repositories::courses::list(state.db(), params.skip(), params.limit())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;
    Ok(Json(courses.into_iter().map(CourseResponse::from_db).collect()))
}

async fn create_course(
    State(state): State<AppState>,
    Json(payload): Json<CourseCreate>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    let start_date = payload.start_date.as_deref().map(parse_start_date).transpose()?;

    let created = course::create_course(
        state.db(),
        NewCourse {
            title: payload.title,
            description: payload.description,
            teacher_id: payload.teacher_id,
            category_id: payload.category_id,
            start_date,
            duration_days: payload.duration_days,
            created_at: primitive_now_utc(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(CourseResponse::from_db(created))))
}

async fn get_course(
    Path(course_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<CourseResponse>, ApiError> {
    let found = repositories::courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Course not found: ID={course_id}")))?;
    Ok(Json(CourseResponse::from_db(found)))
}

async fn update_course(
    Path(course_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<CourseUpdate>,
) -> Result<Json<CourseResponse>, ApiError> {
    let start_date = payload.start_date.as_deref().map(parse_start_date).transpose()?;

    let (updated, _) = course::update_course(
        state.db(),
        course_id,
        CoursePatch {
            title: payload.title,
            description: payload.description,
            teacher_id: payload.teacher_id,
            category_id: payload.category_id,
            start_date,
            duration_days: payload.duration_days,
        },
        primitive_now_utc(),
    )
    .await?;

    Ok(Json(CourseResponse::from_db(updated)))
}

async fn delete_course(
    Path(course_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::courses::delete(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete course"))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Course not found: ID={course_id}")));
    }
    tracing::info!(course_id, "Deleted course");
    Ok(StatusCode::NO_CONTENT)
}

async fn list_students(
    Path(course_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    repositories::courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Course not found: ID={course_id}")))?;

    let students = repositories::enrollments::students_by_course(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list students"))?;
    Ok(Json(students.into_iter().map(UserResponse::from_db).collect()))
}

async fn list_course_modules(
    Path(course_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ModuleResponse>>, ApiError> {
    let modules = repositories::modules::list_by_course(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list modules"))?;
    Ok(Json(modules.into_iter().map(ModuleResponse::from_db).collect()))
}

async fn list_course_quizzes(
    Path(course_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<QuizResponse>>, ApiError> {
    let quizzes = repositories::quizzes::list_by_course(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list quizzes"))?;
    Ok(Json(quizzes.into_iter().map(QuizResponse::from_db).collect()))
}

async fn list_course_quiz_submissions(
    Path(course_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<QuizSubmissionResponse>>, ApiError> {
    let submissions = repositories::quiz_submissions::list_by_course(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list quiz attempts"))?;
    Ok(Json(submissions.into_iter().map(QuizSubmissionResponse::from_db).collect()))
}

async fn list_enrollments(
    Path(course_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<EnrollmentResponse>>, ApiError> {
    let enrollments = repositories::enrollments::list_by_course(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list enrollments"))?;
    Ok(Json(enrollments.into_iter().map(EnrollmentResponse::from_db).collect()))
}

async fn get_enrollment(
    Path((course_id, user_id)): Path<(i64, i64)>,
    State(state): State<AppState>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let found = repositories::enrollments::find_by_user_course(state.db(), user_id, course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch enrollment"))?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "Enrollment not found for User ID={user_id} and Course ID={course_id}"
            ))
        })?;
    Ok(Json(EnrollmentResponse::from_db(found)))
}

async fn enrollment_status(
    Path((course_id, user_id)): Path<(i64, i64)>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let enrolled = enrollment::is_enrolled(state.db(), user_id, course_id).await?;
    Ok(Json(serde_json::json!({ "enrolled": enrolled })))
}

async fn enroll(
    Path((course_id, user_id)): Path<(i64, i64)>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), ApiError> {
    let enrollment =
        enrollment::enroll(state.db(), user_id, course_id, primitive_now_utc()).await?;
    Ok((StatusCode::CREATED, Json(EnrollmentResponse::from_db(enrollment))))
}

async fn unenroll(
    Path((course_id, user_id)): Path<(i64, i64)>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    enrollment::unenroll(state.db(), user_id, course_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_reviews(
    Path(course_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    let reviews = repositories::course_reviews::list_by_course(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list reviews"))?;
    Ok(Json(reviews.into_iter().map(ReviewResponse::from_db).collect()))
}

async fn create_review(
    Path(course_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<ReviewCreate>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiError> {
    validate_rating(payload.rating)?;

    repositories::courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Course not found: ID={course_id}")))?;
    repositories::users::find_by_id(state.db(), payload.user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?
        .ok_or_else(|| ApiError::NotFound(format!("User not found: ID={}", payload.user_id)))?;

    let review = repositories::course_reviews::create(
        state.db(),
        repositories::course_reviews::CreateCourseReview {
            course_id,
            user_id: payload.user_id,
            rating: payload.rating,
            comment: payload.comment.as_deref(),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create review"))?;

    tracing::info!(review_id = review.id, course_id, "Created review");
    Ok((StatusCode::CREATED, Json(ReviewResponse::from_db(review))))
}

async fn get_review(
    Path(review_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let review = repositories::course_reviews::find_by_id(state.db(), review_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch review"))?
        .ok_or_else(|| ApiError::NotFound(format!("CourseReview not found: ID={review_id}")))?;
    Ok(Json(ReviewResponse::from_db(review)))
}

async fn update_review(
    Path(review_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<ReviewUpdate>,
) -> Result<Json<ReviewResponse>, ApiError> {
    if let Some(rating) = payload.rating {
        validate_rating(rating)?;
    }

    let review = repositories::course_reviews::find_by_id(state.db(), review_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch review"))?
        .ok_or_else(|| ApiError::NotFound(format!("CourseReview not found: ID={review_id}")))?;

    let mut next = review.clone();
    let mut merge = Merge::default();
    merge.field(&mut next.rating, payload.rating);
    merge.nullable(&mut next.comment, payload.comment);

    if !merge.changed() {
        return Ok(Json(ReviewResponse::from_db(review)));
    }

    let updated = repositories::course_reviews::update(state.db(), &next)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update review"))?;
    Ok(Json(ReviewResponse::from_db(updated)))
}

async fn delete_review(
    Path(review_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::course_reviews::delete(state.db(), review_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete review"))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("CourseReview not found: ID={review_id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}
