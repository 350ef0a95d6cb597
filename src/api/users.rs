use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::errors::ApiError;
use crate::api::pagination::ListQuery;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::course::{CourseResponse, EnrollmentResponse};
use crate::schemas::quiz::QuizSubmissionResponse;
use crate::schemas::submission::SubmissionResponse;
use crate::schemas::user::{UserCreate, UserResponse, UserUpdate};
use crate::services::merge::Merge;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:user_id", get(get_user).patch(update_user).delete(delete_user))
        .route("/:user_id/courses", get(list_user_courses))
        .route("/:user_id/enrollments", get(list_user_enrollments))
        .route("/:user_id/submissions", get(list_user_submissions))
        .route("/:user_id/quiz-submissions", get(list_user_quiz_submissions))
}

fn parse_role(value: &str) -> Result<UserRole, ApiError> {
    UserRole::parse(value)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown role: {value}")))
}

async fn list_users(
    Query(params): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = repositories::users::list(state.db(), params.skip(), params.limit())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list users"))?;
    Ok(Json(users.into_iter().map(UserResponse::from_db).collect()))
}

async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let role = parse_role(&payload.role)?;
    let now = primitive_now_utc();

    let user = repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            username: &payload.username,
            email: &payload.email,
            full_name: &payload.full_name,
            role,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create user"))?;

    tracing::info!(user_id = user.id, role = user.role.as_str(), "Created user");
    Ok((StatusCode::CREATED, Json(UserResponse::from_db(user))))
}

async fn get_user(
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = repositories::users::find_by_id(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?
        .ok_or_else(|| ApiError::NotFound(format!("User not found: ID={user_id}")))?;
    Ok(Json(UserResponse::from_db(user)))
}

async fn update_user(
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = repositories::users::find_by_id(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?
        .ok_or_else(|| ApiError::NotFound(format!("User not found: ID={user_id}")))?;

    let role = payload.role.as_deref().map(parse_role).transpose()?;

    let mut next = user.clone();
    let mut merge = Merge::default();
    merge.field(&mut next.username, payload.username);
    merge.field(&mut next.email, payload.email);
    merge.field(&mut next.full_name, payload.full_name);
    merge.field(&mut next.role, role);

    if !merge.changed() {
        return Ok(Json(UserResponse::from_db(user)));
    }

    next.updated_at = primitive_now_utc();
    let updated = repositories::users::update(state.db(), &next)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update user"))?;

    tracing::info!(user_id, "Updated user");
    Ok(Json(UserResponse::from_db(updated)))
}

async fn delete_user(
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::users::delete(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete user"))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("User not found: ID={user_id}")));
    }
    tracing::info!(user_id, "Deleted user");
    Ok(StatusCode::NO_CONTENT)
}

async fn list_user_courses(
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    repositories::users::find_by_id(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?
        .ok_or_else(|| ApiError::NotFound(format!("User not found: ID={user_id}")))?;

    let courses = repositories::courses::list_by_user(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses for user"))?;
    Ok(Json(courses.into_iter().map(CourseResponse::from_db).collect()))
}

async fn list_user_enrollments(
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<EnrollmentResponse>>, ApiError> {
    let enrollments = repositories::enrollments::list_by_user(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list enrollments for user"))?;
    Ok(Json(enrollments.into_iter().map(EnrollmentResponse::from_db).collect()))
}

async fn list_user_submissions(
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let submissions = repositories::submissions::list_by_student(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list submissions for user"))?;
    Ok(Json(submissions.into_iter().map(SubmissionResponse::from_db).collect()))
}

async fn list_user_quiz_submissions(
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<QuizSubmissionResponse>>, ApiError> {
    let submissions = repositories::quiz_submissions::list_by_student(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list quiz attempts for user"))?;
    Ok(Json(submissions.into_iter().map(QuizSubmissionResponse::from_db).collect()))
}
