//! Modules, lessons, and assignments: the course content hierarchy.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use time::PrimitiveDateTime;

use crate::api::errors::ApiError;
use crate::api::pagination::ListQuery;
use crate::core::state::AppState;
use crate::core::time::{parse_datetime, primitive_now_utc};
use crate::repositories;
use crate::schemas::content::{
    AssignmentCreate, AssignmentResponse, AssignmentUpdate, LessonCreate, LessonResponse,
    LessonUpdate, ModuleCreate, ModuleResponse, ModuleUpdate,
};
use crate::schemas::quiz::QuizResponse;
use crate::schemas::submission::{SubmissionCreate, SubmissionResponse};
use crate::services::merge::Merge;
use crate::services::submission;

const DEFAULT_MAX_SCORE: i32 = 100;

pub(crate) fn modules_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_modules).post(create_module))
        .route("/:module_id", get(get_module).patch(update_module).delete(delete_module))
        .route("/:module_id/lessons", get(list_module_lessons))
        .route("/:module_id/quizzes", get(list_module_quizzes))
}

pub(crate) fn lessons_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_lessons).post(create_lesson))
        .route("/:lesson_id", get(get_lesson).patch(update_lesson).delete(delete_lesson))
        .route("/:lesson_id/assignments", get(list_lesson_assignments))
}

pub(crate) fn assignments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assignments).post(create_assignment))
        .route(
            "/:assignment_id",
            get(get_assignment).patch(update_assignment).delete(delete_assignment),
        )
        .route(
            "/:assignment_id/submissions",
            get(list_assignment_submissions).post(submit_assignment),
        )
}

fn parse_due_date(value: &str) -> Result<PrimitiveDateTime, ApiError> {
    parse_datetime(value)
        .map_err(|_| ApiError::BadRequest(format!("Invalid due_date (want RFC 3339): {value}")))
}

async fn list_modules(
    Query(params): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ModuleResponse>>, ApiError> {
    let modules = repositories::modules::list(state.db(), params.skip(), params.limit())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list modules"))?;
    Ok(Json(modules.into_iter().map(ModuleResponse::from_db).collect()))
}

async fn create_module(
    State(state): State<AppState>,
    Json(payload): Json<ModuleCreate>,
) -> Result<(StatusCode, Json<ModuleResponse>), ApiError> {
    repositories::courses::find_by_id(state.db(), payload.course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Course not found: ID={}", payload.course_id))
        })?;

    let now = primitive_now_utc();
    let module = repositories::modules::create(
        state.db(),
        repositories::modules::CreateModule {
            course_id: payload.course_id,
            title: &payload.title,
            order_index: payload.order_index,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create module"))?;

    tracing::info!(module_id = module.id, course_id = module.course_id, "Created module");
    Ok((StatusCode::CREATED, Json(ModuleResponse::from_db(module))))
}

async fn get_module(
    Path(module_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ModuleResponse>, ApiError> {
    let module = repositories::modules::find_by_id(state.db(), module_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch module"))?
        .ok_or_else(|| ApiError::NotFound(format!("Module not found: ID={module_id}")))?;
    Ok(Json(ModuleResponse::from_db(module)))
}

async fn update_module(
    Path(module_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<ModuleUpdate>,
) -> Result<Json<ModuleResponse>, ApiError> {
    let module = repositories::modules::find_by_id(state.db(), module_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch module"))?
        .ok_or_else(|| ApiError::NotFound(format!("Module not found: ID={module_id}")))?;

    let mut next = module.clone();
    let mut merge = Merge::default();

    if let Some(course_id) = payload.course_id {
        if course_id != next.course_id {
            repositories::courses::find_by_id(state.db(), course_id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
                .ok_or_else(|| ApiError::NotFound(format!("Course not found: ID={course_id}")))?;
            next.course_id = course_id;
            merge.mark_changed();
        }
    }
    merge.field(&mut next.title, payload.title);
    merge.field(&mut next.order_index, payload.order_index);

    if !merge.changed() {
        return Ok(Json(ModuleResponse::from_db(module)));
    }

    next.updated_at = primitive_now_utc();
    let updated = repositories::modules::update(state.db(), &next)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update module"))?;
    Ok(Json(ModuleResponse::from_db(updated)))
}

async fn delete_module(
    Path(module_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::modules::delete(state.db(), module_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete module"))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Module not found: ID={module_id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_module_lessons(
    Path(module_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<LessonResponse>>, ApiError> {
    let lessons = repositories::lessons::list_by_module(state.db(), module_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list lessons"))?;
    Ok(Json(lessons.into_iter().map(LessonResponse::from_db).collect()))
}

async fn list_module_quizzes(
    Path(module_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<QuizResponse>>, ApiError> {
    let quizzes = repositories::quizzes::list_by_module(state.db(), module_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list quizzes"))?;
    Ok(Json(quizzes.into_iter().map(QuizResponse::from_db).collect()))
}

async fn list_lessons(
    Query(params): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<LessonResponse>>, ApiError> {
    let lessons = repositories::lessons::list(state.db(), params.skip(), params.limit())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list lessons"))?;
    Ok(Json(lessons.into_iter().map(LessonResponse::from_db).collect()))
}

async fn create_lesson(
    State(state): State<AppState>,
    Json(payload): Json<LessonCreate>,
) -> Result<(StatusCode, Json<LessonResponse>), ApiError> {
    repositories::modules::find_by_id(state.db(), payload.module_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch module"))?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Module not found: ID={}", payload.module_id))
        })?;

    let now = primitive_now_utc();
    let lesson = repositories::lessons::create(
        state.db(),
        repositories::lessons::CreateLesson {
            module_id: payload.module_id,
            title: &payload.title,
            content: &payload.content,
            order_index: payload.order_index,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create lesson"))?;

    tracing::info!(lesson_id = lesson.id, module_id = lesson.module_id, "Created lesson");
    Ok((StatusCode::CREATED, Json(LessonResponse::from_db(lesson))))
}

async fn get_lesson(
    Path(lesson_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<LessonResponse>, ApiError> {
    let lesson = repositories::lessons::find_by_id(state.db(), lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson"))?
        .ok_or_else(|| ApiError::NotFound(format!("Lesson not found: ID={lesson_id}")))?;
    Ok(Json(LessonResponse::from_db(lesson)))
}

async fn update_lesson(
    Path(lesson_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<LessonUpdate>,
) -> Result<Json<LessonResponse>, ApiError> {
    let lesson = repositories::lessons::find_by_id(state.db(), lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson"))?
        .ok_or_else(|| ApiError::NotFound(format!("Lesson not found: ID={lesson_id}")))?;

    let mut next = lesson.clone();
    let mut merge = Merge::default();

    if let Some(module_id) = payload.module_id {
        if module_id != next.module_id {
            repositories::modules::find_by_id(state.db(), module_id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to fetch module"))?
                .ok_or_else(|| ApiError::NotFound(format!("Module not found: ID={module_id}")))?;
            next.module_id = module_id;
            merge.mark_changed();
        }
    }
    merge.field(&mut next.title, payload.title);
    merge.field(&mut next.content, payload.content);
    merge.field(&mut next.order_index, payload.order_index);

    if !merge.changed() {
        return Ok(Json(LessonResponse::from_db(lesson)));
    }

    next.updated_at = primitive_now_utc();
    let updated = repositories::lessons::update(state.db(), &next)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update lesson"))?;
    Ok(Json(LessonResponse::from_db(updated)))
}

async fn delete_lesson(
    Path(lesson_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::lessons::delete(state.db(), lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete lesson"))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Lesson not found: ID={lesson_id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_lesson_assignments(
    Path(lesson_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<AssignmentResponse>>, ApiError> {
    let assignments = repositories::assignments::list_by_lesson(state.db(), lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assignments"))?;
    Ok(Json(assignments.into_iter().map(AssignmentResponse::from_db).collect()))
}

async fn list_assignments(
    Query(params): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<AssignmentResponse>>, ApiError> {
    let assignments = repositories::assignments::list(state.db(), params.skip(), params.limit())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assignments"))?;
    Ok(Json(assignments.into_iter().map(AssignmentResponse::from_db).collect()))
}

async fn create_assignment(
    State(state): State<AppState>,
    Json(payload): Json<AssignmentCreate>,
) -> Result<(StatusCode, Json<AssignmentResponse>), ApiError> {
    repositories::lessons::find_by_id(state.db(), payload.lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson"))?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Lesson not found: ID={}", payload.lesson_id))
        })?;

    let due_date = payload.due_date.as_deref().map(parse_due_date).transpose()?;
    let now = primitive_now_utc();
    let assignment = repositories::assignments::create(
        state.db(),
        repositories::assignments::CreateAssignment {
            lesson_id: payload.lesson_id,
            title: &payload.title,
            description: payload.description.as_deref(),
            due_date,
            max_score: payload.max_score.unwrap_or(DEFAULT_MAX_SCORE),
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create assignment"))?;

    tracing::info!(assignment_id = assignment.id, "Created assignment");
    Ok((StatusCode::CREATED, Json(AssignmentResponse::from_db(assignment))))
}

async fn get_assignment(
    Path(assignment_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    let assignment = repositories::assignments::find_by_id(state.db(), assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assignment"))?
        .ok_or_else(|| ApiError::NotFound(format!("Assignment not found: ID={assignment_id}")))?;
    Ok(Json(AssignmentResponse::from_db(assignment)))
}

async fn update_assignment(
    Path(assignment_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<AssignmentUpdate>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    let assignment = repositories::assignments::find_by_id(state.db(), assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assignment"))?
        .ok_or_else(|| ApiError::NotFound(format!("Assignment not found: ID={assignment_id}")))?;

    let due_date = payload.due_date.as_deref().map(parse_due_date).transpose()?;

    let mut next = assignment.clone();
    let mut merge = Merge::default();

    if let Some(lesson_id) = payload.lesson_id {
        if lesson_id != next.lesson_id {
            repositories::lessons::find_by_id(state.db(), lesson_id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to fetch lesson"))?
                .ok_or_else(|| ApiError::NotFound(format!("Lesson not found: ID={lesson_id}")))?;
            next.lesson_id = lesson_id;
            merge.mark_changed();
        }
    }
    merge.field(&mut next.title, payload.title);
    merge.nullable(&mut next.description, payload.description);
    merge.nullable(&mut next.due_date, due_date);
    merge.field(&mut next.max_score, payload.max_score);

    if !merge.changed() {
        return Ok(Json(AssignmentResponse::from_db(assignment)));
    }

    next.updated_at = primitive_now_utc();
    let updated = repositories::assignments::update(state.db(), &next)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update assignment"))?;
    Ok(Json(AssignmentResponse::from_db(updated)))
}

async fn delete_assignment(
    Path(assignment_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::assignments::delete(state.db(), assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete assignment"))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Assignment not found: ID={assignment_id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_assignment_submissions(
    Path(assignment_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let submissions = repositories::submissions::list_by_assignment(state.db(), assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list submissions"))?;
    Ok(Json(submissions.into_iter().map(SubmissionResponse::from_db).collect()))
}

async fn submit_assignment(
    Path(assignment_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<SubmissionCreate>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let saved = submission::submit_assignment(
        state.db(),
        assignment_id,
        payload.student_id,
        payload.content,
        primitive_now_utc(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(SubmissionResponse::from_db(saved))))
}
