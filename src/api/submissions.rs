//! Assignment submissions: listing and administrative update/delete.
//! Creation goes through the assignment router, which enforces the
//! one-submission-per-pair rule.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::errors::ApiError;
use crate::api::pagination::ListQuery;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::submission::{SubmissionResponse, SubmissionUpdate};
use crate::services::error::map_unique_violation;
use crate::services::merge::Merge;
use crate::services::submission::ALREADY_SUBMITTED;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_submissions))
        .route(
            "/:submission_id",
            get(get_submission).patch(update_submission).delete(delete_submission),
        )
}

async fn list_submissions(
    Query(params): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let submissions = repositories::submissions::list(state.db(), params.skip(), params.limit())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list submissions"))?;
    Ok(Json(submissions.into_iter().map(SubmissionResponse::from_db).collect()))
}

async fn get_submission(
    Path(submission_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let submission = repositories::submissions::find_by_id(state.db(), submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch submission"))?
        .ok_or_else(|| ApiError::NotFound(format!("Submission not found: ID={submission_id}")))?;
    Ok(Json(SubmissionResponse::from_db(submission)))
}

async fn update_submission(
    Path(submission_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<SubmissionUpdate>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let submission = repositories::submissions::find_by_id(state.db(), submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch submission"))?
        .ok_or_else(|| ApiError::NotFound(format!("Submission not found: ID={submission_id}")))?;

    let mut next = submission.clone();
    let mut merge = Merge::default();

    if let Some(assignment_id) = payload.assignment_id {
        if assignment_id != next.assignment_id {
            repositories::assignments::find_by_id(state.db(), assignment_id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to fetch assignment"))?
                .ok_or_else(|| {
                    ApiError::NotFound(format!("Assignment not found: ID={assignment_id}"))
                })?;
            next.assignment_id = assignment_id;
            merge.mark_changed();
        }
    }
    if let Some(student_id) = payload.student_id {
        if student_id != next.student_id {
            repositories::users::find_by_id(state.db(), student_id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?
                .ok_or_else(|| ApiError::NotFound(format!("User not found: ID={student_id}")))?;
            next.student_id = student_id;
            merge.mark_changed();
        }
    }
    merge.field(&mut next.content, payload.content);
    merge.nullable(&mut next.score, payload.score);
    merge.nullable(&mut next.feedback, payload.feedback);

    if !merge.changed() {
        return Ok(Json(SubmissionResponse::from_db(submission)));
    }

    // Re-pointing student_id/assignment_id can collide with an existing
    // submission for that pair; surface it as a conflict, not a 500.
    let updated = repositories::submissions::update(state.db(), &next)
        .await
        .map_err(|err| ApiError::from(map_unique_violation(err, ALREADY_SUBMITTED)))?;

    tracing::info!(submission_id, "Updated submission");
    Ok(Json(SubmissionResponse::from_db(updated)))
}

async fn delete_submission(
    Path(submission_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::submissions::delete(state.db(), submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete submission"))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Submission not found: ID={submission_id}")));
    }
    tracing::info!(submission_id, "Deleted submission");
    Ok(StatusCode::NO_CONTENT)
}
