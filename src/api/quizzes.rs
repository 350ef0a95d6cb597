//! Quizzes, questions, answer options, and quiz attempts.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::errors::ApiError;
use crate::api::pagination::ListQuery;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::QuestionType;
use crate::repositories;
use crate::schemas::quiz::{
    AnswerOptionCreate, AnswerOptionResponse, AnswerOptionUpdate, QuestionCreate,
    QuestionResponse, QuestionUpdate, QuizCreate, QuizResponse, QuizSubmissionResponse,
    QuizSubmissionUpdate, QuizUpdate, TakeQuizRequest,
};
use crate::services::grading;
use crate::services::merge::Merge;

pub(crate) fn quizzes_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_quizzes).post(create_quiz))
        .route("/:quiz_id", get(get_quiz).patch(update_quiz).delete(delete_quiz))
        .route("/:quiz_id/questions", get(list_quiz_questions))
        .route("/:quiz_id/attempts", post(take_quiz))
        .route("/:quiz_id/submissions", get(list_quiz_submissions))
}

pub(crate) fn questions_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_question))
        .route("/:question_id", get(get_question).patch(update_question).delete(delete_question))
        .route("/:question_id/options", get(list_question_options))
}

pub(crate) fn answer_options_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_option))
        .route("/:option_id", get(get_option).patch(update_option).delete(delete_option))
}

pub(crate) fn quiz_submissions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attempts))
        .route(
            "/:submission_id",
            get(get_attempt).patch(update_attempt).delete(delete_attempt),
        )
}

fn parse_question_type(value: &str) -> Result<QuestionType, ApiError> {
    QuestionType::parse(value)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown question type: {value}")))
}

async fn list_quizzes(
    Query(params): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<QuizResponse>>, ApiError> {
    let quizzes = repositories::quizzes::list(state.db(), params.skip(), params.limit())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list quizzes"))?;
    Ok(Json(quizzes.into_iter().map(QuizResponse::from_db).collect()))
}

async fn create_quiz(
    State(state): State<AppState>,
    Json(payload): Json<QuizCreate>,
) -> Result<(StatusCode, Json<QuizResponse>), ApiError> {
    repositories::modules::find_by_id(state.db(), payload.module_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch module"))?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Module not found: ID={}", payload.module_id))
        })?;

    let now = primitive_now_utc();
    let quiz = repositories::quizzes::create(
        state.db(),
        repositories::quizzes::CreateQuiz {
            module_id: payload.module_id,
            title: &payload.title,
            time_limit_minutes: payload.time_limit_minutes,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create quiz"))?;

    tracing::info!(quiz_id = quiz.id, module_id = quiz.module_id, "Created quiz");
    Ok((StatusCode::CREATED, Json(QuizResponse::from_db(quiz))))
}

async fn get_quiz(
    Path(quiz_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<QuizResponse>, ApiError> {
    let quiz = repositories::quizzes::find_by_id(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?
        .ok_or_else(|| ApiError::NotFound(format!("Quiz not found: ID={quiz_id}")))?;
    Ok(Json(QuizResponse::from_db(quiz)))
}

async fn update_quiz(
    Path(quiz_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<QuizUpdate>,
) -> Result<Json<QuizResponse>, ApiError> {
    let quiz = repositories::quizzes::find_by_id(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?
        .ok_or_else(|| ApiError::NotFound(format!("Quiz not found: ID={quiz_id}")))?;

    let mut next = quiz.clone();
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
    merge.nullable(&mut next.time_limit_minutes, payload.time_limit_minutes);

    if !merge.changed() {
        return Ok(Json(QuizResponse::from_db(quiz)));
    }

    next.updated_at = primitive_now_utc();
    let updated = repositories::quizzes::update(state.db(), &next)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update quiz"))?;
    Ok(Json(QuizResponse::from_db(updated)))
}

async fn delete_quiz(
    Path(quiz_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::quizzes::delete(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete quiz"))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Quiz not found: ID={quiz_id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_quiz_questions(
    Path(quiz_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<QuestionResponse>>, ApiError> {
    let questions = repositories::questions::list_by_quiz(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list questions"))?;
    Ok(Json(questions.into_iter().map(QuestionResponse::from_db).collect()))
}

/// The quiz-taking transaction. An empty answers map is rejected before the
/// grading engine runs.
async fn take_quiz(
    Path(quiz_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<TakeQuizRequest>,
) -> Result<(StatusCode, Json<QuizSubmissionResponse>), ApiError> {
    if payload.answers.is_empty() {
        return Err(ApiError::UnprocessableEntity("No answers provided.".to_string()));
    }

    let submission = grading::take_quiz(
        state.db(),
        payload.student_id,
        quiz_id,
        &payload.answers,
        primitive_now_utc(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(QuizSubmissionResponse::from_db(submission))))
}

async fn list_quiz_submissions(
    Path(quiz_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<QuizSubmissionResponse>>, ApiError> {
    let submissions = repositories::quiz_submissions::list_by_quiz(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list quiz attempts"))?;
    Ok(Json(submissions.into_iter().map(QuizSubmissionResponse::from_db).collect()))
}

async fn create_question(
    State(state): State<AppState>,
    Json(payload): Json<QuestionCreate>,
) -> Result<(StatusCode, Json<QuestionResponse>), ApiError> {
    let question_type = parse_question_type(&payload.question_type)?;

    repositories::quizzes::find_by_id(state.db(), payload.quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?
        .ok_or_else(|| ApiError::NotFound(format!("Quiz not found: ID={}", payload.quiz_id)))?;

    let now = primitive_now_utc();
    let question = repositories::questions::create(
        state.db(),
        repositories::questions::CreateQuestion {
            quiz_id: payload.quiz_id,
            text: &payload.text,
            question_type,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create question"))?;

    tracing::info!(question_id = question.id, quiz_id = question.quiz_id, "Created question");
    Ok((StatusCode::CREATED, Json(QuestionResponse::from_db(question))))
}

async fn get_question(
    Path(question_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let question = repositories::questions::find_by_id(state.db(), question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?
        .ok_or_else(|| ApiError::NotFound(format!("Question not found: ID={question_id}")))?;
    Ok(Json(QuestionResponse::from_db(question)))
}

async fn update_question(
    Path(question_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<QuestionUpdate>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let question = repositories::questions::find_by_id(state.db(), question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?
        .ok_or_else(|| ApiError::NotFound(format!("Question not found: ID={question_id}")))?;

    let question_type = payload.question_type.as_deref().map(parse_question_type).transpose()?;

    let mut next = question.clone();
    let mut merge = Merge::default();

    if let Some(quiz_id) = payload.quiz_id {
        if quiz_id != next.quiz_id {
            repositories::quizzes::find_by_id(state.db(), quiz_id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?
                .ok_or_else(|| ApiError::NotFound(format!("Quiz not found: ID={quiz_id}")))?;
            next.quiz_id = quiz_id;
            merge.mark_changed();
        }
    }
    merge.field(&mut next.text, payload.text);
    merge.field(&mut next.question_type, question_type);

    if !merge.changed() {
        return Ok(Json(QuestionResponse::from_db(question)));
    }

    next.updated_at = primitive_now_utc();
    let updated = repositories::questions::update(state.db(), &next)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update question"))?;
    Ok(Json(QuestionResponse::from_db(updated)))
}

async fn delete_question(
    Path(question_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::questions::delete(state.db(), question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete question"))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Question not found: ID={question_id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_question_options(
    Path(question_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<AnswerOptionResponse>>, ApiError> {
    let options = repositories::answer_options::list_by_question(state.db(), question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list answer options"))?;
    Ok(Json(options.into_iter().map(AnswerOptionResponse::from_db).collect()))
}

async fn create_option(
    State(state): State<AppState>,
    Json(payload): Json<AnswerOptionCreate>,
) -> Result<(StatusCode, Json<AnswerOptionResponse>), ApiError> {
    repositories::questions::find_by_id(state.db(), payload.question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Question not found: ID={}", payload.question_id))
        })?;

    let option = repositories::answer_options::create(
        state.db(),
        repositories::answer_options::CreateAnswerOption {
            question_id: payload.question_id,
            text: &payload.text,
            is_correct: payload.is_correct,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create answer option"))?;

    Ok((StatusCode::CREATED, Json(AnswerOptionResponse::from_db(option))))
}

async fn get_option(
    Path(option_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<AnswerOptionResponse>, ApiError> {
    let option = repositories::answer_options::find_by_id(state.db(), option_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch answer option"))?
        .ok_or_else(|| ApiError::NotFound(format!("AnswerOption not found: ID={option_id}")))?;
    Ok(Json(AnswerOptionResponse::from_db(option)))
}

async fn update_option(
    Path(option_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<AnswerOptionUpdate>,
) -> Result<Json<AnswerOptionResponse>, ApiError> {
    let option = repositories::answer_options::find_by_id(state.db(), option_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch answer option"))?
        .ok_or_else(|| ApiError::NotFound(format!("AnswerOption not found: ID={option_id}")))?;

    let mut next = option.clone();
    let mut merge = Merge::default();

    if let Some(question_id) = payload.question_id {
        if question_id != next.question_id {
            repositories::questions::find_by_id(state.db(), question_id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?
                .ok_or_else(|| {
                    ApiError::NotFound(format!("Question not found: ID={question_id}"))
                })?;
            next.question_id = question_id;
            merge.mark_changed();
        }
    }
    merge.field(&mut next.text, payload.text);
    merge.field(&mut next.is_correct, payload.is_correct);

    if !merge.changed() {
        return Ok(Json(AnswerOptionResponse::from_db(option)));
    }

    let updated = repositories::answer_options::update(state.db(), &next)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update answer option"))?;
    Ok(Json(AnswerOptionResponse::from_db(updated)))
}

async fn delete_option(
    Path(option_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::answer_options::delete(state.db(), option_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete answer option"))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("AnswerOption not found: ID={option_id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_attempts(
    Query(params): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<QuizSubmissionResponse>>, ApiError> {
    let submissions =
        repositories::quiz_submissions::list(state.db(), params.skip(), params.limit())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list quiz attempts"))?;
    Ok(Json(submissions.into_iter().map(QuizSubmissionResponse::from_db).collect()))
}

async fn get_attempt(
    Path(submission_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<QuizSubmissionResponse>, ApiError> {
    let submission = repositories::quiz_submissions::find_by_id(state.db(), submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz attempt"))?
        .ok_or_else(|| {
            ApiError::NotFound(format!("QuizSubmission not found: ID={submission_id}"))
        })?;
    Ok(Json(QuizSubmissionResponse::from_db(submission)))
}

async fn update_attempt(
    Path(submission_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<QuizSubmissionUpdate>,
) -> Result<Json<QuizSubmissionResponse>, ApiError> {
    let submission = repositories::quiz_submissions::find_by_id(state.db(), submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz attempt"))?
        .ok_or_else(|| {
            ApiError::NotFound(format!("QuizSubmission not found: ID={submission_id}"))
        })?;

    let mut next = submission.clone();
    let mut merge = Merge::default();

    if let Some(quiz_id) = payload.quiz_id {
        if quiz_id != next.quiz_id {
            repositories::quizzes::find_by_id(state.db(), quiz_id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?
                .ok_or_else(|| ApiError::NotFound(format!("Quiz not found: ID={quiz_id}")))?;
            next.quiz_id = quiz_id;
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
    merge.field(&mut next.score, payload.score);

    if !merge.changed() {
        return Ok(Json(QuizSubmissionResponse::from_db(submission)));
    }

    let updated = repositories::quiz_submissions::update(state.db(), &next)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update quiz attempt"))?;
    Ok(Json(QuizSubmissionResponse::from_db(updated)))
}

async fn delete_attempt(
    Path(submission_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::quiz_submissions::delete(state.db(), submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete quiz attempt"))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("QuizSubmission not found: ID={submission_id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}
