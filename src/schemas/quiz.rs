use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::types::QuestionType;

#[derive(Debug, Deserialize)]
pub(crate) struct QuizCreate {
    pub(crate) module_id: i64,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) time_limit_minutes: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizUpdate {
    #[serde(default)]
    pub(crate) module_id: Option<i64>,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) time_limit_minutes: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizResponse {
    pub(crate) id: i64,
    pub(crate) module_id: i64,
    pub(crate) title: String,
    pub(crate) time_limit_minutes: Option<i32>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl QuizResponse {
    pub(crate) fn from_db(quiz: crate::db::models::Quiz) -> Self {
        Self {
            id: quiz.id,
            module_id: quiz.module_id,
            title: quiz.title,
            time_limit_minutes: quiz.time_limit_minutes,
            created_at: format_primitive(quiz.created_at),
            updated_at: format_primitive(quiz.updated_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionCreate {
    pub(crate) quiz_id: i64,
    pub(crate) text: String,
    pub(crate) question_type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionUpdate {
    #[serde(default)]
    pub(crate) quiz_id: Option<i64>,
    #[serde(default)]
    pub(crate) text: Option<String>,
    #[serde(default)]
    pub(crate) question_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionResponse {
    pub(crate) id: i64,
    pub(crate) quiz_id: i64,
    pub(crate) text: String,
    pub(crate) question_type: QuestionType,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl QuestionResponse {
    pub(crate) fn from_db(question: crate::db::models::Question) -> Self {
        Self {
            id: question.id,
            quiz_id: question.quiz_id,
            text: question.text,
            question_type: question.question_type,
            created_at: format_primitive(question.created_at),
            updated_at: format_primitive(question.updated_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerOptionCreate {
    pub(crate) question_id: i64,
    pub(crate) text: String,
    #[serde(default)]
    pub(crate) is_correct: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerOptionUpdate {
    #[serde(default)]
    pub(crate) question_id: Option<i64>,
    #[serde(default)]
    pub(crate) text: Option<String>,
    #[serde(default)]
    pub(crate) is_correct: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerOptionResponse {
    pub(crate) id: i64,
    pub(crate) question_id: i64,
    pub(crate) text: String,
    pub(crate) is_correct: bool,
    pub(crate) created_at: String,
}

impl AnswerOptionResponse {
    pub(crate) fn from_db(option: crate::db::models::AnswerOption) -> Self {
        Self {
            id: option.id,
            question_id: option.question_id,
            text: option.text,
            is_correct: option.is_correct,
            created_at: format_primitive(option.created_at),
        }
    }
}

/// Answers map question id to the chosen answer-option id.
#[derive(Debug, Deserialize)]
pub(crate) struct TakeQuizRequest {
    pub(crate) student_id: i64,
    #[serde(default)]
    pub(crate) answers: HashMap<i64, i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizSubmissionUpdate {
    #[serde(default)]
    pub(crate) quiz_id: Option<i64>,
    #[serde(default)]
    pub(crate) student_id: Option<i64>,
    #[serde(default)]
    pub(crate) score: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizSubmissionResponse {
    pub(crate) id: i64,
    pub(crate) quiz_id: i64,
    pub(crate) student_id: i64,
    pub(crate) score: i32,
    pub(crate) taken_at: String,
}

impl QuizSubmissionResponse {
    pub(crate) fn from_db(submission: crate::db::models::QuizSubmission) -> Self {
        Self {
            id: submission.id,
            quiz_id: submission.quiz_id,
            student_id: submission.student_id,
            score: submission.score,
            taken_at: format_primitive(submission.taken_at),
        }
    }
}
