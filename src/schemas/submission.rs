use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionCreate {
    pub(crate) student_id: i64,
    pub(crate) content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionUpdate {
    #[serde(default)]
    pub(crate) assignment_id: Option<i64>,
    #[serde(default)]
    pub(crate) student_id: Option<i64>,
    #[serde(default)]
    pub(crate) content: Option<String>,
    #[serde(default)]
    pub(crate) score: Option<i32>,
    #[serde(default)]
    pub(crate) feedback: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) id: i64,
    pub(crate) assignment_id: i64,
    pub(crate) student_id: i64,
    pub(crate) content: String,
    pub(crate) submitted_at: String,
    pub(crate) score: Option<i32>,
    pub(crate) feedback: Option<String>,
}

impl SubmissionResponse {
    pub(crate) fn from_db(submission: crate::db::models::Submission) -> Self {
        Self {
            id: submission.id,
            assignment_id: submission.assignment_id,
            student_id: submission.student_id,
            content: submission.content,
            submitted_at: format_primitive(submission.submitted_at),
            score: submission.score,
            feedback: submission.feedback,
        }
    }
}
