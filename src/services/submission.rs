use async_trait::async_trait;
use time::PrimitiveDateTime;

use crate::db::models::{Assignment, Submission, User};
use crate::repositories;
use crate::services::error::{map_unique_violation, ServiceError};

pub(crate) const ALREADY_SUBMITTED: &str =
    "Student has already submitted a solution for this assignment.";

#[derive(Debug)]
pub(crate) struct NewSubmission {
    pub(crate) assignment_id: i64,
    pub(crate) student_id: i64,
    pub(crate) content: String,
    pub(crate) submitted_at: PrimitiveDateTime,
}

/// Data access needed by the assignment-submission guard.
#[async_trait]
pub(crate) trait SubmissionStore: Send + Sync {
    async fn find_assignment(&self, assignment_id: i64)
        -> Result<Option<Assignment>, ServiceError>;
    async fn find_user(&self, user_id: i64) -> Result<Option<User>, ServiceError>;
    async fn submission_exists(
        &self,
        student_id: i64,
        assignment_id: i64,
    ) -> Result<bool, ServiceError>;
    /// Must report a duplicate (student, assignment) pair as `AlreadyExists`.
    async fn insert_submission(
        &self,
        submission: NewSubmission,
    ) -> Result<Submission, ServiceError>;
}

/// One submission per (student, assignment), permanently: re-submission is
/// rejected, and the only way around it is an administrative update or a
/// delete performed through the regular submission endpoints.
pub(crate) async fn submit_assignment<S: SubmissionStore>(
    store: &S,
    assignment_id: i64,
    student_id: i64,
    content: String,
    now: PrimitiveDateTime,
) -> Result<Submission, ServiceError> {
    let assignment = store
        .find_assignment(assignment_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Assignment", assignment_id))?;

    let student = store
        .find_user(student_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User", student_id))?;

    if store.submission_exists(student.id, assignment.id).await? {
        tracing::warn!(student_id, assignment_id, "Re-submission attempt rejected");
        return Err(ServiceError::AlreadyExists(ALREADY_SUBMITTED.to_string()));
    }

    let saved = store
        .insert_submission(NewSubmission {
            assignment_id: assignment.id,
            student_id: student.id,
            content,
            submitted_at: now,
        })
        .await?;

    tracing::info!(
        submission_id = saved.id,
        student_id,
        assignment_id,
        "Assignment submitted"
    );
    Ok(saved)
}

#[async_trait]
impl SubmissionStore for sqlx::PgPool {
    async fn find_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Option<Assignment>, ServiceError> {
        Ok(repositories::assignments::find_by_id(self, assignment_id).await?)
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>, ServiceError> {
        Ok(repositories::users::find_by_id(self, user_id).await?)
    }

    async fn submission_exists(
        &self,
        student_id: i64,
        assignment_id: i64,
    ) -> Result<bool, ServiceError> {
        Ok(repositories::submissions::exists(self, student_id, assignment_id).await?)
    }

    async fn insert_submission(
        &self,
        submission: NewSubmission,
    ) -> Result<Submission, ServiceError> {
        repositories::submissions::create(
            self,
            repositories::submissions::CreateSubmission {
                assignment_id: submission.assignment_id,
                student_id: submission.student_id,
                content: &submission.content,
                submitted_at: submission.submitted_at,
            },
        )
        .await
        .map_err(|err| map_unique_violation(err, ALREADY_SUBMITTED))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::services::test_fixtures::{assignment, now, user};

    #[derive(Default)]
    struct MemoryStore {
        assignments: Vec<Assignment>,
        users: Vec<User>,
        submissions: Mutex<Vec<Submission>>,
        next_id: Mutex<i64>,
    }

    impl MemoryStore {
        fn with(assignments: Vec<Assignment>, users: Vec<User>) -> Self {
            Self { assignments, users, next_id: Mutex::new(1), ..Default::default() }
        }
    }

    #[async_trait]
    impl SubmissionStore for MemoryStore {
        async fn find_assignment(
            &self,
            assignment_id: i64,
        ) -> Result<Option<Assignment>, ServiceError> {
            Ok(self.assignments.iter().find(|a| a.id == assignment_id).cloned())
        }

        async fn find_user(&self, user_id: i64) -> Result<Option<User>, ServiceError> {
            Ok(self.users.iter().find(|u| u.id == user_id).cloned())
        }

        async fn submission_exists(
            &self,
            student_id: i64,
            assignment_id: i64,
        ) -> Result<bool, ServiceError> {
            let rows = self.submissions.lock().unwrap();
            Ok(rows.iter().any(|s| s.student_id == student_id && s.assignment_id == assignment_id))
        }

        async fn insert_submission(
            &self,
            submission: NewSubmission,
        ) -> Result<Submission, ServiceError> {
            let mut rows = self.submissions.lock().unwrap();
            // Mirrors the unique (student_id, assignment_id) constraint.
            if rows.iter().any(|s| {
                s.student_id == submission.student_id
                    && s.assignment_id == submission.assignment_id
            }) {
                return Err(ServiceError::AlreadyExists(ALREADY_SUBMITTED.to_string()));
            }
            let mut next_id = self.next_id.lock().unwrap();
            let row = Submission {
                id: *next_id,
                assignment_id: submission.assignment_id,
                student_id: submission.student_id,
                content: submission.content,
                submitted_at: submission.submitted_at,
                score: None,
                feedback: None,
            };
            *next_id += 1;
            rows.push(row.clone());
            Ok(row)
        }
    }

    #[tokio::test]
    async fn submit_stores_content_and_timestamp() {
        let store = MemoryStore::with(vec![assignment(5, 1)], vec![user(2, "student")]);

        let submission =
            submit_assignment(&store, 5, 2, "my solution".to_string(), now()).await.unwrap();

        assert_eq!(submission.assignment_id, 5);
        assert_eq!(submission.student_id, 2);
        assert_eq!(submission.content, "my solution");
        assert_eq!(submission.submitted_at, now());
        assert_eq!(submission.score, None);
    }

    #[tokio::test]
    async fn second_submission_for_same_pair_fails() {
        let store = MemoryStore::with(vec![assignment(5, 1)], vec![user(2, "student")]);

        submit_assignment(&store, 5, 2, "first".to_string(), now()).await.unwrap();
        let err = submit_assignment(&store, 5, 2, "second".to_string(), now()).await.unwrap_err();

        assert!(matches!(err, ServiceError::AlreadyExists(_)), "got {err:?}");
        assert_eq!(store.submissions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn other_student_may_submit_same_assignment() {
        let store = MemoryStore::with(
            vec![assignment(5, 1)],
            vec![user(2, "student-a"), user(3, "student-b")],
        );

        submit_assignment(&store, 5, 2, "a".to_string(), now()).await.unwrap();
        submit_assignment(&store, 5, 3, "b".to_string(), now()).await.unwrap();

        assert_eq!(store.submissions.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_assignment_or_student_is_not_found() {
        let store = MemoryStore::with(vec![assignment(5, 1)], vec![user(2, "student")]);

        let err = submit_assignment(&store, 99, 2, "x".to_string(), now()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = submit_assignment(&store, 5, 99, "x".to_string(), now()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        assert!(store.submissions.lock().unwrap().is_empty());
    }
}
