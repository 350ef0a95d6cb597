//! Quiz-taking transaction: validate, score, persist.
//!
//! The engine walks the quiz's questions in their canonical (insertion)
//! order and awards exactly one point per question whose chosen option is
//! marked correct. Questions omitted from the answers map contribute zero.
//! The only write is the final `QuizSubmission` insert, so any failure along
//! the way leaves nothing behind.

use std::collections::HashMap;

use async_trait::async_trait;
use time::PrimitiveDateTime;

use crate::db::models::{AnswerOption, Question, Quiz, QuizSubmission, User};
use crate::repositories;
use crate::services::error::ServiceError;

pub(crate) const QUIZ_HAS_NO_QUESTIONS: &str = "Quiz has no questions.";

#[derive(Debug)]
pub(crate) struct NewQuizSubmission {
    pub(crate) quiz_id: i64,
    pub(crate) student_id: i64,
    pub(crate) score: i32,
    pub(crate) taken_at: PrimitiveDateTime,
}

/// Data access needed by the grading engine.
#[async_trait]
pub(crate) trait GradingStore: Send + Sync {
    async fn find_user(&self, user_id: i64) -> Result<Option<User>, ServiceError>;
    async fn find_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>, ServiceError>;
    /// Questions in insertion order (ascending id).
    async fn questions_for_quiz(&self, quiz_id: i64) -> Result<Vec<Question>, ServiceError>;
    async fn find_answer_option(&self, option_id: i64)
        -> Result<Option<AnswerOption>, ServiceError>;
    async fn insert_quiz_submission(
        &self,
        submission: NewQuizSubmission,
    ) -> Result<QuizSubmission, ServiceError>;
}

/// Grades one attempt. Every attempt produces a new `QuizSubmission`; unlike
/// enrollments and assignment submissions there is no duplicate guard here.
pub(crate) async fn take_quiz<S: GradingStore>(
    store: &S,
    student_id: i64,
    quiz_id: i64,
    answers: &HashMap<i64, i64>,
    now: PrimitiveDateTime,
) -> Result<QuizSubmission, ServiceError> {
    let student = store
        .find_user(student_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Student", student_id))?;

    let quiz = store
        .find_quiz(quiz_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Quiz", quiz_id))?;

    let questions = store.questions_for_quiz(quiz.id).await?;
    if questions.is_empty() {
        tracing::warn!(quiz_id, "Quiz has no questions");
        return Err(ServiceError::InvalidState(QUIZ_HAS_NO_QUESTIONS.to_string()));
    }

    tracing::info!(
        student_id,
        quiz_id,
        answers = answers.len(),
        "Student started quiz attempt"
    );

    let mut total_score = 0;
    for question in &questions {
        let Some(&selected_option_id) = answers.get(&question.id) else {
            tracing::debug!(question_id = question.id, quiz_id, "No answer provided");
            continue;
        };

        let selected_option = store
            .find_answer_option(selected_option_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("AnswerOption", selected_option_id))?;

        if selected_option.is_correct {
            total_score += 1;
        }
    }

    let saved = store
        .insert_quiz_submission(NewQuizSubmission {
            quiz_id: quiz.id,
            student_id: student.id,
            score: total_score,
            taken_at: now,
        })
        .await?;

    tracing::info!(
        submission_id = saved.id,
        student_id,
        quiz_id,
        score = total_score,
        out_of = questions.len(),
        "Quiz graded"
    );
    Ok(saved)
}

#[async_trait]
impl GradingStore for sqlx::PgPool {
    async fn find_user(&self, user_id: i64) -> Result<Option<User>, ServiceError> {
        Ok(repositories::users::find_by_id(self, user_id).await?)
    }

    async fn find_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>, ServiceError> {
        Ok(repositories::quizzes::find_by_id(self, quiz_id).await?)
    }

    async fn questions_for_quiz(&self, quiz_id: i64) -> Result<Vec<Question>, ServiceError> {
        Ok(repositories::questions::list_by_quiz(self, quiz_id).await?)
    }

    async fn find_answer_option(
        &self,
        option_id: i64,
    ) -> Result<Option<AnswerOption>, ServiceError> {
        Ok(repositories::answer_options::find_by_id(self, option_id).await?)
    }

    async fn insert_quiz_submission(
        &self,
        submission: NewQuizSubmission,
    ) -> Result<QuizSubmission, ServiceError> {
        Ok(repositories::quiz_submissions::create(
            self,
            repositories::quiz_submissions::CreateQuizSubmission {
                quiz_id: submission.quiz_id,
                student_id: submission.student_id,
                score: submission.score,
                taken_at: submission.taken_at,
            },
        )
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::services::test_fixtures::{answer_option, now, question, quiz, user};

    #[derive(Default)]
    struct MemoryStore {
        users: Vec<User>,
        quizzes: Vec<Quiz>,
        questions: Vec<Question>,
        options: Vec<AnswerOption>,
        submissions: Mutex<Vec<QuizSubmission>>,
    }

    #[async_trait]
    impl GradingStore for MemoryStore {
        async fn find_user(&self, user_id: i64) -> Result<Option<User>, ServiceError> {
            Ok(self.users.iter().find(|u| u.id == user_id).cloned())
        }

        async fn find_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>, ServiceError> {
            Ok(self.quizzes.iter().find(|q| q.id == quiz_id).cloned())
        }

        async fn questions_for_quiz(&self, quiz_id: i64) -> Result<Vec<Question>, ServiceError> {
            let mut questions: Vec<Question> =
                self.questions.iter().filter(|q| q.quiz_id == quiz_id).cloned().collect();
            questions.sort_by_key(|q| q.id);
            Ok(questions)
        }

        async fn find_answer_option(
            &self,
            option_id: i64,
        ) -> Result<Option<AnswerOption>, ServiceError> {
            Ok(self.options.iter().find(|o| o.id == option_id).cloned())
        }

        async fn insert_quiz_submission(
            &self,
            submission: NewQuizSubmission,
        ) -> Result<QuizSubmission, ServiceError> {
            let mut rows = self.submissions.lock().unwrap();
            let row = QuizSubmission {
                id: rows.len() as i64 + 1,
                quiz_id: submission.quiz_id,
                student_id: submission.student_id,
                score: submission.score,
                taken_at: submission.taken_at,
            };
            rows.push(row.clone());
            Ok(row)
        }
    }

    /// Quiz 1 with N questions (ids 1..=n); question i has a correct option
    /// with id 10*i + 1 and a wrong option with id 10*i + 2.
    fn quiz_with_questions(n: i64) -> MemoryStore {
        let mut store = MemoryStore {
            users: vec![user(2, "student")],
            quizzes: vec![quiz(1, 1)],
            ..Default::default()
        };
        for i in 1..=n {
            store.questions.push(question(i, 1));
            store.options.push(answer_option(10 * i + 1, i, true));
            store.options.push(answer_option(10 * i + 2, i, false));
        }
        store
    }

    #[tokio::test]
    async fn score_equals_number_of_correct_answers() {
        let n = 5;
        for k in 0..=n {
            let store = quiz_with_questions(n);
            // Answer the first k questions correctly, omit the rest.
            let answers: HashMap<i64, i64> = (1..=k).map(|i| (i, 10 * i + 1)).collect();

            let submission = take_quiz(&store, 2, 1, &answers, now()).await.unwrap();
            assert_eq!(submission.score as i64, k, "expected score {k} of {n}");
        }
    }

    #[tokio::test]
    async fn incorrect_and_omitted_answers_score_zero() {
        let store = quiz_with_questions(3);
        // Question 1 correct, question 2 wrong, question 3 omitted.
        let answers: HashMap<i64, i64> = [(1, 11), (2, 22)].into_iter().collect();

        let submission = take_quiz(&store, 2, 1, &answers, now()).await.unwrap();

        assert_eq!(submission.score, 1);
        assert_eq!(submission.quiz_id, 1);
        assert_eq!(submission.student_id, 2);
        assert_eq!(submission.taken_at, now());
    }

    #[tokio::test]
    async fn every_attempt_creates_a_new_submission() {
        let store = quiz_with_questions(2);
        let answers: HashMap<i64, i64> = [(1, 11)].into_iter().collect();

        take_quiz(&store, 2, 1, &answers, now()).await.unwrap();
        take_quiz(&store, 2, 1, &answers, now()).await.unwrap();

        assert_eq!(store.submissions.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn quiz_without_questions_is_rejected() {
        let store = MemoryStore {
            users: vec![user(2, "student")],
            quizzes: vec![quiz(1, 1)],
            ..Default::default()
        };

        let err = take_quiz(&store, 2, 1, &HashMap::new(), now()).await.unwrap_err();

        assert!(matches!(err, ServiceError::InvalidState(_)), "got {err:?}");
        assert!(store.submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_answer_option_aborts_without_persisting() {
        let store = quiz_with_questions(3);
        // Question 1 answered correctly, question 2 references a bogus option.
        let answers: HashMap<i64, i64> = [(1, 11), (2, 9999)].into_iter().collect();

        let err = take_quiz(&store, 2, 1, &answers, now()).await.unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)), "got {err:?}");
        assert!(store.submissions.lock().unwrap().is_empty(), "no partial score persisted");
    }

    #[tokio::test]
    async fn missing_student_or_quiz_is_not_found() {
        let store = quiz_with_questions(1);
        let answers: HashMap<i64, i64> = [(1, 11)].into_iter().collect();

        let err = take_quiz(&store, 99, 1, &answers, now()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = take_quiz(&store, 2, 99, &answers, now()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn answers_to_foreign_questions_are_ignored() {
        let store = quiz_with_questions(2);
        // Key 77 does not belong to the quiz; only question 1 counts.
        let answers: HashMap<i64, i64> = [(1, 11), (77, 11)].into_iter().collect();

        let submission = take_quiz(&store, 2, 1, &answers, now()).await.unwrap();
        assert_eq!(submission.score, 1);
    }
}
