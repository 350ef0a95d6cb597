//! Shared builders for the in-memory store tests.

use time::macros::datetime;
use time::PrimitiveDateTime;

use crate::db::models::{AnswerOption, Assignment, Category, Course, Question, Quiz, User};
use crate::db::types::{QuestionType, UserRole};

pub(crate) fn now() -> PrimitiveDateTime {
    datetime!(2025-01-15 12:00:00)
}

pub(crate) fn user(id: i64, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        email: format!("{username}@classhub.dev"),
        full_name: username.to_string(),
        role: UserRole::Student,
        created_at: now(),
        updated_at: now(),
    }
}

pub(crate) fn teacher(id: i64, username: &str) -> User {
    User { role: UserRole::Teacher, ..user(id, username) }
}

pub(crate) fn category(id: i64, name: &str) -> Category {
    Category { id, name: name.to_string() }
}

pub(crate) fn course(id: i64, teacher_id: i64, category_id: i64) -> Course {
    Course {
        id,
        title: format!("Course {id}"),
        description: None,
        teacher_id,
        category_id,
        start_date: None,
        duration_days: None,
        created_at: now(),
        updated_at: now(),
    }
}

pub(crate) fn quiz(id: i64, module_id: i64) -> Quiz {
    Quiz {
        id,
        module_id,
        title: format!("Quiz {id}"),
        time_limit_minutes: Some(30),
        created_at: now(),
        updated_at: now(),
    }
}

pub(crate) fn question(id: i64, quiz_id: i64) -> Question {
    Question {
        id,
        quiz_id,
        text: format!("Question {id}?"),
        question_type: QuestionType::SingleChoice,
        created_at: now(),
        updated_at: now(),
    }
}

pub(crate) fn answer_option(id: i64, question_id: i64, is_correct: bool) -> AnswerOption {
    AnswerOption {
        id,
        question_id,
        text: format!("Option {id}"),
        is_correct,
        created_at: now(),
    }
}

pub(crate) fn assignment(id: i64, lesson_id: i64) -> Assignment {
    Assignment {
        id,
        lesson_id,
        title: format!("Assignment {id}"),
        description: None,
        due_date: None,
        max_score: 100,
        created_at: now(),
        updated_at: now(),
    }
}
