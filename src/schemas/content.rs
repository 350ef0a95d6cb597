use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;

#[derive(Debug, Deserialize)]
pub(crate) struct ModuleCreate {
    pub(crate) course_id: i64,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) order_index: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModuleUpdate {
    #[serde(default)]
    pub(crate) course_id: Option<i64>,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) order_index: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ModuleResponse {
    pub(crate) id: i64,
    pub(crate) course_id: i64,
    pub(crate) title: String,
    pub(crate) order_index: i32,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ModuleResponse {
    pub(crate) fn from_db(module: crate::db::models::Module) -> Self {
        Self {
            id: module.id,
            course_id: module.course_id,
            title: module.title,
            order_index: module.order_index,
            created_at: format_primitive(module.created_at),
            updated_at: format_primitive(module.updated_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LessonCreate {
    pub(crate) module_id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    #[serde(default)]
    pub(crate) order_index: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LessonUpdate {
    #[serde(default)]
    pub(crate) module_id: Option<i64>,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) content: Option<String>,
    #[serde(default)]
    pub(crate) order_index: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LessonResponse {
    pub(crate) id: i64,
    pub(crate) module_id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) order_index: i32,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl LessonResponse {
    pub(crate) fn from_db(lesson: crate::db::models::Lesson) -> Self {
        Self {
            id: lesson.id,
            module_id: lesson.module_id,
            title: lesson.title,
            content: lesson.content,
            order_index: lesson.order_index,
            created_at: format_primitive(lesson.created_at),
            updated_at: format_primitive(lesson.updated_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignmentCreate {
    pub(crate) lesson_id: i64,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    /// RFC 3339.
    #[serde(default)]
    pub(crate) due_date: Option<String>,
    #[serde(default)]
    pub(crate) max_score: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignmentUpdate {
    #[serde(default)]
    pub(crate) lesson_id: Option<i64>,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) due_date: Option<String>,
    #[serde(default)]
    pub(crate) max_score: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentResponse {
    pub(crate) id: i64,
    pub(crate) lesson_id: i64,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) due_date: Option<String>,
    pub(crate) max_score: i32,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl AssignmentResponse {
    pub(crate) fn from_db(assignment: crate::db::models::Assignment) -> Self {
        Self {
            id: assignment.id,
            lesson_id: assignment.lesson_id,
            title: assignment.title,
            description: assignment.description,
            due_date: assignment.due_date.map(format_primitive),
            max_score: assignment.max_score,
            created_at: format_primitive(assignment.created_at),
            updated_at: format_primitive(assignment.updated_at),
        }
    }
}
