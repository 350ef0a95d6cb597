use serde::{Deserialize, Serialize};

use crate::core::time::{format_date, format_primitive};
use crate::db::types::EnrollmentStatus;

#[derive(Debug, Deserialize)]
pub(crate) struct CourseCreate {
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    pub(crate) teacher_id: i64,
    pub(crate) category_id: i64,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub(crate) start_date: Option<String>,
    #[serde(default)]
    pub(crate) duration_days: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CourseUpdate {
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) teacher_id: Option<i64>,
    #[serde(default)]
    pub(crate) category_id: Option<i64>,
    #[serde(default)]
    pub(crate) start_date: Option<String>,
    #[serde(default)]
    pub(crate) duration_days: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) teacher_id: i64,
    pub(crate) category_id: i64,
    pub(crate) start_date: Option<String>,
    pub(crate) duration_days: Option<i32>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl CourseResponse {
    pub(crate) fn from_db(course: crate::db::models::Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            teacher_id: course.teacher_id,
            category_id: course.category_id,
            start_date: course.start_date.map(format_date),
            duration_days: course.duration_days,
            created_at: format_primitive(course.created_at),
            updated_at: format_primitive(course.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct EnrollmentResponse {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) course_id: i64,
    pub(crate) enroll_date: String,
    pub(crate) status: EnrollmentStatus,
}

impl EnrollmentResponse {
    pub(crate) fn from_db(enrollment: crate::db::models::Enrollment) -> Self {
        Self {
            id: enrollment.id,
            user_id: enrollment.user_id,
            course_id: enrollment.course_id,
            enroll_date: format_primitive(enrollment.enroll_date),
            status: enrollment.status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewCreate {
    pub(crate) user_id: i64,
    pub(crate) rating: i32,
    #[serde(default)]
    pub(crate) comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewUpdate {
    #[serde(default)]
    pub(crate) rating: Option<i32>,
    #[serde(default)]
    pub(crate) comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReviewResponse {
    pub(crate) id: i64,
    pub(crate) course_id: i64,
    pub(crate) user_id: i64,
    pub(crate) rating: i32,
    pub(crate) comment: Option<String>,
    pub(crate) created_at: String,
}

impl ReviewResponse {
    pub(crate) fn from_db(review: crate::db::models::CourseReview) -> Self {
        Self {
            id: review.id,
            course_id: review.course_id,
            user_id: review.user_id,
            rating: review.rating,
            comment: review.comment,
            created_at: format_primitive(review.created_at),
        }
    }
}
