use async_trait::async_trait;
use time::{Date, PrimitiveDateTime};

use crate::db::models::{Category, Course, User};
use crate::db::types::UserRole;
use crate::repositories;
use crate::services::error::ServiceError;
use crate::services::merge::Merge;

pub(crate) const TEACHER_ROLE_REQUIRED: &str =
    "Only users with the TEACHER role can lead courses.";

#[derive(Debug)]
pub(crate) struct NewCourse {
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) teacher_id: i64,
    pub(crate) category_id: i64,
    pub(crate) start_date: Option<Date>,
    pub(crate) duration_days: Option<i32>,
    pub(crate) created_at: PrimitiveDateTime,
}

/// Sparse change-set for a course; absent fields are left untouched.
#[derive(Debug, Default)]
pub(crate) struct CoursePatch {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) teacher_id: Option<i64>,
    pub(crate) category_id: Option<i64>,
    pub(crate) start_date: Option<Date>,
    pub(crate) duration_days: Option<i32>,
}

/// Data access needed for course creation and merge-updates.
#[async_trait]
pub(crate) trait CourseStore: Send + Sync {
    async fn find_user(&self, user_id: i64) -> Result<Option<User>, ServiceError>;
    async fn find_category(&self, category_id: i64) -> Result<Option<Category>, ServiceError>;
    async fn find_course(&self, course_id: i64) -> Result<Option<Course>, ServiceError>;
    async fn insert_course(&self, course: NewCourse) -> Result<Course, ServiceError>;
    async fn update_course(&self, course: &Course) -> Result<Course, ServiceError>;
}

pub(crate) async fn create_course<S: CourseStore>(
    store: &S,
    course: NewCourse,
) -> Result<Course, ServiceError> {
    let teacher = store
        .find_user(course.teacher_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User", course.teacher_id))?;

    if teacher.role != UserRole::Teacher {
        tracing::warn!(user_id = teacher.id, "Non-teacher cannot lead a course");
        return Err(ServiceError::InvalidArgument(TEACHER_ROLE_REQUIRED.to_string()));
    }

    let category = store
        .find_category(course.category_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Category", course.category_id))?;

    let saved = store
        .insert_course(NewCourse {
            teacher_id: teacher.id,
            category_id: category.id,
            ..course
        })
        .await?;

    tracing::info!(
        course_id = saved.id,
        teacher_id = saved.teacher_id,
        category_id = saved.category_id,
        "Created course"
    );
    Ok(saved)
}

/// Merge-update: overwrite only supplied fields, resolve changed foreign
/// keys before writing, and skip the write entirely when nothing changed.
pub(crate) async fn update_course<S: CourseStore>(
    store: &S,
    course_id: i64,
    patch: CoursePatch,
    now: PrimitiveDateTime,
) -> Result<(Course, bool), ServiceError> {
    let course = store
        .find_course(course_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Course", course_id))?;

    let mut next = course.clone();
    let mut merge = Merge::default();

    merge.field(&mut next.title, patch.title);
    merge.nullable(&mut next.description, patch.description);

    if let Some(teacher_id) = patch.teacher_id {
        if teacher_id != next.teacher_id {
            let teacher = store
                .find_user(teacher_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("User", teacher_id))?;
            if teacher.role != UserRole::Teacher {
                return Err(ServiceError::InvalidArgument(TEACHER_ROLE_REQUIRED.to_string()));
            }
            next.teacher_id = teacher.id;
            merge.mark_changed();
        }
    }

    if let Some(category_id) = patch.category_id {
        if category_id != next.category_id {
            let category = store
                .find_category(category_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("Category", category_id))?;
            next.category_id = category.id;
            merge.mark_changed();
        }
    }

    merge.nullable(&mut next.start_date, patch.start_date);
    merge.nullable(&mut next.duration_days, patch.duration_days);

    if !merge.changed() {
        tracing::debug!(course_id, "No changes detected for course");
        return Ok((course, false));
    }

    next.updated_at = now;
    let saved = store.update_course(&next).await?;
    tracing::info!(course_id, "Updated course");
    Ok((saved, true))
}

#[async_trait]
impl CourseStore for sqlx::PgPool {
    async fn find_user(&self, user_id: i64) -> Result<Option<User>, ServiceError> {
        Ok(repositories::users::find_by_id(self, user_id).await?)
    }

    async fn find_category(&self, category_id: i64) -> Result<Option<Category>, ServiceError> {
        Ok(repositories::categories::find_by_id(self, category_id).await?)
    }

    async fn find_course(&self, course_id: i64) -> Result<Option<Course>, ServiceError> {
        Ok(repositories::courses::find_by_id(self, course_id).await?)
    }

    async fn insert_course(&self, course: NewCourse) -> Result<Course, ServiceError> {
        Ok(repositories::courses::create(
            self,
            repositories::courses::CreateCourse {
                title: &course.title,
                description: course.description.as_deref(),
                teacher_id: course.teacher_id,
                category_id: course.category_id,
                start_date: course.start_date,
                duration_days: course.duration_days,
                created_at: course.created_at,
                updated_at: course.created_at,
            },
        )
        .await?)
    }

    async fn update_course(&self, course: &Course) -> Result<Course, ServiceError> {
        Ok(repositories::courses::update(self, course).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::services::test_fixtures::{category, course, now, teacher, user};

    #[derive(Default)]
    struct MemoryStore {
        users: Vec<User>,
        categories: Vec<Category>,
        courses: Mutex<Vec<Course>>,
        update_calls: Mutex<usize>,
    }

    impl MemoryStore {
        fn update_calls(&self) -> usize {
            *self.update_calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl CourseStore for MemoryStore {
        async fn find_user(&self, user_id: i64) -> Result<Option<User>, ServiceError> {
            Ok(self.users.iter().find(|u| u.id == user_id).cloned())
        }

        async fn find_category(
            &self,
            category_id: i64,
        ) -> Result<Option<Category>, ServiceError> {
            Ok(self.categories.iter().find(|c| c.id == category_id).cloned())
        }

        async fn find_course(&self, course_id: i64) -> Result<Option<Course>, ServiceError> {
            Ok(self.courses.lock().unwrap().iter().find(|c| c.id == course_id).cloned())
        }

        async fn insert_course(&self, new_course: NewCourse) -> Result<Course, ServiceError> {
            let mut rows = self.courses.lock().unwrap();
            let row = Course {
                id: rows.len() as i64 + 1,
                title: new_course.title,
                description: new_course.description,
                teacher_id: new_course.teacher_id,
                category_id: new_course.category_id,
                start_date: new_course.start_date,
                duration_days: new_course.duration_days,
                created_at: new_course.created_at,
                updated_at: new_course.created_at,
            };
            rows.push(row.clone());
            Ok(row)
        }

        async fn update_course(&self, course: &Course) -> Result<Course, ServiceError> {
            *self.update_calls.lock().unwrap() += 1;
            let mut rows = self.courses.lock().unwrap();
            let slot = rows
                .iter_mut()
                .find(|c| c.id == course.id)
                .ok_or_else(|| ServiceError::not_found("Course", course.id))?;
            *slot = course.clone();
            Ok(course.clone())
        }
    }

    fn store_with_course() -> MemoryStore {
        let store = MemoryStore {
            users: vec![teacher(1, "prof"), teacher(4, "prof2"), user(2, "student")],
            categories: vec![category(1, "Programming"), category(2, "Math")],
            ..Default::default()
        };
        let mut seeded = course(1, 1, 1);
        seeded.title = "Old Title".to_string();
        seeded.duration_days = Some(60);
        store.courses.lock().unwrap().push(seeded);
        store
    }

    fn new_course(teacher_id: i64, category_id: i64) -> NewCourse {
        NewCourse {
            title: "Rust 101".to_string(),
            description: Some("Intro".to_string()),
            teacher_id,
            category_id,
            start_date: None,
            duration_days: Some(90),
            created_at: now(),
        }
    }

    #[tokio::test]
    async fn create_requires_teacher_role() {
        let store = store_with_course();

        let err = create_course(&store, new_course(2, 1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)), "got {err:?}");

        let created = create_course(&store, new_course(1, 1)).await.unwrap();
        assert_eq!(created.teacher_id, 1);
    }

    #[tokio::test]
    async fn create_resolves_category() {
        let store = store_with_course();

        let err = create_course(&store, new_course(1, 99)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn title_only_patch_changes_only_the_title() {
        let store = store_with_course();

        let patch = CoursePatch { title: Some("New Title".to_string()), ..Default::default() };
        let (updated, changed) = update_course(&store, 1, patch, now()).await.unwrap();

        assert!(changed);
        assert_eq!(updated.title, "New Title");
        assert_eq!(updated.teacher_id, 1);
        assert_eq!(updated.category_id, 1);
        assert_eq!(updated.start_date, None);
        assert_eq!(updated.duration_days, Some(60));
    }

    #[tokio::test]
    async fn empty_patch_is_a_no_op_without_save() {
        let store = store_with_course();

        let (unchanged, changed) =
            update_course(&store, 1, CoursePatch::default(), now()).await.unwrap();

        assert!(!changed);
        assert_eq!(unchanged.title, "Old Title");
        assert_eq!(store.update_calls(), 0);
    }

    #[tokio::test]
    async fn identical_values_do_not_trigger_save() {
        let store = store_with_course();

        let patch = CoursePatch {
            title: Some("Old Title".to_string()),
            duration_days: Some(60),
            teacher_id: Some(1),
            ..Default::default()
        };
        let (_, changed) = update_course(&store, 1, patch, now()).await.unwrap();

        assert!(!changed);
        assert_eq!(store.update_calls(), 0);
    }

    #[tokio::test]
    async fn reassigning_teacher_checks_role() {
        let store = store_with_course();

        let patch = CoursePatch { teacher_id: Some(2), ..Default::default() };
        let err = update_course(&store, 1, patch, now()).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
        assert_eq!(store.update_calls(), 0);

        let patch = CoursePatch { teacher_id: Some(4), ..Default::default() };
        let (updated, changed) = update_course(&store, 1, patch, now()).await.unwrap();
        assert!(changed);
        assert_eq!(updated.teacher_id, 4);
    }

    #[tokio::test]
    async fn unresolvable_foreign_key_aborts_before_any_write() {
        let store = store_with_course();

        let patch = CoursePatch {
            title: Some("Would Change".to_string()),
            category_id: Some(99),
            ..Default::default()
        };
        let err = update_course(&store, 1, patch, now()).await.unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(store.update_calls(), 0);
        let stored = store.find_course(1).await.unwrap().unwrap();
        assert_eq!(stored.title, "Old Title");
    }

    #[tokio::test]
    async fn update_missing_course_is_not_found() {
        let store = store_with_course();

        let err = update_course(&store, 42, CoursePatch::default(), now()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
