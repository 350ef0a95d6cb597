use async_trait::async_trait;
use time::PrimitiveDateTime;

use crate::db::models::{Course, Enrollment, User};
use crate::db::types::EnrollmentStatus;
use crate::repositories;
use crate::services::error::{map_unique_violation, ServiceError};

pub(crate) const ALREADY_ENROLLED: &str = "User is already enrolled in this course.";

#[derive(Debug)]
pub(crate) struct NewEnrollment {
    pub(crate) user_id: i64,
    pub(crate) course_id: i64,
    pub(crate) enroll_date: PrimitiveDateTime,
    pub(crate) status: EnrollmentStatus,
}

/// Data access needed by the enrollment guard.
#[async_trait]
pub(crate) trait EnrollmentStore: Send + Sync {
    async fn find_user(&self, user_id: i64) -> Result<Option<User>, ServiceError>;
    async fn find_course(&self, course_id: i64) -> Result<Option<Course>, ServiceError>;
    async fn enrollment_exists(&self, user_id: i64, course_id: i64) -> Result<bool, ServiceError>;
    async fn find_enrollment(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>, ServiceError>;
    /// Must report a duplicate (user, course) pair as `AlreadyExists`. The
    /// Postgres implementation gets this from the unique pair constraint.
    async fn insert_enrollment(
        &self,
        enrollment: NewEnrollment,
    ) -> Result<Enrollment, ServiceError>;
    async fn delete_enrollment(&self, enrollment: &Enrollment) -> Result<(), ServiceError>;
}

pub(crate) async fn is_enrolled<S: EnrollmentStore>(
    store: &S,
    user_id: i64,
    course_id: i64,
) -> Result<bool, ServiceError> {
    store.enrollment_exists(user_id, course_id).await
}

pub(crate) async fn enroll<S: EnrollmentStore>(
    store: &S,
    user_id: i64,
    course_id: i64,
    now: PrimitiveDateTime,
) -> Result<Enrollment, ServiceError> {
    let user = store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User", user_id))?;

    let course = store
        .find_course(course_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Course", course_id))?;

    if store.enrollment_exists(user.id, course.id).await? {
        tracing::warn!(user_id, course_id, "Duplicate enrollment attempt");
        return Err(ServiceError::AlreadyExists(ALREADY_ENROLLED.to_string()));
    }

    let saved = store
        .insert_enrollment(NewEnrollment {
            user_id: user.id,
            course_id: course.id,
            enroll_date: now,
            status: EnrollmentStatus::Active,
        })
        .await?;

    tracing::info!(user_id, course_id, enrollment_id = saved.id, "User enrolled");
    Ok(saved)
}

pub(crate) async fn unenroll<S: EnrollmentStore>(
    store: &S,
    user_id: i64,
    course_id: i64,
) -> Result<(), ServiceError> {
    let enrollment = store.find_enrollment(user_id, course_id).await?.ok_or_else(|| {
        ServiceError::NotFound(format!(
            "Enrollment not found for User ID={user_id} and Course ID={course_id}"
        ))
    })?;

    store.delete_enrollment(&enrollment).await?;

    tracing::info!(user_id, course_id, enrollment_id = enrollment.id, "User unenrolled");
    Ok(())
}

#[async_trait]
impl EnrollmentStore for sqlx::PgPool {
    async fn find_user(&self, user_id: i64) -> Result<Option<User>, ServiceError> {
        Ok(repositories::users::find_by_id(self, user_id).await?)
    }

    async fn find_course(&self, course_id: i64) -> Result<Option<Course>, ServiceError> {
        Ok(repositories::courses::find_by_id(self, course_id).await?)
    }

    async fn enrollment_exists(&self, user_id: i64, course_id: i64) -> Result<bool, ServiceError> {
        Ok(repositories::enrollments::exists(self, user_id, course_id).await?)
    }

    async fn find_enrollment(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>, ServiceError> {
        Ok(repositories::enrollments::find_by_user_course(self, user_id, course_id).await?)
    }

    async fn insert_enrollment(
        &self,
        enrollment: NewEnrollment,
    ) -> Result<Enrollment, ServiceError> {
        repositories::enrollments::create(
            self,
            repositories::enrollments::CreateEnrollment {
                user_id: enrollment.user_id,
                course_id: enrollment.course_id,
                enroll_date: enrollment.enroll_date,
                status: enrollment.status,
            },
        )
        .await
        .map_err(|err| map_unique_violation(err, ALREADY_ENROLLED))
    }

    async fn delete_enrollment(&self, enrollment: &Enrollment) -> Result<(), ServiceError> {
        repositories::enrollments::delete(self, enrollment.id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::services::test_fixtures::{course, now, user};

    #[derive(Default)]
    struct MemoryStore {
        users: Vec<User>,
        courses: Vec<Course>,
        enrollments: Mutex<Vec<Enrollment>>,
        next_id: Mutex<i64>,
    }

    impl MemoryStore {
        fn with(users: Vec<User>, courses: Vec<Course>) -> Self {
            Self { users, courses, next_id: Mutex::new(1), ..Default::default() }
        }
    }

    #[async_trait]
    impl EnrollmentStore for MemoryStore {
        async fn find_user(&self, user_id: i64) -> Result<Option<User>, ServiceError> {
            Ok(self.users.iter().find(|u| u.id == user_id).cloned())
        }

        async fn find_course(&self, course_id: i64) -> Result<Option<Course>, ServiceError> {
            Ok(self.courses.iter().find(|c| c.id == course_id).cloned())
        }

        async fn enrollment_exists(
            &self,
            user_id: i64,
            course_id: i64,
        ) -> Result<bool, ServiceError> {
            let rows = self.enrollments.lock().unwrap();
            Ok(rows.iter().any(|e| e.user_id == user_id && e.course_id == course_id))
        }

        async fn find_enrollment(
            &self,
            user_id: i64,
            course_id: i64,
        ) -> Result<Option<Enrollment>, ServiceError> {
            let rows = self.enrollments.lock().unwrap();
            Ok(rows.iter().find(|e| e.user_id == user_id && e.course_id == course_id).cloned())
        }

        async fn insert_enrollment(
            &self,
            enrollment: NewEnrollment,
        ) -> Result<Enrollment, ServiceError> {
            let mut rows = self.enrollments.lock().unwrap();
            // Mirrors the unique (user_id, course_id) constraint.
            if rows
                .iter()
                .any(|e| e.user_id == enrollment.user_id && e.course_id == enrollment.course_id)
            {
                return Err(ServiceError::AlreadyExists(ALREADY_ENROLLED.to_string()));
            }
            let mut next_id = self.next_id.lock().unwrap();
            let row = Enrollment {
                id: *next_id,
                user_id: enrollment.user_id,
                course_id: enrollment.course_id,
                enroll_date: enrollment.enroll_date,
                status: enrollment.status,
            };
            *next_id += 1;
            rows.push(row.clone());
            Ok(row)
        }

        async fn delete_enrollment(&self, enrollment: &Enrollment) -> Result<(), ServiceError> {
            let mut rows = self.enrollments.lock().unwrap();
            rows.retain(|e| e.id != enrollment.id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn enroll_creates_active_enrollment() {
        let store = MemoryStore::with(vec![user(7, "s7")], vec![course(3, 1, 1)]);

        let enrollment = enroll(&store, 7, 3, now()).await.unwrap();

        assert_eq!(enrollment.user_id, 7);
        assert_eq!(enrollment.course_id, 3);
        assert_eq!(enrollment.status, EnrollmentStatus::Active);
        assert!(is_enrolled(&store, 7, 3).await.unwrap());
    }

    #[tokio::test]
    async fn second_enroll_for_same_pair_fails() {
        let store = MemoryStore::with(vec![user(7, "s7")], vec![course(3, 1, 1)]);

        enroll(&store, 7, 3, now()).await.unwrap();
        let err = enroll(&store, 7, 3, now()).await.unwrap_err();

        assert!(matches!(err, ServiceError::AlreadyExists(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn enroll_unenroll_reenroll_cycle() {
        let store = MemoryStore::with(vec![user(7, "s7")], vec![course(3, 1, 1)]);

        enroll(&store, 7, 3, now()).await.unwrap();
        let err = enroll(&store, 7, 3, now()).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists(_)));

        unenroll(&store, 7, 3).await.unwrap();
        assert!(!is_enrolled(&store, 7, 3).await.unwrap());

        enroll(&store, 7, 3, now()).await.unwrap();
        assert!(is_enrolled(&store, 7, 3).await.unwrap());
    }

    #[tokio::test]
    async fn enroll_missing_user_or_course_is_not_found() {
        let store = MemoryStore::with(vec![user(7, "s7")], vec![course(3, 1, 1)]);

        let err = enroll(&store, 99, 3, now()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = enroll(&store, 7, 99, now()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        assert!(!is_enrolled(&store, 7, 3).await.unwrap());
    }

    #[tokio::test]
    async fn unenroll_without_enrollment_is_not_found() {
        let store = MemoryStore::with(vec![user(7, "s7")], vec![course(3, 1, 1)]);

        let err = unenroll(&store, 7, 3).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn constraint_backstop_surfaces_already_exists() {
        let store = MemoryStore::with(vec![user(7, "s7")], vec![course(3, 1, 1)]);

        // A concurrent request slipped a row in between check and insert.
        store
            .insert_enrollment(NewEnrollment {
                user_id: 7,
                course_id: 3,
                enroll_date: now(),
                status: EnrollmentStatus::Active,
            })
            .await
            .unwrap();

        let err = store
            .insert_enrollment(NewEnrollment {
                user_id: 7,
                course_id: 3,
                enroll_date: now(),
                status: EnrollmentStatus::Active,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists(_)));
    }
}
