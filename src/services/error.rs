use thiserror::Error;

/// Error taxonomy shared by the service layer. Each variant maps to exactly
/// one HTTP status at the boundary, so callers can branch on kind alone.
#[derive(Debug, Error)]
pub(crate) enum ServiceError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    AlreadyExists(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    pub(crate) fn not_found(entity: &str, id: i64) -> Self {
        Self::NotFound(format!("{entity} not found: ID={id}"))
    }
}

/// Maps a unique-constraint violation to `AlreadyExists`; everything else
/// stays a database error. The unique pair constraints on enrollments and
/// submissions make this the backstop for concurrent duplicate inserts that
/// slip past the application-level existence check.
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> ServiceError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return ServiceError::AlreadyExists(message.to_string());
        }
    }
    ServiceError::Database(err)
}

#[cfg(test)]
mod tests {
    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug)]
    struct FakeDbError {
        unique: bool,
    }

    impl std::fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.message())
        }
    }

    impl std::error::Error for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            if self.unique {
                "duplicate key value violates unique constraint"
            } else {
                "deadlock detected"
            }
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::Other
            }
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    // Both insert and update paths lean on this mapping to turn a duplicate
    // (student, assignment) or (user, course) pair into a 409 instead of a 500.
    #[test]
    fn unique_violation_becomes_already_exists() {
        let err = sqlx::Error::Database(Box::new(FakeDbError { unique: true }));

        let mapped = map_unique_violation(err, "pair already taken");

        assert!(
            matches!(mapped, ServiceError::AlreadyExists(ref m) if m == "pair already taken"),
            "got {mapped:?}"
        );
    }

    #[test]
    fn other_database_errors_pass_through() {
        let err = sqlx::Error::Database(Box::new(FakeDbError { unique: false }));

        let mapped = map_unique_violation(err, "pair already taken");

        assert!(matches!(mapped, ServiceError::Database(_)), "got {mapped:?}");
    }
}
