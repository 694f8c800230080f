//! Storage collaborator contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define find/save/delete contracts per entity type.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes validate records before SQL mutations.
//! - Unique constraints live in storage; a violation surfaces as
//!   `RepoError::UniqueViolation` instead of a raw SQLite error.

use crate::db::DbError;
use crate::model::task::TaskValidationError;
use crate::model::user::UserValidationError;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod task_repo;
pub mod user_repo;

const UNIQUE_FAILED_PREFIX: &str = "UNIQUE constraint failed: ";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Record failed field validation before write.
    Validation(String),
    /// Transport or schema failure from the database layer.
    Db(DbError),
    /// A storage-level unique index rejected the write.
    UniqueViolation { column: String },
    /// Write target id does not exist.
    NotFound(i64),
    /// Persisted row cannot be mapped back to a valid record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "{message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UniqueViolation { column } => write!(f, "unique constraint failed on `{column}`"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<UserValidationError> for RepoError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if let Some(column) = unique_violation_column(&value) {
            return Self::UniqueViolation { column };
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Extracts `column` from `UNIQUE constraint failed: table.column`.
fn unique_violation_column(err: &rusqlite::Error) -> Option<String> {
    let rusqlite::Error::SqliteFailure(failure, Some(message)) = err else {
        return None;
    };
    if failure.code != ErrorCode::ConstraintViolation {
        return None;
    }
    let target = message.strip_prefix(UNIQUE_FAILED_PREFIX)?;
    let first = target.split(',').next().unwrap_or(target).trim();
    let column = first.rsplit('.').next().unwrap_or(first);
    Some(column.to_string())
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::RepoError;
    use rusqlite::ffi;

    fn constraint_error(message: &str) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(
            ffi::Error::new(ffi::SQLITE_CONSTRAINT_UNIQUE),
            Some(message.to_string()),
        )
    }

    #[test]
    fn unique_failure_maps_to_column_name() {
        let err = RepoError::from(constraint_error("UNIQUE constraint failed: users.email"));
        assert!(matches!(err, RepoError::UniqueViolation { column } if column == "email"));
    }

    #[test]
    fn other_constraint_failures_stay_db_errors() {
        let err = RepoError::from(constraint_error("CHECK constraint failed: completed"));
        assert!(matches!(err, RepoError::Db(_)));
    }

    #[test]
    fn non_constraint_errors_stay_db_errors() {
        let err = RepoError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, RepoError::Db(_)));
    }
}
