//! Service-level error taxonomy.
//!
//! # Responsibility
//! - Give callers one distinguishable variant per failure kind so a calling
//!   layer can map each to a response without re-deriving business meaning.
//!
//! # Invariants
//! - Validation errors are raised before any storage access.
//! - Storage unique violations surface as `Duplicate`, never as `Storage`.

use crate::model::task::TaskValidationError;
use crate::model::user::UserValidationError;
use crate::repo::RepoError;
use crate::security::password::PasswordError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Entity kind named in service errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Task,
    User,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::User => "user",
        }
    }
}

/// Coarse failure classification for response mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    DuplicateEntity,
    NotFound,
    StorageFailure,
}

/// Errors returned by `TaskService` and `UserService`.
#[derive(Debug)]
pub enum ServiceError {
    /// Required argument is blank or malformed.
    Validation(String),
    /// A unique field would collide with an existing record.
    Duplicate {
        entity: EntityKind,
        field: String,
    },
    /// Lookup, update, or delete target does not exist.
    NotFound { entity: EntityKind, key: String },
    /// Storage collaborator failed.
    Storage(RepoError),
    /// Hashing collaborator failed.
    Credential(PasswordError),
}

impl ServiceError {
    pub(crate) fn duplicate(entity: EntityKind, field: impl Into<String>) -> Self {
        Self::Duplicate {
            entity,
            field: field.into(),
        }
    }

    pub(crate) fn not_found(entity: EntityKind, key: impl Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Classifies this error for callers mapping to transport responses.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Duplicate { .. } => ErrorKind::DuplicateEntity,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Storage(_) | Self::Credential(_) => ErrorKind::StorageFailure,
        }
    }

    /// Resolves a storage unique violation into a duplicate error for `entity`.
    pub(crate) fn from_repo(entity: EntityKind, err: RepoError) -> Self {
        match err {
            RepoError::UniqueViolation { column } => Self::duplicate(entity, column),
            RepoError::Validation(message) => Self::Validation(message),
            other => Self::Storage(other),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "validation failed: {message}"),
            Self::Duplicate { entity, field } => {
                write!(f, "{} with this {field} already exists", entity.as_str())
            }
            Self::NotFound { entity, key } => write!(f, "{} not found: {key}", entity.as_str()),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
            Self::Credential(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Credential(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for ServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<UserValidationError> for ServiceError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<PasswordError> for ServiceError {
    fn from(value: PasswordError) -> Self {
        Self::Credential(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
