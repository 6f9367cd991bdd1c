use stainmanager_core::error::CoreError;
use stainmanager_core::query::QueryError;

/// Error returned by repository operations.
///
/// Domain failures (not found, validation, malformed queries) travel as
/// [`CoreError`]; storage failures are passed through untouched.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<QueryError> for RepoError {
    fn from(err: QueryError) -> Self {
        RepoError::Core(CoreError::InvalidQuery(err))
    }
}

impl From<validator::ValidationErrors> for RepoError {
    fn from(errors: validator::ValidationErrors) -> Self {
        RepoError::Core(errors.into())
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
