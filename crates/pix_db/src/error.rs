use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Schema error: {0}")]
    Schema(String),
}

// Postgres unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

impl DbError {
    /// Maps a driver error, turning unique-constraint violations into
    /// [`DbError::Conflict`].
    pub fn from_sqlx(e: sqlx::Error, conflict: &str) -> Self {
        let is_unique = e
            .as_database_error()
            .and_then(|d| d.code())
            .is_some_and(|code| code == UNIQUE_VIOLATION);
        if is_unique {
            DbError::Conflict(conflict.to_string())
        } else {
            DbError::Database(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
