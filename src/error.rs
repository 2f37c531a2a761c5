use rusqlite::ffi;
use thiserror::Error;

/// Errors surfaced by the data-access and reporting layer.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("No data for {report} in {year}")]
    EmptyResult { report: &'static str, year: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A row did not have the columns or types the mapper expected
    #[error("Row mapping failed: {0}")]
    Mapping(String),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Database error: {0}")]
    Store(rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;

impl DbError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        DbError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, message) = &err {
            let detail = message.clone().unwrap_or_else(|| code.to_string());
            match code.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return DbError::DuplicateKey(detail)
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return DbError::ForeignKeyViolation(detail),
                ffi::SQLITE_CONSTRAINT_CHECK | ffi::SQLITE_CONSTRAINT_NOTNULL => {
                    return DbError::InvalidInput(detail)
                }
                _ => {}
            }
        }

        match err {
            rusqlite::Error::InvalidColumnName(_)
            | rusqlite::Error::InvalidColumnIndex(_)
            | rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::IntegralValueOutOfRange(..) => DbError::Mapping(err.to_string()),
            other => DbError::Store(other),
        }
    }
}
