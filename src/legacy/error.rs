use std::path::PathBuf;

use sea_orm::{DbErr, SqlErr, TransactionError};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Legacy database not found at path: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("No users found. At least one user is required to own the imported records.")]
    NoOwnerAvailable,

    /// A uniqueness or referential constraint failed mid-rewrite; the whole
    /// transaction was rolled back.
    #[error("Constraint violation during import: {0}")]
    ConstraintViolation(String),

    #[error("Database error during import: {0}")]
    Database(#[source] DbErr),
}

impl From<DbErr> for ImportError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(
                SqlErr::UniqueConstraintViolation(msg)
                | SqlErr::ForeignKeyConstraintViolation(msg),
            ) => Self::ConstraintViolation(msg),
            _ => Self::Database(err),
        }
    }
}

impl From<TransactionError<Self>> for ImportError {
    fn from(err: TransactionError<Self>) -> Self {
        match err {
            TransactionError::Connection(db) => Self::from(db),
            TransactionError::Transaction(inner) => inner,
        }
    }
}
