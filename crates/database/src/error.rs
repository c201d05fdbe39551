use core_types::CoreError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to connect to the database: {0}")]
    Connection(String),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Database query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("No entry with id {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error("An error occurred during JSON serialization/deserialization: {0}")]
    Serialization(#[from] serde_json::Error),
}
