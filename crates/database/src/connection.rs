use crate::error::DbError;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::env;
use std::time::Duration;

/// Reads the connection string from `var`, after loading a `.env` file if one
/// exists.
pub fn database_url(var: &str) -> Result<String, DbError> {
    // A missing .env file is fine; the variable may come from the environment.
    let _ = dotenvy::dotenv();

    env::var(var).map_err(|_| DbError::Connection(format!("{var} must be set")))
}

/// Establishes a connection pool to the PostgreSQL database.
///
/// The pool can be shared across the entire application.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .map_err(|e| DbError::Connection(e.to_string()))?;

    tracing::info!(max_connections, "Connected to PostgreSQL");
    Ok(pool)
}

/// Applies the embedded migrations, creating the `entries` table and its
/// change-notification trigger.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
