//! Postgres connection pool construction and migration running.

use shared_error::AppError;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::ConnectOptions;
use std::str::FromStr;
use std::time::Duration;

/// Initialize the database connection pool, with a server-side statement
/// timeout applied to every connection so a stuck lock cannot block traffic
/// indefinitely (§5).
pub async fn init_pool(
    database_url: &str,
    max_connections: u32,
    statement_timeout_ms: u64,
) -> Result<sqlx::PgPool, AppError> {
    let mut connect_options = PgConnectOptions::from_str(database_url)
        .map_err(|e| AppError::Internal(format!("invalid DATABASE_URL: {e}")))?;
    connect_options = connect_options.log_statements(tracing::log::LevelFilter::Debug);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                sqlx::query(&format!(
                    "SET statement_timeout = {}",
                    statement_timeout_ms
                ))
                .execute(conn)
                .await?;
                Ok(())
            })
        })
        .connect_with(connect_options)
        .await
        .map_err(|e| AppError::Internal(format!("failed to connect to database: {e}")))?;

    Ok(pool)
}

/// Run pending migrations. The migration *tool* itself is an external
/// collaborator per spec.md §1; running the migrations embedded in this
/// binary at boot is ambient operational texture, not the tool.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), AppError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::Internal(format!("migration failed: {e}")))?;
    Ok(())
}
