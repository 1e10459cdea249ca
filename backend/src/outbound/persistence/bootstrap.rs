//! Startup schema creation.
//!
//! The service has a single table and no migration history; the table is
//! created if absent and otherwise left untouched.

use diesel_async::SimpleAsyncConnection;
use tracing::info;

use super::pool::{DbPool, PoolError};

const CREATE_TODOS: &str = "\
CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id TEXT NOT NULL,
    description TEXT NOT NULL CHECK (length(description) > 0),
    completed BOOLEAN NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS todos_owner_id_idx ON todos (owner_id, id);";

/// Errors raised while preparing the schema at startup.
#[derive(Debug, thiserror::Error)]
pub enum SchemaBootstrapError {
    /// No connection could be obtained.
    #[error(transparent)]
    Pool(#[from] PoolError),
    /// A DDL statement failed.
    #[error("failed to create todo schema: {0}")]
    Statement(#[from] diesel::result::Error),
}

/// Create the `todos` table and its owner index if they do not exist.
///
/// Idempotent; existing rows are preserved.
pub async fn ensure_schema(pool: &DbPool) -> Result<(), SchemaBootstrapError> {
    let mut conn = pool.get().await?;
    conn.batch_execute(CREATE_TODOS).await?;
    info!("todo schema ready");
    Ok(())
}
