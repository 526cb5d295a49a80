//! Database pool and migrations.

use crate::config::CoreConfig;
use crate::constants::{DB_ACQUIRE_TIMEOUT, MAX_DB_CONNECTIONS};
use crate::PromptDeskResult;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

pub use sqlx::sqlite::SqlitePool;

/// Open the configured SQLite database and apply pending migrations.
///
/// The database file is created if missing. An in-memory URL (`sqlite::memory:`) is pinned to a
/// single long-lived connection, since every SQLite connection to `:memory:` is a separate
/// database.
pub async fn connect(cfg: &CoreConfig) -> PromptDeskResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(cfg.database_url())?
        .create_if_missing(true)
        .foreign_keys(true);

    let in_memory = cfg.database_url().contains(":memory:");
    let mut pool_options = SqlitePoolOptions::new().acquire_timeout(DB_ACQUIRE_TIMEOUT);
    pool_options = if in_memory {
        pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(MAX_DB_CONNECTIONS)
    };

    let pool = pool_options.connect_with(options).await?;
    run_migrations(&pool).await?;

    info!(database_url = %cfg.database_url(), "database ready");
    Ok(pool)
}

/// Apply the embedded migrations from `crates/core/migrations`.
pub async fn run_migrations(pool: &SqlitePool) -> PromptDeskResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::temp_pool;

    #[tokio::test]
    async fn test_connect_creates_schema() {
        let (_dir, pool) = temp_pool().await;

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('drafts', 'prompts', 'settings') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .expect("query should succeed");

        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        assert_eq!(names, vec!["drafts", "prompts", "settings"]);
    }

    #[tokio::test]
    async fn test_run_migrations_is_repeatable() {
        let (_dir, pool) = temp_pool().await;
        super::run_migrations(&pool)
            .await
            .expect("second migration run should be a no-op");
    }
}
