//! Database Module
//!
//! SQLite connection pool and embedded migrations.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::DatabaseSettings;

/// URL selecting a private in-memory database.
pub const MEMORY_URL: &str = "sqlite::memory:";

static MEMDB_COUNTER: AtomicU64 = AtomicU64::new(0);

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a SQLite connection pool.
///
/// `sqlite::memory:` gets a uniquely named shared-cache database per call,
/// held open by a single connection that never idles out, so parallel tests
/// do not see each other's tables.
pub async fn create_pool(settings: &DatabaseSettings) -> Result<SqlitePool, sqlx::Error> {
    if settings.url == MEMORY_URL || settings.url == ":memory:" {
        let id = MEMDB_COUNTER.fetch_add(1, Ordering::Relaxed);
        let options = SqliteConnectOptions::new()
            .filename(format!(
                "file:entitycoll-memdb-{}-{}?mode=memory&cache=shared",
                std::process::id(),
                id
            ))
            .shared_cache(true)
            .create_if_missing(true)
            .foreign_keys(true);

        return SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await;
    }

    let options = SqliteConnectOptions::from_str(&settings.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(options)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations checked/applied");
    Ok(())
}
