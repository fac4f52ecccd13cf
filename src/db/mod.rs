pub(crate) mod models;
pub(crate) mod types;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};

use crate::core::config::Settings;

pub(crate) async fn init_pool(settings: &Settings) -> anyhow::Result<SqlitePool> {
    connect(settings.database().database_url()).await
}

pub(crate) async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .disable_statement_logging();

    // An in-memory database exists per connection; a multi-connection pool
    // would hand out empty databases.
    let max_connections = if database_url.contains(":memory:") { 1 } else { 16 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await?;

    Ok(pool)
}

pub(crate) async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
