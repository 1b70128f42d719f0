//! esb-db
//!
//! Postgres access for the betting feed: connection/migration helpers, the
//! [`FeedStore`] data-access trait the synchronizers are written against,
//! and its production implementation [`PgStore`].
//!
//! The in-memory implementation used by scenario tests lives in
//! `esb-testkit`.

mod pg;
mod store;

pub use pg::PgStore;
pub use store::{EventStage, FeedStore};

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub const ENV_DB_URL: &str = "ESB_DATABASE_URL";

/// Connect a pool to the given Postgres URL.
pub async fn connect(url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(url)
        .await
        .context("failed to connect to Postgres")?;

    Ok(pool)
}

/// Connect to Postgres using ESB_DATABASE_URL.
pub async fn connect_from_env() -> Result<PgPool> {
    let url =
        std::env::var(ENV_DB_URL).with_context(|| format!("missing env var {ENV_DB_URL}"))?;

    connect(&url).await
}

/// Run embedded SQLx migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("db migrate failed")?;
    Ok(())
}

/// Simple status query (connectivity + schema presence).
pub async fn status(pool: &PgPool) -> Result<DbStatus> {
    let (one,): (i32,) = sqlx::query_as::<_, (i32,)>("select 1")
        .fetch_one(pool)
        .await
        .context("status connectivity query failed")?;

    let (exists,): (bool,) = sqlx::query_as::<_, (bool,)>(
        r#"
        select exists (
            select 1
            from information_schema.tables
            where table_schema='public' and table_name='pools'
        )
        "#,
    )
    .fetch_one(pool)
    .await
    .context("status table-exists query failed")?;

    Ok(DbStatus {
        ok: one == 1,
        has_schema: exists,
    })
}

#[derive(Debug, Clone)]
pub struct DbStatus {
    pub ok: bool,
    pub has_schema: bool,
}
