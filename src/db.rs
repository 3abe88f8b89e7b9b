use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Layout of every timestamp stored in the database. Consumers parse these
/// strings, so the pattern is fixed.
const STAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Wall-clock timestamp in the stored `YYYY-MM-DD HH:MM:SS` layout. Local
/// time when the offset is known, UTC otherwise.
pub fn now_stamp() -> String {
    let now = OffsetDateTime::now_utc();
    let local = UtcOffset::current_local_offset()
        .map(|offset| now.to_offset(offset))
        .unwrap_or(now);
    local
        .format(&STAMP_FORMAT)
        .expect("static timestamp format is well-formed")
}

pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .context("parse DATABASE_URL")?
        .create_if_missing(true);
    let db = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
        .context("connect to database")?;
    Ok(db)
}

/// Create the schema if missing and bring old databases up to date. Safe to
/// re-run: table creation is conditional and column additions tolerate the
/// column already existing.
pub async fn init_schema(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            password TEXT NOT NULL,
            age INTEGER,
            gender TEXT,
            language TEXT
        )
        "#,
    )
    .execute(db)
    .await
    .context("create users table")?;

    // ALTER TABLE has no IF NOT EXISTS; a duplicate-column failure means a
    // previous run already added the column.
    for column in ["account_created", "last_login", "last_profile_update"] {
        let stmt = format!("ALTER TABLE users ADD COLUMN {column} TEXT");
        if let Err(e) = sqlx::query(&stmt).execute(db).await {
            tracing::debug!(column, error = %e, "timestamp column already present");
        }
    }

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS query_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT,
            user_message TEXT,
            bot_response TEXT,
            timestamp TEXT
        )
        "#,
    )
    .execute(db)
    .await
    .context("create query_log table")?;

    Ok(())
}
