//! SQLite pool setup
//!
//! The database location comes from the `DATABASE_URL` environment variable
//! (a `.env` file is honoured). The schema script only contains
//! `IF NOT EXISTS` statements, so it runs unconditionally on every startup.
//! Foreign keys are switched on: the stat tables hang off gamelogs and
//! player seasons, and a dangling stat row would silently corrupt rollups.
use crate::DbError;
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::env;
use std::str::FromStr;

const SCHEMA: &str = include_str!("../sqlx_migrations/001_create_tables.sql");

/// Open the league database, creating file and schema when absent.
pub async fn create_pool() -> Result<SqlitePool, DbError> {
    dotenv().ok();
    let database_url = env::var("DATABASE_URL").map_err(|_| DbError::DbUrlMissing)?;
    let options = SqliteConnectOptions::from_str(&database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(options).await?;
    sqlx::query(SCHEMA).execute(&pool).await?;
    Ok(pool)
}
