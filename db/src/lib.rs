//! # Persistence layer
//!
//! SQLite storage for the league reference: entity rows, the per-game stat
//! records the interpreter produces, the week/season rollups and the
//! standings output. All writes that belong to one game happen inside a
//! single transaction; rollups and standings are fully overwriting upserts,
//! so every operation here is safe to re-run.
pub mod games;
pub mod import;
pub mod models;
pub mod players;
pub mod pool;
pub mod standings;
pub mod stats;
pub mod teams;

use clr_core::ids::GameId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Missing 'DATABASE_URL'")]
    DbUrlMissing,
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("No game with id {0}")]
    GameNotFound(GameId),
    #[error("Could you be more specific: {0}")]
    Generic(String),
}
