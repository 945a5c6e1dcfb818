#![forbid(unsafe_code)]
#![warn(
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications
)]

//! # Capture league reference core
//!
//! Pure domain logic for deriving capture-the-flag league statistics from
//! recorded match timelines: the per-game event interpreter with its
//! regulation snapshot, the paused-game merger, the outcome classifier,
//! week/season stat rollups, the standings engine with its recursive
//! tie-breakers, playoff finish labels and the data-entry inference helpers.
//!
//! This crate performs no I/O. Timelines come in via [`timeline::Timeline`],
//! persistence of the derived values is the concern of downstream crates.

pub mod aggregate;
pub mod error;
pub mod ids;
pub mod infer;
pub mod interpreter;
pub mod merge;
pub mod outcome;
pub mod playoff;
pub mod standings;
pub mod stats;
pub mod time;
pub mod timeline;
pub mod utils;
pub mod week;

pub use crate::utils::date::Date;
