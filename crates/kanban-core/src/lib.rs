//! Foundational low-level utilities shared across kanban report crates.
//!
//! Provides the atomic file-write helper used to persist rendered reports and
//! the day-offset arithmetic that every lookback window is measured with.

pub mod atomic_io;
pub mod time_utils;

pub use atomic_io::write_text_atomic;
pub use time_utils::{
    current_unix_timestamp, parse_rfc3339_utc, signed_day_offset, MILLIS_PER_DAY,
};
