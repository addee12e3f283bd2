//! Creation-time lifecycle hook.
//!
//! # Responsibility
//! - Stamp records at the moment they are first written.
//!
//! # Invariants
//! - `pre_persist` runs on every insert path, batch inserts included.
//! - `pre_persist` never runs on update paths.

use std::time::{SystemTime, UNIX_EPOCH};

/// Hook invoked by repositories right before a record is inserted.
pub trait PrePersist {
    fn pre_persist(&mut self, now_epoch_ms: i64);
}

/// Current wall-clock time as Unix epoch milliseconds.
///
/// Clocks set before 1970 report `0`.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
