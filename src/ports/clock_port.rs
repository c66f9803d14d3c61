//! Time source port trait.

use chrono::{DateTime, Utc};

/// Supplies the default `as_of` for windowed queries. Callers read it once per
/// computation so every instrument is valued at the same instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}
