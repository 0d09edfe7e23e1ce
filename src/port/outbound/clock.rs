//! Calendar source for quota day boundaries.

use crate::domain::utc_today;

/// Supplies the current UTC day as `YYYY-MM-DD`.
pub trait Clock: Send + Sync {
    fn today(&self) -> String;
}

/// Wall-clock implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> String {
        utc_today()
    }
}
