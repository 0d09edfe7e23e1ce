//! Deterministic clock.

use parking_lot::Mutex;

use crate::port::outbound::Clock;

/// Clock pinned to a settable day.
#[derive(Debug)]
pub struct FixedClock {
    day: Mutex<String>,
}

impl FixedClock {
    pub fn new(day: impl Into<String>) -> Self {
        Self {
            day: Mutex::new(day.into()),
        }
    }

    /// Move the clock to another day.
    pub fn set(&self, day: impl Into<String>) {
        *self.day.lock() = day.into();
    }
}

impl Clock for FixedClock {
    fn today(&self) -> String {
        self.day.lock().clone()
    }
}
