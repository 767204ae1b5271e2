use std::sync::RwLock;

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Source of wall-clock time for validity windows and delivery estimates.
///
/// Everything is expressed in UTC.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a given instant, moved only when told to.
#[derive(Debug)]
pub struct FixedClock {
    at: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at: RwLock::new(at) }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        let mut guard = self.at.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.at.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.at.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
