use chrono::{DateTime, Utc};

/// Source of the wall-clock timestamp stamped on a `Minted` row.
///
/// Injected into the generator's constructor rather than called as a bare
/// `Utc::now()` inline, so tests can pin `created_at` and reproduce a
/// duplicate-mint scenario exactly.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock: the actual system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test clock returning a fixed instant, set at construction.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
