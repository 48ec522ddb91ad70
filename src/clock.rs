// Device-local clock seam

use chrono::{DateTime, Local, NaiveDate};

/// Source of device-local time. Date arithmetic throughout the crate goes
/// through this trait so calendar-day behavior is testable.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Current local calendar day.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// System wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to a single instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
