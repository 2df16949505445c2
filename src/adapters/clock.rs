use crate::core::Clock;
use chrono::{Local, NaiveDateTime};

/// Local wall clock; alert timestamps are read in the operator's timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
