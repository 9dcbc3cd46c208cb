//! Shared helpers for unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock pinned to 7 March 2025, midday local time.
pub struct FixtureClock {
    now: DateTime<Local>,
}

impl FixtureClock {
    /// Clock pinned to the given local date at midday.
    ///
    /// # Panics
    /// Panics when the date does not exist in the local time zone.
    #[must_use]
    pub fn at(year: i32, month: u32, day: u32) -> Self {
        let now = Local
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .expect("fixture timestamp is valid");
        Self { now }
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.now
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now.with_timezone(&Utc)
    }
}

/// Shared fixture clock.
pub fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock::at(2025, 3, 7))
}

/// Build an owned row from string slices.
pub fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| (*cell).to_owned()).collect()
}
