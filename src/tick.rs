use std::time::Duration;

use chrono::{DateTime, TimeZone};

/// Delay from `now` to the next wall-clock second boundary.
///
/// Sleeping fixed 1000ms intervals drifts; realigning every cycle keeps the
/// displayed time flipping right on the boundary.
pub fn until_next_second<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    // chrono reports up to 1999 subsec millis during a leap second.
    let ms = u64::from(now.timestamp_subsec_millis());
    Duration::from_millis(1000u64.saturating_sub(ms).max(1))
}

/// Gates refresh-cycle work to once per wall-clock second.
///
/// The UI repaints on every input event as well as on the timer, so anything
/// with once-per-cycle semantics (the exit-control decay) must not run per
/// repaint.
#[derive(Default)]
pub struct SecondTicker {
    last_second: Option<i64>,
}

impl SecondTicker {
    /// True at most once for any given unix second.
    pub fn advance<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> bool {
        let second = now.timestamp();
        if self.last_second == Some(second) {
            false
        } else {
            self.last_second = Some(second);
            true
        }
    }
}
