//! Progress-message rotation.
//!
//! [`ProgressTicker`] owns the rotation index; nothing else reads or writes
//! it. The run driver awaits [`ProgressTicker::next`] alongside the poll
//! loop, so rotation keeps its own cadence while a status query is in
//! flight and never influences poll timing.

use std::time::Duration;

use promo_core::progress::{message_at, PROGRESS_MESSAGES};
use tokio::time::{Instant, Interval, MissedTickBehavior};

pub struct ProgressTicker {
    interval: Interval,
    index: usize,
}

impl ProgressTicker {
    /// Start at the first message; the first rotation happens one `period`
    /// from now.
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval, index: 0 }
    }

    /// Message currently displayed.
    pub fn current(&self) -> &'static str {
        message_at(self.index)
    }

    /// Wait for the next rotation and return the new message.
    ///
    /// Cancel safe: dropping the future before it completes leaves the
    /// index untouched.
    pub async fn next(&mut self) -> &'static str {
        self.interval.tick().await;
        self.index = (self.index + 1) % PROGRESS_MESSAGES.len();
        message_at(self.index)
    }
}
