//! Cancellable repeating tick timer

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// A repeating timer whose period can be swapped out
///
/// A stopped scheduler never fires. Every (re)start drops the old timer
/// first, so at most one timer is live at a time.
#[derive(Debug)]
pub struct TickScheduler {
    timer: Option<Interval>,
    period: Duration,
}

impl TickScheduler {
    /// Create a stopped scheduler
    pub fn new(period: Duration) -> Self {
        Self {
            timer: None,
            period,
        }
    }

    /// Start (or restart) ticking; the first tick comes one period from now
    pub fn start(&mut self) {
        self.stop();
        let mut timer = interval_at(Instant::now() + self.period, self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.timer = Some(timer);
    }

    pub fn stop(&mut self) {
        self.timer = None;
    }

    /// Change the period; a running timer is restarted at the new period
    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
        if self.is_running() {
            self.start();
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Wait for the next tick; pends forever while stopped
    pub async fn tick(&mut self) {
        match self.timer.as_mut() {
            Some(timer) => {
                timer.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
