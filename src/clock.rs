//! Wall-clock timestamps and the countdown tick driver.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::debug;

/// Source of submission timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }
}

/// Emits a tick every `period` from a background tokio task until cancelled.
///
/// The ticker never touches exam state; its owner pulls ticks off the
/// channel and calls [`ExamSession::tick`](crate::ExamSession::tick) itself.
/// Must be started from inside a tokio runtime.
pub struct Ticker {
    task: JoinHandle<()>,
    ticks: mpsc::UnboundedReceiver<()>,
    cancelled: bool,
}

impl Ticker {
    pub fn start(period: Duration) -> Self {
        let (tx, ticks) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            // First tick fires one full period after start.
            let mut interval = time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tx.send(()).is_err() {
                    break;
                }
            }
        });

        Self {
            task,
            ticks,
            cancelled: false,
        }
    }

    pub fn every_second() -> Self {
        Self::start(Duration::from_secs(1))
    }

    /// Wait for the next tick. `None` once cancelled.
    pub async fn next(&mut self) -> Option<()> {
        self.ticks.recv().await
    }

    /// Drain ticks that arrived since the last call and return how many.
    pub fn take_pending(&mut self) -> usize {
        let mut count = 0;
        while self.ticks.try_recv().is_ok() {
            count += 1;
        }
        count
    }

    /// Stop the background task and drop any undelivered ticks.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.task.abort();
        self.ticks.close();
        let dropped = self.take_pending();
        self.cancelled = true;
        debug!(dropped, "ticker cancelled");
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// `MM:SS`, or `H:MM:SS` from one hour up.
pub fn format_remaining(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(59), "00:59");
        assert_eq!(format_remaining(2700), "45:00");
        assert_eq!(format_remaining(3599), "59:59");
        assert_eq!(format_remaining(3600), "1:00:00");
        assert_eq!(format_remaining(4500 + 7), "1:15:07");
    }

    #[test]
    fn test_fixed_clock() {
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(Clock::fixed(at).now(), at);
        assert_eq!(Clock::default(), Clock::System);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_emits_once_per_period() {
        let start = Instant::now();
        let mut ticker = Ticker::start(Duration::from_secs(1));

        for _ in 0..3 {
            assert_eq!(ticker.next().await, Some(()));
        }
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_take_pending_counts_backlog() {
        let mut ticker = Ticker::start(Duration::from_secs(1));
        assert_eq!(ticker.next().await, Some(()));

        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(ticker.take_pending(), 3);
        assert_eq!(ticker.take_pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let mut ticker = Ticker::start(Duration::from_secs(1));
        assert_eq!(ticker.next().await, Some(()));

        time::sleep(Duration::from_secs(2)).await;
        ticker.cancel();
        assert!(ticker.is_cancelled());
        assert_eq!(ticker.take_pending(), 0);
        assert_eq!(ticker.next().await, None);

        // Cancelling twice is harmless.
        ticker.cancel();
    }
}
