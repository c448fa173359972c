//! Periodic tick sources.
//!
//! Two streams drive a session: a fast countdown tick (once a second) and
//! a slow clock tick (once a minute, aligned to the minute boundary). Both
//! are cancellable, and starting a stream always cancels the previous one
//! first, so ticks never stack.

use std::time::Duration;

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tick {
    /// Countdown resolution tick.
    Second,
    /// Wall-clock refresh tick.
    Minute,
}

/// Something that can start and cancel the periodic streams.
pub trait TickScheduler {
    /// (Re)start the countdown stream, cancelling any pending one.
    fn start_countdown_ticks(&mut self);
    fn cancel_countdown_ticks(&mut self);
    /// (Re)start the clock-refresh stream.
    fn start_clock_ticks(&mut self);
    fn cancel_clock_ticks(&mut self);
}

/// Tokio-backed scheduler that feeds ticks into a channel.
///
/// Must be used from within a tokio runtime. The receiving side is drained
/// by the single task that owns the session.
#[derive(Debug)]
pub struct TokioTicker {
    tx: UnboundedSender<Tick>,
    countdown_period: Duration,
    clock_period: Duration,
    countdown: Option<JoinHandle<()>>,
    clock: Option<JoinHandle<()>>,
}

impl TokioTicker {
    pub fn new(
        tx: UnboundedSender<Tick>,
        countdown_period: Duration,
        clock_period: Duration,
    ) -> Self {
        Self {
            tx,
            countdown_period,
            clock_period,
            countdown: None,
            clock: None,
        }
    }

    pub fn is_counting_down(&self) -> bool {
        self.countdown.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn spawn(&self, tick: Tick, first: Instant, period: Duration) -> JoinHandle<()> {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let mut interval = interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                trace!(?tick, "tick");
                if tx.send(tick).is_err() {
                    // Receiver gone; nobody left to tick.
                    break;
                }
            }
        })
    }
}

impl TickScheduler for TokioTicker {
    fn start_countdown_ticks(&mut self) {
        self.cancel_countdown_ticks();
        let period = self.countdown_period;
        self.countdown = Some(self.spawn(Tick::Second, Instant::now() + period, period));
    }

    fn cancel_countdown_ticks(&mut self) {
        if let Some(handle) = self.countdown.take() {
            handle.abort();
        }
    }

    fn start_clock_ticks(&mut self) {
        self.cancel_clock_ticks();
        let delay = until_next_minute(chrono::Local::now().time());
        let period = self.clock_period;
        self.clock = Some(self.spawn(Tick::Minute, Instant::now() + delay, period));
    }

    fn cancel_clock_ticks(&mut self) {
        if let Some(handle) = self.clock.take() {
            handle.abort();
        }
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        self.cancel_countdown_ticks();
        self.cancel_clock_ticks();
    }
}

/// Time left until the next wall-clock minute starts.
pub fn until_next_minute(now: chrono::NaiveTime) -> Duration {
    let into_minute = Duration::from_secs(u64::from(now.second()))
        + Duration::from_nanos(u64::from(now.nanosecond() % 1_000_000_000));
    Duration::from_secs(60).saturating_sub(into_minute)
}

/// Scheduler that only records what was asked of it.
///
/// Useful for UI layers that pump ticks themselves, and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualTicks {
    pub countdown_running: bool,
    pub clock_running: bool,
    pub countdown_starts: usize,
    pub countdown_cancels: usize,
}

impl TickScheduler for ManualTicks {
    fn start_countdown_ticks(&mut self) {
        if self.countdown_running {
            self.countdown_cancels += 1;
        }
        self.countdown_running = true;
        self.countdown_starts += 1;
    }

    fn cancel_countdown_ticks(&mut self) {
        if self.countdown_running {
            self.countdown_cancels += 1;
        }
        self.countdown_running = false;
    }

    fn start_clock_ticks(&mut self) {
        self.clock_running = true;
    }

    fn cancel_clock_ticks(&mut self) {
        self.clock_running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use tokio::sync::mpsc;

    #[test]
    fn next_minute_alignment() {
        let t = NaiveTime::from_hms_opt(14, 50, 15).unwrap();
        assert_eq!(until_next_minute(t), Duration::from_secs(45));
        let t = NaiveTime::from_hms_opt(14, 50, 0).unwrap();
        assert_eq!(until_next_minute(t), Duration::from_secs(60));
    }

    #[test]
    fn manual_restart_cancels_first() {
        let mut ticks = ManualTicks::default();
        ticks.start_countdown_ticks();
        ticks.start_countdown_ticks();
        assert_eq!(ticks.countdown_starts, 2);
        assert_eq!(ticks.countdown_cancels, 1);
        ticks.cancel_countdown_ticks();
        assert!(!ticks.countdown_running);
        assert_eq!(ticks.countdown_cancels, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_ticker_emits_seconds() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = TokioTicker::new(tx, Duration::from_secs(1), Duration::from_secs(60));
        ticker.start_countdown_ticks();
        assert!(ticker.is_counting_down());

        for _ in 0..3 {
            assert_eq!(rx.recv().await, Some(Tick::Second));
        }
        ticker.cancel_countdown_ticks();
        assert!(!ticker.is_counting_down());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_does_not_double_schedule() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = TokioTicker::new(tx, Duration::from_secs(1), Duration::from_secs(60));
        ticker.start_countdown_ticks();
        ticker.start_countdown_ticks();
        ticker.start_countdown_ticks();

        tokio::time::sleep(Duration::from_millis(3500)).await;
        ticker.cancel_countdown_ticks();

        let mut seen = 0;
        while let Ok(tick) = rx.try_recv() {
            assert_eq!(tick, Tick::Second);
            seen += 1;
        }
        assert_eq!(seen, 3);
    }
}
