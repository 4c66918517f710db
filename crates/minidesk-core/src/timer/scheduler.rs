//! Periodic tick sources.
//!
//! A scheduler only knows whether it is armed. The [`TimerDriver`] arms it
//! when the clock starts running and disarms it on every exit from running,
//! and drops any tick that arrives while disarmed.
//!
//! [`TimerDriver`]: super::TimerDriver

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Tick period of the session clock.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub trait TickScheduler {
    fn arm(&mut self);
    fn disarm(&mut self);
    fn is_armed(&self) -> bool;
}

/// Virtual-time scheduler. Ticks are delivered by hand through
/// `TimerDriver::advance`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualScheduler {
    armed: bool,
    arm_count: u32,
    disarm_count: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the source went from disarmed to armed.
    pub fn arm_count(&self) -> u32 {
        self.arm_count
    }

    pub fn disarm_count(&self) -> u32 {
        self.disarm_count
    }
}

impl TickScheduler for ManualScheduler {
    fn arm(&mut self) {
        if !self.armed {
            self.armed = true;
            self.arm_count += 1;
        }
    }

    fn disarm(&mut self) {
        if self.armed {
            self.armed = false;
            self.disarm_count += 1;
        }
    }

    fn is_armed(&self) -> bool {
        self.armed
    }
}

/// Wall-clock scheduler that survives being serialized.
///
/// Remembers when the last tick was due; `due_ticks` reports how many whole
/// seconds have passed since then. Used when the process driving the clock
/// does not stay alive between user actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapsedScheduler {
    /// Epoch milliseconds of the last delivered (or arming) tick.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
}

impl ElapsedScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_tick_epoch_ms(&self) -> Option<u64> {
        self.last_tick_epoch_ms
    }

    pub fn arm_at(&mut self, now_ms: u64) {
        if self.last_tick_epoch_ms.is_none() {
            self.last_tick_epoch_ms = Some(now_ms);
        }
    }

    /// Whole ticks elapsed up to `now_ms`. The sub-second remainder is kept
    /// for the next call.
    pub fn due_ticks(&mut self, now_ms: u64) -> u64 {
        let Some(last) = self.last_tick_epoch_ms else {
            return 0;
        };
        let period_ms = TICK_PERIOD.as_millis() as u64;
        let ticks = now_ms.saturating_sub(last) / period_ms;
        self.last_tick_epoch_ms = Some(last + ticks * period_ms);
        ticks
    }
}

impl TickScheduler for ElapsedScheduler {
    fn arm(&mut self) {
        self.arm_at(now_ms());
    }

    fn disarm(&mut self) {
        self.last_tick_epoch_ms = None;
    }

    fn is_armed(&self) -> bool {
        self.last_tick_epoch_ms.is_some()
    }
}

/// Tokio interval firing once per period while armed.
///
/// Arming must happen inside a tokio runtime.
#[derive(Debug)]
pub struct IntervalScheduler {
    period: Duration,
    interval: Option<Interval>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    /// Resolve on the next tick. Never resolves while disarmed, so it can
    /// sit in a `tokio::select!` next to other event sources.
    pub async fn next_tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler for IntervalScheduler {
    fn arm(&mut self) {
        if self.interval.is_none() {
            let mut interval = tokio::time::interval_at(Instant::now() + self.period, self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            self.interval = Some(interval);
        }
    }

    fn disarm(&mut self) {
        self.interval = None;
    }

    fn is_armed(&self) -> bool {
        self.interval.is_some()
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
