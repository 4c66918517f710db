use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::clock::SessionClock;
use super::durations::{Direction, SessionType};
use super::scheduler::{ElapsedScheduler, ManualScheduler, TickScheduler, TICK_PERIOD};
use crate::events::Event;

/// Keeps a [`SessionClock`] and its tick source in step.
///
/// The scheduler is armed exactly while the clock is running. Ticks that
/// reach a disarmed driver are dropped, so a late tick can never touch a
/// paused or reset countdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerDriver<S> {
    clock: SessionClock,
    scheduler: S,
}

impl<S: TickScheduler> TimerDriver<S> {
    pub fn new(clock: SessionClock, scheduler: S) -> Self {
        let mut driver = Self { clock, scheduler };
        driver.sync_scheduler();
        driver
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Drop the scheduler and hand the clock to a different driver.
    pub fn into_clock(self) -> SessionClock {
        self.clock
    }

    pub fn toggle_running(&mut self) -> Event {
        let event = self.clock.toggle_running();
        self.sync_scheduler();
        event
    }

    pub fn reset(&mut self) -> Event {
        let event = self.clock.reset();
        self.sync_scheduler();
        event
    }

    pub fn adjust_duration(&mut self, session: SessionType, direction: Direction) -> Event {
        self.clock.adjust_duration(session, direction)
    }

    /// Deliver one tick from the scheduler.
    pub fn fire(&mut self) -> Option<Event> {
        self.fire_at(Utc::now())
    }

    /// Deliver a tick that fell due at `at`.
    pub fn fire_at(&mut self, at: DateTime<Utc>) -> Option<Event> {
        if !self.scheduler.is_armed() {
            trace!("tick dropped: scheduler disarmed");
            return None;
        }
        self.clock.tick_at(at)
    }

    fn sync_scheduler(&mut self) {
        match (self.clock.is_running(), self.scheduler.is_armed()) {
            (true, false) => self.scheduler.arm(),
            (false, true) => self.scheduler.disarm(),
            _ => {}
        }
    }
}

impl TimerDriver<ManualScheduler> {
    /// Deliver up to `secs` virtual ticks, stopping once disarmed.
    pub fn advance(&mut self, secs: u64) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..secs {
            if !self.scheduler.is_armed() {
                break;
            }
            events.extend(self.fire());
        }
        events
    }
}

impl TimerDriver<ElapsedScheduler> {
    /// Deliver every whole tick that fell due up to `now_ms`.
    ///
    /// Each tick is stamped with the instant it fell due, so a session that
    /// ended long before the call reports its real end time.
    pub fn catch_up(&mut self, now_ms: u64) -> Vec<Event> {
        let Some(anchor) = self.scheduler.last_tick_epoch_ms() else {
            return Vec::new();
        };
        let due = self.scheduler.due_ticks(now_ms);
        let period_ms = TICK_PERIOD.as_millis() as u64;
        let mut events = Vec::new();
        for i in 1..=due {
            let due_ms = anchor.saturating_add(i.saturating_mul(period_ms));
            let at = i64::try_from(due_ms)
                .ok()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .unwrap_or_else(Utc::now);
            events.extend(self.fire_at(at));
        }
        if due > 0 {
            trace!(due, remaining_secs = self.clock.remaining_secs(), "caught up");
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{now_ms, DurationStore, TimerStatus};

    fn manual() -> TimerDriver<ManualScheduler> {
        TimerDriver::new(SessionClock::new(), ManualScheduler::new())
    }

    #[test]
    fn starting_arms_and_pausing_disarms() {
        let mut driver = manual();
        assert!(!driver.scheduler().is_armed());
        driver.toggle_running();
        assert!(driver.scheduler().is_armed());
        driver.toggle_running();
        assert!(!driver.scheduler().is_armed());
        assert_eq!(driver.scheduler().arm_count(), 1);
        assert_eq!(driver.scheduler().disarm_count(), 1);
    }

    #[test]
    fn reset_disarms() {
        let mut driver = manual();
        driver.toggle_running();
        driver.advance(10);
        driver.reset();
        assert!(!driver.scheduler().is_armed());
        assert_eq!(driver.clock().remaining_secs(), 1500);
    }

    #[test]
    fn tick_after_disarm_is_dropped() {
        let mut driver = manual();
        driver.toggle_running();
        driver.advance(5);
        driver.toggle_running();
        assert!(driver.fire().is_none());
        assert!(driver.advance(30).is_empty());
        assert_eq!(driver.clock().remaining_secs(), 1495);
        assert_eq!(driver.clock().status(), TimerStatus::Paused);
    }

    #[test]
    fn advance_crosses_session_boundaries_without_rearming() {
        let clock = SessionClock::with_durations(DurationStore::new(60, 120));
        let mut driver = TimerDriver::new(clock, ManualScheduler::new());
        driver.toggle_running();

        let events = driver.advance(60 + 120 + 10);
        let switches: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, Event::SessionSwitched { .. }))
            .collect();
        assert_eq!(switches.len(), 2);
        assert_eq!(driver.clock().active_session(), SessionType::Work);
        assert_eq!(driver.clock().remaining_secs(), 50);
        assert_eq!(driver.scheduler().arm_count(), 1);
    }

    #[test]
    fn new_syncs_with_running_clock() {
        let mut clock = SessionClock::new();
        clock.toggle_running();
        let driver = TimerDriver::new(clock, ManualScheduler::new());
        assert!(driver.scheduler().is_armed());
    }

    #[test]
    fn catch_up_applies_elapsed_seconds() {
        let mut driver = TimerDriver::new(SessionClock::new(), ElapsedScheduler::new());
        driver.toggle_running();
        let t0 = driver.scheduler().last_tick_epoch_ms().unwrap();

        assert!(driver.catch_up(t0 + 1_499_500).is_empty());
        assert_eq!(driver.clock().remaining_secs(), 1);

        let events = driver.catch_up(t0 + 1_500_000);
        assert_eq!(events.len(), 1);
        assert_eq!(driver.clock().active_session(), SessionType::Break);
        assert_eq!(driver.clock().remaining_secs(), 300);
    }

    #[test]
    fn catch_up_stamps_switch_with_due_time() {
        let mut driver = TimerDriver::new(SessionClock::new(), ElapsedScheduler::new());
        driver.toggle_running();
        // Re-anchor two days in the past, as if the last invocation was then.
        let two_days_ago = now_ms() - 2 * 24 * 3_600_000;
        driver.scheduler_mut().disarm();
        driver.scheduler_mut().arm_at(two_days_ago);

        let events = driver.catch_up(two_days_ago + 1_500_000);
        let expected = DateTime::<Utc>::from_timestamp_millis((two_days_ago + 1_500_000) as i64)
            .unwrap();
        match events.as_slice() {
            [Event::SessionSwitched { at, from, .. }] => {
                assert_eq!(*from, SessionType::Work);
                assert_eq!(*at, expected);
            }
            other => panic!("expected one SessionSwitched, got {other:?}"),
        }
    }

    #[test]
    fn catch_up_is_inert_while_paused() {
        let mut driver = TimerDriver::new(SessionClock::new(), ElapsedScheduler::new());
        driver.toggle_running();
        driver.toggle_running();
        assert!(driver.catch_up(u64::MAX / 2).is_empty());
        assert_eq!(driver.clock().remaining_secs(), 1500);
    }

    #[test]
    fn elapsed_driver_roundtrips_through_json() {
        let mut driver = TimerDriver::new(SessionClock::new(), ElapsedScheduler::new());
        driver.toggle_running();
        let json = serde_json::to_string(&driver).unwrap();
        let restored: TimerDriver<ElapsedScheduler> = serde_json::from_str(&json).unwrap();
        assert!(restored.scheduler().is_armed());
        assert_eq!(restored.clock(), driver.clock());
    }
}
