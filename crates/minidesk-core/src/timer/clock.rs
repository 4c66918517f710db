//! Session clock implementation.
//!
//! The session clock is a countdown state machine over two alternating
//! sessions (work and break). It owns no thread and no timer: whoever drives
//! it calls `tick()` once per elapsed second while it is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!   ^        |  (countdown exhausted: flip session, stay Running)
//!   +--------+-- reset (from any state)
//! ```
//!
//! ## Usage
//!
//! ```
//! use minidesk_core::timer::{SessionClock, SessionType, TimerStatus};
//!
//! let mut clock = SessionClock::new();
//! clock.toggle_running();
//! for _ in 0..1500 {
//!     clock.tick();
//! }
//! assert_eq!(clock.active_session(), SessionType::Break);
//! assert_eq!(clock.status(), TimerStatus::Running);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::durations::{Direction, DurationStore, SessionType};
use super::format::format_clock;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

/// Full observable state of the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub durations: DurationStore,
    pub remaining_secs: u64,
    pub active_session: SessionType,
    pub status: TimerStatus,
}

impl Default for SessionState {
    fn default() -> Self {
        let durations = DurationStore::default();
        Self {
            remaining_secs: durations.work_secs(),
            durations,
            active_session: SessionType::Work,
            status: TimerStatus::Idle,
        }
    }
}

/// Core countdown state machine.
///
/// Every operation is total: invalid requests are clamped, nothing is
/// rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClock {
    state: SessionState,
}

impl SessionClock {
    /// A clock with 25/5 minute sessions, idle, on the work session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_durations(durations: DurationStore) -> Self {
        Self {
            state: SessionState {
                remaining_secs: durations.work_secs(),
                durations,
                active_session: SessionType::Work,
                status: TimerStatus::Idle,
            },
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status
    }

    pub fn is_running(&self) -> bool {
        self.state.status == TimerStatus::Running
    }

    pub fn active_session(&self) -> SessionType {
        self.state.active_session
    }

    pub fn remaining_secs(&self) -> u64 {
        self.state.remaining_secs
    }

    pub fn durations(&self) -> &DurationStore {
        &self.state.durations
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_clock(self.state.remaining_secs)
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            status: self.state.status,
            session: self.state.active_session,
            remaining_secs: self.state.remaining_secs,
            display: self.display(),
            work_duration_secs: self.state.durations.work_secs(),
            break_duration_secs: self.state.durations.break_secs(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Running -> Paused, anything else -> Running.
    pub fn toggle_running(&mut self) -> Event {
        let session = self.state.active_session;
        let remaining_secs = self.state.remaining_secs;
        let at = Utc::now();
        match self.state.status {
            TimerStatus::Running => {
                self.state.status = TimerStatus::Paused;
                debug!(%session, remaining_secs, "timer paused");
                Event::TimerPaused { session, remaining_secs, at }
            }
            TimerStatus::Paused => {
                self.state.status = TimerStatus::Running;
                debug!(%session, remaining_secs, "timer resumed");
                Event::TimerResumed { session, remaining_secs, at }
            }
            TimerStatus::Idle => {
                self.state.status = TimerStatus::Running;
                debug!(%session, remaining_secs, "timer started");
                Event::TimerStarted { session, remaining_secs, at }
            }
        }
    }

    pub fn reset(&mut self) -> Event {
        self.state.status = TimerStatus::Idle;
        self.state.active_session = SessionType::Work;
        self.state.remaining_secs = self.state.durations.work_secs();
        debug!("timer reset");
        Event::TimerReset {
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Step `session`'s configured length by one minute in `direction`.
    ///
    /// When `session` is the active one the countdown restarts at the new
    /// length; the inactive session's change only applies on its next turn.
    pub fn adjust_duration(&mut self, session: SessionType, direction: Direction) -> Event {
        let duration_secs = self.state.durations.adjust(session, direction);
        if session == self.state.active_session {
            self.state.remaining_secs = duration_secs;
        }
        debug!(%session, ?direction, duration_secs, "duration adjusted");
        Event::DurationAdjusted {
            session,
            direction,
            duration_secs,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Advance the countdown by one second.
    ///
    /// No-op unless running. Returns `Some(Event::SessionSwitched)` when the
    /// countdown is exhausted; the switch happens in place of the final
    /// decrement so `remaining_secs` is never 0 while running.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(Utc::now())
    }

    /// [`tick`](Self::tick) for a second that elapsed at `at`. A session
    /// switch caused by this tick is stamped with `at`.
    pub fn tick_at(&mut self, at: DateTime<Utc>) -> Option<Event> {
        if self.state.status != TimerStatus::Running {
            return None;
        }
        if self.state.remaining_secs > 1 {
            self.state.remaining_secs -= 1;
            return None;
        }
        Some(self.switch_session(at))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn switch_session(&mut self, at: DateTime<Utc>) -> Event {
        let from = self.state.active_session;
        let to = from.flipped();
        self.state.active_session = to;
        self.state.remaining_secs = self.state.durations.get(to);
        debug!(%from, %to, "session switched");
        Event::SessionSwitched {
            from,
            to,
            completed_secs: self.state.durations.get(from),
            duration_secs: self.state.remaining_secs,
            at,
        }
    }
}
