use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Direction, SessionType, TimerStatus};

/// Every state change of the session clock produces an Event.
/// The CLI prints them as JSON; the session log subscribes to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Clock left `Idle` and began counting down.
    TimerStarted {
        session: SessionType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        session: SessionType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        session: SessionType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown exhausted; the clock flipped sessions and kept running.
    SessionSwitched {
        from: SessionType,
        to: SessionType,
        /// Configured length of the session that just finished.
        completed_secs: u64,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    DurationAdjusted {
        session: SessionType,
        direction: Direction,
        duration_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: TimerStatus,
        session: SessionType,
        remaining_secs: u64,
        display: String,
        work_duration_secs: u64,
        break_duration_secs: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short name matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerResumed { .. } => "timer_resumed",
            Event::SessionSwitched { .. } => "session_switched",
            Event::TimerReset { .. } => "timer_reset",
            Event::DurationAdjusted { .. } => "duration_adjusted",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}
