use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Shortest session length the clock accepts.
pub const MIN_DURATION_SECS: u64 = 60;
/// Size of one increment/decrement step.
pub const STEP_SECS: u64 = 60;

pub const DEFAULT_WORK_SECS: u64 = 25 * 60;
pub const DEFAULT_BREAK_SECS: u64 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Work,
    Break,
}

impl SessionType {
    /// The session that follows this one.
    pub fn flipped(self) -> Self {
        match self {
            SessionType::Work => SessionType::Break,
            SessionType::Break => SessionType::Work,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionType::Work => "work",
            SessionType::Break => "break",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" | "w" | "focus" => Ok(SessionType::Work),
            "break" | "b" | "rest" => Ok(SessionType::Break),
            other => Err(ValidationError::InvalidValue {
                field: "session".into(),
                message: format!("expected 'work' or 'break', got '{other}'"),
            }),
        }
    }
}

/// Direction of a duration adjustment (+1 / -1 step).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

impl FromStr for Direction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "+" | "inc" | "up" | "increase" => Ok(Direction::Increase),
            "-" | "dec" | "down" | "decrease" => Ok(Direction::Decrease),
            other => Err(ValidationError::InvalidValue {
                field: "direction".into(),
                message: format!("expected '+' or '-', got '{other}'"),
            }),
        }
    }
}

/// Configured work/break lengths in seconds.
///
/// Both values stay at or above [`MIN_DURATION_SECS`]; out-of-range requests
/// are clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationStore {
    work_secs: u64,
    break_secs: u64,
}

impl DurationStore {
    pub fn new(work_secs: u64, break_secs: u64) -> Self {
        Self {
            work_secs: work_secs.max(MIN_DURATION_SECS),
            break_secs: break_secs.max(MIN_DURATION_SECS),
        }
    }

    /// Build from whole minutes, as stored in the config file.
    pub fn from_minutes(work_min: u64, break_min: u64) -> Self {
        Self::new(work_min.saturating_mul(60), break_min.saturating_mul(60))
    }

    pub fn get(&self, session: SessionType) -> u64 {
        match session {
            SessionType::Work => self.work_secs,
            SessionType::Break => self.break_secs,
        }
    }

    pub fn work_secs(&self) -> u64 {
        self.work_secs
    }

    pub fn break_secs(&self) -> u64 {
        self.break_secs
    }

    /// Move `session` one step in `direction` and return the new value.
    pub fn adjust(&mut self, session: SessionType, direction: Direction) -> u64 {
        let slot = match session {
            SessionType::Work => &mut self.work_secs,
            SessionType::Break => &mut self.break_secs,
        };
        *slot = match direction {
            Direction::Increase => slot.saturating_add(STEP_SECS),
            Direction::Decrease => slot.saturating_sub(STEP_SECS),
        }
        .max(MIN_DURATION_SECS);
        *slot
    }
}

impl Default for DurationStore {
    fn default() -> Self {
        Self::new(DEFAULT_WORK_SECS, DEFAULT_BREAK_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_25_and_5_minutes() {
        let d = DurationStore::default();
        assert_eq!(d.work_secs(), 1500);
        assert_eq!(d.break_secs(), 300);
    }

    #[test]
    fn new_clamps_to_floor() {
        let d = DurationStore::new(0, 59);
        assert_eq!(d.work_secs(), MIN_DURATION_SECS);
        assert_eq!(d.break_secs(), MIN_DURATION_SECS);
    }

    #[test]
    fn decrease_stops_at_floor() {
        let mut d = DurationStore::new(120, 300);
        assert_eq!(d.adjust(SessionType::Work, Direction::Decrease), 60);
        assert_eq!(d.adjust(SessionType::Work, Direction::Decrease), 60);
        assert_eq!(d.break_secs(), 300);
    }

    #[test]
    fn increase_adds_one_minute() {
        let mut d = DurationStore::default();
        assert_eq!(d.adjust(SessionType::Break, Direction::Increase), 360);
        assert_eq!(d.work_secs(), 1500);
    }

    #[test]
    fn parses_directions_and_sessions() {
        assert_eq!("+".parse::<Direction>().unwrap(), Direction::Increase);
        assert_eq!("down".parse::<Direction>().unwrap(), Direction::Decrease);
        assert_eq!("Break".parse::<SessionType>().unwrap(), SessionType::Break);
        assert!("sideways".parse::<Direction>().is_err());
        assert!("lunch".parse::<SessionType>().is_err());
    }
}
