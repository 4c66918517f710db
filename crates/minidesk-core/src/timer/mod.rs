mod clock;
mod driver;
mod durations;
mod format;
mod scheduler;

pub use clock::{SessionClock, SessionState, TimerStatus};
pub use driver::TimerDriver;
pub use durations::{
    Direction, DurationStore, SessionType, DEFAULT_BREAK_SECS, DEFAULT_WORK_SECS,
    MIN_DURATION_SECS, STEP_SECS,
};
pub use format::format_clock;
pub use scheduler::{
    now_ms, ElapsedScheduler, IntervalScheduler, ManualScheduler, TickScheduler, TICK_PERIOD,
};
