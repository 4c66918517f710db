//! # minidesk Core Library
//!
//! Business logic for the minidesk desk widgets. Every operation is
//! available through the `minidesk` CLI, which is a thin layer over this
//! crate.
//!
//! ## Architecture
//!
//! - **Session clock**: a work/break countdown state machine advanced one
//!   second at a time by an injected tick scheduler
//! - **Widgets**: BMI calculator, unit converter and expense tracker
//! - **Storage**: SQLite for sessions, expenses and persisted clock state;
//!   TOML for configuration
//!
//! ## Key Components
//!
//! - [`SessionClock`]: countdown state machine
//! - [`TimerDriver`]: keeps the clock and its [`TickScheduler`] armed together
//! - [`Database`]: session log, expenses and key-value persistence
//! - [`Config`]: application configuration management

pub mod bmi;
pub mod error;
pub mod events;
pub mod expenses;
pub mod storage;
pub mod timer;
pub mod units;

pub use bmi::{BmiCategory, BmiReading};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use expenses::{Expense, ExpenseDraft, ExpensePatch};
pub use storage::{Config, Database, SessionStats};
pub use timer::{
    Direction, DurationStore, SessionClock, SessionType, TickScheduler, TimerDriver, TimerStatus,
};
pub use units::{convert, Conversion, UnitCategory, UnitDef};
