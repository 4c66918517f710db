pub mod bmi;
pub mod config;
pub mod convert;
pub mod expense;
pub mod timer;
