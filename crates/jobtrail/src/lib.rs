//! Job application tracking core: accounts, applications, interview rounds and the dashboard.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod tracking;
