//! `planner-core` — configuration and shared error type for TeamPlanner.

pub mod config;
pub mod error;

pub use config::PlannerConfig;
pub use error::{PlannerError, Result};
