//! HTTP handlers for the standalone server binding.

pub mod assistant;
pub mod cases;
pub mod health;
pub mod metrics;
