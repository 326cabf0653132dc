//! copilot-service: relay between the FCRM case-review frontend and a hosted
//! generative model.
//!
//! [`services::AssistantService`] holds the request handling. It is served by
//! the axum server in [`startup`] and by the function adapter in [`function`].

pub mod config;
pub mod function;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::AppState;
