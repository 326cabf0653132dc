//! Domain models for the copilot service.

pub mod case;
pub mod query;

pub use case::Case;
pub use query::{QueryMetadata, QueryRequest, QueryResponse};
