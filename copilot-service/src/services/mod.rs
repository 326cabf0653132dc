pub mod assistant;
pub mod context;
pub mod mentions;
pub mod metrics;
pub mod prompt;
pub mod providers;

pub use assistant::{AssistantService, AssistantSettings};
