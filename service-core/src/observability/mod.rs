pub mod logging;

pub use logging::{LogOutput, init_tracing};
