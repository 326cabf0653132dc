use copilot_service::config::{Binding, CopilotConfig};
use copilot_service::services::metrics::init_metrics;
use copilot_service::startup::Application;
use service_core::observability::{init_tracing, LogOutput};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = CopilotConfig::load(Binding::Server).map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        "copilot-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
        LogOutput::Stdout,
    );

    if let Err(e) = init_metrics() {
        tracing::warn!(error = %e, "Metrics disabled");
    }

    if !config.api_key_configured() {
        tracing::warn!("GOOGLE_API_KEY not set; queries will return setup instructions");
    }

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
