//! Function entry point: reads one HTTP event as JSON from stdin and writes
//! the HTTP result as JSON to stdout.

use copilot_service::config::{Binding, CopilotConfig};
use copilot_service::function::{handle_event, FunctionEvent};
use copilot_service::services::AssistantService;
use service_core::observability::{init_tracing, LogOutput};
use std::io::{Read, Write};
use tracing::Instrument;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CopilotConfig::load(Binding::Function)?;

    init_tracing(
        "copilot-function",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
        LogOutput::Stderr,
    );

    let assistant = AssistantService::from_config(&config)?;

    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;
    let event: FunctionEvent = serde_json::from_str(&raw).map_err(|e| {
        tracing::error!(error = %e, "Malformed function event");
        anyhow::anyhow!("malformed function event: {}", e)
    })?;

    let invocation_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("invocation", %invocation_id, method = %event.http_method);
    let response = handle_event(&assistant, event).instrument(span).await;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, &response)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;

    Ok(())
}
