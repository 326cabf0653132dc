//! Query handling shared by the server and function bindings.
//!
//! One call resolves to exactly one of three outcomes: an answer from the
//! model, a setup message when no credential is configured, or an apology
//! carrying the upstream error. Only a missing query is reported as an error.

use crate::config::{Binding, CopilotConfig};
use crate::models::{QueryMetadata, QueryRequest, QueryResponse};
use crate::services::context::format_case_context;
use crate::services::mentions::extract_mentioned_cases;
use crate::services::metrics;
use crate::services::prompt::build_prompt;
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::{FinishReason, ProviderError, TextProvider};
use secrecy::Secret;
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Instant;

/// `metadata.error` when no credential is configured.
pub const API_KEY_MISSING: &str = "api_key_missing";

const SERVER_SETUP_MESSAGE: &str = "❌ **Google API Key Not Configured**

The Gemini API key is not set. To enable AI Assistant functionality:

1. Get a Google API key from: https://makersuite.google.com/app/apikey
2. Create a `.env` file next to the service
3. Add your key: `GOOGLE_API_KEY=your_api_key_here`
4. Restart the server

**Demo Mode**: I can see the case data but cannot generate AI responses without the API key.";

const FUNCTION_SETUP_MESSAGE: &str = "❌ **Google API Key Not Configured**

The Gemini API key is not set. To enable AI Assistant functionality:

1. Get a Google API key from: https://makersuite.google.com/app/apikey
2. Add it to the site's environment variables:
   - Go to Site settings → Environment variables
   - Add variable: `GOOGLE_API_KEY` or `GEMINI_API_KEY`
   - Set your API key as the value
3. Redeploy the site

**Demo Mode**: I can see the case data but cannot generate AI responses without the API key.";

/// Static part of the assistant's behaviour.
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    pub model: String,
    pub api_key_configured: bool,
    pub binding: Binding,
}

pub struct AssistantService {
    provider: Arc<dyn TextProvider>,
    settings: AssistantSettings,
}

impl AssistantService {
    pub fn new(provider: Arc<dyn TextProvider>, settings: AssistantSettings) -> Self {
        Self { provider, settings }
    }

    /// Service backed by Gemini. Without a credential the provider is still
    /// built, but never called.
    pub fn from_config(config: &CopilotConfig) -> Result<Self, ProviderError> {
        let gemini_config = config.gemini_config().unwrap_or_else(|| GeminiConfig {
            api_key: Secret::new(String::new()),
            model: config.models.text_model.clone(),
            api_base: config.google.api_base.clone(),
        });
        let provider: Arc<dyn TextProvider> = Arc::new(GeminiTextProvider::new(gemini_config)?);

        Ok(Self::new(
            provider,
            AssistantSettings {
                model: config.models.text_model.clone(),
                api_key_configured: config.api_key_configured(),
                binding: config.binding,
            },
        ))
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    pub fn api_key_configured(&self) -> bool {
        self.settings.api_key_configured
    }

    /// Answer one analyst query.
    #[tracing::instrument(
        skip_all,
        fields(query_len, case_count, has_selection = request.selected_case.is_some())
    )]
    pub async fn answer(&self, request: &QueryRequest) -> Result<QueryResponse, AppError> {
        let Some(query) = request.query_text() else {
            metrics::record_query_outcome("rejected");
            return Err(AppError::BadRequest(anyhow::anyhow!("Query is required")));
        };

        let cases = request.cases();
        let span = tracing::Span::current();
        span.record("query_len", query.len());
        span.record("case_count", cases.len());
        tracing::info!("Assistant query received");

        if !self.settings.api_key_configured {
            tracing::warn!("Model credential not configured, returning setup instructions");
            metrics::record_query_outcome(API_KEY_MISSING);
            return Ok(QueryResponse {
                response: self.setup_message().to_string(),
                metadata: QueryMetadata::failed(API_KEY_MISSING),
            });
        }

        let case_context = format_case_context(cases, request.selected_case.as_ref());
        let prompt = build_prompt(&case_context, query);

        let provider_name = self.provider.name();
        let started = Instant::now();
        let result = self.provider.generate(&prompt).await;
        metrics::record_provider_latency(
            provider_name,
            &self.settings.model,
            started.elapsed().as_secs_f64(),
        );

        let generated = match result {
            Ok(generated) => generated,
            Err(e) => {
                tracing::error!(
                    provider = provider_name,
                    error_type = e.kind(),
                    error = %e,
                    "Model call failed"
                );
                metrics::record_provider_error(provider_name, e.kind());
                metrics::record_query_outcome("call_failed");
                return Ok(upstream_failure(&e));
            }
        };

        let case_ids = extract_mentioned_cases(cases, &generated.text);

        tracing::info!(
            mentioned = case_ids.len(),
            input_tokens = generated.input_tokens,
            output_tokens = generated.output_tokens,
            "Query answered"
        );
        metrics::record_tokens(
            &self.settings.model,
            generated.input_tokens,
            generated.output_tokens,
        );

        let outcome = if generated.finish_reason == FinishReason::Length {
            tracing::warn!(
                output_tokens = generated.output_tokens,
                "Answer cut off at the output token limit"
            );
            "truncated"
        } else {
            "answered"
        };
        metrics::record_query_outcome(outcome);

        Ok(QueryResponse {
            response: generated.text,
            metadata: QueryMetadata::answered(
                case_ids,
                self.settings.model.clone(),
                request.selected_case.is_some(),
            ),
        })
    }

    fn setup_message(&self) -> &'static str {
        match self.settings.binding {
            Binding::Server => SERVER_SETUP_MESSAGE,
            Binding::Function => FUNCTION_SETUP_MESSAGE,
        }
    }
}

fn upstream_failure(error: &ProviderError) -> QueryResponse {
    let description = error.to_string();
    QueryResponse {
        response: format!(
            "Sorry, I encountered an error processing your request.\n\n**Error:** {}\n\nPlease try again or rephrase your question.",
            description
        ),
        metadata: QueryMetadata::failed(description),
    }
}
