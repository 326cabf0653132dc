use crate::services::providers::gemini::{GeminiConfig, GEMINI_API_BASE};
use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Model used when `GENAI_TEXT_MODEL` is not set.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash-exp";

/// Transport the relay is deployed behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Long-running HTTP server.
    Server,
    /// One invocation per HTTP event.
    Function,
}

impl Binding {
    /// Environment variables consulted for the credential, in order.
    pub fn api_key_vars(self) -> &'static [&'static str] {
        match self {
            Binding::Server => &["GOOGLE_API_KEY"],
            Binding::Function => &["GOOGLE_API_KEY", "GEMINI_API_KEY"],
        }
    }
}

#[derive(Debug, Clone)]
pub struct CopilotConfig {
    pub common: core_config::Config,
    pub binding: Binding,
    pub models: ModelConfig,
    pub google: GoogleConfig,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model identifier reported in answer metadata and `/health`.
    pub text_model: String,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// `None` disables model calls; queries then get a setup message.
    pub api_key: Option<Secret<String>>,
    pub api_base: String,
}

impl CopilotConfig {
    pub fn load(binding: Binding) -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Ok(Self::from_lookup(binding, common, |key| env::var(key).ok()))
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(binding: Binding, common: core_config::Config, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = binding
            .api_key_vars()
            .iter()
            .find_map(|key| get(key))
            .map(Secret::new);

        CopilotConfig {
            common,
            binding,
            models: ModelConfig {
                text_model: get("GENAI_TEXT_MODEL")
                    .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            },
            google: GoogleConfig {
                api_key,
                api_base: get("GENAI_API_BASE").unwrap_or_else(|| GEMINI_API_BASE.to_string()),
            },
        }
    }

    pub fn api_key_configured(&self) -> bool {
        self.google
            .api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().is_empty())
    }

    /// Provider settings, when a credential is present.
    pub fn gemini_config(&self) -> Option<GeminiConfig> {
        self.google.api_key.as_ref().map(|api_key| GeminiConfig {
            api_key: api_key.clone(),
            model: self.models.text_model.clone(),
            api_base: self.google.api_base.clone(),
        })
    }
}
