use crate::gateway::{build_http_client, GenerationGateway, GuidanceGateway};
use crate::orchestrator::Orchestrator;
use crate::prelude::*;
use codeagent_core::agent::DEFAULT_MAX_TOKENS;
use codeagent_core::credentials::CredentialState;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_GUIDANCE_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_GUIDANCE_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_GENERATION_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_GENERATION_MODEL: &str = "gpt-4";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Connection settings for the two model gateways.
#[derive(Debug, Clone, clap::Args)]
pub struct GatewayOptions {
    /// API key for the guidance model (Anthropic). Leave empty for demo mode
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub guidance_api_key: Option<String>,

    /// Base URL of the guidance endpoint
    #[arg(long, env = "ANTHROPIC_BASE_URL", default_value = DEFAULT_GUIDANCE_BASE_URL)]
    pub guidance_base_url: String,

    /// Guidance model name
    #[arg(long, env = "GUIDANCE_MODEL", default_value = DEFAULT_GUIDANCE_MODEL)]
    pub guidance_model: String,

    /// API key for the generation model (OpenAI)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub generation_api_key: Option<String>,

    /// Base URL of the generation endpoint
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_GENERATION_BASE_URL)]
    pub generation_base_url: String,

    /// Generation model name
    #[arg(long, env = "GENERATION_MODEL", default_value = DEFAULT_GENERATION_MODEL)]
    pub generation_model: String,

    /// Timeout for a single model call, in seconds
    #[arg(long = "timeout", env = "CODEAGENT_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Maximum tokens requested from either model
    #[arg(long, env = "CODEAGENT_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            guidance_api_key: None,
            guidance_base_url: DEFAULT_GUIDANCE_BASE_URL.to_string(),
            guidance_model: DEFAULT_GUIDANCE_MODEL.to_string(),
            generation_api_key: None,
            generation_base_url: DEFAULT_GENERATION_BASE_URL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Which gateways have usable credentials. Never carries key material.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigReport {
    pub guidance_configured: bool,
    pub guidance_model: String,
    pub generation_configured: bool,
    pub generation_model: String,
    pub demo_mode: bool,
    pub timeout_secs: u64,
}

impl GatewayOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn report(&self) -> ConfigReport {
        let guidance = CredentialState::of(self.guidance_api_key.as_deref());
        let generation = CredentialState::of(self.generation_api_key.as_deref());
        ConfigReport {
            guidance_configured: guidance.is_present(),
            guidance_model: self.guidance_model.clone(),
            generation_configured: generation.is_present(),
            generation_model: self.generation_model.clone(),
            demo_mode: !guidance.is_present(),
            timeout_secs: self.timeout_secs,
        }
    }

    /// Builds the shared HTTP client and both gateways once for the process.
    pub fn build_orchestrator(&self) -> Result<Arc<Orchestrator>> {
        let client = build_http_client(self.timeout())?;

        let guidance = GuidanceGateway::new(
            client.clone(),
            &self.guidance_base_url,
            &self.guidance_model,
            self.guidance_api_key.clone(),
            self.timeout_secs,
        );
        let generation = GenerationGateway::new(
            client,
            &self.generation_base_url,
            &self.generation_model,
            self.generation_api_key.clone(),
            self.timeout_secs,
        );

        Ok(Arc::new(
            Orchestrator::new(Arc::new(guidance), Arc::new(generation))
                .with_max_tokens(self.max_tokens),
        ))
    }
}
