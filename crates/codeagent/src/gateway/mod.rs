//! Adapters to the two external text-completion endpoints.
//!
//! Both gateways share a single `reqwest::Client` built once at startup by
//! [`build_http_client`]. The client holds the connection pool and the per-call
//! timeout and is only ever cloned, never reconfigured.

mod anthropic;
mod openai;

pub use anthropic::GuidanceGateway;
pub use openai::GenerationGateway;

use crate::error::{GatewayError, GatewayKind};
use codeagent_core::agent::CompletionRequest;
use codeagent_core::credentials::CredentialState;
use futures::future::BoxFuture;
use std::time::Duration;

/// Maximum number of response-body characters kept in a `GatewayError::Status`.
const MAX_ERROR_BODY_LEN: usize = 200;

/// A stateless text-completion endpoint.
pub trait ModelGateway: Send + Sync {
    fn kind(&self) -> GatewayKind;

    /// Whether the configured key can be used, or is absent/a placeholder.
    fn credential_state(&self) -> CredentialState;

    /// Sends one completion request and returns the first text fragment.
    fn complete<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> BoxFuture<'a, Result<String, GatewayError>>;
}

pub fn build_http_client(timeout: Duration) -> color_eyre::eyre::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("codeagent/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to build HTTP client: {}", e))
}

/// Joins a base URL and an API path without doubling the slash.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Maps a transport failure onto the gateway taxonomy.
pub(crate) fn classify_send_error(
    gateway: GatewayKind,
    timeout_secs: u64,
    err: reqwest::Error,
) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout {
            gateway,
            seconds: timeout_secs,
        }
    } else if err.is_decode() {
        GatewayError::MalformedPayload {
            gateway,
            message: err.to_string(),
        }
    } else {
        GatewayError::Transport {
            gateway,
            message: err.without_url().to_string(),
        }
    }
}

/// Truncates an error body and hides it entirely if it looks like it echoes a secret.
pub(crate) fn sanitize_body(body: &str) -> String {
    const SECRET_PATTERNS: &[&str] = &[
        "api_key",
        "apikey",
        "x-api-key",
        "secret",
        "password",
        "credential",
        "bearer",
        "sk-",
    ];

    let truncated: String = body.chars().take(MAX_ERROR_BODY_LEN).collect();
    let lower = truncated.to_lowercase();
    if SECRET_PATTERNS.iter().any(|pattern| lower.contains(pattern)) {
        return "(response details redacted)".to_string();
    }

    truncated
}

/// Reads a response, turning non-2xx statuses and unreadable bodies into errors.
pub(crate) async fn read_success_body(
    gateway: GatewayKind,
    timeout_secs: u64,
    response: reqwest::Response,
) -> Result<String, GatewayError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| classify_send_error(gateway, timeout_secs, e))?;

    if !status.is_success() {
        return Err(GatewayError::Status {
            gateway,
            status: status.as_u16(),
            body: sanitize_body(&body),
        });
    }

    Ok(body)
}

/// Returns the text if it carries any non-whitespace content.
pub(crate) fn non_empty(gateway: GatewayKind, text: Option<String>) -> Result<String, GatewayError> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(GatewayError::EmptyResult { gateway }),
    }
}
