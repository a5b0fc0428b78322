use super::{classify_send_error, endpoint, non_empty, read_success_body, ModelGateway};
use crate::error::{GatewayError, GatewayKind};
use codeagent_core::agent::{ChatMessage, CompletionRequest};
use codeagent_core::credentials::CredentialState;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesBody<'a> {
    model: &'a str,
    system: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Guidance model reached through the Anthropic Messages API.
#[derive(Debug, Clone)]
pub struct GuidanceGateway {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl GuidanceGateway {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        model: &str,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client,
            url: endpoint(base_url, MESSAGES_PATH),
            model: model.to_string(),
            api_key,
            timeout_secs,
        }
    }

    async fn send(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let gateway = GatewayKind::Guidance;
        let api_key = match self.api_key.as_deref() {
            Some(key) if self.credential_state().is_present() => key,
            _ => return Err(GatewayError::CredentialsAbsent { gateway }),
        };

        let body = MessagesBody {
            model: &self.model,
            system: &request.system,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        log::debug!("POST {} model={}", self.url, self.model);

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_send_error(gateway, self.timeout_secs, e))?;

        let text = read_success_body(gateway, self.timeout_secs, response).await?;
        let parsed: MessagesResponse =
            serde_json::from_str(&text).map_err(|e| GatewayError::MalformedPayload {
                gateway,
                message: e.to_string(),
            })?;

        non_empty(
            gateway,
            parsed.content.into_iter().find_map(|block| block.text),
        )
    }
}

impl ModelGateway for GuidanceGateway {
    fn kind(&self) -> GatewayKind {
        GatewayKind::Guidance
    }

    fn credential_state(&self) -> CredentialState {
        CredentialState::of(self.api_key.as_deref())
    }

    fn complete<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> BoxFuture<'a, Result<String, GatewayError>> {
        Box::pin(self.send(request))
    }
}
