use super::{classify_send_error, endpoint, non_empty, read_success_body, ModelGateway};
use crate::error::{GatewayError, GatewayKind};
use codeagent_core::agent::CompletionRequest;
use codeagent_core::credentials::CredentialState;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Generation model reached through the OpenAI Chat Completions API.
#[derive(Debug, Clone)]
pub struct GenerationGateway {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl GenerationGateway {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        model: &str,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client,
            url: endpoint(base_url, CHAT_COMPLETIONS_PATH),
            model: model.to_string(),
            api_key,
            timeout_secs,
        }
    }

    async fn send(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let gateway = GatewayKind::Generation;
        let api_key = match self.api_key.as_deref() {
            Some(key) if self.credential_state().is_present() => key,
            _ => return Err(GatewayError::CredentialsAbsent { gateway }),
        };

        // The system context travels as the first chat message.
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(WireMessage {
            role: "system",
            content: &request.system,
        });
        messages.extend(request.messages.iter().map(|message| WireMessage {
            role: message.role.as_str(),
            content: &message.content,
        }));

        let body = ChatBody {
            model: &self.model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        log::debug!("POST {} model={}", self.url, self.model);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_send_error(gateway, self.timeout_secs, e))?;

        let text = read_success_body(gateway, self.timeout_secs, response).await?;
        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| GatewayError::MalformedPayload {
                gateway,
                message: e.to_string(),
            })?;

        non_empty(
            gateway,
            parsed
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content),
        )
    }
}

impl ModelGateway for GenerationGateway {
    fn kind(&self) -> GatewayKind {
        GatewayKind::Generation
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
