use super::extract::extract_modifications;
use super::AgentStrategy;
use crate::error::AgentError;
use codeagent_core::agent::{AgentRequest, AgentResponse, Instruction};
use codeagent_core::analysis::demo::{demo_reply, DEMO_NOTICE};
use futures::future::BoxFuture;

/// Offline strategy backed by the lexical analyzer. Never touches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicFallback;

impl HeuristicFallback {
    pub fn respond(&self, instruction: Instruction, request: &AgentRequest) -> AgentResponse {
        let reply = demo_reply(instruction, request);
        let modified_files = extract_modifications(&reply.text, reply.target_path.as_deref());

        let response =
            AgentResponse::completed(reply.text, modified_files).with_explanation(DEMO_NOTICE);

        if reply.analysis.suggestions.is_empty() {
            response
        } else {
            response.with_suggestions(reply.analysis.suggestions)
        }
    }
}

impl AgentStrategy for HeuristicFallback {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn run<'a>(
        &'a self,
        instruction: Instruction,
        request: &'a AgentRequest,
    ) -> BoxFuture<'a, Result<AgentResponse, AgentError>> {
        let response = self.respond(instruction, request);
        Box::pin(async move { Ok(response) })
    }
}
