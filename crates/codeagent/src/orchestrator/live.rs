use super::extract::extract_modifications;
use super::AgentStrategy;
use crate::error::AgentError;
use crate::gateway::ModelGateway;
use codeagent_core::agent::{
    generation_prompt, guidance_prompt, requires_code_generation, test_file_path, AgentRequest,
    AgentResponse, Instruction,
};
use futures::future::BoxFuture;
use std::sync::Arc;

/// Two-stage pipeline: guidance model first, then generation model.
pub struct LiveOrchestration {
    guidance: Arc<dyn ModelGateway>,
    generation: Arc<dyn ModelGateway>,
    max_tokens: u32,
}

impl LiveOrchestration {
    pub fn new(
        guidance: Arc<dyn ModelGateway>,
        generation: Arc<dyn ModelGateway>,
        max_tokens: u32,
    ) -> Self {
        Self {
            guidance,
            generation,
            max_tokens,
        }
    }

    async fn run_stages(
        &self,
        instruction: Instruction,
        request: &AgentRequest,
    ) -> Result<AgentResponse, AgentError> {
        let stage_one = guidance_prompt(instruction, request).with_max_tokens(self.max_tokens);
        log::debug!("{instruction}: requesting {} model", self.guidance.kind());
        let guidance = self.guidance.complete(&stage_one).await?;

        if instruction == Instruction::General
            && !requires_code_generation(&guidance, &request.message)
        {
            log::debug!("{instruction}: informational request, skipping generation");
            return Ok(AgentResponse::completed(guidance, Vec::new()));
        }

        let stage_two =
            generation_prompt(instruction, request, &guidance).with_max_tokens(self.max_tokens);
        log::debug!("{instruction}: requesting {} model", self.generation.kind());
        let generated = self.generation.complete(&stage_two).await?;

        let target = match instruction {
            Instruction::GenerateTests => test_file_path(request.target_path()),
            _ => request.target_path().map(str::to_string),
        };
        let modified_files = extract_modifications(&generated, target.as_deref());
        log::debug!(
            "{instruction}: {} file modification(s) extracted",
            modified_files.len()
        );

        let text = match instruction {
            Instruction::GenerateCode | Instruction::General => format!(
                "Guidance:\n{guidance}\n\n{}:\n{generated}",
                Instruction::GenerateCode.heading()
            ),
            _ => format!("{}:\n\n{generated}", instruction.heading()),
        };

        Ok(AgentResponse::completed(text, modified_files).with_explanation(guidance))
    }
}

impl AgentStrategy for LiveOrchestration {
    fn name(&self) -> &'static str {
        "live"
    }

    fn run<'a>(
        &'a self,
        instruction: Instruction,
        request: &'a AgentRequest,
    ) -> BoxFuture<'a, Result<AgentResponse, AgentError>> {
        Box::pin(self.run_stages(instruction, request))
    }
}
