//! Prompt assembly for the two-stage pipeline.
//!
//! Stage 1 asks the guidance model for an analysis or a plan; stage 2 hands
//! that guidance to the generation model together with the original request.
//! Every function here is pure: it only formats text.

use serde::{Deserialize, Serialize};

use super::instruction::Instruction;
use super::types::AgentRequest;

pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Temperature used for analysis-style guidance.
pub const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// Temperature used whenever code is the expected output.
pub const CODE_TEMPERATURE: f32 = 0.1;

const GUIDANCE_PREAMBLE: &str = "\
You are an expert C# developer specialized in Blazor WebAssembly, MudBlazor and
three-tier architecture. You analyse requests in the context of an existing
project and answer concisely and technically.";

const GENERATION_PREAMBLE: &str = "\
You are an expert C# developer specialized in Blazor WebAssembly and MudBlazor.
You write clean, well-structured code that can be used as is.
Always follow C# conventions and good development practice.";

const REFACTOR_PREAMBLE: &str = "\
You are a C# refactoring expert. You improve code quality while preserving
behaviour, applying SOLID principles and appropriate design patterns.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// A provider-neutral completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>, temperature: f32) -> Self {
        Self {
            system: system.into(),
            messages: vec![ChatMessage::user(user)],
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

fn fenced(code: &str) -> String {
    format!("```csharp\n{}\n```", code.trim_end())
}

/// The path-specific directive handed to the guidance model.
pub fn guidance_directive(instruction: Instruction, request: &AgentRequest) -> String {
    let code = request.source_text();
    match instruction {
        Instruction::AnalyzeCode => format!(
            "Analyse this code and suggest improvements:\n\n{}",
            fenced(code)
        ),
        Instruction::Refactor => format!(
            "Analyse this code for refactoring:\n\n{}\n\nGoal: {}",
            fenced(code),
            request.message
        ),
        Instruction::GenerateTests => format!(
            "Outline a unit test strategy for this code using {} (mocking with {}). \
             List the scenarios, edge cases and failure cases worth covering:\n\n{}",
            request.test_framework(),
            request.mocking_framework(),
            fenced(code)
        ),
        Instruction::GenerateCode => format!(
            "Give precise implementation guidelines for this request:\n\n{}",
            request.message
        ),
        Instruction::General => request.message.clone(),
    }
}

/// Builds the stage-1 request for the guidance model.
pub fn guidance_prompt(instruction: Instruction, request: &AgentRequest) -> CompletionRequest {
    let directive = guidance_directive(instruction, request);
    let project_context = if request.project_context.trim().is_empty() {
        "(no project context provided)"
    } else {
        request.project_context.as_str()
    };

    let user = format!(
        "PROJECT CONTEXT:\n{project_context}\n\n\
         USER REQUEST:\n{directive}\n\n\
         INSTRUCTIONS:\n\
         1. Understand the request in the context of the project.\n\
         2. Identify the files or components likely to be affected.\n\
         3. Propose a clear, structured technical approach.\n\
         4. Respect C#, Blazor WebAssembly and three-tier best practices.\n\
         5. If code has to be written, give precise guidelines for the code generator.\n\n\
         Answer concisely and technically."
    );

    let temperature = match instruction {
        Instruction::GenerateCode => CODE_TEMPERATURE,
        _ => ANALYSIS_TEMPERATURE,
    };

    CompletionRequest::new(GUIDANCE_PREAMBLE, user, temperature)
}

/// Builds the stage-2 request for the generation model.
pub fn generation_prompt(
    instruction: Instruction,
    request: &AgentRequest,
    guidance: &str,
) -> CompletionRequest {
    let code = request.source_text();
    match instruction {
        Instruction::Refactor => CompletionRequest::new(
            REFACTOR_PREAMBLE,
            format!(
                "Refactor this C# code following these instructions:\n\n\
                 REFACTORING INSTRUCTIONS:\n{guidance}\n\n\
                 CODE TO REFACTOR:\n{}\n\n\
                 Provide:\n\
                 1. A short explanation of the improvements\n\
                 2. The complete refactored code between ```csharp and ```\n\
                 3. A justification of the changes",
                fenced(code)
            ),
            CODE_TEMPERATURE,
        ),
        Instruction::GenerateTests => {
            let framework = request.test_framework();
            let mocking = request.mocking_framework();
            CompletionRequest::new(
                format!(
                    "You are an expert in C# unit testing with {framework}. You write complete, \
                     well-structured tests covering the important cases."
                ),
                format!(
                    "Write complete unit tests for this C# code:\n\n{}\n\n\
                     TEST STRATEGY:\n{guidance}\n\n\
                     REQUIREMENTS:\n\
                     - Test framework: {framework}\n\
                     - Mocking framework: {mocking} (if needed)\n\
                     - Cover nominal and error cases\n\
                     - Use descriptive test names\n\
                     - Include the necessary using statements\n\n\
                     Response format:\n\
                     1. A short explanation of the test strategy\n\
                     2. The complete test class between ```csharp and ```\n\
                     3. Integration notes",
                    fenced(code)
                ),
                CODE_TEMPERATURE,
            )
        }
        Instruction::AnalyzeCode => CompletionRequest::new(
            GENERATION_PREAMBLE,
            format!(
                "{guidance}\n\n\
                 CODE UNDER REVIEW:\n{}\n\n\
                 Apply the improvements above. Format your answer as:\n\
                 1. A short summary of what changed\n\
                 2. The complete improved code between ```csharp and ```",
                fenced(code)
            ),
            CODE_TEMPERATURE,
        ),
        Instruction::GenerateCode | Instruction::General => CompletionRequest::new(
            GENERATION_PREAMBLE,
            format!(
                "{guidance}\n\n\
                 SPECIFIC REQUEST:\n{}\n\n\
                 Generate complete, working C# code. Format your answer as:\n\
                 1. A short explanation of what the code does\n\
                 2. The complete code between ```csharp and ```\n\
                 3. Integration notes if needed",
                request.message
            ),
            CODE_TEMPERATURE,
        ),
    }
}
