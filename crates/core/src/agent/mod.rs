pub mod instruction;
pub mod intent;
pub mod paths;
pub mod prompt;
pub mod types;

pub use instruction::Instruction;
pub use intent::{contains_action_verb, requires_code_generation};
pub use paths::test_file_path;
pub use prompt::{
    generation_prompt, guidance_prompt, ChatMessage, ChatRole, CompletionRequest,
    DEFAULT_MAX_TOKENS,
};
pub use types::{
    AgentRequest, AgentResponse, CodeAnalysisRequest, FileModification, ModificationType,
    RefactorRequest, TestGenerationRequest, DEFAULT_MOCKING_FRAMEWORK, DEFAULT_TEST_FRAMEWORK,
    METADATA_MOCKING_FRAMEWORK, METADATA_TEST_FRAMEWORK,
};
