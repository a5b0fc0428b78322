//! Request dispatch and response assembly.
//!
//! [`Orchestrator::process`] classifies the instruction, picks a strategy once
//! per request and always returns a well-formed [`AgentResponse`]. Failures are
//! logged with full detail and reduced to a caller-safe message.

mod extract;
mod heuristic;
mod live;
mod summary;

pub use heuristic::HeuristicFallback;
pub use live::LiveOrchestration;

use crate::error::AgentError;
use crate::gateway::ModelGateway;
use codeagent_core::agent::{AgentRequest, AgentResponse, Instruction, DEFAULT_MAX_TOKENS};
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Response text used for every failed request.
pub const FAILURE_TEXT: &str = "An error occurred while processing your request.";

/// One way of answering a classified request.
pub trait AgentStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn run<'a>(
        &'a self,
        instruction: Instruction,
        request: &'a AgentRequest,
    ) -> BoxFuture<'a, Result<AgentResponse, AgentError>>;
}

pub struct Orchestrator {
    guidance: Arc<dyn ModelGateway>,
    generation: Arc<dyn ModelGateway>,
    max_tokens: u32,
}

impl Orchestrator {
    pub fn new(guidance: Arc<dyn ModelGateway>, generation: Arc<dyn ModelGateway>) -> Self {
        Self {
            guidance,
            generation,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// True when the guidance gateway has no usable key.
    pub fn demo_mode(&self) -> bool {
        !self.guidance.credential_state().is_present()
    }

    pub fn select_strategy(&self) -> Box<dyn AgentStrategy> {
        if self.demo_mode() {
            Box::new(HeuristicFallback)
        } else {
            Box::new(LiveOrchestration::new(
                self.guidance.clone(),
                self.generation.clone(),
                self.max_tokens,
            ))
        }
    }

    /// Runs the request and returns the typed outcome.
    pub async fn try_process(&self, request: &AgentRequest) -> Result<AgentResponse, AgentError> {
        let instruction = Instruction::classify(&request.instruction);
        let strategy = self.select_strategy();
        log::info!(
            "processing instruction={instruction} strategy={}",
            strategy.name()
        );

        match strategy.run(instruction, request).await {
            Err(AgentError::Gateway(err)) if err.is_configuration_absent() => {
                log::warn!("{err}, answering with the heuristic analyzer");
                Ok(HeuristicFallback.respond(instruction, request))
            }
            outcome => outcome,
        }
    }

    /// Like [`Orchestrator::try_process`], aborting in-flight gateway calls when
    /// `cancel` fires.
    pub async fn try_process_cancellable(
        &self,
        request: &AgentRequest,
        cancel: &CancellationToken,
    ) -> Result<AgentResponse, AgentError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AgentError::Cancelled),
            outcome = self.try_process(request) => outcome,
        }
    }

    pub async fn process_cancellable(
        &self,
        request: &AgentRequest,
        cancel: &CancellationToken,
    ) -> AgentResponse {
        match self.try_process_cancellable(request, cancel).await {
            Ok(response) => response,
            Err(err) => {
                log::error!("request failed: {err}");
                AgentResponse::failed(FAILURE_TEXT, err.user_message())
            }
        }
    }

    /// Never fails: every error becomes a `success = false` response.
    pub async fn process(&self, request: &AgentRequest) -> AgentResponse {
        self.process_cancellable(request, &CancellationToken::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GatewayError, GatewayKind};
    use codeagent_core::agent::{CompletionRequest, ModificationType};
    use codeagent_core::analysis::demo::DEMO_NOTICE;
    use codeagent_core::analysis::ISSUE_MISSING_ASYNC;
    use codeagent_core::credentials::CredentialState;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    // ---------------------------------------------------------------------
    // Fake gateways
    // ---------------------------------------------------------------------

    enum Reply {
        Text(String),
        Timeout,
        Hang,
        Absent,
    }

    struct FakeGateway {
        kind: GatewayKind,
        state: CredentialState,
        reply: Reply,
        calls: AtomicUsize,
        prompts: Mutex<Vec<CompletionRequest>>,
    }

    impl FakeGateway {
        fn new(kind: GatewayKind, reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                kind,
                state: CredentialState::Present,
                reply,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn without_credentials(kind: GatewayKind) -> Arc<Self> {
            Arc::new(Self {
                kind,
                state: CredentialState::Absent,
                reply: Reply::Absent,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ModelGateway for FakeGateway {
        fn kind(&self) -> GatewayKind {
            self.kind
        }

        fn credential_state(&self) -> CredentialState {
            self.state
        }

        fn complete<'a>(
            &'a self,
            request: &'a CompletionRequest,
        ) -> BoxFuture<'a, Result<String, GatewayError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(request.clone());
            let gateway = self.kind;
            Box::pin(async move {
                match &self.reply {
                    Reply::Text(text) => Ok(text.clone()),
                    Reply::Timeout => Err(GatewayError::Timeout {
                        gateway,
                        seconds: 300,
                    }),
                    Reply::Hang => {
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                        Ok(String::new())
                    }
                    Reply::Absent => Err(GatewayError::CredentialsAbsent { gateway }),
                }
            })
        }
    }

    fn guidance(reply: Reply) -> Arc<FakeGateway> {
        FakeGateway::new(GatewayKind::Guidance, reply)
    }

    fn generation(reply: Reply) -> Arc<FakeGateway> {
        FakeGateway::new(GatewayKind::Generation, reply)
    }

    fn text(value: &str) -> Reply {
        Reply::Text(value.to_string())
    }

    fn create_test_request(instruction: &str, message: &str) -> AgentRequest {
        AgentRequest {
            message: message.to_string(),
            project_context: "Blazor WebAssembly, three tiers".to_string(),
            instruction: instruction.to_string(),
            ..Default::default()
        }
    }

    fn demo_orchestrator() -> Orchestrator {
        Orchestrator::new(
            FakeGateway::without_credentials(GatewayKind::Guidance),
            FakeGateway::without_credentials(GatewayKind::Generation),
        )
    }

    // ---------------------------------------------------------------------
    // Demo mode
    // ---------------------------------------------------------------------

    #[tokio::test]
    async fn test_demo_analysis_flags_sync_controller() {
        let mut request = create_test_request("analyze-code", "");
        request.selected_code = Some(
            "public class OrdersController : ControllerBase\n{\n    public IActionResult Get() => Ok();\n}"
                .to_string(),
        );

        let response = demo_orchestrator().process(&request).await;

        assert!(response.success);
        assert!(response.response_text.contains("Controller"));
        assert!(response.response_text.contains(ISSUE_MISSING_ASYNC));
        assert!(response.modified_files.is_empty());
        assert_eq!(response.explanation.as_deref(), Some(DEMO_NOTICE));
        assert_eq!(response.suggestions.as_ref().map(Vec::len), Some(4));
    }

    #[tokio::test]
    async fn test_demo_refactor_produces_one_update() {
        let mut request = create_test_request("refactor", "clean this up");
        request.selected_code = Some("class Foo : Service {}".to_string());
        request.file_path = Some("Foo.txt".to_string());

        let response = demo_orchestrator().process(&request).await;

        assert!(response.success);
        assert_eq!(response.modified_files.len(), 1);
        let modification = &response.modified_files[0];
        assert_eq!(modification.path, "Foo.txt");
        assert_eq!(modification.modification_type, ModificationType::Update);
        assert!(!modification.new_content.is_empty());
        assert!(modification.diff_summary.is_some());
    }

    #[tokio::test]
    async fn test_demo_refactor_without_selection_leaves_file_alone() {
        let mut request = create_test_request("refactor", "Please clean up this file");
        request.file_path = Some("Foo.cs".to_string());

        let response = demo_orchestrator().process(&request).await;

        assert!(response.success);
        assert!(response.modified_files.is_empty());
    }

    #[tokio::test]
    async fn test_demo_tests_target_derived_path() {
        let mut request = create_test_request("generate-tests", "");
        request.selected_code =
            Some("public class PriceCalculator\n{\n    public decimal Total() => 0m;\n}".to_string());
        request.file_path = Some("src/Services/PriceCalculator.cs".to_string());

        let response = demo_orchestrator().process(&request).await;

        assert_eq!(response.modified_files.len(), 1);
        assert_eq!(
            response.modified_files[0].path,
            "tests/Services/PriceCalculatorTests.cs"
        );
    }

    #[tokio::test]
    async fn test_demo_never_calls_gateways() {
        let guidance = FakeGateway::without_credentials(GatewayKind::Guidance);
        let generation = generation(text("unused"));
        let orchestrator = Orchestrator::new(guidance.clone(), generation.clone());

        for instruction in ["analyze-code", "refactor", "generate-tests", "generate-code", ""] {
            let response = orchestrator
                .process(&create_test_request(instruction, "create a service"))
                .await;
            assert!(response.success, "{instruction} failed");
        }

        assert_eq!(guidance.calls(), 0);
        assert_eq!(generation.calls(), 0);
    }

    // ---------------------------------------------------------------------
    // Live mode
    // ---------------------------------------------------------------------

    #[tokio::test]
    async fn test_general_without_verbs_skips_generation() {
        let guidance = guidance(text("Your layering already follows the three-tier model."));
        let generation = generation(text("```csharp\nclass X {}\n```"));
        let orchestrator = Orchestrator::new(guidance.clone(), generation.clone());

        let mut request = create_test_request("", "Is my architecture sound?");
        request.file_path = Some("X.cs".to_string());
        let response = orchestrator.process(&request).await;

        assert!(response.success);
        assert_eq!(
            response.response_text,
            "Your layering already follows the three-tier model."
        );
        assert!(response.modified_files.is_empty());
        assert_eq!(guidance.calls(), 1);
        assert_eq!(generation.calls(), 0);
    }

    #[tokio::test]
    async fn test_general_lookalike_words_skip_generation() {
        let guidance = guidance(text("Additional context: the address lives in the writer role."));
        let generation = generation(text("```csharp\nclass X {}\n```"));
        let orchestrator = Orchestrator::new(guidance.clone(), generation.clone());

        let mut request = create_test_request("", "What is the address of the additional writer?");
        request.file_path = Some("X.cs".to_string());
        let response = orchestrator.process(&request).await;

        assert!(response.success);
        assert!(response.modified_files.is_empty());
        assert_eq!(generation.calls(), 0);
    }

    #[tokio::test]
    async fn test_general_with_verb_escalates() {
        let guidance = guidance(text("A repository class fits here."));
        let generation = generation(text("```csharp\npublic class Repo {}\n```"));
        let orchestrator = Orchestrator::new(guidance.clone(), generation.clone());

        let mut request = create_test_request("", "Please create a repository");
        request.file_path = Some("does/not/exist/Repo.cs".to_string());
        let response = orchestrator.process(&request).await;

        assert!(response.success);
        assert_eq!(generation.calls(), 1);
        assert_eq!(response.modified_files.len(), 1);
        assert_eq!(response.modified_files[0].new_content, "public class Repo {}");
        assert!(response.response_text.contains("A repository class fits here."));
    }

    #[tokio::test]
    async fn test_generation_without_fence_has_no_modifications() {
        let orchestrator = Orchestrator::new(
            guidance(text("Extract an interface.")),
            generation(text("I would rather not change anything.")),
        );

        let mut request = create_test_request("refactor", "tidy");
        request.selected_code = Some("class Foo {}".to_string());
        request.file_path = Some("Foo.cs".to_string());
        let response = orchestrator.process(&request).await;

        assert!(response.success);
        assert!(response.modified_files.is_empty());
        assert_eq!(response.explanation.as_deref(), Some("Extract an interface."));
    }

    #[tokio::test]
    async fn test_guidance_timeout_fails_cleanly() {
        let generation = generation(text("unused"));
        let orchestrator = Orchestrator::new(guidance(Reply::Timeout), generation.clone());

        let mut request = create_test_request("generate-code", "create a DTO");
        request.file_path = Some("Dto.cs".to_string());
        let response = orchestrator.process(&request).await;

        assert!(!response.success);
        assert!(response.modified_files.is_empty());
        let message = response.error_message.unwrap();
        assert!(!message.is_empty());
        assert!(!message.contains("300"));
        assert_eq!(generation.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_instruction_uses_general_path() {
        let guidance = guidance(text("Informational answer."));
        let generation = generation(text("unused"));
        let orchestrator = Orchestrator::new(guidance.clone(), generation.clone());

        let response = orchestrator
            .process(&create_test_request("Analyze-Code", "What is this?"))
            .await;

        assert!(response.success);
        assert_eq!(response.response_text, "Informational answer.");
        assert_eq!(generation.calls(), 0);
    }

    #[tokio::test]
    async fn test_every_code_path_uses_both_stages() {
        for instruction in ["analyze-code", "refactor", "generate-tests", "generate-code"] {
            let guidance = guidance(text("guidance"));
            let generation = generation(text("```csharp\nclass A {}\n```"));
            let orchestrator = Orchestrator::new(guidance.clone(), generation.clone())
                .with_max_tokens(1234);

            let mut request = create_test_request(instruction, "x");
            request.selected_code = Some("class A {}".to_string());
            let response = orchestrator.process(&request).await;

            assert!(response.success, "{instruction} failed");
            assert_eq!(guidance.calls(), 1, "{instruction}");
            assert_eq!(generation.calls(), 1, "{instruction}");
            assert_eq!(guidance.prompts.lock().unwrap()[0].max_tokens, 1234);
            assert_eq!(generation.prompts.lock().unwrap()[0].temperature, 0.1);
        }
    }

    #[tokio::test]
    async fn test_live_tests_path_targets_test_file() {
        let orchestrator = Orchestrator::new(
            guidance(text("Cover the empty cart.")),
            generation(text("```csharp\npublic class CartTests {}\n```")),
        );

        let mut request = create_test_request("generate-tests", "");
        request.selected_code = Some("public class Cart {}".to_string());
        request.file_path = Some("/repo/src/Cart.cs".to_string());
        let response = orchestrator.process(&request).await;

        assert_eq!(response.modified_files[0].path, "/repo/tests/CartTests.cs");
        assert!(response.response_text.starts_with("Generated tests"));
    }

    #[tokio::test]
    async fn test_absent_generation_key_falls_back() {
        let guidance = guidance(text("Write a service class."));
        let orchestrator = Orchestrator::new(
            guidance.clone(),
            FakeGateway::without_credentials(GatewayKind::Generation),
        );

        let response = orchestrator
            .process(&create_test_request("generate-code", "create an OrderService"))
            .await;

        assert!(response.success);
        assert_eq!(response.explanation.as_deref(), Some(DEMO_NOTICE));
    }

    // ---------------------------------------------------------------------
    // Cancellation
    // ---------------------------------------------------------------------

    #[tokio::test]
    async fn test_cancellation_is_a_distinct_failure() {
        let orchestrator = Orchestrator::new(guidance(Reply::Hang), generation(text("unused")));
        let cancel = CancellationToken::new();
        let request = create_test_request("analyze-code", "class A {}");

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let outcome = orchestrator.try_process_cancellable(&request, &cancel).await;
        assert!(matches!(outcome, Err(AgentError::Cancelled)));

        let response = orchestrator.process_cancellable(&request, &cancel).await;
        assert!(!response.success);
        assert!(response.modified_files.is_empty());
        assert_eq!(
            response.error_message.as_deref(),
            Some("The request was cancelled.")
        );
    }
}
