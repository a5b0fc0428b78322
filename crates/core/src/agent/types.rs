use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Default test framework when a request does not name one.
pub const DEFAULT_TEST_FRAMEWORK: &str = "xUnit";

/// Default mocking framework when a request does not name one.
pub const DEFAULT_MOCKING_FRAMEWORK: &str = "Moq";

/// Metadata key carrying the requested test framework.
pub const METADATA_TEST_FRAMEWORK: &str = "testFramework";

/// Metadata key carrying the requested mocking framework.
pub const METADATA_MOCKING_FRAMEWORK: &str = "mockingFramework";

/// A natural-language request issued from the IDE.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentRequest {
    pub message: String,
    pub project_context: String,
    /// Free-form instruction. Unrecognized values fall through to the general path.
    pub instruction: String,
    pub file_path: Option<String>,
    pub selected_code: Option<String>,
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl AgentRequest {
    /// The code the request is about: the selection when present, else the message.
    pub fn source_text(&self) -> &str {
        match self.selected_code.as_deref() {
            Some(code) if !code.trim().is_empty() => code,
            _ => &self.message,
        }
    }

    /// Reads a string value from metadata.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata
            .as_ref()?
            .get(key)?
            .as_str()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn test_framework(&self) -> &str {
        self.metadata_str(METADATA_TEST_FRAMEWORK)
            .unwrap_or(DEFAULT_TEST_FRAMEWORK)
    }

    pub fn mocking_framework(&self) -> &str {
        self.metadata_str(METADATA_MOCKING_FRAMEWORK)
            .unwrap_or(DEFAULT_MOCKING_FRAMEWORK)
    }

    /// Target path when it is present and non-blank.
    pub fn target_path(&self) -> Option<&str> {
        self.file_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }
}

/// The structured answer returned for every request, including failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
    pub response_text: String,
    #[serde(default)]
    pub modified_files: Vec<FileModification>,
    pub explanation: Option<String>,
    pub suggestions: Option<Vec<String>>,
    pub success: bool,
    pub error_message: Option<String>,
}

impl AgentResponse {
    /// A successful response carrying `text` and the given modifications.
    pub fn completed(text: impl Into<String>, modified_files: Vec<FileModification>) -> Self {
        Self {
            response_text: text.into(),
            modified_files,
            explanation: None,
            suggestions: None,
            success: true,
            error_message: None,
        }
    }

    /// A failed response. Never carries modifications.
    pub fn failed(text: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            response_text: text.into(),
            modified_files: Vec::new(),
            explanation: None,
            suggestions: None,
            success: false,
            error_message: Some(error_message.into()),
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }
}

/// Kind of change a [`FileModification`] describes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModificationType {
    #[default]
    Update,
    Create,
    Delete,
}

impl std::fmt::Display for ModificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModificationType::Update => write!(f, "update"),
            ModificationType::Create => write!(f, "create"),
            ModificationType::Delete => write!(f, "delete"),
        }
    }
}

/// New content proposed for one file. The caller decides whether to persist it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileModification {
    pub path: String,
    pub diff_summary: Option<String>,
    pub new_content: String,
    pub modification_type: ModificationType,
    pub backup_content: Option<String>,
}

impl FileModification {
    pub fn update(
        path: impl Into<String>,
        new_content: impl Into<String>,
        diff_summary: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            diff_summary: Some(diff_summary.into()),
            new_content: new_content.into(),
            modification_type: ModificationType::Update,
            backup_content: None,
        }
    }
}

/// Request body of the dedicated code analysis endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeAnalysisRequest {
    pub code: String,
    pub project_context: String,
    pub file_path: String,
    /// general, performance, security, ...
    pub analysis_type: Option<String>,
}

/// Request body of the dedicated refactoring endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefactorRequest {
    pub code: String,
    pub project_context: String,
    pub file_path: String,
    /// extract-method, dependency-injection, ...
    pub refactor_type: String,
    pub instructions: Option<String>,
}

/// Request body of the dedicated test generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestGenerationRequest {
    pub code: String,
    pub project_context: String,
    pub file_path: String,
    pub class_name: String,
    pub test_framework: String,
    pub include_mocking_framework: bool,
    pub mocking_framework: Option<String>,
}

impl Default for TestGenerationRequest {
    fn default() -> Self {
        Self {
            code: String::new(),
            project_context: String::new(),
            file_path: String::new(),
            class_name: String::new(),
            test_framework: DEFAULT_TEST_FRAMEWORK.to_string(),
            include_mocking_framework: true,
            mocking_framework: Some(DEFAULT_MOCKING_FRAMEWORK.to_string()),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl From<CodeAnalysisRequest> for AgentRequest {
    fn from(request: CodeAnalysisRequest) -> Self {
        let focus = request
            .analysis_type
            .as_deref()
            .filter(|kind| !kind.trim().is_empty() && *kind != "general")
            .map(|kind| format!(" (focus: {kind})"))
            .unwrap_or_default();

        Self {
            message: format!(
                "Analyze this code and suggest improvements{focus}:\n\n```\n{}\n```",
                request.code
            ),
            project_context: request.project_context,
            instruction: "analyze-code".to_string(),
            file_path: non_empty(request.file_path),
            selected_code: non_empty(request.code),
            metadata: None,
        }
    }
}

impl From<RefactorRequest> for AgentRequest {
    fn from(request: RefactorRequest) -> Self {
        let mut message = format!(
            "Refactor this code ({}):\n\n```\n{}\n```",
            request.refactor_type, request.code
        );
        if let Some(instructions) = request.instructions.filter(|i| !i.trim().is_empty()) {
            message.push_str(&format!("\n\nSpecific instructions: {instructions}"));
        }

        Self {
            message,
            project_context: request.project_context,
            instruction: "refactor".to_string(),
            file_path: non_empty(request.file_path),
            selected_code: non_empty(request.code),
            metadata: None,
        }
    }
}

impl From<TestGenerationRequest> for AgentRequest {
    fn from(request: TestGenerationRequest) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert(
            METADATA_TEST_FRAMEWORK.to_string(),
            serde_json::Value::String(request.test_framework.clone()),
        );
        if request.include_mocking_framework {
            if let Some(mocking) = &request.mocking_framework {
                metadata.insert(
                    METADATA_MOCKING_FRAMEWORK.to_string(),
                    serde_json::Value::String(mocking.clone()),
                );
            }
        }

        let subject = if request.class_name.trim().is_empty() {
            "this class".to_string()
        } else {
            format!("the class {}", request.class_name)
        };

        Self {
            message: format!(
                "Generate complete unit tests for {subject}:\n\n```\n{}\n```\n\nTest framework: {}",
                request.code, request.test_framework
            ),
            project_context: request.project_context,
            instruction: "generate-tests".to_string(),
            file_path: non_empty(request.file_path),
            selected_code: non_empty(request.code),
            metadata: Some(metadata),
        }
    }
}
