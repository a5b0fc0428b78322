use crate::prelude::{eprintln, *};
use codeagent_core::agent::AgentRequest;
use codeagent_core::analysis::analyze;
use serde::Deserialize;

use super::{internal_error, CallToolResult, Content, Context, JsonRpcError};

fn invalid_arguments(e: serde_json::Error) -> JsonRpcError {
    JsonRpcError {
        code: -32602,
        message: format!("Invalid arguments: {e}"),
        data: None,
    }
}

fn text_result(
    value: &impl serde::Serialize,
    is_error: Option<bool>,
) -> Result<serde_json::Value, JsonRpcError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Serialization error: {e}"),
        data: None,
    })?;

    serde_json::to_value(CallToolResult {
        content: vec![Content::Text { text }],
        is_error,
    })
    .map_err(internal_error)
}

pub async fn handle_agent_process(
    arguments: Option<serde_json::Value>,
    context: &Context,
) -> Result<serde_json::Value, JsonRpcError> {
    let request: AgentRequest =
        serde_json::from_value(arguments.unwrap_or_else(|| serde_json::json!({})))
            .map_err(invalid_arguments)?;

    if context.global.verbose {
        eprintln!(
            "Calling agent_process: instruction={:?}, filePath={:?}",
            request.instruction, request.file_path
        );
    }

    let response = context.orchestrator.process(&request).await;
    let is_error = (!response.success).then_some(true);
    text_result(&response, is_error)
}

pub fn handle_analyze_code(
    arguments: Option<serde_json::Value>,
    context: &Context,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct AnalyzeCodeArgs {
        code: String,
    }

    let args: AnalyzeCodeArgs =
        serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
            .map_err(invalid_arguments)?;

    if context.global.verbose {
        eprintln!("Calling analyze_code: {} bytes", args.code.len());
    }

    text_result(&analyze(&args.code), None)
}
