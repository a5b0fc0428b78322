mod agent;

use serde::{Deserialize, Serialize};

// Re-export types needed by tool handlers
pub use super::{Context, JsonRpcError, Tool};

// MCP Protocol types for tools
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
pub struct ToolsCapability {}

#[derive(Debug, Serialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ToolsList {
    pub tools: Vec<Tool>,
}

#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

pub(crate) fn internal_error(e: impl std::fmt::Display) -> JsonRpcError {
    JsonRpcError {
        code: -32603,
        message: format!("Internal error: {e}"),
        data: None,
    }
}

pub fn handle_initialize() -> Result<serde_json::Value, JsonRpcError> {
    let result = InitializeResult {
        protocol_version: "2024-11-05".to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability {}),
        },
        server_info: ServerInfo {
            name: "codeagent".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    serde_json::to_value(result).map_err(internal_error)
}

pub fn handle_tools_list() -> Result<serde_json::Value, JsonRpcError> {
    let tools = vec![
        Tool {
            name: "agent_process".to_string(),
            description: "Send a natural-language coding request to the agent. A guidance model plans the change and a generation model writes the code; fenced code in the answer is returned as a file modification for filePath. Without model credentials the agent answers with a built-in heuristic analyzer. Returns the AgentResponse as JSON.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "message": {
                        "type": "string",
                        "description": "Natural-language request"
                    },
                    "instruction": {
                        "type": "string",
                        "description": "analyze-code, refactor, generate-tests or generate-code. Anything else is a general request",
                        "default": ""
                    },
                    "projectContext": {
                        "type": "string",
                        "description": "Description of the project the code belongs to"
                    },
                    "filePath": {
                        "type": "string",
                        "description": "Path of the file the request targets"
                    },
                    "selectedCode": {
                        "type": "string",
                        "description": "Code to work on"
                    },
                    "metadata": {
                        "type": "object",
                        "description": "Extra options such as testFramework and mockingFramework"
                    }
                },
                "required": []
            }),
        },
        Tool {
            name: "analyze_code".to_string(),
            description: "Run the offline lexical analyzer over C# or Razor source. Detects the kind of code (Controller, Service, Component) and reports issues such as missing async methods, missing interfaces or string-built SQL. Never calls a model.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "code": {
                        "type": "string",
                        "description": "Source code to analyze"
                    }
                },
                "required": ["code"]
            }),
        },
    ];

    serde_json::to_value(ToolsList { tools }).map_err(internal_error)
}

pub async fn handle_tools_call(
    params: Option<serde_json::Value>,
    context: &Context,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: CallToolParams = serde_json::from_value(params.unwrap_or(serde_json::Value::Null))
        .map_err(|e| JsonRpcError {
            code: -32602,
            message: format!("Invalid params: {e}"),
            data: None,
        })?;

    match params.name.as_str() {
        "agent_process" => agent::handle_agent_process(params.arguments, context).await,
        "analyze_code" => agent::handle_analyze_code(params.arguments, context),
        name => Err(JsonRpcError {
            code: -32602,
            message: format!("Unknown tool: {name}"),
            data: None,
        }),
    }
}
