use crate::config::{ConfigReport, GatewayOptions};
use crate::orchestrator::Orchestrator;
use crate::prelude::{eprintln, *};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use codeagent_core::agent::{
    AgentRequest, AgentResponse, CodeAnalysisRequest, RefactorRequest, TestGenerationRequest,
};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, env = "CODEAGENT_PORT", default_value = "5210")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[clap(flatten)]
    pub gateway: GatewayOptions,
}

#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<Orchestrator>,
    config: Arc<ConfigReport>,
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    timestamp: u64,
}

pub async fn run(options: ServeOptions, global: crate::Global) -> Result<()> {
    let orchestrator = options.gateway.build_orchestrator()?;
    let config = options.gateway.report();
    let addr = format!("{}:{}", options.host, options.port);

    if global.verbose {
        eprintln!(
            "Starting agent API on http://{addr} ({})",
            if config.demo_mode { "demo mode" } else { "live" }
        );
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    log::info!("agent API listening on http://{addr}");

    axum::serve(listener, router(orchestrator, config))
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

pub fn router(orchestrator: Arc<Orchestrator>, config: ConfigReport) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState {
        orchestrator,
        config: Arc::new(config),
    };

    Router::new()
        .route("/api/agent/process", post(process_handler))
        .route("/api/agent/analyze-code", post(analyze_code_handler))
        .route("/api/agent/refactor", post(refactor_handler))
        .route("/api/agent/generate-tests", post(generate_tests_handler))
        .route("/api/agent/health", get(health_handler))
        .route("/api/agent/test-config", get(test_config_handler))
        .layer(cors)
        .with_state(state)
}

/// Runs a request, cancelling its gateway calls if the client goes away.
async fn respond(state: &AppState, request: AgentRequest) -> Json<AgentResponse> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();
    Json(state.orchestrator.process_cancellable(&request, &cancel).await)
}

async fn process_handler(
    State(state): State<AppState>,
    Json(request): Json<AgentRequest>,
) -> Json<AgentResponse> {
    respond(&state, request).await
}

async fn analyze_code_handler(
    State(state): State<AppState>,
    Json(request): Json<CodeAnalysisRequest>,
) -> Json<AgentResponse> {
    respond(&state, request.into()).await
}

async fn refactor_handler(
    State(state): State<AppState>,
    Json(request): Json<RefactorRequest>,
) -> Json<AgentResponse> {
    respond(&state, request.into()).await
}

async fn generate_tests_handler(
    State(state): State<AppState>,
    Json(request): Json<TestGenerationRequest>,
) -> Json<AgentResponse> {
    respond(&state, request.into()).await
}

async fn health_handler() -> Json<Health> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();

    Json(Health {
        status: "Healthy",
        timestamp,
    })
}

async fn test_config_handler(State(state): State<AppState>) -> Json<ConfigReport> {
    Json(state.config.as_ref().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::test_server;

    async fn spawn_demo_server() -> String {
        let options = GatewayOptions::default();
        let orchestrator = options.build_orchestrator().unwrap();
        test_server::spawn(router(orchestrator, options.report())).await
    }

    #[tokio::test]
    async fn test_health() {
        let base = spawn_demo_server().await;
        let body: serde_json::Value = reqwest::get(format!("{base}/api/agent/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["status"], "Healthy");
    }

    #[tokio::test]
    async fn test_config_reports_demo_mode() {
        let base = spawn_demo_server().await;
        let body: serde_json::Value = reqwest::get(format!("{base}/api/agent/test-config"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["demoMode"], true);
        assert_eq!(body["guidanceConfigured"], false);
    }

    #[tokio::test]
    async fn test_process_in_demo_mode() {
        let base = spawn_demo_server().await;
        let response: AgentResponse = reqwest::Client::new()
            .post(format!("{base}/api/agent/process"))
            .json(&serde_json::json!({
                "message": "",
                "instruction": "analyze-code",
                "selectedCode": "public class HomeController : ControllerBase { }"
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert!(response.success);
        assert!(response.response_text.contains("Controller"));
    }

    #[tokio::test]
    async fn test_generate_tests_endpoint_targets_test_file() {
        let base = spawn_demo_server().await;
        let response: AgentResponse = reqwest::Client::new()
            .post(format!("{base}/api/agent/generate-tests"))
            .json(&serde_json::json!({
                "code": "public class Invoice\n{\n    public decimal Total() => 0m;\n}",
                "filePath": "src/Billing/Invoice.cs",
                "className": "Invoice",
                "testFramework": "NUnit"
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.modified_files.len(), 1);
        assert_eq!(
            response.modified_files[0].path,
            "tests/Billing/InvoiceTests.cs"
        );
        assert!(response.modified_files[0].new_content.contains("[Test]"));
    }
}
