use crate::prelude::{eprintln, *};
use axum::{
    extract::State,
    response::sse::{Event, Sse},
    routing::{get, post},
    Json, Router,
};
use futures::stream::{self, Stream};
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

const MESSAGE_PATH: &str = "/message";

pub async fn run_sse(options: super::cli::SseOptions, context: super::Context) -> Result<()> {
    let addr = format!("{}:{}", options.host, options.port);

    if context.global.verbose {
        eprintln!("MCP server listening on http://{addr}");
        eprintln!("SSE endpoint: http://{addr}/sse");
        eprintln!("Message endpoint: http://{addr}{MESSAGE_PATH}");
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    axum::serve(listener, router(context))
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

pub fn router(context: super::Context) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/sse", get(sse_handler))
        .route(MESSAGE_PATH, post(message_handler))
        .layer(cors)
        .with_state(Arc::new(context))
}

/// Tells the client where to post its JSON-RPC messages.
async fn sse_handler() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = stream::once(async { Ok(Event::default().event("endpoint").data(MESSAGE_PATH)) });
    Sse::new(stream)
}

async fn message_handler(
    State(context): State<Arc<super::Context>>,
    Json(request): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    let response = super::handle_request(&request.to_string(), &context).await;
    Json(serde_json::to_value(response).unwrap_or(serde_json::Value::Null))
}
