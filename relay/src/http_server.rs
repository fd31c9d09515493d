use crate::relay::RelayHandler;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use gemini_core::errors::{GeminiError, UNKNOWN_ERROR_MESSAGE};
use gemini_core::{RelayRequest, RelayResponse};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Application state shared with all routes
#[derive(Clone)]
pub struct AppState {
    handler: Arc<RelayHandler>,
}

impl AppState {
    pub fn new(handler: RelayHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}

/// Error type for HTTP server
#[derive(Debug)]
pub struct ApiError(GeminiError);

impl From<GeminiError> for ApiError {
    fn from(e: GeminiError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Every failure, including a rejected request body, answers 500 with `{ error }`
        let status = StatusCode::INTERNAL_SERVER_ERROR;

        match &self.0 {
            GeminiError::UpstreamShapeError { missing } => {
                error!(missing = *missing, "Invalid response from Gemini API");
            }
            GeminiError::ValidationError(msg) => {
                warn!(error = %msg, "Rejected chat request");
            }
            e => {
                error!(error = %e, "Failed to relay chat message");
            }
        }

        let body = Json(RelayResponse::error(self.0.public_message()));
        (status, body).into_response()
    }
}

/// Build the relay router
pub fn router(state: AppState) -> Router {
    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    Router::new()
        .route("/", get(health))
        .route("/api/chat", post(handle_chat))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server, running until Ctrl-C
pub async fn run_server(handler: RelayHandler, addr: SocketAddr) -> anyhow::Result<()> {
    info!("Starting HTTP server on {}", addr);

    let app = router(AppState::new(handler));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start HTTP server: {}", e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

/// Health check handler
async fn health() -> impl IntoResponse {
    "Gemini relay is running"
}

/// Handler for chat messages
async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<RelayRequest>, JsonRejection>,
) -> Result<Json<RelayResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| GeminiError::ValidationError(rejection.body_text()))?;

    let reply = state.handler.relay(request).await?;
    Ok(Json(RelayResponse::reply(reply)))
}

/// Turns a panic inside a handler into the generic `{ error }` body.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    };
    error!(panic = %detail, "Handler panicked");

    let body = Json(RelayResponse::error(UNKNOWN_ERROR_MESSAGE));
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}
