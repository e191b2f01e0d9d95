//! HTTP surface wrapping the intake orchestrator and diagnostics reporter

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use lead_core::{DiagnosticsReporter, IntakeOrchestrator, LeadsError};
use lead_types::{CreateLeadResponse, DiagnosticsReport, ErrorResponse, Lead, MessageResponse};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<IntakeOrchestrator>,
    diagnostics: Arc<DiagnosticsReporter>,
}

impl AppState {
    pub fn new(orchestrator: IntakeOrchestrator, diagnostics: DiagnosticsReporter) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            diagnostics: Arc::new(diagnostics),
        }
    }
}

/// Request failure rendered as `{detail}` with the matching status
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl From<LeadsError> for ApiError {
    fn from(err: LeadsError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self { status, detail: err.to_string() }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { detail: self.detail })).into_response()
    }
}

/// Build the router with permissive CORS, as the web form is served elsewhere
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(read_root))
        .route("/api/hello", get(hello))
        .route("/test", get(diagnostics))
        .route("/api/leads", post(create_lead))
        .layer(cors)
        .with_state(state)
}

async fn read_root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello from the lead intake backend!"))
}

async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello from the backend API!"))
}

async fn diagnostics(State(state): State<AppState>) -> Json<DiagnosticsReport> {
    Json(state.diagnostics.report().await)
}

async fn create_lead(
    State(state): State<AppState>,
    payload: Result<Json<Lead>, JsonRejection>,
) -> Result<Json<CreateLeadResponse>, ApiError> {
    let Json(lead) = payload.map_err(|rejection| {
        log::info!("Rejected lead payload: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;

    match state.orchestrator.submit(lead).await {
        Ok(receipt) => Ok(Json(receipt.to_response())),
        Err(e) => {
            if e.is_client_error() {
                log::info!("Rejected lead: {}", e);
            } else {
                log::error!("Failed to accept lead: {}", e);
            }
            Err(e.into())
        }
    }
}
