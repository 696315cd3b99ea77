// HTTP server with API routes for speech synthesis

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use serde::Serialize;
use sori_core::{Error, SynthesisRequest};
use sori_engine::EngineHandle;
use std::sync::Arc;
use tracing::error;

// API state
#[derive(Clone)]
pub struct ApiState {
    pub handle: Arc<EngineHandle>,
}

// Statistics tracking
use std::sync::atomic::{AtomicU64, Ordering};
// Totals are read once more for the shutdown report
pub static TOTAL_REQUESTS: AtomicU64 = AtomicU64::new(0);
pub static TOTAL_SYNTHESES: AtomicU64 = AtomicU64::new(0);
pub static TOTAL_ERRORS: AtomicU64 = AtomicU64::new(0);
pub static TOTAL_SYNTHESIS_TIME_MS: AtomicU64 = AtomicU64::new(0);

// Response types
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub engine: String,
}

#[derive(Debug, Serialize)]
pub struct SpeakersResponse {
    pub engine: String,
    pub speakers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/tts", post(tts_handler))
        .route("/health", get(health_handler))
        .route("/speakers", get(speakers_handler))
        .with_state(state)
}

/// Synthesis endpoint. Returns raw audio on success, a JSON error otherwise.
async fn tts_handler(State(state): State<ApiState>, body: Bytes) -> impl IntoResponse {
    let request_start = std::time::Instant::now();
    TOTAL_REQUESTS.fetch_add(1, Ordering::Relaxed);

    // Parse by hand so malformed bodies get the same JSON error shape
    // instead of the extractor's plain-text rejection
    let request: SynthesisRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return error_response(&Error::InvalidInput(format!("Invalid JSON body: {}", e)));
        }
    };

    match state.handle.synthesize(&request).await {
        Ok(result) => {
            TOTAL_SYNTHESES.fetch_add(1, Ordering::Relaxed);

            let elapsed_ms = request_start.elapsed().as_millis();
            let elapsed_ms_u64 = if elapsed_ms > u64::MAX as u128 {
                u64::MAX
            } else {
                elapsed_ms as u64
            };
            TOTAL_SYNTHESIS_TIME_MS.fetch_add(elapsed_ms_u64, Ordering::Relaxed);

            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, result.mime_type)],
                result.audio,
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let status = if state.handle.is_ready() { "ok" } else { "error" };
    Json(HealthResponse {
        status: status.to_string(),
        engine: state.handle.engine_name().to_string(),
    })
}

async fn speakers_handler(State(state): State<ApiState>) -> impl IntoResponse {
    match state.handle.speakers() {
        Ok(speakers) => Json(SpeakersResponse {
            engine: state.handle.engine_name().to_string(),
            speakers: speakers.to_vec(),
        })
        .into_response(),
        Err(e) => error_response(&e),
    }
}

// Invalid input maps to 400, everything else to 500. The body carries the
// inner message as-is; the full error goes to the log.
fn error_response(err: &Error) -> Response {
    TOTAL_ERRORS.fetch_add(1, Ordering::Relaxed);
    error!("Request failed: {}", err);

    let (status, message) = match err {
        Error::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        Error::EngineUnavailable(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        Error::Synthesis(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    };

    let response = Json(ErrorResponse { error: message });
    (status, response).into_response()
}
