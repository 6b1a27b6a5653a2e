use super::state::AppState;
use crate::controller::RecorderError;
use crate::lifecycle::{AppLifecycleState, LifecycleTransition};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::info;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub status: String,
    /// URI of the saved memo, absent when there was nothing to stop
    pub saved_uri: Option<String>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct AppStateRequest {
    /// Lifecycle state reported by the host: active, inactive or background
    pub state: String,
}

#[derive(Debug, Serialize)]
pub struct AppStateResponse {
    /// The foreground boundary crossing, if this change was one
    pub transition: Option<LifecycleTransition>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map a controller error to its HTTP status
fn error_response(err: &RecorderError) -> Response {
    let code = match err {
        RecorderError::PermissionDenied => StatusCode::FORBIDDEN,
        RecorderError::NoSavedRecording => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        code,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /recorder/start
/// Start a new recording session
pub async fn start_recording(State(state): State<AppState>) -> impl IntoResponse {
    // Answer CONFLICT instead of the controller's silent no-op, so callers
    // learn their start changed nothing
    if state.controller.status().await.session_active {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "A recording session is already active".to_string(),
            }),
        )
            .into_response();
    }

    match state.controller.start().await {
        Ok(()) => (
            StatusCode::OK,
            Json(CommandResponse {
                status: "recording".to_string(),
                message: "Recording started".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST /recorder/pause
/// Pause the active recording session
pub async fn pause_recording(State(state): State<AppState>) -> impl IntoResponse {
    match state.controller.pause().await {
        Ok(()) => (
            StatusCode::OK,
            Json(CommandResponse {
                status: "paused".to_string(),
                message: "Recording paused".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST /recorder/resume
/// Resume a paused recording session
pub async fn resume_recording(State(state): State<AppState>) -> impl IntoResponse {
    match state.controller.resume().await {
        Ok(()) => (
            StatusCode::OK,
            Json(CommandResponse {
                status: "recording".to_string(),
                message: "Recording resumed".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST /recorder/stop
/// Stop the active recording session and save the memo
pub async fn stop_recording(State(state): State<AppState>) -> impl IntoResponse {
    match state.controller.stop().await {
        Ok(saved_uri) => {
            let message = match &saved_uri {
                Some(uri) => format!("Recording saved to {}", uri),
                None => "No active recording session".to_string(),
            };

            (
                StatusCode::OK,
                Json(StopResponse {
                    status: "stopped".to_string(),
                    saved_uri,
                    message,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST /recorder/play
/// Play the last saved memo
pub async fn play_recording(State(state): State<AppState>) -> impl IntoResponse {
    match state.controller.play().await {
        Ok(()) => (
            StatusCode::OK,
            Json(CommandResponse {
                status: "playing".to_string(),
                message: "Playback started".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET /recorder/status
/// Current controller status, including command gating
pub async fn get_recorder_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.controller.status().await)
}

/// POST /app/state
/// Report an app lifecycle change (active/inactive/background)
pub async fn app_state_changed(
    State(state): State<AppState>,
    Json(req): Json<AppStateRequest>,
) -> impl IntoResponse {
    let next: AppLifecycleState = match req.state.parse() {
        Ok(next) => next,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("{:#}", e),
                }),
            )
                .into_response();
        }
    };

    info!("App lifecycle state reported: {:?}", next);

    let transition = state.lifecycle.lock().await.observe(next);

    (StatusCode::OK, Json(AppStateResponse { transition })).into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
