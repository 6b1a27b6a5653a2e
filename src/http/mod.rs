//! HTTP control surface for the recorder
//!
//! This module provides a REST API mirroring the on-screen controls:
//! - POST /recorder/start - Start a new recording session
//! - POST /recorder/pause - Pause the active session
//! - POST /recorder/resume - Resume a paused session
//! - POST /recorder/stop - Stop and save the recording
//! - POST /recorder/play - Play the last saved memo
//! - GET /recorder/status - Controller status and command gating
//! - POST /app/state - Report an app lifecycle change
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
