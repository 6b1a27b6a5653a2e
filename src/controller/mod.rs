pub mod config;
pub mod controller;
pub mod error;
pub mod state;

pub use config::RecorderConfig;
pub use controller::RecorderController;
pub use error::RecorderError;
pub use state::{format_millis, reconcile_pause_reason, PauseReason, RecorderStatus};
