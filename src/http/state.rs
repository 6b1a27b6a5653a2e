use crate::controller::RecorderController;
use crate::lifecycle::AppStateObserver;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single recording controller behind this service
    pub controller: Arc<RecorderController>,

    /// Lifecycle observer fed by POST /app/state
    pub lifecycle: Arc<Mutex<AppStateObserver>>,
}

impl AppState {
    pub fn new(controller: Arc<RecorderController>) -> Self {
        Self {
            controller,
            lifecycle: Arc::new(Mutex::new(AppStateObserver::new())),
        }
    }
}
