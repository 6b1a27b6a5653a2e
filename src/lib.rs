pub mod config;
pub mod controller;
pub mod engine;
pub mod http;
pub mod lifecycle;

pub use config::Config;
pub use controller::{
    format_millis, PauseReason, RecorderConfig, RecorderController, RecorderError, RecorderStatus,
};
pub use engine::{
    AudioEngine, AudioMode, EngineCall, EngineFactory, EngineKind, InterruptionPolicy, LocalEngine,
    PlaybackStatus, PlayerHandle, QualityPreset, RecorderHandle, ScriptedEngine, StatusSnapshot,
};
pub use http::{create_router, AppState};
pub use lifecycle::{AppLifecycleState, AppStateObserver, LifecycleTransition};
