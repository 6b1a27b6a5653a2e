pub mod backend;
pub mod local;
pub mod scripted;

pub use backend::{
    AudioEngine, AudioMode, EngineFactory, EngineKind, InterruptionPolicy, PlaybackStatus,
    PlayerHandle, QualityPreset, RecorderHandle, StatusSnapshot,
};
pub use local::LocalEngine;
pub use scripted::{EngineCall, ScriptedEngine};
