use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::{AudioMode, EngineKind, QualityPreset};

/// Configuration for the recording controller
///
/// Every field falls back to its default when omitted from the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Which audio engine to run
    pub engine: EngineKind,

    /// Directory where finished memos are saved
    pub recordings_dir: PathBuf,

    /// Capture quality for new sessions
    pub quality: QualityPreset,

    /// How often the engine reports status snapshots, in milliseconds
    pub status_interval_ms: u64,

    /// Global audio routing options applied at startup
    pub audio_mode: AudioMode,
}

impl RecorderConfig {
    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms)
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Local,
            recordings_dir: PathBuf::from("recordings"),
            quality: QualityPreset::High,
            status_interval_ms: 250,
            audio_mode: AudioMode::default(),
        }
    }
}
