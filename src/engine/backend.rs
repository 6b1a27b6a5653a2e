use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::controller::RecorderConfig;

/// A point-in-time report from the audio subsystem about a recording session.
///
/// Snapshots arrive on the channel returned by [`RecorderHandle::prepare`] and
/// are the only way the controller learns what the subsystem is actually
/// doing. The latest snapshot always wins; there is no event history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Whether the subsystem is actively capturing right now
    pub is_recording: bool,
    /// Elapsed capture time in milliseconds, if the subsystem reports it
    pub duration_millis: Option<u64>,
    /// Whether the subsystem is still able to record
    pub can_record: bool,
}

/// A progress report from an active playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    /// Playback position in milliseconds
    pub position_millis: u64,
    /// True exactly once, when the player reaches the end of the file
    pub did_just_finish: bool,
}

/// How a recording session shares the audio device with other audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptionPolicy {
    /// Claim the device exclusively; other audio is interrupted
    DoNotMix,
    /// Mix with other audio at full volume
    MixWithOthers,
    /// Mix with other audio, lowering its volume
    DuckOthers,
}

/// Global audio routing options applied once before any session is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioMode {
    /// Allow microphone capture at all
    pub allows_recording: bool,
    /// Keep sessions alive while the app is backgrounded
    pub stays_active_in_background: bool,
    /// Play back even when the device is in silent mode
    pub plays_in_silent_mode: bool,
    /// Device sharing policy for both recording and playback
    pub interruption_policy: InterruptionPolicy,
    /// Lower other audio instead of stopping it
    pub duck_others: bool,
    /// Route playback through the earpiece instead of the speaker
    pub route_through_earpiece: bool,
}

impl Default for AudioMode {
    fn default() -> Self {
        Self {
            allows_recording: true,
            stays_active_in_background: true,
            plays_in_silent_mode: true,
            interruption_policy: InterruptionPolicy::DoNotMix,
            duck_others: false,
            route_through_earpiece: false,
        }
    }
}

/// Capture quality preset for new recording sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    /// 44.1kHz stereo
    High,
    /// 16kHz mono
    Low,
}

impl QualityPreset {
    pub fn sample_rate(self) -> u32 {
        match self {
            QualityPreset::High => 44_100,
            QualityPreset::Low => 16_000,
        }
    }

    pub fn channels(self) -> u16 {
        match self {
            QualityPreset::High => 2,
            QualityPreset::Low => 1,
        }
    }
}

/// Audio engine trait
///
/// Implementations:
/// - Local: synthesized capture written to WAV files on disk
/// - Scripted: records calls and plays back pushed status for tests
#[async_trait::async_trait]
pub trait AudioEngine: Send + Sync {
    /// Apply global audio mode options
    ///
    /// Called once at startup, before any session exists
    async fn configure(&self, mode: &AudioMode) -> Result<()>;

    /// Ask the platform for microphone permission
    ///
    /// Returns whether permission was granted
    async fn request_permission(&self) -> Result<bool>;

    /// Create a new recording session handle
    ///
    /// The handle owns all subsystem resources for one recording; dropping it
    /// releases them
    async fn create_recorder(&self, preset: QualityPreset) -> Result<Box<dyn RecorderHandle>>;

    /// Load a saved recording for playback
    ///
    /// Returns the player handle and a channel of playback progress reports.
    /// When `autoplay` is set, playback starts immediately
    async fn create_player(
        &self,
        uri: &str,
        autoplay: bool,
    ) -> Result<(Box<dyn PlayerHandle>, mpsc::Receiver<PlaybackStatus>)>;

    /// Get engine name for logging
    fn name(&self) -> &str;
}

/// One recording session inside the audio subsystem
#[async_trait::async_trait]
pub trait RecorderHandle: Send {
    /// Stable identity of this session, used to discard stale status reports
    fn id(&self) -> Uuid;

    /// Allocate subsystem resources and open the status channel
    ///
    /// Must be called exactly once, before `start`
    async fn prepare(&mut self) -> Result<mpsc::Receiver<StatusSnapshot>>;

    /// Begin or continue capturing
    ///
    /// Also used to resume after `pause`; the session keeps appending to the
    /// same file
    async fn start(&mut self) -> Result<()>;

    /// Suspend capturing without releasing the session
    async fn pause(&mut self) -> Result<()>;

    /// Finalize the file, release subsystem resources, and return the URI of
    /// the saved recording
    async fn stop_and_release(&mut self) -> Result<String>;
}

/// One playback session inside the audio subsystem
#[async_trait::async_trait]
pub trait PlayerHandle: Send {
    /// Release subsystem resources held by this player
    async fn release(&mut self) -> Result<()>;
}

/// Which audio engine implementation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Synthesized capture, real files on disk
    Local,
    /// In-memory test double
    Scripted,
}

/// Audio engine factory
pub struct EngineFactory;

impl EngineFactory {
    /// Create the audio engine selected by the recorder configuration
    pub fn create(config: &RecorderConfig) -> Result<Arc<dyn AudioEngine>> {
        match config.engine {
            EngineKind::Local => {
                use super::local::LocalEngine;
                Ok(Arc::new(LocalEngine::new(config)))
            }
            EngineKind::Scripted => {
                use super::scripted::ScriptedEngine;
                Ok(Arc::new(ScriptedEngine::new()))
            }
        }
    }
}
