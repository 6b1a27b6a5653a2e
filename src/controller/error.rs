use thiserror::Error;

/// Errors surfaced by recording controller commands.
///
/// Engine failures are flattened to strings here; the full error chain is
/// logged at the point of failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecorderError {
    #[error("audio mode configuration failed: {0}")]
    Configuration(String),

    #[error("microphone permission has not been granted")]
    PermissionDenied,

    #[error("failed to start recording: {0}")]
    SessionStart(String),

    #[error("failed to pause recording: {0}")]
    Pause(String),

    #[error("failed to resume recording: {0}")]
    Resume(String),

    #[error("failed to stop recording: {0}")]
    Stop(String),

    #[error("no saved recording to play")]
    NoSavedRecording,

    #[error("failed to start playback: {0}")]
    Playback(String),
}
