use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, trace, warn};
use uuid::Uuid;

use super::config::RecorderConfig;
use super::error::RecorderError;
use super::state::{ControllerState, PauseReason, RecorderStatus};
use crate::engine::{AudioEngine, StatusSnapshot};

/// Orchestrates one microphone recording session at a time, plus playback of
/// the last saved memo.
///
/// All state lives behind a single lock that is held for the full duration of
/// each command, including the engine calls inside it. Commands therefore
/// execute one at a time in arrival order, while status snapshots from the
/// engine are reconciled between commands by a background task.
pub struct RecorderController {
    engine: Arc<dyn AudioEngine>,
    config: RecorderConfig,
    state: Arc<Mutex<ControllerState>>,
}

impl RecorderController {
    pub fn new(engine: Arc<dyn AudioEngine>, config: RecorderConfig) -> Self {
        Self {
            engine,
            config,
            state: Arc::new(Mutex::new(ControllerState::new())),
        }
    }

    /// Apply the audio mode and request microphone permission.
    ///
    /// Returns whether permission was granted. A failed audio mode
    /// configuration is logged but does not block startup; recording may
    /// still work with platform defaults.
    pub async fn initialize(&self) -> bool {
        if let Err(e) = self.engine.configure(&self.config.audio_mode).await {
            let err = RecorderError::Configuration(format!("{:#}", e));
            warn!("{}", err);
        }

        let granted = match self.engine.request_permission().await {
            Ok(granted) => granted,
            Err(e) => {
                warn!("Microphone permission request failed: {:#}", e);
                false
            }
        };

        let mut state = self.state.lock().await;
        state.permission_granted = granted;

        if granted {
            info!("Microphone permission granted");
        } else {
            warn!("Microphone permission is required to record audio");
        }

        granted
    }

    /// Start a new recording session.
    ///
    /// No-op if a session is already active. Any loaded playback session is
    /// released first, and the saved-recording URI and pause reason are
    /// reset. If the engine rejects any step, nothing is committed and the
    /// command can simply be retried.
    pub async fn start(&self) -> Result<(), RecorderError> {
        let mut state = self.state.lock().await;

        if !state.permission_granted {
            warn!("Start rejected: microphone permission not granted");
            return Err(RecorderError::PermissionDenied);
        }

        if state.recorder.is_some() {
            warn!("Recording already in progress");
            return Ok(());
        }

        // Recording claims the audio device; unload playback first
        if let Some(mut player) = state.player.take() {
            if let Err(e) = player.release().await {
                warn!("Failed to release playback session: {:#}", e);
            }
        }

        let mut recorder = match self.engine.create_recorder(self.config.quality).await {
            Ok(recorder) => recorder,
            Err(e) => {
                error!("Failed to create recording session: {:#}", e);
                return Err(RecorderError::SessionStart(format!("{:#}", e)));
            }
        };

        let status_rx = match recorder.prepare().await {
            Ok(rx) => rx,
            Err(e) => {
                error!("Failed to prepare recording session: {:#}", e);
                return Err(RecorderError::SessionStart(format!("{:#}", e)));
            }
        };

        if let Err(e) = recorder.start().await {
            error!("Failed to start recording: {:#}", e);
            return Err(RecorderError::SessionStart(format!("{:#}", e)));
        }

        let session_id = recorder.id();
        state.recorder = Some(recorder);
        state.status = None;
        state.pause_reason = PauseReason::None;
        state.saved_uri = None;
        state.started_at = Some(chrono::Utc::now());
        drop(state);

        self.spawn_reconcile(session_id, status_rx);

        info!("Recording started: session {}", session_id);

        Ok(())
    }

    /// Pause the active session at the user's request.
    ///
    /// No-op without a session. On success the pause reason becomes `User`
    /// unconditionally, so a pause during an interruption is still treated as
    /// user intent.
    pub async fn pause(&self) -> Result<(), RecorderError> {
        let mut state = self.state.lock().await;

        let Some(recorder) = state.recorder.as_mut() else {
            debug!("Pause ignored: no active recording session");
            return Ok(());
        };

        if let Err(e) = recorder.pause().await {
            warn!("Failed to pause recording: {:#}", e);
            return Err(RecorderError::Pause(format!("{:#}", e)));
        }

        state.pause_reason = PauseReason::User;
        info!("Recording paused by user");

        Ok(())
    }

    /// Resume a paused session. No-op without a session.
    pub async fn resume(&self) -> Result<(), RecorderError> {
        let mut state = self.state.lock().await;

        let Some(recorder) = state.recorder.as_mut() else {
            debug!("Resume ignored: no active recording session");
            return Ok(());
        };

        if let Err(e) = recorder.start().await {
            warn!("Failed to resume recording: {:#}", e);
            return Err(RecorderError::Resume(format!("{:#}", e)));
        }

        state.pause_reason = PauseReason::None;
        info!("Recording resumed by user");

        Ok(())
    }

    /// Stop the active session and remember the saved memo URI.
    ///
    /// Returns the URI, or `None` when there was no session to stop. If the
    /// engine fails to finalize, the session is kept so stop can be retried.
    /// The last status snapshot is retained for display after the session
    /// ends.
    pub async fn stop(&self) -> Result<Option<String>, RecorderError> {
        let mut state = self.state.lock().await;

        let Some(recorder) = state.recorder.as_mut() else {
            debug!("Stop ignored: no active recording session");
            return Ok(None);
        };

        let uri = match recorder.stop_and_release().await {
            Ok(uri) => uri,
            Err(e) => {
                error!("Failed to stop recording: {:#}", e);
                return Err(RecorderError::Stop(format!("{:#}", e)));
            }
        };

        state.recorder = None;
        state.pause_reason = PauseReason::None;
        state.saved_uri = Some(uri.clone());

        info!("Recording stopped and saved to: {}", uri);

        Ok(Some(uri))
    }

    /// Play the last saved memo from the beginning.
    ///
    /// Any previously loaded player is released first (best effort). The new
    /// player stays loaded after playback finishes.
    pub async fn play(&self) -> Result<(), RecorderError> {
        let mut state = self.state.lock().await;

        let Some(uri) = state.saved_uri.clone() else {
            warn!("Play rejected: no saved recording");
            return Err(RecorderError::NoSavedRecording);
        };

        if let Some(mut player) = state.player.take() {
            if let Err(e) = player.release().await {
                warn!("Failed to release previous playback session: {:#}", e);
            }
        }

        let (player, mut events_rx) = match self.engine.create_player(&uri, true).await {
            Ok(pair) => pair,
            Err(e) => {
                error!("Failed to start playback: {:#}", e);
                return Err(RecorderError::Playback(format!("{:#}", e)));
            }
        };

        state.player = Some(player);
        drop(state);

        tokio::spawn(async move {
            while let Some(status) = events_rx.recv().await {
                if status.did_just_finish {
                    info!(
                        "Playback finished at {} ms; player left loaded",
                        status.position_millis
                    );
                    break;
                }

                trace!("Playback position: {} ms", status.position_millis);
            }
        });

        info!("Playback started: {}", uri);

        Ok(())
    }

    /// Current observable state, including command gating
    pub async fn status(&self) -> RecorderStatus {
        self.state.lock().await.snapshot()
    }

    /// Consume status snapshots from one session until the channel closes or
    /// the session is no longer the active one.
    fn spawn_reconcile(&self, session_id: Uuid, mut status_rx: mpsc::Receiver<StatusSnapshot>) {
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            while let Some(snapshot) = status_rx.recv().await {
                let mut state = state.lock().await;
                if !state.apply_snapshot(session_id, &snapshot) {
                    trace!("Discarding status snapshot from stale session {}", session_id);
                    break;
                }
            }

            debug!("Status channel closed for session {}", session_id);
        });
    }
}
