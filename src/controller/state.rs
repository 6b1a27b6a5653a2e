use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::{PlayerHandle, RecorderHandle, StatusSnapshot};

/// Why the active recording session is not capturing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseReason {
    /// Capturing normally (or no session at all)
    None,
    /// The user asked to pause; only the user may resume
    User,
    /// The platform suspended capture (call, Siri, another app)
    Interruption,
}

/// Classify a status snapshot against the current pause reason.
///
/// The audio subsystem never says "interrupted" explicitly, so interruptions
/// are detected by elimination: capture stopped without a user pause. A user
/// pause is sticky and is never reclassified, no matter what the subsystem
/// reports.
pub fn reconcile_pause_reason(current: PauseReason, snapshot: &StatusSnapshot) -> PauseReason {
    match current {
        PauseReason::None if !snapshot.is_recording => PauseReason::Interruption,
        PauseReason::Interruption if snapshot.is_recording => PauseReason::None,
        other => other,
    }
}

/// Format elapsed milliseconds as mm:ss for display
pub fn format_millis(millis: Option<u64>) -> String {
    let ms = millis.unwrap_or(0);
    let minutes = ms / 60_000;
    let seconds = (ms / 1_000) % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Everything the controller knows, guarded by a single lock
pub(crate) struct ControllerState {
    /// Whether the microphone permission request was granted
    pub(crate) permission_granted: bool,

    /// The active recording session, if any
    pub(crate) recorder: Option<Box<dyn RecorderHandle>>,

    /// Latest status snapshot from the active (or most recent) session
    pub(crate) status: Option<StatusSnapshot>,

    /// Why capture is suspended, if it is
    pub(crate) pause_reason: PauseReason,

    /// URI of the most recently saved memo
    pub(crate) saved_uri: Option<String>,

    /// The loaded playback session, if any
    pub(crate) player: Option<Box<dyn PlayerHandle>>,

    /// When the current (or most recent) recording started
    pub(crate) started_at: Option<DateTime<Utc>>,
}

impl ControllerState {
    pub(crate) fn new() -> Self {
        Self {
            permission_granted: false,
            recorder: None,
            status: None,
            pause_reason: PauseReason::None,
            saved_uri: None,
            player: None,
            started_at: None,
        }
    }

    pub(crate) fn session_id(&self) -> Option<Uuid> {
        self.recorder.as_ref().map(|r| r.id())
    }

    /// Apply a status snapshot from the session identified by `session_id`.
    ///
    /// Snapshots for anything other than the active session are discarded;
    /// returns whether the snapshot was applied.
    pub(crate) fn apply_snapshot(&mut self, session_id: Uuid, snapshot: &StatusSnapshot) -> bool {
        if self.session_id() != Some(session_id) {
            return false;
        }

        let next = reconcile_pause_reason(self.pause_reason, snapshot);
        if next != self.pause_reason {
            match next {
                PauseReason::Interruption => warn!("Recording paused by interruption"),
                PauseReason::None => info!("Recording resumed after interruption"),
                PauseReason::User => {}
            }
            self.pause_reason = next;
        }

        self.status = Some(snapshot.clone());
        true
    }

    /// Assemble the observable status, including command gating
    pub(crate) fn snapshot(&self) -> RecorderStatus {
        let recording = self.status.clone();
        let elapsed = format_millis(recording.as_ref().and_then(|s| s.duration_millis));

        RecorderStatus {
            permission_granted: self.permission_granted,
            session_active: self.recorder.is_some(),
            playback_loaded: self.player.is_some(),
            pause_reason: self.pause_reason,
            saved_uri: self.saved_uri.clone(),
            started_at: self.started_at,
            elapsed,
            can_start: self.permission_granted && self.recorder.is_none(),
            // Until the first snapshot arrives, assume a just-started session
            // is capturing
            can_pause: self.recorder.is_some()
                && recording.as_ref().map(|s| s.is_recording).unwrap_or(true),
            can_resume: self.recorder.is_some()
                && recording.as_ref().map(|s| !s.is_recording).unwrap_or(true),
            can_stop: self.recorder.is_some(),
            can_play: self.saved_uri.is_some(),
            recording,
        }
    }
}

/// Observable controller state, as served to clients
#[derive(Debug, Clone, Serialize)]
pub struct RecorderStatus {
    pub permission_granted: bool,
    pub session_active: bool,
    pub playback_loaded: bool,
    pub pause_reason: PauseReason,
    pub saved_uri: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    /// Latest raw snapshot from the audio subsystem
    pub recording: Option<StatusSnapshot>,
    /// Elapsed capture time formatted as mm:ss
    pub elapsed: String,
    pub can_start: bool,
    pub can_pause: bool,
    pub can_resume: bool,
    pub can_stop: bool,
    pub can_play: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tokio::sync::mpsc;

    struct NullRecorder {
        id: Uuid,
    }

    #[async_trait::async_trait]
    impl RecorderHandle for NullRecorder {
        fn id(&self) -> Uuid {
            self.id
        }

        async fn prepare(&mut self) -> Result<mpsc::Receiver<StatusSnapshot>> {
            let (_tx, rx) = mpsc::channel(1);
            Ok(rx)
        }

        async fn start(&mut self) -> Result<()> {
            Ok(())
        }

        async fn pause(&mut self) -> Result<()> {
            Ok(())
        }

        async fn stop_and_release(&mut self) -> Result<String> {
            Ok("null:memo".to_string())
        }
    }

    fn snapshot(is_recording: bool) -> StatusSnapshot {
        StatusSnapshot {
            is_recording,
            duration_millis: Some(1_000),
            can_record: true,
        }
    }

    #[test]
    fn interruption_detected_by_elimination() {
        assert_eq!(
            reconcile_pause_reason(PauseReason::None, &snapshot(false)),
            PauseReason::Interruption
        );
    }

    #[test]
    fn interruption_cleared_when_capture_returns() {
        assert_eq!(
            reconcile_pause_reason(PauseReason::Interruption, &snapshot(true)),
            PauseReason::None
        );
    }

    #[test]
    fn user_pause_is_sticky() {
        assert_eq!(
            reconcile_pause_reason(PauseReason::User, &snapshot(false)),
            PauseReason::User
        );
        assert_eq!(
            reconcile_pause_reason(PauseReason::User, &snapshot(true)),
            PauseReason::User
        );
    }

    #[test]
    fn capturing_normally_stays_unpaused() {
        assert_eq!(
            reconcile_pause_reason(PauseReason::None, &snapshot(true)),
            PauseReason::None
        );
    }

    #[test]
    fn stale_session_snapshot_is_discarded() {
        let mut state = ControllerState::new();
        state.recorder = Some(Box::new(NullRecorder { id: Uuid::new_v4() }));

        let applied = state.apply_snapshot(Uuid::new_v4(), &snapshot(false));

        assert!(!applied);
        assert_eq!(state.pause_reason, PauseReason::None);
        assert!(state.status.is_none());
    }

    #[test]
    fn matching_session_snapshot_is_applied() {
        let id = Uuid::new_v4();
        let mut state = ControllerState::new();
        state.recorder = Some(Box::new(NullRecorder { id }));

        let applied = state.apply_snapshot(id, &snapshot(false));

        assert!(applied);
        assert_eq!(state.pause_reason, PauseReason::Interruption);
        assert_eq!(state.status, Some(snapshot(false)));
    }

    #[test]
    fn snapshot_with_no_session_is_discarded() {
        let mut state = ControllerState::new();

        assert!(!state.apply_snapshot(Uuid::new_v4(), &snapshot(true)));
        assert!(state.status.is_none());
    }

    #[test]
    fn gating_before_first_snapshot_assumes_capturing() {
        let mut state = ControllerState::new();
        state.permission_granted = true;
        state.recorder = Some(Box::new(NullRecorder { id: Uuid::new_v4() }));

        let status = state.snapshot();

        assert!(!status.can_start);
        assert!(status.can_pause);
        assert!(status.can_resume);
        assert!(status.can_stop);
        assert!(!status.can_play);
    }

    #[test]
    fn gating_follows_latest_snapshot() {
        let id = Uuid::new_v4();
        let mut state = ControllerState::new();
        state.permission_granted = true;
        state.recorder = Some(Box::new(NullRecorder { id }));
        state.apply_snapshot(id, &snapshot(true));

        let status = state.snapshot();
        assert!(status.can_pause);
        assert!(!status.can_resume);

        state.apply_snapshot(id, &snapshot(false));

        let status = state.snapshot();
        assert!(!status.can_pause);
        assert!(status.can_resume);
    }

    #[test]
    fn format_millis_pads_and_rounds_down() {
        assert_eq!(format_millis(None), "00:00");
        assert_eq!(format_millis(Some(0)), "00:00");
        assert_eq!(format_millis(Some(999)), "00:00");
        assert_eq!(format_millis(Some(65_000)), "01:05");
        assert_eq!(format_millis(Some(600_000)), "10:00");
        assert_eq!(format_millis(Some(3_661_000)), "61:01");
    }
}
