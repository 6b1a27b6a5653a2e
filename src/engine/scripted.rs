// Scripted audio engine: an in-memory subsystem double. It records every call
// the controller makes and lets a test (or demo) feed status snapshots and
// playback events into the active session, including deliberately stale ones.

use anyhow::{bail, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use super::backend::{
    AudioEngine, AudioMode, PlaybackStatus, PlayerHandle, QualityPreset, RecorderHandle,
    StatusSnapshot,
};

/// One call made against the scripted engine, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Configure,
    RequestPermission,
    CreateRecorder,
    Prepare,
    Start,
    Pause,
    StopAndRelease,
    CreatePlayer { uri: String },
    ReleasePlayer,
}

#[derive(Default)]
struct ScriptState {
    permission: bool,
    calls: Vec<EngineCall>,
    fail_configure: bool,
    fail_create_recorder: bool,
    fail_start: bool,
    fail_pause: bool,
    fail_stop: bool,
    fail_create_player: bool,
    saved_memos: u32,
    status_tx: Option<mpsc::Sender<StatusSnapshot>>,
    playback_tx: Option<mpsc::Sender<PlaybackStatus>>,
}

/// Audio engine double driven entirely by the caller
#[derive(Clone)]
pub struct ScriptedEngine {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::with_permission(true)
    }

    /// Engine that answers the permission request with `granted`
    pub fn with_permission(granted: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(ScriptState {
                permission: granted,
                ..ScriptState::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<EngineCall> {
        self.lock().calls.clone()
    }

    pub fn set_fail_configure(&self, fail: bool) {
        self.lock().fail_configure = fail;
    }

    pub fn set_fail_create_recorder(&self, fail: bool) {
        self.lock().fail_create_recorder = fail;
    }

    pub fn set_fail_start(&self, fail: bool) {
        self.lock().fail_start = fail;
    }

    pub fn set_fail_pause(&self, fail: bool) {
        self.lock().fail_pause = fail;
    }

    pub fn set_fail_stop(&self, fail: bool) {
        self.lock().fail_stop = fail;
    }

    pub fn set_fail_create_player(&self, fail: bool) {
        self.lock().fail_create_player = fail;
    }

    /// Feed a status snapshot into the most recently prepared session.
    ///
    /// The sender is kept after the session is released, so a snapshot can be
    /// delivered late on purpose. Returns whether anything received it.
    pub async fn push_status(&self, snapshot: StatusSnapshot) -> bool {
        let status_tx = self.lock().status_tx.clone();
        match status_tx {
            Some(tx) => tx.send(snapshot).await.is_ok(),
            None => false,
        }
    }

    /// Feed a playback event into the most recently created player
    pub async fn push_playback(&self, status: PlaybackStatus) -> bool {
        let playback_tx = self.lock().playback_tx.clone();
        match playback_tx {
            Some(tx) => tx.send(status).await.is_ok(),
            None => false,
        }
    }
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AudioEngine for ScriptedEngine {
    async fn configure(&self, mode: &AudioMode) -> Result<()> {
        debug!("Scripted engine configured: {:?}", mode.interruption_policy);

        let state = &mut *self.lock();
        state.calls.push(EngineCall::Configure);

        if state.fail_configure {
            bail!("scripted failure: configure");
        }

        Ok(())
    }

    async fn request_permission(&self) -> Result<bool> {
        let mut state = self.lock();
        state.calls.push(EngineCall::RequestPermission);
        Ok(state.permission)
    }

    async fn create_recorder(&self, _preset: QualityPreset) -> Result<Box<dyn RecorderHandle>> {
        let mut state = self.lock();
        state.calls.push(EngineCall::CreateRecorder);

        if state.fail_create_recorder {
            bail!("scripted failure: create recorder");
        }

        Ok(Box::new(ScriptedRecorder {
            id: Uuid::new_v4(),
            engine: self.clone(),
        }))
    }

    async fn create_player(
        &self,
        uri: &str,
        _autoplay: bool,
    ) -> Result<(Box<dyn PlayerHandle>, mpsc::Receiver<PlaybackStatus>)> {
        let mut state = self.lock();
        state.calls.push(EngineCall::CreatePlayer {
            uri: uri.to_string(),
        });

        if state.fail_create_player {
            bail!("scripted failure: create player");
        }

        let (events_tx, events_rx) = mpsc::channel(16);
        state.playback_tx = Some(events_tx);

        Ok((
            Box::new(ScriptedPlayer {
                engine: self.clone(),
            }),
            events_rx,
        ))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct ScriptedRecorder {
    id: Uuid,
    engine: ScriptedEngine,
}

#[async_trait::async_trait]
impl RecorderHandle for ScriptedRecorder {
    fn id(&self) -> Uuid {
        self.id
    }

    async fn prepare(&mut self) -> Result<mpsc::Receiver<StatusSnapshot>> {
        let mut state = self.engine.lock();
        state.calls.push(EngineCall::Prepare);

        let (status_tx, status_rx) = mpsc::channel(32);
        state.status_tx = Some(status_tx);

        Ok(status_rx)
    }

    async fn start(&mut self) -> Result<()> {
        let state = &mut *self.engine.lock();
        state.calls.push(EngineCall::Start);

        if state.fail_start {
            bail!("scripted failure: start");
        }

        Ok(())
    }

    async fn pause(&mut self) -> Result<()> {
        let state = &mut *self.engine.lock();
        state.calls.push(EngineCall::Pause);

        if state.fail_pause {
            bail!("scripted failure: pause");
        }

        Ok(())
    }

    async fn stop_and_release(&mut self) -> Result<String> {
        let mut state = self.engine.lock();
        state.calls.push(EngineCall::StopAndRelease);

        if state.fail_stop {
            bail!("scripted failure: stop");
        }

        state.saved_memos += 1;
        Ok(format!("scripted:memo-{}", state.saved_memos))
    }
}

struct ScriptedPlayer {
    engine: ScriptedEngine,
}

#[async_trait::async_trait]
impl PlayerHandle for ScriptedPlayer {
    async fn release(&mut self) -> Result<()> {
        self.engine.lock().calls.push(EngineCall::ReleasePlayer);
        Ok(())
    }
}
