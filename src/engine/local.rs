// Local audio engine: synthesizes capture instead of opening a real input
// device, but persists real WAV files and probes real durations, so the whole
// record -> stop -> play path runs unattended on any machine.

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::backend::{
    AudioEngine, AudioMode, PlaybackStatus, PlayerHandle, QualityPreset, RecorderHandle,
    StatusSnapshot,
};
use crate::controller::RecorderConfig;

const TONE_HZ: f32 = 440.0;
const TONE_AMPLITUDE: f32 = 0.3;

/// Audio engine backed by the local filesystem
pub struct LocalEngine {
    recordings_dir: PathBuf,
    status_interval: Duration,
    permission: bool,
}

impl LocalEngine {
    pub fn new(config: &RecorderConfig) -> Self {
        Self::with_permission(config, true)
    }

    /// Engine that reports microphone permission as denied
    pub fn with_permission(config: &RecorderConfig, granted: bool) -> Self {
        Self {
            recordings_dir: config.recordings_dir.clone(),
            status_interval: config.status_interval(),
            permission: granted,
        }
    }
}

#[async_trait::async_trait]
impl AudioEngine for LocalEngine {
    async fn configure(&self, mode: &AudioMode) -> Result<()> {
        fs::create_dir_all(&self.recordings_dir)
            .context("Failed to create recordings directory")?;

        info!(
            "Audio mode applied: recording={}, background={}, policy={:?}",
            mode.allows_recording, mode.stays_active_in_background, mode.interruption_policy
        );

        Ok(())
    }

    async fn request_permission(&self) -> Result<bool> {
        Ok(self.permission)
    }

    async fn create_recorder(&self, preset: QualityPreset) -> Result<Box<dyn RecorderHandle>> {
        let id = Uuid::new_v4();
        let file_name = format!(
            "memo-{}-{}.wav",
            Utc::now().format("%Y%m%d-%H%M%S"),
            &id.to_string()[..8]
        );
        let path = self.recordings_dir.join(file_name);

        Ok(Box::new(LocalRecorder::new(
            id,
            path,
            preset,
            self.status_interval,
        )))
    }

    async fn create_player(
        &self,
        uri: &str,
        autoplay: bool,
    ) -> Result<(Box<dyn PlayerHandle>, mpsc::Receiver<PlaybackStatus>)> {
        let path = PathBuf::from(uri);
        let duration_ms = probe_duration_ms(&path)?;

        info!(
            "Playback session loaded: {} ({} ms)",
            path.display(),
            duration_ms
        );

        let (events_tx, events_rx) = mpsc::channel(16);
        let task = if autoplay {
            Some(tokio::spawn(playback_loop(
                events_tx,
                duration_ms,
                self.status_interval,
            )))
        } else {
            None
        };

        Ok((Box::new(LocalPlayer { task }), events_rx))
    }

    fn name(&self) -> &str {
        "local"
    }
}

/// One synthesized recording session writing to a WAV file
struct LocalRecorder {
    id: Uuid,
    path: PathBuf,
    spec: hound::WavSpec,
    status_interval: Duration,
    writer: Option<MemoWriter>,
    status_tx: Option<mpsc::Sender<StatusSnapshot>>,
    capturing: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    task: Option<JoinHandle<Result<()>>>,
}

impl LocalRecorder {
    fn new(id: Uuid, path: PathBuf, preset: QualityPreset, status_interval: Duration) -> Self {
        let spec = hound::WavSpec {
            channels: preset.channels(),
            sample_rate: preset.sample_rate(),
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        Self {
            id,
            path,
            spec,
            status_interval,
            writer: None,
            status_tx: None,
            capturing: Arc::new(AtomicBool::new(false)),
            finished: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }
}

#[async_trait::async_trait]
impl RecorderHandle for LocalRecorder {
    fn id(&self) -> Uuid {
        self.id
    }

    async fn prepare(&mut self) -> Result<mpsc::Receiver<StatusSnapshot>> {
        let writer = MemoWriter::create(&self.path, self.spec)?;
        self.writer = Some(writer);

        let (status_tx, status_rx) = mpsc::channel(64);
        self.status_tx = Some(status_tx);

        info!("Recorder {} prepared: {}", self.id, self.path.display());

        Ok(status_rx)
    }

    async fn start(&mut self) -> Result<()> {
        if self.task.is_some() {
            // Resume: the capture task is still running, re-enable the flag
            self.capturing.store(true, Ordering::SeqCst);
            return Ok(());
        }

        let writer = self
            .writer
            .take()
            .context("Recorder has not been prepared")?;
        let status_tx = self
            .status_tx
            .take()
            .context("Recorder has not been prepared")?;

        self.capturing.store(true, Ordering::SeqCst);

        self.task = Some(tokio::spawn(capture_loop(
            writer,
            status_tx,
            Arc::clone(&self.capturing),
            Arc::clone(&self.finished),
            self.spec,
            self.status_interval,
        )));

        Ok(())
    }

    async fn pause(&mut self) -> Result<()> {
        self.capturing.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn stop_and_release(&mut self) -> Result<String> {
        self.finished.store(true, Ordering::SeqCst);
        self.capturing.store(false, Ordering::SeqCst);

        if let Some(task) = self.task.take() {
            task.await.context("Capture task panicked")??;
        } else if let Some(writer) = self.writer.take() {
            // Stopped before start: finalize the empty file anyway
            writer.finish()?;
        }

        info!("Recorder {} released: {}", self.id, self.path.display());

        Ok(self.path.display().to_string())
    }
}

impl Drop for LocalRecorder {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Ticks at the status interval, appending synthesized samples while the
/// capturing flag is set and reporting a status snapshot every tick.
///
/// Elapsed time only advances while capturing, matching what a real recorder
/// reports across pause/resume.
async fn capture_loop(
    mut writer: MemoWriter,
    status_tx: mpsc::Sender<StatusSnapshot>,
    capturing: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    spec: hound::WavSpec,
    status_interval: Duration,
) -> Result<()> {
    let mut ticker = tokio::time::interval(status_interval);
    let tick_ms = status_interval.as_millis() as u64;
    let frames_per_tick = (spec.sample_rate as u64 * tick_ms / 1000) as usize;

    let mut elapsed_ms = 0u64;
    let mut phase = 0.0f32;

    loop {
        ticker.tick().await;

        if finished.load(Ordering::SeqCst) {
            break;
        }

        let active = capturing.load(Ordering::SeqCst);
        if active {
            let samples = tone_frames(spec, frames_per_tick, &mut phase);
            writer.write_samples(&samples)?;
            elapsed_ms += tick_ms;
        }

        let snapshot = StatusSnapshot {
            is_recording: active,
            duration_millis: Some(elapsed_ms),
            can_record: true,
        };

        // A slow or dropped receiver must not stall capture
        let _ = status_tx.try_send(snapshot);
    }

    writer.finish()?;

    Ok(())
}

/// Generate interleaved 440Hz sine frames, carrying phase across ticks
fn tone_frames(spec: hound::WavSpec, frames: usize, phase: &mut f32) -> Vec<i16> {
    let step = TONE_HZ * std::f32::consts::TAU / spec.sample_rate as f32;
    let mut samples = Vec::with_capacity(frames * spec.channels as usize);

    for _ in 0..frames {
        let value = phase.sin() * TONE_AMPLITUDE * i16::MAX as f32;
        *phase = (*phase + step) % std::f32::consts::TAU;

        for _ in 0..spec.channels {
            samples.push(value as i16);
        }
    }

    samples
}

/// Writes one memo to disk as a WAV file
struct MemoWriter {
    writer: Option<hound::WavWriter<BufWriter<File>>>,
    path: PathBuf,
    sample_count: usize,
}

impl MemoWriter {
    fn create(path: &Path, spec: hound::WavSpec) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create recordings directory")?;
        }

        let writer = hound::WavWriter::create(path, spec)
            .with_context(|| format!("Failed to create WAV file: {:?}", path))?;

        Ok(Self {
            writer: Some(writer),
            path: path.to_path_buf(),
            sample_count: 0,
        })
    }

    fn write_samples(&mut self, samples: &[i16]) -> Result<()> {
        if let Some(writer) = &mut self.writer {
            for &sample in samples {
                writer
                    .write_sample(sample)
                    .context("Failed to write sample to WAV")?;
            }

            self.sample_count += samples.len();
        }

        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer.finalize().context("Failed to finalize WAV file")?;
        }

        debug!(
            "Memo file finalized: {} ({} samples)",
            self.path.display(),
            self.sample_count
        );

        Ok(())
    }
}

impl Drop for MemoWriter {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            if let Err(e) = writer.finalize() {
                warn!("Failed to finalize WAV writer on drop: {}", e);
            }
        }
    }
}

/// One playback session over a saved memo file
struct LocalPlayer {
    task: Option<JoinHandle<()>>,
}

#[async_trait::async_trait]
impl PlayerHandle for LocalPlayer {
    async fn release(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            task.abort();
        }

        Ok(())
    }
}

impl Drop for LocalPlayer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Advances a simulated playback position in real time and reports progress,
/// ending with a single `did_just_finish` event.
async fn playback_loop(
    events_tx: mpsc::Sender<PlaybackStatus>,
    duration_ms: u64,
    status_interval: Duration,
) {
    let mut ticker = tokio::time::interval(status_interval);
    let tick_ms = status_interval.as_millis() as u64;
    let mut position = 0u64;

    loop {
        ticker.tick().await;

        if position >= duration_ms {
            let _ = events_tx
                .send(PlaybackStatus {
                    position_millis: duration_ms,
                    did_just_finish: true,
                })
                .await;
            break;
        }

        let status = PlaybackStatus {
            position_millis: position,
            did_just_finish: false,
        };

        if events_tx.send(status).await.is_err() {
            break;
        }

        position = (position + tick_ms).min(duration_ms);
    }
}

/// Decode the container header of a saved recording to learn its duration
fn probe_duration_ms(path: &Path) -> Result<u64> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let stream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .with_context(|| format!("Failed to probe audio file: {}", path.display()))?;

    let track = probed
        .format
        .default_track()
        .context("Audio file has no default track")?;

    let params = &track.codec_params;
    match (params.n_frames, params.sample_rate) {
        (Some(frames), Some(rate)) if rate > 0 => Ok(frames.saturating_mul(1000) / rate as u64),
        _ => Ok(0),
    }
}
