// Example: Simulate a platform interruption (incoming call, Siri)
//
// Runs the controller against the scripted engine and feeds it the status
// snapshots a real audio subsystem would emit when something else claims the
// microphone. Watch the pause reason flip to "interruption" and back, and how
// a user pause is never reclassified.
//
// Usage: cargo run --example interruption_sim

use anyhow::Result;
use memo_recorder::{RecorderConfig, RecorderController, ScriptedEngine, StatusSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, Level};

fn capturing(duration_millis: u64) -> StatusSnapshot {
    StatusSnapshot {
        is_recording: true,
        duration_millis: Some(duration_millis),
        can_record: true,
    }
}

fn suspended(duration_millis: u64) -> StatusSnapshot {
    StatusSnapshot {
        is_recording: false,
        duration_millis: Some(duration_millis),
        can_record: true,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let engine = Arc::new(ScriptedEngine::new());
    let controller = RecorderController::new(engine.clone(), RecorderConfig::default());

    controller.initialize().await;
    controller.start().await?;

    info!("--- Recording normally ---");
    engine.push_status(capturing(1_000)).await;
    sleep(Duration::from_millis(50)).await;
    report(&controller).await;

    info!("--- Incoming call claims the microphone ---");
    engine.push_status(suspended(1_500)).await;
    sleep(Duration::from_millis(50)).await;
    report(&controller).await;

    info!("--- Call ends, capture returns ---");
    engine.push_status(capturing(2_000)).await;
    sleep(Duration::from_millis(50)).await;
    report(&controller).await;

    info!("--- User pauses; suspended snapshots change nothing ---");
    controller.pause().await?;
    engine.push_status(suspended(2_000)).await;
    sleep(Duration::from_millis(50)).await;
    report(&controller).await;

    info!("--- User resumes and stops ---");
    controller.resume().await?;
    engine.push_status(capturing(3_000)).await;
    sleep(Duration::from_millis(50)).await;

    let saved = controller.stop().await?;
    info!("Saved memo: {:?}", saved);

    info!("--- Snapshot arriving after stop is discarded ---");
    engine.push_status(suspended(3_500)).await;
    sleep(Duration::from_millis(50)).await;
    report(&controller).await;

    info!("Engine calls, in order:");
    for call in engine.calls() {
        info!("  {:?}", call);
    }

    Ok(())
}

async fn report(controller: &RecorderController) {
    let status = controller.status().await;
    info!(
        "status: elapsed={} pause_reason={:?} can_pause={} can_resume={}",
        status.elapsed, status.pause_reason, status.can_pause, status.can_resume
    );
}
