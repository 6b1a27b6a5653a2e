// Example: Record a voice memo and play it back
//
// This example drives the full controller lifecycle against the local engine:
// 1. Configure the audio mode and request permission
// 2. Record for a few seconds, with a user pause in the middle
// 3. Stop and save the memo as a WAV file
// 4. Play the saved memo back to completion
//
// Usage: cargo run --example record_and_play -- --seconds 2

use anyhow::{bail, Result};
use clap::Parser;
use memo_recorder::{LocalEngine, RecorderConfig, RecorderController};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "record_and_play")]
#[command(about = "Record a memo with a pause in the middle, then play it back")]
struct Args {
    /// Seconds to record before and after the pause
    #[arg(short, long, default_value = "2")]
    seconds: u64,

    /// Output directory for the saved memo
    #[arg(short, long, default_value = "~/.memo-recorder/recordings")]
    output_dir: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let args = Args::parse();

    // Expand home directory
    let output_dir = shellexpand::tilde(&args.output_dir);

    let config = RecorderConfig {
        recordings_dir: PathBuf::from(output_dir.as_ref()),
        ..RecorderConfig::default()
    };

    info!("Memo Recorder - Record and Play Example");
    info!("Recordings directory: {}", config.recordings_dir.display());

    let engine = Arc::new(LocalEngine::new(&config));
    let controller = RecorderController::new(engine, config);

    if !controller.initialize().await {
        bail!("microphone permission denied");
    }

    info!("Recording for {} seconds...", args.seconds);
    controller.start().await?;
    sleep(Duration::from_secs(args.seconds)).await;

    info!("Pausing for 1 second...");
    controller.pause().await?;
    sleep(Duration::from_secs(1)).await;

    let status = controller.status().await;
    info!(
        "While paused: elapsed={} pause_reason={:?}",
        status.elapsed, status.pause_reason
    );

    info!("Resuming for {} more seconds...", args.seconds);
    controller.resume().await?;
    sleep(Duration::from_secs(args.seconds)).await;

    let saved = controller.stop().await?;
    let uri = saved.unwrap_or_default();
    info!("Memo saved: {}", uri);

    info!("Playing the memo back...");
    controller.play().await?;

    // The memo holds 2 * args.seconds of audio; leave some slack
    sleep(Duration::from_secs(args.seconds * 2 + 1)).await;

    let status = controller.status().await;
    info!(
        "Done: elapsed={} saved_uri={:?}",
        status.elapsed, status.saved_uri
    );

    Ok(())
}
