use anyhow::Result;
use clap::Parser;
use memo_recorder::{create_router, AppState, Config, EngineFactory, RecorderController};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "memo-recorder", about = "Voice memo recording service")]
struct Args {
    /// Path to the configuration file, without extension
    #[arg(long, default_value = "config/memo-recorder")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!(
        "Recordings directory: {}",
        cfg.recorder.recordings_dir.display()
    );

    let engine = EngineFactory::create(&cfg.recorder)?;
    info!("Audio engine: {}", engine.name());

    let controller = Arc::new(RecorderController::new(engine, cfg.recorder.clone()));

    if !controller.initialize().await {
        warn!("Recording commands will be rejected until permission is granted");
    }

    let state = AppState::new(controller);
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
