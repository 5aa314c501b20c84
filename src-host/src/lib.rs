pub mod app;
pub mod commands;
pub mod config;
pub mod dialog;
pub mod shutdown;

use anyhow::Context;
use notify_stack::{HeadlessBackend, NotificationService};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use app::HostState;
use config::HostConfig;
use config::host_config::logging_enabled;

/// Install the stderr subscriber. `RUST_LOG` wins over the logging toggle.
fn init_tracing() {
    let default_level = if logging_enabled() { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the host until stdin closes or Ctrl+C is pressed.
pub async fn run() -> anyhow::Result<()> {
    let dotenv = config::load_dotenv();
    init_tracing();
    match dotenv {
        Some(path) => tracing::info!("Loaded .env from: {path}"),
        None => tracing::info!("No .env file found, using system environment variables"),
    }

    let config = HostConfig::load();
    tracing::info!(
        corner = config.notify.corner.as_str(),
        width = config.screen_width,
        height = config.screen_height,
        "Settings loaded"
    );

    let backend = HeadlessBackend::with_display(config.display());
    let service = NotificationService::start(backend.clone(), config.notify.clone());

    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_output(out_rx));
    let state = HostState::new(service.notifier(), backend, out_tx, config);

    tracing::info!("Notification host running. Close stdin or press Ctrl+C to stop.");

    let result = read_commands(&state).await;
    shutdown::graceful_shutdown(state, service, writer).await;
    result
}

async fn read_commands(state: &HostState) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = state.shutdown_token().cancelled() => return Ok(()),
            signal = &mut ctrl_c => {
                signal.context("Failed to listen for Ctrl+C")?;
                tracing::info!("Interrupted, shutting down...");
                return Ok(());
            }
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(line) => commands::handle_line(state, &line).await,
                    None => {
                        tracing::info!("stdin closed, shutting down...");
                        return Ok(());
                    }
                }
            }
        }
    }
}

async fn write_output(mut rx: mpsc::UnboundedReceiver<String>) {
    let mut stdout = tokio::io::stdout();
    while let Some(line) = rx.recv().await {
        let written = async {
            stdout.write_all(line.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await
        };
        if let Err(e) = written.await {
            tracing::error!("Failed to write to stdout: {e}");
            return;
        }
    }
}
