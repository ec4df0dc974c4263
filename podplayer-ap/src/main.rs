//! podplayer - scripted player session
//!
//! Reads a JSON-lines request script, runs it against a player session backed
//! by the simulated engine, prints every notification as a JSON line and the
//! final application state on exit.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use podplayer_ap::config::PlayerConfig;
use podplayer_ap::request::{parse_script, ScriptStep};
use podplayer_ap::{PlayerSession, Request};
use podplayer_common::events::Notification;
use serde::Serialize;
use tokio::signal;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for podplayer
#[derive(Parser, Debug)]
#[command(name = "podplayer")]
#[command(about = "Drive a simulated audio player session from a request script")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Request script (JSON lines); read from stdin when omitted
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Keep the session alive this long after the last request
    #[arg(long, default_value = "0")]
    linger_ms: u64,
}

/// One printed output line
#[derive(Serialize)]
struct Envelope {
    timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(flatten)]
    notification: Notification,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = PlayerConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("podplayer_ap={}", config.logging.level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let script = match &args.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?,
        None => std::io::read_to_string(std::io::stdin()).context("Failed to read script from stdin")?,
    };
    let steps = parse_script(&script).context("Invalid request script")?;
    info!("Loaded {} script steps", steps.len());

    let mut session = PlayerSession::simulated(&config);
    let printer = tokio::spawn(print_notifications(session.subscribe()));

    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(feed_requests(steps, tx, Duration::from_millis(args.linger_ms)));

    tokio::select! {
        _ = session.run(rx) => {}
        _ = shutdown_signal() => {}
    }

    let final_state = serde_json::to_string_pretty(session.state())
        .context("Failed to serialize final state")?;

    // Dropping the session closes the bus, which ends the printer
    session.shutdown();
    drop(session);
    printer.await.context("Notification printer failed")?;

    println!("{}", final_state);
    Ok(())
}

async fn feed_requests(steps: Vec<ScriptStep>, tx: mpsc::Sender<Request>, linger: Duration) {
    for step in steps {
        if step.wait_ms > 0 {
            tokio::time::sleep(Duration::from_millis(step.wait_ms)).await;
        }
        if tx.send(step.request).await.is_err() {
            return;
        }
    }
    tokio::time::sleep(linger).await;
}

async fn print_notifications(mut rx: broadcast::Receiver<Notification>) {
    loop {
        match rx.recv().await {
            Ok(notification) => {
                let envelope = Envelope {
                    timestamp: podplayer_common::time::now(),
                    notification,
                };
                match serde_json::to_string(&envelope) {
                    Ok(line) => println!("{}", line),
                    Err(e) => warn!("Failed to serialize notification: {}", e),
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Printer lagged, {} notifications not shown", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
