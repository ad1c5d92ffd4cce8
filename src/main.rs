use anyhow::Result;
use clap::Parser;
use qr_sender::{
    config,
    diagnostics::TracingDiagnostics,
    dispatch::{Outcome, RequestDispatcher},
    view::FileSink,
};
use std::{path::PathBuf, sync::Arc};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Text to encode. Reads one request per line from stdin when omitted
    text: Option<String>,

    /// Configuration file (defaults to CONFIG_PATH or qr-sender.yaml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Receive endpoint URL
    #[arg(short, long, value_name = "URL")]
    endpoint: Option<String>,

    /// Destination of the rendered PNG
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            )
        })?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (before logging setup)
    let mut config = match config::load(args.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(endpoint) = args.endpoint {
        config.dispatcher.endpoint = endpoint;
    }
    if let Some(output) = args.output {
        config.output.path = output;
    }

    // Environment variable overrides config
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logs.level.clone());

    if let Err(e) = validate_log_level(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&log_level))
        .json()
        .init();

    let sink = Arc::new(FileSink::new(config.output.path.clone()));
    info!("Writing images to {}", sink.path().display());
    let dispatcher =
        RequestDispatcher::new(&config.dispatcher, sink, Arc::new(TracingDiagnostics))?;

    info!("Sending to {}", dispatcher.endpoint());

    match args.text {
        Some(text) => report(dispatcher.send(text).await),
        None => {
            let mut lines = BufReader::new(tokio::io::stdin()).split(b'\n');
            let mut pending = Vec::new();
            loop {
                match lines.next_segment().await {
                    Ok(Some(line)) => pending.push(dispatcher.dispatch(decode_line(&line))),
                    Ok(None) => break,
                    Err(e) => {
                        // requests already started are still awaited below
                        warn!("Stopped reading stdin: {}", e);
                        break;
                    }
                }
            }
            for handle in pending {
                match handle.await {
                    Ok(outcome) => report(outcome),
                    Err(e) => warn!("Dispatch task ended abnormally: {}", e),
                }
            }
        }
    }

    Ok(())
}

/// Lossy UTF-8 with the line terminator removed, so one bad line cannot end the run
fn decode_line(line: &[u8]) -> String {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Rendered { token, .. } => info!("Request {} rendered", token),
        Outcome::Stale { token } => info!("Request {} superseded by a newer response", token),
        // already recorded by the diagnostic sink
        Outcome::Failed { .. } => {}
    }
}
