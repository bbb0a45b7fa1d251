use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use deckwatch_cli::readline;
use deckwatch_cli::telemetry_watcher::start_telemetry_tail;
use deckwatch_cli::terminal::TerminalSink;
use deckwatch_core::context::AppConfigExt;
use deckwatch_core::{CardTable, TimeoutCatalog, spawn_session};
use deckwatch_types::AppConfig;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser)]
#[command(version, about = "In-match deck tracker")]
struct Cli {
    /// JSON card table (overrides the config file)
    #[arg(short, long)]
    catalog: Option<String>,

    /// Newline-delimited JSON telemetry capture (overrides the config file)
    #[arg(short, long)]
    telemetry: Option<String>,

    /// Replay the telemetry file from the beginning instead of only new lines
    #[arg(long)]
    from_start: bool,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let _log_guard = init_logging();
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if let Some(catalog) = cli.catalog {
        config.catalog_path = catalog;
    }
    if let Some(telemetry) = cli.telemetry {
        config.telemetry_path = telemetry;
    }

    let table = match CardTable::load(Path::new(&config.catalog_path)) {
        Ok(table) => {
            info!(cards = table.len(), path = %config.catalog_path, "Loaded card catalog");
            table
        }
        Err(e) => {
            warn!(error = %e, "Card catalog unavailable, roster cards will not resolve");
            CardTable::new()
        }
    };
    let catalog = Arc::new(TimeoutCatalog::new(table, config.lookup_timeout()));
    let sink = TerminalSink::new(std::io::stdout(), !cli.no_color);

    let (session, session_task) = spawn_session(catalog, sink, &config);
    let tail = start_telemetry_tail(
        PathBuf::from(&config.telemetry_path),
        cli.from_start,
        session.clone(),
    );

    loop {
        let Some(line) = readline()? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }
        if session.submit_line(line).await.is_err() {
            break;
        }
    }

    session.shutdown().await.ok();
    if let Some(tail) = tail {
        tail.abort();
    }
    let sink = session_task.await.map_err(|e| e.to_string())?;
    if sink.write_failed() {
        return Err("terminal output was lost during the session".to_string());
    }

    Ok(())
}

/// Initialize logging, writing to DECKWATCH_LOG_PATH if set, otherwise stderr.
fn init_logging() -> Option<WorkerGuard> {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    if let Ok(path) = std::env::var("DECKWATCH_LOG_PATH") {
        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            return Some(guard);
        }
    }

    // Fallback to stderr so stdout stays the deck view
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
    None
}
