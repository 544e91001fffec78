use std::path::PathBuf;

use clap::Parser;
use logtide::app::{self, RunOptions};
use logtide_core::config::Config;
use logtide_core::controller::parse_tail_depth;
use logtide_core::renderer::DisplayZone;
use logtide_core::ControllerSettings;

#[derive(Parser)]
#[command(name = "logtide", about = "Live, classified log tailing")]
struct Cli {
    /// Application whose sources are tailed.
    #[arg(long)]
    app: String,

    /// Source to tail first (defaults to the first one listed).
    #[arg(long)]
    source: Option<String>,

    /// Historical lines requested when a stream opens.
    #[arg(long)]
    tail: Option<String>,

    /// Server hint forwarded to the log endpoint.
    #[arg(long)]
    server: Option<String>,

    /// Keep an HTML rendering of the live output at this path.
    #[arg(long)]
    html: Option<PathBuf>,

    /// Hide timestamps.
    #[arg(long)]
    no_timestamps: bool,

    /// Show timestamps in UTC instead of local time.
    #[arg(long)]
    utc: bool,

    /// Read configuration from this file instead of ~/.config/logtide/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write debug logs to /tmp/logtide-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/logtide-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("logtide debug log started, tail -f /tmp/logtide-debug.log");
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let tail_depth = match &cli.tail {
        Some(raw) => parse_tail_depth(raw, config.stream.max_tail_depth)?,
        None => config.stream.default_tail_depth,
    };

    let mut render = config.display.render_options();
    if cli.no_timestamps {
        render.show_timestamps = false;
    }
    if cli.utc {
        render.zone = DisplayZone::Utc;
    }

    let settings = ControllerSettings {
        app_id: cli.app,
        initial_source: cli.source,
        initial_tail_depth: tail_depth,
        max_tail_depth: config.stream.max_tail_depth,
        server_hint: cli.server.or_else(|| config.connection.server_hint.clone()),
        render,
        directory_timeout: config.connection.request_timeout(),
    };

    app::run(RunOptions {
        config,
        settings,
        html_path: cli.html,
    })
    .await
}
