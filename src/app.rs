//! Wires the controller to real transports, stdin commands and stdout.
//!
//! Three workers cooperate: the controller's run loop (the only owner of
//! session state), a stdin reader thread that turns typed lines into
//! [`Command`]s, and this function's loop, which prints updates and forwards
//! intents.

use std::path::PathBuf;

use logtide_core::config::Config;
use logtide_core::{ControllerSettings, DisplayUpdate, SourceController};
use logtide_feeds::{HttpSourceDirectory, WebSocketTransport};
use tokio::sync::mpsc;

use crate::commands::{Command, HELP};
use crate::output::Printer;

/// Everything resolved from the command line and config file.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: Config,
    pub settings: ControllerSettings,
    pub html_path: Option<PathBuf>,
}

pub async fn run(opts: RunOptions) -> anyhow::Result<()> {
    let token = opts.config.connection.token();
    let transport = WebSocketTransport::new(&opts.config.connection.stream_url, token.clone())?;
    let directory = HttpSourceDirectory::new(&opts.config.connection.directory_url, token)?;

    tracing::info!(
        app = %opts.settings.app_id,
        stream_url = %opts.config.connection.stream_url,
        "logtide starting"
    );

    let controller = SourceController::new(opts.settings, transport, directory);
    let (intent_tx, intent_rx) = mpsc::channel(16);
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let worker = tokio::spawn(controller.run(intent_rx, update_tx));

    let (command_tx, mut command_rx) = mpsc::unbounded_channel();
    spawn_command_reader(command_tx);
    let mut commands_open = true;

    let mut printer = Printer::new(std::io::stdout(), std::io::stderr(), opts.html_path);
    let mut latest: Option<DisplayUpdate> = None;

    loop {
        tokio::select! {
            update = update_rx.recv() => {
                let Some(update) = update else { break };
                printer.show(&update)?;
                latest = Some(update);
            }
            command = command_rx.recv(), if commands_open => {
                match command {
                    // stdin closed: keep streaming until Ctrl-C.
                    None => commands_open = false,
                    Some(Ok(Command::Quit)) => break,
                    Some(Ok(Command::Help)) => printer.message(HELP)?,
                    Some(Ok(Command::Sources)) => {
                        let sources = latest
                            .as_ref()
                            .map(|u| u.sources.as_slice())
                            .unwrap_or_default();
                        printer.show_sources(sources)?;
                    }
                    Some(Ok(cmd)) => {
                        if let Some(intent) = cmd.into_intent() {
                            if intent_tx.send(intent).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Err(msg)) if msg.is_empty() => {}
                    Some(Err(msg)) => printer.message(&format!("! {msg}"))?,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    // Dropping both channel ends stops the run loop, even mid-listing, and
    // closes the session.
    drop(intent_tx);
    drop(update_rx);
    worker.await?;
    if let Some(update) = &latest {
        printer.export(update)?;
    }
    tracing::info!("logtide stopped");
    Ok(())
}

/// Read commands on a dedicated thread; a blocked stdin read must not hold
/// up runtime shutdown.
fn spawn_command_reader(tx: mpsc::UnboundedSender<Result<Command, String>>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            match line {
                Ok(line) => {
                    if tx.send(Command::parse(&line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    return;
                }
            }
        }
    });
}
