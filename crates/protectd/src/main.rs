mod hub;
mod settings;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use protect_core::{ControllerNode, HubEvent};

use crate::hub::StdioHub;
use crate::settings::Settings;

/// UniFi Protect node-server daemon.
///
/// Reads hub events as JSON lines on stdin and reports node registrations
/// and driver values as JSON lines on stdout.
#[derive(Debug, Parser)]
#[command(name = "protectd", version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to the daemon settings file (TOML).
    #[arg(long, value_name = "FILE")]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "failed to load settings; using defaults");
            Settings::default()
        }
    };

    run(settings).await;
    // Interrupt or orderly termination always exits 0; every other
    // failure has already been logged.
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Stdout carries the hub wire protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(settings: Settings) {
    let mut hub = StdioHub::new();
    let mut controller = ControllerNode::new(settings.transport());
    controller.start(&mut hub);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received; shutting down");
                break;
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => handle_line(&line, &mut controller, &mut hub).await,
                    Ok(None) => {
                        info!("hub closed the event stream; shutting down");
                        break;
                    }
                    Err(e) => {
                        error!(error = %e, "failed to read hub event stream");
                        break;
                    }
                }
            }
        }
    }
}

/// Parse and dispatch one hub event.
///
/// Each event runs to completion before the next line is read, so remote
/// operations never overlap. Failures are logged and the loop keeps going.
async fn handle_line(line: &str, controller: &mut ControllerNode, hub: &mut StdioHub) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let event: HubEvent = match serde_json::from_str(line) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "ignoring malformed hub event");
            return;
        }
    };

    if let Err(e) = controller.handle(event, hub).await {
        error!(error = %e, "operation abandoned");
    }
}
