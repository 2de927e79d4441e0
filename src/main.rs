// src/main.rs - Replay a scripted print session through the park controller
use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;
use serde_json::Value;

use park_on_pause::config::{self, HostConfig, ParkConfig};
use park_on_pause::{ParkController, Printer, SimulatedHost};

/// Park-on-pause host harness
#[derive(Parser, Debug)]
#[command(name = "park-host", about = "Replay pause/resume events against a simulated printer.")]
struct Cli {
    /// Path to a TOML config file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON file with the session script
    #[arg(short, long)]
    events: PathBuf,

    /// Maximum log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

/// One step of a session script.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Step {
    Start,
    Gcode(Vec<String>),
    Event {
        name: String,
        #[serde(default)]
        payload: Value,
    },
    Reload(ParkConfig),
    Finish,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .init();

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            config::load_config(path).map_err(|e| {
                tracing::error!("Failed to load config from '{}': {}", path.display(), e);
                Box::new(e) as Box<dyn std::error::Error + Send + Sync + 'static>
            })?
        }
        None => HostConfig::default(),
    };

    match &config.profile {
        Some(profile) => tracing::info!(
            "Printer profile: {} ({} x {} mm)",
            profile.profile_id().unwrap_or("unnamed"),
            profile.volume.width,
            profile.volume.depth
        ),
        None => tracing::warn!("No printer profile configured"),
    }

    let script = std::fs::read_to_string(&cli.events)?;
    let steps: Vec<Step> = serde_json::from_str(&script)?;

    let controller = ParkController::new(config.park.clone())?;
    let printer = Printer::new(controller, SimulatedHost::new(config.profile.clone()));
    let (handle, rx) = Printer::<SimulatedHost>::channel(config.runtime.channel_capacity);
    let task = tokio::spawn(printer.run(rx));

    for step in steps {
        match step {
            Step::Start => {
                let id = handle.start_job().await?;
                println!("job {} started", id);
            }
            Step::Gcode(lines) => handle.send_gcode(lines).await?,
            Step::Event { name, payload } => match handle.send_event(&name, payload).await {
                Ok(outcome) => println!("{} -> {:?}", name, outcome),
                Err(e) => println!("{} -> rejected: {}", name, e),
            },
            Step::Reload(park) => {
                handle.reload_settings(park).await?;
                println!("settings reloaded");
            }
            Step::Finish => {
                handle.finish_job().await?;
                println!("job finished");
            }
        }
    }
    drop(handle);

    let host = task.await?;
    println!("--- issued directives ---");
    for line in host.issued() {
        println!("{}", line);
    }
    let position = host.position();
    println!("toolhead at X{} Y{} Z{}", position.x, position.y, position.z);
    for error in &host.errors {
        println!("alert: {}", error);
    }
    if host.cancelled {
        println!("print was cancelled");
    }
    Ok(())
}
