//! # Mecanum Pad
//!
//! Drive a four-wheel mecanum platform with a PS4/PS5 controller.
//!
//! Left stick strafes and drives, R2 rotates clockwise, L2 counter-clockwise,
//! both triggers brake. Options stops the motors; Options + Share stops them
//! and exits.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use mecanum_pad::board::MotorBoard;
use mecanum_pad::config::Config;
use mecanum_pad::controller::{EventMapper, Gamepad};
use mecanum_pad::drive::{DriveSession, SessionControl};
use mecanum_pad::serial::{spawn_writer, BoardSerial};
use mecanum_pad::telemetry::{open_sink, TelemetrySink};

/// Command line options. Flags override values from the config file.
#[derive(Parser, Debug)]
#[command(name = "mecanum-pad", version, about)]
struct Cli {
    /// TOML configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Controller evdev device, e.g. /dev/input/event3
    #[arg(short, long)]
    interface: Option<String>,

    /// Motor board serial port
    #[arg(long)]
    board_port: Option<String>,

    /// Seconds to wait for the controller to connect
    #[arg(long)]
    connect_timeout: Option<u64>,

    /// Do not write the wheel telemetry log
    #[arg(long)]
    no_telemetry: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(interface) = &self.interface {
            config.controller.device_path = interface.clone();
        }
        if let Some(port) = &self.board_port {
            config.board.port = port.clone();
        }
        if let Some(timeout) = self.connect_timeout {
            config.controller.connect_timeout_s = timeout;
        }
        if self.no_telemetry {
            config.telemetry.enabled = false;
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Main entry point for Mecanum Pad
///
/// # Control Flow
///
/// 1. Parse flags, load and validate configuration
/// 2. Open the motor board and start its writer task
/// 3. Wait for the controller, then route its events through a [`DriveSession`]
/// 4. On quit combo, Ctrl+C, SIGTERM or any fault: stop motors, flush the
///    board queue and the telemetry log, exit
///
/// # Errors
///
/// Returns error if the board cannot be opened, the controller never
/// connects, the controller disconnects or the board writer fails.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Mecanum Pad v{} starting...", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    run(config).await
}

async fn run(config: Config) -> Result<()> {
    let serial = BoardSerial::open(&config.board.port, config.board.baud_rate)?;
    let (board, writer) = spawn_writer(serial.into_port());

    let (telemetry, guard) = open_sink(&config.telemetry)?;
    if config.telemetry.enabled {
        info!("Wheel telemetry -> {}", config.telemetry.log_path);
    }

    let mut session = DriveSession::new(&config, board, telemetry);
    let result = drive(&config, &mut session).await;
    session.close();

    match writer.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Board writer stopped: {}", e),
        Err(e) => warn!("Board writer task failed: {}", e),
    }
    drop(guard);

    info!("Shutdown complete");
    result
}

async fn drive<B, T>(config: &Config, session: &mut DriveSession<B, T>) -> Result<()>
where
    B: MotorBoard,
    T: TelemetrySink,
{
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let timeout = Duration::from_secs(config.controller.connect_timeout_s);
    info!(
        "Waiting up to {}s for controller at {}",
        config.controller.connect_timeout_s, config.controller.device_path
    );

    let gamepad = tokio::select! {
        gamepad = Gamepad::wait_for(&config.controller.device_path, timeout) => gamepad?,
        _ = &mut shutdown => {
            info!("Shutdown requested before the controller connected");
            return Ok(());
        }
    };

    let mut mapper = EventMapper::from_config(&config.controller);
    let mut events = gamepad.into_event_stream()?;

    info!("Controller ready. Press Options + Share to quit");

    loop {
        tokio::select! {
            event = events.next_event() => {
                let event = event.context("Controller disconnected")?;
                for pad_event in mapper.translate(&event) {
                    if session.handle(pad_event)? == SessionControl::Shutdown {
                        return Ok(());
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Received shutdown signal");
                return Ok(());
            }
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(e) => {
            warn!("SIGTERM handler unavailable: {}", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}
