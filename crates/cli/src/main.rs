//! extendipede: a terminal front end for the stage-advance simulator.
//!
//! # Usage
//!
//! ```bash
//! # Interactive shell (default)
//! extendipede
//!
//! # One run, then exit
//! extendipede run --stages 12 --frequency 1 --steps-per-cycle 16 ls -la
//!
//! # Machine-readable event stream
//! extendipede --json run date
//!
//! # Write .extendipede/config.toml
//! extendipede init
//! ```

mod render;
mod shell;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use ep_core::config::loader::load_config;
use ep_core::config::AppConfig;
use ep_core::init::{generate_project_config, InitOptions};
use ep_core::scheduler::Simulator;
use ep_core::services::{LocalExecutor, SessionAuth};
use ep_protocol::config_models::SimulatorConfig;
use ep_protocol::ipc::Event;
use render::Printer;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::select;
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "extendipede", version, about = "Watch a command crawl through a pipeline")]
struct Cli {
    /// Project root holding `.extendipede/`; commands run here too.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Print every core event as a JSON line.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive shell (the default).
    Shell,
    /// Animate one command and exit when the run ends.
    Run(RunArgs),
    /// Create `.extendipede/config.toml` with the default settings.
    Init {
        /// Overwrite an existing `.extendipede/` directory.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    #[arg(long)]
    stages: Option<usize>,

    /// Oscillator frequency in Hz.
    #[arg(long)]
    frequency: Option<f64>,

    #[arg(long)]
    steps_per_cycle: Option<u32>,

    /// Milliseconds between ticks.
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Oscillator cycles to simulate before giving up; 0 runs until the
    /// token exits.
    #[arg(long, default_value_t = 2)]
    cycles: u64,

    /// The command to run.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

impl RunArgs {
    fn simulator_config(&self, base: &SimulatorConfig) -> SimulatorConfig {
        let mut config = base.clone();
        if let Some(stages) = self.stages {
            config.stage_count = stages;
        }
        if let Some(frequency) = self.frequency {
            config.frequency = frequency;
        }
        if let Some(steps) = self.steps_per_cycle {
            config.steps_per_cycle = steps;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        config.max_ticks = match self.cycles {
            0 => None,
            cycles => Some(cycles.saturating_mul(u64::from(config.steps_per_cycle))),
        };
        config
    }
}

fn init_tracing(default_level: &str) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()?;
    Ok(())
}

fn build_simulator(
    root: &Path,
    app_config: &AppConfig,
    simulator_config: SimulatorConfig,
) -> Result<(Simulator, mpsc::Receiver<Event>)> {
    let executor = LocalExecutor::new(app_config.executor.clone(), root.to_path_buf());
    let auth = app_config
        .auth
        .clone()
        .map_or_else(SessionAuth::open, SessionAuth::new);
    let (events_tx, events_rx) = mpsc::channel(256);
    let simulator = Simulator::new(
        simulator_config,
        Arc::new(executor),
        Arc::new(auth),
        events_tx,
    )?;
    Ok((simulator, events_rx))
}

async fn run_once(
    mut simulator: Simulator,
    mut events_rx: mpsc::Receiver<Event>,
    mut printer: Printer,
    command: &str,
) -> Result<ExitCode> {
    simulator.start(command).await?;

    let mut exit = ExitCode::SUCCESS;
    loop {
        select! {
            event = events_rx.recv() => {
                let Some(event) = event else {
                    break;
                };
                printer.print(&event)?;
                match event {
                    Event::RunCompleted { success, .. } => {
                        if !success {
                            exit = ExitCode::FAILURE;
                        }
                        break;
                    }
                    Event::RunExhausted { .. } => break,
                    Event::RunCancelled { .. } => {
                        exit = ExitCode::from(130);
                        break;
                    }
                    _ => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                simulator.stop().await;
            }
        }
    }
    Ok(exit)
}

async fn init_project(root: PathBuf, force: bool) -> Result<ExitCode> {
    init_tracing("info")?;
    let options = InitOptions {
        target_dir: root,
        force,
    };
    let path = generate_project_config(options)
        .await
        .wrap_err("Failed to initialize project")?;
    println!("Created {}", path.display());
    Ok(ExitCode::SUCCESS)
}

async fn prepare(root: &Path) -> Result<AppConfig> {
    let app_config = load_config(root)
        .await
        .wrap_err("Failed to load configuration")?;
    init_tracing(&app_config.logging.level)?;
    tracing::debug!(root = %root.display(), ?app_config, "configuration loaded");
    Ok(app_config)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let printer = Printer::new(cli.json);

    match cli.command.unwrap_or(Command::Shell) {
        Command::Init { force } => init_project(cli.root, force).await,
        Command::Run(args) => {
            let app_config = prepare(&cli.root).await?;
            let simulator_config = args.simulator_config(&app_config.simulator);
            let (simulator, events_rx) =
                build_simulator(&cli.root, &app_config, simulator_config)?;
            run_once(simulator, events_rx, printer, &args.command.join(" ")).await
        }
        Command::Shell => {
            let app_config = prepare(&cli.root).await?;
            let (simulator, events_rx) =
                build_simulator(&cli.root, &app_config, app_config.simulator.clone())?;
            shell::run_shell(
                simulator,
                events_rx,
                printer,
                &app_config.executor.allowed_commands,
            )
            .await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_default_command_is_shell() {
        let cli = parse(&["extendipede"]);
        assert!(cli.command.is_none());
        assert!(!cli.json);
        assert_eq!(cli.root, PathBuf::from("."));
    }

    #[test]
    fn test_run_args_override_config() {
        let cli = parse(&[
            "extendipede",
            "--json",
            "run",
            "--stages",
            "3",
            "--steps-per-cycle",
            "8",
            "ls",
            "-la",
        ]);
        assert!(cli.json);
        let Some(Command::Run(args)) = cli.command else {
            panic!("Expected run");
        };
        assert_eq!(args.command, vec!["ls", "-la"]);

        let config = args.simulator_config(&SimulatorConfig::default());
        assert_eq!(config.stage_count, 3);
        assert_eq!(config.steps_per_cycle, 8);
        assert_eq!(config.frequency, SimulatorConfig::default().frequency);
        assert_eq!(config.max_ticks, Some(16));
    }

    #[test]
    fn test_zero_cycles_is_unbounded() {
        let cli = parse(&["extendipede", "run", "--cycles", "0", "date"]);
        let Some(Command::Run(args)) = cli.command else {
            panic!("Expected run");
        };
        let config = args.simulator_config(&SimulatorConfig::default());
        assert_eq!(config.max_ticks, None);
    }

    #[test]
    fn test_run_requires_command() {
        assert!(Cli::try_parse_from(["extendipede", "run"]).is_err());
    }
}
