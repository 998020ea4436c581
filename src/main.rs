use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use clipsweep::commands;
use clipsweep::config::{ServiceMode, SettingsStore};
use clipsweep::process::SystemProcessRegistry;
use clipsweep::storage::{default_db_path, Database};

#[derive(Parser)]
#[command(name = "clipsweep", about = "Keeps your clipboard clean", version)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Start the clipboard monitor in the background
    Start,
    /// Stop the clipboard monitor
    Stop,
    /// Show service state and settings
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get or set the reaction mode
    Mode {
        /// New mode; omit to print the current one
        mode: Option<ModeArg>,
    },
    /// Get or set the clean delay in seconds (0 clears immediately)
    Timeout {
        /// New delay; omit to print the current one
        secs: Option<u32>,
    },
    /// Run the monitor loop in the foreground
    Run,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Clear the clipboard after each change
    Clean,
    /// Show the clipboard content instead of clearing
    ShowContent,
}

impl From<ModeArg> for ServiceMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Clean => ServiceMode::Clean,
            ModeArg::ShowContent => ServiceMode::ShowContent,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    if let CliCommand::Run = cli.command {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(clipsweep::run_daemon(&default_db_path()))?;
        return Ok(());
    }

    let db = Arc::new(Database::open(&default_db_path())?);
    let settings = SettingsStore::new(db);
    let registry = SystemProcessRegistry;

    match cli.command {
        CliCommand::Start => commands::start(&settings, &registry)?,
        CliCommand::Stop => commands::stop(&settings, &registry),
        CliCommand::Status { json } => {
            let report = commands::status(&settings, &registry);
            commands::print_status(&report, json);
        }
        CliCommand::Mode { mode } => commands::mode(&settings, mode.map(Into::into)),
        CliCommand::Timeout { secs } => commands::timeout(&settings, secs),
        CliCommand::Run => unreachable!(),
    }

    Ok(())
}
