//! damcascade command line
//!
//! Loads the input tables, runs the cascade and writes the result table.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Cascading dam-breach and sediment routing through reservoir networks
#[derive(Parser)]
#[command(name = "damcascade")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cascading dam-breach and sediment routing", long_about = None)]
struct Cli {
    /// Verbosity of the log written to stderr
    #[arg(
        short,
        long,
        value_enum,
        ignore_case = true,
        default_value_t = LogLevel::Info,
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Route water (and optionally sediment) and write the result table
    Run(commands::run::RunArgs),
    /// Print the processing order of the drainage network
    Order(commands::order::OrderArgs),
    /// Load one input file and report what was read
    Validate(commands::validate::ValidateArgs),
}

/// Installs the stderr subscriber; stdout is left to command output
fn init_logging(level: LogLevel) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Order(args) => commands::order::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
