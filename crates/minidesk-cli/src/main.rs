use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "minidesk", version, about = "minidesk CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pomodoro session clock
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Body-mass-index calculator
    Bmi(commands::bmi::BmiArgs),
    /// Unit converter
    Convert {
        #[command(subcommand)]
        action: commands::convert::ConvertAction,
    },
    /// Expense tracker
    Expense {
        #[command(subcommand)]
        action: commands::expense::ExpenseAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Log to stderr so stdout stays machine-readable. Level comes from
/// MINIDESK_LOG (e.g. `debug`, `minidesk_core=trace`), default `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("MINIDESK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Bmi(args) => commands::bmi::run(args),
        Commands::Convert { action } => commands::convert::run(action),
        Commands::Expense { action } => commands::expense::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
