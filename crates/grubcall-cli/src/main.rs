use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "grubcall-cli", version, about = "Grubcall CLI")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a collection window now
    Open {
        /// Override the collection duration in minutes
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Close the active collection window
    Close,
    /// Window status
    Status,
    /// Place or replace an order
    Order {
        /// Participant id
        #[arg(long)]
        user: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// Free-text order (e.g. "2x burger and fries")
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Cancel an order
    Cancel {
        /// Participant id
        #[arg(long)]
        user: String,
    },
    /// Show all current orders
    Summary,
    /// Generate a consolidated receipt
    Receipt,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Run the scheduler daemon (daily open + expiry poll)
    Run,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let result = match cli.command {
        Commands::Open { minutes } => commands::window::open(minutes),
        Commands::Close => commands::window::close(),
        Commands::Status => commands::window::status(),
        Commands::Order { user, name, text } => commands::order::place(&user, &name, &text.join(" ")),
        Commands::Cancel { user } => commands::order::cancel(&user),
        Commands::Summary => commands::order::summary(),
        Commands::Receipt => commands::order::receipt(),
        Commands::Config { action } => commands::config::run(action),
        Commands::Run => commands::run::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
