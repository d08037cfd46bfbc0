mod cli;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "relay-digest", version, about = "Relay Digest — summarize and archive forwarded messages")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the archive database and default config
    Init {
        /// Database path (defaults to the data dir)
        #[arg(long)]
        db: Option<String>,
    },
    /// Process one forwarded-message payload (JSON from stdin or --file)
    Process {
        /// Read the payload from a file instead of stdin
        #[arg(long)]
        file: Option<String>,
        #[arg(long)]
        db: Option<String>,
    },
    /// List known categories with message counts
    Categories {
        #[arg(long)]
        db: Option<String>,
    },
    /// Show archive status
    Status {
        #[arg(long)]
        db: Option<String>,
    },
    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Display the full configuration
    Show,
}

fn main() {
    let app = App::parse();

    match app.command {
        Commands::Init { db } => {
            cli::init::run(db.as_deref()).unwrap_or_else(|e| eprintln!("Error: {}", e));
        }
        Commands::Process { file, db } => {
            cli::process::run(file.as_deref(), db.as_deref())
                .unwrap_or_else(|e| eprintln!("Error: {}", e));
        }
        Commands::Categories { db } => {
            cli::categories::run(db.as_deref()).unwrap_or_else(|e| eprintln!("Error: {}", e));
        }
        Commands::Status { db } => {
            cli::status::run(db.as_deref()).unwrap_or_else(|e| eprintln!("Error: {}", e));
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                cli::config::run_show().unwrap_or_else(|e| eprintln!("Error: {}", e));
            }
        },
    }
}
