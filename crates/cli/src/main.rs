//! Gift card lookup CLI - operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Look up a shopper's active gift cards
//! gcl lookup --email shopper@example.com
//!
//! # Same lookup without the customer search, keeping every card state
//! gcl lookup --email shopper@example.com --no-resolve-customer --include-inactive
//!
//! # Show the effective configuration (token redacted)
//! gcl config
//! ```
//!
//! # Commands
//!
//! - `lookup` - Run one lookup and print the JSON summary
//! - `config` - Print the configuration loaded from the environment

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::lookup::LookupArgs;

#[derive(Parser)]
#[command(name = "gcl")]
#[command(author, version, about = "Gift card lookup CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a shopper's active gift cards
    Lookup(LookupArgs),
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "giftcard_lookup_cli=info,giftcard_lookup_api=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Lookup(args) => commands::lookup::run(&args).await?,
        Commands::Config => commands::config::show()?,
    }
    Ok(())
}
