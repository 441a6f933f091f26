// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Volley - rate-limited WhatsApp blasts over chained scheduler callbacks.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod app;
mod serve;
mod show_config;
mod shutdown;
mod start;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use volley_config::VolleyConfig;

/// Volley - rate-limited WhatsApp blasts.
#[derive(Parser, Debug)]
#[command(name = "volley", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service (blast trigger and scheduler callbacks).
    Serve,
    /// Start a blast from the configured source without the HTTP trigger.
    Start,
    /// Show blast progress. Lists recent blasts when no id is given.
    Status {
        blast_id: Option<String>,
        /// Output JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Validate and print the effective configuration (secrets redacted).
    Config,
}

fn load(path: Option<&PathBuf>) -> VolleyConfig {
    let result = match path {
        Some(path) => volley_config::load_and_validate_path(path),
        None => volley_config::load_and_validate(),
    };
    match result {
        Ok(config) => config,
        Err(errors) => {
            volley_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load(cli.config.as_ref());

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Start) => start::run_start(config).await,
        Some(Commands::Status {
            blast_id,
            json,
            plain,
        }) => status::run_status(&config, blast_id.as_deref(), json, plain).await,
        Some(Commands::Config) => show_config::run_config(&config),
        None => {
            println!("volley: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
