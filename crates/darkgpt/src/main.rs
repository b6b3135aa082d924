// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! DarkGPT - chat with an AI that can search the web.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod admin;
mod app;
mod serve;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

/// DarkGPT - chat with an AI that can search the web.
#[derive(Parser, Debug)]
#[command(name = "darkgpt", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API server.
    Serve,
    /// Chat interactively as an existing user.
    Shell {
        /// Account email.
        #[arg(long)]
        email: String,
    },
    /// Create an account.
    Signup {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Account email.
        #[arg(long)]
        email: String,
    },
    /// Delete every message of a user.
    ClearHistory {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => darkgpt_config::load_and_validate_path(path),
        None => darkgpt_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            darkgpt_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => {
            serve::init_tracing(&config.agent.log_level);
            serve::run_serve(config).await
        }
        Some(Commands::Shell { email }) => {
            // Keep the REPL readable: only warnings unless RUST_LOG says otherwise.
            serve::init_tracing("warn");
            shell::run_shell(config, &email).await
        }
        Some(Commands::Signup { name, email }) => {
            serve::init_tracing("warn");
            admin::run_signup(config, name, email).await
        }
        Some(Commands::ClearHistory { email, yes }) => {
            serve::init_tracing("warn");
            admin::run_clear_history(config, &email, yes).await
        }
        None => {
            println!("darkgpt: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}
