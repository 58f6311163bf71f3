//! # Physics Tutor
//!
//! Terminal front-end for a hosted LLM physics tutor. Answers come back with whatever math
//! markup the model chose; the core normalizes it to one canonical `$`/`$$` convention (or
//! strips it for theory-only answers) before anything is displayed.
//!
//! ## Modes
//! - Single question with `-p` (answer printed to stdout)
//! - Interactive terminal UI (default)
//! - Offline `normalize` of existing text

mod cli;
mod core;
mod run;
mod tui;

use clap::{CommandFactory, Parser};
use dotenv::dotenv;

use cli::{Args, Commands, HistorySubcommand};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let args = Args::parse();
    run::init_logger(&args);

    // Subcommands that need no API key.
    if let Some(command) = &args.command {
        match command {
            Commands::Normalize {
                input,
                theory,
                spans,
            } => {
                if let Err(e) = run::run_normalize(input.as_deref(), cli::mode_for(*theory), *spans)
                {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
            Commands::Config => core::cli::run_config(),
            Commands::History { subcommand } => match subcommand {
                HistorySubcommand::List { limit } => core::cli::run_history_list(*limit),
                HistorySubcommand::Show { id } => core::cli::run_history_show(id),
                HistorySubcommand::Delete { id } => core::cli::run_history_delete(id),
            },
            Commands::Completions { shell } => {
                let mut cmd = Args::command();
                cli::generate(*shell, &mut cmd, core::app::NAME, &mut std::io::stdout());
            }
        }
        return Ok(());
    }

    let context = core::extract::gather_context(&args.files).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    // Print a user-friendly message; exit uses Display not Debug.
    let config = core::config::load().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if let Some(question) = &args.prompt {
        return run::run_single_prompt(&args, question, context.as_deref(), &config).await;
    }

    run::launch_tui(config, args.mode(), context).await
}
