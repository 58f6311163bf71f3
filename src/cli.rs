//! CLI definitions: argument parsing, subcommands, and help text.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

use crate::core::math::Mode;

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  physics-tutor                          Launch interactive TUI
  physics-tutor -p \"Gauss's law\"         Single question, answer printed to stdout
  physics-tutor -p - < question.txt      Read the question from stdin
  physics-tutor -p \"...\" --theory        Theory-only answer (no equations)
  physics-tutor -p \"...\" -f notes.md     Attach a text file as context
  physics-tutor normalize answer.md      Normalize math markup in a file
  physics-tutor config                   Show config paths and status
  physics-tutor history list             List saved sessions
  physics-tutor completions bash         Generate bash completions
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Physics tutor for IIT-JAM, CSIR-NET and GATE, with clean LaTeX answers",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Ask a single question then exit (without opening the TUI)
    #[arg(
        short = 'p',
        long,
        help = "Ask one question and print the answer (use '-' to read from stdin)"
    )]
    pub prompt: Option<String>,

    /// Theory-only answers: no equations or math symbols
    #[arg(long)]
    pub theory: bool,

    /// Attach a plain-text file as context (repeatable)
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// In prompt mode, stream the raw model output without normalizing it
    #[arg(long)]
    pub raw: bool,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize math markup in text offline (reads stdin when FILE is omitted)
    Normalize {
        /// Input file
        input: Option<PathBuf>,
        /// Strip all math instead of canonicalizing it
        #[arg(long)]
        theory: bool,
        /// Print the detected spans instead of the normalized text
        #[arg(long)]
        spans: bool,
    },
    /// Show config paths, model, and API key status
    Config,
    /// Manage saved sessions
    History {
        #[command(subcommand)]
        subcommand: HistorySubcommand,
    },
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum HistorySubcommand {
    /// List sessions
    List {
        /// Maximum number of sessions to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Print every question and answer of a session
    Show {
        /// Session ID (see `history list`)
        id: String,
    },
    /// Delete a session
    Delete {
        /// Session ID (see `history list`)
        id: String,
    },
}

/// `--theory` selects math stripping; otherwise math is kept.
pub fn mode_for(theory: bool) -> Mode {
    if theory {
        Mode::StripMath
    } else {
        Mode::PreserveMath
    }
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }

    /// Answer mode for prompt mode and the TUI's initial mode.
    pub fn mode(&self) -> Mode {
        mode_for(self.theory)
    }

    /// True when the TUI will be launched (no prompt, no subcommand).
    pub fn is_interactive(&self) -> bool {
        self.prompt.is_none() && self.command.is_none()
    }
}
