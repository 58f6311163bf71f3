//! Application run modes: logger init, single prompt, offline normalize, TUI launch.

use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;

use crate::cli::Args;
use crate::core;
use crate::core::config::Config;
use crate::core::llm::{AskRequest, OnContentChunk};
use crate::core::math::{self, Mode};
use crate::core::session::Session;

/// Initialize env_logger. In TUI mode, writes to file to avoid corrupting the display.
pub fn init_logger(args: &Args) {
    let log_level = args.log_level();
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level));

    if args.is_interactive() {
        let log_path = core::paths::cache_dir().and_then(|d| {
            std::fs::create_dir_all(&d).ok()?;
            Some(d.join(format!("{}.log", core::app::NAME)))
        });
        if let Some(path) = log_path
            && let Ok(file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
        {
            logger.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }
    let _ = logger.try_init();
}

/// Read `-p` text: `-` means stdin.
fn read_question(arg: &str) -> io::Result<String> {
    if arg == "-" {
        io::read_to_string(io::stdin())
    } else {
        Ok(arg.to_string())
    }
}

/// Run single prompt mode: ask the model, print the normalized answer to stdout,
/// and save the exchange as a one-entry session.
pub async fn run_single_prompt(
    args: &Args,
    question: &str,
    context: Option<&str>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let question = read_question(question)?;
    let question = question.trim();
    if question.is_empty() {
        eprintln!("Error: empty prompt");
        std::process::exit(1);
    }
    let mode = args.mode();

    // Raw mode streams as it arrives; otherwise the answer is only printed once normalized.
    let on_content_chunk: Option<OnContentChunk> = if args.raw {
        Some(Box::new(|s| {
            let _ = io::stdout().write_all(s.as_bytes());
            let _ = io::stdout().flush();
        }))
    } else {
        None
    };
    let on_progress: Option<core::llm::OnProgress> = if args.quiet {
        None
    } else {
        Some(Box::new(|s| {
            let _ = writeln!(io::stderr(), "{}", s);
        }))
    };

    let answer = core::llm::ask(
        config,
        AskRequest {
            question,
            context,
            mode,
        },
        on_progress,
        on_content_chunk,
        None,
    )
    .await?;
    log::info!(
        "Tokens: {} prompt, {} completion",
        answer.usage.prompt_tokens,
        answer.usage.completion_tokens
    );

    let rendered = math::render_as_string(&math::normalize(&answer.content, mode));
    if args.raw {
        println!();
    } else {
        println!("{}", rendered);
    }

    let mut session = Session::new();
    session.record(question, &rendered, mode);
    if let Err(e) = core::history::save_session(&session, config.max_sessions) {
        log::warn!("Failed to save session: {}", e);
    }
    Ok(())
}

/// Run the `normalize` command: normalize a file (or stdin) without calling the model.
pub fn run_normalize(input: Option<&Path>, mode: Mode, spans: bool) -> io::Result<()> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut stdout = io::stdout().lock();
    if spans {
        for span in math::detect(&raw) {
            writeln!(
                stdout,
                "{:<12} {:<13} {:>6}..{:<6} {:?}",
                format!("{:?}", span.kind),
                format!("{:?}", span.fence),
                span.range.start,
                span.range.end,
                span.text(&raw)
            )?;
        }
        return Ok(());
    }

    let doc = math::normalize(&raw, mode);
    stdout.write_all(math::render_as_string(&doc).as_bytes())?;
    if mode == Mode::StripMath {
        writeln!(stdout)?;
    }
    stdout.flush()
}

/// Launch the TUI in a blocking thread. Returns on panic or IO error.
pub async fn launch_tui(
    config: Config,
    mode: Mode,
    context: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(config);
    let config_clone = config.clone();
    let join_result: Result<io::Result<()>, tokio::task::JoinError> =
        tokio::task::spawn_blocking(move || crate::tui::run(config_clone, mode, context)).await;

    match join_result {
        Ok(io_result) => io_result?,
        Err(join_err) => {
            if let Ok(panic) = join_err.try_into_panic() {
                let msg = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    format!("{:?}", panic)
                };
                eprintln!("TUI panic: {}", msg);
            }
            return Err(
                Box::new(io::Error::other("TUI thread panicked")) as Box<dyn std::error::Error>
            );
        }
    }
    Ok(())
}
