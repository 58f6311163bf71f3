//! TUI (Text User Interface): ask questions and read rendered answers.

mod answer_result;
mod app;
mod constants;
mod draw;
mod handlers;
mod shortcuts;
mod text;

use app::App;

use crossterm::event::{self, Event};
use crossterm::execute;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Runtime;

use crate::core::config::Config;
use crate::core::math::Mode;

use draw::draw;
use handlers::{HandleResult, PendingAnswer};

/// Guard that restores terminal state on drop (including on panic).
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            event::DisableMouseCapture,
            LeaveAlternateScreen
        );
    }
}

/// Drain progress, chunks and the final result of the request in flight.
fn poll_pending(app: &mut App, pending: &mut Option<PendingAnswer>, max_sessions: u32) {
    let Some(answer) = pending.as_ref() else {
        return;
    };
    while let Ok(msg) = answer.progress_rx.try_recv() {
        app.set_progress(msg);
    }
    while let Ok(chunk) = answer.stream_rx.try_recv() {
        app.append_chunk(&chunk);
    }
    if let Ok(result) = answer.result_rx.try_recv() {
        answer_result::handle_answer_result(app, result, max_sessions);
        *pending = None;
    }
}

/// Run the TUI loop. Uses a dedicated Tokio runtime for the tutor requests.
pub fn run(config: Arc<Config>, mode: Mode, context: Option<String>) -> io::Result<()> {
    use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, enable_raw_mode};
    use ratatui::Terminal;
    use ratatui::backend::CrosstermBackend;

    let _guard = TerminalGuard;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Clear(ClearType::All))?;
    execute!(stdout, event::EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let rt = Arc::new(
        Runtime::new().map_err(|e| io::Error::other(format!("Failed to create runtime: {}", e)))?,
    );

    let mut app = App::new(config.model_id.clone(), mode, context);
    let mut pending: Option<PendingAnswer> = None;
    log::info!("TUI started ({} mode)", mode.label());

    loop {
        poll_pending(&mut app, &mut pending, config.max_sessions);

        terminal.draw(|f| draw(f, &mut app, f.area()))?;

        if event::poll(Duration::from_millis(constants::EVENT_POLL_TIMEOUT_MS))? {
            match event::read()? {
                Event::Mouse(mouse) => handlers::handle_mouse(mouse, &mut app),
                Event::Key(key) => {
                    let result = handlers::handle_key(
                        key,
                        handlers::HandleKeyContext {
                            app: &mut app,
                            config: &config,
                            pending: &mut pending,
                            rt: &rt,
                        },
                    );
                    if result == HandleResult::Break {
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    log::info!(
        "TUI closed after {} answered question(s)",
        app.session.entries().len()
    );
    terminal.show_cursor()?;
    Ok(())
}
