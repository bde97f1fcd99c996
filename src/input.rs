use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};

use crate::config::Config;
use crate::session::SessionController;
use crate::ui;

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum HandleResult {
    /// Continue running the app
    Continue,
    /// Exit the app
    Exit,
}

/// Poll interval while a reply is pending, so it shows up promptly.
const AWAITING_POLL_MS: u64 = 30;

/// Poll interval when idle.
const IDLE_POLL_MS: u64 = 100;

/// Run the main application loop.
///
/// Must run inside an entered tokio runtime: submissions spawn the gateway
/// call onto it.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut SessionController,
    config: &Config,
) -> io::Result<()> {
    loop {
        // Settle any finished exchange before drawing
        session.poll_reply();

        terminal.draw(|f| ui::render(f, &session.view(), &config.theme))?;

        let timeout = if session.is_awaiting_reply() {
            Duration::from_millis(AWAITING_POLL_MS)
        } else {
            Duration::from_millis(IDLE_POLL_MS)
        };

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if handle_key_event(session, key.code, key.modifiers) == HandleResult::Exit {
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Handle a key event and return whether to continue or exit.
///
/// Editing keys only apply while the panel is open. Draft editing and the
/// toggle keep working while a reply is pending.
pub fn handle_key_event(
    session: &mut SessionController,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> HandleResult {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    // Global shortcuts (work whether or not the panel is open)
    match code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => return HandleResult::Exit,
        KeyCode::Char('o') if ctrl => {
            session.toggle_open();
            return HandleResult::Continue;
        }
        _ => {}
    }

    if !session.is_open() {
        return HandleResult::Continue;
    }

    match code {
        KeyCode::Esc => session.toggle_open(),
        KeyCode::Enter => {
            session.submit_draft();
        }
        KeyCode::Backspace => {
            let mut draft = session.pending_input().to_string();
            draft.pop();
            session.update_draft(draft);
        }
        KeyCode::Char(c) if !ctrl => {
            let mut draft = session.pending_input().to_string();
            draft.push(c);
            session.update_draft(draft);
        }
        _ => {}
    }

    HandleResult::Continue
}
