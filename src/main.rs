//! ByteBot - chat with ByteCode Labs' assistant from the terminal.

use std::io;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use bytebot::config::Config;
use bytebot::gateway::AssistantGateway;
use bytebot::input;
use bytebot::llm::LlmConfig;
use bytebot::logging;
use bytebot::session::SessionController;

fn main() -> Result<()> {
    // Load configuration
    let config = Config::load();
    let _log_guard = logging::init(&config.logging)?;

    // Credentials are resolved once here and injected from then on
    let llm_config = LlmConfig::from_env_and_config(&config.llm);
    if llm_config.is_configured() {
        info!(
            provider = llm_config.provider.display_name(),
            model = %llm_config.model,
            "assistant provider configured"
        );
    } else {
        warn!(
            env = llm_config.provider.env_var_name(),
            "no API key configured; every reply will be the fallback apology"
        );
    }

    // Gateway calls are spawned from the synchronous UI loop
    let runtime = tokio::runtime::Runtime::new()?;
    let _runtime_guard = runtime.enter();

    let gateway = AssistantGateway::from_config(&config, llm_config);
    let mut session = SessionController::from_config(&config, gateway);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = input::run_app(&mut terminal, &mut session, &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
