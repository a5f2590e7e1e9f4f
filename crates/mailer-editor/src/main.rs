use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::LevelFilter;
use mailer_editor::{ui, App, Settings};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{env, io, time::Duration};

#[tokio::main]
async fn main() -> Result<()> {
    let mut logger = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Info);
        logger.filter_module("mailer_editor", LevelFilter::Debug);
    }
    logger.init();

    let mut settings = Settings::from_env();
    settings.apply_args(env::args().skip(1));

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let app = App::bootstrap(&settings)?;

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableBracketedPaste) {
        let _ = disable_raw_mode();
        return Err(e).context("Failed to enter alternate screen");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = create_terminal(backend, restore_terminal)?;

    let res = run_app(&mut terminal, app);

    restore_terminal()?;

    if let Err(err) = &res {
        log::error!("Application error: {:#}", err);
    }
    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    let mut redraw = true;
    let mut last_status = String::new();

    loop {
        // the status line shows the API base, which changes once /env loads
        let status = app.status_line();
        if redraw || app.surface.needs_render() || status != last_status {
            let view = app.view();
            if let Err(e) = terminal.draw(|f| ui::draw(f, &view, &status)) {
                log::error!("Terminal draw error: {}", e);
            }
            last_status = status;
            redraw = false;
        }

        if app.should_quit() {
            log::info!("Application shutdown requested");
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Paste(text) => app.handle_paste(text),
                Event::Resize(_, _) => redraw = true,
                _ => {}
            }
        }
    }

    log::info!("Application loop ended successfully");
    Ok(())
}

/// Leaves raw mode and the alternate screen through `restore` if the
/// terminal cannot be created.
fn create_terminal<B: Backend>(
    backend: B,
    restore: impl FnOnce() -> Result<()>,
) -> Result<Terminal<B>> {
    match Terminal::new(backend) {
        Ok(terminal) => Ok(terminal),
        Err(e) => {
            if let Err(restore_err) = restore() {
                log::error!("Failed to restore terminal: {:#}", restore_err);
            }
            Err(e).context("Failed to create terminal")
        }
    }
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen, DisableBracketedPaste)?;
    let _ = execute!(stdout, crossterm::cursor::Show);
    Ok(())
}
