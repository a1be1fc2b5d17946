use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use typist::{
    app::{App, AppSettings},
    app_dirs::AppDirs,
    config::{Config, FileConfigStore},
    language::Language,
    logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner, Ticker, TrainerEventSource},
};

const TICK_RATE_MS: u64 = 100;

/// minimal typing speed trainer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type randomly generated words against the clock. Every mistyped position is counted once; words per minute are shown when the run ends."
)]
pub struct Cli {
    /// number of words to practice (presets 10, 25 and 50 are one key away)
    #[clap(short = 'w', long = "words", value_parser = clap::value_parser!(u16).range(1..))]
    number_of_words: Option<u16>,

    /// custom prompt to use instead of random words (a single line)
    #[clap(short = 'p', long, value_parser = parse_prompt)]
    prompt: Option<String>,

    /// settings file (defaults to the platform config directory)
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// duration of the fade-in after a restart, in milliseconds
    #[clap(long)]
    fade_in_ms: Option<u64>,

    /// do not capture the mouse (keyboard only)
    #[clap(long)]
    no_mouse: bool,
}

/// Accepts non-blank, single-line prompts
fn parse_prompt(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("prompt must not be empty".to_string());
    }
    if s.contains(['\n', '\r']) {
        return Err("prompt must be a single line".to_string());
    }
    Ok(s.to_string())
}

impl Cli {
    /// Layer command line flags over the settings file
    fn to_settings(&self, config: &Config) -> AppSettings {
        let mut settings = AppSettings::from(config);

        if let Some(n) = self.number_of_words {
            settings.number_of_words = usize::from(n);
        }
        if let Some(ms) = self.fade_in_ms {
            settings.fade_in = Duration::from_millis(ms);
        }
        settings.prompt = self.prompt.clone();
        settings
    }

    fn mouse_enabled(&self, config: &Config) -> bool {
        config.mouse && !self.no_mouse
    }

    fn config_store(&self) -> FileConfigStore {
        match self.config {
            Some(ref path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // a broken log file should never keep anyone from practicing
    if let Err(err) = logging::init(&AppDirs::log_path()) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let store = cli.config_store();
    let config = store.load();
    let settings = cli.to_settings(&config);
    let mouse = cli.mouse_enabled(&config);
    log::debug!("settings from {}: {settings:?}", store.path().display());

    let language = Language::english()?;
    let mut app = App::new(&settings, language);

    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    if mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    if mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(ref err) = result {
        log::error!("exiting on error: {err:#}");
    }
    result
}

fn start_tui<B: Backend, E: TrainerEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> anyhow::Result<()> {
    let mut needs_draw = true;

    while !app.should_quit() {
        if needs_draw {
            let size = terminal.size()?;
            app.set_area(Rect::new(0, 0, size.width, size.height));
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }

        needs_draw = app.handle_event(runner.step(), Instant::now());
    }

    Ok(())
}
