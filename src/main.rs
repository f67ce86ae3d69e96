pub mod ui;

use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use pomo::{
    alert::{Alert, Muted, TerminalBell},
    app_dirs::AppDirs,
    clock::{SessionClock, TickOutcome, Transition},
    config::{Config, ConfigStore, FileConfigStore},
    logging::init_file_logging,
    runtime::{CrosstermEventSource, PomoEvent, Runner, SecondTimer},
    session::{SettingField, Settings},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    io::{self, stdin, Stdout},
    path::PathBuf,
    time::Duration,
};
use tracing::{info, warn};

/// How long the loop waits for input when no countdown is running
const IDLE_REDRAW_MS: u64 = 1000;
const MAX_EDIT_DIGITS: usize = 4;

/// single-screen pomodoro timer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A single-screen pomodoro timer: focused work sessions alternate with short breaks, and every few work sessions you earn a long break."
)]
pub struct Cli {
    /// minutes per work session (1-120)
    #[clap(short = 'w', long = "work")]
    work_minutes: Option<String>,

    /// minutes per short break (1-60)
    #[clap(short = 's', long = "short-break")]
    short_break_minutes: Option<String>,

    /// minutes per long break (1-90)
    #[clap(short = 'l', long = "long-break")]
    long_break_minutes: Option<String>,

    /// completed work sessions between long breaks (2-10)
    #[clap(short = 'e', long = "long-break-every")]
    long_break_every: Option<String>,

    /// do not ring the terminal bell when a session ends
    #[clap(short = 'm', long)]
    mute: bool,

    /// start the first work session right away
    #[clap(long)]
    autostart: bool,

    /// settings file to read and update (defaults to the user config dir)
    #[clap(long)]
    config: Option<PathBuf>,

    /// where to write the diagnostic log
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Stored settings overridden by any values given on the command line.
    /// Values are coerced into range rather than rejected.
    fn resolve_settings(&self, stored: &Config) -> Settings {
        let mut settings = stored.to_settings();
        let overrides = [
            (SettingField::WorkMinutes, &self.work_minutes),
            (SettingField::ShortBreakMinutes, &self.short_break_minutes),
            (SettingField::LongBreakMinutes, &self.long_break_minutes),
            (SettingField::LongBreakEvery, &self.long_break_every),
        ];
        for (field, raw) in overrides {
            if let Some(raw) = raw {
                settings.set(field, field.parse_input(raw));
            }
        }
        settings
    }
}

pub struct App {
    pub clock: SessionClock<SecondTimer, Box<dyn Alert>>,
    pub selected: SettingField,
    pub edit_buffer: Option<String>,
    pub notice: Option<String>,
    store: Option<FileConfigStore>,
}

impl App {
    pub fn new(settings: Settings, alert: Box<dyn Alert>, store: Option<FileConfigStore>) -> Self {
        Self {
            clock: SessionClock::new(settings, SecondTimer::new(), alert),
            selected: SettingField::WorkMinutes,
            edit_buffer: None,
            notice: None,
            store,
        }
    }

    pub fn on_tick(&mut self) {
        if let TickOutcome::Finished(transition) = self.clock.tick() {
            self.announce(transition);
        }
    }

    /// Handles one key press. Returns true when the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        if self.edit_buffer.is_some() {
            self.on_edit_key(key);
            return false;
        }

        self.notice = None;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char(' ') => {
                if let Some(transition) = self.clock.toggle() {
                    self.announce(transition);
                }
            }
            KeyCode::Char('r') => self.clock.reset(),
            KeyCode::Char('s') | KeyCode::Char('n') => {
                let transition = self.clock.skip();
                self.announce(transition);
            }
            KeyCode::Tab | KeyCode::Down => self.selected = self.selected.next(),
            KeyCode::BackTab | KeyCode::Up => self.selected = self.selected.prev(),
            KeyCode::Left | KeyCode::Char('-') => self.adjust_selected(-1),
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_selected(1),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.clock.is_running() {
                    self.notice = Some("stop the timer to change settings".to_string());
                } else {
                    self.edit_buffer = Some(c.to_string());
                }
            }
            _ => {}
        }
        false
    }

    fn on_edit_key(&mut self, key: KeyEvent) {
        let Some(input) = self.edit_buffer.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if input.len() < MAX_EDIT_DIGITS {
                    input.push(c);
                }
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Enter => {
                let value = self.selected.parse_input(input);
                self.edit_buffer = None;
                self.commit_setting(self.selected, value);
            }
            KeyCode::Esc => self.edit_buffer = None,
            _ => {}
        }
    }

    fn adjust_selected(&mut self, delta: i64) {
        let current = self.clock.settings().get(self.selected) as i64;
        let value = (current + delta).max(0) as u32;
        self.commit_setting(self.selected, self.selected.clamp(value));
    }

    fn commit_setting(&mut self, field: SettingField, value: u32) {
        if let Err(e) = self.clock.reconfigure(field, value) {
            self.notice = Some(e.to_string());
            return;
        }
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&Config::from(self.clock.settings())) {
                warn!(error = %e, "could not save settings");
            }
        }
    }

    fn announce(&mut self, transition: Transition) {
        let verb = if transition.alerted {
            "finished"
        } else {
            "skipped"
        };
        self.notice = Some(format!(
            "{} {}. Up next: {}",
            transition.from, verb, transition.to
        ));
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // logging is best effort; the timer works without it
    if let Some(path) = cli.log_file.clone().or_else(AppDirs::log_path) {
        let _ = init_file_logging(&path);
    }

    let store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let settings = cli.resolve_settings(&store.load());
    info!(?settings, config = %store.path().display(), "starting");

    let alert: Box<dyn Alert> = if cli.mute {
        Box::new(Muted)
    } else {
        Box::new(TerminalBell)
    };
    let mut app = App::new(settings, alert, Some(store));
    if cli.autostart {
        app.clock.start();
    }

    enable_raw_mode().context("failed to enable raw mode")?;

    let mut terminal = match enter_tui_screen() {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = first_error([
                execute!(io::stdout(), LeaveAlternateScreen),
                disable_raw_mode(),
            ]);
            return Err(e);
        }
    };

    let result = start_tui(&mut terminal, &mut app);
    let restored = restore_terminal(&mut terminal).context("failed to restore terminal");

    info!(
        completed = app.clock.completed_work_sessions(),
        "shutting down"
    );
    result.and(restored)
}

fn enter_tui_screen() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("failed to create terminal")
}

/// Every step runs even when an earlier one fails
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let cursor = terminal.show_cursor();
    first_error([raw, screen, cursor])
}

fn first_error<const N: usize>(results: [io::Result<()>; N]) -> io::Result<()> {
    results
        .into_iter()
        .find(|r| r.is_err())
        .unwrap_or(Ok(()))
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(IDLE_REDRAW_MS),
    );

    loop {
        terminal.draw(|f| ui(app, f))?;

        match runner.step(app.clock.timer().deadline()) {
            PomoEvent::Tick => app.on_tick(),
            PomoEvent::Key(key) => {
                if app.on_key(key) {
                    break;
                }
            }
            PomoEvent::Resize | PomoEvent::Idle => {}
            PomoEvent::Closed => break,
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
