use std::{
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{info, warn};

use typemaster::{
    app::{App, AppAction},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging::init_logging,
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    words::Difficulty,
};

/// terminal typing speed test with live wpm, accuracy and score
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type the words shown on screen before the countdown runs out. Live WPM and accuracy are shown while you type, and a score is awarded at the end."
)]
pub struct Cli {
    /// difficulty preset (easy = 10 words, normal = 25, hard = 50)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// custom number of words, overrides the difficulty preset
    #[clap(short = 'w', long = "words")]
    number_of_words: Option<usize>,

    /// length of the countdown in seconds
    #[clap(short = 's', long = "seconds")]
    number_of_secs: Option<u32>,

    /// append a comma to every word (pass `false` to turn off a stored setting)
    #[clap(long, num_args = 0..=1, default_missing_value = "true")]
    punctuation: Option<bool>,

    /// start typing immediately instead of showing the home screen
    #[clap(long)]
    skip_home: bool,

    /// write logs to this file instead of the default state directory
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// read and save settings at this path instead of the default config directory
    #[clap(long = "config")]
    config_file: Option<PathBuf>,
}

impl Cli {
    /// Overlay explicitly passed flags on top of the stored config.
    fn apply_to(&self, config: &mut Config) {
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
            config.custom_words = None;
        }
        if let Some(words) = self.number_of_words {
            config.custom_words = Some(words);
        }
        if let Some(secs) = self.number_of_secs {
            config.countdown_secs = secs;
        }
        if let Some(punctuation) = self.punctuation {
            config.punctuation = punctuation;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let log_path = cli.log_file.clone().unwrap_or_else(AppDirs::log_path);
    init_logging(&log_path);

    let store = cli
        .config_file
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let mut config = store.load();
    cli.apply_to(&mut config);

    let mut app = App::new(config).context("failed to prepare typing session")?;
    if cli.skip_home {
        app.start_game(app.config.word_target())?;
    }
    info!(config = ?app.config, "starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let outcome = run_app(&mut terminal, &mut app, &runner);

    // Restore the terminal before reporting any error from the loop
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    outcome?;

    if let Err(err) = store.save(&app.config) {
        warn!(%err, "could not save settings");
    }

    if let Some(result) = &app.last_result {
        println!(
            "{:.0} wpm / {:.1}% acc / {} points",
            result.wpm, result.accuracy, result.score
        );
    }

    Ok(())
}

fn run_app<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<()> {
    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let event = runner.step();
        if handle_event(app, event, Instant::now())? == AppAction::Quit {
            break;
        }
    }

    Ok(())
}

/// Apply one event, then poll the countdown.
///
/// The runner only yields `Tick` when no input arrives within a tick
/// interval, so steady typing would otherwise starve the countdown.
fn handle_event(app: &mut App, event: AppEvent, now: Instant) -> Result<AppAction> {
    let action = match event {
        AppEvent::Key(key) => app.handle_key(key, now)?,
        AppEvent::Resize | AppEvent::Tick => AppAction::Continue,
    };
    app.on_tick(now);
    Ok(action)
}
