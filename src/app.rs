use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::session::{InputOutcome, Session, SessionResult};
use crate::words::{Corpus, Difficulty, WordGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Home,
    Game,
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

/// Screen navigation around a single active session
#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub state: AppState,
    pub selected: Difficulty,
    pub session: Session,
    pub last_result: Option<SessionResult>,
    generator: WordGenerator,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let corpus = Corpus::load(&config.corpus)?;
        let generator = WordGenerator::new(corpus, config.punctuation);
        Self::with_generator(config, generator)
    }

    pub fn with_generator(config: Config, generator: WordGenerator) -> Result<Self> {
        config.validate()?;
        let session = Session::prepare(&generator, config.word_target(), config.countdown_secs)?;

        Ok(Self {
            selected: config.difficulty,
            config,
            state: AppState::Home,
            session,
            last_result: None,
            generator,
        })
    }

    /// Prepare a fresh session of `word_target` words and switch to the game.
    pub fn start_game(&mut self, word_target: usize) -> Result<()> {
        self.session.reset(&self.generator, word_target)?;
        self.last_result = None;
        self.state = AppState::Game;
        info!(word_target, "game screen opened");
        Ok(())
    }

    /// Start a preset chosen on the home screen. Clears any custom word count.
    pub fn start_difficulty(&mut self, difficulty: Difficulty) -> Result<()> {
        self.selected = difficulty;
        self.config.difficulty = difficulty;
        self.config.custom_words = None;
        self.start_game(difficulty.word_target())
    }

    pub fn retry(&mut self) -> Result<()> {
        self.start_game(self.session.word_target())
    }

    pub fn go_home(&mut self) {
        self.session.abandon();
        self.state = AppState::Home;
    }

    pub fn on_tick(&mut self, now: Instant) {
        if self.state != AppState::Game {
            return;
        }
        if let Some(result) = self.session.tick_at(now) {
            self.show_result(result);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Result<AppAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.session.abandon();
            return Ok(AppAction::Quit);
        }

        match self.state {
            AppState::Home => self.handle_home_key(key),
            AppState::Game => {
                self.handle_game_key(key, now);
                Ok(AppAction::Continue)
            }
            AppState::Finish => self.handle_finish_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) -> Result<AppAction> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(AppAction::Quit),
            KeyCode::Char('1') => self.start_difficulty(Difficulty::Easy)?,
            KeyCode::Char('2') => self.start_difficulty(Difficulty::Normal)?,
            KeyCode::Char('3') => self.start_difficulty(Difficulty::Hard)?,
            KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => {
                self.selected = self.selected.previous();
            }
            KeyCode::Down | KeyCode::Right | KeyCode::Char('j') | KeyCode::Tab => {
                self.selected = self.selected.next();
            }
            KeyCode::Enter => self.start_difficulty(self.selected)?,
            _ => {}
        }
        Ok(AppAction::Continue)
    }

    fn handle_game_key(&mut self, key: KeyEvent, now: Instant) {
        let mut raw = self.session.progress().partial_input.clone();
        match key.code {
            KeyCode::Esc => {
                self.go_home();
                return;
            }
            KeyCode::Char(c) if is_plain(key.modifiers) => raw.push(c),
            KeyCode::Enter => raw.push('\n'),
            KeyCode::Backspace => {
                if raw.pop().is_none() {
                    return;
                }
            }
            _ => return,
        }

        match self.session.on_input_change_at(&raw, now) {
            InputOutcome::Finished(result) => self.show_result(result),
            InputOutcome::Committed { correct } => debug!(correct, "word committed from key"),
            InputOutcome::Pending | InputOutcome::Ignored => {}
        }
    }

    fn handle_finish_key(&mut self, key: KeyEvent) -> Result<AppAction> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(AppAction::Quit),
            KeyCode::Char('r') | KeyCode::Enter => self.retry()?,
            KeyCode::Char('h') => self.go_home(),
            _ => {}
        }
        Ok(AppAction::Continue)
    }

    fn show_result(&mut self, result: SessionResult) {
        self.last_result = Some(result);
        self.state = AppState::Finish;
    }
}

/// Unmodified or shifted keys are text. Anything with Ctrl, Alt or Super is not.
fn is_plain(modifiers: KeyModifiers) -> bool {
    modifiers.difference(KeyModifiers::SHIFT).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{FinishReason, SessionStatus};
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn cat_app(config: Config) -> App {
        let corpus = Corpus::new("cats", vec!["cat".to_string()]).unwrap();
        App::with_generator(config, WordGenerator::new(corpus, false)).unwrap()
    }

    fn type_str(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)), now).unwrap();
        }
    }

    #[test]
    fn test_app_starts_on_home() {
        let app = App::new(Config::default()).unwrap();
        assert_eq!(app.state, AppState::Home);
        assert_eq!(app.selected, Difficulty::Easy);
        assert_eq!(app.session.word_target(), 10);
        assert!(app.last_result.is_none());
    }

    #[test]
    fn test_app_rejects_invalid_config() {
        let config = Config {
            countdown_secs: 0,
            ..Config::default()
        };
        assert!(App::new(config).is_err());

        let config = Config {
            corpus: "missing".to_string(),
            ..Config::default()
        };
        assert!(App::new(config).is_err());
    }

    #[test]
    fn test_home_number_keys_pick_difficulty() {
        let mut app = cat_app(Config::default());
        let now = Instant::now();

        app.handle_key(key(KeyCode::Char('2')), now).unwrap();
        assert_eq!(app.state, AppState::Game);
        assert_eq!(app.session.word_target(), 25);
        assert_eq!(app.config.difficulty, Difficulty::Normal);
    }

    #[test]
    fn test_home_arrow_selection_then_enter() {
        let mut app = cat_app(Config::default());
        let now = Instant::now();

        app.handle_key(key(KeyCode::Down), now).unwrap();
        app.handle_key(key(KeyCode::Down), now).unwrap();
        assert_eq!(app.selected, Difficulty::Hard);
        app.handle_key(key(KeyCode::Up), now).unwrap();
        assert_eq!(app.selected, Difficulty::Normal);

        app.handle_key(key(KeyCode::Enter), now).unwrap();
        assert_eq!(app.state, AppState::Game);
        assert_eq!(app.session.word_target(), 25);
    }

    #[test]
    fn test_home_quit() {
        let mut app = cat_app(Config::default());
        let action = app.handle_key(key(KeyCode::Char('q')), Instant::now()).unwrap();
        assert_eq!(action, AppAction::Quit);
    }

    #[test]
    fn test_ctrl_c_quits_from_game() {
        let mut app = cat_app(Config::default());
        let now = Instant::now();
        app.start_game(3).unwrap();
        type_str(&mut app, "c", now);

        let action = app
            .handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), now)
            .unwrap();
        assert_eq!(action, AppAction::Quit);
        assert!(!app.session.countdown().is_running());
    }

    #[test]
    fn test_typing_full_game_reaches_finish() {
        let mut app = cat_app(Config {
            countdown_secs: 90,
            ..Config::default()
        });
        let t0 = Instant::now();
        app.start_game(2).unwrap();

        type_str(&mut app, "cat ", t0);
        assert_eq!(app.state, AppState::Game);
        type_str(&mut app, "cat", t0);
        app.handle_key(key(KeyCode::Enter), t0 + Duration::from_secs(60))
            .unwrap();

        assert_eq!(app.state, AppState::Finish);
        let result = app.last_result.as_ref().unwrap();
        assert_eq!(result.correct_words, 2);
        assert_eq!(result.accuracy, 100.0);
        assert!((result.wpm - 1.6).abs() < 1e-9);
        assert_eq!(result.reason, FinishReason::Completed);
    }

    #[test]
    fn test_backspace_edits_partial_input() {
        let mut app = cat_app(Config::default());
        let now = Instant::now();
        app.start_game(1).unwrap();

        type_str(&mut app, "cx", now);
        app.handle_key(key(KeyCode::Backspace), now).unwrap();
        type_str(&mut app, "at", now);
        assert_eq!(app.session.progress().partial_input, "cat");

        type_str(&mut app, " ", now);
        assert_eq!(app.last_result.as_ref().map(|r| r.correct_words), Some(1));
    }

    #[test]
    fn test_backspace_on_empty_input_does_not_start() {
        let mut app = cat_app(Config::default());
        app.start_game(1).unwrap();
        app.handle_key(key(KeyCode::Backspace), Instant::now()).unwrap();
        assert_eq!(app.session.status(), SessionStatus::NotStarted);
    }

    #[test]
    fn test_timer_expiry_moves_to_finish() {
        let mut app = cat_app(Config {
            countdown_secs: 5,
            ..Config::default()
        });
        let t0 = Instant::now();
        app.start_game(10).unwrap();
        type_str(&mut app, "cat ca", t0);

        app.on_tick(t0 + Duration::from_secs(4));
        assert_eq!(app.state, AppState::Game);
        app.on_tick(t0 + Duration::from_secs(5));
        assert_eq!(app.state, AppState::Finish);
        assert_eq!(
            app.last_result.as_ref().map(|r| r.reason),
            Some(FinishReason::TimeUp)
        );
    }

    #[test]
    fn test_escape_from_game_abandons_session() {
        let mut app = cat_app(Config::default());
        let t0 = Instant::now();
        app.start_game(5).unwrap();
        type_str(&mut app, "ca", t0);

        app.handle_key(key(KeyCode::Esc), t0).unwrap();
        assert_eq!(app.state, AppState::Home);
        assert!(!app.session.countdown().is_running());

        // A stale tick after navigating away must not finish anything
        app.on_tick(t0 + Duration::from_secs(600));
        assert_eq!(app.state, AppState::Home);
        assert!(app.last_result.is_none());
    }

    #[test]
    fn test_retry_keeps_word_target_and_clears_counters() {
        let mut app = cat_app(Config::default());
        let now = Instant::now();
        app.start_game(1).unwrap();
        type_str(&mut app, "cat ", now);
        assert_eq!(app.state, AppState::Finish);

        app.handle_key(key(KeyCode::Char('r')), now).unwrap();
        assert_eq!(app.state, AppState::Game);
        assert_eq!(app.session.word_target(), 1);
        assert_eq!(app.session.progress().total_typed_chars, 0);
        assert!(app.last_result.is_none());
    }

    #[test]
    fn test_finish_home_and_quit() {
        let mut app = cat_app(Config::default());
        let now = Instant::now();
        app.start_game(1).unwrap();
        type_str(&mut app, "cat ", now);

        app.handle_key(key(KeyCode::Char('h')), now).unwrap();
        assert_eq!(app.state, AppState::Home);

        app.start_game(1).unwrap();
        type_str(&mut app, "cat ", now);
        let action = app.handle_key(key(KeyCode::Esc), now).unwrap();
        assert_eq!(action, AppAction::Quit);
    }

    #[test]
    fn test_custom_word_count_is_used_for_initial_session() {
        let app = cat_app(Config {
            custom_words: Some(7),
            ..Config::default()
        });
        assert_eq!(app.session.word_target(), 7);
    }

    #[test]
    fn test_difficulty_selection_clears_custom_count() {
        let mut app = cat_app(Config {
            custom_words: Some(7),
            ..Config::default()
        });
        app.handle_key(key(KeyCode::Char('3')), Instant::now())
            .unwrap();
        assert_eq!(app.config.custom_words, None);
        assert_eq!(app.config.difficulty, Difficulty::Hard);
        assert_eq!(app.session.word_target(), 50);
    }

    #[test]
    fn test_late_keystroke_without_tick_ends_on_time() {
        let mut app = cat_app(Config::default());
        let t0 = Instant::now();
        app.start_game(2).unwrap();

        type_str(&mut app, "cat ", t0);
        type_str(&mut app, "cat ", t0 + Duration::from_secs(120));

        assert_eq!(app.state, AppState::Finish);
        let result = app.last_result.as_ref().unwrap();
        assert_eq!(result.reason, FinishReason::TimeUp);
        assert_eq!(result.correct_words, 1);
        assert!((result.elapsed_secs - 60.0).abs() < 1e-9);
        assert_eq!(app.session.remaining_secs(), 0);
    }

    #[test]
    fn test_modified_chars_are_not_typed() {
        let mut app = cat_app(Config::default());
        let now = Instant::now();
        app.start_game(1).unwrap();

        app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT), now)
            .unwrap();
        app.handle_key(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL), now)
            .unwrap();
        assert_eq!(app.session.progress().partial_input, "");
        assert_eq!(app.session.status(), SessionStatus::NotStarted);

        app.handle_key(KeyEvent::new(KeyCode::Char('C'), KeyModifiers::SHIFT), now)
            .unwrap();
        type_str(&mut app, "at", now);
        assert_eq!(app.session.progress().partial_input, "Cat");
    }
}
