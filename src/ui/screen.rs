use ratatui::{buffer::Buffer, layout::Rect};

use crate::{
    app::{App, AppState},
    ui::{render_finish, render_game, render_home},
};

/// A UI Screen boundary: renders one application state
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Difficulty selection
pub struct HomeScreen;

impl Screen for HomeScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_home(app, area, buf);
    }
}

/// Live typing with stats, word list and input field
pub struct GameScreen;

impl Screen for GameScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_game(app, area, buf);
    }
}

/// Final results, or a placeholder until they exist
pub struct FinishScreen;

impl Screen for FinishScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_finish(app, area, buf);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Home => Box::new(HomeScreen),
        AppState::Game => Box::new(GameScreen),
        AppState::Finish => Box::new(FinishScreen),
    }
}
