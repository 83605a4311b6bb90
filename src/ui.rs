pub mod screen;

use self::screen::Screen;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    session::{CharMark, FinishReason, SessionResult},
    words::Difficulty,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const MAX_CONTENT_WIDTH: u16 = 72;

const ACCENT: Color = Color::Green;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(&self.state).render(self, area, buf);
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn accent_bold() -> Style {
    bold().fg(ACCENT)
}

fn hint_style() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC)
}

/// Center a column of at most `MAX_CONTENT_WIDTH` inside `area`.
fn content_column(area: Rect) -> Rect {
    let width = area
        .width
        .saturating_sub(HORIZONTAL_MARGIN * 2)
        .min(MAX_CONTENT_WIDTH);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    Rect::new(x, area.y + VERTICAL_MARGIN, width, area.height.saturating_sub(VERTICAL_MARGIN * 2))
}

fn title(text: &'static str, subtitle: &'static str) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(Span::styled(text, accent_bold())),
        Line::from(Span::styled(subtitle, Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center)
}

pub(crate) fn render_home(app: &App, area: Rect, buf: &mut Buffer) {
    let column = content_column(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(Difficulty::ALL.len() as u16),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(column);

    title("TYPE MASTER", "Improve your typing speed and accuracy").render(chunks[0], buf);

    Paragraph::new(Span::styled("Select a difficulty:", bold()))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let options: Vec<Line> = Difficulty::ALL
        .iter()
        .enumerate()
        .map(|(idx, difficulty)| {
            let label = format!(
                "{} {}  ({} words)",
                idx + 1,
                difficulty,
                difficulty.word_target()
            );
            if *difficulty == app.selected {
                Line::from(Span::styled(format!("> {label} <"), accent_bold()))
            } else {
                Line::from(Span::raw(label))
            }
        })
        .collect();
    Paragraph::new(options)
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        "(1/2/3) pick  (↑/↓) select  (enter) start  (q)uit",
        hint_style(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);
}

fn stat_box<'a>(label: &'a str, value: String) -> Paragraph<'a> {
    Paragraph::new(Span::styled(value, bold()))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT))
                .title(Span::styled(label, accent_bold())),
        )
}

/// Spans for the target words: done words dimmed, current word coloured per character.
fn word_spans(app: &App) -> Vec<Span<'static>> {
    let session = &app.session;
    let current = session.progress().current_word_index;
    let correct_style = Style::default().fg(Color::Green);
    let incorrect_style = Style::default().fg(Color::Red);
    let done_style = Style::default().fg(Color::DarkGray);

    let mut spans = Vec::new();
    for (idx, word) in session.words().iter().enumerate() {
        if idx == current {
            for (c, mark) in session.char_marks() {
                let style = match mark {
                    CharMark::Pending => Style::default().add_modifier(Modifier::UNDERLINED),
                    CharMark::Correct => correct_style,
                    CharMark::Incorrect => incorrect_style,
                    CharMark::Extra => incorrect_style.add_modifier(Modifier::CROSSED_OUT),
                };
                spans.push(Span::styled(c.to_string(), style));
            }
        } else if idx < current {
            spans.push(Span::styled(word.clone(), done_style));
        } else {
            spans.push(Span::raw(word.clone()));
        }
        spans.push(Span::raw(" "));
    }
    spans
}

pub(crate) fn render_game(app: &App, area: Rect, buf: &mut Buffer) {
    let column = content_column(area);
    let words_width: usize = app
        .session
        .words()
        .iter()
        .map(|w| w.width() + 1)
        .sum();
    let inner_width = column.width.saturating_sub(2).max(1) as usize;
    let words_lines = (words_width.div_ceil(inner_width) as u16).max(1) + 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(words_lines),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(column);

    title("TYPE MASTER", "Test your typing speed!").render(chunks[0], buf);

    let live = app.session.live();
    let stats = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[1]);
    stat_box("WPM", format!("{:.0}", live.wpm)).render(stats[0], buf);
    stat_box("Time", format!("{}s", live.remaining_secs)).render(stats[1], buf);
    stat_box("Accuracy", format!("{:.1}%", live.accuracy)).render(stats[2], buf);

    Paragraph::new(Line::from(word_spans(app)))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL))
        .render(chunks[2], buf);

    let partial = &app.session.progress().partial_input;
    let input_line = if partial.is_empty() && !app.session.has_started() {
        Line::from(Span::styled("Type the words", hint_style()))
    } else {
        Line::from(vec![
            Span::raw(partial.clone()),
            Span::styled("█", Style::default().fg(ACCENT)),
        ])
    };
    Paragraph::new(input_line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT)),
        )
        .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "(space/enter) next word  (backspace) fix  (esc) home",
        hint_style(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);
}

fn result_lines(result: &SessionResult) -> Vec<Line<'static>> {
    let headline = match result.reason {
        FinishReason::Completed => "All words typed!",
        FinishReason::TimeUp => "Time's up!",
        FinishReason::Stopped => "Session stopped",
    };
    let row = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:>10}: "), accent_bold()),
            Span::styled(value, bold()),
        ])
    };

    vec![
        Line::from(Span::styled(headline, bold())),
        Line::from(""),
        row("WPM", format!("{:.0}", result.wpm)),
        row("Accuracy", format!("{:.1}%", result.accuracy)),
        row("Score", result.score.to_string()),
        row(
            "Words",
            format!(
                "{} correct / {} missed of {}",
                result.correct_words, result.incorrect_words, result.word_target
            ),
        ),
        row("Time", format!("{:.1}s", result.elapsed_secs)),
    ]
}

pub(crate) fn render_finish(app: &App, area: Rect, buf: &mut Buffer) {
    let column = content_column(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(9),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(column);

    title("TYPE MASTER", "Results").render(chunks[0], buf);

    let body = match &app.last_result {
        Some(result) => result_lines(result),
        None => vec![Line::from(Span::styled("Loading results...", hint_style()))],
    };
    Paragraph::new(body)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
        .render(chunks[1], buf);

    Paragraph::new(Span::styled("(r)etry  (h)ome  (q)uit", hint_style()))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
}
