//! Terminal driver: draws a [`ViewSet`] with ratatui and turns crossterm events into [`Input`].
//!
//! [`Terminal::enter`] switches to raw mode and the alternate screen. Both are undone when the
//! `Terminal` is dropped, and by a panic hook, so a crash never leaves the shell unusable.

use crate::backend::{Key, View, ViewBackend, ViewSet};
use crate::error::{DiaryError, Result};
use crossterm::cursor::Show;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::debug;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Position, Rect as Area};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, List, ListState, Paragraph};
use ratatui::Frame;
use std::io::{self, Stdout};
use unicode_width::UnicodeWidthStr;

/// What the event loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Key(Key),
    Resize(usize, usize),
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
    }
}

pub struct Terminal {
    inner: ratatui::Terminal<CrosstermBackend<Stdout>>,
    _guard: TerminalGuard,
}

impl Terminal {
    pub fn enter() -> Result<Self> {
        enable_raw_mode()
            .map_err(|err| DiaryError::Terminal(format!("enabling raw mode: {}", err)))?;
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen)
            .map_err(|err| DiaryError::Terminal(format!("entering alternate screen: {}", err)))?;

        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
            hook(panic_info);
        }));

        let inner = ratatui::Terminal::new(CrosstermBackend::new(io::stdout()))
            .map_err(|err| DiaryError::Terminal(format!("creating terminal: {}", err)))?;
        debug!("terminal entered");
        Ok(Self {
            inner,
            _guard: guard,
        })
    }

    /// Screen size in cells, as `(width, height)`.
    pub fn size() -> Result<(usize, usize)> {
        let (w, h) = terminal::size()?;
        Ok((usize::from(w), usize::from(h)))
    }

    /// Blocks until a key the views understand is pressed or the screen is resized.
    pub fn next_input(&mut self) -> Result<Input> {
        loop {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(key) = translate_key(key) {
                        return Ok(Input::Key(key));
                    }
                }
                Event::Resize(w, h) => return Ok(Input::Resize(usize::from(w), usize::from(h))),
                _ => {}
            }
        }
    }

    pub fn draw(&mut self, views: &ViewSet) -> Result<()> {
        self.inner.draw(|frame| render(frame, views))?;
        Ok(())
    }
}

/// Draws every view, later views on top, then places the cursor in the focused view when it
/// is editable. Menus (highlighted views) mark the row under the cursor.
fn render(frame: &mut Frame, views: &ViewSet) {
    let screen = frame.area();
    let focused = views.current_view();

    for view in views.views() {
        let area = area_of(view).intersection(screen);
        if area.is_empty() {
            continue;
        }
        let mut block = Block::bordered().title(view.title());
        if focused == Some(view.name()) {
            block = block.border_style(Style::default().fg(Color::Green));
        }

        frame.render_widget(Clear, area);
        if view.is_highlighted() {
            render_menu(frame, view, block, area);
        } else {
            let (ox, oy) = view.origin();
            let lines: Vec<Line> = view.lines().iter().map(|l| Line::raw(l.as_str())).collect();
            let text = Paragraph::new(lines)
                .block(block)
                .scroll((cell(oy), cell(ox)));
            frame.render_widget(text, area);
        }
    }

    if let Some(view) = focused.and_then(|name| views.view(name).ok()) {
        if view.is_editable() {
            frame.set_cursor_position(cursor_position(view));
        }
    }
}

fn render_menu(frame: &mut Frame, view: &View, block: Block, area: Area) {
    let (_, oy) = view.origin();
    let (_, row) = view.buffer_position();
    let mut state = ListState::default()
        .with_offset(oy)
        .with_selected((row < view.lines().len()).then_some(row));
    let list = List::new(view.lines().iter().map(String::as_str))
        .block(block)
        .highlight_style(Style::default().bg(Color::Green).fg(Color::Black));
    frame.render_stateful_widget(list, area, &mut state);
}

/// The screen cells covered by a view, frame included.
fn area_of(view: &View) -> Area {
    let rect = view.rect();
    Area::new(
        cell(rect.x0),
        cell(rect.y0),
        cell(rect.x1.saturating_sub(rect.x0) + 1),
        cell(rect.y1.saturating_sub(rect.y0) + 1),
    )
}

/// Screen cell of the text cursor. Wide chars before it count twice; past the end of the line
/// every position is one column.
fn cursor_position(view: &View) -> Position {
    let rect = view.rect();
    let (ox, _) = view.origin();
    let (cx, cy) = view.cursor();
    let before: String = view
        .line(cy)
        .unwrap_or("")
        .chars()
        .skip(ox)
        .take(cx)
        .collect();
    let past_end = cx - before.chars().count();
    Position::new(
        cell(rect.x0 + 1 + before.width() + past_end),
        cell(rect.y0 + 1 + cy),
    )
}

fn cell(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

/// Maps a crossterm key event to a [`Key`]. Key releases and keys no view uses map to nothing.
pub fn translate_key(event: KeyEvent) -> Option<Key> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let key = match event.code {
        KeyCode::Char(c) if ctrl && c.is_ascii_alphabetic() => Key::Ctrl(c.to_ascii_lowercase()),
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
        translate_key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn control_letters_are_lowercase() {
        assert_eq!(
            press(KeyCode::Char('s'), KeyModifiers::CONTROL),
            Some(Key::Ctrl('s'))
        );
        assert_eq!(
            press(
                KeyCode::Char('S'),
                KeyModifiers::CONTROL | KeyModifiers::SHIFT
            ),
            Some(Key::Ctrl('s'))
        );
        assert_eq!(press(KeyCode::Char('1'), KeyModifiers::CONTROL), None);
    }

    #[test]
    fn plain_and_shifted_chars_are_text() {
        assert_eq!(
            press(KeyCode::Char('a'), KeyModifiers::NONE),
            Some(Key::Char('a'))
        );
        assert_eq!(
            press(KeyCode::Char('A'), KeyModifiers::SHIFT),
            Some(Key::Char('A'))
        );
        assert_eq!(
            press(KeyCode::Char('é'), KeyModifiers::NONE),
            Some(Key::Char('é'))
        );
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(press(KeyCode::Enter, KeyModifiers::NONE), Some(Key::Enter));
        assert_eq!(press(KeyCode::Home, KeyModifiers::NONE), Some(Key::Home));
        assert_eq!(press(KeyCode::End, KeyModifiers::NONE), Some(Key::End));
        assert_eq!(press(KeyCode::Up, KeyModifiers::NONE), Some(Key::Up));
        assert_eq!(press(KeyCode::F(5), KeyModifiers::NONE), None);
    }

    #[test]
    fn releases_are_ignored() {
        let mut event = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(translate_key(event), None);
    }

    fn screen() -> ViewSet {
        let mut views = ViewSet::new(40, 12);
        views.set_view("menu", crate::backend::Rect::new(0, 0, 19, 5)).unwrap();
        views.set_view("body", crate::backend::Rect::new(0, 6, 39, 11)).unwrap();

        let menu = views.view_mut("menu").unwrap();
        menu.set_title("Date");
        menu.set_highlight(true);
        menu.set_text("01-01-2024\n02-01-2024");
        menu.set_cursor(0, 1).unwrap();

        let body = views.view_mut("body").unwrap();
        body.set_editable(true);
        body.set_text("日本 text");
        views
    }

    fn draw(views: &ViewSet) -> ratatui::buffer::Buffer {
        let backend = ratatui::backend::TestBackend::new(40, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, views)).unwrap();
        terminal.backend().buffer().clone()
    }

    #[test]
    fn views_are_framed_with_their_title() {
        let mut views = screen();
        views.set_current_view("menu").unwrap();
        let buffer = draw(&views);

        assert_eq!(buffer[(0, 0)].symbol(), "┌");
        assert_eq!(buffer[(19, 5)].symbol(), "┘");
        assert_eq!(buffer[(1, 0)].symbol(), "D");
        assert_eq!(buffer[(0, 0)].fg, Color::Green);
        assert_ne!(buffer[(0, 6)].fg, Color::Green);
    }

    #[test]
    fn menu_highlights_the_whole_cursor_row() {
        let views = screen();
        let buffer = draw(&views);

        assert_eq!(buffer[(1, 1)].symbol(), "0");
        assert_ne!(buffer[(1, 1)].bg, Color::Green);
        assert_eq!(buffer[(1, 2)].bg, Color::Green);
        assert_eq!(buffer[(1, 2)].fg, Color::Black);
        assert_eq!(buffer[(15, 2)].bg, Color::Green);
    }

    #[test]
    fn text_views_scroll_horizontally() {
        let mut views = screen();
        views.view_mut("body").unwrap().set_text("hello");
        views.view_mut("body").unwrap().set_origin(2, 0);
        let buffer = draw(&views);

        assert_eq!(buffer[(1, 7)].symbol(), "l");
    }

    #[test]
    fn cursor_column_follows_display_width() {
        let mut views = screen();
        let body = views.view_mut("body").unwrap();

        body.set_cursor(1, 0).unwrap();
        assert_eq!(cursor_position(body), Position::new(3, 7));

        body.set_cursor(12, 0).unwrap();
        assert_eq!(cursor_position(body), Position::new(15, 7));
    }
}
