use super::{Key, Rect, ViewError};

/// A named rectangular text view.
///
/// Coordinates follow the usual terminal-view convention: `cursor` is relative to the visible
/// area, `origin` is the buffer position shown at the top-left corner. The buffer position under
/// the cursor is therefore `origin + cursor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    name: String,
    rect: Rect,
    title: String,
    lines: Vec<String>,
    cursor: (usize, usize),
    origin: (usize, usize),
    editable: bool,
    highlight: bool,
}

impl View {
    pub fn new(name: impl Into<String>, rect: Rect) -> Self {
        Self {
            name: name.into(),
            rect,
            title: String::new(),
            lines: Vec::new(),
            cursor: (0, 0),
            origin: (0, 0),
            editable: false,
            highlight: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    /// Width and height of the area inside the frame.
    pub fn inner_size(&self) -> (usize, usize) {
        self.rect.inner_size()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlight
    }

    pub fn set_highlight(&mut self, highlight: bool) {
        self.highlight = highlight;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The whole buffer, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split_terminator('\n').map(str::to_string).collect();
    }

    /// Empties the buffer. Cursor and origin are left where they are.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The buffer line shown at visible row `y`.
    pub fn line(&self, y: usize) -> Option<&str> {
        self.lines.get(self.origin.1 + y).map(String::as_str)
    }

    /// Text of the row under the cursor, empty when there is none.
    pub fn current_row_text(&self) -> &str {
        self.line(self.cursor.1).unwrap_or("")
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// Moves the cursor inside the visible area. Positions outside of it are rejected.
    pub fn set_cursor(&mut self, x: usize, y: usize) -> Result<(), ViewError> {
        let (w, h) = self.inner_size();
        if x >= w || y >= h {
            return Err(ViewError::OutOfBounds {
                view: self.name.clone(),
                x,
                y,
            });
        }
        self.cursor = (x, y);
        Ok(())
    }

    pub fn origin(&self) -> (usize, usize) {
        self.origin
    }

    pub fn set_origin(&mut self, x: usize, y: usize) {
        self.origin = (x, y);
    }

    /// Cursor position within the buffer.
    pub fn buffer_position(&self) -> (usize, usize) {
        (self.origin.0 + self.cursor.0, self.origin.1 + self.cursor.1)
    }

    /// Puts the cursor on a buffer position, scrolling the origin just enough to show it.
    pub fn place(&mut self, bx: usize, by: usize) {
        let (w, h) = self.inner_size();
        let (w, h) = (w.max(1), h.max(1));
        let (mut ox, mut oy) = self.origin;
        if bx < ox {
            ox = bx;
        } else if bx >= ox + w {
            ox = bx + 1 - w;
        }
        if by < oy {
            oy = by;
        } else if by >= oy + h {
            oy = by + 1 - h;
        }
        self.origin = (ox, oy);
        self.cursor = (bx - ox, by - oy);
    }

    pub fn move_to_line_start(&mut self) {
        let (_, by) = self.buffer_position();
        self.place(0, by);
    }

    pub fn move_to_line_end(&mut self) {
        let (_, by) = self.buffer_position();
        self.place(self.line_len(by), by);
    }

    /// Applies an editing key to the buffer. Returns `false` for keys that do not edit.
    pub fn edit(&mut self, key: Key) -> bool {
        let (bx, by) = self.buffer_position();
        match key {
            Key::Char(c) => self.insert_char(bx, by, c),
            Key::Enter => self.insert_newline(bx, by),
            Key::Backspace => self.backspace(bx, by),
            Key::Delete => self.delete(bx, by),
            Key::Left => {
                let bx = bx.min(self.line_len(by));
                if bx > 0 {
                    self.place(bx - 1, by);
                } else if by > 0 {
                    self.place(self.line_len(by - 1), by - 1);
                }
            }
            Key::Right => {
                if bx < self.line_len(by) {
                    self.place(bx + 1, by);
                } else if by + 1 < self.lines.len() {
                    self.place(0, by + 1);
                }
            }
            Key::Up => {
                if by > 0 {
                    self.place(bx.min(self.line_len(by - 1)), by - 1);
                }
            }
            Key::Down => {
                if by + 1 < self.lines.len() {
                    self.place(bx.min(self.line_len(by + 1)), by + 1);
                }
            }
            Key::Home => self.place(0, by),
            Key::End => self.place(self.line_len(by), by),
            _ => return false,
        }
        true
    }

    fn line_len(&self, by: usize) -> usize {
        self.lines.get(by).map_or(0, |l| l.chars().count())
    }

    fn ensure_line(&mut self, by: usize) {
        while self.lines.len() <= by {
            self.lines.push(String::new());
        }
    }

    fn insert_char(&mut self, bx: usize, by: usize, c: char) {
        self.ensure_line(by);
        let bx = bx.min(self.line_len(by));
        let line = &mut self.lines[by];
        let at = byte_offset(line, bx);
        line.insert(at, c);
        self.place(bx + 1, by);
    }

    fn insert_newline(&mut self, bx: usize, by: usize) {
        self.ensure_line(by);
        let bx = bx.min(self.line_len(by));
        let line = &mut self.lines[by];
        let at = byte_offset(line, bx);
        let rest = line.split_off(at);
        self.lines.insert(by + 1, rest);
        self.place(0, by + 1);
    }

    fn backspace(&mut self, bx: usize, by: usize) {
        if by >= self.lines.len() {
            if by > 0 {
                self.place(self.line_len(by - 1), by - 1);
            }
            return;
        }
        let bx = bx.min(self.line_len(by));
        if bx > 0 {
            let line = &mut self.lines[by];
            let at = byte_offset(line, bx - 1);
            line.remove(at);
            self.place(bx - 1, by);
        } else if by > 0 {
            let current = self.lines.remove(by);
            let joined_at = self.line_len(by - 1);
            self.lines[by - 1].push_str(&current);
            self.place(joined_at, by - 1);
        }
    }

    fn delete(&mut self, bx: usize, by: usize) {
        if by >= self.lines.len() {
            return;
        }
        if bx < self.line_len(by) {
            let line = &mut self.lines[by];
            let at = byte_offset(line, bx);
            line.remove(at);
        } else if by + 1 < self.lines.len() {
            let next = self.lines.remove(by + 1);
            self.lines[by].push_str(&next);
        }
    }
}

fn byte_offset(line: &str, chars: usize) -> usize {
    line.char_indices()
        .nth(chars)
        .map_or(line.len(), |(i, _)| i)
}
