//! # View Backend
//!
//! The navigation controller never talks to a terminal directly. It drives an implementation of
//! [`ViewBackend`], the small set of capabilities it needs from a rendering layer:
//!
//! - create, resize and delete named rectangular views ([`ViewBackend::set_view`])
//! - read and write a view's text, title, cursor and scroll origin ([`View`])
//! - bind keys to [`Command`]s, per view or globally
//! - focus a view and ask which one has focus
//! - query the screen size
//!
//! [`ViewSet`] is the in-memory implementation. The terminal driver in `term` draws a
//! `ViewSet` and feeds it keys; tests drive a `ViewSet` directly.

use thiserror::Error;

mod keys;
mod view;
mod viewset;

pub use keys::{Command, DialogCommand, Key};
pub use view::View;
pub use viewset::ViewSet;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("unknown view: {0}")]
    UnknownView(String),

    #[error("position ({x}, {y}) is outside view {view}")]
    OutOfBounds { view: String, x: usize, y: usize },

    #[error("invalid dimensions for view {0}")]
    InvalidDimensions(String),
}

/// Outcome of [`ViewBackend::set_view`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    /// The view did not exist and was just created; callers initialize it.
    Created,
    /// The view already existed; only its rectangle was updated.
    Existing,
}

/// A rectangle given by its inclusive frame corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Rect {
    pub fn new(x0: usize, y0: usize, x1: usize, y1: usize) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Size of the area inside the one-cell frame.
    pub fn inner_size(&self) -> (usize, usize) {
        (
            self.x1.saturating_sub(self.x0).saturating_sub(1),
            self.y1.saturating_sub(self.y0).saturating_sub(1),
        )
    }

    pub fn is_valid(&self) -> bool {
        self.x0 < self.x1 && self.y0 < self.y1
    }
}

pub trait ViewBackend {
    /// Screen size in columns and rows.
    fn size(&self) -> (usize, usize);

    /// Creates the view if it does not exist, otherwise moves it to `rect`.
    fn set_view(&mut self, name: &str, rect: Rect) -> Result<ViewStatus, ViewError>;

    fn delete_view(&mut self, name: &str) -> Result<(), ViewError>;

    fn view(&self, name: &str) -> Result<&View, ViewError>;

    fn view_mut(&mut self, name: &str) -> Result<&mut View, ViewError>;

    /// Gives keyboard focus to a view.
    fn set_current_view(&mut self, name: &str) -> Result<(), ViewError>;

    fn current_view(&self) -> Option<&str>;

    /// Binds `key` to `command`, for one view or, with `None`, for every view.
    fn set_keybinding(&mut self, view: Option<&str>, key: Key, command: Command);

    /// Removes every binding scoped to `view`.
    fn delete_keybindings(&mut self, view: &str);
}
