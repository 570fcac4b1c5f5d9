//! # Navigation
//!
//! [`Navigator`] decides which view is logically active. It keeps a stack of frames, starting
//! with a root view that can never be popped, and moves backend focus as frames are pushed and
//! popped. Backend focus alone is not enough: while a dialog is open the overlay has focus, but
//! the stack still says where focus goes back to.
//!
//! Each frame may carry a *subject*, the item it was opened for (the entry a section list
//! belongs to, the section a text view is editing). Popping a frame drops its subject with it,
//! so nothing stale survives back-navigation.
//!
//! ## Dialogs
//!
//! A dialog is a centered overlay view, never part of the stack. Opening one stores a
//! continuation value `P` chosen by the caller; closing one removes the overlay and its key
//! bindings, returns focus to [`Navigator::current_view_name`], and only then hands back an
//! `Option<Completion<P>>`. The continuation is moved out, so it completes at most once.
//!
//! Only one overlay exists at a time. Opening a dialog while one is showing is a no-op.

use crate::backend::{Command, DialogCommand, Rect, ViewBackend, ViewStatus};
use crate::error::{DiaryError, Result};
use log::debug;

mod dialog;
pub mod layout;

pub use dialog::{Completion, DialogKind, DIALOG_VIEW};
use dialog::Dialog;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    view: String,
    subject: Option<String>,
}

pub struct Navigator<B, P> {
    backend: B,
    stack: Vec<Frame>,
    menus: Vec<String>,
    max_x: usize,
    max_y: usize,
    dialog: Option<Dialog<P>>,
}

impl<B: ViewBackend, P> Navigator<B, P> {
    /// Creates a navigator whose stack holds only `root`.
    ///
    /// `menus` lists the menu views laid out side by side across the top half of the screen.
    pub fn new(backend: B, root: &str, menus: &[&str]) -> Self {
        let mut nav = Self {
            backend,
            stack: vec![Frame {
                view: root.to_string(),
                subject: None,
            }],
            menus: menus.iter().map(|m| m.to_string()).collect(),
            max_x: 0,
            max_y: 0,
            dialog: None,
        };
        nav.refresh_size();
        nav
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Re-reads the screen size from the backend. Call after a resize.
    pub fn refresh_size(&mut self) {
        let (width, height) = self.backend.size();
        self.max_x = width.saturating_sub(1);
        self.max_y = height.saturating_sub(1);
    }

    pub fn menu_rect(&self, name: &str) -> Rect {
        layout::menu_rect(&self.menus, name, self.max_x, self.max_y / 2)
    }

    /// The area below the menus.
    pub fn content_rect(&self) -> Rect {
        Rect::new(0, self.max_y / 2, self.max_x, self.max_y)
    }

    pub fn current_view_name(&self) -> &str {
        // The root frame is never popped.
        self.stack.last().map_or("", |f| f.view.as_str())
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The subject of the innermost frame showing `view`.
    pub fn subject(&self, view: &str) -> Option<&str> {
        self.stack
            .iter()
            .rev()
            .find(|f| f.view == view)
            .and_then(|f| f.subject.as_deref())
    }

    pub fn navigate_to(&mut self, target: &str) -> Result<()> {
        self.navigate_into(target, None)
    }

    /// Pushes `target`, focuses it and moves its cursor back to the scroll origin.
    pub fn navigate_into(&mut self, target: &str, subject: Option<String>) -> Result<()> {
        debug!("navigate to={} subject={:?}", target, subject);
        self.backend.set_current_view(target)?;
        self.stack.push(Frame {
            view: target.to_string(),
            subject,
        });

        let view = self.backend.view_mut(target)?;
        let (ox, oy) = view.origin();
        if let Err(err) = view.set_cursor(ox, oy) {
            debug!("cursor reset skipped: {}", err);
        }
        Ok(())
    }

    /// Pops the current frame and focuses the one below it.
    ///
    /// With `clean_current` the view being left loses its text and title.
    pub fn navigate_back(&mut self, clean_current: bool) -> Result<()> {
        if self.stack.len() < 2 {
            return Err(DiaryError::Navigation(
                "cannot navigate back from the root view".to_string(),
            ));
        }
        let Some(left) = self.stack.pop() else {
            return Ok(());
        };
        debug!("navigate back from={} clean={}", left.view, clean_current);

        if clean_current {
            let view = self.backend.view_mut(&left.view)?;
            view.clear();
            view.set_title("");
        }
        let target = self.current_view_name().to_string();
        self.backend.set_current_view(&target)?;
        Ok(())
    }

    /// Moves the cursor of the focused view one line down, never past the last non-empty line,
    /// scrolling when the cursor would leave the view.
    pub fn cursor_down(&mut self) -> Result<()> {
        let Some(name) = self.backend.current_view().map(str::to_string) else {
            return Ok(());
        };
        let view = self.backend.view_mut(&name)?;
        let (cx, cy) = view.cursor();
        match view.line(cy + 1) {
            Some(line) if !line.is_empty() => {}
            _ => return Ok(()),
        }
        if view.set_cursor(cx, cy + 1).is_err() {
            let (ox, oy) = view.origin();
            view.set_origin(ox, oy + 1);
        }
        Ok(())
    }

    /// Moves the cursor of the focused view one line up, scrolling back while the origin is
    /// above the top of the buffer.
    pub fn cursor_up(&mut self) -> Result<()> {
        let Some(name) = self.backend.current_view().map(str::to_string) else {
            return Ok(());
        };
        let view = self.backend.view_mut(&name)?;
        let (ox, oy) = view.origin();
        let (cx, cy) = view.cursor();
        let moved = match cy.checked_sub(1) {
            Some(y) => view.set_cursor(cx, y).is_ok(),
            None => false,
        };
        if !moved && oy > 0 {
            view.set_origin(ox, oy - 1);
        }
        Ok(())
    }

    /// Text of the row under the cursor in `view`.
    pub fn row_text(&self, view: &str) -> Result<String> {
        Ok(self.backend.view(view)?.current_row_text().to_string())
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog.is_some()
    }

    /// Opens an editable prompt pre-filled with `default`.
    pub fn prompt(&mut self, default: &str, pending: P) -> Result<()> {
        self.open_dialog(default, DialogKind::Prompt, Some(pending))
    }

    /// Opens a yes/no question.
    pub fn confirm(&mut self, message: &str, pending: P) -> Result<()> {
        self.open_dialog(message, DialogKind::Confirm, Some(pending))
    }

    /// Shows a notice. Closing it completes nothing.
    pub fn message(&mut self, message: &str) -> Result<()> {
        self.open_dialog(message, DialogKind::Message, None)
    }

    fn open_dialog(&mut self, text: &str, kind: DialogKind, pending: Option<P>) -> Result<()> {
        let rect = layout::dialog_rect(text, self.max_x, self.max_y);
        if self.backend.set_view(DIALOG_VIEW, rect)? == ViewStatus::Existing {
            debug!("dialog already open, {:?} ignored", kind);
            return Ok(());
        }

        let view = self.backend.view_mut(DIALOG_VIEW)?;
        view.set_text(text);
        view.set_editable(kind.is_editable());
        if kind.is_editable() {
            view.move_to_line_end();
        }
        for &(key, command) in kind.bindings() {
            self.backend
                .set_keybinding(Some(DIALOG_VIEW), key, Command::Dialog(command));
        }
        self.backend.set_current_view(DIALOG_VIEW)?;
        self.dialog = Some(Dialog { kind, pending });
        debug!("dialog opened kind={:?}", kind);
        Ok(())
    }

    /// Closes the open dialog: removes the overlay and its bindings, focuses the current view,
    /// then returns the completion, if the closing key produces one.
    pub fn close_dialog(&mut self, command: DialogCommand) -> Result<Option<Completion<P>>> {
        let Some(dialog) = self.dialog.take() else {
            return Ok(None);
        };
        let text = self.backend.view(DIALOG_VIEW)?.text();
        self.backend.delete_view(DIALOG_VIEW)?;
        self.backend.delete_keybindings(DIALOG_VIEW);

        let target = self.current_view_name().to_string();
        self.backend.set_current_view(&target)?;
        debug!("dialog closed kind={:?} command={:?}", dialog.kind, command);
        Ok(dialog.complete(command, text))
    }
}
