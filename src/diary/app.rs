//! # Application
//!
//! [`App`] wires the diary, its store and the navigator together. Three views make up the
//! screen:
//!
//! - `dates`, the root menu, lists entry keys
//! - `sections` lists the sections of the entry opened from `dates`
//! - `content` holds the editable body of the section opened from `sections`
//!
//! Keys are bound per view (see [`KEYMAP`]); the backend turns a key press into a [`Command`]
//! and [`App::handle`] runs it. Every handler works on the diary through the navigator: the
//! entry and section being browsed are the subjects of the `sections` and `content` frames.
//!
//! Edits to `content` stay in the view until applied; only Save writes the file.

use crate::backend::{Command, Key, ViewBackend, ViewSet, ViewStatus};
use crate::error::Result;
use crate::model::Diary;
use crate::nav::{Completion, Navigator};
use crate::store::DiaryStore;
use log::{debug, info, warn};

pub const DATES_VIEW: &str = "dates";
pub const SECTIONS_VIEW: &str = "sections";
pub const CONTENT_VIEW: &str = "content";

const MENUS: [&str; 2] = [DATES_VIEW, SECTIONS_VIEW];
const DATES_TITLE: &str = "Date";

pub const ALREADY_EXISTS: &str = "Item already exists!";
pub const SAVED: &str = "Text saved successfully!";

/// Key bindings as `(views, key, command)`. An empty view list binds the key globally.
pub const KEYMAP: &[(&[&str], Key, Command)] = &[
    (&[], Key::Ctrl('c'), Command::Quit),
    (&[CONTENT_VIEW], Key::Ctrl('a'), Command::Apply),
    (&[CONTENT_VIEW], Key::End, Command::LineEnd),
    (&[CONTENT_VIEW], Key::Home, Command::LineStart),
    (&[DATES_VIEW, SECTIONS_VIEW], Key::Down, Command::CursorDown),
    (&[DATES_VIEW, SECTIONS_VIEW], Key::Up, Command::CursorUp),
    (
        &[DATES_VIEW, SECTIONS_VIEW, CONTENT_VIEW],
        Key::Ctrl('s'),
        Command::Save,
    ),
    (&[DATES_VIEW], Key::Enter, Command::OpenEntry),
    (&[DATES_VIEW], Key::Ctrl('a'), Command::AddEntry),
    (&[DATES_VIEW], Key::Ctrl('d'), Command::RemoveEntry),
    (&[SECTIONS_VIEW], Key::Enter, Command::OpenSection),
    (&[SECTIONS_VIEW], Key::Ctrl('a'), Command::AddSection),
    (&[SECTIONS_VIEW], Key::Ctrl('d'), Command::RemoveSection),
    (&[SECTIONS_VIEW, CONTENT_VIEW], Key::Ctrl('b'), Command::Back),
];

/// Whether the event loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// What to do once an open dialog completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    AddEntry,
    AddSection { entry: String },
    RemoveEntry(String),
    RemoveSection { entry: String, name: String },
}

pub struct App<B, S> {
    diary: Diary,
    store: S,
    nav: Navigator<B, Pending>,
    default_entry_key: String,
}

impl<B: ViewBackend, S: DiaryStore> App<B, S> {
    /// Loads the diary from `store`, binds the keymap and lays out the views.
    ///
    /// `default_entry_key` pre-fills the prompt for a new entry.
    pub fn new(backend: B, store: S, default_entry_key: impl Into<String>) -> Result<Self> {
        let diary = store.load()?;
        info!(
            "opened diary location={} entries={}",
            store.location(),
            diary.len()
        );

        let mut app = Self {
            diary,
            store,
            nav: Navigator::new(backend, DATES_VIEW, &MENUS),
            default_entry_key: default_entry_key.into(),
        };
        for &(views, key, command) in KEYMAP {
            let backend = app.nav.backend_mut();
            if views.is_empty() {
                backend.set_keybinding(None, key, command);
            }
            for view in views {
                backend.set_keybinding(Some(*view), key, command);
            }
        }
        app.layout()?;
        Ok(app)
    }

    pub fn diary(&self) -> &Diary {
        &self.diary
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn navigator(&self) -> &Navigator<B, Pending> {
        &self.nav
    }

    pub fn backend(&self) -> &B {
        self.nav.backend()
    }

    pub fn backend_mut(&mut self) -> &mut B {
        self.nav.backend_mut()
    }

    /// Creates the views on first call; later calls only fit them to the current screen size.
    pub fn layout(&mut self) -> Result<()> {
        self.nav.refresh_size();

        let rect = self.nav.menu_rect(DATES_VIEW);
        if self.nav.backend_mut().set_view(DATES_VIEW, rect)? == ViewStatus::Created {
            let keys = self.diary.keys().join("\n");
            let view = self.nav.backend_mut().view_mut(DATES_VIEW)?;
            view.set_title(DATES_TITLE);
            view.set_highlight(true);
            view.set_text(&keys);
            self.nav.backend_mut().set_current_view(DATES_VIEW)?;
        }

        let rect = self.nav.menu_rect(SECTIONS_VIEW);
        if self.nav.backend_mut().set_view(SECTIONS_VIEW, rect)? == ViewStatus::Created {
            self.nav
                .backend_mut()
                .view_mut(SECTIONS_VIEW)?
                .set_highlight(true);
        }

        let rect = self.nav.content_rect();
        if self.nav.backend_mut().set_view(CONTENT_VIEW, rect)? == ViewStatus::Created {
            self.nav
                .backend_mut()
                .view_mut(CONTENT_VIEW)?
                .set_editable(true);
        }
        Ok(())
    }

    pub fn handle(&mut self, command: Command) -> Result<Flow> {
        debug!("command={:?} view={}", command, self.nav.current_view_name());
        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Save => self.save()?,
            Command::Apply => self.apply()?,
            Command::CursorUp => self.nav.cursor_up()?,
            Command::CursorDown => self.nav.cursor_down()?,
            Command::LineStart => self.content_cursor(true)?,
            Command::LineEnd => self.content_cursor(false)?,
            Command::OpenEntry => self.open_entry()?,
            Command::OpenSection => self.open_section()?,
            Command::AddEntry => {
                let default = self.default_entry_key.clone();
                self.nav.prompt(&default, Pending::AddEntry)?;
            }
            Command::AddSection => {
                if let Some(entry) = self.nav.subject(SECTIONS_VIEW).map(str::to_string) {
                    self.nav.prompt("", Pending::AddSection { entry })?;
                }
            }
            Command::RemoveEntry => self.remove_entry()?,
            Command::RemoveSection => self.remove_section()?,
            Command::Back => {
                if self.nav.depth() > 1 {
                    self.nav.navigate_back(true)?;
                }
            }
            Command::Dialog(command) => {
                if let Some(completion) = self.nav.close_dialog(command)? {
                    self.complete(completion)?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn open_entry(&mut self) -> Result<()> {
        let key = self.nav.row_text(DATES_VIEW)?;
        let Some(names) = self.diary.section_names(&key) else {
            return Ok(());
        };
        let names = names.join("\n");

        self.nav
            .backend_mut()
            .view_mut(SECTIONS_VIEW)?
            .set_origin(0, 0);
        self.nav.navigate_into(SECTIONS_VIEW, Some(key.clone()))?;
        let view = self.nav.backend_mut().view_mut(SECTIONS_VIEW)?;
        view.set_title(key);
        view.set_text(&names);
        Ok(())
    }

    fn open_section(&mut self) -> Result<()> {
        let Some(entry) = self.nav.subject(SECTIONS_VIEW).map(str::to_string) else {
            return Ok(());
        };
        let name = self.nav.row_text(SECTIONS_VIEW)?;
        let Some(section) = self.diary.section(&entry, &name) else {
            debug!("no section entry={} name={}", entry, name);
            return Ok(());
        };
        let value = section.value.clone();

        self.nav.backend_mut().view_mut(CONTENT_VIEW)?.set_origin(0, 0);
        self.nav.navigate_into(CONTENT_VIEW, Some(name.clone()))?;
        let view = self.nav.backend_mut().view_mut(CONTENT_VIEW)?;
        view.set_title(name);
        view.set_text(&value);
        Ok(())
    }

    /// Copies the `content` buffer into the section it was opened for.
    fn apply(&mut self) -> Result<()> {
        let (Some(entry), Some(name)) = (
            self.nav.subject(SECTIONS_VIEW),
            self.nav.subject(CONTENT_VIEW),
        ) else {
            return Ok(());
        };
        let text = self.nav.backend().view(CONTENT_VIEW)?.text();
        match self.diary.section_mut(entry, name) {
            Some(section) => section.value = text,
            None => debug!("apply skipped, no section entry={} name={}", entry, name),
        }
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        match self.store.save(&self.diary) {
            Ok(()) => self.nav.message(SAVED),
            Err(err) => {
                warn!("save failed location={} error={}", self.store.location(), err);
                self.nav.message(&format!("Save failed: {}", err))
            }
        }
    }

    fn content_cursor(&mut self, start: bool) -> Result<()> {
        let view = self.nav.backend_mut().view_mut(CONTENT_VIEW)?;
        if start {
            view.move_to_line_start();
        } else {
            view.move_to_line_end();
        }
        Ok(())
    }

    fn remove_entry(&mut self) -> Result<()> {
        let key = self.nav.row_text(DATES_VIEW)?;
        if key.is_empty() {
            return Ok(());
        }
        self.nav
            .confirm(&confirm_text(&key), Pending::RemoveEntry(key))
    }

    fn remove_section(&mut self) -> Result<()> {
        let Some(entry) = self.nav.subject(SECTIONS_VIEW).map(str::to_string) else {
            return Ok(());
        };
        let name = self.nav.row_text(SECTIONS_VIEW)?;
        if name.is_empty() {
            return Ok(());
        }
        self.nav
            .confirm(&confirm_text(&name), Pending::RemoveSection { entry, name })
    }

    /// Runs the continuation of a closed dialog.
    ///
    /// Prompt text is trimmed: headers are recognised on trimmed lines, so a padded or blank
    /// name would not survive a save and reload.
    fn complete(&mut self, completion: Completion<Pending>) -> Result<()> {
        match completion {
            Completion::Text(Pending::AddEntry, text) => {
                let key = text.trim();
                if key.is_empty() {
                    return Ok(());
                }
                if !self.diary.add_key(key) {
                    return self.nav.message(ALREADY_EXISTS);
                }
                let keys = self.diary.keys();
                let row = keys.iter().position(|k| *k == key);
                refill(self.nav.backend_mut(), DATES_VIEW, &keys, row)
            }
            Completion::Text(Pending::AddSection { entry }, text) => {
                let name = text.trim();
                if name.is_empty() {
                    return Ok(());
                }
                let (_, created) = self.diary.add_section(&entry, name);
                if !created {
                    return self.nav.message(ALREADY_EXISTS);
                }
                let names = self.diary.section_names(&entry).unwrap_or_default();
                let row = names.len().checked_sub(1);
                refill(self.nav.backend_mut(), SECTIONS_VIEW, &names, row)
            }
            Completion::Confirmed(Pending::RemoveEntry(key), true) => {
                self.diary.remove_key(&key);
                info!("removed entry key={}", key);
                refill(self.nav.backend_mut(), DATES_VIEW, &self.diary.keys(), None)
            }
            Completion::Confirmed(Pending::RemoveSection { entry, name }, true) => {
                self.diary.remove_section(&entry, &name);
                info!("removed section entry={} name={}", entry, name);
                let names = self.diary.section_names(&entry).unwrap_or_default();
                refill(self.nav.backend_mut(), SECTIONS_VIEW, &names, None)
            }
            other => {
                debug!("dialog completed without action: {:?}", other);
                Ok(())
            }
        }
    }
}

impl<S: DiaryStore> App<ViewSet, S> {
    /// Feeds one key press through the bindings and runs the resulting command, if any.
    pub fn press(&mut self, key: Key) -> Result<Flow> {
        match self.nav.backend_mut().dispatch(key) {
            Some(command) => self.handle(command),
            None => Ok(Flow::Continue),
        }
    }

    /// Adapts the layout to a new screen size.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        self.nav.backend_mut().resize(width, height);
        self.layout()
    }
}

/// Replaces the lines of a menu and puts the cursor on `row`, or keeps it on the same buffer row
/// (clamped to the new length) when `row` is `None`.
fn refill<B: ViewBackend>(
    backend: &mut B,
    name: &str,
    lines: &[&str],
    row: Option<usize>,
) -> Result<()> {
    let last = lines.len().saturating_sub(1);
    let view = backend.view_mut(name)?;
    let (_, current) = view.buffer_position();
    view.set_text(&lines.join("\n"));
    view.place(0, row.unwrap_or(current).min(last));
    Ok(())
}

fn confirm_text(item: &str) -> String {
    format!("Delete {}?\n^Y Yes ^N No", item)
}
