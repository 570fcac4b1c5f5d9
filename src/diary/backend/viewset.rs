use super::{Command, Key, Rect, View, ViewBackend, ViewError, ViewStatus};
use log::trace;

#[derive(Debug, Clone)]
struct Binding {
    view: Option<String>,
    key: Key,
    command: Command,
}

/// In-memory views, key bindings and focus.
///
/// Views are kept in creation order, which is also the drawing order: a view created later is
/// drawn on top of earlier ones.
#[derive(Debug, Default)]
pub struct ViewSet {
    width: usize,
    height: usize,
    views: Vec<View>,
    current: Option<String>,
    bindings: Vec<Binding>,
}

impl ViewSet {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Views in drawing order.
    pub fn views(&self) -> impl Iterator<Item = &View> {
        self.views.iter()
    }

    /// The command bound to `key` in the focused view, falling back to global bindings.
    pub fn binding(&self, key: Key) -> Option<Command> {
        let current = self.current.as_deref();
        let scoped = self
            .bindings
            .iter()
            .find(|b| b.key == key && b.view.is_some() && b.view.as_deref() == current);
        let global = || {
            self.bindings
                .iter()
                .find(|b| b.key == key && b.view.is_none())
        };
        scoped.or_else(global).map(|b| b.command)
    }

    /// Handles a key press: returns the bound command, or lets an editable focused view
    /// consume the key as text input.
    pub fn dispatch(&mut self, key: Key) -> Option<Command> {
        if let Some(command) = self.binding(key) {
            trace!("key={} command={:?}", key, command);
            return Some(command);
        }
        let current = self.current.clone()?;
        if let Some(view) = self.views.iter_mut().find(|v| v.name() == current) {
            if view.is_editable() {
                view.edit(key);
            }
        }
        None
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.views.iter().position(|v| v.name() == name)
    }
}

impl ViewBackend for ViewSet {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn set_view(&mut self, name: &str, rect: Rect) -> Result<ViewStatus, ViewError> {
        if !rect.is_valid() {
            return Err(ViewError::InvalidDimensions(name.to_string()));
        }
        if let Some(pos) = self.position(name) {
            self.views[pos].set_rect(rect);
            return Ok(ViewStatus::Existing);
        }
        self.views.push(View::new(name, rect));
        Ok(ViewStatus::Created)
    }

    fn delete_view(&mut self, name: &str) -> Result<(), ViewError> {
        let pos = self
            .position(name)
            .ok_or_else(|| ViewError::UnknownView(name.to_string()))?;
        self.views.remove(pos);
        if self.current.as_deref() == Some(name) {
            self.current = None;
        }
        Ok(())
    }

    fn view(&self, name: &str) -> Result<&View, ViewError> {
        self.views
            .iter()
            .find(|v| v.name() == name)
            .ok_or_else(|| ViewError::UnknownView(name.to_string()))
    }

    fn view_mut(&mut self, name: &str) -> Result<&mut View, ViewError> {
        self.views
            .iter_mut()
            .find(|v| v.name() == name)
            .ok_or_else(|| ViewError::UnknownView(name.to_string()))
    }

    fn set_current_view(&mut self, name: &str) -> Result<(), ViewError> {
        if self.position(name).is_none() {
            return Err(ViewError::UnknownView(name.to_string()));
        }
        self.current = Some(name.to_string());
        Ok(())
    }

    fn current_view(&self) -> Option<&str> {
        self.current.as_deref()
    }

    fn set_keybinding(&mut self, view: Option<&str>, key: Key, command: Command) {
        let view = view.map(str::to_string);
        self.bindings.retain(|b| !(b.view == view && b.key == key));
        self.bindings.push(Binding { view, key, command });
    }

    fn delete_keybindings(&mut self, view: &str) {
        self.bindings.retain(|b| b.view.as_deref() != Some(view));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn views() -> ViewSet {
        let mut set = ViewSet::new(80, 24);
        set.set_view("list", Rect::new(0, 0, 40, 12)).unwrap();
        set.set_view("body", Rect::new(0, 12, 79, 23)).unwrap();
        set
    }

    #[test]
    fn set_view_reports_existing_views() {
        let mut set = views();
        assert_eq!(
            set.set_view("list", Rect::new(0, 0, 20, 12)).unwrap(),
            ViewStatus::Existing
        );
        assert_eq!(set.view("list").unwrap().rect().x1, 20);
        assert_eq!(set.views().count(), 2);
    }

    #[test]
    fn set_view_rejects_empty_rects() {
        let mut set = views();
        assert_eq!(
            set.set_view("flat", Rect::new(5, 5, 5, 9)),
            Err(ViewError::InvalidDimensions("flat".into()))
        );
    }

    #[test]
    fn unknown_views_are_errors() {
        let mut set = views();
        assert!(set.view("nope").is_err());
        assert!(set.delete_view("nope").is_err());
        assert_eq!(
            set.set_current_view("nope"),
            Err(ViewError::UnknownView("nope".into()))
        );
    }

    #[test]
    fn scoped_bindings_win_over_global_ones() {
        let mut set = views();
        set.set_keybinding(None, Key::Ctrl('a'), Command::Quit);
        set.set_keybinding(Some("body"), Key::Ctrl('a'), Command::Apply);

        set.set_current_view("list").unwrap();
        assert_eq!(set.dispatch(Key::Ctrl('a')), Some(Command::Quit));

        set.set_current_view("body").unwrap();
        assert_eq!(set.dispatch(Key::Ctrl('a')), Some(Command::Apply));
    }

    #[test]
    fn delete_keybindings_only_touches_one_view() {
        let mut set = views();
        set.set_keybinding(None, Key::Ctrl('c'), Command::Quit);
        set.set_keybinding(Some("list"), Key::Enter, Command::OpenEntry);
        set.set_keybinding(Some("body"), Key::Ctrl('a'), Command::Apply);
        set.delete_keybindings("list");

        set.set_current_view("list").unwrap();
        assert_eq!(set.dispatch(Key::Enter), None);
        assert_eq!(set.dispatch(Key::Ctrl('c')), Some(Command::Quit));
        set.set_current_view("body").unwrap();
        assert_eq!(set.dispatch(Key::Ctrl('a')), Some(Command::Apply));
    }

    #[test]
    fn unbound_keys_edit_editable_views() {
        let mut set = views();
        set.view_mut("body").unwrap().set_editable(true);
        set.set_current_view("body").unwrap();
        for c in "hi".chars() {
            assert_eq!(set.dispatch(Key::Char(c)), None);
        }
        assert_eq!(set.view("body").unwrap().text(), "hi");

        set.set_current_view("list").unwrap();
        set.dispatch(Key::Char('x'));
        assert_eq!(set.view("list").unwrap().text(), "");
    }

    #[test]
    fn deleting_the_focused_view_drops_focus() {
        let mut set = views();
        set.set_current_view("body").unwrap();
        set.delete_view("body").unwrap();
        assert_eq!(set.current_view(), None);
    }
}
