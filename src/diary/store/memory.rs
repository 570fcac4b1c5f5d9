use super::DiaryStore;
use crate::error::{DiaryError, Result};
use crate::format;
use crate::model::Diary;
use std::io::{Error, ErrorKind};

/// Keeps the serialized diary in a string.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    text: Option<String>,
    fail_saves: bool,
    saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `text`, as if a file existed.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Makes every later save fail like a full disk would.
    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl DiaryStore for InMemoryStore {
    fn load(&self) -> Result<Diary> {
        Ok(self.text.as_deref().map(format::parse).unwrap_or_default())
    }

    fn save(&mut self, diary: &Diary) -> Result<()> {
        if self.fail_saves {
            return Err(DiaryError::Io(Error::new(
                ErrorKind::Other,
                "no space left on device",
            )));
        }
        self.text = Some(format::render(diary));
        self.saves += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_round_trip() {
        let mut store = InMemoryStore::new();
        let diary = store.load().unwrap();
        assert!(diary.is_empty());

        store.save(&diary).unwrap();
        assert_eq!(store.text(), Some(""));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn failing_store_keeps_old_text() {
        let mut store = InMemoryStore::with_text("## a\n").failing_saves();
        let mut diary = store.load().unwrap();
        diary.add_key("b");

        assert!(store.save(&diary).is_err());
        assert_eq!(store.text(), Some("## a\n"));
        assert_eq!(store.saves(), 0);
    }
}
