//! The in-memory diary: dated entries, each holding an ordered list of named sections.
//!
//! Entries are kept in a [`BTreeMap`] so keys always come back sorted. Sections within an
//! entry keep insertion order, which matters for serialization: the unlabeled intro block of a
//! day is written first and must stay first.

use std::collections::BTreeMap;

/// Name given to text that appears under an entry header before any section header.
pub const INTRO_SECTION: &str = "Intro";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub value: String,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diary {
    entries: BTreeMap<String, Vec<Section>>,
}

impl Diary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// All entry keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts an empty entry. Returns `false` (and changes nothing) if the key already exists.
    pub fn add_key(&mut self, key: &str) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries.insert(key.to_string(), Vec::new());
        true
    }

    pub fn remove_key(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Section names of an entry in insertion order, or `None` when the entry does not exist.
    pub fn section_names(&self, key: &str) -> Option<Vec<&str>> {
        self.entries
            .get(key)
            .map(|sections| sections.iter().map(|s| s.name.as_str()).collect())
    }

    pub fn sections(&self, key: &str) -> Option<&[Section]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Returns the section `name` under `key`, creating the entry and the section as needed.
    ///
    /// The flag is `true` only when the section was created by this call.
    pub fn add_section(&mut self, key: &str, name: &str) -> (&mut Section, bool) {
        let sections = self.entries.entry(key.to_string()).or_default();
        if let Some(pos) = sections.iter().position(|s| s.name == name) {
            return (&mut sections[pos], false);
        }
        sections.push(Section::new(name));
        let last = sections.len() - 1;
        (&mut sections[last], true)
    }

    pub fn section(&self, key: &str, name: &str) -> Option<&Section> {
        self.entries.get(key)?.iter().find(|s| s.name == name)
    }

    /// Mutable access to a section. Writing to `value` is how content gets updated.
    pub fn section_mut(&mut self, key: &str, name: &str) -> Option<&mut Section> {
        self.entries.get_mut(key)?.iter_mut().find(|s| s.name == name)
    }

    pub fn remove_section(&mut self, key: &str, name: &str) {
        if let Some(sections) = self.entries.get_mut(key) {
            if let Some(pos) = sections.iter().position(|s| s.name == name) {
                sections.remove(pos);
            }
        }
    }

    /// Appends `line` to a section, separating it from existing content with a newline.
    ///
    /// This is the only primitive the parser uses to ingest text.
    pub fn append_line_to_section(&mut self, key: &str, name: &str, line: &str) {
        let (section, created) = self.add_section(key, name);
        if !created {
            section.value.push('\n');
        }
        section.value.push_str(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diary_with_work_day() -> Diary {
        let mut diary = Diary::new();
        diary.append_line_to_section("01-01-2024", INTRO_SECTION, "New year");
        diary.append_line_to_section("01-01-2024", "Work", "Did stuff");
        diary.append_line_to_section("01-01-2024", "Gym", "Legs");
        diary
    }

    #[test]
    fn keys_are_sorted_and_unique() {
        let mut diary = Diary::new();
        assert!(diary.add_key("03-01-2024"));
        assert!(diary.add_key("01-01-2024"));
        assert!(diary.add_key("02-01-2024"));
        assert!(!diary.add_key("01-01-2024"));
        diary.remove_key("02-01-2024");
        diary.remove_key("missing");

        assert_eq!(diary.keys(), vec!["01-01-2024", "03-01-2024"]);
    }

    #[test]
    fn add_key_does_not_touch_existing_sections() {
        let mut diary = diary_with_work_day();
        assert!(!diary.add_key("01-01-2024"));
        assert_eq!(
            diary.section_names("01-01-2024"),
            Some(vec![INTRO_SECTION, "Work", "Gym"])
        );
    }

    #[test]
    fn section_names_distinguishes_empty_from_missing() {
        let mut diary = Diary::new();
        diary.add_key("05-05-2024");

        assert_eq!(diary.section_names("05-05-2024"), Some(vec![]));
        assert_eq!(diary.section_names("06-05-2024"), None);
    }

    #[test]
    fn add_section_returns_the_same_section_twice() {
        let mut diary = Diary::new();

        let (first, created) = diary.add_section("01-01-2024", "Work");
        assert!(created);
        let first = first as *const Section;

        let (second, created) = diary.add_section("01-01-2024", "Work");
        assert!(!created);
        assert!(std::ptr::eq(first, second as *const Section));
        assert_eq!(diary.section_names("01-01-2024"), Some(vec!["Work"]));
    }

    #[test]
    fn add_section_creates_missing_entry() {
        let mut diary = Diary::new();
        let (section, created) = diary.add_section("07-07-2024", "Trip");
        assert!(created);
        assert_eq!(section.value, "");
        assert!(diary.contains_key("07-07-2024"));
    }

    #[test]
    fn section_mut_updates_the_store() {
        let mut diary = diary_with_work_day();
        diary.section_mut("01-01-2024", "Work").unwrap().value = "Rewritten".into();

        assert_eq!(diary.section("01-01-2024", "Work").unwrap().value, "Rewritten");
    }

    #[test]
    fn section_lookup_misses() {
        let diary = diary_with_work_day();
        assert!(diary.section("01-01-2024", "Nope").is_none());
        assert!(diary.section("02-01-2024", "Work").is_none());
    }

    #[test]
    fn remove_section_shifts_following_sections() {
        let mut diary = diary_with_work_day();
        diary.remove_section("01-01-2024", "Work");

        assert_eq!(
            diary.section_names("01-01-2024"),
            Some(vec![INTRO_SECTION, "Gym"])
        );
    }

    #[test]
    fn remove_missing_section_changes_nothing() {
        let mut diary = diary_with_work_day();
        let before = diary.clone();

        diary.remove_section("01-01-2024", "Nope");
        diary.remove_section("09-09-2024", "Work");

        assert_eq!(diary, before);
    }

    #[test]
    fn append_line_joins_with_newlines() {
        let mut diary = Diary::new();
        for line in ["L1", "L2", "L3"] {
            diary.append_line_to_section("01-01-2024", "Notes", line);
        }

        assert_eq!(
            diary.section("01-01-2024", "Notes").unwrap().value,
            "L1\nL2\nL3"
        );
        assert_eq!(diary.section_names("01-01-2024"), Some(vec!["Notes"]));
    }

    #[test]
    fn append_line_keeps_blank_lines() {
        let mut diary = Diary::new();
        for line in ["a", "", "b"] {
            diary.append_line_to_section("k", "s", line);
        }
        assert_eq!(diary.section("k", "s").unwrap().value, "a\n\nb");
    }
}
