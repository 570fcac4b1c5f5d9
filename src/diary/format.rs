//! # Diary File Format
//!
//! A diary is a single UTF-8 text file:
//!
//! ```text
//! ## 01-01-2024
//! Lines under the implicit Intro section
//! #### Work
//! Did stuff
//!
//! ## 02-01-2024
//! #### Gym
//! Legs
//! ```
//!
//! - `## ` starts an entry, the rest of the line is its key.
//! - `#### ` starts a named section inside the current entry.
//! - Text before the first section header of an entry belongs to [`INTRO_SECTION`], which is
//!   never written with a header of its own.
//! - Entries are separated by one blank line.
//!
//! Headers are recognized after trimming surrounding whitespace; body lines are stored as they
//! appear so indentation survives a round trip. Blank lines at the end of a section are padding
//! (the writer strips trailing newlines from every value), so the reader drops them.
//!
//! Two ambiguities are inherent to the format: a section literally named `Intro` reads back as
//! unlabeled intro text (and vanishes when empty), and a body line beginning with `## ` or
//! `#### ` reads back as a header.

use crate::error::Result;
use crate::model::{Diary, INTRO_SECTION};
use std::io::{BufRead, Write};

const ENTRY_PREFIX: &str = "## ";
const SECTION_PREFIX: &str = "#### ";

/// Parses diary text into a [`Diary`].
pub fn parse(text: &str) -> Diary {
    let mut parser = Parser::default();
    for line in text.lines() {
        parser.feed(line);
    }
    parser.finish()
}

/// Reads a diary from any buffered reader, line by line.
pub fn read<R: BufRead>(reader: R) -> Result<Diary> {
    let mut parser = Parser::default();
    for line in reader.lines() {
        parser.feed(&line?);
    }
    Ok(parser.finish())
}

/// Renders the whole diary as text.
pub fn render(diary: &Diary) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write(diary, &mut out);
    String::from_utf8_lossy(&out).into_owned()
}

/// Writes the whole diary to `out`.
pub fn write<W: Write>(diary: &Diary, mut out: W) -> Result<()> {
    for (i, key) in diary.keys().into_iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{}{}", ENTRY_PREFIX, remove_newlines(key))?;

        for section in diary.sections(key).unwrap_or_default() {
            if section.name != INTRO_SECTION {
                writeln!(out, "{}{}", SECTION_PREFIX, remove_newlines(&section.name))?;
            }
            writeln!(out, "{}", remove_newlines(&section.value))?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Strips trailing newlines, which carry no meaning in keys, names or values.
pub fn remove_newlines(text: &str) -> &str {
    text.trim_end_matches(['\n', '\r'])
}

#[derive(Default)]
struct Parser {
    diary: Diary,
    key: Option<String>,
    section: Option<String>,
    /// Set while the current section was declared by a header but holds no line yet.
    declared: bool,
    /// Blank lines seen since the last content line, kept until content follows.
    pending_blank: Vec<String>,
}

impl Parser {
    fn feed(&mut self, line: &str) {
        let trimmed = line.trim();

        if let Some(key) = trimmed.strip_prefix(ENTRY_PREFIX) {
            self.close_section();
            if self.key.as_deref() != Some(key) {
                self.key = Some(key.to_string());
            }
            self.diary.add_key(key);
            self.section = Some(INTRO_SECTION.to_string());
            return;
        }

        let Some(key) = self.key.as_deref() else {
            return;
        };

        if let Some(name) = trimmed.strip_prefix(SECTION_PREFIX) {
            self.close_section();
            self.section = Some(name.to_string());
            self.declared = true;
            return;
        }

        let Some(section) = self.section.as_deref() else {
            return;
        };

        if trimmed.is_empty() {
            self.pending_blank.push(line.to_string());
            return;
        }

        for blank in self.pending_blank.drain(..) {
            self.diary.append_line_to_section(key, section, &blank);
        }
        self.diary.append_line_to_section(key, section, line);
        self.declared = false;
    }

    fn close_section(&mut self) {
        self.pending_blank.clear();
        if self.declared {
            if let (Some(key), Some(section)) = (self.key.as_deref(), self.section.as_deref()) {
                self.diary.add_section(key, section);
            }
            self.declared = false;
        }
    }

    fn finish(mut self) -> Diary {
        self.close_section();
        self.diary
    }
}
