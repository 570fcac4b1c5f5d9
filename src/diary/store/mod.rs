//! # Storage Layer
//!
//! A diary lives in one text file, read whole at startup and rewritten whole on save. The
//! [`DiaryStore`] trait hides where that text lives:
//!
//! - [`fs::FileStore`]: production storage, a path on disk
//! - [`memory::InMemoryStore`]: a string in memory, for tests
//!
//! Both go through [`crate::format`], so what they persist is byte-for-byte the same.
//!
//! ## Load semantics
//!
//! A store with nothing in it yet (no file) loads as an empty [`Diary`]: a new month simply
//! starts a new file. Any other failure to read is an error, so a permission problem never
//! looks like an empty diary that the next save would overwrite.
//!
//! ## Save semantics
//!
//! Saving truncates and rewrites everything. A failed save leaves the in-memory diary untouched;
//! the caller decides how to report it.

use crate::error::Result;
use crate::model::Diary;

pub mod fs;
pub mod memory;

pub trait DiaryStore {
    /// Reads the diary, or an empty one when nothing has been saved yet.
    fn load(&self) -> Result<Diary>;

    /// Replaces the stored diary with `diary`.
    fn save(&mut self, diary: &Diary) -> Result<()>;

    /// Human-readable location, for messages and logs.
    fn location(&self) -> String;
}
