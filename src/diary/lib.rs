//! # Diary Architecture
//!
//! Diary is a terminal diary kept in one plain-text file per month. The interesting parts are a
//! library; the binary only parses arguments, sets up config and logging, and runs the event
//! loop.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Binary (main.rs, args.rs) + terminal driver (term.rs)      │
//! │  - Parses arguments, owns the terminal, reads keys, draws   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Application (app.rs)                                       │
//! │  - Keymap and command handlers                              │
//! │  - Turns commands into diary mutations                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Navigation (nav/)                                          │
//! │  - View stack, cursor helpers, modal dialogs, geometry      │
//! │  - Talks to views only through the ViewBackend trait        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Model, format and storage (model.rs, format.rs, store/)    │
//! │  - Entries and sections, the text format, DiaryStore trait  │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No Terminal Assumptions below the Binary
//!
//! Everything from [`app`] inward runs against the in-memory [`backend::ViewSet`]. Nothing
//! there writes to stdout/stderr or reads the keyboard, so the whole UI flow can be driven key
//! by key in tests.
//!
//! ## Testing Strategy
//!
//! 1. **Model and format**: unit tests of the data rules and of the file format.
//! 2. **Navigation and app**: key-by-key scenarios against a `ViewSet` and an `InMemoryStore`.
//! 3. **Binary**: `tests/` drives the built binary for what needs no terminal, and exercises
//!    `FileStore` against real temporary files.
//!
//! ## Module Overview
//!
//! - [`model`]: Entries and sections (`Diary`, `Section`)
//! - [`format`]: Reading and writing the diary text format
//! - [`store`]: Storage abstraction and implementations
//! - [`backend`]: Views, keys and the `ViewBackend` trait
//! - [`nav`]: View stack and dialogs
//! - [`app`]: Keymap and command handlers
//! - [`term`]: Terminal driver (crossterm input, ratatui drawing)
//! - [`config`]: Configuration management
//! - [`logging`]: File logging
//! - [`error`]: Error types

pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod nav;
pub mod store;
pub mod term;
