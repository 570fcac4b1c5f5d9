use chrono::Local;
use clap::Parser;
use colored::*;
use diary::app::{App, Flow};
use diary::backend::ViewSet;
use diary::config::DiaryConfig;
use diary::error::{DiaryError, Result};
use diary::logging::init_logging;
use diary::store::fs::FileStore;
use diary::term::{Input, Terminal};
use log::info;

mod args;
use args::Cli;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let home = DiaryConfig::home()?;
    let config = DiaryConfig::load(&home)?;
    if !DiaryConfig::path(&home).exists() {
        // First run: leave the defaults where they can be edited.
        if let Err(e) = config.save(&home) {
            eprintln!("{} {}", "Warning:".yellow(), e);
        }
    }
    if let Err(e) = init_logging(&config.log_level, &home.join("logs")) {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }

    let today = Local::now().date_naive();
    let path = match cli.file {
        Some(path) => path,
        None => config.default_file_path(today)?,
    };

    if !console::user_attended() {
        return Err(DiaryError::Terminal(
            "diary needs an interactive terminal".into(),
        ));
    }

    let (width, height) = Terminal::size()?;
    let store = FileStore::new(&path);
    let mut app = App::new(
        ViewSet::new(width, height),
        store,
        config.default_entry_key(today)?,
    )?;

    let mut term = Terminal::enter()?;
    loop {
        term.draw(app.backend())?;
        match term.next_input()? {
            Input::Key(key) => {
                if app.press(key)? == Flow::Quit {
                    break;
                }
            }
            Input::Resize(width, height) => app.resize(width, height)?,
        }
    }
    info!("quit file={}", path.display());
    Ok(())
}
