use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "diary", version)]
#[command(about = "Terminal diary kept in a plain-text file", long_about = None)]
pub struct Cli {
    /// Diary file to open (defaults to the current month, e.g. 10-2026.md)
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}
