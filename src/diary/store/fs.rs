use super::DiaryStore;
use crate::error::{DiaryError, Result};
use crate::format;
use crate::model::Diary;
use log::{debug, info};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DiaryStore for FileStore {
    fn load(&self) -> Result<Diary> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("no diary at {}, starting empty", self.path.display());
                return Ok(Diary::new());
            }
            Err(err) => return Err(DiaryError::Io(err)),
        };

        let diary = format::read(BufReader::new(file))?;
        debug!(
            "loaded {} entries from {}",
            diary.len(),
            self.path.display()
        );
        Ok(diary)
    }

    fn save(&mut self, diary: &Diary) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(DiaryError::Io)?;
            }
        }
        let file = File::create(&self.path).map_err(DiaryError::Io)?;
        format::write(diary, BufWriter::new(file))?;
        info!("saved {} entries to {}", diary.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
