use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::filename::numbered_name;

const MAX_NAME_ATTEMPTS: usize = 1000;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("no free file name left for {0}")]
    NamesExhausted(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Create `dir` when missing and check that files can be created in it.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Writes complete files into `dir` via a temp file and a rename, so a reader
/// never observes a partial artifact.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Write `content` under `filename`, or under the first free
    /// `filename (n)` variant. Existing files are never replaced.
    pub fn write_new(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let target = self.dir.join(numbered_name(filename, attempt));
            match tmp.persist_noclobber(&target) {
                Ok(_) => return Ok(target),
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => tmp = err.file,
                Err(err) => return Err(PersistError::Io(err.error)),
            }
        }
        Err(PersistError::NamesExhausted(filename.to_string()))
    }
}
