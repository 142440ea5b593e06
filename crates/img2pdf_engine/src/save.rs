use std::path::{Path, PathBuf};

use engine_logging::engine_info;

use crate::filename::safe_artifact_name;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::{Artifact, SavedFile};

/// The local "save as" step for a finished artifact.
pub trait ArtifactSaver: Send + Sync {
    fn save(&self, artifact: &Artifact, fallback_name: &str) -> Result<SavedFile, PersistError>;
}

/// Saves artifacts into one download directory, like a browser would.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSaver for DirectorySaver {
    fn save(&self, artifact: &Artifact, fallback_name: &str) -> Result<SavedFile, PersistError> {
        let name = safe_artifact_name(&artifact.filename, fallback_name);
        let writer = AtomicFileWriter::new(self.dir.clone());
        let path = writer.write_new(&name, &artifact.bytes)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(name);
        engine_info!(
            "Saved {} ({} bytes) to {:?}",
            filename,
            artifact.bytes.len(),
            path
        );
        Ok(SavedFile {
            filename,
            path,
            byte_len: artifact.bytes.len() as u64,
        })
    }
}
