use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::{IndexError, ValidationError};

/// Opaque reference to the raw bytes of a picked file. The core never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle(PathBuf);

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// One user-picked file. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub byte_size: u64,
    pub mime_type: String,
    /// Milliseconds since the Unix epoch.
    pub last_modified_ms: i64,
    pub handle: FileHandle,
}

impl SourceFile {
    pub fn key(&self) -> FileKey {
        FileKey {
            name: self.name.clone(),
            byte_size: self.byte_size,
            last_modified_ms: self.last_modified_ms,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Name with its final extension removed (`a.tar.gz` -> `a.tar`).
    pub fn base_name(&self) -> &str {
        match self.name.rfind('.') {
            Some(pos) => &self.name[..pos],
            None => &self.name,
        }
    }
}

/// Identity used to detect repeated picks of the same file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileKey {
    pub name: String,
    pub byte_size: u64,
    pub last_modified_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddOutcome {
    pub added: usize,
    pub duplicates: usize,
    pub not_images: usize,
}

/// Ordered, duplicate-free collection of picked files.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileSet {
    files: Vec<SourceFile>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the image files among `candidates`, skipping any whose identity
    /// key is already present. Earlier entries win over later duplicates.
    pub fn add(&mut self, candidates: Vec<SourceFile>) -> Result<AddOutcome, ValidationError> {
        let offered = candidates.len();
        let images: Vec<SourceFile> = candidates.into_iter().filter(SourceFile::is_image).collect();
        if images.is_empty() {
            return Err(ValidationError::NoImageFiles);
        }

        let mut outcome = AddOutcome {
            not_images: offered - images.len(),
            ..AddOutcome::default()
        };
        let mut seen: HashSet<FileKey> = self.files.iter().map(SourceFile::key).collect();
        for file in images {
            if seen.insert(file.key()) {
                self.files.push(file);
                outcome.added += 1;
            } else {
                outcome.duplicates += 1;
            }
        }
        Ok(outcome)
    }

    pub fn remove(&mut self, index: usize) -> Result<SourceFile, IndexError> {
        if index >= self.files.len() {
            return Err(IndexError {
                index,
                len: self.files.len(),
            });
        }
        Ok(self.files.remove(index))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn first(&self) -> Option<&SourceFile> {
        self.files.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourceFile> {
        self.files.iter()
    }

    pub fn as_slice(&self) -> &[SourceFile] {
        &self.files
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a SourceFile;
    type IntoIter = std::slice::Iter<'a, SourceFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: u64, modified: i64, mime: &str) -> SourceFile {
        SourceFile {
            name: name.to_string(),
            byte_size: size,
            mime_type: mime.to_string(),
            last_modified_ms: modified,
            handle: FileHandle::new(name),
        }
    }

    #[test]
    fn base_name_strips_only_final_extension() {
        assert_eq!(file("a.png", 1, 0, "image/png").base_name(), "a");
        assert_eq!(file("a.b.jpeg", 1, 0, "image/jpeg").base_name(), "a.b");
        assert_eq!(file("scan", 1, 0, "image/png").base_name(), "scan");
    }

    #[test]
    fn same_name_with_different_size_is_distinct() {
        let mut set = FileSet::new();
        set.add(vec![file("a.png", 10, 1, "image/png")]).unwrap();
        let outcome = set.add(vec![file("a.png", 11, 1, "image/png")]).unwrap();
        assert_eq!(outcome.added, 1);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn duplicates_inside_one_pick_are_collapsed() {
        let mut set = FileSet::new();
        let outcome = set
            .add(vec![
                file("a.png", 10, 1, "image/png"),
                file("a.png", 10, 1, "image/png"),
                file("notes.txt", 3, 1, "text/plain"),
            ])
            .unwrap();
        assert_eq!(
            outcome,
            AddOutcome {
                added: 1,
                duplicates: 1,
                not_images: 1
            }
        );
    }

    #[test]
    fn selection_without_images_is_rejected_and_set_kept() {
        let mut set = FileSet::new();
        set.add(vec![file("a.png", 10, 1, "image/png")]).unwrap();
        let err = set
            .add(vec![file("doc.pdf", 10, 1, "application/pdf")])
            .unwrap_err();
        assert_eq!(err, ValidationError::NoImageFiles);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_out_of_range_reports_index_and_len() {
        let mut set = FileSet::new();
        let err = set.remove(0).unwrap_err();
        assert_eq!(err, IndexError { index: 0, len: 0 });
    }
}
