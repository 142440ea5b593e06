use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use engine_logging::engine_warn;
use img2pdf_core::{FileHandle, SourceFile};

/// Mime type guessed from the file extension, the way a browser labels a pick.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Describe one local file. Directories and unreadable paths give `None`.
pub fn source_file(path: &Path) -> Option<SourceFile> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(err) => {
            engine_warn!("Skipping {:?}: {}", path, err);
            return None;
        }
    };
    if !meta.is_file() {
        engine_warn!("Skipping {:?}: not a regular file", path);
        return None;
    }
    let name = path.file_name()?.to_string_lossy().into_owned();
    let last_modified_ms = meta
        .modified()
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|since| since.as_millis() as i64)
        .unwrap_or(0);

    Some(SourceFile {
        name,
        byte_size: meta.len(),
        mime_type: mime_for_path(path).to_string(),
        last_modified_ms,
        handle: FileHandle::new(path),
    })
}

/// Describe every readable path, in order. Returns the paths that were skipped too.
pub fn source_files(paths: &[PathBuf]) -> (Vec<SourceFile>, Vec<PathBuf>) {
    let mut picked = Vec::with_capacity(paths.len());
    let mut skipped = Vec::new();
    for path in paths {
        match source_file(path) {
            Some(file) => picked.push(file),
            None => skipped.push(path.clone()),
        }
    }
    (picked, skipped)
}
