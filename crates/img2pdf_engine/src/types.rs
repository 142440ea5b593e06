use std::fmt;
use std::path::PathBuf;

use bytes::Bytes;

pub type SubmissionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preparing,
    Uploading,
    Converting,
    PreparingDownload,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionProgress {
    pub submission_id: SubmissionId,
    pub stage: Stage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress(SubmissionProgress),
    SubmissionCompleted {
        submission_id: SubmissionId,
        result: Result<SavedFile, SubmitError>,
    },
}

/// One `files` part of the outbound form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub path: PathBuf,
}

/// Everything one `POST /convert` carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertRequest {
    pub files: Vec<UploadFile>,
    pub convert_type: String,
    /// Base name without extension; also names the saved artifact.
    pub filename: String,
    pub quality: u8,
}

/// The bytes to save and the name suggested for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub filename: String,
    pub path: PathBuf,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitError {
    pub kind: FailureKind,
    pub message: String,
}

impl SubmitError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for SubmitError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// A picked file could not be read for upload.
    ReadFile,
    Network,
    Timeout,
    /// `/convert` answered with this failure status.
    HttpStatus(u16),
    /// The deferred artifact could not be fetched from its download URL.
    Download,
    InvalidResponse,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Save,
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::ReadFile => write!(f, "unreadable source file"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Download => write!(f, "download failed"),
            FailureKind::InvalidResponse => write!(f, "invalid response"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Save => write!(f, "save failed"),
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}
