use thiserror::Error;

/// Rejected user input. State is left untouched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no image files in selection")]
    NoImageFiles,
    #[error("quality must be between 1 and 100, got {0}")]
    QualityOutOfRange(u8),
    #[error("unknown conversion mode {0:?}")]
    UnknownMode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("file index {index} out of range (set has {len} files)")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

/// Why a submission ended without a saved artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionFailure {
    /// The service or the download location could not be reached, or the
    /// exchange broke off midway.
    #[error("network error: {message}")]
    Transport { message: String },
    /// `/convert` answered with a failure status.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// Reading a picked file or saving the artifact failed on this machine.
    #[error("{message}")]
    Local { message: String },
    #[error("conversion cancelled")]
    Cancelled,
}
