use crate::{ConvertMode, Quality, SourceFile, SubmissionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Reset the pick mechanism so the same file can be picked again.
    ResetFilePicker,
    Submit {
        submission_id: SubmissionId,
        request: ConversionRequest,
    },
    CancelSubmission { submission_id: SubmissionId },
    /// Show a message to the user.
    Alert(String),
}

/// Snapshot of everything one `POST /convert` carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub files: Vec<SourceFile>,
    pub mode: ConvertMode,
    /// Sanitized, trimmed and never empty.
    pub filename: String,
    pub quality: Quality,
}

impl ConversionRequest {
    pub fn convert_type(&self) -> &'static str {
        self.mode.as_str()
    }
}
