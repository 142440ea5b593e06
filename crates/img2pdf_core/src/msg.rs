use crate::{ConvertMode, ProgressStage, SavedArtifact, SourceFile, SubmissionFailure, SubmissionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked or dropped files.
    FilesPicked(Vec<SourceFile>),
    /// User removed the file at this position of the current order.
    RemoveFileClicked(usize),
    /// User clicked Clear.
    ClearClicked,
    /// User chose merged or individual output.
    ModeSelected(ConvertMode),
    /// User edited the output name box (raw text, sanitized on arrival).
    BaseNameEdited(String),
    /// User moved the quality slider.
    QualityChanged(u8),
    /// User clicked Convert.
    ConvertClicked,
    /// User asked to abandon the outstanding conversion.
    CancelClicked,
    /// User dismissed the result panel.
    ResultDismissed,
    /// Engine progress for a submission.
    SubmissionProgress {
        submission_id: SubmissionId,
        stage: ProgressStage,
    },
    /// Engine completion for a submission.
    SubmissionDone {
        submission_id: SubmissionId,
        result: Result<SavedArtifact, SubmissionFailure>,
    },
}
