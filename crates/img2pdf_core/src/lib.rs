//! img2pdf core: pure conversion-session state machine and view-model helpers.
mod effect;
mod error;
mod file_set;
mod msg;
mod options;
mod state;
mod update;
mod view_model;

pub use effect::{ConversionRequest, Effect};
pub use error::{IndexError, SubmissionFailure, ValidationError};
pub use file_set::{AddOutcome, FileHandle, FileKey, FileSet, SourceFile};
pub use msg::Msg;
pub use options::{
    default_base_name, display_extension, sanitize_base_name, submission_filename,
    ConversionOptions, ConvertMode, Quality, FALLBACK_FILENAME, FORBIDDEN_NAME_CHARS,
};
pub use state::{
    AppState, LastResult, ProgressStage, SavedArtifact, SessionSettings, SubmissionId,
    SubmissionState,
};
pub use update::update;
pub use view_model::{format_file_size, AppViewModel, FileRowView, OptionsView, ProgressView};
