use crate::options::display_extension;
use crate::view_model::{format_file_size, AppViewModel, FileRowView, OptionsView, ProgressView};
use crate::{
    submission_filename, AddOutcome, ConversionOptions, ConversionRequest, ConvertMode, FileSet,
    IndexError, Quality, SourceFile, SubmissionFailure, ValidationError,
};

pub type SubmissionId = u64;

/// `Succeeded` and `Failed` behave like `Idle` for every guard; they only
/// keep the outcome visible until the next user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

impl SubmissionState {
    pub fn is_idle(self) -> bool {
        !matches!(self, SubmissionState::InFlight)
    }
}

/// Advisory progress checkpoints. The client cannot see server-side progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProgressStage {
    Preparing,
    Uploading,
    Converting,
    PreparingDownload,
    Done,
}

impl ProgressStage {
    pub fn percent(self) -> u8 {
        match self {
            ProgressStage::Preparing => 0,
            ProgressStage::Uploading => 30,
            ProgressStage::Converting => 60,
            ProgressStage::PreparingDownload => 90,
            ProgressStage::Done => 100,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProgressStage::Preparing => "preparing",
            ProgressStage::Uploading => "uploading",
            ProgressStage::Converting => "converting",
            ProgressStage::PreparingDownload => "preparing download",
            ProgressStage::Done => "done",
        }
    }
}

/// Where a finished artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    pub filename: String,
    pub location: String,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastResult {
    Saved(SavedArtifact),
    Failed(String),
}

/// Per-session policies chosen by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSettings {
    /// Empty the file set after an artifact was saved.
    pub clear_after_success: bool,
    pub default_quality: Quality,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    files: FileSet,
    options: ConversionOptions,
    settings: SessionSettings,
    submission: SubmissionState,
    in_flight: Option<SubmissionId>,
    last_submission_id: SubmissionId,
    progress: Option<ProgressStage>,
    last_result: Option<LastResult>,
    last_add: Option<AddOutcome>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: SessionSettings) -> Self {
        Self {
            options: ConversionOptions::with_quality(settings.default_quality),
            settings,
            ..Self::default()
        }
    }

    pub fn files(&self) -> &FileSet {
        &self.files
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    pub fn submission(&self) -> SubmissionState {
        self.submission
    }

    pub fn in_flight_id(&self) -> Option<SubmissionId> {
        self.in_flight
    }

    pub fn view(&self) -> AppViewModel {
        let file_count = self.files.len();
        let files = self
            .files
            .iter()
            .enumerate()
            .map(|(index, file)| FileRowView {
                index,
                name: file.name.clone(),
                size_label: format_file_size(file.byte_size),
                mime_type: file.mime_type.clone(),
            })
            .collect();
        let options = (file_count > 0).then(|| OptionsView {
            mode_choice_offered: file_count > 1,
            mode: self.options.mode(),
            base_name: self.options.base_name().to_string(),
            extension: display_extension(self.options.mode(), file_count),
        });

        AppViewModel {
            files,
            file_count,
            options,
            quality: self.options.quality().get(),
            convert_enabled: file_count > 0 && self.submission.is_idle(),
            submission: self.submission,
            progress: self.progress.map(ProgressView::from),
            last_result: self.last_result.clone(),
            last_add: self.last_add,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub(crate) fn add_files(
        &mut self,
        candidates: Vec<SourceFile>,
    ) -> Result<AddOutcome, ValidationError> {
        let outcome = self.files.add(candidates)?;
        self.last_add = Some(outcome);
        self.options.rederive(&self.files);
        self.hide_result();
        self.dirty = true;
        Ok(outcome)
    }

    pub(crate) fn remove_file(&mut self, index: usize) -> Result<SourceFile, IndexError> {
        let removed = self.files.remove(index)?;
        self.options.rederive(&self.files);
        self.dirty = true;
        Ok(removed)
    }

    pub(crate) fn clear_files(&mut self) {
        self.files.clear();
        self.last_add = None;
        self.options.rederive(&self.files);
        self.hide_result();
        self.dirty = true;
    }

    /// A refused mode choice leaves the state clean.
    pub(crate) fn select_mode(&mut self, mode: ConvertMode) {
        if self.options.select_mode(mode, self.files.len()) {
            self.dirty = true;
        }
    }

    pub(crate) fn options_mut(&mut self) -> &mut ConversionOptions {
        self.dirty = true;
        &mut self.options
    }

    /// Move to `InFlight` and return the request snapshot. `None` when the
    /// set is empty or a submission is already outstanding.
    pub(crate) fn begin_submission(&mut self) -> Option<(SubmissionId, ConversionRequest)> {
        if self.is_in_flight() || self.files.is_empty() {
            return None;
        }
        self.last_submission_id += 1;
        let id = self.last_submission_id;
        let request = ConversionRequest {
            files: self.files.as_slice().to_vec(),
            mode: self.options.mode(),
            filename: submission_filename(self.options.base_name()),
            quality: self.options.quality(),
        };
        self.in_flight = Some(id);
        self.submission = SubmissionState::InFlight;
        self.progress = Some(ProgressStage::Preparing);
        self.last_result = None;
        self.dirty = true;
        Some((id, request))
    }

    pub(crate) fn apply_progress(&mut self, id: SubmissionId, stage: ProgressStage) -> bool {
        if self.in_flight != Some(id) {
            return false;
        }
        self.progress = Some(stage);
        self.dirty = true;
        true
    }

    pub(crate) fn complete_submission(&mut self, id: SubmissionId, saved: SavedArtifact) -> bool {
        if self.in_flight != Some(id) {
            return false;
        }
        self.in_flight = None;
        self.submission = SubmissionState::Succeeded;
        self.progress = Some(ProgressStage::Done);
        self.last_result = Some(LastResult::Saved(saved));
        if self.settings.clear_after_success {
            self.files.clear();
            self.last_add = None;
            self.options.rederive(&self.files);
        }
        self.dirty = true;
        true
    }

    pub(crate) fn fail_submission(&mut self, id: SubmissionId, failure: &SubmissionFailure) -> bool {
        if self.in_flight != Some(id) {
            return false;
        }
        self.in_flight = None;
        self.submission = SubmissionState::Failed;
        self.progress = None;
        self.last_result = Some(LastResult::Failed(failure.to_string()));
        self.dirty = true;
        true
    }

    /// Hide the progress/result panel and fall back to `Idle`.
    pub(crate) fn hide_result(&mut self) {
        if self.is_in_flight() {
            return;
        }
        if self.submission != SubmissionState::Idle
            || self.progress.is_some()
            || self.last_result.is_some()
        {
            self.dirty = true;
        }
        self.submission = SubmissionState::Idle;
        self.progress = None;
        self.last_result = None;
    }
}
