use crate::{AddOutcome, ConvertMode, LastResult, ProgressStage, SubmissionState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub files: Vec<FileRowView>,
    pub file_count: usize,
    /// `None` while no files are selected.
    pub options: Option<OptionsView>,
    pub quality: u8,
    pub convert_enabled: bool,
    pub submission: SubmissionState,
    pub progress: Option<ProgressView>,
    pub last_result: Option<LastResult>,
    pub last_add: Option<AddOutcome>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub index: usize,
    pub name: String,
    pub size_label: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsView {
    pub mode_choice_offered: bool,
    pub mode: ConvertMode,
    pub base_name: String,
    pub extension: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressView {
    pub stage: ProgressStage,
    pub percent: u8,
    pub label: &'static str,
}

impl From<ProgressStage> for ProgressView {
    fn from(stage: ProgressStage) -> Self {
        Self {
            stage,
            percent: stage.percent(),
            label: stage.label(),
        }
    }
}

/// Human-readable size in 1024 steps, at most two decimals (`1.5 KB`).
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    while unit + 1 < UNITS.len() && bytes >= 1024u64.pow(unit as u32 + 1) {
        unit += 1;
    }
    let value = bytes as f64 / 1024f64.powi(unit as i32);
    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}
