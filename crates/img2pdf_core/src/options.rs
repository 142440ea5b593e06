use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{FileSet, ValidationError};

/// Characters removed from the output base name on every edit.
pub const FORBIDDEN_NAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Name sent to the service when the base name is blank.
pub const FALLBACK_FILENAME: &str = "converted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvertMode {
    /// One document holding every picked image.
    #[default]
    Merged,
    /// One document per image, bundled into an archive.
    Individual,
}

impl ConvertMode {
    /// Wire value of the `convert_type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            ConvertMode::Merged => "merged",
            ConvertMode::Individual => "individual",
        }
    }
}

impl fmt::Display for ConvertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConvertMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "merged" => Ok(ConvertMode::Merged),
            "individual" => Ok(ConvertMode::Individual),
            other => Err(ValidationError::UnknownMode(other.to_string())),
        }
    }
}

/// JPEG-style quality in `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;
    pub const DEFAULT: Quality = Quality(95);

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::QualityOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Quality {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// Strip every character in [`FORBIDDEN_NAME_CHARS`].
pub fn sanitize_base_name(input: &str) -> String {
    input
        .chars()
        .filter(|c| !FORBIDDEN_NAME_CHARS.contains(c))
        .collect()
}

/// Final `filename` field value: trimmed base name, or the fallback when blank.
pub fn submission_filename(base_name: &str) -> String {
    let trimmed = base_name.trim();
    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Default base name for the current set: the first file's base name, with a
/// `_and_<n>_more` suffix when more than one file is selected.
pub fn default_base_name(files: &FileSet) -> String {
    let Some(first) = files.first() else {
        return String::new();
    };
    let base = sanitize_base_name(first.base_name());
    match files.len() {
        1 => base,
        n => format!("{base}_and_{}_more", n - 1),
    }
}

/// Label-only extension; the saved name is decided from the actual reply.
pub fn display_extension(mode: ConvertMode, file_count: usize) -> &'static str {
    if mode == ConvertMode::Individual && file_count > 1 {
        ".zip"
    } else {
        ".pdf"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversionOptions {
    mode: ConvertMode,
    base_name: String,
    base_name_edited: bool,
    quality: Quality,
}

impl ConversionOptions {
    pub fn with_quality(quality: Quality) -> Self {
        Self {
            quality,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> ConvertMode {
        self.mode
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn base_name_edited(&self) -> bool {
        self.base_name_edited
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Returns `false` when `mode` is not offered for `file_count` files.
    pub(crate) fn select_mode(&mut self, mode: ConvertMode, file_count: usize) -> bool {
        if mode == ConvertMode::Individual && file_count <= 1 {
            return false;
        }
        self.mode = mode;
        true
    }

    /// Stores the sanitized edit; from now on the name no longer follows the set.
    pub(crate) fn edit_base_name(&mut self, raw: &str) {
        self.base_name = sanitize_base_name(raw);
        self.base_name_edited = true;
    }

    pub(crate) fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
    }

    /// Re-derive the fields that follow the file set. Runs after every
    /// add, remove and clear.
    pub(crate) fn rederive(&mut self, files: &FileSet) {
        if files.len() <= 1 {
            self.mode = ConvertMode::Merged;
        }
        if files.is_empty() {
            self.base_name.clear();
            self.base_name_edited = false;
            return;
        }
        if !self.base_name_edited {
            self.base_name = default_base_name(files);
        }
    }
}
