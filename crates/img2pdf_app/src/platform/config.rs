use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use img2pdf_core::{Quality, SessionSettings};
use img2pdf_engine::ConvertSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILENAME: &str = "img2pdf.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// Contents of `img2pdf.ron`. Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_url: String,
    pub download_dir: PathBuf,
    pub default_quality: Quality,
    pub clear_after_success: bool,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let engine = ConvertSettings::default();
        Self {
            server_url: engine.base_url,
            download_dir: PathBuf::from("."),
            default_quality: Quality::default(),
            clear_after_success: false,
            connect_timeout_secs: engine.connect_timeout.as_secs(),
            request_timeout_secs: engine.request_timeout.as_secs(),
        }
    }
}

impl AppConfig {
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            clear_after_success: self.clear_after_success,
            default_quality: self.default_quality,
        }
    }

    pub fn convert_settings(&self) -> ConvertSettings {
        ConvertSettings {
            base_url: self.server_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..ConvertSettings::default()
        }
    }
}

/// Read the config at `path`; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            engine_info!("No config at {:?}; using defaults", path);
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    engine_info!("Loaded config from {:?}", path);
    Ok(config)
}

/// Like [`load_config`], but a broken file is reported and replaced by defaults.
pub fn load_config_or_default(path: &Path) -> AppConfig {
    match load_config(path) {
        Ok(config) => config,
        Err(err) => {
            engine_warn!("{}; using defaults", err);
            eprintln!("warning: {err}; using defaults");
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(&temp.path().join(CONFIG_FILENAME)).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server_url, "http://localhost:8000");
        assert_eq!(config.default_quality.get(), 95);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"(server_url: "http://convert.local:8080", clear_after_success: true)"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.server_url, "http://convert.local:8080");
        assert!(config.clear_after_success);
        assert_eq!(config.request_timeout_secs, 300);
        assert!(config.session_settings().clear_after_success);
    }

    #[test]
    fn quality_out_of_range_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "(default_quality: 0)").unwrap();

        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert_eq!(load_config_or_default(&path), AppConfig::default());
    }

    #[test]
    fn round_trips_through_ron() {
        let config = AppConfig {
            default_quality: Quality::new(70).unwrap(),
            connect_timeout_secs: 3,
            ..AppConfig::default()
        };
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new()).unwrap();

        assert_eq!(ron::from_str::<AppConfig>(&text).unwrap(), config);
        assert_eq!(
            config.convert_settings().connect_timeout,
            Duration::from_secs(3)
        );
    }
}
