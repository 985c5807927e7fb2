//! Settings file support.
//!
//! Settings live in `settings.toml` inside the platform config directory:
//! - macOS: ~/Library/Application Support/dev.data-sweeper.Data-Sweeper/
//! - Windows: %APPDATA%/data-sweeper/Data Sweeper/config/
//! - Linux: ~/.config/datasweeper/
//!
//! `--config <PATH>` points at another file. Command-line flags override
//! whatever the file sets.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use sweep_model::{ExportFormat, MissingValuePolicy};
use sweep_report::DEFAULT_BINS;

const APP_QUALIFIER: &str = "dev";
const APP_ORG: &str = "data-sweeper";
const APP_NAME: &str = "Data Sweeper";
const CONFIG_FILENAME: &str = "settings.toml";

pub const DEFAULT_PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cleaning: CleaningSettings,
    pub export: ExportSettings,
    pub display: DisplaySettings,
    pub charts: ChartSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningSettings {
    pub missing: MissingValuePolicy,
    pub remove_duplicates: bool,
}

impl Default for CleaningSettings {
    fn default() -> Self {
        Self {
            missing: MissingValuePolicy::default(),
            remove_duplicates: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub format: ExportFormat,
    /// Relative paths resolve against the working directory.
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub preview_rows: usize,
    /// Cleaned rows printed after cleaning; unset prints every row.
    pub show_rows: Option<usize>,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            show_rows: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub bins: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self { bins: DEFAULT_BINS }
    }
}

/// Path of the per-user settings file.
///
/// Returns `None` if the platform-specific directory cannot be determined.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load settings from `explicit`, or from [`settings_path`] when `None`.
///
/// Falls back to defaults when the file is missing, unreadable or invalid.
pub fn load_settings(explicit: Option<&Path>) -> Settings {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match settings_path() {
            Some(path) => path,
            None => {
                tracing::warn!("could not determine settings path, using defaults");
                return Settings::default();
            }
        },
    };
    read_settings(&path)
}

fn read_settings(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(content) => match parse_settings(&content) {
            Ok(settings) => {
                tracing::info!(path = %path.display(), "loaded settings");
                settings
            }
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    "failed to parse settings file: {error}, using defaults"
                );
                Settings::default()
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            Settings::default()
        }
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                "failed to read settings file: {error}, using defaults"
            );
            Settings::default()
        }
    }
}

pub fn parse_settings(content: &str) -> Result<Settings, toml::de::Error> {
    toml::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.cleaning.remove_duplicates);
        assert_eq!(settings.display.preview_rows, 5);
        assert_eq!(settings.display.show_rows, None);
        assert_eq!(settings.charts.bins, 20);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings = parse_settings(
            r#"
            [cleaning]
            missing = "fill-mean"

            [export]
            format = "excel"
            output_dir = "out"
            "#,
        )
        .unwrap();
        assert_eq!(settings.cleaning.missing, MissingValuePolicy::FillMean);
        assert!(settings.cleaning.remove_duplicates);
        assert_eq!(settings.export.format, ExportFormat::Excel);
        assert_eq!(settings.export.output_dir, Some(PathBuf::from("out")));
        assert_eq!(settings.charts.bins, DEFAULT_BINS);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(parse_settings("[cleaning]\nmissing = \"guess\"\n").is_err());
    }

    #[test]
    fn default_settings_round_trip() {
        let settings = Settings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        assert_eq!(parse_settings(&text).unwrap(), settings);
    }
}
