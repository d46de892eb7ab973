//! Configuration constants and settings for the converter.

use crate::error::ConfigError;
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Extension of the drawings picked up from the input folder.
pub const DEFAULT_EXTENSION: &str = "dwg";

/// Extension given to the exported files.
pub const OUTPUT_EXTENSION: &str = "pdf";

/// Attempts per retry loop (application start and each drawing).
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Pause between attempts in milliseconds.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 2000;

/// Plot configuration used for the PDF export.
pub const DEFAULT_PLOT_PROFILE: &str = "DWG To PDF.pc3";

/// Program identifier of the drawing application.
pub const DEFAULT_PROG_ID: &str = "AutoCAD.Application.24";

/// Plotter executable used by the command backend.
pub const DEFAULT_PLOTTER: &str = "dwgplot";

/// Exit code with which the plotter reports that the application was busy (EX_TEMPFAIL).
pub const DEFAULT_BUSY_EXIT_CODE: i32 = 75;

/// Settings of the command-line plotter backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotterConfig {
    /// Executable to run for each export.
    pub command: PathBuf,
    /// Argument template; `{input}`, `{output}`, `{profile}` and `{prog_id}` are substituted.
    pub args: Vec<String>,
    /// Exit code treated as "application busy".
    pub busy_exit_code: i32,
}

impl Default for PlotterConfig {
    fn default() -> Self {
        Self {
            command: PathBuf::from(DEFAULT_PLOTTER),
            args: default_plotter_args(),
            busy_exit_code: DEFAULT_BUSY_EXIT_CODE,
        }
    }
}

fn default_plotter_args() -> Vec<String> {
    ["{input}", "{output}", "--profile", "{profile}"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Batch configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Folder holding the drawings.
    pub input_dir: Option<PathBuf>,
    /// Extension filter, without the leading dot.
    pub extension: String,
    /// Attempts per retry loop.
    pub max_retries: u32,
    /// Pause between attempts in milliseconds.
    pub retry_delay_ms: u64,
    /// Named plot configuration handed to the export call.
    pub plot_profile: String,
    /// Program identifier used to start the application.
    pub prog_id: String,
    /// Command backend settings.
    pub plotter: PlotterConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: None,
            extension: DEFAULT_EXTENSION.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            plot_profile: DEFAULT_PLOT_PROFILE.to_string(),
            prog_id: DEFAULT_PROG_ID.to_string(),
            plotter: PlotterConfig::default(),
        }
    }
}

impl Config {
    /// Create a configuration for the given folder with default settings.
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: Some(input_dir.into()),
            ..Default::default()
        }
    }

    /// Load a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check the settings and return the input folder.
    pub fn validate(&self) -> Result<&Path, ConfigError> {
        if self.max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_retries".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if normalize_extension(&self.extension).is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "extension".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if self.plot_profile.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "plot_profile".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        for placeholder in ["{input}", "{output}"] {
            if !self.plotter.args.iter().any(|arg| arg.contains(placeholder)) {
                return Err(ConfigError::InvalidValue {
                    field: "plotter.args".to_string(),
                    message: format!("must contain the {} placeholder", placeholder),
                });
            }
        }

        self.input_dir
            .as_deref()
            .ok_or(ConfigError::MissingInputDir)
    }

    /// Retry policy shared by the start-up and per-drawing loops.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.retry_delay_ms),
        )
    }

    /// Extension filter without a leading dot.
    pub fn extension(&self) -> &str {
        normalize_extension(&self.extension)
    }
}

fn normalize_extension(ext: &str) -> &str {
    ext.trim().trim_start_matches('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.extension, "dwg");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_delay_ms, 2000);
        assert_eq!(config.plot_profile, "DWG To PDF.pc3");
        assert_eq!(config.prog_id, "AutoCAD.Application.24");
        assert_eq!(config.plotter.busy_exit_code, 75);
        assert!(config.input_dir.is_none());
    }

    #[test]
    fn test_validate_requires_input_dir() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingInputDir)
        ));

        let config = Config::new("drawings");
        assert_eq!(config.validate().unwrap(), Path::new("drawings"));
    }

    #[test]
    fn test_validate_rejects_zero_retries() {
        let config = Config {
            max_retries: 0,
            ..Config::new("drawings")
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "max_retries"
        ));
    }

    #[test]
    fn test_validate_rejects_plotter_args_without_placeholders() {
        let mut config = Config::new("drawings");
        config.plotter.args = Vec::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "plotter.args"
        ));

        config.plotter.args = vec!["--in={input}".to_string()];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref message, .. }) if message.contains("{output}")
        ));

        config.plotter.args = vec!["--in={input}".to_string(), "--out={output}".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_extension_strips_dot() {
        let config = Config {
            extension: ".DWG".to_string(),
            ..Default::default()
        };
        assert_eq!(config.extension(), "DWG");
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = Config {
            max_retries: 3,
            retry_delay_ms: 250,
            ..Default::default()
        };
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_millis(250));
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "input_dir": "C:/plots", "max_retries": 2, "plotter": {{ "busy_exit_code": 9 }} }}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.input_dir, Some(PathBuf::from("C:/plots")));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.retry_delay_ms, DEFAULT_RETRY_DELAY_MS);
        assert_eq!(config.plotter.busy_exit_code, 9);
        assert_eq!(config.plotter.command, PathBuf::from(DEFAULT_PLOTTER));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Config::load(Path::new("/nonexistent/dwg-plot.json")),
            Err(ConfigError::Read { .. })
        ));
    }
}
