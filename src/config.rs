use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for the exif-scrub library.
///
/// Controls input limits, strip behavior, and output handling.
///
/// # Loading
///
/// ```rust,no_run
/// use exif_scrub::config::Config;
///
/// // From a JSON file
/// let config = Config::load(Some("config.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.strip.jpeg_quality = 85;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Input limits enforced before any processing.
    pub limits: Limits,
    /// Strip (re-encode) behavior.
    pub strip: StripConfig,
    /// Output behavior (dry run, output directory).
    pub output: OutputConfig,
}

/// Input limits enforced before any processing begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum input file size in megabytes. Larger files are rejected
    /// with a user-facing message before decoding.
    pub max_file_size_mb: u64,
}

/// Controls the strip-by-re-encode path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripConfig {
    /// JPEG re-encode quality (0–100).
    pub jpeg_quality: u8,
    /// Suffix inserted before the extension of the cleaned copy.
    pub output_suffix: String,
    /// Re-decode the cleaned bytes and count any surviving fields.
    pub verify: bool,
}

/// Output and behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// If `true`, preview the strip without writing any files.
    pub dry_run: bool,
    /// Directory for cleaned copies. `None` writes next to each original.
    pub output_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: Limits {
                max_file_size_mb: 50,
            },
            strip: StripConfig {
                jpeg_quality: crate::exif::strip::JPEG_QUALITY,
                output_suffix: "_cleaned".to_string(),
                verify: true,
            },
            output: OutputConfig {
                dry_run: false,
                output_dir: None,
            },
        }
    }
}

impl Config {
    /// Resolve the config file path — same directory as the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join("config.json"))
    }

    /// Load config from the given path, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::warn!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }
}
