//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//! built-in defaults, then a TOML file, then `TWINFIND_*` environment
//! variables, then command-line flags.
//!
//! The TOML file is the one given with `--config`, or `config.toml` in the
//! platform configuration directory if it exists.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, OutputFormat};
use crate::scanner::{DigestAlgorithm, BUFFER_SIZE};

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "TWINFIND_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum file size in bytes.
    pub min_size: u64,
    /// Exclusion regex fragments.
    pub exclude: Vec<String>,
    /// Digest algorithm for groups of three or more files.
    pub digest: DigestAlgorithm,
    /// Read buffer size per stream, in bytes.
    pub buffer_size: usize,
    /// Minimum milliseconds between progress updates.
    pub progress_interval_ms: u64,
    /// Result output format.
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_size: 1,
            exclude: Vec::new(),
            digest: DigestAlgorithm::default(),
            buffer_size: BUFFER_SIZE,
            progress_interval_ms: 200,
            output: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Load defaults, the config file and the environment, then apply CLI flags.
    ///
    /// # Errors
    ///
    /// Fails if the explicitly given config file does not exist, or if any
    /// layer holds a value of the wrong type.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match cli.config {
            Some(ref path) => {
                if !path.is_file() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Some(path.clone())
            }
            None => Self::default_path().filter(|p| p.is_file()),
        };

        let mut config = Self::figment(file.as_deref())
            .extract::<Self>()
            .context("Invalid configuration")?;
        config.apply_cli(cli)?;
        Ok(config)
    }

    /// The layered figment without CLI overrides.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            log::debug!("Loading config from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Override settings with flags given on the command line.
    ///
    /// Exclusion fragments from the command line are added to the configured ones.
    ///
    /// # Errors
    ///
    /// Fails if the buffer size does not fit in memory addressing.
    pub fn apply_cli(&mut self, cli: &Cli) -> Result<()> {
        if let Some(min_size) = cli.min_size {
            self.min_size = min_size;
        }
        self.exclude.extend(cli.exclude.iter().cloned());
        if let Some(digest) = cli.digest {
            self.digest = digest;
        }
        if let Some(buffer_size) = cli.buffer_size {
            self.buffer_size = usize::try_from(buffer_size)
                .with_context(|| format!("Buffer size is too large: {buffer_size}"))?;
        }
        if let Some(output) = cli.output {
            self.output = output;
        }
        Ok(())
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "twinfind").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
