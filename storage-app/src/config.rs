// SPDX-License-Identifier: GPL-3.0-only

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use storage_contracts::OperationKind;
use thiserror::Error;

use crate::utils::segments::LayoutPolicy;

pub const APP_NAME: &str = "diskmap";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const API_URL_ENV: &str = "DISKMAP_API_URL";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LoggingLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Which mutations this deployment exposes.
///
/// Read-only deployments show the same layout but refuse every mutation
/// before it reaches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// Create, format and delete partitions
    pub partition_mutation: bool,
    /// Assemble RAID arrays
    pub raid_creation: bool,
    /// Offer trailing free space as a create-partition target
    pub free_space_interactive: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            partition_mutation: true,
            raid_creation: false,
            free_space_interactive: true,
        }
    }
}

impl Capabilities {
    pub fn read_only() -> Self {
        Self {
            partition_mutation: false,
            raid_creation: false,
            free_space_interactive: false,
        }
    }

    pub fn full() -> Self {
        Self {
            partition_mutation: true,
            raid_creation: true,
            free_space_interactive: true,
        }
    }

    pub fn allows(&self, operation: OperationKind) -> bool {
        match operation {
            OperationKind::CreatePartition => {
                self.partition_mutation && self.free_space_interactive
            }
            OperationKind::FormatPartition | OperationKind::DeletePartition => {
                self.partition_mutation
            }
            OperationKind::CreateRaid => self.raid_creation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub capabilities: Capabilities,
    pub layout: LayoutPolicy,
    pub log_level: LoggingLevel,
    pub log_to_disk: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 30,
            capabilities: Capabilities::default(),
            layout: LayoutPolicy::default(),
            log_level: LoggingLevel::Info,
            log_to_disk: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// tried and a missing file yields defaults. The API URL from the file
    /// is replaced by `DISKMAP_API_URL`, and both by `cli_api_url`.
    pub fn load(explicit: Option<&Path>, cli_api_url: Option<String>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::read(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path)?,
                _ => Self::default(),
            },
        };

        if let Some(url) = api_url_override(std::env::var_os(API_URL_ENV), cli_api_url) {
            config.api_base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `$XDG_CONFIG_HOME/diskmap/config.toml`, else `~/.config/diskmap/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join(APP_NAME).join("config.toml"));
        }

        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join(APP_NAME)
                .join("config.toml")
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api_base_url must not be empty".into()));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.layout.min_visible_fraction) {
            return Err(ConfigError::Invalid(
                "layout.min_visible_fraction must be between 0 and 1".into(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// URL that replaces the configured one: the command line first, then the
/// environment. Empty values count as unset.
fn api_url_override(env: Option<OsString>, cli: Option<String>) -> Option<String> {
    cli.filter(|url| !url.trim().is_empty()).or_else(|| {
        env.map(|url| url.to_string_lossy().into_owned())
            .filter(|url| !url.trim().is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage_types::MIB;

    #[test]
    fn empty_file_is_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.layout.free_space_threshold_bytes, 50 * MIB);
        assert!(!config.capabilities.raid_creation);
    }

    #[test]
    fn read_only_deployment_from_toml() {
        let config = Config::from_toml_str(
            r#"
            api_base_url = "http://nas.local:8080"
            log_level = "debug"

            [capabilities]
            partition_mutation = false
            free_space_interactive = false

            [layout]
            free_space_threshold_bytes = 1048576
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "http://nas.local:8080");
        assert_eq!(config.log_level, LoggingLevel::Debug);
        assert_eq!(config.capabilities, Capabilities::read_only());
        assert_eq!(config.layout.free_space_threshold_bytes, MIB);
        assert_eq!(config.layout.min_visible_fraction, 0.01);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            Config::from_toml_str("request_timeout_secs = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[layout]\nmin_visible_fraction = 2.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml_str("log_level = \"loud\""),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn capability_gating_per_operation() {
        let caps = Capabilities::default();
        assert!(caps.allows(OperationKind::CreatePartition));
        assert!(caps.allows(OperationKind::DeletePartition));
        assert!(!caps.allows(OperationKind::CreateRaid));

        let read_only = Capabilities::read_only();
        for kind in [
            OperationKind::CreatePartition,
            OperationKind::FormatPartition,
            OperationKind::DeletePartition,
            OperationKind::CreateRaid,
        ] {
            assert!(!read_only.allows(kind));
        }

        let no_free_target = Capabilities {
            free_space_interactive: false,
            ..Capabilities::full()
        };
        assert!(!no_free_target.allows(OperationKind::CreatePartition));
        assert!(no_free_target.allows(OperationKind::FormatPartition));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/diskmap.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn env_url_overrides_file() {
        assert_eq!(
            api_url_override(Some("http://env:5000".into()), None),
            Some("http://env:5000".to_string())
        );
    }

    #[test]
    fn no_override_keeps_file_url() {
        assert_eq!(api_url_override(None, None), None);
        assert_eq!(api_url_override(Some("".into()), None), None);
    }

    #[test]
    fn cli_url_beats_env() {
        assert_eq!(
            api_url_override(Some("http://env:5000".into()), Some("http://cli:6000".into())),
            Some("http://cli:6000".to_string())
        );
        assert_eq!(
            api_url_override(Some("http://env:5000".into()), Some(" ".into())),
            Some("http://env:5000".to_string())
        );
    }

    #[test]
    fn cli_url_replaces_url_from_file() {
        let path = std::env::temp_dir().join(format!("diskmap-config-{}.toml", std::process::id()));
        std::fs::write(&path, "api_base_url = \"http://file:5000\"\n").unwrap();

        let loaded = Config::load(Some(path.as_path()), Some("http://cli:6000".to_string()));
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.unwrap().api_base_url, "http://cli:6000");
    }
}
