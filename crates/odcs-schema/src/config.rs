//! Schema locator configuration.
//!
//! Holds the canonical ODCS schema URL and the ordered list of conventional
//! local schema paths. Defaults point at ODCS v3.1.0. Override via
//! environment variables or explicit construction for tests.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Default location of the ODCS v3.1.0 JSON Schema.
pub const DEFAULT_SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/bitol-io/open-data-contract-standard/main/schema/odcs-json-schema-v3.1.0.json";

/// Overrides [`DEFAULT_SCHEMA_URL`].
pub const ENV_SCHEMA_URL: &str = "ODCS_SCHEMA_URL";
/// Overrides [`DEFAULT_LOCAL_CANDIDATES`] with an OS path list.
pub const ENV_SCHEMA_PATHS: &str = "ODCS_SCHEMA_PATHS";
/// HTTP timeout for schema downloads, in whole seconds.
pub const ENV_FETCH_TIMEOUT_SECS: &str = "ODCS_FETCH_TIMEOUT_SECS";

/// Conventional project-relative schema locations, probed in this order.
///
/// The pinned version comes before the `latest` alias.
pub const DEFAULT_LOCAL_CANDIDATES: &[&str] = &[
    "schema/odcs-json-schema-v3.1.0.json",
    "schema/odcs-json-schema-latest.json",
];

/// Configuration for [`SchemaLocator`](crate::locator::SchemaLocator).
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    /// Remote schema downloaded when no local candidate exists.
    pub canonical_url: Url,
    /// Conventional local paths, probed in order. Relative entries are
    /// resolved against `base_dir`.
    pub local_candidates: Vec<PathBuf>,
    /// Directory that relative candidates are resolved against.
    pub base_dir: PathBuf,
    /// Optional HTTP timeout. `None` keeps the transport defaults.
    pub fetch_timeout: Option<Duration>,
}

impl LocatorConfig {
    /// Build a configuration with explicit values.
    pub fn new(canonical_url: Url, local_candidates: Vec<PathBuf>, base_dir: PathBuf) -> Self {
        Self {
            canonical_url,
            local_candidates,
            base_dir,
            fetch_timeout: None,
        }
    }

    /// The ODCS v3.1.0 defaults, with candidates resolved against the
    /// current working directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the built-in URL fails to parse.
    pub fn odcs_defaults() -> Result<Self, ConfigError> {
        let canonical_url = Url::parse(DEFAULT_SCHEMA_URL)
            .map_err(|e| ConfigError::InvalidUrl("default schema URL".to_string(), e.to_string()))?;
        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Ok(Self::new(
            canonical_url,
            DEFAULT_LOCAL_CANDIDATES.iter().map(PathBuf::from).collect(),
            base_dir,
        ))
    }

    /// Load configuration from environment variables on top of the defaults.
    ///
    /// Variables:
    /// - `ODCS_SCHEMA_URL` (default: [`DEFAULT_SCHEMA_URL`])
    /// - `ODCS_SCHEMA_PATHS`: candidate paths separated by the platform
    ///   path-list separator (default: [`DEFAULT_LOCAL_CANDIDATES`])
    /// - `ODCS_FETCH_TIMEOUT_SECS` (default: unset, no timeout)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Apply overrides read through `lookup` on top of the defaults.
    ///
    /// `from_env` passes `std::env::var_os`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let mut config = Self::odcs_defaults()?;

        if let Some(raw) = lookup(ENV_SCHEMA_URL) {
            let raw = raw.to_string_lossy();
            config.canonical_url = Url::parse(&raw)
                .map_err(|e| ConfigError::InvalidUrl(ENV_SCHEMA_URL.to_string(), e.to_string()))?;
        }

        if let Some(raw) = lookup(ENV_SCHEMA_PATHS) {
            let paths: Vec<PathBuf> = std::env::split_paths(&raw)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            if !paths.is_empty() {
                config.local_candidates = paths;
            }
        }

        if let Some(raw) = lookup(ENV_FETCH_TIMEOUT_SECS) {
            let raw = raw.to_string_lossy().into_owned();
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config.fetch_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Candidates resolved to absolute paths, in probe order.
    pub fn resolved_candidates(&self) -> Vec<PathBuf> {
        self.local_candidates
            .iter()
            .map(|p| {
                if p.is_absolute() {
                    p.clone()
                } else {
                    self.base_dir.join(p)
                }
            })
            .collect()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("ODCS_FETCH_TIMEOUT_SECS must be a whole number of seconds, got '{0}'")]
    InvalidTimeout(String),
}
