//! # Schema Locator
//!
//! Resolves exactly one schema source per run, first success wins:
//!
//! 1. An explicit reference. `http://`/`https://` means a URL, fetched when
//!    the schema is loaded. Anything else is a local path that must exist.
//!    An explicit reference never falls back to anything else.
//! 2. The configured conventional local paths, in order.
//! 3. The canonical URL, downloaded into a scoped temporary file.
//!
//! Nothing is cached between runs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::config::LocatorConfig;
use crate::error::{LoadError, ResolutionError};
use crate::source::{
    DownloadedSchema, HttpFetcher, LocalSchemaFile, RemoteSchema, SchemaFetcher, SchemaSource,
};

/// How a schema source was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The caller named a local file.
    ExplicitPath,
    /// The caller named a URL.
    ExplicitUrl,
    /// A conventional local path existed.
    Conventional,
    /// The canonical URL was downloaded.
    Canonical,
}

/// The schema source chosen for this run.
#[derive(Debug)]
pub struct ResolvedSchema {
    resolution: Resolution,
    source: Box<dyn SchemaSource>,
}

impl ResolvedSchema {
    pub fn new(resolution: Resolution, source: Box<dyn SchemaSource>) -> Self {
        Self { resolution, source }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn origin(&self) -> String {
        self.source.origin()
    }

    pub fn local_path(&self) -> Option<&Path> {
        self.source.local_path()
    }

    pub fn source(&self) -> &dyn SchemaSource {
        self.source.as_ref()
    }

    /// Read and parse the schema document.
    pub fn load(&self) -> Result<Value, LoadError> {
        self.source.load()
    }
}

/// Resolves a schema source from an optional user reference.
#[derive(Clone)]
pub struct SchemaLocator {
    config: LocatorConfig,
    fetcher: Arc<dyn SchemaFetcher>,
}

impl std::fmt::Debug for SchemaLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaLocator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SchemaLocator {
    pub fn new(config: LocatorConfig, fetcher: Arc<dyn SchemaFetcher>) -> Self {
        Self { config, fetcher }
    }

    /// A locator that downloads over HTTP with the configured timeout.
    pub fn with_http(config: LocatorConfig) -> Self {
        let fetcher = HttpFetcher::new(config.fetch_timeout);
        Self::new(config, Arc::new(fetcher))
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Resolve the schema source for this run.
    ///
    /// # Errors
    ///
    /// - `SchemaNotFound` when an explicit local path does not exist.
    /// - `InvalidUrl` when an explicit `http(s)://` reference does not parse.
    /// - `Unresolved` when no local candidate exists and the canonical
    ///   download fails. The message names the canonical URL.
    pub fn locate(&self, reference: Option<&str>) -> Result<ResolvedSchema, ResolutionError> {
        match reference {
            Some(reference) => self.locate_explicit(reference),
            None => match self.probe_conventional() {
                Some(path) => {
                    tracing::info!(path = %path.display(), "using local schema");
                    Ok(ResolvedSchema::new(
                        Resolution::Conventional,
                        Box::new(LocalSchemaFile::new(path)),
                    ))
                }
                None => self.download_canonical(),
            },
        }
    }

    fn locate_explicit(&self, reference: &str) -> Result<ResolvedSchema, ResolutionError> {
        if is_url(reference) {
            let url = Url::parse(reference).map_err(|e| ResolutionError::InvalidUrl {
                reference: reference.to_string(),
                reason: e.to_string(),
            })?;
            tracing::info!(%url, "using schema URL");
            return Ok(ResolvedSchema::new(
                Resolution::ExplicitUrl,
                Box::new(RemoteSchema::new(url, Arc::clone(&self.fetcher))),
            ));
        }

        let path = PathBuf::from(reference);
        if !path.exists() {
            return Err(ResolutionError::SchemaNotFound { path });
        }
        tracing::info!(path = %path.display(), "using schema file");
        Ok(ResolvedSchema::new(
            Resolution::ExplicitPath,
            Box::new(LocalSchemaFile::new(path)),
        ))
    }

    /// First existing conventional path, absolute.
    fn probe_conventional(&self) -> Option<PathBuf> {
        self.config.resolved_candidates().into_iter().find(|candidate| {
            let exists = candidate.is_file();
            tracing::debug!(path = %candidate.display(), exists, "probing schema candidate");
            exists
        })
    }

    fn download_canonical(&self) -> Result<ResolvedSchema, ResolutionError> {
        let url = &self.config.canonical_url;
        tracing::info!(%url, "no local schema found, downloading");
        match DownloadedSchema::download(url, self.fetcher.as_ref()) {
            Ok(downloaded) => Ok(ResolvedSchema::new(
                Resolution::Canonical,
                Box::new(downloaded),
            )),
            Err(e) => {
                tracing::warn!(%url, error = %e, "could not download schema");
                Err(ResolutionError::Unresolved {
                    canonical_url: url.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

fn is_url(reference: &str) -> bool {
    let lower = reference.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
