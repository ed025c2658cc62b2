//! # Schema Sources
//!
//! A resolved schema is one of three things: a file on disk, a URL fetched
//! at load time, or a copy of the canonical URL downloaded into a scoped
//! temporary file. All three implement [`SchemaSource`], so the validator
//! never needs to know where the schema came from.
//!
//! Network access goes through [`SchemaFetcher`]. [`HttpFetcher`] is the
//! production implementation; any `Fn(&Url) -> Result<Vec<u8>, FetchError>`
//! closure also implements the trait, which is how tests inject fakes.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tempfile::NamedTempFile;
use url::Url;

use crate::error::{FetchError, LoadError};
use crate::parse::parse_schema_text;

/// Downloads the raw bytes behind a URL.
pub trait SchemaFetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

impl<F> SchemaFetcher for F
where
    F: Fn(&Url) -> Result<Vec<u8>, FetchError> + Send + Sync,
{
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        self(url)
    }
}

/// Blocking HTTP fetcher backed by `reqwest`.
///
/// A single request per call; no retry. Callers re-invoke the command
/// instead.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    timeout: Option<Duration>,
}

impl HttpFetcher {
    /// `None` keeps the transport's default timeout.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl SchemaFetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(FetchError::Client)?;

        tracing::debug!(%url, "fetching schema");
        let response = client
            .get(url.clone())
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;
        Ok(body.to_vec())
    }
}

/// Something a schema document can be loaded from.
pub trait SchemaSource: fmt::Debug {
    /// Human-readable description used in messages and logs.
    fn origin(&self) -> String;

    /// Read and parse the schema.
    fn load(&self) -> Result<Value, LoadError>;

    /// The on-disk file backing this source, if any.
    fn local_path(&self) -> Option<&Path> {
        None
    }
}

/// A schema file on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalSchemaFile {
    path: PathBuf,
}

impl LocalSchemaFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SchemaSource for LocalSchemaFile {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Value, LoadError> {
        load_schema_file(&self.path, &self.origin())
    }

    fn local_path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// A schema fetched over HTTP when loaded.
pub struct RemoteSchema {
    url: Url,
    fetcher: Arc<dyn SchemaFetcher>,
}

impl RemoteSchema {
    pub fn new(url: Url, fetcher: Arc<dyn SchemaFetcher>) -> Self {
        Self { url, fetcher }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Debug for RemoteSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSchema")
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}

impl SchemaSource for RemoteSchema {
    fn origin(&self) -> String {
        self.url.to_string()
    }

    fn load(&self) -> Result<Value, LoadError> {
        let bytes = self
            .fetcher
            .fetch(&self.url)
            .map_err(|source| LoadError::SchemaFetch {
                origin: self.origin(),
                source,
            })?;
        parse_schema_bytes(&bytes, &self.origin())
    }
}

/// The canonical schema, downloaded into a temporary file.
///
/// The file is deleted when this value is dropped, on success and failure
/// paths alike.
#[derive(Debug)]
pub struct DownloadedSchema {
    url: Url,
    file: NamedTempFile,
}

impl DownloadedSchema {
    /// Fetch `url` and store the body in a fresh temporary `.json` file.
    pub fn download(url: &Url, fetcher: &dyn SchemaFetcher) -> Result<Self, FetchError> {
        let bytes = fetcher.fetch(url)?;
        let mut file = tempfile::Builder::new()
            .prefix("odcs-schema-")
            .suffix(".json")
            .tempfile()?;
        file.write_all(&bytes)?;
        file.flush()?;
        tracing::debug!(
            %url,
            path = %file.path().display(),
            bytes = bytes.len(),
            "stored downloaded schema"
        );
        Ok(Self {
            url: url.clone(),
            file,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl SchemaSource for DownloadedSchema {
    fn origin(&self) -> String {
        format!("{} (downloaded)", self.url)
    }

    fn load(&self) -> Result<Value, LoadError> {
        load_schema_file(self.file.path(), &self.origin())
    }

    fn local_path(&self) -> Option<&Path> {
        Some(self.file.path())
    }
}

fn load_schema_file(path: &Path, origin: &str) -> Result<Value, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::SchemaRead {
        origin: origin.to_string(),
        source,
    })?;
    parse_schema_bytes(&bytes, origin)
}

fn parse_schema_bytes(bytes: &[u8], origin: &str) -> Result<Value, LoadError> {
    let text = std::str::from_utf8(bytes).map_err(|e| LoadError::InvalidSchema {
        origin: origin.to_string(),
        reason: format!("not UTF-8: {e}"),
    })?;
    parse_schema_text(text).map_err(|reason| LoadError::InvalidSchema {
        origin: origin.to_string(),
        reason,
    })
}
