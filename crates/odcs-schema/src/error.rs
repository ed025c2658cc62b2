//! # Error Types
//!
//! Failures that stop a validation run before a [`ValidationOutcome`] can be
//! produced. A contract that merely violates the schema is *not* an error:
//! it is a [`ValidationOutcome`] carrying violations.
//!
//! - [`ResolutionError`]: no usable schema source could be located.
//! - [`LoadError`]: a document or schema exists but could not be read,
//!   parsed, or compiled.
//! - [`FetchError`]: transport-level failure of a remote schema download.
//!
//! [`ValidationOutcome`]: crate::outcome::ValidationOutcome

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Transport failure while downloading a schema over HTTP.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection, TLS, or body read failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status { url: Url, status: u16 },

    /// The downloaded bytes could not be written to a temporary file.
    #[error("could not store downloaded schema: {0}")]
    Io(#[from] std::io::Error),
}

/// No usable schema source could be located.
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// An explicit local schema path was given but does not exist.
    #[error("schema file not found: {}", .path.display())]
    SchemaNotFound { path: PathBuf },

    /// The explicit schema reference looked like a URL but did not parse.
    #[error("invalid schema URL '{reference}': {reason}")]
    InvalidUrl { reference: String, reason: String },

    /// Nothing explicit, no conventional local file, and the canonical
    /// download failed.
    #[error(
        "could not find ODCS JSON schema ({reason}). Use --schema <path-or-url> or download from:\n  {canonical_url}"
    )]
    Unresolved { canonical_url: Url, reason: String },
}

/// A document or schema was located but could not be turned into a tree.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The contract file does not exist.
    #[error("contract file not found: {}", .path.display())]
    DocumentNotFound { path: PathBuf },

    /// The contract file exists but could not be read.
    #[error("cannot read contract {}: {source}", .path.display())]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The contract is not well-formed YAML (or cannot be represented as JSON).
    #[error("invalid YAML in {}: {reason}", .path.display())]
    InvalidDocument { path: PathBuf, reason: String },

    /// The schema file exists but could not be read.
    #[error("cannot read schema {origin}: {source}")]
    SchemaRead {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    /// The remote schema could not be fetched at load time.
    #[error("could not download schema from {origin}: {source}")]
    SchemaFetch {
        origin: String,
        #[source]
        source: FetchError,
    },

    /// The schema is not valid JSON (nor YAML).
    #[error("invalid JSON schema {origin}: {reason}")]
    InvalidSchema { origin: String, reason: String },

    /// The schema parsed but is not a usable Draft 2019-09 schema.
    #[error("schema {origin} could not be compiled: {reason}")]
    SchemaCompile { origin: String, reason: String },
}

/// Any failure that aborts a validation run.
#[derive(Error, Debug)]
pub enum ContractError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Load(#[from] LoadError),
}
