//! # odcs-schema: ODCS Contract Validation
//!
//! Validates Open Data Contract Standard (ODCS) documents against the ODCS
//! JSON Schema and renders path-annotated reports.
//!
//! ## Pipeline
//!
//! 1. [`SchemaLocator`] picks one schema source: an explicit path or URL,
//!    a conventional local path, or the canonical URL downloaded into a
//!    scoped temporary file. Sources are configured through
//!    [`LocatorConfig`], never compiled into the locator.
//! 2. [`validate_contract`] parses the YAML contract, loads the schema
//!    through the [`SchemaSource`] trait, and collects every violation
//!    (Draft 2019-09, format assertions on).
//! 3. [`Report`] renders `[path] message` lines and picks the exit code.
//!
//! ## Errors
//!
//! [`ResolutionError`] and [`LoadError`] abort a run. A non-conforming
//! contract is not an error: it is a [`ValidationOutcome`] with violations.

pub mod config;
pub mod error;
pub mod locator;
pub mod outcome;
pub mod parse;
pub mod report;
pub mod source;
pub mod validate;

// Re-export primary types for ergonomic imports.
pub use config::{
    ConfigError, LocatorConfig, DEFAULT_LOCAL_CANDIDATES, DEFAULT_SCHEMA_URL, ENV_FETCH_TIMEOUT_SECS,
    ENV_SCHEMA_PATHS, ENV_SCHEMA_URL,
};
pub use error::{ContractError, FetchError, LoadError, ResolutionError};
pub use locator::{Resolution, ResolvedSchema, SchemaLocator};
pub use outcome::{PathSegment, ValidationOutcome, Violation};
pub use report::{render_path, render_violation, Report, EXIT_INVALID, EXIT_VALID, ROOT_SENTINEL};
pub use source::{
    DownloadedSchema, HttpFetcher, LocalSchemaFile, RemoteSchema, SchemaFetcher, SchemaSource,
};
pub use validate::{load_contract, locate_and_validate, validate_contract, ContractValidator};
