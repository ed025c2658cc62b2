//! # Contract Validation
//!
//! Runtime validation of ODCS contracts against the ODCS JSON Schema
//! (Draft 2019-09).
//!
//! ## Load vs. Validation Failures
//!
//! A missing or unparsable contract, and a schema that cannot be read,
//! parsed, or compiled, are [`LoadError`]s: the run stops and no verdict is
//! produced. A contract that parses but does not conform is a
//! [`ValidationOutcome`] listing every violation found in one pass.
//!
//! ## `$ref` Resolution
//!
//! References inside the schema (`#/$defs/...`) are resolved by the
//! `jsonschema` crate natively. External references are never fetched
//! during validation; an [`OfflineRetriever`] rejects them so the schema
//! fails to compile with a message naming the URI.

use std::path::Path;

use jsonschema::{Retrieve, Uri, ValidationOptions, Validator};
use serde_json::Value;

use crate::error::{ContractError, LoadError};
use crate::locator::{ResolvedSchema, SchemaLocator};
use crate::outcome::{ValidationOutcome, Violation};
use crate::parse::parse_yaml;

/// Retriever that refuses every external `$ref`.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external reference '{}' is not available offline", uri.as_str()).into())
    }
}

/// A compiled ODCS schema, ready to validate any number of contracts.
pub struct ContractValidator {
    origin: String,
    validator: Validator,
}

impl std::fmt::Debug for ContractValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractValidator")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl ContractValidator {
    /// Compile a parsed schema document.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::SchemaCompile` if the schema is not a valid
    /// Draft 2019-09 schema or references an external document.
    pub fn compile(schema: &Value, origin: impl Into<String>) -> Result<Self, LoadError> {
        let origin = origin.into();
        let validator = build_options()
            .build(schema)
            .map_err(|e| LoadError::SchemaCompile {
                origin: origin.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self { origin, validator })
    }

    /// Load a resolved schema source and compile it.
    pub fn from_resolved(schema: &ResolvedSchema) -> Result<Self, LoadError> {
        let value = schema.load()?;
        Self::compile(&value, schema.origin())
    }

    /// Where the compiled schema came from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Validate an in-memory document, collecting every violation.
    ///
    /// Order follows the validator's traversal of the schema and is stable
    /// for a fixed document and schema.
    pub fn validate_value(&self, instance: &Value) -> ValidationOutcome {
        let violations: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(|e| Violation::from_pointer(instance, &e.instance_path.to_string(), e.to_string()))
            .collect();
        ValidationOutcome::from_violations(violations)
    }

    /// Load a contract file and validate it.
    pub fn validate_file(&self, path: &Path) -> Result<ValidationOutcome, LoadError> {
        let document = load_contract(path)?;
        Ok(self.validate_value(&document))
    }
}

/// Read and parse a contract document.
///
/// # Errors
///
/// - `DocumentNotFound` if `path` does not exist.
/// - `DocumentRead` if it exists but cannot be read.
/// - `InvalidDocument` with the YAML parser diagnostic.
pub fn load_contract(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::DocumentNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::DocumentRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_yaml(&content).map_err(|reason| LoadError::InvalidDocument {
        path: path.to_path_buf(),
        reason,
    })
}

/// Validate the contract at `document_path` against a resolved schema.
///
/// The contract is checked and parsed before the schema is loaded, so a
/// broken contract is reported without touching the network.
pub fn validate_contract(
    document_path: &Path,
    schema: &ResolvedSchema,
) -> Result<ValidationOutcome, LoadError> {
    let document = load_contract(document_path)?;
    validate_loaded(document_path, &document, schema)
}

/// Load the contract, resolve its schema through `locator`, and validate.
///
/// `reference` is the optional user-supplied schema path or URL. The
/// contract is loaded first, so a missing or malformed contract never
/// triggers a schema download.
pub fn locate_and_validate(
    document_path: &Path,
    locator: &SchemaLocator,
    reference: Option<&str>,
) -> Result<ValidationOutcome, ContractError> {
    let document = load_contract(document_path)?;
    let schema = locator.locate(reference)?;
    Ok(validate_loaded(document_path, &document, &schema)?)
}

fn validate_loaded(
    document_path: &Path,
    document: &Value,
    schema: &ResolvedSchema,
) -> Result<ValidationOutcome, LoadError> {
    let validator = ContractValidator::from_resolved(schema)?;

    let outcome = validator.validate_value(document);
    tracing::debug!(
        contract = %document_path.display(),
        schema = validator.origin(),
        violations = outcome.len(),
        "validated contract"
    );
    Ok(outcome)
}

fn build_options() -> ValidationOptions {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft201909);
    opts.should_validate_formats(true);
    opts.with_retriever(OfflineRetriever);
    opts
}
