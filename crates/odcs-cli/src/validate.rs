//! # `odcs validate`
//!
//! Loads a contract, resolves the ODCS schema, and prints a path-annotated
//! report. Load and resolution failures go to stderr as `ERROR: <message>`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use odcs_schema::{
    locate_and_validate, ContractError, LocatorConfig, Report, SchemaLocator, EXIT_INVALID,
};

/// Arguments for `odcs validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Contract file to validate (YAML or JSON).
    pub contract: PathBuf,

    /// Schema to validate against, as a local path or an http(s) URL.
    ///
    /// When omitted, `schema/odcs-json-schema-v3.1.0.json` and then
    /// `schema/odcs-json-schema-latest.json` are tried before the published
    /// ODCS schema is downloaded.
    #[arg(short, long, value_name = "PATH-OR-URL")]
    pub schema: Option<String>,
}

/// Execute `odcs validate` with configuration taken from the environment.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let config = LocatorConfig::from_env().context("reading schema locator configuration")?;
    let locator = SchemaLocator::with_http(config);
    Ok(validate_with(args, &locator))
}

/// Validate `args.contract` using an already-configured locator.
pub fn validate_with(args: &ValidateArgs, locator: &SchemaLocator) -> u8 {
    println!("Validating: {}", args.contract.display());

    match check(args, locator) {
        Ok(report) => {
            println!("{report}");
            report.exit_code
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            EXIT_INVALID
        }
    }
}

fn check(args: &ValidateArgs, locator: &SchemaLocator) -> Result<Report, ContractError> {
    let outcome = locate_and_validate(&args.contract, locator, args.schema.as_deref())?;
    Ok(Report::from_outcome(&outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use odcs_schema::{FetchError, SchemaFetcher, EXIT_VALID};
    use url::Url;

    const SCHEMA: &str = r#"{
        "type": "object",
        "required": ["apiVersion", "kind", "status"],
        "properties": {
            "kind": {"enum": ["DataContract"]}
        }
    }"#;

    fn offline_locator(root: &Path, fetches: Arc<AtomicUsize>) -> SchemaLocator {
        let fetcher: Arc<dyn SchemaFetcher> =
            Arc::new(move |url: &Url| -> Result<Vec<u8>, FetchError> {
                fetches.fetch_add(1, Ordering::SeqCst);
                Err(FetchError::Status {
                    url: url.clone(),
                    status: 503,
                })
            });
        let mut config = LocatorConfig::odcs_defaults().unwrap();
        config.base_dir = root.to_path_buf();
        SchemaLocator::new(config, fetcher)
    }

    fn args(contract: PathBuf, schema: Option<&Path>) -> ValidateArgs {
        ValidateArgs {
            contract,
            schema: schema.map(|p| p.display().to_string()),
        }
    }

    #[test]
    fn valid_contract_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("s.json");
        std::fs::write(&schema, SCHEMA).unwrap();
        let contract = dir.path().join("c.yaml");
        std::fs::write(&contract, "apiVersion: v3.1.0\nkind: DataContract\nstatus: draft\n")
            .unwrap();

        let locator = offline_locator(dir.path(), Arc::default());
        assert_eq!(validate_with(&args(contract, Some(&schema)), &locator), EXIT_VALID);
    }

    #[test]
    fn invalid_contract_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("s.json");
        std::fs::write(&schema, SCHEMA).unwrap();
        let contract = dir.path().join("c.yaml");
        std::fs::write(&contract, "apiVersion: v3.1.0\nkind: Other\n").unwrap();

        let locator = offline_locator(dir.path(), Arc::default());
        assert_eq!(validate_with(&args(contract, Some(&schema)), &locator), EXIT_INVALID);
    }

    #[test]
    fn missing_contract_does_not_touch_network() {
        let dir = tempfile::tempdir().unwrap();
        let fetches = Arc::new(AtomicUsize::new(0));
        let locator = offline_locator(dir.path(), fetches.clone());

        let code = validate_with(&args(dir.path().join("absent.yaml"), None), &locator);
        assert_eq!(code, EXIT_INVALID);
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unresolvable_schema_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let contract = dir.path().join("c.yaml");
        std::fs::write(&contract, "kind: DataContract\n").unwrap();
        let fetches = Arc::new(AtomicUsize::new(0));
        let locator = offline_locator(dir.path(), fetches.clone());

        assert_eq!(validate_with(&args(contract, None), &locator), EXIT_INVALID);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_explicit_schema_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let contract = dir.path().join("c.yaml");
        std::fs::write(&contract, "kind: DataContract\n").unwrap();
        let locator = offline_locator(dir.path(), Arc::default());

        let missing = dir.path().join("nope.json");
        assert_eq!(
            validate_with(&args(contract, Some(&missing)), &locator),
            EXIT_INVALID
        );
    }
}
