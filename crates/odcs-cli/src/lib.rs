//! # odcs-cli: ODCS Data Contract Command-Line Interface
//!
//! Provides the `odcs` binary:
//!
//! - `odcs validate`: Validate a contract against the ODCS JSON Schema.
//! - `odcs new`: Scaffold a new contract from the minimal or full template.
//!
//! ```bash
//! odcs validate orders.odcs.yaml
//! odcs validate orders.odcs.yaml --schema ./schema/odcs-json-schema-v3.1.0.json
//! odcs new orders.odcs.yaml --name "Orders Data" --domain sales
//! odcs new minimal.odcs.yaml --minimal
//! ```
//!
//! Argument parsing lives in `main.rs`; the handlers here return the process
//! exit code so they can be driven directly from tests.

pub mod scaffold;
pub mod validate;
