//! # `odcs new`: Scaffold a new ODCS v3.1.0 contract
//!
//! Fills the minimal or full contract template and writes it to a new file.
//! The table name, data product, and display name are derived from the
//! output filename unless supplied on the command line:
//!
//! ```text
//! orders-v2.odcs.yaml  →  table orders_v2, display name "Orders V2"
//! ```
//!
//! Existing files are never overwritten: the file is opened with create-new
//! semantics, so a file that appears between the check and the write is left
//! untouched as well.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use clap::Args;
use thiserror::Error;
use uuid::Uuid;

/// Table name used when the output filename yields no base name.
pub const DEFAULT_TABLE_NAME: &str = "my_table";

/// Value written for fields the author still has to fill in.
pub const PLACEHOLDER: &str = "TODO";

/// Arguments for `odcs new`.
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Output path for the new contract, e.g. `orders.odcs.yaml`.
    pub output: PathBuf,

    /// Data product display name. Derived from the filename when omitted.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Business domain.
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Generate the minimal template (required fields and a single table).
    #[arg(short, long)]
    pub minimal: bool,
}

/// Which template to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Template {
    /// Required fields plus one table with an integer primary key.
    Minimal,
    /// Metadata, description, physical details, and commented optional sections.
    #[default]
    Full,
}

/// Caller-supplied values for a scaffold.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldOptions {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub template: Template,
}

impl From<&NewArgs> for ScaffoldOptions {
    fn from(args: &NewArgs) -> Self {
        Self {
            name: args.name.clone(),
            domain: args.domain.clone(),
            template: if args.minimal {
                Template::Minimal
            } else {
                Template::Full
            },
        }
    }
}

/// Failure to write a scaffolded contract.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("file already exists: {}", .path.display())]
    AlreadyExists { path: PathBuf },

    #[error("cannot create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Names derived from the output filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedNames {
    pub table_name: String,
    pub data_product: String,
    pub display_name: String,
}

/// Derive table, data product, and display names from `output`.
///
/// The base name is the file stem with a trailing `.odcs` removed and `-` or
/// spaces replaced by `_`. An empty base falls back to [`DEFAULT_TABLE_NAME`].
pub fn derive_names(output: &Path) -> DerivedNames {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = stem
        .strip_suffix(".odcs")
        .unwrap_or(&stem)
        .replace(['-', ' '], "_");
    let table_name = if base.is_empty() {
        DEFAULT_TABLE_NAME.to_string()
    } else {
        base
    };

    DerivedNames {
        display_name: title_case(&table_name.replace('_', " ")),
        data_product: table_name.clone(),
        table_name,
    }
}

/// Uppercase the first letter of every run of letters, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Render `value` as a single-line YAML scalar, quoted when needed.
fn yaml_scalar(value: &str) -> String {
    if !value.contains(['\n', '\r']) {
        if let Ok(rendered) = serde_yaml::to_string(value) {
            let rendered = rendered.trim_end();
            if !rendered.contains('\n') {
                return rendered.to_string();
            }
        }
    }
    // A JSON string literal is a valid double-quoted YAML scalar.
    serde_json::Value::String(value.to_string()).to_string()
}

/// Fill the selected template.
pub fn render_contract(
    output: &Path,
    options: &ScaffoldOptions,
    id: Uuid,
    now: DateTime<Utc>,
) -> String {
    let names = derive_names(output);
    let id = yaml_scalar(&id.to_string());
    let table = yaml_scalar(&names.table_name);

    match options.template {
        Template::Minimal => minimal_template(&id, &table),
        Template::Full => {
            let name = options.name.as_deref().unwrap_or(&names.display_name);
            let domain = options.domain.as_deref().unwrap_or(PLACEHOLDER);
            full_template(&FullValues {
                id: &id,
                timestamp: &now.to_rfc3339_opts(SecondsFormat::Secs, true),
                date: &now.format("%Y-%m-%d").to_string(),
                name: &yaml_scalar(name),
                domain: &yaml_scalar(domain),
                data_product: &yaml_scalar(&names.data_product),
                tenant: &yaml_scalar(PLACEHOLDER),
                table: &table,
                table_id: &yaml_scalar(&format!("{}_tbl", names.table_name)),
            })
        }
    }
}

fn minimal_template(id: &str, table: &str) -> String {
    format!(
        "apiVersion: v3.1.0
kind: DataContract
id: {id}
version: 1.0.0
status: draft
schema:
  - name: {table}
    logicalType: object
    description: TODO - Add table description
    properties:
      - name: id
        logicalType: integer
        primaryKey: true
        required: true
        description: Primary key
"
    )
}

/// Already-rendered YAML scalars for the full template.
struct FullValues<'a> {
    id: &'a str,
    timestamp: &'a str,
    date: &'a str,
    name: &'a str,
    domain: &'a str,
    data_product: &'a str,
    tenant: &'a str,
    table: &'a str,
    table_id: &'a str,
}

fn full_template(v: &FullValues<'_>) -> String {
    format!(
        "# ODCS v3.1.0 Data Contract
# Generated: {timestamp}

apiVersion: v3.1.0
kind: DataContract
id: {id}
version: 1.0.0
status: draft

# Metadata
name: {name}
domain: {domain}
dataProduct: {data_product}
tenant: {tenant}
tags: []

description:
  purpose: TODO - Describe the intended use of this data
  limitations: TODO - Document any constraints or limitations
  usage: TODO - Describe recommended usage patterns

# Schema Definition
schema:
  - name: {table}
    id: {table_id}
    logicalType: object
    physicalType: table
    businessName: TODO - Business friendly name
    description: TODO - Add table description
    dataGranularityDescription: TODO - e.g., One row per transaction

    properties:
      - name: id
        id: id_col
        logicalType: integer
        physicalType: bigint
        primaryKey: true
        primaryKeyPosition: 1
        required: true
        unique: true
        description: Unique identifier
        classification: public

      # TODO: Add more columns
      # - name: column_name
      #   logicalType: string|number|integer|date|timestamp|boolean
      #   physicalType: varchar(255)
      #   required: true|false
      #   description: Column description

# Data Quality Rules (optional)
# quality:
#   - type: library
#     metric: rowCount
#     mustBeGreaterThan: 0
#     dimension: completeness
#     severity: error

# Server Configuration (optional)
# servers:
#   - server: my-database
#     type: postgres
#     host: localhost
#     port: 5432
#     database: mydb
#     schema: public
#     environment: dev

# SLA Properties (optional)
# slaProperties:
#   - property: latency
#     value: 24
#     unit: d
#   - property: retention
#     value: 7
#     unit: y

# Team (optional)
# team:
#   name: data-team
#   members:
#     - username: owner@company.com
#       role: Owner
#       dateIn: \"{date}\"

# Roles (optional)
# roles:
#   - role: read_access
#     access: read
#     description: Read access for analytics

# Support Channels (optional)
# support:
#   - channel: \"#data-help\"
#     tool: slack
#     scope: interactive

contractCreatedTs: \"{timestamp}\"
",
        timestamp = v.timestamp,
        id = v.id,
        name = v.name,
        domain = v.domain,
        data_product = v.data_product,
        tenant = v.tenant,
        table = v.table,
        table_id = v.table_id,
        date = v.date,
    )
}

/// Write a new contract to `output`, creating parent directories.
///
/// Returns [`WriteError::AlreadyExists`] without touching the filesystem if
/// `output` exists.
pub fn generate_contract(output: &Path, options: &ScaffoldOptions) -> Result<PathBuf, WriteError> {
    if output.exists() {
        return Err(WriteError::AlreadyExists {
            path: output.to_path_buf(),
        });
    }

    let content = render_contract(output, options, Uuid::new_v4(), Utc::now());

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(output)
        .map_err(|source| match source.kind() {
            io::ErrorKind::AlreadyExists => WriteError::AlreadyExists {
                path: output.to_path_buf(),
            },
            _ => WriteError::Write {
                path: output.to_path_buf(),
                source,
            },
        })?;
    file.write_all(content.as_bytes())
        .map_err(|source| WriteError::Write {
            path: output.to_path_buf(),
            source,
        })?;

    tracing::debug!(path = %output.display(), template = ?options.template, "contract written");
    Ok(output.to_path_buf())
}

/// Execute `odcs new`.
pub fn run_new(args: &NewArgs) -> Result<u8> {
    match generate_contract(&args.output, &ScaffoldOptions::from(args)) {
        Ok(path) => {
            println!("Created contract: {}", path.display());
            Ok(0)
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            Ok(1)
        }
    }
}
