use crate::config::AppConfig;
use anyhow::{Context, Result, bail};
use bizops::{BatchParams, BizOpsClient, HasCode, compare_records_by_code};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

/// Bulk record updates against the Biz Ops API
#[derive(Debug, Parser)]
#[command(name = "bizops", version, about)]
pub struct Cli {
    /// Configuration file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override: trace, debug, info, warn or error
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or update records from a JSON array file
    Patch {
        /// Biz Ops record type, e.g. Team
        record_type: String,
        /// JSON file holding an array of records
        file: PathBuf,
        /// Validate without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete records listed in a JSON array file of codes or records
    Delete {
        record_type: String,
        file: PathBuf,
        #[arg(long)]
        dry_run: bool,
    },
    /// Compare source records with existing Biz Ops records by code
    Diff {
        /// JSON file holding the source records
        source: PathBuf,
        /// JSON file holding the existing Biz Ops records
        existing: PathBuf,
    },
    /// Run a GraphQL query
    Graphql {
        query: String,
        /// JSON object of query variables
        #[arg(long)]
        variables: Option<String>,
        /// Fail when the response reports any error, even with partial data
        #[arg(long)]
        strict: bool,
    },
    /// Print the effective configuration with secrets hidden
    Config,
}

impl Command {
    /// Whether the command talks to the API and so needs credentials
    pub fn needs_client(&self) -> bool {
        !matches!(self, Command::Diff { .. } | Command::Config)
    }
}

/// Result of a command: what to print and whether it fully succeeded
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub output: String,
    pub success: bool,
}

impl CommandOutput {
    fn json(value: &Value, success: bool) -> Result<Self> {
        Ok(Self {
            output: serde_json::to_string_pretty(value)?,
            success,
        })
    }
}

/// Run a command that does not need the API
pub fn run_offline(command: &Command, config: &AppConfig) -> Result<CommandOutput> {
    match command {
        Command::Diff { source, existing } => {
            let source = records_from(read_json(source)?)?;
            let existing = records_from(read_json(existing)?)?;
            CommandOutput::json(&diff_summary(source, existing), true)
        }
        Command::Config => Ok(CommandOutput {
            output: toml::to_string_pretty(&config.redacted())
                .context("Failed to render configuration")?,
            success: true,
        }),
        other => bail!("{other:?} needs a Biz Ops client"),
    }
}

/// Run a command against the API
pub async fn run_online(command: &Command, client: &BizOpsClient) -> Result<CommandOutput> {
    match command {
        Command::Patch {
            record_type,
            file,
            dry_run,
        } => {
            let records = records_from(read_json(file)?)?;
            log::info!("Patching {} {record_type} records", records.len());

            let report = client
                .batch_patch_records_with(record_type, records, batch_params(*dry_run))
                .await?;
            CommandOutput::json(&serde_json::to_value(&report)?, report.is_complete_success())
        }
        Command::Delete {
            record_type,
            file,
            dry_run,
        } => {
            let codes = codes_from(read_json(file)?)?;
            log::info!("Deleting {} {record_type} records", codes.len());

            let report = client
                .batch_delete_records_with(record_type, codes, batch_params(*dry_run))
                .await?;
            CommandOutput::json(&serde_json::to_value(&report)?, report.is_complete_success())
        }
        Command::Graphql {
            query,
            variables,
            strict,
        } => {
            let variables = variables
                .as_deref()
                .map(serde_json::from_str::<Value>)
                .transpose()
                .context("--variables must be a JSON object")?;

            let data = client
                .graphql()
                .post(query, variables.as_ref(), *strict)
                .await?;
            CommandOutput::json(&data, true)
        }
        other => bail!("{other:?} does not use the Biz Ops API"),
    }
}

fn batch_params(dry_run: bool) -> BatchParams {
    BatchParams { dry_run }
}

/// Read and parse a JSON file
pub fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Records from a JSON array of objects
pub fn records_from(value: Value) -> Result<Vec<Value>> {
    let Value::Array(records) = value else {
        bail!("Expected a JSON array of records");
    };

    if let Some(index) = records.iter().position(|record| !record.is_object()) {
        bail!("Record {index} is not a JSON object");
    }
    Ok(records)
}

/// Codes from a JSON array of code strings or of records with a `code`
pub fn codes_from(value: Value) -> Result<Vec<String>> {
    let Value::Array(items) = value else {
        bail!("Expected a JSON array of codes");
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(code) => Ok(code),
            record => record
                .code()
                .map(str::to_string)
                .with_context(|| format!("Item {index} has no code")),
        })
        .collect()
}

/// Summarize what an import would create, update and delete
pub fn diff_summary(source: Vec<Value>, existing: Vec<Value>) -> Value {
    fn codes(records: &[Value]) -> Vec<String> {
        records
            .iter()
            .filter_map(|record| record.code().map(str::to_string))
            .collect()
    }

    let actions = compare_records_by_code(source, existing);

    json!({
        "creates": codes(&actions.creates),
        "updates": codes(&actions.updates),
        "deletes": actions.delete_codes(),
    })
}
