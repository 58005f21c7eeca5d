//! GitHub Actions output variables and workflow annotations.

use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write step output: {0}")]
    IoError(#[from] std::io::Error),
}

/// Comma-joined schema list; empty when no schema changed
pub fn format_schema_list(schemas: &BTreeSet<String>) -> String {
    schemas.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

/// Escape a workflow command message (`%`, CR and LF)
pub fn escape_command_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

pub fn warning_annotation(message: &str) -> String {
    format!("::warning::{}", escape_command_data(message))
}

pub fn error_annotation(message: &str) -> String {
    format!("::error::{}", escape_command_data(message))
}

/// Deprecated `set-output` workflow command, used when `GITHUB_OUTPUT` is unset
pub fn set_output_command(name: &str, value: &str) -> String {
    format!("::set-output name={}::{}", name, escape_command_data(value))
}

/// Render one entry of the `GITHUB_OUTPUT` file.
///
/// Multi-line values use the heredoc form with a random delimiter.
pub fn format_output_entry(name: &str, value: &str) -> String {
    if value.contains('\n') || value.contains('\r') {
        let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
        format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
    } else {
        format!("{name}={value}\n")
    }
}

/// Append `name=value` to the step output file
pub async fn write_github_output(path: &Path, name: &str, value: &str) -> Result<(), OutputError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(format_output_entry(name, value).as_bytes())
        .await?;
    file.flush().await?;
    Ok(())
}
