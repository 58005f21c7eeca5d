//! Detect which schema directories a pull request touches.
//!
//! The detector never fails: missing branch refs and git errors both
//! produce an empty schema set, with the reason kept in [`DetectionStatus`]
//! so the caller can emit the matching workflow annotation.

mod git;
mod output;
mod paths;

pub use git::{GitClient, GitError, SystemGit};
pub use output::{
    error_annotation, escape_command_data, format_output_entry, format_schema_list,
    set_output_command, warning_annotation, write_github_output, OutputError,
};
pub use paths::{extract_schema_names, schema_name};

use std::collections::BTreeSet;
use tracing::{error, info, warn};

/// Directory holding one sub-directory per schema
pub const DEFAULT_ROOT_DIR: &str = "SQL";

pub const DEFAULT_REMOTE: &str = "origin";

/// Name of the step output variable
pub const DEFAULT_OUTPUT_NAME: &str = "changed_schemas";

pub const MISSING_REFS_MESSAGE: &str = "GITHUB_BASE_REF or GITHUB_HEAD_REF not set. Is this a PR?";

/// Inputs of one detection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorSettings {
    pub base_ref: Option<String>,
    pub head_ref: Option<String>,
    pub root_dir: String,
    pub remote: String,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            base_ref: None,
            head_ref: None,
            root_dir: DEFAULT_ROOT_DIR.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionStatus {
    /// The branches were compared
    Compared,
    /// Base or head ref was not provided
    MissingRefs,
    /// A git command failed; carries its stderr
    GitFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub schemas: BTreeSet<String>,
    pub status: DetectionStatus,
}

impl Detection {
    fn empty(status: DetectionStatus) -> Self {
        Self {
            schemas: BTreeSet::new(),
            status,
        }
    }

    /// Comma-joined schema names
    pub fn schema_list(&self) -> String {
        format_schema_list(&self.schemas)
    }

    /// Workflow annotation describing a degraded run
    pub fn annotation(&self) -> Option<String> {
        match &self.status {
            DetectionStatus::Compared => None,
            DetectionStatus::MissingRefs => Some(warning_annotation(MISSING_REFS_MESSAGE)),
            DetectionStatus::GitFailed(stderr) => {
                Some(error_annotation(&format!("Git error: {stderr}")))
            }
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Compare base and head and collect the schemas whose files changed
pub async fn detect_changed_schemas<G>(git: &G, settings: &DetectorSettings) -> Detection
where
    G: GitClient + ?Sized,
{
    let (base, head) = match (non_empty(&settings.base_ref), non_empty(&settings.head_ref)) {
        (Some(base), Some(head)) => (base, head),
        _ => {
            warn!("{}", MISSING_REFS_MESSAGE);
            return Detection::empty(DetectionStatus::MissingRefs);
        }
    };

    let changed = match diff_against_base(git, &settings.remote, base, head).await {
        Ok(changed) => changed,
        Err(e) => {
            error!(base = %base, head = %head, error = %e, "Git error");
            return Detection::empty(DetectionStatus::GitFailed(e.stderr()));
        }
    };

    let schemas = extract_schema_names(&changed, &settings.root_dir);
    info!(
        base = %base,
        head = %head,
        changed_files = changed.len(),
        schemas = schemas.len(),
        "Detected changed schemas"
    );

    Detection {
        schemas,
        status: DetectionStatus::Compared,
    }
}

async fn diff_against_base<G>(
    git: &G,
    remote: &str,
    base: &str,
    head: &str,
) -> Result<Vec<String>, GitError>
where
    G: GitClient + ?Sized,
{
    git.fetch(remote, base).await?;
    git.diff_names(&format!("{remote}/{base}...{head}")).await
}
