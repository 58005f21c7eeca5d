//! Reader for the OCI SDK configuration file.
//!
//! The file is INI-style. Named profiles inherit every key of the
//! `[DEFAULT]` section unless they override it.

use crate::utils::expand_home;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

const DEFAULT_SECTION: &str = "DEFAULT";

#[derive(Error, Debug)]
pub enum OciConfigError {
    #[error("Failed to read OCI config {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid OCI config line {line}: {content}")]
    ParseError { line: usize, content: String },

    #[error("Profile '{0}' not found in OCI config")]
    ProfileNotFound(String),

    #[error("Profile '{profile}' is missing required key '{key}'")]
    MissingKey { profile: String, key: String },
}

/// Credentials and region of one OCI config profile
#[derive(Debug, Clone, PartialEq)]
pub struct OciConfig {
    pub user: String,
    pub fingerprint: String,
    pub key_file: PathBuf,
    pub tenancy: String,
    pub region: String,
    pub pass_phrase: Option<String>,
}

impl OciConfig {
    /// Key id used in request signatures
    pub fn key_id(&self) -> String {
        format!("{}/{}/{}", self.tenancy, self.user, self.fingerprint)
    }
}

/// Load a profile from the OCI config file at `path`
pub async fn load_oci_config(path: &Path, profile: &str) -> Result<OciConfig, OciConfigError> {
    let path = expand_home(path);
    let content = fs::read_to_string(&path)
        .await
        .map_err(|source| OciConfigError::ReadError {
            path: path.clone(),
            source,
        })?;
    parse_oci_config(&content, profile)
}

/// Parse OCI config content and resolve `profile`
pub fn parse_oci_config(content: &str, profile: &str) -> Result<OciConfig, OciConfigError> {
    let sections = parse_sections(content)?;

    let defaults = sections.get(DEFAULT_SECTION);
    let selected = sections.get(profile);
    if selected.is_none() && !(profile == DEFAULT_SECTION && defaults.is_some()) {
        return Err(OciConfigError::ProfileNotFound(profile.to_string()));
    }

    let lookup = |key: &str| -> Option<String> {
        selected
            .and_then(|s| s.get(key))
            .or_else(|| defaults.and_then(|d| d.get(key)))
            .cloned()
    };
    let required = |key: &str| -> Result<String, OciConfigError> {
        lookup(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| OciConfigError::MissingKey {
                profile: profile.to_string(),
                key: key.to_string(),
            })
    };

    Ok(OciConfig {
        user: required("user")?,
        fingerprint: required("fingerprint")?,
        key_file: expand_home(Path::new(&required("key_file")?)),
        tenancy: required("tenancy")?,
        region: required("region")?,
        pass_phrase: lookup("pass_phrase").filter(|v| !v.is_empty()),
    })
}

fn parse_sections(
    content: &str,
) -> Result<HashMap<String, HashMap<String, String>>, OciConfigError> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }

        let parse_error = || OciConfigError::ParseError {
            line: index + 1,
            content: raw_line.to_string(),
        };

        let section = current.as_ref().ok_or_else(parse_error)?;
        let (key, value) = line.split_once('=').ok_or_else(parse_error)?;

        sections
            .entry(section.clone())
            .or_default()
            .insert(key.trim().to_lowercase(), value.trim().to_string());
    }

    Ok(sections)
}
