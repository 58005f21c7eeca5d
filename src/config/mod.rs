//! Deployment configuration for Data Flow applications.
//!
//! The configuration is a YAML document with an `environments_list` and a
//! `dataflow_app` list. Every application's `details` mapping is checked
//! for required keys and then deserialized strictly, so a malformed file is
//! rejected before the provider is contacted.

mod types;

pub use types::{
    ApplicationLanguage, ApplicationParameter, ApplicationSpec, ApplicationType, DataflowApp,
    DeployConfig, Environment, ShapeConfig, REQUIRED_APPLICATION_KEYS,
};

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Missing required configuration key '{key}' in {context}")]
    MissingKey { key: String, context: String },

    #[error("Configuration key '{key}' in {context} must not be empty")]
    EmptyValue { key: String, context: String },

    #[error("'{0}' must contain at least one entry")]
    EmptyList(String),

    #[error("{0} must be a mapping")]
    NotMapping(String),

    #[error("Invalid {context}: {source}")]
    InvalidApplication {
        context: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("No environment named '{0}' in environments_list")]
    EnvironmentNotFound(String),

    #[error("No application with display name '{0}' in dataflow_app")]
    ApplicationNotFound(String),
}

#[derive(Debug, Deserialize)]
struct RawDeployConfig {
    environments_list: Option<Vec<RawEnvironment>>,
    dataflow_app: Option<Vec<RawDataflowApp>>,
}

#[derive(Debug, Deserialize)]
struct RawEnvironment {
    name: Option<String>,
    compartment_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDataflowApp {
    details: Option<Value>,
}

/// Read and validate the deployment configuration file
pub async fn load_deploy_config(path: &Path) -> Result<DeployConfig, ConfigError> {
    let content = fs::read_to_string(path).await?;
    let config = parse_deploy_config(&content)?;
    debug!(
        path = %path.display(),
        environments = config.environments_list.len(),
        applications = config.dataflow_app.len(),
        "Loaded deployment configuration"
    );
    Ok(config)
}

/// Parse and validate a deployment configuration document
pub fn parse_deploy_config(content: &str) -> Result<DeployConfig, ConfigError> {
    let raw: RawDeployConfig = serde_yaml::from_str(content)?;

    let raw_environments = raw.environments_list.ok_or_else(|| ConfigError::MissingKey {
        key: "environments_list".to_string(),
        context: "configuration root".to_string(),
    })?;
    let raw_apps = raw.dataflow_app.ok_or_else(|| ConfigError::MissingKey {
        key: "dataflow_app".to_string(),
        context: "configuration root".to_string(),
    })?;

    if raw_environments.is_empty() {
        return Err(ConfigError::EmptyList("environments_list".to_string()));
    }
    if raw_apps.is_empty() {
        return Err(ConfigError::EmptyList("dataflow_app".to_string()));
    }

    let environments_list = raw_environments
        .into_iter()
        .enumerate()
        .map(|(index, env)| validate_environment(index, env))
        .collect::<Result<Vec<_>, _>>()?;

    let dataflow_app = raw_apps
        .into_iter()
        .enumerate()
        .map(|(index, app)| -> Result<DataflowApp, ConfigError> {
            let context = format!("dataflow_app[{index}]");
            let details = app.details.ok_or_else(|| ConfigError::MissingKey {
                key: "details".to_string(),
                context: context.clone(),
            })?;
            let details = validate_application(&format!("{context}.details"), details)?;
            Ok(DataflowApp { details })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DeployConfig {
        environments_list,
        dataflow_app,
    })
}

fn validate_environment(index: usize, raw: RawEnvironment) -> Result<Environment, ConfigError> {
    let context = format!("environments_list[{index}]");
    let compartment_id = raw.compartment_id.ok_or_else(|| ConfigError::MissingKey {
        key: "compartment_id".to_string(),
        context: context.clone(),
    })?;

    if compartment_id.trim().is_empty() {
        return Err(ConfigError::EmptyValue {
            key: "compartment_id".to_string(),
            context,
        });
    }

    Ok(Environment {
        name: raw.name,
        compartment_id,
    })
}

/// Validate a raw `details` value and convert it into an [`ApplicationSpec`].
///
/// Required keys are checked by name first so the error identifies the key;
/// the strict deserialization afterwards rejects unknown keys and bad types.
pub fn validate_application(context: &str, details: Value) -> Result<ApplicationSpec, ConfigError> {
    let mapping: &Mapping = details
        .as_mapping()
        .ok_or_else(|| ConfigError::NotMapping(context.to_string()))?;

    for key in REQUIRED_APPLICATION_KEYS {
        match mapping.get(*key) {
            None | Some(Value::Null) => {
                return Err(ConfigError::MissingKey {
                    key: (*key).to_string(),
                    context: context.to_string(),
                });
            }
            Some(_) => {}
        }
    }

    let spec: ApplicationSpec =
        serde_yaml::from_value(details).map_err(|source| ConfigError::InvalidApplication {
            context: context.to_string(),
            source,
        })?;

    if spec.display_name.trim().is_empty() {
        return Err(ConfigError::EmptyValue {
            key: "display_name".to_string(),
            context: context.to_string(),
        });
    }

    Ok(spec)
}

impl DeployConfig {
    /// Pick an environment by name, or the first one
    pub fn select_environment(&self, name: Option<&str>) -> Result<&Environment, ConfigError> {
        match name {
            Some(name) => self
                .environments_list
                .iter()
                .find(|env| env.name.as_deref() == Some(name))
                .ok_or_else(|| ConfigError::EnvironmentNotFound(name.to_string())),
            None => self
                .environments_list
                .first()
                .ok_or_else(|| ConfigError::EmptyList("environments_list".to_string())),
        }
    }

    /// Pick an application by display name, or the first one
    pub fn select_application(
        &self,
        display_name: Option<&str>,
    ) -> Result<&ApplicationSpec, ConfigError> {
        match display_name {
            Some(display_name) => self
                .dataflow_app
                .iter()
                .map(|app| &app.details)
                .find(|spec| spec.display_name == display_name)
                .ok_or_else(|| ConfigError::ApplicationNotFound(display_name.to_string())),
            None => self
                .dataflow_app
                .first()
                .map(|app| &app.details)
                .ok_or_else(|| ConfigError::EmptyList("dataflow_app".to_string())),
        }
    }
}
