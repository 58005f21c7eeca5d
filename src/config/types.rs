use crate::provider::{CreateApplicationDetails, UpdateApplicationDetails};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Keys that must be present in every `details` mapping
pub const REQUIRED_APPLICATION_KEYS: &[&str] = &[
    "display_name",
    "language",
    "driver_shape",
    "executor_shape",
    "num_executors",
    "spark_version",
];

/// A deployment target from `environments_list`
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub name: Option<String>,
    pub compartment_id: String,
}

/// An entry of the `dataflow_app` list
#[derive(Debug, Clone, PartialEq)]
pub struct DataflowApp {
    pub details: ApplicationSpec,
}

/// Validated deployment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DeployConfig {
    pub environments_list: Vec<Environment>,
    pub dataflow_app: Vec<DataflowApp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplicationLanguage {
    Scala,
    Java,
    Python,
    Sql,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplicationType {
    Batch,
    Streaming,
    Session,
}

/// Name/value pair substituted into application arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplicationParameter {
    pub name: String,
    pub value: String,
}

/// Resources for flexible driver and executor shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShapeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocpus: Option<f32>,
    #[serde(
        rename(serialize = "memoryInGBs"),
        skip_serializing_if = "Option::is_none"
    )]
    pub memory_in_gbs: Option<f32>,
}

/// Declarative description of one Data Flow application.
///
/// YAML keys are snake_case, matching the SDK keyword arguments. The
/// serialized form is the camelCase wire representation of the provider API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all(serialize = "camelCase"))]
pub struct ApplicationSpec {
    pub display_name: String,
    pub language: ApplicationLanguage,
    pub driver_shape: String,
    pub executor_shape: String,
    pub num_executors: u32,
    pub spark_version: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub application_type: Option<ApplicationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ApplicationParameter>>,
    /// Spark properties. Scalar YAML values are sent as strings.
    #[serde(
        default,
        deserialize_with = "deserialize_spark_configuration",
        skip_serializing_if = "Option::is_none"
    )]
    pub configuration: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs_bucket_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse_bucket_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metastore_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_endpoint_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_shape_config: Option<ShapeConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor_shape_config: Option<ShapeConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_timeout_in_minutes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration_in_minutes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<BTreeMap<String, BTreeMap<String, serde_json::Value>>>,
}

fn deserialize_spark_configuration<'de, D>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<BTreeMap<String, serde_yaml::Value>>::deserialize(deserializer)? else {
        return Ok(None);
    };

    raw.into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                _ => {
                    return Err(D::Error::custom(format!(
                        "configuration value for '{key}' must be a string, number or boolean"
                    )))
                }
            };
            Ok((key, value))
        })
        .collect::<Result<_, _>>()
        .map(Some)
}

impl ApplicationSpec {
    /// Payload for creating this application in `compartment_id`
    pub fn to_create_details(&self, compartment_id: &str) -> CreateApplicationDetails {
        CreateApplicationDetails {
            compartment_id: compartment_id.to_string(),
            spec: self.clone(),
        }
    }

    /// Payload for updating an existing application.
    ///
    /// The provider rejects `type` on update, so it never appears here.
    pub fn to_update_details(&self) -> UpdateApplicationDetails {
        UpdateApplicationDetails::from_spec(self.clone())
    }
}
