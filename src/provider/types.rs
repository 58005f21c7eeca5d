use crate::config::ApplicationSpec;
use serde::{Deserialize, Serialize};

/// Summary returned by the list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub compartment_id: Option<String>,
    #[serde(default)]
    pub lifecycle_state: Option<String>,
    #[serde(default)]
    pub time_created: Option<String>,
}

/// Full application record returned by create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub compartment_id: Option<String>,
    #[serde(default)]
    pub lifecycle_state: Option<String>,
    #[serde(default, rename = "type")]
    pub application_type: Option<String>,
    #[serde(default)]
    pub time_created: Option<String>,
    #[serde(default)]
    pub time_updated: Option<String>,
}

/// Body of `POST /applications`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationDetails {
    pub compartment_id: String,
    #[serde(flatten)]
    pub spec: ApplicationSpec,
}

/// Body of `PUT /applications/{id}`.
///
/// Built only through [`UpdateApplicationDetails::from_spec`], which clears
/// the application type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateApplicationDetails {
    #[serde(flatten)]
    spec: ApplicationSpec,
}

impl UpdateApplicationDetails {
    pub fn from_spec(mut spec: ApplicationSpec) -> Self {
        spec.application_type = None;
        Self { spec }
    }

    pub fn spec(&self) -> &ApplicationSpec {
        &self.spec
    }
}
