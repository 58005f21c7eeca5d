#![allow(dead_code)]

use async_trait::async_trait;
use dataflow_ops::config::ApplicationSpec;
use dataflow_ops::detector::{GitClient, GitError};
use dataflow_ops::provider::{
    Application, ApplicationSummary, CreateApplicationDetails, DataFlowClient, ProviderError,
    UpdateApplicationDetails,
};
use std::sync::Mutex;
use tempfile::TempDir;

pub const TEST_KEY_PEM: &str = include_str!("../fixtures/oci_api_key.pem");
/// `TEST_KEY_PEM` as encrypted PKCS#8, passphrase `correct-horse`
pub const ENCRYPTED_KEY_PEM: &str = include_str!("../fixtures/oci_api_key_encrypted.pem");

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// A complete application spec with the given display name and a BATCH type
pub fn sample_spec(display_name: &str) -> ApplicationSpec {
    serde_yaml::from_str(&format!(
        r#"
display_name: {display_name}
type: BATCH
language: PYTHON
driver_shape: VM.Standard.E4.Flex
executor_shape: VM.Standard.E4.Flex
num_executors: 2
spark_version: "3.2.1"
file_uri: oci://bucket@ns/{display_name}.py
"#
    ))
    .expect("Sample spec should parse")
}

pub fn summary(id: &str, display_name: &str) -> ApplicationSummary {
    ApplicationSummary {
        id: id.to_string(),
        display_name: display_name.to_string(),
        compartment_id: Some("ocid1.compartment.oc1..test".to_string()),
        lifecycle_state: Some("ACTIVE".to_string()),
        time_created: None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientCall {
    List(String),
    Create(CreateApplicationDetails),
    Update(String, UpdateApplicationDetails),
}

/// In-memory Data Flow client that records every call
#[derive(Debug, Default)]
pub struct FakeDataFlowClient {
    pub existing: Vec<ApplicationSummary>,
    pub fail_list: bool,
    pub fail_apply: bool,
    pub calls: Mutex<Vec<ClientCall>>,
}

impl FakeDataFlowClient {
    pub fn with_existing(existing: Vec<ApplicationSummary>) -> Self {
        Self {
            existing,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<ClientCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn creates(&self) -> Vec<CreateApplicationDetails> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ClientCall::Create(details) => Some(details),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<(String, UpdateApplicationDetails)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ClientCall::Update(id, details) => Some((id, details)),
                _ => None,
            })
            .collect()
    }

    fn service_error(status: u16, code: &str) -> ProviderError {
        ProviderError::Service {
            status,
            code: code.to_string(),
            message: "injected failure".to_string(),
            opc_request_id: None,
        }
    }
}

#[async_trait]
impl DataFlowClient for FakeDataFlowClient {
    async fn list_applications(
        &self,
        compartment_id: &str,
    ) -> Result<Vec<ApplicationSummary>, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push(ClientCall::List(compartment_id.to_string()));
        if self.fail_list {
            return Err(Self::service_error(404, "NotAuthorizedOrNotFound"));
        }
        Ok(self.existing.clone())
    }

    async fn create_application(
        &self,
        details: &CreateApplicationDetails,
    ) -> Result<Application, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push(ClientCall::Create(details.clone()));
        if self.fail_apply {
            return Err(Self::service_error(400, "InvalidParameter"));
        }
        Ok(Application {
            id: "ocid1.dataflowapplication.oc1..new".to_string(),
            display_name: details.spec.display_name.clone(),
            compartment_id: Some(details.compartment_id.clone()),
            lifecycle_state: Some("ACTIVE".to_string()),
            application_type: Some("BATCH".to_string()),
            time_created: None,
            time_updated: None,
        })
    }

    async fn update_application(
        &self,
        application_id: &str,
        details: &UpdateApplicationDetails,
    ) -> Result<Application, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push(ClientCall::Update(application_id.to_string(), details.clone()));
        if self.fail_apply {
            return Err(Self::service_error(409, "Conflict"));
        }
        Ok(Application {
            id: application_id.to_string(),
            display_name: details.spec().display_name.clone(),
            compartment_id: None,
            lifecycle_state: Some("ACTIVE".to_string()),
            application_type: None,
            time_created: None,
            time_updated: None,
        })
    }
}

/// Git double returning canned diff output
#[derive(Debug, Default)]
pub struct FakeGit {
    pub changed: Vec<String>,
    pub fetch_error: Option<String>,
    pub diff_error: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeGit {
    pub fn with_changes(changed: &[&str]) -> Self {
        Self {
            changed: changed.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn failure(command: String, stderr: &str) -> GitError {
        GitError::CommandFailed {
            command,
            status: Some(128),
            stderr: stderr.to_string(),
        }
    }
}

#[async_trait]
impl GitClient for FakeGit {
    async fn fetch(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        let command = format!("git fetch {remote} {branch}");
        self.calls.lock().unwrap().push(command.clone());
        match &self.fetch_error {
            Some(stderr) => Err(Self::failure(command, stderr)),
            None => Ok(()),
        }
    }

    async fn diff_names(&self, range: &str) -> Result<Vec<String>, GitError> {
        let command = format!("git diff --name-only {range}");
        self.calls.lock().unwrap().push(command.clone());
        match &self.diff_error {
            Some(stderr) => Err(Self::failure(command, stderr)),
            None => Ok(self.changed.clone()),
        }
    }
}
