//! Access to the OCI Data Flow application API.
//!
//! [`DataFlowClient`] is the seam the reconciler talks to. The production
//! implementation, [`HttpDataFlowClient`], signs each request with the API
//! key of an OCI config profile.

mod http;
mod oci_config;
mod signer;
mod types;

pub use http::{regional_endpoint, HttpDataFlowClient, DATAFLOW_API_VERSION, DEFAULT_TIMEOUT};
pub use oci_config::{load_oci_config, parse_oci_config, OciConfig, OciConfigError};
pub use signer::{build_signing_string, RequestSigner, SignedHeaders, SignerError};
pub use types::{Application, ApplicationSummary, CreateApplicationDetails, UpdateApplicationDetails};

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Signing error: {0}")]
    SignerError(#[from] SignerError),

    #[error("OCI config error: {0}")]
    OciConfigError(#[from] OciConfigError),

    #[error("Failed to read API key {path}: {source}")]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid service endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Service error {status} ({code}): {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
        opc_request_id: Option<String>,
    },
}

/// Operations on Data Flow applications
#[async_trait]
pub trait DataFlowClient: Send + Sync {
    /// List every application in a compartment
    async fn list_applications(
        &self,
        compartment_id: &str,
    ) -> Result<Vec<ApplicationSummary>, ProviderError>;

    async fn create_application(
        &self,
        details: &CreateApplicationDetails,
    ) -> Result<Application, ProviderError>;

    async fn update_application(
        &self,
        application_id: &str,
        details: &UpdateApplicationDetails,
    ) -> Result<Application, ProviderError>;
}
