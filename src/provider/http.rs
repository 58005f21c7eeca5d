use super::oci_config::OciConfig;
use super::signer::{RequestSigner, CONTENT_TYPE_JSON};
use super::types::{Application, ApplicationSummary, CreateApplicationDetails, UpdateApplicationDetails};
use super::{DataFlowClient, ProviderError};
use crate::utils::now_http_date;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, DATE};
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

/// API version path segment of the Data Flow service
pub const DATAFLOW_API_VERSION: &str = "20200129";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const PAGE_LIMIT: &str = "100";

#[derive(Debug, Default, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Data Flow client speaking the signed REST API
#[derive(Debug)]
pub struct HttpDataFlowClient {
    http: Client,
    base_url: Url,
    signer: RequestSigner,
}

impl HttpDataFlowClient {
    pub fn new(base_url: Url, signer: RequestSigner, timeout: Duration) -> Result<Self, ProviderError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            signer,
        })
    }

    /// Build a client for the profile's region, reading its API key from disk
    pub async fn from_config(config: &OciConfig, timeout: Duration) -> Result<Self, ProviderError> {
        let pem = fs::read_to_string(&config.key_file).await.map_err(|source| {
            ProviderError::KeyFile {
                path: config.key_file.clone(),
                source,
            }
        })?;
        let signer = RequestSigner::from_pem_with_passphrase(
            config.key_id(),
            &pem,
            config.pass_phrase.as_deref(),
        )?;
        let base_url = regional_endpoint(&config.region)?;

        Self::new(base_url, signer, timeout)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidEndpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .push(DATAFLOW_API_VERSION)
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<Response, ProviderError> {
        let signed = self
            .signer
            .sign(&method, &url, body.as_deref(), &now_http_date())?;

        let request_id = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
        debug!(method = %method, url = %url, opc_request_id = %request_id, "Sending Data Flow request");

        let mut request = self
            .http
            .request(method, url)
            .header(DATE, &signed.date)
            .header(AUTHORIZATION, &signed.authorization)
            .header("opc-request-id", &request_id);

        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, CONTENT_TYPE_JSON);
            if let Some(sha) = &signed.x_content_sha256 {
                request = request.header("x-content-sha256", sha);
            }
            request = request.body(body);
        }

        let response = request.send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(service_error(response).await)
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<T, ProviderError> {
        let response = self.send(method, url, body).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Regional Data Flow endpoint, e.g. `https://dataflow.us-ashburn-1.oraclecloud.com`
pub fn regional_endpoint(region: &str) -> Result<Url, ProviderError> {
    let raw = format!("https://dataflow.{region}.oraclecloud.com");
    Url::parse(&raw).map_err(|_| ProviderError::InvalidEndpoint(raw))
}

async fn service_error(response: Response) -> ProviderError {
    let status = response.status().as_u16();
    let opc_request_id = response
        .headers()
        .get("opc-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let text = response.text().await.unwrap_or_default();
    let body: ServiceErrorBody = serde_json::from_str(&text).unwrap_or_else(|_| ServiceErrorBody {
        code: String::new(),
        message: text,
    });

    ProviderError::Service {
        status,
        code: body.code,
        message: body.message,
        opc_request_id,
    }
}

#[async_trait]
impl DataFlowClient for HttpDataFlowClient {
    async fn list_applications(
        &self,
        compartment_id: &str,
    ) -> Result<Vec<ApplicationSummary>, ProviderError> {
        let mut applications = Vec::new();
        let mut page: Option<String> = None;

        loop {
            let mut url = self.endpoint(&["applications"])?;
            {
                let mut query = url.query_pairs_mut();
                query
                    .append_pair("compartmentId", compartment_id)
                    .append_pair("limit", PAGE_LIMIT);
                if let Some(page) = &page {
                    query.append_pair("page", page);
                }
            }

            let response = self.send(Method::GET, url, None).await?;
            let next_page = response
                .headers()
                .get("opc-next-page")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let bytes = response.bytes().await?;
            let batch: Vec<ApplicationSummary> = serde_json::from_slice(&bytes)?;
            applications.extend(batch);

            match next_page {
                Some(next) if !next.is_empty() => page = Some(next),
                _ => break,
            }
        }

        debug!(
            compartment_id = %compartment_id,
            count = applications.len(),
            "Listed Data Flow applications"
        );
        Ok(applications)
    }

    async fn create_application(
        &self,
        details: &CreateApplicationDetails,
    ) -> Result<Application, ProviderError> {
        let url = self.endpoint(&["applications"])?;
        let body = serde_json::to_vec(details)?;
        self.send_json(Method::POST, url, Some(body)).await
    }

    async fn update_application(
        &self,
        application_id: &str,
        details: &UpdateApplicationDetails,
    ) -> Result<Application, ProviderError> {
        let url = self.endpoint(&["applications", application_id])?;
        let body = serde_json::to_vec(details)?;
        self.send_json(Method::PUT, url, Some(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regional_endpoint() {
        let url = regional_endpoint("us-ashburn-1").unwrap();
        assert_eq!(url.as_str(), "https://dataflow.us-ashburn-1.oraclecloud.com/");
    }

    #[test]
    fn test_endpoint_appends_version_and_segments() {
        let signer = RequestSigner::from_pem(
            "k",
            include_str!("../../tests/fixtures/oci_api_key.pem"),
        )
        .unwrap();
        let client = HttpDataFlowClient::new(
            Url::parse("http://localhost:9000").unwrap(),
            signer,
            DEFAULT_TIMEOUT,
        )
        .unwrap();

        let url = client.endpoint(&["applications", "ocid1.app"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/20200129/applications/ocid1.app");
    }
}
