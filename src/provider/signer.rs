//! OCI HTTP request signatures (version 1, `rsa-sha256`).

use crate::utils::compute_content_sha256;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Method, Url};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::Sha256;
use thiserror::Error;

pub const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Error, Debug)]
pub enum SignerError {
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Private key is passphrase-protected but no pass_phrase was given")]
    EncryptedKey,

    #[error("Legacy encrypted PEM keys are not supported, convert the key to encrypted PKCS#8")]
    UnsupportedEncryption,

    #[error("Request URL has no host: {0}")]
    MissingHost(String),
}

/// Header values to attach to a signed request
#[derive(Debug, Clone, PartialEq)]
pub struct SignedHeaders {
    pub date: String,
    pub authorization: String,
    /// Set for requests that carry a body
    pub x_content_sha256: Option<String>,
}

/// Signs requests with an API signing key
pub struct RequestSigner {
    key_id: String,
    signing_key: SigningKey<Sha256>,
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl RequestSigner {
    pub fn new(key_id: impl Into<String>, private_key: RsaPrivateKey) -> Self {
        Self {
            key_id: key_id.into(),
            signing_key: SigningKey::<Sha256>::new(private_key),
        }
    }

    /// Build a signer from a PKCS#1 or PKCS#8 PEM private key
    pub fn from_pem(key_id: impl Into<String>, pem: &str) -> Result<Self, SignerError> {
        Self::from_pem_with_passphrase(key_id, pem, None)
    }

    /// Like [`RequestSigner::from_pem`], but also accepts encrypted PKCS#8
    /// keys. The passphrase is ignored for unencrypted keys.
    pub fn from_pem_with_passphrase(
        key_id: impl Into<String>,
        pem: &str,
        pass_phrase: Option<&str>,
    ) -> Result<Self, SignerError> {
        let private_key = if pem.contains("BEGIN ENCRYPTED PRIVATE KEY") {
            let pass_phrase = pass_phrase.ok_or(SignerError::EncryptedKey)?;
            RsaPrivateKey::from_pkcs8_encrypted_pem(pem, pass_phrase.as_bytes())
                .map_err(|e| SignerError::InvalidKey(e.to_string()))?
        } else if pem.contains("ENCRYPTED") {
            // Proc-Type: 4,ENCRYPTED
            return Err(SignerError::UnsupportedEncryption);
        } else if pem.contains("BEGIN RSA PRIVATE KEY") {
            RsaPrivateKey::from_pkcs1_pem(pem).map_err(|e| SignerError::InvalidKey(e.to_string()))?
        } else {
            RsaPrivateKey::from_pkcs8_pem(pem).map_err(|e| SignerError::InvalidKey(e.to_string()))?
        };

        Ok(Self::new(key_id, private_key))
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Sign a request about to be sent at `date`
    pub fn sign(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&[u8]>,
        date: &str,
    ) -> Result<SignedHeaders, SignerError> {
        let content_sha256 = body.map(compute_content_sha256);
        let (header_names, signing_string) =
            build_signing_string(method, url, body, content_sha256.as_deref(), date)?;

        let signature = self.signing_key.sign(signing_string.as_bytes());
        let signature = STANDARD.encode(signature.to_bytes());

        let authorization = format!(
            "Signature version=\"1\",keyId=\"{}\",algorithm=\"rsa-sha256\",headers=\"{}\",signature=\"{}\"",
            self.key_id, header_names, signature
        );

        Ok(SignedHeaders {
            date: date.to_string(),
            authorization,
            x_content_sha256: content_sha256,
        })
    }
}

/// Host header value as the HTTP client will send it
fn host_header(url: &Url) -> Result<String, SignerError> {
    let host = url
        .host_str()
        .ok_or_else(|| SignerError::MissingHost(url.to_string()))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Returns the space-separated header list and the string to sign.
pub fn build_signing_string(
    method: &Method,
    url: &Url,
    body: Option<&[u8]>,
    content_sha256: Option<&str>,
    date: &str,
) -> Result<(String, String), SignerError> {
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut names = vec!["date", "(request-target)", "host"];
    let mut lines = vec![
        format!("date: {date}"),
        format!(
            "(request-target): {} {}",
            method.as_str().to_lowercase(),
            target
        ),
        format!("host: {}", host_header(url)?),
    ];

    if let (Some(body), Some(sha)) = (body, content_sha256) {
        names.extend(["content-length", "content-type", "x-content-sha256"]);
        lines.push(format!("content-length: {}", body.len()));
        lines.push(format!("content-type: {CONTENT_TYPE_JSON}"));
        lines.push(format!("x-content-sha256: {sha}"));
    }

    Ok((names.join(" "), lines.join("\n")))
}
