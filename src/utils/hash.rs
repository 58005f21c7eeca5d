use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Compute the base64-encoded SHA-256 digest of a request body
pub fn compute_content_sha256(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    STANDARD.encode(hasher.finalize())
}
