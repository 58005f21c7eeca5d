mod hash;

pub use hash::compute_content_sha256;

use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Default location of the OCI SDK config file
pub const DEFAULT_OCI_CONFIG_FILE: &str = "~/.oci/config";

/// Default OCI config profile
pub const DEFAULT_OCI_PROFILE: &str = "DEFAULT";

/// Get the current user's home directory from the environment
pub fn get_home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()
        .map(PathBuf::from)
}

/// Expand a leading `~` to the home directory.
///
/// Paths without a leading `~`, or with no resolvable home directory,
/// are returned unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    expand_home_with(path, get_home_dir().as_deref())
}

fn expand_home_with(path: &Path, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };

    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Install the global fmt subscriber writing to stderr.
///
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logging() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

/// Get current timestamp formatted as an RFC 7231 HTTP date
pub fn now_http_date() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
