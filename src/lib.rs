pub mod config;
pub mod detector;
pub mod provider;
pub mod reconciliation;
pub mod utils;

// Re-export commonly used types
pub use config::{load_deploy_config, ApplicationSpec, ConfigError, DeployConfig, Environment};
pub use detector::{
    detect_changed_schemas, Detection, DetectionStatus, DetectorSettings, GitClient, SystemGit,
};
pub use provider::{
    load_oci_config, Application, ApplicationSummary, CreateApplicationDetails, DataFlowClient,
    HttpDataFlowClient, OciConfig, ProviderError, UpdateApplicationDetails,
};
pub use reconciliation::{
    reconcile_application, reconcile_from_config, ReconcileAction, ReconcileError,
    ReconcileOutcome, ReconcilerSettings,
};
