use super::plan::{index_by_display_name, plan_reconciliation, PlanError, ReconcileAction};
use super::settings::ReconcilerSettings;
use crate::config::{ApplicationSpec, ConfigError, DeployConfig};
use crate::provider::{Application, DataFlowClient, ProviderError};
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Plan error: {0}")]
    PlanError(#[from] PlanError),

    #[error("Failed to retrieve applications for compartment '{compartment_id}': {source}")]
    ListFailed {
        compartment_id: String,
        #[source]
        source: ProviderError,
    },

    #[error("Failed to create or update application '{display_name}': {source}")]
    ApplyFailed {
        display_name: String,
        #[source]
        source: ProviderError,
    },
}

/// Result of one reconciliation pass
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    Created(Application),
    Updated(Application),
    Skipped { application_id: String },
}

impl ReconcileOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ReconcileOutcome::Created(_) => "created",
            ReconcileOutcome::Updated(_) => "updated",
            ReconcileOutcome::Skipped { .. } => "skipped",
        }
    }
}

/// Carry out a planned action. Issues at most one provider call.
pub async fn execute_reconciliation<C>(
    client: &C,
    compartment_id: &str,
    spec: &ApplicationSpec,
    action: ReconcileAction,
) -> Result<ReconcileOutcome, ReconcileError>
where
    C: DataFlowClient + ?Sized,
{
    let display_name = spec.display_name.as_str();
    let apply_failed = |source: ProviderError| {
        error!(display_name = %display_name, error = %source, "Failed to create or update application");
        ReconcileError::ApplyFailed {
            display_name: display_name.to_string(),
            source,
        }
    };

    match action {
        ReconcileAction::Create => {
            info!(display_name = %display_name, "Creating new application");
            let created = client
                .create_application(&spec.to_create_details(compartment_id))
                .await
                .map_err(apply_failed)?;
            info!(
                display_name = %display_name,
                application_id = %created.id,
                lifecycle_state = created.lifecycle_state.as_deref().unwrap_or("UNKNOWN"),
                "Created application"
            );
            Ok(ReconcileOutcome::Created(created))
        }
        ReconcileAction::Update { application_id } => {
            info!(display_name = %display_name, application_id = %application_id, "Updating existing application");
            let updated = client
                .update_application(&application_id, &spec.to_update_details())
                .await
                .map_err(apply_failed)?;
            Ok(ReconcileOutcome::Updated(updated))
        }
        ReconcileAction::Skip { application_id } => {
            info!(
                display_name = %display_name,
                application_id = %application_id,
                "Application already exists, skipping creation"
            );
            Ok(ReconcileOutcome::Skipped { application_id })
        }
    }
}

/// List the compartment, decide, and apply the decision for one application
pub async fn reconcile_application<C>(
    client: &C,
    compartment_id: &str,
    spec: &ApplicationSpec,
    overwrite: bool,
) -> Result<ReconcileOutcome, ReconcileError>
where
    C: DataFlowClient + ?Sized,
{
    let existing = client
        .list_applications(compartment_id)
        .await
        .map_err(|source| {
            error!(compartment_id = %compartment_id, error = %source, "Failed to retrieve applications");
            ReconcileError::ListFailed {
                compartment_id: compartment_id.to_string(),
                source,
            }
        })?;

    let index = index_by_display_name(&existing)?;
    let action = plan_reconciliation(&index, &spec.display_name, overwrite);

    execute_reconciliation(client, compartment_id, spec, action).await
}

/// Reconcile the application selected by `settings` from a loaded configuration
pub async fn reconcile_from_config<C>(
    client: &C,
    config: &DeployConfig,
    settings: &ReconcilerSettings,
) -> Result<ReconcileOutcome, ReconcileError>
where
    C: DataFlowClient + ?Sized,
{
    let environment = config.select_environment(settings.environment.as_deref())?;
    let spec = config.select_application(settings.application.as_deref())?;

    info!(
        environment = environment.name.as_deref().unwrap_or("-"),
        compartment_id = %environment.compartment_id,
        display_name = %spec.display_name,
        overwrite = settings.overwrite,
        "Reconciling Data Flow application"
    );

    reconcile_application(client, &environment.compartment_id, spec, settings.overwrite).await
}
