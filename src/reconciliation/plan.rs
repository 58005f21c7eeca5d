use crate::provider::ApplicationSummary;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Display name '{display_name}' is used by more than one application: {}", .application_ids.join(", "))]
    DuplicateDisplayName {
        display_name: String,
        application_ids: Vec<String>,
    },
}

/// What to do with the declared application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileAction {
    /// No application with this display name exists
    Create,
    /// Replace the existing application's settings
    Update { application_id: String },
    /// Leave the existing application untouched
    Skip { application_id: String },
}

/// Build the display name -> application id table.
///
/// Display names are the natural key, so two applications sharing one is
/// an error rather than a silent overwrite.
pub fn index_by_display_name(
    applications: &[ApplicationSummary],
) -> Result<HashMap<String, String>, PlanError> {
    let mut index: HashMap<String, String> = HashMap::with_capacity(applications.len());

    for app in applications {
        if let Some(existing_id) = index.get(&app.display_name) {
            // Same record listed twice
            if existing_id == &app.id {
                continue;
            }

            let mut application_ids: Vec<String> = Vec::new();
            for same_name in applications.iter().filter(|a| a.display_name == app.display_name) {
                if !application_ids.contains(&same_name.id) {
                    application_ids.push(same_name.id.clone());
                }
            }
            return Err(PlanError::DuplicateDisplayName {
                display_name: app.display_name.clone(),
                application_ids,
            });
        }
        index.insert(app.display_name.clone(), app.id.clone());
    }

    Ok(index)
}

/// Decide between create, update and skip
pub fn plan_reconciliation(
    existing: &HashMap<String, String>,
    display_name: &str,
    overwrite: bool,
) -> ReconcileAction {
    match existing.get(display_name) {
        None => ReconcileAction::Create,
        Some(id) if overwrite => ReconcileAction::Update {
            application_id: id.clone(),
        },
        Some(id) => ReconcileAction::Skip {
            application_id: id.clone(),
        },
    }
}
