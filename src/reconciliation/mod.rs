mod execute;
mod plan;
mod settings;

pub use execute::{
    execute_reconciliation, reconcile_application, reconcile_from_config, ReconcileError,
    ReconcileOutcome,
};
pub use plan::{index_by_display_name, plan_reconciliation, PlanError, ReconcileAction};
pub use settings::{parse_overwrite_flag, ReconcilerSettings};
