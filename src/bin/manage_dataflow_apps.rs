use anyhow::Context;
use clap::Parser;
use dataflow_ops::config::load_deploy_config;
use dataflow_ops::provider::{load_oci_config, HttpDataFlowClient};
use dataflow_ops::reconciliation::{
    parse_overwrite_flag, reconcile_from_config, ReconcileOutcome, ReconcilerSettings,
};
use dataflow_ops::utils::{init_logging, DEFAULT_OCI_CONFIG_FILE, DEFAULT_OCI_PROFILE};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

/// Create or update an OCI Data Flow application from a YAML configuration file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Deployment configuration file
    config_file: PathBuf,

    /// Update an application that already exists ("yes" to enable)
    #[arg(long, env = "OVERWRITE_EXISTING", default_value = "no", value_name = "YES|NO")]
    overwrite: String,

    /// OCI SDK configuration file
    #[arg(long, env = "OCI_CONFIG_FILE", default_value = DEFAULT_OCI_CONFIG_FILE)]
    oci_config: PathBuf,

    /// Profile inside the OCI configuration file
    #[arg(long, env = "OCI_CLI_PROFILE", default_value = DEFAULT_OCI_PROFILE)]
    profile: String,

    /// Environment name from environments_list (default: first entry)
    #[arg(long)]
    environment: Option<String>,

    /// Display name of the application to deploy (default: first entry)
    #[arg(long)]
    application: Option<String>,

    /// Timeout for each Data Flow API request, in seconds
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_deploy_config(&args.config_file)
        .await
        .with_context(|| {
            format!(
                "Error loading configuration file '{}'",
                args.config_file.display()
            )
        })?;

    let settings = ReconcilerSettings {
        overwrite: parse_overwrite_flag(&args.overwrite),
        environment: args.environment,
        application: args.application,
    };

    // Reject a bad selection before reading credentials
    config.select_environment(settings.environment.as_deref())?;
    config.select_application(settings.application.as_deref())?;

    let oci_config = load_oci_config(&args.oci_config, &args.profile).await?;
    let client =
        HttpDataFlowClient::from_config(&oci_config, Duration::from_secs(args.timeout_secs))
            .await
            .context("Failed to create Data Flow client")?;

    let outcome = reconcile_from_config(&client, &config, &settings).await?;

    match &outcome {
        ReconcileOutcome::Created(app) | ReconcileOutcome::Updated(app) => {
            println!("{}", serde_json::to_string_pretty(app)?);
        }
        ReconcileOutcome::Skipped { .. } => {}
    }

    info!(result = outcome.label(), "Reconciliation finished");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Usage errors exit with 1; --help and --version with 0
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
