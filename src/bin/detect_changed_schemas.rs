use anyhow::Context;
use clap::Parser;
use dataflow_ops::detector::{
    detect_changed_schemas, set_output_command, write_github_output, DetectorSettings, SystemGit,
    DEFAULT_OUTPUT_NAME, DEFAULT_REMOTE, DEFAULT_ROOT_DIR,
};
use dataflow_ops::utils::init_logging;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Detect schema directories changed between a pull request's base and head
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base branch of the pull request
    #[arg(long, env = "GITHUB_BASE_REF")]
    base_ref: Option<String>,

    /// Head branch of the pull request
    #[arg(long, env = "GITHUB_HEAD_REF")]
    head_ref: Option<String>,

    /// Directory whose sub-directories are schemas
    #[arg(long, default_value = DEFAULT_ROOT_DIR)]
    root_dir: String,

    /// Remote to fetch the base branch from
    #[arg(long, default_value = DEFAULT_REMOTE)]
    remote: String,

    /// Name of the step output variable
    #[arg(long, default_value = DEFAULT_OUTPUT_NAME)]
    output_name: String,

    /// Step output file. Falls back to the `set-output` command when unset.
    #[arg(long, env = "GITHUB_OUTPUT")]
    github_output: Option<PathBuf>,
}

async fn run(args: Args) -> anyhow::Result<()> {
    let settings = DetectorSettings {
        base_ref: args.base_ref,
        head_ref: args.head_ref,
        root_dir: args.root_dir,
        remote: args.remote,
    };

    let detection = detect_changed_schemas(&SystemGit::new(), &settings).await;

    // Workflow commands go to stdout, logs to stderr
    if let Some(annotation) = detection.annotation() {
        println!("{annotation}");
    }

    let value = detection.schema_list();
    match args.github_output.filter(|p| !p.as_os_str().is_empty()) {
        Some(path) => write_github_output(&path, &args.output_name, &value)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", set_output_command(&args.output_name, &value)),
    }

    info!(output = %args.output_name, value = %value, "Set step output");
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
