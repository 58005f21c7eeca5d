use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to run `{command}`: {source}")]
    SpawnError {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {status:?}: {stderr}")]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },
}

impl GitError {
    /// Standard error of the failed command, or the spawn error
    pub fn stderr(&self) -> String {
        match self {
            GitError::SpawnError { source, .. } => source.to_string(),
            GitError::CommandFailed { stderr, .. } => stderr.clone(),
        }
    }
}

/// The git operations the detector needs
#[async_trait]
pub trait GitClient: Send + Sync {
    /// Fetch `branch` from `remote`
    async fn fetch(&self, remote: &str, branch: &str) -> Result<(), GitError>;

    /// Paths changed in `range` (`git diff --name-only <range>`), verbatim
    async fn diff_names(&self, range: &str) -> Result<Vec<String>, GitError>;
}

/// Runs the `git` binary
#[derive(Debug, Clone, Default)]
pub struct SystemGit {
    workdir: Option<PathBuf>,
}

impl SystemGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run git inside `workdir` instead of the current directory
    pub fn with_workdir(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(workdir.into()),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let command = format!("git {}", args.join(" "));
        debug!(command = %command, "Running git");

        let mut cmd = Command::new("git");
        cmd.args(args);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await.map_err(|source| GitError::SpawnError {
            command: command.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl GitClient for SystemGit {
    async fn fetch(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        self.run(&["fetch", remote, branch]).await.map(|_| ())
    }

    async fn diff_names(&self, range: &str) -> Result<Vec<String>, GitError> {
        // Without these git quotes and octal-escapes non-ASCII paths
        let stdout = self
            .run(&["-c", "core.quotePath=false", "diff", "--name-only", "-z", range])
            .await?;
        Ok(split_nul(&stdout))
    }
}

fn split_nul(stdout: &str) -> Vec<String> {
    stdout
        .split('\0')
        .filter(|path| !path.is_empty())
        .map(str::to_string)
        .collect()
}
