mod common;

use common::{create_test_dir, FakeGit};
use dataflow_ops::detector::{
    detect_changed_schemas, DetectionStatus, DetectorSettings, SystemGit,
};
use std::path::Path;
use std::process::Command;

fn pr_settings(base: &str, head: &str) -> DetectorSettings {
    DetectorSettings {
        base_ref: Some(base.to_string()),
        head_ref: Some(head.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_collects_distinct_schemas_under_root() {
    let git = FakeGit::with_changes(&[
        "SQL/sales/tables/orders.sql",
        "SQL/sales/views/totals.sql",
        "SQL/hr/people.sql",
        "SQL/README.md",
        "docs/sales/notes.md",
        "",
    ]);

    let detection = detect_changed_schemas(&git, &pr_settings("main", "feature/x")).await;

    assert_eq!(detection.status, DetectionStatus::Compared);
    assert_eq!(detection.schema_list(), "hr,sales");
    assert!(detection.annotation().is_none());
    assert_eq!(
        git.calls(),
        vec![
            "git fetch origin main".to_string(),
            "git diff --name-only origin/main...feature/x".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_no_qualifying_paths_yields_empty_list() {
    let git = FakeGit::with_changes(&["src/lib.rs", "README.md"]);

    let detection = detect_changed_schemas(&git, &pr_settings("main", "topic")).await;

    assert_eq!(detection.status, DetectionStatus::Compared);
    assert!(detection.schemas.is_empty());
    assert_eq!(detection.schema_list(), "");
}

#[tokio::test]
async fn test_missing_refs_warn_and_return_empty() {
    let git = FakeGit::with_changes(&["SQL/sales/orders.sql"]);

    for settings in [
        DetectorSettings::default(),
        DetectorSettings {
            base_ref: Some("main".to_string()),
            ..Default::default()
        },
        DetectorSettings {
            head_ref: Some("topic".to_string()),
            ..Default::default()
        },
        pr_settings("", "topic"),
    ] {
        let detection = detect_changed_schemas(&git, &settings).await;
        assert_eq!(detection.status, DetectionStatus::MissingRefs);
        assert!(detection.schemas.is_empty());
        assert!(detection
            .annotation()
            .expect("Should annotate")
            .starts_with("::warning::"));
    }

    // Git is never touched without both refs
    assert!(git.calls().is_empty());
}

#[tokio::test]
async fn test_fetch_failure_degrades_to_empty() {
    let git = FakeGit {
        fetch_error: Some("fatal: couldn't find remote ref main".to_string()),
        ..FakeGit::with_changes(&["SQL/sales/orders.sql"])
    };

    let detection = detect_changed_schemas(&git, &pr_settings("main", "topic")).await;

    assert!(detection.schemas.is_empty());
    assert_eq!(
        detection.annotation().as_deref(),
        Some("::error::Git error: fatal: couldn't find remote ref main")
    );
    assert_eq!(git.calls().len(), 1);
}

#[tokio::test]
async fn test_diff_failure_degrades_to_empty() {
    let git = FakeGit {
        diff_error: Some("fatal: bad revision".to_string()),
        ..Default::default()
    };

    let detection = detect_changed_schemas(&git, &pr_settings("main", "topic")).await;

    assert_eq!(
        detection.status,
        DetectionStatus::GitFailed("fatal: bad revision".to_string())
    );
    assert_eq!(detection.schema_list(), "");
}

#[tokio::test]
async fn test_custom_root_and_remote() {
    let git = FakeGit::with_changes(&["db/migrations/billing/001.sql", "SQL/sales/orders.sql"]);
    let settings = DetectorSettings {
        root_dir: "db/migrations".to_string(),
        remote: "upstream".to_string(),
        ..pr_settings("develop", "topic")
    };

    let detection = detect_changed_schemas(&git, &settings).await;

    assert_eq!(detection.schema_list(), "billing");
    assert_eq!(git.calls()[0], "git fetch upstream develop");
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args([
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .status()
        .expect("run git");
    assert!(status.success(), "git {args:?} failed");
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[tokio::test]
async fn test_system_git_against_local_repository() {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return;
    }

    let temp_dir = create_test_dir();
    let repo = temp_dir.path();
    let repo_str = repo.to_string_lossy().to_string();

    git(repo, &["init", "-q"]);
    git(repo, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    std::fs::create_dir_all(repo.join("SQL/sales")).unwrap();
    std::fs::write(repo.join("SQL/sales/orders.sql"), "select 1;\n").unwrap();
    git(repo, &["add", "."]);
    git(repo, &["commit", "-q", "-m", "base"]);

    git(repo, &["checkout", "-q", "-b", "topic"]);
    std::fs::create_dir_all(repo.join("SQL/hr")).unwrap();
    std::fs::write(repo.join("SQL/hr/people.sql"), "select 2;\n").unwrap();
    std::fs::write(repo.join("SQL/sales/orders.sql"), "select 3;\n").unwrap();
    std::fs::write(repo.join("README.md"), "docs\n").unwrap();
    git(repo, &["add", "."]);
    git(repo, &["commit", "-q", "-m", "topic"]);

    // The repository is its own origin
    git(repo, &["remote", "add", "origin", &repo_str]);

    let detection =
        detect_changed_schemas(&SystemGit::with_workdir(repo), &pr_settings("main", "topic")).await;

    assert_eq!(detection.status, DetectionStatus::Compared);
    assert_eq!(detection.schema_list(), "hr,sales");
}

#[tokio::test]
async fn test_system_git_unknown_branch_reports_error() {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return;
    }

    let temp_dir = create_test_dir();
    let repo = temp_dir.path();
    git(repo, &["init", "-q"]);

    let detection =
        detect_changed_schemas(&SystemGit::with_workdir(repo), &pr_settings("main", "topic")).await;

    assert!(matches!(detection.status, DetectionStatus::GitFailed(_)));
    assert!(detection.schemas.is_empty());
}

#[tokio::test]
async fn test_system_git_keeps_non_ascii_paths() {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return;
    }

    let temp_dir = create_test_dir();
    let repo = temp_dir.path();
    let repo_str = repo.to_string_lossy().to_string();

    git(repo, &["init", "-q"]);
    git(repo, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    std::fs::write(repo.join("README.md"), "base\n").unwrap();
    git(repo, &["add", "."]);
    git(repo, &["commit", "-q", "-m", "base"]);

    git(repo, &["checkout", "-q", "-b", "topic"]);
    std::fs::create_dir_all(repo.join("SQL/ventes")).unwrap();
    std::fs::write(repo.join("SQL/ventes/café.sql"), "select 1;\n").unwrap();
    std::fs::create_dir_all(repo.join("SQL/données")).unwrap();
    std::fs::write(repo.join("SQL/données/clients.sql"), "select 2;\n").unwrap();
    git(repo, &["add", "."]);
    git(repo, &["commit", "-q", "-m", "topic"]);
    git(repo, &["remote", "add", "origin", &repo_str]);

    let detection =
        detect_changed_schemas(&SystemGit::with_workdir(repo), &pr_settings("main", "topic")).await;

    assert_eq!(detection.status, DetectionStatus::Compared);
    assert_eq!(detection.schema_list(), "données,ventes");
}
