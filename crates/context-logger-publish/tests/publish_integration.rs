//! Integration test: snapshots published into a local git repository.
//!
//! Tests return early when no `git` binary is available. Nothing is pushed;
//! the repositories have no remote.

use chrono::{Local, TimeZone};
use context_logger_core::{
    Construct, ConstructKind, ContextSnapshot, MatchResult, PublishConfig, TypingTotals,
};
use context_logger_publish::{PublishError, Publisher};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git should run");
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn git_repo() -> Option<TempDir> {
    Command::new("git").arg("--version").output().ok()?;
    let dir = TempDir::new().expect("temp dir");
    git(dir.path(), &["init", "--quiet"]);
    git(dir.path(), &["config", "user.name", "Test"]);
    git(dir.path(), &["config", "user.email", "test@example.com"]);
    git(dir.path(), &["config", "commit.gpgsign", "false"]);
    Some(dir)
}

fn snapshot(name: &str, typed: usize) -> ContextSnapshot {
    ContextSnapshot {
        project_name: "inventory".into(),
        file_name: "stock.go".into(),
        construct: Construct::Found(MatchResult::new(ConstructKind::Function, name)),
        totals: TypingTotals {
            chars_typed: typed,
            ..TypingTotals::default()
        },
        timestamp: Local
            .with_ymd_and_hms(2024, 6, 10, 8, 0, 0)
            .single()
            .expect("unambiguous local time"),
    }
}

#[test]
fn publishes_newest_row_first_with_one_commit_each() {
    let Some(dir) = git_repo() else { return };
    let publisher = Publisher::setup(dir.path(), "index.html")
        .expect("setup should succeed")
        .with_push(false);

    publisher.publish(&snapshot("Reserve", 4)).expect("first publish");
    publisher.publish(&snapshot("Release", 9)).expect("second publish");

    let html = std::fs::read_to_string(dir.path().join("index.html")).expect("log exists");
    let newer = html.find("function: Release").expect("newer row");
    let older = html.find("function: Reserve").expect("older row");
    assert!(newer < older);

    let subjects = git(dir.path(), &["log", "--format=%s"]);
    assert_eq!(
        subjects.lines().collect::<Vec<_>>(),
        vec![
            "Update index.html with latest logs",
            "Update index.html with latest logs"
        ]
    );
}

#[test]
fn configured_file_and_message_are_used() {
    let Some(dir) = git_repo() else { return };
    let config = PublishConfig {
        repo: Some(dir.path().to_path_buf()),
        html_file: "log.html".into(),
        commit_message: "chore: log".into(),
        push: false,
        ..PublishConfig::default()
    };

    let publisher = Publisher::from_config(&config).expect("setup should succeed");
    publisher.publish(&snapshot("Count", 1)).expect("publish");

    assert!(dir.path().join("log.html").exists());
    assert_eq!(git(dir.path(), &["log", "--format=%s"]).trim(), "chore: log");
}

#[test]
fn existing_log_is_kept_on_setup() {
    let Some(dir) = git_repo() else { return };
    std::fs::write(dir.path().join("index.html"), "<p>mine</p>").expect("write");

    Publisher::setup(dir.path(), "index.html").expect("setup should succeed");
    let html = std::fs::read_to_string(dir.path().join("index.html")).expect("read");
    assert_eq!(html, "<p>mine</p>");
}

#[test]
fn missing_table_commits_nothing() {
    let Some(dir) = git_repo() else { return };
    std::fs::write(dir.path().join("index.html"), "<p>mine</p>").expect("write");
    let publisher = Publisher::setup(dir.path(), "index.html")
        .expect("setup should succeed")
        .with_push(false);

    let err = publisher.publish(&snapshot("Count", 1)).unwrap_err();
    assert!(matches!(err, PublishError::TableNotFound { .. }));
    assert!(git(dir.path(), &["log", "--format=%s"]).is_empty());
}

#[test]
fn push_failure_is_reported_after_commit() {
    let Some(dir) = git_repo() else { return };
    let publisher = Publisher::setup(dir.path(), "index.html").expect("setup should succeed");

    let err = publisher.publish(&snapshot("Count", 1)).unwrap_err();
    assert!(matches!(err, PublishError::Git { ref command, .. } if command == "push"));
    assert_eq!(git(dir.path(), &["log", "--format=%s"]).lines().count(), 1);
}
