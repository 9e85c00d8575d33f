//! End-to-end tests of the `context-logger` binary.
//!
//! Each test runs in its own temp directory with an empty global config
//! directory, so no user configuration leaks in.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn context_logger(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_context-logger"))
        .args(args)
        .current_dir(dir)
        .env("CONTEXT_LOGGER_CONFIG_DIR", dir.join("global"))
        .env_remove("RUST_LOG")
        .output()
        .expect("binary should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn locate_prints_enclosing_construct() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("shapes.java"),
        "public class Shapes {\n    public static double area(double r) {\n        return r * r;\n    }\n}\n",
    )
    .unwrap();

    let output = context_logger(tmp.path(), &["locate", "shapes.java", "--line", "3"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "function: area");
}

#[test]
fn locate_rejects_out_of_range_line() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("a.py"), "x = 1\n").unwrap();

    let output = context_logger(tmp.path(), &["locate", "a.py", "--line", "0"]);
    assert!(!output.status.success());
}

#[test]
fn locate_json_output() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("notes.txt"), "nothing here\n").unwrap();

    let output = context_logger(
        tmp.path(),
        &["locate", "notes.txt", "--line", "1", "--format", "json"],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), r#"{"status":"unknown"}"#);
}

#[test]
fn replay_prints_one_line_per_tick() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("events.jsonl"),
        concat!(
            r#"{"type":"tick"}"#,
            "\n",
            r#"{"type":"open","path":"web/app.js","text":"class App {\n  render() {\n"}"#,
            "\n",
            r#"{"type":"change","path":"web/app.js","text":"class App {\n  render() {\n    go\n","edits":[{"rangeOffset":25,"rangeLength":0,"text":"    go\n"}]}"#,
            "\n",
            r#"{"type":"tick"}"#,
            "\n",
        ),
    )
    .unwrap();

    let output = context_logger(tmp.path(), &["replay", "events.jsonl"]);
    assert!(output.status.success());

    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "No active editor found.");
    assert!(lines[1].starts_with(
        "Project: Untitled Project, File: app.js, Function: class: App, Chars Typed: 7, \
         Chars Deleted: 0, Words Added: 1, Words Deleted: 0, Date: "
    ));
}

#[test]
fn project_config_is_picked_up() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("context-logger.toml"),
        "[languages.zig]\nfunction = 'fn\\s+(\\w+)\\s*\\('\n",
    )
    .unwrap();
    std::fs::write(tmp.path().join("main.zig"), "pub fn main() void {\n}\n").unwrap();

    let output = context_logger(
        tmp.path(),
        &["locate", "main.zig", "--line", "1", "--language", "zig"],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "function: main");

    let output = context_logger(tmp.path(), &["list-languages"]);
    assert!(stdout(&output).contains("zig"));
}

#[test]
fn invalid_pattern_fails_startup() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("context-logger.toml"),
        "[languages.zig]\nfunction = 'fn (('\n",
    )
    .unwrap();
    std::fs::write(tmp.path().join("main.zig"), "pub fn main() void {\n").unwrap();

    let output = context_logger(tmp.path(), &["locate", "main.zig", "--line", "1"]);
    assert!(!output.status.success());
}

#[test]
fn init_writes_config_once() {
    let tmp = TempDir::new().unwrap();

    let output = context_logger(tmp.path(), &["init"]);
    assert!(output.status.success());
    assert!(tmp.path().join("context-logger.toml").exists());

    let output = context_logger(tmp.path(), &["init"]);
    assert!(!output.status.success());
}

#[test]
fn config_found_from_nested_directory() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir(tmp.path().join(".git")).unwrap();
    std::fs::write(
        tmp.path().join(".context-logger.toml"),
        "[languages.zig]\nfunction = 'fn\\s+(\\w+)\\s*\\('\n",
    )
    .unwrap();
    let src = tmp.path().join("src");
    std::fs::create_dir(&src).unwrap();
    std::fs::write(src.join("main.zig"), "pub fn main() void {\n}\n").unwrap();

    let output = context_logger(
        &src,
        &["locate", "main.zig", "--line", "1", "--language", "zig"],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "function: main");
}
