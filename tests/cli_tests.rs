//! CLI tests for `gha-callback`, run through assert_cmd.

mod common;

use assert_cmd::Command;
use common::*;
use predicates::prelude::*;
use std::fs;
use tempfile::{tempdir, TempDir};

use github_actions_callback::prelude::*;

// Helper to get a command isolated from the caller's environment
fn gha_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gha-callback").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("GITHUB_ACTIONS_VERBOSE")
        .env_remove("GITHUB_ACTIONS_ARCHIVE_FILE")
        .env_remove("GITHUB_ACTIONS_GROUPING")
        .env_remove("GHA_CALLBACK_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn sample_events() -> String {
    to_json_lines(&[
        CallbackEvent::PlayStart {
            play: PlayInfo::new("Deploy").with_hosts(["web01"]),
        },
        CallbackEvent::TaskStart {
            task: TaskInfo::new("Restart service").with_path("/plays/site.yml"),
        },
        result_event(ResultChannel::Failed, ResultInfo::new("web01")),
        CallbackEvent::Stats,
    ])
}

#[test]
fn test_help() {
    let dir = tempdir().unwrap();
    gha_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--grouping"))
        .stdout(predicate::str::contains("--archive-file"));
}

#[test]
fn test_version() {
    let dir = tempdir().unwrap();
    gha_cmd(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_replay_from_file() {
    let dir = tempdir().unwrap();
    let events = dir.path().join("events.jsonl");
    fs::write(&events, sample_events()).unwrap();

    gha_cmd(&dir)
        .arg(&events)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("::group::Play: Deploy\n"))
        .stdout(predicate::str::contains(
            "::error::site.yml | web01 | failed | Deploy | Restart service\n::endgroup::\n",
        ))
        .stdout(predicate::str::contains("::group::Summary Statistics"));

    let archive = fs::read_to_string(dir.path().join("ansible-github-actions.log")).unwrap();
    assert!(archive.contains("Totals: ok=0 changed=0 failed=1 skipped=0 unreachable=0"));
}

#[test]
fn test_replay_from_stdin() {
    let dir = tempdir().unwrap();
    gha_cmd(&dir)
        .arg("-")
        .write_stdin(sample_events())
        .assert()
        .success()
        .stdout(predicate::str::contains("  web01: ok=0 changed=0 failed=1"));
}

#[test]
fn test_stdout_matches_archive() {
    let dir = tempdir().unwrap();
    let output = gha_cmd(&dir)
        .args(["--archive-file", "run.log"])
        .write_stdin(sample_events())
        .output()
        .unwrap();

    assert!(output.status.success());
    let archive = fs::read_to_string(dir.path().join("run.log")).unwrap();
    assert_eq!(String::from_utf8(output.stdout).unwrap(), archive);
}

#[test]
fn test_missing_stats_still_prints_summary() {
    let dir = tempdir().unwrap();
    let events = to_json_lines(&[
        CallbackEvent::PlayStart {
            play: PlayInfo::new("P").with_hosts(["a", "b"]),
        },
        CallbackEvent::TaskStart {
            task: TaskInfo::new("T"),
        },
        result_event(ResultChannel::Ok, ResultInfo::new("a")),
    ]);

    gha_cmd(&dir)
        .write_stdin(events)
        .assert()
        .success()
        .stdout(predicate::str::contains("::group::Task: T"))
        .stdout(predicate::str::contains(
            "Totals: ok=1 changed=0 failed=0 skipped=0 unreachable=0",
        ));
}

#[test]
fn test_malformed_and_blank_lines_are_skipped() {
    let dir = tempdir().unwrap();
    let events = format!(
        "\n{{not json}}\n{}\n   \n{{\"event_type\":\"nope\"}}\n{}\n",
        r#"{"event_type":"task_ok","result":{"host":"a"}}"#,
        r#"{"event_type":"stats"}"#
    );

    gha_cmd(&dir)
        .write_stdin(events)
        .assert()
        .success()
        .stdout(predicate::str::contains("::notice:: | a | ok |  | "))
        .stdout(predicate::str::contains("ok=1"))
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn test_verbose_and_grouping_flags() {
    let dir = tempdir().unwrap();
    let events = to_json_lines(&[
        CallbackEvent::PlayStart {
            play: PlayInfo::new("P").with_hosts(["a"]),
        },
        CallbackEvent::TaskStart {
            task: TaskInfo::new("T"),
        },
        result_event(
            ResultChannel::Failed,
            ResultInfo::new("a").with_payload(ResultPayload::new().with_msg("disk full")),
        ),
    ]);

    gha_cmd(&dir)
        .args(["--verbose", "--grouping", "task"])
        .write_stdin(events)
        .assert()
        .success()
        .stdout(predicate::str::contains("::group::Task: T"))
        .stdout(predicate::str::contains("::group::Play:").not())
        .stdout(predicate::str::contains("::error::Error details: disk full"));
}

#[test]
fn test_env_overrides_config() {
    let dir = tempdir().unwrap();
    gha_cmd(&dir)
        .env("GITHUB_ACTIONS_ARCHIVE_FILE", "from-env.log")
        .write_stdin(sample_events())
        .assert()
        .success();

    assert!(dir.path().join("from-env.log").exists());
    assert!(!dir.path().join("ansible-github-actions.log").exists());
}

#[test]
fn test_config_file_is_applied() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("ci.toml");
    fs::write(&config, "[github_actions]\ngrouping = \"task\"\n").unwrap();

    gha_cmd(&dir)
        .arg("--config")
        .arg(&config)
        .write_stdin(sample_events())
        .assert()
        .success()
        .stdout(predicate::str::contains("::group::Task: Restart service"));
}

#[test]
fn test_unwritable_archive_is_a_notice_not_a_failure() {
    let dir = tempdir().unwrap();
    gha_cmd(&dir)
        .args(["--archive-file", "missing/dir/run.log"])
        .write_stdin(sample_events())
        .assert()
        .success()
        .stdout(predicate::str::contains("::notice::Failed to write archive file"));
}

#[test]
fn test_strict_config_rejects_unknown_values() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[github_actions]\ngrouping = \"weekly\"\n").unwrap();

    gha_cmd(&dir)
        .arg("--config")
        .arg(&config)
        .write_stdin(sample_events())
        .assert()
        .success()
        .stdout(predicate::str::contains("::group::Play: Deploy"));

    gha_cmd(&dir)
        .arg("--strict-config")
        .arg("--config")
        .arg(&config)
        .write_stdin(sample_events())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("grouping"));
}

#[test]
fn test_missing_event_file_fails() {
    let dir = tempdir().unwrap();
    gha_cmd(&dir)
        .arg("no-such-events.jsonl")
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to open event stream"))
        .stderr(predicate::str::contains("no-such-events.jsonl"));
}

#[test]
fn test_invalid_grouping_flag_is_usage_error() {
    let dir = tempdir().unwrap();
    gha_cmd(&dir)
        .args(["--grouping", "weekly"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("weekly"));
}
