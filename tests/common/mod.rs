//! Shared fixtures for the integration tests.
//!
//! ```rust,ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

use github_actions_callback::prelude::*;

/// A callback wired to an in-memory display and a private archive path.
pub struct Harness {
    pub callback: GithubActionsCallback,
    pub display: CaptureDisplay,
    pub archive: PathBuf,
    _dir: TempDir,
}

impl Harness {
    pub fn new(config: GithubActionsConfig) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let archive = dir.path().join("ansible-github-actions.log");
        let display = CaptureDisplay::new();
        let callback = GithubActionsCallback::with_display(
            config.with_archive_file(&archive),
            Box::new(display.clone()),
        );
        Self {
            callback,
            display,
            archive,
            _dir: dir,
        }
    }

    pub fn with_grouping(grouping: GroupingMode) -> Self {
        Self::new(GithubActionsConfig::default().with_grouping(grouping))
    }

    pub fn verbose() -> Self {
        Self::new(GithubActionsConfig::default().with_verbose(true))
    }

    pub fn lines(&self) -> Vec<String> {
        self.display.lines()
    }

    pub fn archive_lines(&self) -> Vec<String> {
        std::fs::read_to_string(&self.archive)
            .expect("read archive")
            .lines()
            .map(String::from)
            .collect()
    }

    pub fn play(&mut self, name: &str, hosts: &[&str]) -> &mut Self {
        self.callback
            .on_play_start(&PlayInfo::new(name).with_hosts(hosts.iter().copied()));
        self
    }

    pub fn task(&mut self, name: &str, path: &str) -> &mut Self {
        self.callback
            .on_task_start(&TaskInfo::new(name).with_path(path));
        self
    }

    pub fn result(&mut self, channel: ResultChannel, host: &str) -> &mut Self {
        self.callback.on_result(channel, &ResultInfo::new(host));
        self
    }

    pub fn result_with(&mut self, channel: ResultChannel, result: ResultInfo) -> &mut Self {
        self.callback.on_result(channel, &result);
        self
    }

    pub fn end(&mut self) -> &mut Self {
        self.callback.on_run_end();
        self
    }
}

/// Wraps a result as the wire event for `channel`.
pub fn result_event(channel: ResultChannel, result: ResultInfo) -> CallbackEvent {
    match channel {
        ResultChannel::Ok => CallbackEvent::TaskOk { result },
        ResultChannel::Changed => CallbackEvent::TaskChanged { result },
        ResultChannel::Failed => CallbackEvent::TaskFailed {
            result,
            ignore_errors: false,
        },
        ResultChannel::Skipped => CallbackEvent::TaskSkipped { result },
        ResultChannel::Unreachable => CallbackEvent::TaskUnreachable { result },
    }
}

/// Serializes events as a JSON-lines stream.
pub fn to_json_lines(events: &[CallbackEvent]) -> String {
    events
        .iter()
        .map(|event| serde_json::to_string(event).expect("serialize event"))
        .collect::<Vec<_>>()
        .join("\n")
}
