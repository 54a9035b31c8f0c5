//! GitHub Actions callback plugin.
//!
//! Turns execution events into workflow commands the Actions runner
//! understands: fold groups around plays or tasks, one annotated line per
//! host result, and a statistics summary at the end. Everything shown is also
//! kept in a transcript that is written to an archive file once the run ends.
//!
//! # Example Output
//!
//! ```text
//! ::group::Play: Deploy
//! ::notice::site.yml | web01 | ok | Deploy | Gather facts
//! ::endgroup::
//! ::warning::site.yml | web01 | changed | Deploy | Install nginx
//! ::endgroup::
//! ::endgroup::
//! ::group::Summary Statistics
//! Totals: ok=1 changed=1 failed=0 skipped=0 unreachable=0
//!
//! Play: Deploy
//!   web01: ok=1 changed=1 failed=0 skipped=0 unreachable=0
//! ::endgroup::
//! ```

use std::fmt;

use tracing::{debug, warn};

use crate::callback::classify::{classify, is_reclassified};
use crate::callback::config::GithubActionsConfig;
use crate::callback::format::{
    display_host, escape_data, failure_detail_lines, fallback_line, format_result_line,
    reclassification_notice, Annotation, LineFields,
};
use crate::callback::grouping::{GroupController, GroupMarker};
use crate::callback::stats::RunStats;
use crate::callback::transcript::Transcript;
use crate::callback::types::{
    PlayInfo, ResolvedGrouping, ResultChannel, ResultInfo, ResultStatus, TaskInfo,
};
use crate::error::Error;
use crate::output::StdoutDisplay;
use crate::traits::{ExecutionCallback, OutputSink};

/// Label of the fold group wrapping the final statistics.
const SUMMARY_GROUP: &str = "Summary Statistics";

/// Mutable state of one run.
#[derive(Debug, Clone)]
struct RunState {
    current_play: Option<String>,
    current_task: Option<String>,
    current_task_path: Option<String>,
    groups: GroupController,
    transcript: Transcript,
    stats: RunStats,
}

impl RunState {
    fn new(config: &GithubActionsConfig) -> Self {
        Self {
            current_play: None,
            current_task: None,
            current_task_path: None,
            groups: GroupController::new(config.grouping),
            transcript: Transcript::new(),
            stats: RunStats::new(),
        }
    }
}

/// Callback emitting GitHub Actions workflow commands.
///
/// One instance observes one run. Call [`reset`](Self::reset) before
/// reusing it.
///
/// # Usage
///
/// ```rust,ignore
/// use github_actions_callback::prelude::*;
///
/// let config = ConfigLoader::new().load();
/// let mut callback = GithubActionsCallback::new(config);
/// for event in events {
///     callback.handle_event(&event);
/// }
/// ```
pub struct GithubActionsCallback {
    config: GithubActionsConfig,
    display: Box<dyn OutputSink>,
    state: RunState,
}

impl fmt::Debug for GithubActionsCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubActionsCallback")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl GithubActionsCallback {
    /// Creates a callback printing to stdout.
    #[must_use]
    pub fn new(config: GithubActionsConfig) -> Self {
        Self::with_display(config, Box::new(StdoutDisplay))
    }

    /// Creates a callback showing its lines on `display`.
    #[must_use]
    pub fn with_display(config: GithubActionsConfig, display: Box<dyn OutputSink>) -> Self {
        let state = RunState::new(&config);
        Self {
            config,
            display,
            state,
        }
    }

    /// Discards all run state: groups, transcript, statistics and the
    /// current play and task.
    pub fn reset(&mut self) {
        self.state = RunState::new(&self.config);
    }

    pub fn config(&self) -> &GithubActionsConfig {
        &self.config
    }

    /// Every line shown so far.
    pub fn transcript(&self) -> &Transcript {
        &self.state.transcript
    }

    pub fn stats(&self) -> &RunStats {
        &self.state.stats
    }

    /// Grouping in effect for the current play.
    pub fn current_grouping(&self) -> Option<ResolvedGrouping> {
        self.state.groups.current()
    }

    pub fn play_group_open(&self) -> bool {
        self.state.groups.play_open()
    }

    pub fn task_group_open(&self) -> bool {
        self.state.groups.task_open()
    }

    pub fn current_play(&self) -> Option<&str> {
        self.state.current_play.as_deref()
    }

    pub fn current_task(&self) -> Option<&str> {
        self.state.current_task.as_deref()
    }

    /// Shows a line and appends it to the transcript.
    fn emit(&mut self, line: impl Into<String>) {
        let line = line.into();
        self.display.display(&line);
        self.state.transcript.push(line);
    }

    fn emit_markers(&mut self, markers: Vec<GroupMarker>) {
        for marker in markers {
            self.emit(marker.to_string());
        }
    }

    /// Turns an internal failure into a diagnostic line.
    fn report(&mut self, err: &Error) {
        warn!("github actions callback: {}", err);
        let line = match err {
            Error::StatsOverflow { .. } => Annotation::Notice.line(&escape_data(&format!(
                "Statistics update failed: {err}"
            ))),
            Error::ArchiveWrite { path, source } => {
                Annotation::Notice.line(&escape_data(&format!(
                    "Failed to write archive file {}: {source}",
                    path.display()
                )))
            }
            other => fallback_line(other),
        };
        self.emit(line);
    }

    fn record_stats(&mut self, status: ResultStatus, result: &ResultInfo) {
        let play = self.state.current_play.as_deref().unwrap_or_default();
        if let Err(err) = self.state.stats.record(play, display_host(result), status) {
            self.report(&err);
        }
    }
}

impl ExecutionCallback for GithubActionsCallback {
    fn on_play_start(&mut self, play: &PlayInfo) {
        let name = play.name.trim().to_string();
        let markers = self.state.groups.play_start(&name, play.host_count());
        debug!(
            play = %name,
            hosts = play.host_count(),
            grouping = ?self.state.groups.current(),
            "play started"
        );
        self.state.current_play = Some(name);
        self.emit_markers(markers);
    }

    fn on_task_start(&mut self, task: &TaskInfo) {
        let name = task.name.trim().to_string();
        let markers = self.state.groups.task_start(&name);
        self.state.current_task = Some(name);
        self.state.current_task_path = task.path.clone();
        self.emit_markers(markers);
    }

    fn on_result(&mut self, channel: ResultChannel, result: &ResultInfo) {
        let status = classify(channel, result);

        if is_reclassified(channel, result) {
            debug!(host = ?result.host, "ok result carries changed flag, counting as changed");
            if self.config.verbose {
                self.emit(reclassification_notice(display_host(result)));
            }
        }

        self.record_stats(status, result);

        let fields = LineFields::extract(
            status,
            result,
            self.state.current_play.as_deref(),
            self.state.current_task.as_deref(),
            self.state.current_task_path.as_deref(),
        );
        match fields {
            Ok(fields) => {
                self.emit(format_result_line(&fields));
                self.emit(GroupMarker::Close.to_string());
            }
            Err(err) => self.report(&err),
        }

        if self.config.verbose && status == ResultStatus::Failed {
            for line in failure_detail_lines(result) {
                self.emit(line);
            }
        }
    }

    fn on_run_end(&mut self) {
        let markers = self.state.groups.finish();
        self.emit_markers(markers);

        self.emit(GroupMarker::open(SUMMARY_GROUP).to_string());
        for line in self.state.stats.render_summary() {
            self.emit(line);
        }
        self.emit(GroupMarker::Close.to_string());

        if let Err(err) = self.state.transcript.write_to(&self.config.archive_file) {
            self.report(&err);
        }
    }
}
