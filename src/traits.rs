//! Core traits connecting the callback to its surroundings.
//!
//! [`ExecutionCallback`] is the contract the orchestration engine drives:
//! four entry points, called in run order on a single thread. [`OutputSink`]
//! is where formatted lines go.

use crate::callback::types::{CallbackEvent, PlayInfo, ResultChannel, ResultInfo, TaskInfo};

// ============================================================================
// Execution Callback Trait
// ============================================================================

/// Receives execution events in the order they happen.
///
/// None of the methods return errors: an observer must not be able to abort
/// the run it is observing. Implementations turn internal failures into
/// diagnostic output instead.
///
/// # Example
///
/// ```rust,ignore
/// use github_actions_callback::prelude::*;
///
/// let mut callback = GithubActionsCallback::new(GithubActionsConfig::default());
/// callback.on_play_start(&PlayInfo::new("Deploy").with_hosts(["web01"]));
/// callback.on_task_start(&TaskInfo::new("Restart service"));
/// callback.on_result(ResultChannel::Ok, &ResultInfo::new("web01"));
/// callback.on_run_end();
/// ```
pub trait ExecutionCallback {
    /// Called when a play starts.
    fn on_play_start(&mut self, play: &PlayInfo);

    /// Called when a task starts.
    fn on_task_start(&mut self, task: &TaskInfo);

    /// Called for every per-host result, with the channel it arrived on.
    fn on_result(&mut self, channel: ResultChannel, result: &ResultInfo);

    /// Called once when the run is over.
    fn on_run_end(&mut self);

    /// Dispatches a wire event to the matching entry point.
    fn handle_event(&mut self, event: &CallbackEvent) {
        match event {
            CallbackEvent::PlayStart { play } => self.on_play_start(play),
            CallbackEvent::TaskStart { task } => self.on_task_start(task),
            CallbackEvent::Stats => self.on_run_end(),
            other => {
                if let Some((channel, result)) = other.as_result() {
                    self.on_result(channel, result);
                }
            }
        }
    }
}

// ============================================================================
// Output Sink Trait
// ============================================================================

/// Destination for display lines.
pub trait OutputSink: Send {
    /// Shows one line. The line carries no trailing newline.
    fn display(&mut self, line: &str);
}
