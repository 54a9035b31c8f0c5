//! Callback System for GitHub Actions Output
//!
//! This module receives execution events and turns them into GitHub Actions
//! workflow commands.
//!
//! # Architecture
//!
//! The pipeline is built from small, separately testable parts:
//!
//! 1. **[`types`]**: the events and the closed enumerations
//! 2. **[`classify`]**: maps a reported result to its status
//! 3. **[`grouping`]**: decides when fold groups open and close
//! 4. **[`format`]**: renders result lines and diagnostics
//! 5. **[`stats`]**: per-play, per-host counters and the summary
//! 6. **[`transcript`]**: everything shown, for the archive file
//! 7. **[`config`]**: option resolution
//!
//! [`GithubActionsCallback`] in [`plugins`] drives them through the
//! [`ExecutionCallback`] contract.
//!
//! # Quick Start with Prelude
//!
//! ```rust,ignore
//! use github_actions_callback::callback::prelude::*;
//!
//! let config = ConfigLoader::new().with_grouping(GroupingMode::Task).load();
//! let mut callback = GithubActionsCallback::new(config);
//!
//! callback.on_play_start(&PlayInfo::new("Deploy").with_hosts(["web01", "web02"]));
//! callback.on_task_start(&TaskInfo::new("Install nginx"));
//! callback.on_result(ResultChannel::Changed, &ResultInfo::new("web01"));
//! callback.on_run_end();
//! ```
//!
//! [`ExecutionCallback`]: crate::traits::ExecutionCallback

pub mod classify;
pub mod config;
pub mod format;
pub mod grouping;
pub mod plugins;
pub mod stats;
pub mod transcript;
pub mod types;

pub use config::{ConfigLoader, ConfigOverrides, GithubActionsConfig};
pub use grouping::{GroupController, GroupMarker};
pub use plugins::GithubActionsCallback;
pub use stats::{RunStats, StatRecord};
pub use transcript::Transcript;
pub use types::{
    CallbackEvent, GroupingMode, PlayInfo, ResolvedGrouping, ResultChannel, ResultInfo,
    ResultPayload, ResultStatus, TaskInfo,
};

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for driving the callback.
pub mod prelude {
    pub use super::classify::classify;
    pub use super::config::{ConfigLoader, ConfigOverrides, GithubActionsConfig};
    pub use super::plugins::GithubActionsCallback;
    pub use super::stats::{RunStats, StatRecord};
    pub use super::types::{
        CallbackEvent, GroupingMode, PlayInfo, ResolvedGrouping, ResultChannel, ResultInfo,
        ResultPayload, ResultStatus, TaskInfo,
    };
    pub use crate::output::{CaptureDisplay, NullDisplay, StdoutDisplay};
    pub use crate::traits::{ExecutionCallback, OutputSink};
}
