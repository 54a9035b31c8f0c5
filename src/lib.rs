//! # GitHub Actions Callback
//!
//! Renders the events of a configuration-management run as GitHub Actions
//! workflow commands: foldable groups per play or per task, one annotated
//! line per host result, and a per-play, per-host statistics summary. The
//! complete output is also written to an archive file when the run ends.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │            Event source (engine, or gha-callback CLI)         │
//! └──────────────────────────────────────────────────────────────┘
//!                               │  ExecutionCallback
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    GithubActionsCallback                      │
//! │   classify ──► grouping ──► format            stats           │
//! └──────────────────────────────────────────────────────────────┘
//!                │                          │
//!                ▼                          ▼
//!      ┌──────────────────┐        ┌──────────────────┐
//!      │   OutputSink     │        │    Transcript    │
//!      │ (stdout, capture)│        │  (archive file)  │
//!      └──────────────────┘        └──────────────────┘
//! ```
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use github_actions_callback::prelude::*;
//!
//! let mut callback = GithubActionsCallback::new(GithubActionsConfig::default());
//! callback.on_play_start(&PlayInfo::new("Deploy").with_hosts(["web01"]));
//! callback.on_task_start(&TaskInfo::new("Restart service").with_path("/plays/site.yml:12"));
//! callback.on_result(ResultChannel::Failed, &ResultInfo::new("web01"));
//! callback.on_run_end();
//! // ::group::Play: Deploy
//! // ::error::site.yml:12 | web01 | failed | Deploy | Restart service
//! // ::endgroup::
//! // ...
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod callback;
pub mod error;
pub mod output;
pub mod traits;

// Re-export commonly used items in prelude
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.
    //!
    //! - **Callback**: [`GithubActionsCallback`] and its configuration
    //! - **Events**: play, task and result types
    //! - **Sinks**: stdout and in-memory displays
    //! - **Errors**: [`Error`] and [`Result`]

    pub use crate::callback::prelude::*;
    pub use crate::error::{Error, Result};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
