//! Callback plugins.
//!
//! # Available Plugins
//!
//! - [`GithubActionsCallback`] - Workflow-command output for GitHub Actions

pub mod github_actions;

pub use github_actions::GithubActionsCallback;
