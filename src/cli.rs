//! Command-line arguments for `gha-callback`.

use std::ffi::OsStr;
use std::path::PathBuf;

use clap::Parser;
use github_actions_callback::callback::{ConfigOverrides, GroupingMode};

/// Replay execution events as GitHub Actions workflow commands
///
/// Reads one JSON event per line (play_start, task_start, task_ok,
/// task_changed, task_failed, task_skipped, task_unreachable, stats) and
/// prints fold groups, annotated result lines and a statistics summary.
#[derive(Parser, Debug, Clone)]
#[command(name = "gha-callback")]
#[command(version)]
#[command(about = "Replay execution events as GitHub Actions workflow commands", long_about = None)]
pub struct Cli {
    /// JSON-lines event stream ("-" or omitted for stdin)
    pub events: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short = 'c', long, env = "GHA_CALLBACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Fail instead of ignoring unreadable config files and unknown values
    #[arg(long)]
    pub strict_config: bool,

    /// Show failure details and reclassification notices
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Where to write the transcript at the end of the run
    #[arg(long, value_name = "PATH")]
    pub archive_file: Option<PathBuf>,

    /// Fold strategy: smart, play or task
    #[arg(short = 'g', long, value_name = "MODE")]
    pub grouping: Option<GroupingMode>,

    /// Emit diagnostics on stderr as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// Options given on the command line, to be layered over the config.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            verbose: self.verbose.then_some(true),
            archive_file: self.archive_file.clone(),
            grouping: self.grouping,
        }
    }

    /// The event file, or `None` for stdin.
    pub fn events_path(&self) -> Option<&PathBuf> {
        self.events
            .as_ref()
            .filter(|path| path.as_os_str() != OsStr::new("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides_from_flags() {
        let cli = Cli::parse_from(["gha-callback", "events.jsonl", "--verbose", "-g", "Task"]);
        let overrides = cli.overrides();
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.grouping, Some(GroupingMode::Task));
        assert_eq!(overrides.archive_file, None);
        assert_eq!(cli.events_path(), Some(&PathBuf::from("events.jsonl")));
    }

    #[test]
    fn test_dash_means_stdin() {
        let cli = Cli::parse_from(["gha-callback", "-"]);
        assert!(cli.events_path().is_none());
        assert!(cli.overrides().is_empty());
    }

    #[test]
    fn test_unknown_grouping_is_rejected() {
        assert!(Cli::try_parse_from(["gha-callback", "--grouping", "weekly"]).is_err());
    }
}
