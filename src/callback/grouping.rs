//! Fold-group state machine.
//!
//! Tracks two independent flags, one for the play-level group and one for
//! the task-level group, and decides per grouping mode when each opens and
//! closes. A group of either kind is always closed before another of the
//! same kind opens, so repeated or out-of-order start events never leave a
//! fold region unterminated.
//!
//! Operations return the markers to emit instead of printing them; the
//! driver owns the display.

use std::fmt;

use super::format::escape_data;
use super::types::{GroupingMode, ResolvedGrouping};

/// Label prefix for play-level groups.
const PLAY_LABEL: &str = "Play";
/// Label prefix for task-level groups.
const TASK_LABEL: &str = "Task";

/// A fold-group delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupMarker {
    /// `::group::<label>`
    Open(String),
    /// `::endgroup::`
    Close,
}

impl GroupMarker {
    /// Opens a group with the given label.
    pub fn open(label: impl Into<String>) -> Self {
        GroupMarker::Open(label.into())
    }
}

impl fmt::Display for GroupMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupMarker::Open(label) => write!(f, "::group::{label}"),
            GroupMarker::Close => f.write_str("::endgroup::"),
        }
    }
}

/// Play/task group controller.
#[derive(Debug, Clone, Default)]
pub struct GroupController {
    /// Configured strategy
    mode: GroupingMode,
    /// Strategy resolved for the current play
    current: Option<ResolvedGrouping>,
    /// Whether a play-level group is open
    play_open: bool,
    /// Whether a task-level group is open
    task_open: bool,
}

impl GroupController {
    /// Creates a controller for the configured mode with all groups closed.
    pub fn new(mode: GroupingMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Configured strategy.
    pub fn mode(&self) -> GroupingMode {
        self.mode
    }

    /// Strategy in effect for the current play, once a play has started.
    pub fn current(&self) -> Option<ResolvedGrouping> {
        self.current
    }

    /// Whether a play-level group is open.
    pub fn play_open(&self) -> bool {
        self.play_open
    }

    /// Whether a task-level group is open.
    pub fn task_open(&self) -> bool {
        self.task_open
    }

    /// Handles a play start.
    ///
    /// Only the play group is closed here; an open task group from the
    /// previous play stays open until the next task start or [`finish`].
    ///
    /// [`finish`]: GroupController::finish
    pub fn play_start(&mut self, name: &str, host_count: usize) -> Vec<GroupMarker> {
        let mut markers = Vec::new();
        if self.play_open {
            markers.push(GroupMarker::Close);
            self.play_open = false;
        }

        let resolved = self.mode.resolve(host_count);
        self.current = Some(resolved);

        if resolved == ResolvedGrouping::Play {
            markers.push(GroupMarker::open(format!("{PLAY_LABEL}: {}", escape_data(name))));
            self.play_open = true;
        }
        markers
    }

    /// Handles a task start.
    ///
    /// A task seen before any play resolves the configured mode as if the
    /// play had no hosts.
    pub fn task_start(&mut self, name: &str) -> Vec<GroupMarker> {
        let mut markers = Vec::new();
        if self.task_open {
            markers.push(GroupMarker::Close);
            self.task_open = false;
        }

        let mode = self.mode;
        let resolved = *self.current.get_or_insert_with(|| mode.resolve(0));
        if resolved == ResolvedGrouping::Task {
            markers.push(GroupMarker::open(format!("{TASK_LABEL}: {}", escape_data(name))));
            self.task_open = true;
        }
        markers
    }

    /// Closes the task group, then the play group, whichever are open.
    ///
    /// Calling this again with nothing open returns no markers.
    pub fn finish(&mut self) -> Vec<GroupMarker> {
        let mut markers = Vec::new();
        if self.task_open {
            markers.push(GroupMarker::Close);
            self.task_open = false;
        }
        if self.play_open {
            markers.push(GroupMarker::Close);
            self.play_open = false;
        }
        markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markers: &[GroupMarker]) -> Vec<String> {
        markers.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_marker_syntax() {
        assert_eq!(GroupMarker::open("Play: X").to_string(), "::group::Play: X");
        assert_eq!(GroupMarker::Close.to_string(), "::endgroup::");
    }

    #[test]
    fn test_smart_single_host_groups_by_play() {
        let mut groups = GroupController::new(GroupingMode::Smart);
        let markers = groups.play_start("Test Play", 1);
        assert_eq!(render(&markers), vec!["::group::Play: Test Play"]);
        assert_eq!(groups.current(), Some(ResolvedGrouping::Play));
        assert!(groups.play_open());

        assert!(groups.task_start("Task 1").is_empty());
        assert!(!groups.task_open());
    }

    #[test]
    fn test_smart_multiple_hosts_groups_by_task() {
        let mut groups = GroupController::new(GroupingMode::Smart);
        assert!(groups.play_start("Test Play", 3).is_empty());
        assert_eq!(groups.current(), Some(ResolvedGrouping::Task));
        assert!(!groups.play_open());

        let markers = groups.task_start("Task 1");
        assert_eq!(render(&markers), vec!["::group::Task: Task 1"]);

        let markers = groups.task_start("Task 2");
        assert_eq!(
            render(&markers),
            vec!["::endgroup::", "::group::Task: Task 2"]
        );
    }

    #[test]
    fn test_forced_modes_ignore_host_count() {
        let mut play = GroupController::new(GroupingMode::Play);
        play.play_start("P", 2);
        assert!(play.play_open());

        let mut task = GroupController::new(GroupingMode::Task);
        task.play_start("P", 1);
        assert!(!task.play_open());
        assert_eq!(task.current(), Some(ResolvedGrouping::Task));
    }

    #[test]
    fn test_play_start_closes_previous_play_group() {
        let mut groups = GroupController::new(GroupingMode::Play);
        groups.play_start("First", 1);
        let markers = groups.play_start("Second", 1);
        assert_eq!(
            render(&markers),
            vec!["::endgroup::", "::group::Play: Second"]
        );
    }

    #[test]
    fn test_smart_resolves_per_play() {
        let mut groups = GroupController::new(GroupingMode::Smart);
        groups.play_start("Single", 1);
        let markers = groups.play_start("Fleet", 4);
        assert_eq!(render(&markers), vec!["::endgroup::"]);
        assert_eq!(groups.current(), Some(ResolvedGrouping::Task));
    }

    #[test]
    fn test_finish_closes_task_then_play_and_is_idempotent() {
        let mut groups = GroupController::new(GroupingMode::Task);
        groups.play_start("P", 2);
        groups.task_start("T");
        assert_eq!(render(&groups.finish()), vec!["::endgroup::"]);
        assert!(groups.finish().is_empty());
        assert!(!groups.play_open());
        assert!(!groups.task_open());
    }

    #[test]
    fn test_task_without_play_uses_configured_mode() {
        let mut groups = GroupController::new(GroupingMode::Task);
        let markers = groups.task_start("Orphan");
        assert_eq!(render(&markers), vec!["::group::Task: Orphan"]);

        let mut smart = GroupController::new(GroupingMode::Smart);
        assert!(smart.task_start("Orphan").is_empty());
        assert_eq!(smart.current(), Some(ResolvedGrouping::Play));
    }
}
