//! Callback event types for the GitHub Actions callback
//!
//! This module defines the events and context types that the orchestration
//! engine hands to the callback, along with the closed enumerations the
//! callback reasons about.
//!
//! ## Event Categories
//!
//! - **Play Events**: start of a play (name and targeted hosts)
//! - **Task Events**: start of a task (name and source location)
//! - **Result Events**: outcome of one task on one host, per reporting channel
//! - **Stats Events**: end of the run
//!
//! Incoming events are loosely shaped: every field that the engine may omit
//! is an `Option` or carries a serde default, and is resolved to its
//! documented default exactly once, in the formatter.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::Error;

// ============================================================================
// Core Event Enum
// ============================================================================

/// All events the callback understands.
///
/// This is also the JSON-lines wire format read by the `gha-callback`
/// binary, one object per line tagged by `event_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum CallbackEvent {
    /// A play starts.
    PlayStart {
        /// The play being started
        play: PlayInfo,
    },

    /// A task starts.
    TaskStart {
        /// The task being started
        task: TaskInfo,
    },

    /// A task completed on a host and was reported as ok.
    TaskOk {
        /// The per-host result
        result: ResultInfo,
    },

    /// A task completed on a host and was reported as changed.
    TaskChanged {
        /// The per-host result
        result: ResultInfo,
    },

    /// A task failed on a host.
    TaskFailed {
        /// The per-host result
        result: ResultInfo,
        /// Whether errors were ignored for this task
        #[serde(default)]
        ignore_errors: bool,
    },

    /// A task was skipped on a host.
    TaskSkipped {
        /// The per-host result
        result: ResultInfo,
    },

    /// A host could not be reached for a task.
    TaskUnreachable {
        /// The per-host result
        result: ResultInfo,
    },

    /// The run finished; final statistics are due.
    Stats,
}

impl CallbackEvent {
    /// Returns the event type name as a string.
    pub fn event_type(&self) -> &'static str {
        match self {
            CallbackEvent::PlayStart { .. } => "play_start",
            CallbackEvent::TaskStart { .. } => "task_start",
            CallbackEvent::TaskOk { .. } => "task_ok",
            CallbackEvent::TaskChanged { .. } => "task_changed",
            CallbackEvent::TaskFailed { .. } => "task_failed",
            CallbackEvent::TaskSkipped { .. } => "task_skipped",
            CallbackEvent::TaskUnreachable { .. } => "task_unreachable",
            CallbackEvent::Stats => "stats",
        }
    }

    /// Returns the reporting channel and result for result events.
    pub fn as_result(&self) -> Option<(ResultChannel, &ResultInfo)> {
        match self {
            CallbackEvent::TaskOk { result } => Some((ResultChannel::Ok, result)),
            CallbackEvent::TaskChanged { result } => Some((ResultChannel::Changed, result)),
            CallbackEvent::TaskFailed { result, .. } => Some((ResultChannel::Failed, result)),
            CallbackEvent::TaskSkipped { result } => Some((ResultChannel::Skipped, result)),
            CallbackEvent::TaskUnreachable { result } => {
                Some((ResultChannel::Unreachable, result))
            }
            _ => None,
        }
    }

    /// Returns the host associated with this event, if any.
    pub fn host(&self) -> Option<&str> {
        self.as_result().and_then(|(_, result)| result.host.as_deref())
    }

    /// Returns whether this event ends the run.
    pub fn is_run_end(&self) -> bool {
        matches!(self, CallbackEvent::Stats)
    }
}

// ============================================================================
// Statuses and Channels
// ============================================================================

/// The canonical outcome of one task on one host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    /// Task succeeded without altering the host
    Ok,
    /// Task altered the host
    Changed,
    /// Task failed
    Failed,
    /// Task was skipped
    Skipped,
    /// Host could not be reached
    Unreachable,
}

impl ResultStatus {
    /// All statuses in summary order.
    pub const ALL: [ResultStatus; 5] = [
        ResultStatus::Ok,
        ResultStatus::Changed,
        ResultStatus::Failed,
        ResultStatus::Skipped,
        ResultStatus::Unreachable,
    ];

    /// Get the plain string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Ok => "ok",
            ResultStatus::Changed => "changed",
            ResultStatus::Failed => "failed",
            ResultStatus::Skipped => "skipped",
            ResultStatus::Unreachable => "unreachable",
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" => Ok(ResultStatus::Ok),
            "changed" => Ok(ResultStatus::Changed),
            "failed" => Ok(ResultStatus::Failed),
            "skipped" => Ok(ResultStatus::Skipped),
            "unreachable" => Ok(ResultStatus::Unreachable),
            other => Err(Error::UnknownStatus(other.to_string())),
        }
    }
}

/// The callback through which a result was reported.
///
/// This is distinct from [`ResultStatus`]: a result reported through the
/// `ok` channel may still be classified as changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultChannel {
    /// Reported as succeeded
    Ok,
    /// Reported as changed
    Changed,
    /// Reported as failed
    Failed,
    /// Reported as skipped
    Skipped,
    /// Reported as unreachable
    Unreachable,
}

impl ResultChannel {
    /// Get the plain string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultChannel::Ok => "ok",
            ResultChannel::Changed => "changed",
            ResultChannel::Failed => "failed",
            ResultChannel::Skipped => "skipped",
            ResultChannel::Unreachable => "unreachable",
        }
    }
}

impl fmt::Display for ResultChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultChannel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" => Ok(ResultChannel::Ok),
            "changed" => Ok(ResultChannel::Changed),
            "failed" => Ok(ResultChannel::Failed),
            "skipped" => Ok(ResultChannel::Skipped),
            "unreachable" => Ok(ResultChannel::Unreachable),
            other => Err(Error::UnknownChannel(other.to_string())),
        }
    }
}

// ============================================================================
// Grouping
// ============================================================================

/// Configured fold-group strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingMode {
    /// Group by play for single-host plays, by task otherwise
    #[default]
    Smart,
    /// One fold group per play
    Play,
    /// One fold group per task
    Task,
}

impl GroupingMode {
    /// Get the plain string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupingMode::Smart => "smart",
            GroupingMode::Play => "play",
            GroupingMode::Task => "task",
        }
    }

    /// Resolves this mode for a play targeting `host_count` hosts.
    pub fn resolve(self, host_count: usize) -> ResolvedGrouping {
        match self {
            GroupingMode::Play => ResolvedGrouping::Play,
            GroupingMode::Task => ResolvedGrouping::Task,
            GroupingMode::Smart if host_count <= 1 => ResolvedGrouping::Play,
            GroupingMode::Smart => ResolvedGrouping::Task,
        }
    }
}

impl fmt::Display for GroupingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "smart" => Ok(GroupingMode::Smart),
            "play" => Ok(GroupingMode::Play),
            "task" => Ok(GroupingMode::Task),
            _ => Err(Error::UnknownGrouping(s.to_string())),
        }
    }
}

/// Grouping actually in effect for the current play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedGrouping {
    /// Fold per play
    Play,
    /// Fold per task
    Task,
}

impl ResolvedGrouping {
    /// Get the plain string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedGrouping::Play => "play",
            ResolvedGrouping::Task => "task",
        }
    }
}

impl fmt::Display for ResolvedGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Context Structs
// ============================================================================

/// Information about a play being started.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayInfo {
    /// Name of the play
    pub name: String,
    /// Resolved hosts for this play
    pub hosts: Vec<String>,
    /// Number of hosts targeted, when the engine reports it without the list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_count: Option<usize>,
}

impl PlayInfo {
    /// Create a new PlayInfo.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the resolved hosts.
    pub fn with_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Set an explicit host count.
    pub fn with_host_count(mut self, count: usize) -> Self {
        self.host_count = Some(count);
        self
    }

    /// Number of hosts this play targets.
    pub fn host_count(&self) -> usize {
        self.host_count.unwrap_or(self.hosts.len())
    }
}

/// Information about a task being started.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskInfo {
    /// Task name
    pub name: String,
    /// Source location of the task (e.g. `/plays/site.yml:12`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl TaskInfo {
    /// Create a new TaskInfo.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
        }
    }

    /// Set the task source path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Outcome of one task on one host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultInfo {
    /// Host that reported the result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Source location of the task that produced the result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_path: Option<String>,
    /// Module return data
    #[serde(alias = "result", skip_serializing_if = "Option::is_none")]
    pub payload: Option<ResultPayload>,
}

impl ResultInfo {
    /// Create a result reported by `host`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            ..Default::default()
        }
    }

    /// Set the task source path.
    pub fn with_task_path(mut self, path: impl Into<String>) -> Self {
        self.task_path = Some(path.into());
        self
    }

    /// Attach module return data.
    pub fn with_payload(mut self, payload: ResultPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// True when the payload carries `changed: true`.
    pub fn changed_flag(&self) -> bool {
        self.payload.as_ref().is_some_and(ResultPayload::changed_flag)
    }

    /// Non-empty `msg` from the payload.
    pub fn msg(&self) -> Option<String> {
        self.payload.as_ref().and_then(ResultPayload::msg)
    }

    /// Non-empty `stderr` from the payload.
    pub fn stderr(&self) -> Option<String> {
        self.payload.as_ref().and_then(ResultPayload::stderr)
    }
}

/// Module return data attached to a result.
///
/// Kept as an ordered JSON object; only `changed`, `msg` and `stderr` are
/// interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultPayload(pub IndexMap<String, JsonValue>);

impl ResultPayload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `changed` flag.
    pub fn with_changed(self, changed: bool) -> Self {
        self.with("changed", JsonValue::Bool(changed))
    }

    /// Set the `msg` field.
    pub fn with_msg(self, msg: impl Into<String>) -> Self {
        self.with("msg", JsonValue::String(msg.into()))
    }

    /// Set the `stderr` field.
    pub fn with_stderr(self, stderr: impl Into<String>) -> Self {
        self.with("stderr", JsonValue::String(stderr.into()))
    }

    /// Set an arbitrary field.
    pub fn with(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Look up a raw field.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// True only when `changed` is the JSON boolean `true`.
    pub fn changed_flag(&self) -> bool {
        matches!(self.get("changed"), Some(JsonValue::Bool(true)))
    }

    /// Non-empty `msg`.
    pub fn msg(&self) -> Option<String> {
        self.text("msg")
    }

    /// Non-empty `stderr`.
    pub fn stderr(&self) -> Option<String> {
        self.text("stderr")
    }

    /// Renders a field as text: strings verbatim, other values as compact
    /// JSON. Null and empty values read as absent.
    fn text(&self, key: &str) -> Option<String> {
        let text = match self.get(key)? {
            JsonValue::Null => return None,
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl From<IndexMap<String, JsonValue>> for ResultPayload {
    fn from(map: IndexMap<String, JsonValue>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_round_trip_literals() {
        for status in ResultStatus::ALL {
            assert_eq!(status.as_str().parse::<ResultStatus>().unwrap(), status);
        }
        assert!("ignored".parse::<ResultStatus>().is_err());
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!(
            "unreachable".parse::<ResultChannel>().unwrap(),
            ResultChannel::Unreachable
        );
        assert!(matches!(
            "rescued".parse::<ResultChannel>(),
            Err(Error::UnknownChannel(_))
        ));
    }

    #[test]
    fn test_grouping_parse_is_lenient_on_case() {
        assert_eq!(" Task ".parse::<GroupingMode>().unwrap(), GroupingMode::Task);
        assert_eq!("SMART".parse::<GroupingMode>().unwrap(), GroupingMode::Smart);
        assert!("weekly".parse::<GroupingMode>().is_err());
    }

    #[test]
    fn test_smart_resolution() {
        assert_eq!(GroupingMode::Smart.resolve(0), ResolvedGrouping::Play);
        assert_eq!(GroupingMode::Smart.resolve(1), ResolvedGrouping::Play);
        assert_eq!(GroupingMode::Smart.resolve(2), ResolvedGrouping::Task);
        assert_eq!(GroupingMode::Play.resolve(5), ResolvedGrouping::Play);
        assert_eq!(GroupingMode::Task.resolve(1), ResolvedGrouping::Task);
    }

    #[test]
    fn test_play_host_count_prefers_explicit_count() {
        let play = PlayInfo::new("p").with_hosts(["a", "b"]);
        assert_eq!(play.host_count(), 2);
        assert_eq!(play.with_host_count(7).host_count(), 7);
    }

    #[test]
    fn test_payload_changed_flag_requires_bool_true() {
        assert!(ResultPayload::new().with_changed(true).changed_flag());
        assert!(!ResultPayload::new().with_changed(false).changed_flag());
        assert!(!ResultPayload::new()
            .with("changed", json!("true"))
            .changed_flag());
        assert!(!ResultPayload::new().changed_flag());
    }

    #[test]
    fn test_payload_text_fields() {
        let payload = ResultPayload::new()
            .with_msg("disk full")
            .with("stderr", json!(["line one", "line two"]));
        assert_eq!(payload.msg().as_deref(), Some("disk full"));
        assert_eq!(
            payload.stderr().as_deref(),
            Some(r#"["line one","line two"]"#)
        );

        let blank = ResultPayload::new().with_msg("").with("stderr", JsonValue::Null);
        assert!(blank.msg().is_none());
        assert!(blank.stderr().is_none());

        let spaces = ResultPayload::new().with_msg("   ");
        assert_eq!(spaces.msg().as_deref(), Some("   "));
    }

    #[test]
    fn test_event_wire_format() {
        let line = r#"{"event_type":"task_ok","result":{"host":"web01","task_path":"/plays/site.yml","result":{"changed":true}}}"#;
        let event: CallbackEvent = serde_json::from_str(line).unwrap();
        assert_eq!(event.event_type(), "task_ok");
        assert_eq!(event.host(), Some("web01"));

        let (channel, result) = event.as_result().unwrap();
        assert_eq!(channel, ResultChannel::Ok);
        assert!(result.changed_flag());
    }

    #[test]
    fn test_event_wire_format_defaults() {
        let event: CallbackEvent =
            serde_json::from_str(r#"{"event_type":"task_failed","result":{}}"#).unwrap();
        match event {
            CallbackEvent::TaskFailed {
                result,
                ignore_errors,
            } => {
                assert!(result.host.is_none());
                assert!(result.payload.is_none());
                assert!(!ignore_errors);
            }
            other => panic!("unexpected event {other:?}"),
        }

        let stats: CallbackEvent = serde_json::from_str(r#"{"event_type":"stats"}"#).unwrap();
        assert!(stats.is_run_end());
    }

    #[test]
    fn test_play_start_wire_format() {
        let event: CallbackEvent = serde_json::from_str(
            r#"{"event_type":"play_start","play":{"name":"Deploy","hosts":["a","b","c"]}}"#,
        )
        .unwrap();
        match event {
            CallbackEvent::PlayStart { play } => {
                assert_eq!(play.name, "Deploy");
                assert_eq!(play.host_count(), 3);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
