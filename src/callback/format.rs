//! Workflow-command line formatting.
//!
//! Every result becomes exactly one line of five `" | "`-separated fields:
//!
//! ```text
//! ::error::site.yml | web01 | failed | Deploy | Restart service
//! ```
//!
//! The annotation prefix depends on the status: notices for ok, warnings for
//! changed, errors for failed, and a bare line for skipped or unreachable.
//!
//! Text that follows a `::command::` prefix (error details, notices) is
//! escaped with the runner's data encoding. The fields of a result line are
//! printed as given, so a field with a line break cannot be formatted.

use std::path::Path;

use super::types::{ResultInfo, ResultStatus};
use crate::error::{Error, Result};

/// Field separator within a result line.
pub const FIELD_SEPARATOR: &str = " | ";

/// Host shown when the result does not name one.
pub const UNKNOWN_HOST: &str = "unknown";

/// Workflow-command annotation levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    /// `::notice::`
    Notice,
    /// `::warning::`
    Warning,
    /// `::error::`
    Error,
}

impl Annotation {
    /// The command prefix for this level.
    pub fn prefix(&self) -> &'static str {
        match self {
            Annotation::Notice => "::notice::",
            Annotation::Warning => "::warning::",
            Annotation::Error => "::error::",
        }
    }

    /// The annotation used for result lines of `status`, if any.
    pub fn for_status(status: ResultStatus) -> Option<Self> {
        match status {
            ResultStatus::Ok => Some(Annotation::Notice),
            ResultStatus::Changed => Some(Annotation::Warning),
            ResultStatus::Failed => Some(Annotation::Error),
            ResultStatus::Skipped | ResultStatus::Unreachable => None,
        }
    }

    /// Prefixes an already single-line message.
    pub fn line(&self, message: &str) -> String {
        format!("{}{}", self.prefix(), message)
    }
}

/// Escapes text for use inside a workflow command.
///
/// Only for lines the runner decodes, i.e. ones carrying a command prefix.
///
/// Line breaks would end the command early, so they are percent-encoded
/// along with `%` itself.
pub fn escape_data(text: &str) -> String {
    text.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Replaces line breaks with their encoded form and leaves everything else
/// as is. Used for plain lines the runner shows verbatim.
pub fn fold_line_breaks(text: &str) -> String {
    text.replace('\r', "%0D").replace('\n', "%0A")
}

/// Host a result is shown and counted under: the trimmed host, or
/// [`UNKNOWN_HOST`] when it is missing or blank.
pub fn display_host(result: &ResultInfo) -> &str {
    match result.host.as_deref().map(str::trim) {
        Some(host) if !host.is_empty() => host,
        _ => UNKNOWN_HOST,
    }
}

/// The five fields of a result line, resolved to their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFields {
    /// Base name of the task source file
    pub file: String,
    /// Reporting host
    pub host: String,
    /// Classified status
    pub status: ResultStatus,
    /// Current play name
    pub play: String,
    /// Current task name
    pub task: String,
}

impl LineFields {
    /// Resolves the fields of one result.
    ///
    /// The task path comes from the result, or from the current task when
    /// the result does not carry one. Fields are copied verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EventField`] when any field spans more than one line.
    pub fn extract(
        status: ResultStatus,
        result: &ResultInfo,
        play: Option<&str>,
        task: Option<&str>,
        current_task_path: Option<&str>,
    ) -> Result<Self> {
        let host = display_host(result);
        single_line("host", host)?;

        let file = match result.task_path.as_deref().or(current_task_path) {
            Some(path) => {
                single_line("task_path", path)?;
                base_name(path)
            }
            None => String::new(),
        };

        let play = play.unwrap_or_default();
        single_line("play", play)?;
        let task = task.unwrap_or_default();
        single_line("task", task)?;

        Ok(Self {
            file,
            host: host.to_string(),
            status,
            play: play.to_string(),
            task: task.to_string(),
        })
    }
}

/// Renders a result line with its status annotation.
pub fn format_result_line(fields: &LineFields) -> String {
    let body = [
        fields.file.as_str(),
        fields.host.as_str(),
        fields.status.as_str(),
        fields.play.as_str(),
        fields.task.as_str(),
    ]
    .join(FIELD_SEPARATOR);

    match Annotation::for_status(fields.status) {
        Some(annotation) => annotation.line(&body),
        None => body,
    }
}

/// The line emitted in place of a result that could not be formatted.
pub fn fallback_line(err: &Error) -> String {
    Annotation::Error.line(&escape_data(&format!(
        "Failed to format task result: {err}"
    )))
}

/// Verbose error details for a failed result: `msg`, then `stderr`.
pub fn failure_detail_lines(result: &ResultInfo) -> Vec<String> {
    let mut lines = Vec::with_capacity(2);
    if let Some(msg) = result.msg() {
        lines.push(Annotation::Error.line(&format!("Error details: {}", escape_data(&msg))));
    }
    if let Some(stderr) = result.stderr() {
        lines.push(Annotation::Error.line(&format!(
            "Error output: {}",
            escape_data(&stderr)
        )));
    }
    lines
}

/// Verbose notice for an ok-channel result counted as changed.
pub fn reclassification_notice(host: &str) -> String {
    Annotation::Notice.line(&format!(
        "Detected change reported as ok on {}, counting as changed",
        escape_data(host)
    ))
}

/// Base name of a task source path, keeping any `:line` suffix.
fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn single_line(field: &'static str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        Err(Error::event_field(field, "contains a line break"))
    } else {
        Ok(())
    }
}
