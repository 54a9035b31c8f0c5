//! Result classification.
//!
//! Maps a reported result to one of the five canonical statuses. The only
//! non-trivial rule is the promotion of ok-channel results whose payload says
//! `changed: true`: some modules report success without a distinct changed
//! signal, and counting those as ok would under-report changes.
//!
//! The payload flag is consulted on the ok channel only. Skipped and
//! unreachable results carrying `changed: true` keep their own status.

use super::types::{ResultChannel, ResultInfo, ResultStatus};

/// Classify a result reported through `channel`.
pub fn classify(channel: ResultChannel, result: &ResultInfo) -> ResultStatus {
    match channel {
        ResultChannel::Ok if result.changed_flag() => ResultStatus::Changed,
        ResultChannel::Ok => ResultStatus::Ok,
        ResultChannel::Changed => ResultStatus::Changed,
        ResultChannel::Failed => ResultStatus::Failed,
        ResultChannel::Skipped => ResultStatus::Skipped,
        ResultChannel::Unreachable => ResultStatus::Unreachable,
    }
}

/// True when [`classify`] promoted an ok-channel result to changed.
pub fn is_reclassified(channel: ResultChannel, result: &ResultInfo) -> bool {
    channel == ResultChannel::Ok && result.changed_flag()
}
