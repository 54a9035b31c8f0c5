//! Per-play, per-host result counters.
//!
//! Counters are nested play → host, both kept in first-seen order so the
//! summary reads in execution order rather than alphabetically. A grand
//! total is maintained alongside and always equals the per-field sum over
//! every (play, host) record; an update either touches both or neither.
//!
//! # Example Output
//!
//! ```text
//! Totals: ok=3 changed=2 failed=1 skipped=0 unreachable=0
//!
//! Play: Deploy
//!   web01: ok=2 changed=1 failed=0 skipped=0 unreachable=0
//!   web02: ok=1 changed=1 failed=1 skipped=0 unreachable=0
//! ```

use indexmap::IndexMap;

use super::format::fold_line_breaks;
use super::types::ResultStatus;
use crate::error::{Error, Result};

/// Counts of each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatRecord {
    /// Count of successful results (no changes)
    pub ok: u32,
    /// Count of results that made changes
    pub changed: u32,
    /// Count of failed results
    pub failed: u32,
    /// Count of skipped results
    pub skipped: u32,
    /// Count of unreachable results
    pub unreachable: u32,
}

impl StatRecord {
    /// Returns the counter for `status`.
    pub fn get(&self, status: ResultStatus) -> u32 {
        match status {
            ResultStatus::Ok => self.ok,
            ResultStatus::Changed => self.changed,
            ResultStatus::Failed => self.failed,
            ResultStatus::Skipped => self.skipped,
            ResultStatus::Unreachable => self.unreachable,
        }
    }

    fn slot_mut(&mut self, status: ResultStatus) -> &mut u32 {
        match status {
            ResultStatus::Ok => &mut self.ok,
            ResultStatus::Changed => &mut self.changed,
            ResultStatus::Failed => &mut self.failed,
            ResultStatus::Skipped => &mut self.skipped,
            ResultStatus::Unreachable => &mut self.unreachable,
        }
    }

    /// Sum of all five counters.
    pub fn total(&self) -> u64 {
        ResultStatus::ALL
            .iter()
            .map(|status| u64::from(self.get(*status)))
            .sum()
    }

    /// Whether anything failed or was unreachable.
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.unreachable > 0
    }

    /// `ok=N changed=N failed=N skipped=N unreachable=N`
    pub fn format_counts(&self) -> String {
        ResultStatus::ALL
            .iter()
            .map(|status| format!("{}={}", status, self.get(*status)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Statistics for a whole run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Play name → host name → counters
    plays: IndexMap<String, IndexMap<String, StatRecord>>,
    /// Grand total across all plays and hosts
    totals: StatRecord,
}

impl RunStats {
    /// Creates empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one result for `host` in `play`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StatsOverflow`] if either the pair's counter or the
    /// grand total is saturated. Nothing is changed in that case.
    pub fn record(&mut self, play: &str, host: &str, status: ResultStatus) -> Result<()> {
        let overflow = || Error::StatsOverflow {
            play: play.to_string(),
            host: host.to_string(),
            status: status.as_str(),
        };

        let pair = self
            .play_host(play, host)
            .map_or(0, |record| record.get(status))
            .checked_add(1)
            .ok_or_else(overflow)?;
        let total = self
            .totals
            .get(status)
            .checked_add(1)
            .ok_or_else(overflow)?;

        let record = self
            .plays
            .entry(play.to_string())
            .or_default()
            .entry(host.to_string())
            .or_default();
        *record.slot_mut(status) = pair;
        *self.totals.slot_mut(status) = total;
        Ok(())
    }

    /// Counts one result given as a status literal.
    ///
    /// Literals outside the five canonical statuses are ignored.
    pub fn record_raw(&mut self, play: &str, host: &str, status: &str) -> Result<()> {
        match status.parse::<ResultStatus>() {
            Ok(status) => self.record(play, host, status),
            Err(_) => {
                tracing::debug!(status, "ignoring non-canonical status");
                Ok(())
            }
        }
    }

    /// Grand total.
    pub fn totals(&self) -> &StatRecord {
        &self.totals
    }

    /// Counters for one (play, host) pair.
    pub fn play_host(&self, play: &str, host: &str) -> Option<&StatRecord> {
        self.plays.get(play).and_then(|hosts| hosts.get(host))
    }

    /// Plays with their per-host counters, in first-seen order.
    pub fn plays(&self) -> impl Iterator<Item = (&str, &IndexMap<String, StatRecord>)> {
        self.plays.iter().map(|(name, hosts)| (name.as_str(), hosts))
    }

    /// Whether any result has been recorded.
    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    /// Whether anything failed or was unreachable.
    pub fn has_failures(&self) -> bool {
        self.totals.has_failures()
    }

    /// Renders the summary block shown at the end of the run.
    pub fn render_summary(&self) -> Vec<String> {
        let mut lines = vec![format!("Totals: {}", self.totals.format_counts())];
        for (play, hosts) in &self.plays {
            lines.push(String::new());
            lines.push(format!("Play: {}", fold_line_breaks(play)));
            for (host, record) in hosts {
                lines.push(format!("  {}: {}", fold_line_breaks(host), record.format_counts()));
            }
        }
        lines
    }

    /// Pushes one counter to its maximum.
    #[cfg(test)]
    pub(crate) fn saturate(&mut self, play: &str, host: &str, status: ResultStatus) {
        let record = self
            .plays
            .entry(play.to_string())
            .or_default()
            .entry(host.to_string())
            .or_default();
        *record.slot_mut(status) = u32::MAX;
        *self.totals.slot_mut(status) = u32::MAX;
    }
}
