//! Display sinks for workflow-command lines.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::traits::OutputSink;

/// Prints each line to stdout, where the runner picks up workflow commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutDisplay;

impl OutputSink for StdoutDisplay {
    fn display(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

impl OutputSink for NullDisplay {
    fn display(&mut self, _line: &str) {}
}

/// Keeps displayed lines in memory.
///
/// Clones share the same buffer, so a test can hand one clone to the
/// callback and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct CaptureDisplay {
    lines: Arc<RwLock<Vec<String>>>,
}

impl CaptureDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything displayed so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.read().clone()
    }

    /// Number of displayed lines.
    pub fn len(&self) -> usize {
        self.lines.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.read().is_empty()
    }

    /// Whether any displayed line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.read().iter().any(|line| line.contains(needle))
    }

    /// Drops everything captured so far.
    pub fn clear(&self) {
        self.lines.write().clear();
    }
}

impl OutputSink for CaptureDisplay {
    fn display(&mut self, line: &str) {
        self.lines.write().push(line.to_string());
    }
}
