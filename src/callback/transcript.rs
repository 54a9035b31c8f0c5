//! In-memory transcript of everything shown on the display.
//!
//! Flushed to the archive file at the end of the run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};

/// Ordered, append-only list of emitted lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// All lines in emission order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Writes every line, newline-terminated, to `path`.
    ///
    /// An existing file is truncated.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let archive_err = |source| Error::ArchiveWrite {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(archive_err)?;
        let mut writer = BufWriter::new(file);
        for line in &self.lines {
            writeln!(writer, "{line}").map_err(archive_err)?;
        }
        writer.flush().map_err(archive_err)?;

        tracing::debug!(path = %path.display(), lines = self.lines.len(), "archive written");
        Ok(())
    }
}
