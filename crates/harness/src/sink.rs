//! Append-only benchmark log sink.
//!
//! The benchmark's output contract is a plain-text log: one event per line,
//! each tagged with a severity token. The sink is an explicit handle passed
//! into the runner; there is no global logging state. Every append opens the
//! file, writes one line, and closes it again, so a partially written run
//! never holds a file handle and appends from other processes interleave at
//! line granularity.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Severity token prefixed to every log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Normal report output.
    Info,
    /// An individual run exceeded its budget.
    Warning,
    /// A connection failure or a per-run execution error.
    Severe,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Severe => "SEVERE",
        })
    }
}

/// Handle to the append-only log file.
#[derive(Debug, Clone)]
pub struct BenchLog {
    path: PathBuf,
}

impl BenchLog {
    /// Create a handle for the given path. The file is created lazily on the
    /// first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one severity-tagged event line.
    pub fn append(&self, severity: Severity, message: impl AsRef<str>) -> io::Result<()> {
        self.append_raw(&format!("{severity}: {}", message.as_ref()))
    }

    /// Append one raw line, without a severity token. Used for the blank
    /// separator between report blocks.
    pub fn append_raw(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_tokens() {
        assert_eq!(Severity::Info.to_string(), "INFO");
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(Severity::Severe.to_string(), "SEVERE");
    }

    #[test]
    fn test_append_writes_tagged_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = BenchLog::new(dir.path().join("bench.log"));

        log.append(Severity::Info, "===== Benchmarking local =====")
            .unwrap();
        log.append(Severity::Warning, "[local] Timeout on run 2 after 300s")
            .unwrap();
        log.append_raw("").unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "INFO: ===== Benchmarking local =====",
                "WARNING: [local] Timeout on run 2 after 300s",
                "",
            ]
        );
    }

    #[test]
    fn test_appends_accumulate_across_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.log");

        BenchLog::new(&path).append(Severity::Info, "one").unwrap();
        BenchLog::new(&path).append(Severity::Info, "two").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "INFO: one\nINFO: two\n");
    }
}
