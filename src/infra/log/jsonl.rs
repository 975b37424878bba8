//! File-backed task log writing one JSON object per line.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::core::{SchedulerError, TaskLog, TaskLogEntry};

/// Append-only JSON-lines task log.
///
/// Each append is serialized, written, and flushed under one lock, so lines from
/// concurrent tasks never interleave.
#[derive(Debug)]
pub struct JsonLinesTaskLog {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesTaskLog {
    /// Open (or create) `path` for appending.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::Log`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SchedulerError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| SchedulerError::Log(format!("open {}: {e}", path.display())))?;
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry back from `path`.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::Log`] on I/O or parse failure.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<TaskLogEntry>, SchedulerError> {
        let file = File::open(path.as_ref()).map_err(|e| SchedulerError::Log(e.to_string()))?;
        BufReader::new(file)
            .lines()
            .filter(|line| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
            .map(|line| {
                let line = line.map_err(|e| SchedulerError::Log(e.to_string()))?;
                serde_json::from_str(&line).map_err(|e| SchedulerError::Log(format!("parse: {e}")))
            })
            .collect()
    }
}

impl TaskLog for JsonLinesTaskLog {
    fn append(&self, entry: TaskLogEntry) -> Result<(), SchedulerError> {
        let line = serde_json::to_string(&entry)
            .map_err(|e| SchedulerError::Log(format!("serialize: {e}")))?;
        let mut writer = self.writer.lock();
        writeln!(writer, "{line}")
            .and_then(|()| writer.flush())
            .map_err(|e| SchedulerError::Log(format!("write {}: {e}", self.path.display())))
    }
}
