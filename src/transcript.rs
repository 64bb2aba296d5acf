//! Transcript lines, timestamps and the dual file/console sink

use crate::error::LoggerError;
use chrono::{DateTime, Local, TimeZone};
use std::fmt;
use std::io::{self, Write};

/// Second resolution, local time, fixed width
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format an instant as `YYYY-MM-DD HH:MM:SS`
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local wall-clock time, formatted
pub fn timestamp_now() -> String {
    format_timestamp(&Local::now())
}

/// One timestamped entry of the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub timestamp: String,
    pub label: String,
}

impl TranscriptLine {
    pub fn new(timestamp: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            label: label.into(),
        }
    }

    /// Line stamped with the current local time
    pub fn now(label: impl Into<String>) -> Self {
        Self::new(timestamp_now(), label)
    }
}

impl fmt::Display for TranscriptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp, self.label)
    }
}

/// Writes transcript lines to an append-only file and mirrors them to the console.
///
/// The file is flushed after every line.
pub struct TranscriptSink<F: Write, M: Write = io::Stdout> {
    file: F,
    mirror: Option<M>,
    lines_written: u64,
}

impl<F: Write> TranscriptSink<F, io::Stdout> {
    /// Sink mirroring to standard output
    pub fn with_stdout(file: F) -> Self {
        Self::new(file, Some(io::stdout()))
    }
}

impl<F: Write, M: Write> TranscriptSink<F, M> {
    pub fn new(file: F, mirror: Option<M>) -> Self {
        Self {
            file,
            mirror,
            lines_written: 0,
        }
    }

    /// Write one line to the file, flush it, then mirror it
    pub fn write_line(&mut self, line: &TranscriptLine) -> Result<(), LoggerError> {
        let text = format!("{}\n", line);

        self.file
            .write_all(text.as_bytes())
            .and_then(|_| self.file.flush())
            .map_err(LoggerError::Write)?;

        if let Some(mirror) = self.mirror.as_mut() {
            mirror
                .write_all(text.as_bytes())
                .and_then(|_| mirror.flush())
                .map_err(LoggerError::Write)?;
        }

        self.lines_written += 1;
        Ok(())
    }

    /// Number of lines written so far
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn file(&self) -> &F {
        &self.file
    }

    pub fn mirror(&self) -> Option<&M> {
        self.mirror.as_ref()
    }

    /// Flush both outputs and hand back the file
    pub fn close(mut self) -> io::Result<F> {
        if let Some(mirror) = self.mirror.as_mut() {
            mirror.flush()?;
        }
        self.file.flush()?;
        Ok(self.file)
    }
}
