//! Error types for the transcript logger

use std::io;
use thiserror::Error;

/// Failures that end a logging session with a non-zero status.
///
/// Interrupted reads and short reads are not represented here: the first is
/// retried and the second is a normal end of stream.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// The event source returned an error other than `Interrupted`
    #[error("read error: {0}")]
    Read(#[source] io::Error),
    /// A transcript line could not be written or flushed
    #[error("transcript write error: {0}")]
    Write(#[source] io::Error),
    /// The interrupt handler could not be installed
    #[error("failed to install interrupt handler: {0}")]
    Signal(#[from] nix::errno::Errno),
}

impl LoggerError {
    /// Process exit status reported for this error
    pub fn exit_code(&self) -> i32 {
        1
    }
}
