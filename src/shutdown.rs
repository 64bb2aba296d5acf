//! Interrupt handling and orderly release of the logger's resources
//!
//! The signal handler does nothing but set an atomic flag. It is installed
//! without `SA_RESTART`, so a read blocked on the device returns
//! `Interrupted` and the event loop gets to look at the flag. All resource
//! release happens on the loop's thread through [`LoggerHandle::release`].

use crate::error::LoggerError;
use crate::transcript::TranscriptSink;
use log::{debug, log, Level};
use nix::libc;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared "please stop" flag
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

static INTERRUPT_FLAG: OnceLock<ShutdownFlag> = OnceLock::new();

extern "C" fn on_interrupt(_signal: libc::c_int) {
    // Only an atomic store: safe in signal context
    if let Some(flag) = INTERRUPT_FLAG.get() {
        flag.request();
    }
}

/// Install the SIGINT/SIGTERM handler and return the process-wide flag it sets.
///
/// Calling this more than once returns the same flag.
pub fn install_interrupt_handler() -> Result<ShutdownFlag, LoggerError> {
    let flag = INTERRUPT_FLAG.get_or_init(ShutdownFlag::new).clone();

    let action = SigAction::new(
        SigHandler::Handler(on_interrupt),
        SaFlags::empty(),
        SigSet::empty(),
    );
    for signal in [Signal::SIGINT, Signal::SIGTERM] {
        // SAFETY: the handler only touches an atomic through an initialized OnceLock.
        unsafe { sigaction(signal, &action) }?;
        debug!("installed handler for {}", signal);
    }

    Ok(flag)
}

/// Why the event loop stopped
#[derive(Debug)]
pub enum ShutdownReason {
    /// Source closed or produced a record of the wrong width
    EndOfStream { bytes_read: usize },
    /// Interrupt signal received
    Interrupted,
    /// Unrecoverable read or write failure
    Failed(LoggerError),
}

impl ShutdownReason {
    pub fn is_clean(&self) -> bool {
        !matches!(self, ShutdownReason::Failed(_))
    }

    /// Process exit status for this reason
    pub fn exit_code(&self) -> i32 {
        match self {
            ShutdownReason::Failed(e) => e.exit_code(),
            _ => 0,
        }
    }

    /// Level the stop reason is logged at; only an operator interrupt is `info`
    pub fn log_level(&self) -> Level {
        match self {
            ShutdownReason::Interrupted => Level::Info,
            _ => Level::Warn,
        }
    }

    /// Operator-facing farewell line
    pub fn farewell(&self) -> String {
        if self.is_clean() {
            "bye, cleaned up.".to_string()
        } else {
            format!("exiting with error code {}", self.exit_code())
        }
    }
}

/// Owns the event source and the transcript sink for the process lifetime.
pub struct LoggerHandle<S: Read, F: Write, M: Write = io::Stdout> {
    source: Option<S>,
    sink: Option<TranscriptSink<F, M>>,
}

impl<S: Read, F: Write, M: Write> LoggerHandle<S, F, M> {
    pub fn new(source: S, sink: TranscriptSink<F, M>) -> Self {
        Self {
            source: Some(source),
            sink: Some(sink),
        }
    }

    /// Borrow both resources, or `None` once released
    pub fn parts_mut(&mut self) -> Option<(&mut S, &mut TranscriptSink<F, M>)> {
        match (self.source.as_mut(), self.sink.as_mut()) {
            (Some(source), Some(sink)) => Some((source, sink)),
            _ => None,
        }
    }

    pub fn is_released(&self) -> bool {
        self.source.is_none() && self.sink.is_none()
    }

    /// Flush and close the sink, then close the source.
    ///
    /// Returns `Ok(false)` if everything was already released. A flush
    /// failure is reported after the source has still been closed.
    pub fn release(&mut self) -> io::Result<bool> {
        if self.is_released() {
            return Ok(false);
        }

        let flushed = match self.sink.take() {
            Some(sink) => {
                let lines = sink.lines_written();
                sink.close().map(|_| debug!("transcript closed after {} line(s)", lines))
            }
            None => Ok(()),
        };

        if self.source.take().is_some() {
            debug!("event source closed");
        }

        flushed.map(|_| true)
    }

    /// Release resources, print the farewell and return the exit status
    pub fn shutdown(&mut self, reason: &ShutdownReason) -> i32 {
        let level = reason.log_level();
        match reason {
            ShutdownReason::EndOfStream { bytes_read } => log!(
                level,
                "device closed or incomplete read ({} bytes), stopping",
                bytes_read
            ),
            ShutdownReason::Interrupted => log!(level, "interrupt received, shutting down"),
            ShutdownReason::Failed(e) => log!(level, "stopping on error: {}", e),
        }

        let mut code = reason.exit_code();
        if let Err(e) = self.release() {
            eprintln!("failed to flush transcript: {}", e);
            code = 1;
        }

        if code == 0 {
            eprintln!("{}", reason.farewell());
        } else {
            eprintln!("exiting with error code {}", code);
        }
        code
    }
}
