//! The record-at-a-time read loop
//!
//! One blocking read, one record, fully handled before the next read.
//! There is no timeout; the loop ends on end of stream, a fatal error or
//! a shutdown request.

use crate::error::LoggerError;
use crate::keyboard::{
    read_record, translate, unhandled_label, KeyCode, KeyLabel, ModifierState, RawEvent,
    ReadOutcome, RECORD_SIZE,
};
use crate::shutdown::{LoggerHandle, ShutdownFlag, ShutdownReason};
use crate::transcript::{TranscriptLine, TranscriptSink};
use log::{debug, info, trace};
use std::fmt;
use std::io::{Read, Write};

/// Counters for one logging session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Full-size records read
    pub records_read: u64,
    /// Records of type EV_KEY
    pub key_records: u64,
    /// Transcript lines emitted
    pub lines_written: u64,
    /// Lines that used the numeric fallback
    pub unhandled: u64,
    /// Reads retried after a signal
    pub interrupted_reads: u64,
}

impl fmt::Display for LoopStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} record(s) read, {} key record(s), {} line(s) written, {} unhandled code(s), {} interrupted read(s)",
            self.records_read,
            self.key_records,
            self.lines_written,
            self.unhandled,
            self.interrupted_reads
        )
    }
}

/// Drives the modifier tracker and the translator over an event source
pub struct EventLoop {
    modifiers: ModifierState,
    stats: LoopStats,
    buffer: [u8; RECORD_SIZE],
}

impl EventLoop {
    pub fn new() -> Self {
        Self {
            modifiers: ModifierState::new(),
            stats: LoopStats::default(),
            buffer: [0u8; RECORD_SIZE],
        }
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Read and handle records until the source ends, fails or shutdown is requested
    pub fn run<S: Read, F: Write, M: Write>(
        &mut self,
        handle: &mut LoggerHandle<S, F, M>,
        shutdown: &ShutdownFlag,
    ) -> ShutdownReason {
        let reason = match handle.parts_mut() {
            Some((source, sink)) => self.read_until_stopped(source, sink, shutdown),
            None => ShutdownReason::EndOfStream { bytes_read: 0 },
        };

        info!("session summary: {}", self.stats);
        reason
    }

    fn read_until_stopped<S: Read, F: Write, M: Write>(
        &mut self,
        source: &mut S,
        sink: &mut TranscriptSink<F, M>,
        shutdown: &ShutdownFlag,
    ) -> ShutdownReason {
        loop {
            // A signal landing after this check and before the read starts is
            // only noticed once the read returns.
            if shutdown.is_requested() {
                return ShutdownReason::Interrupted;
            }

            match read_record(source, &mut self.buffer) {
                ReadOutcome::Event(event) => {
                    self.stats.records_read += 1;
                    if let Err(e) = self.handle_event(&event, sink) {
                        return ShutdownReason::Failed(e);
                    }
                }
                ReadOutcome::Interrupted => {
                    if shutdown.is_requested() {
                        return ShutdownReason::Interrupted;
                    }
                    self.stats.interrupted_reads += 1;
                    debug!("read interrupted, retrying");
                }
                ReadOutcome::EndOfStream { bytes_read } => {
                    return ShutdownReason::EndOfStream { bytes_read };
                }
                ReadOutcome::Failed(e) => {
                    return ShutdownReason::Failed(LoggerError::Read(e));
                }
            }
        }
    }

    /// Update modifier state and, for loggable key records, write one line.
    ///
    /// Returns the line that was written, if any.
    pub fn handle_event<F: Write, M: Write>(
        &mut self,
        event: &RawEvent,
        sink: &mut TranscriptSink<F, M>,
    ) -> Result<Option<TranscriptLine>, LoggerError> {
        let Some(label) = self.label_for(event) else {
            return Ok(None);
        };

        let line = TranscriptLine::now(label);
        sink.write_line(&line)?;
        self.stats.lines_written += 1;
        Ok(Some(line))
    }

    /// Label for a record after applying it to the modifier state.
    ///
    /// `None` for non-key records, releases and modifier keys.
    pub fn label_for(&mut self, event: &RawEvent) -> Option<String> {
        if !event.is_key() {
            trace!("ignoring event type {} code {}", event.event_type, event.code);
            return None;
        }
        self.stats.key_records += 1;

        if self.modifiers.process_event(event) {
            trace!("modifiers now {:?}", self.modifiers);
        }

        if !event.key_value().is_loggable() {
            return None;
        }

        let code = KeyCode(event.code);
        match translate(code, self.modifiers.is_upper()) {
            KeyLabel::Text(text) => Some(text.to_string()),
            KeyLabel::Modifier => None,
            KeyLabel::Unrecognized => {
                self.stats.unhandled += 1;
                Some(unhandled_label(code))
            }
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}
