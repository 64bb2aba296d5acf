//! Raw input event records and their decoding
//!
//! The event source yields fixed-size `struct input_event` records as laid
//! out by the host kernel. A read is only accepted when it returns exactly
//! one record; anything shorter ends the stream.

use nix::libc;
use std::io::{self, Read};
use std::mem;

/// Width in bytes of one kernel input event record
pub const RECORD_SIZE: usize = mem::size_of::<libc::input_event>();

/// Event type of key press, release and repeat records
pub const EV_KEY: u16 = evdev::EventType::KEY.0;

/// State carried in the `value` field of a key record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyValue {
    /// Key went up (0)
    Release,
    /// Key went down (1)
    Press,
    /// Key is held and auto-repeating (2)
    Repeat,
    /// Anything else the device reports
    Other(i32),
}

impl From<i32> for KeyValue {
    fn from(value: i32) -> Self {
        match value {
            0 => KeyValue::Release,
            1 => KeyValue::Press,
            2 => KeyValue::Repeat,
            other => KeyValue::Other(other),
        }
    }
}

impl KeyValue {
    /// Whether this record should produce a transcript line
    pub fn is_loggable(self) -> bool {
        matches!(self, KeyValue::Press | KeyValue::Repeat)
    }
}

/// One decoded input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    /// Kernel timestamp, seconds part
    pub tv_sec: i64,
    /// Kernel timestamp, microseconds part
    pub tv_usec: i64,
    pub event_type: u16,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    pub fn new(event_type: u16, code: u16, value: i32) -> Self {
        Self {
            tv_sec: 0,
            tv_usec: 0,
            event_type,
            code,
            value,
        }
    }

    /// Convenience constructor for an `EV_KEY` record
    pub fn key(code: u16, value: i32) -> Self {
        Self::new(EV_KEY, code, value)
    }

    pub fn is_key(&self) -> bool {
        self.event_type == EV_KEY
    }

    pub fn key_value(&self) -> KeyValue {
        KeyValue::from(self.value)
    }

    /// Decode a record from exactly `RECORD_SIZE` bytes.
    ///
    /// Returns `None` for any other length.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != RECORD_SIZE {
            return None;
        }

        // SAFETY: the slice holds exactly size_of::<input_event>() bytes and
        // every bit pattern is a valid input_event.
        let raw: libc::input_event =
            unsafe { std::ptr::read_unaligned(bytes.as_ptr() as *const libc::input_event) };

        Some(Self {
            tv_sec: raw.time.tv_sec as i64,
            tv_usec: raw.time.tv_usec as i64,
            event_type: raw.type_,
            code: raw.code,
            value: raw.value,
        })
    }

    /// Encode into the kernel record layout
    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let raw = libc::input_event {
            time: libc::timeval {
                tv_sec: self.tv_sec as libc::time_t,
                tv_usec: self.tv_usec as libc::suseconds_t,
            },
            type_: self.event_type,
            code: self.code,
            value: self.value,
        };

        let mut bytes = [0u8; RECORD_SIZE];
        // SAFETY: input_event is plain old data of exactly RECORD_SIZE bytes.
        unsafe {
            std::ptr::copy_nonoverlapping(
                &raw as *const libc::input_event as *const u8,
                bytes.as_mut_ptr(),
                RECORD_SIZE,
            );
        }
        bytes
    }
}

/// Result of a single attempt to read one record
#[derive(Debug)]
pub enum ReadOutcome {
    /// A full record was read
    Event(RawEvent),
    /// The read was interrupted by a signal before any data arrived
    Interrupted,
    /// Source closed or returned a partial record
    EndOfStream { bytes_read: usize },
    /// Any other I/O failure
    Failed(io::Error),
}

/// Issue exactly one `read` for one record.
///
/// Partial records are never accumulated across reads.
pub fn read_record<R: Read>(source: &mut R, buf: &mut [u8; RECORD_SIZE]) -> ReadOutcome {
    match source.read(buf) {
        Ok(n) if n == RECORD_SIZE => match RawEvent::decode(&buf[..]) {
            Some(event) => ReadOutcome::Event(event),
            None => ReadOutcome::EndOfStream { bytes_read: n },
        },
        Ok(n) => ReadOutcome::EndOfStream { bytes_read: n },
        Err(e) if e.kind() == io::ErrorKind::Interrupted => ReadOutcome::Interrupted,
        Err(e) => ReadOutcome::Failed(e),
    }
}
