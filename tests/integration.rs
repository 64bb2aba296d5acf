//! Integration tests for keytrail
//!
//! These tests drive the full pipeline: encoded kernel records in, modifier
//! tracking and translation, transcript lines out, then shutdown.

use keytrail::keyboard::{RawEvent, RECORD_SIZE};
use keytrail::{
    EventLoop, LoggerError, LoggerHandle, ShutdownFlag, ShutdownReason, TranscriptSink,
};
use std::fs::{self, OpenOptions};
use std::io::{self, Cursor, Write};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const KEY_A: u16 = 30;
const KEY_B: u16 = 48;
const KEY_1: u16 = 2;
const KEY_SPACE: u16 = 57;
const LEFTSHIFT: u16 = 42;
const RIGHTSHIFT: u16 = 54;
const CAPSLOCK: u16 = 58;

fn press(code: u16) -> RawEvent {
    RawEvent::key(code, 1)
}

fn repeat(code: u16) -> RawEvent {
    RawEvent::key(code, 2)
}

fn release(code: u16) -> RawEvent {
    RawEvent::key(code, 0)
}

/// EV_SYN report separating hardware frames
fn syn() -> RawEvent {
    RawEvent::new(0x00, 0, 0)
}

fn encode(events: &[RawEvent]) -> Vec<u8> {
    events.iter().flat_map(|e| e.encode()).collect()
}

/// Run the loop over a byte stream and return (reason, file text, mirror text)
fn run_bytes(bytes: Vec<u8>) -> (ShutdownReason, String, String) {
    let sink: TranscriptSink<Vec<u8>, Vec<u8>> = TranscriptSink::new(Vec::new(), Some(Vec::new()));
    let mut handle = LoggerHandle::new(Cursor::new(bytes), sink);
    let mut event_loop = EventLoop::new();
    let reason = event_loop.run(&mut handle, &ShutdownFlag::new());

    let (_, sink) = handle.parts_mut().expect("handle not yet released");
    let file = String::from_utf8(sink.file().clone()).unwrap();
    let mirror = String::from_utf8(sink.mirror().cloned().unwrap_or_default()).unwrap();
    assert_eq!(handle.shutdown(&reason), reason.exit_code());
    (reason, file, mirror)
}

/// Label part of each transcript line
fn labels(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            assert!(line.starts_with('['), "bad line: {}", line);
            let (_, label) = line.split_once("] ").expect("missing timestamp");
            label.to_string()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Transcript content
// ---------------------------------------------------------------------------

#[test]
fn shift_press_produces_single_uppercase_line() {
    let (reason, file, _) = run_bytes(encode(&[
        press(LEFTSHIFT),
        syn(),
        press(KEY_A),
        syn(),
        release(LEFTSHIFT),
        syn(),
        release(KEY_A),
        syn(),
    ]));

    assert!(matches!(reason, ShutdownReason::EndOfStream { bytes_read: 0 }));
    assert_eq!(labels(&file), vec!["A"]);
}

#[test]
fn caps_lock_uppercases_without_shift() {
    let (_, file, _) = run_bytes(encode(&[
        press(CAPSLOCK),
        release(CAPSLOCK),
        press(KEY_B),
        release(KEY_B),
    ]));
    assert_eq!(labels(&file), vec!["B"]);
}

#[test]
fn shift_cancels_caps_lock() {
    let (_, file, _) = run_bytes(encode(&[
        press(CAPSLOCK),
        release(CAPSLOCK),
        press(RIGHTSHIFT),
        press(KEY_A),
        release(KEY_A),
        release(RIGHTSHIFT),
        press(KEY_A),
    ]));
    assert_eq!(labels(&file), vec!["a", "A"]);
}

#[test]
fn caps_lock_repeat_does_not_toggle() {
    let (_, file, _) = run_bytes(encode(&[
        press(CAPSLOCK),
        repeat(CAPSLOCK),
        repeat(CAPSLOCK),
        release(CAPSLOCK),
        press(KEY_B),
    ]));
    assert_eq!(labels(&file), vec!["B"]);
}

#[test]
fn repeats_each_produce_a_line() {
    let (_, file, _) = run_bytes(encode(&[
        press(KEY_A),
        repeat(KEY_A),
        repeat(KEY_A),
        release(KEY_A),
    ]));
    assert_eq!(labels(&file), vec!["a", "a", "a"]);
}

#[test]
fn shifted_digit_and_space() {
    let (_, file, _) = run_bytes(encode(&[
        press(LEFTSHIFT),
        press(KEY_1),
        release(KEY_1),
        release(LEFTSHIFT),
        press(KEY_SPACE),
        press(KEY_1),
    ]));
    assert_eq!(labels(&file), vec!["!", "[SPACE]", "1"]);
}

#[test]
fn unhandled_code_is_logged_with_number() {
    let (_, file, _) = run_bytes(encode(&[press(999), release(999)]));
    let lines = labels(&file);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("999"));
}

#[test]
fn file_and_mirror_match() {
    let (_, file, mirror) = run_bytes(encode(&[press(KEY_A), press(KEY_B)]));
    assert_eq!(file, mirror);
    assert_eq!(file.lines().count(), 2);
}

#[test]
fn line_format_has_fixed_width_timestamp() {
    let (_, file, _) = run_bytes(encode(&[press(KEY_A)]));
    let line = file.lines().next().unwrap();
    // "[YYYY-MM-DD HH:MM:SS] a"
    assert_eq!(line.len(), 1 + 19 + 2 + 1);
    assert_eq!(&line[20..22], "] ");
    assert!(file.ends_with('\n'));
}

// ---------------------------------------------------------------------------
// Stream termination
// ---------------------------------------------------------------------------

#[test]
fn truncated_record_ends_cleanly() {
    let mut bytes = encode(&[press(KEY_A)]);
    let partial = press(KEY_B).encode();
    bytes.extend_from_slice(&partial[..RECORD_SIZE / 2]);

    let (reason, file, _) = run_bytes(bytes);
    assert!(matches!(
        reason,
        ShutdownReason::EndOfStream { bytes_read } if bytes_read == RECORD_SIZE / 2
    ));
    assert!(reason.is_clean());
    assert_eq!(labels(&file), vec!["a"]);
}

#[test]
fn empty_source_ends_cleanly() {
    let (reason, file, _) = run_bytes(Vec::new());
    assert!(matches!(reason, ShutdownReason::EndOfStream { bytes_read: 0 }));
    assert_eq!(reason.exit_code(), 0);
    assert!(file.is_empty());
}

/// Transcript file that rejects every write
struct FullDisk;

impl Write for FullDisk {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn transcript_write_failure_stops_loop() {
    let source = Cursor::new(encode(&[press(KEY_A), press(KEY_B)]));
    let sink: TranscriptSink<FullDisk, Vec<u8>> = TranscriptSink::new(FullDisk, Some(Vec::new()));
    let mut handle = LoggerHandle::new(source, sink);
    let mut event_loop = EventLoop::new();

    let reason = event_loop.run(&mut handle, &ShutdownFlag::new());
    assert!(matches!(reason, ShutdownReason::Failed(LoggerError::Write(_))));
    // The second record is never read
    assert_eq!(event_loop.stats().records_read, 1);
    assert_eq!(event_loop.stats().lines_written, 0);

    let (source, sink) = handle.parts_mut().expect("handle not yet released");
    assert_eq!(source.position() as usize, RECORD_SIZE);
    assert!(sink.mirror().unwrap().is_empty());

    assert_eq!(handle.shutdown(&reason), 1);
    assert!(handle.is_released());
}

// ---------------------------------------------------------------------------
// Durable file sink
// ---------------------------------------------------------------------------

#[test]
fn appends_to_existing_file() {
    let path = std::env::temp_dir().join(format!("keytrail-it-{}.log", std::process::id()));
    fs::write(&path, "previous session\n").unwrap();

    let file = OpenOptions::new().append(true).open(&path).unwrap();
    let sink = TranscriptSink::<_, Vec<u8>>::new(file, None);
    let mut handle = LoggerHandle::new(Cursor::new(encode(&[press(KEY_A)])), sink);
    let reason = EventLoop::new().run(&mut handle, &ShutdownFlag::new());

    // Line is on disk before release
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("previous session\n"));
    assert!(contents.trim_end().ends_with("] a"));

    assert_eq!(handle.shutdown(&reason), 0);
    assert!(handle.is_released());
    assert_eq!(handle.shutdown(&reason), 0);

    let _ = fs::remove_file(&path);
}
