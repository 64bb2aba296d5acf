//! Keytrail - timestamped key transcript from a Linux input event device
//!
//! Reads fixed-size kernel input records one at a time, tracks shift, ctrl,
//! meta and caps lock, and writes one `[YYYY-MM-DD HH:MM:SS] <label>` line
//! per key press or repeat to an append-only file and the console.

pub mod config;
pub mod error;
pub mod event_loop;
pub mod keyboard;
pub mod shutdown;
pub mod transcript;

pub use config::Config;
pub use error::LoggerError;
pub use event_loop::{EventLoop, LoopStats};
pub use shutdown::{install_interrupt_handler, LoggerHandle, ShutdownFlag, ShutdownReason};
pub use transcript::{TranscriptLine, TranscriptSink};
