//! Input event decoding, modifier state and key labels

mod event;
mod state;
pub mod keymap;

pub use event::{read_record, KeyValue, RawEvent, ReadOutcome, EV_KEY, RECORD_SIZE};
pub use keymap::{translate, unhandled_label, KeyCode, KeyLabel};
pub use state::ModifierState;
