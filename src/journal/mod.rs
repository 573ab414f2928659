mod action_record;
mod journal;

pub use action_record::{ActionRecord, PayloadError};
pub use journal::Journal;
