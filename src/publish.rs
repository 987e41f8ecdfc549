//! Atomic publisher and the persisted selection record.

mod atomic;
mod record;

pub use atomic::{AtomicPublisher, Publish, write_atomically};
#[cfg(test)]
pub use atomic::PublishOutcome;
pub use record::SelectionRecord;
