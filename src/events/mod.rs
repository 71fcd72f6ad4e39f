//! Observable record of multisig state transitions

pub mod event_log;

pub use event_log::{EventLog, EventRecord, MultisigEvent};
