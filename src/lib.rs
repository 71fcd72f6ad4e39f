//! Threshold-Multisig: N-of-M authorization with exactly-once execution
//!
//! This crate provides the core of a multi-signature wallet:
//! - A fixed owner registry with an M-of-N approval threshold
//! - Sequentially numbered proposals carrying target, value and payload
//! - Duplicate-proof approval tracking in arrival order
//! - Synchronous execution on the approval that meets the threshold
//! - Failure containment: approvals survive a failed action, retries are explicit
//! - An append-only, subscribable event log
//! - A pluggable executor, with an in-memory treasury backend
//!
//! # Example
//!
//! ```rust
//! use threshold_multisig::{Address, Multisig, MultisigConfig, MultisigEvent, NoopExecutor, Party};
//!
//! let (x, y, z) = (Party::new("x"), Party::new("y"), Party::new("z"));
//! let config = MultisigConfig::new(vec![x.clone(), y.clone(), z], 2, None).unwrap();
//! let mut multisig = Multisig::new(config, NoopExecutor).unwrap();
//!
//! let id = multisig.submit(&x, Address::new("w"), 1, vec![]).unwrap();
//! multisig.approve(&x, id).unwrap();
//! multisig.approve(&y, id).unwrap();
//!
//! let last = multisig.events().records().last().unwrap();
//! assert_eq!(last.event, MultisigEvent::ProposalExecuted { id, party: y });
//! ```

pub mod events;
pub mod execution;
pub mod multisig;

// Re-export commonly used types
pub use events::{EventLog, EventRecord, MultisigEvent};
pub use execution::{ActionResult, Executor, NoopExecutor, Treasury, TreasuryError};
pub use multisig::{
    Address, ApprovalOutcome, Multisig, MultisigConfig, MultisigError, OwnerRegistry, Party,
    Proposal, ProposalId, ProposalStatus, ProposalSummary, SharedMultisig,
};
