//! Threshold multi-signature authorization
//!
//! A fixed set of parties submits proposals; once M of the N parties have
//! approved one, its action is performed exactly once.
//!
//! # Example
//!
//! ```rust
//! use threshold_multisig::execution::Treasury;
//! use threshold_multisig::multisig::{Address, Multisig, MultisigConfig, Party};
//!
//! let (alice, bob, carol) = (Party::new("alice"), Party::new("bob"), Party::new("carol"));
//!
//! // Create a 2-of-3 multisig over a funded treasury
//! let config = MultisigConfig::new(vec![alice.clone(), bob.clone(), carol], 2, None)?;
//! let mut multisig = Multisig::new(config, Treasury::with_balance(100))?;
//!
//! // Propose a transfer and collect approvals
//! let id = multisig.submit(&alice, Address::new("dave"), 40, vec![])?;
//! assert!(!multisig.approve(&alice, id)?.executed);
//! assert!(multisig.approve(&bob, id)?.executed);
//!
//! assert_eq!(multisig.executor().balance(), 60);
//! # Ok::<(), threshold_multisig::multisig::MultisigError>(())
//! ```

pub mod approval;
pub mod engine;
pub mod party;
pub mod proposal;
pub mod registry;
pub mod shared;
pub mod store;

pub use approval::ApprovalTracker;
pub use engine::{ApprovalOutcome, Multisig};
pub use party::{Address, Party, ProposalId, NULL_ADDRESS};
pub use proposal::{Proposal, ProposalStatus, ProposalSummary};
pub use registry::{MultisigConfig, MultisigError, OwnerRegistry};
pub use shared::SharedMultisig;
pub use store::ProposalStore;
