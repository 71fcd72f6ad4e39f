//! Per-proposal approval record
//!
//! Approvals are kept in arrival order. A party can appear once, and the
//! record is frozen when the owning proposal executes.

use crate::multisig::party::{Party, ProposalId};
use crate::multisig::registry::MultisigError;
use serde::Serialize;

/// Insertion-ordered set of approving parties
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ApprovalTracker {
    approvals: Vec<Party>,
    frozen: bool,
}

impl ApprovalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an approval for proposal `id`, returning the new count
    pub fn record(&mut self, id: ProposalId, party: Party) -> Result<usize, MultisigError> {
        if self.frozen {
            return Err(MultisigError::AlreadyExecuted(id));
        }

        if self.has_approved(&party) {
            return Err(MultisigError::DuplicateApproval { id, party });
        }

        self.approvals.push(party);
        Ok(self.approvals.len())
    }

    pub fn has_approved(&self, party: &Party) -> bool {
        self.approvals.iter().any(|p| p == party)
    }

    pub fn count(&self) -> usize {
        self.approvals.len()
    }

    /// `>=`, so an already-satisfied record still qualifies
    pub fn meets(&self, threshold: usize) -> bool {
        self.approvals.len() >= threshold
    }

    /// Approvers in the order their calls arrived
    pub fn approvers(&self) -> &[Party] {
        &self.approvals
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}
