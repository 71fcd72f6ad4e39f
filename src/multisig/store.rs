//! Proposal store
//!
//! Owns every proposal. Identifiers are dense and sequential, so the
//! store is a plain vector indexed by id.

use crate::multisig::party::{Address, Party, ProposalId};
use crate::multisig::proposal::Proposal;
use crate::multisig::registry::{MultisigError, OwnerRegistry};
use serde::Serialize;

/// Storage for all submitted proposals
///
/// Serialize-only: ids must equal their index, so a store is never
/// rebuilt from untrusted input.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ProposalStore {
    proposals: Vec<Proposal>,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a proposal on behalf of an authorized caller
    ///
    /// Returns the newly assigned id.
    pub fn submit(
        &mut self,
        registry: &OwnerRegistry,
        caller: &Party,
        target: Address,
        value: u64,
        payload: Vec<u8>,
    ) -> Result<ProposalId, MultisigError> {
        if !registry.is_authorized(caller) {
            return Err(MultisigError::Unauthorized(caller.clone()));
        }

        if target.is_null() {
            return Err(MultisigError::InvalidTarget(target.to_string()));
        }

        let id = self.next_id();
        self.proposals
            .push(Proposal::new(id, caller.clone(), target, value, payload));

        Ok(id)
    }

    /// Id the next submission will receive
    pub fn next_id(&self) -> ProposalId {
        self.proposals.len() as ProposalId
    }

    pub fn get(&self, id: ProposalId) -> Result<&Proposal, MultisigError> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.proposals.get(index))
            .ok_or(MultisigError::NotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: ProposalId) -> Result<&mut Proposal, MultisigError> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.proposals.get_mut(index))
            .ok_or(MultisigError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    /// All proposals in id order
    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter()
    }

    /// Proposals still awaiting execution, in id order
    pub fn pending(&self) -> Vec<&Proposal> {
        self.proposals.iter().filter(|p| !p.is_executed()).collect()
    }

    /// Executed proposals, in id order
    pub fn executed(&self) -> Vec<&Proposal> {
        self.proposals.iter().filter(|p| p.is_executed()).collect()
    }
}
