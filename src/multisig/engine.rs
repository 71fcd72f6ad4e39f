//! Threshold execution engine
//!
//! Coordinates the registry, the proposal store, the event log and the
//! injected executor. Every mutating call takes `&mut self`, so approvals
//! for a proposal are applied one at a time and the executor, which never
//! sees the engine, cannot re-enter it mid-transition.

use crate::events::{EventLog, EventRecord, MultisigEvent};
use crate::execution::Executor;
use crate::multisig::party::{Address, Party, ProposalId};
use crate::multisig::proposal::{Proposal, ProposalSummary};
use crate::multisig::registry::{MultisigConfig, MultisigError, OwnerRegistry};
use crate::multisig::store::ProposalStore;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tokio::sync::broadcast;

/// Readable message from a panic payload
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "executor panicked".to_string()
    }
}

/// Result of an `approve` or `retry_execution` call
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalOutcome {
    /// Whether this call executed the proposal
    pub executed: bool,
    /// Approvals recorded after the call
    pub approval_count: usize,
}

/// N-of-M multisig with exactly-once execution
#[derive(Debug)]
pub struct Multisig<E> {
    registry: OwnerRegistry,
    store: ProposalStore,
    events: EventLog,
    executor: E,
}

impl<E: Executor> Multisig<E> {
    /// Construct from a configuration
    ///
    /// # Errors
    /// `InvalidConfiguration` if the configuration is not a valid M-of-N set.
    pub fn new(config: MultisigConfig, executor: E) -> Result<Self, MultisigError> {
        Ok(Self::with_registry(OwnerRegistry::new(config)?, executor))
    }

    /// Construct around an already validated registry
    pub fn with_registry(registry: OwnerRegistry, executor: E) -> Self {
        log::info!(
            "Multisig ready: {} {}",
            registry.description(),
            registry.label().unwrap_or("(unlabelled)")
        );

        Self {
            registry,
            store: ProposalStore::new(),
            events: EventLog::new(),
            executor,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_authorized(&self, party: &Party) -> bool {
        self.registry.is_authorized(party)
    }

    pub fn parties(&self) -> &[Party] {
        self.registry.parties()
    }

    pub fn threshold(&self) -> usize {
        self.registry.threshold()
    }

    pub fn registry(&self) -> &OwnerRegistry {
        &self.registry
    }

    /// Summary view of a proposal
    pub fn get_proposal(&self, id: ProposalId) -> Result<ProposalSummary, MultisigError> {
        Ok(self.store.get(id)?.summary())
    }

    /// Full snapshot of a proposal
    pub fn proposal(&self, id: ProposalId) -> Result<Proposal, MultisigError> {
        self.store.get(id).cloned()
    }

    pub fn proposals(&self) -> &ProposalStore {
        &self.store
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.events.subscribe()
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Mutable access to the backend, e.g. to fund a treasury
    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Submit a new proposal
    ///
    /// # Errors
    /// `Unauthorized` for non-parties, `InvalidTarget` for the null address.
    pub fn submit(
        &mut self,
        caller: &Party,
        target: Address,
        value: u64,
        payload: Vec<u8>,
    ) -> Result<ProposalId, MultisigError> {
        let id = self
            .store
            .submit(&self.registry, caller, target.clone(), value, payload.clone())?;

        log::info!(
            "Proposal {} submitted by {}: {} to {} ({} payload bytes)",
            id,
            caller,
            value,
            target,
            payload.len()
        );

        self.events.record(MultisigEvent::ProposalCreated {
            id,
            target,
            value,
            payload,
        });

        Ok(id)
    }

    /// Approve a proposal, executing it if this approval meets the threshold
    ///
    /// Checks run in order: unknown id, unauthorized caller, already
    /// executed, duplicate approval. A failed execution keeps the approval
    /// and returns `ExecutionFailed`; any later approval retries.
    pub fn approve(
        &mut self,
        caller: &Party,
        id: ProposalId,
    ) -> Result<ApprovalOutcome, MultisigError> {
        let threshold = self.registry.threshold();
        let proposal = self.store.get_mut(id)?;

        if !self.registry.is_authorized(caller) {
            return Err(MultisigError::Unauthorized(caller.clone()));
        }

        let approval_count = proposal.record_approval(caller.clone())?;
        let ready = proposal.meets_threshold(threshold);

        log::debug!(
            "Proposal {} approved by {} ({}/{})",
            id,
            caller,
            approval_count,
            threshold
        );

        self.events.record(MultisigEvent::ApprovalRecorded {
            id,
            party: caller.clone(),
        });

        if !ready {
            return Ok(ApprovalOutcome {
                executed: false,
                approval_count,
            });
        }

        self.execute(caller, id)?;

        Ok(ApprovalOutcome {
            executed: true,
            approval_count,
        })
    }

    /// Re-attempt execution of a proposal whose threshold is already met
    ///
    /// Lets any party recover a proposal whose action previously failed
    /// after every party has approved.
    pub fn retry_execution(
        &mut self,
        caller: &Party,
        id: ProposalId,
    ) -> Result<ApprovalOutcome, MultisigError> {
        let threshold = self.registry.threshold();
        let proposal = self.store.get(id)?;

        if !self.registry.is_authorized(caller) {
            return Err(MultisigError::Unauthorized(caller.clone()));
        }

        if proposal.is_executed() {
            return Err(MultisigError::AlreadyExecuted(id));
        }

        let approval_count = proposal.approval_count();
        if !proposal.meets_threshold(threshold) {
            return Err(MultisigError::ThresholdNotMet {
                have: approval_count,
                need: threshold,
            });
        }

        log::info!("Retrying execution of proposal {} for {}", id, caller);
        self.execute(caller, id)?;

        Ok(ApprovalOutcome {
            executed: true,
            approval_count,
        })
    }

    /// Run the external action and commit the terminal transition on success
    ///
    /// A panicking executor counts as a failed attempt. Nothing has been
    /// committed at that point, so the engine stays usable.
    fn execute(&mut self, caller: &Party, id: ProposalId) -> Result<(), MultisigError> {
        let proposal = self.store.get_mut(id)?;
        let executor = &mut self.executor;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            executor.perform(&proposal.target, proposal.value, &proposal.payload)
        }))
        .unwrap_or_else(|payload| Err(panic_message(&*payload).into()));

        match outcome {
            Ok(()) => {
                proposal.mark_executed();
                log::info!(
                    "Proposal {} executed: {} to {} (triggered by {})",
                    id,
                    proposal.value,
                    proposal.target,
                    caller
                );
                self.events.record(MultisigEvent::ProposalExecuted {
                    id,
                    party: caller.clone(),
                });
                Ok(())
            }
            Err(reason) => {
                proposal.record_failed_attempt();
                log::warn!(
                    "Execution of proposal {} failed (attempt {}): {}",
                    id,
                    proposal.failed_attempts,
                    reason
                );
                self.events.record(MultisigEvent::ExecutionFailed {
                    id,
                    party: caller.clone(),
                });
                Err(MultisigError::ExecutionFailed(id))
            }
        }
    }
}
