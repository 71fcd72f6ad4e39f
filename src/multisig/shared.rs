//! Thread-safe handle to a multisig engine
//!
//! One lock guards the whole engine, so every submit, approve and retry
//! is applied atomically and in arrival order. The handle remembers which
//! thread holds the lock; a call from that same thread (an executor
//! calling back in) is rejected with `Reentrant` instead of deadlocking.

use crate::events::EventRecord;
use crate::execution::Executor;
use crate::multisig::engine::{ApprovalOutcome, Multisig};
use crate::multisig::party::{Address, Party, ProposalId};
use crate::multisig::proposal::ProposalSummary;
use crate::multisig::registry::MultisigError;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};
use tokio::sync::broadcast;

/// Cloneable, lock-protected multisig
pub struct SharedMultisig<E> {
    inner: Arc<Mutex<Multisig<E>>>,
    holder: Arc<Mutex<Option<ThreadId>>>,
}

impl<E> Clone for SharedMultisig<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            holder: Arc::clone(&self.holder),
        }
    }
}

/// Engine access that clears the holder mark before the lock is released
struct EngineGuard<'a, E> {
    engine: MutexGuard<'a, Multisig<E>>,
    holder: &'a Mutex<Option<ThreadId>>,
}

impl<E> Deref for EngineGuard<'_, E> {
    type Target = Multisig<E>;

    fn deref(&self) -> &Self::Target {
        &self.engine
    }
}

impl<E> DerefMut for EngineGuard<'_, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.engine
    }
}

impl<E> Drop for EngineGuard<'_, E> {
    fn drop(&mut self) {
        // Runs before `engine` is dropped, so the next holder's mark is never cleared
        *self.holder.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl<E: Executor> SharedMultisig<E> {
    pub fn new(multisig: Multisig<E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(multisig)),
            holder: Arc::new(Mutex::new(None)),
        }
    }

    fn lock(&self) -> Result<EngineGuard<'_, E>, MultisigError> {
        let current = thread::current().id();

        let holder = *self.holder.lock().unwrap_or_else(PoisonError::into_inner);
        if holder == Some(current) {
            log::warn!("Rejected re-entrant multisig call from {:?}", current);
            return Err(MultisigError::Reentrant);
        }

        let engine = self.inner.lock().map_err(|_| MultisigError::LockPoisoned)?;
        *self.holder.lock().unwrap_or_else(PoisonError::into_inner) = Some(current);

        Ok(EngineGuard {
            engine,
            holder: &self.holder,
        })
    }

    pub fn submit(
        &self,
        caller: &Party,
        target: Address,
        value: u64,
        payload: Vec<u8>,
    ) -> Result<ProposalId, MultisigError> {
        self.lock()?.submit(caller, target, value, payload)
    }

    pub fn approve(
        &self,
        caller: &Party,
        id: ProposalId,
    ) -> Result<ApprovalOutcome, MultisigError> {
        self.lock()?.approve(caller, id)
    }

    pub fn retry_execution(
        &self,
        caller: &Party,
        id: ProposalId,
    ) -> Result<ApprovalOutcome, MultisigError> {
        self.lock()?.retry_execution(caller, id)
    }

    pub fn get_proposal(&self, id: ProposalId) -> Result<ProposalSummary, MultisigError> {
        self.lock()?.get_proposal(id)
    }

    pub fn subscribe(&self) -> Result<broadcast::Receiver<EventRecord>, MultisigError> {
        Ok(self.lock()?.subscribe())
    }

    /// Run `f` with exclusive access to the engine
    ///
    /// A panic inside `f` poisons the handle: later calls return
    /// `LockPoisoned`, since `f` may have left the engine half-updated.
    pub fn with<R>(&self, f: impl FnOnce(&mut Multisig<E>) -> R) -> Result<R, MultisigError> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }
}
