//! The external action capability
//!
//! The engine only learns whether an action succeeded. Failure details
//! are logged but never interpreted.

use crate::multisig::Address;

/// Outcome of an external action
pub type ActionResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Performs the action a proposal authorizes once its threshold is met
pub trait Executor {
    fn perform(&mut self, target: &Address, value: u64, payload: &[u8]) -> ActionResult;
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn perform(&mut self, target: &Address, value: u64, payload: &[u8]) -> ActionResult {
        (**self).perform(target, value, payload)
    }
}

/// Executor that accepts every action without side effects
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopExecutor;

impl Executor for NoopExecutor {
    fn perform(&mut self, _target: &Address, _value: u64, _payload: &[u8]) -> ActionResult {
        Ok(())
    }
}
