//! Execution backends for approved proposals
//!
//! The engine depends only on the [`Executor`] trait; [`Treasury`] is the
//! value-transfer backend and [`NoopExecutor`] accepts everything.

pub mod executor;
pub mod treasury;

pub use executor::{ActionResult, Executor, NoopExecutor};
pub use treasury::{Treasury, TransferRecord, TreasuryError};
