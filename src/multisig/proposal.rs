//! Proposals awaiting threshold approval
//!
//! A proposal is one candidate action. It moves from `Pending` to
//! `Executed` at most once and is immutable afterwards.

use crate::multisig::approval::ApprovalTracker;
use crate::multisig::party::{Address, Party, ProposalId};
use crate::multisig::registry::MultisigError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Serde adapter rendering payload bytes as a hex string
pub(crate) mod hex_payload {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let digits = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(digits).map_err(serde::de::Error::custom)
    }
}

/// Lifecycle state of a proposal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProposalStatus {
    /// Waiting for approvals, or for a successful execution attempt
    Pending,
    /// External action performed; terminal
    Executed,
}

/// A candidate action and its approval state
#[derive(Clone, Debug, Serialize)]
pub struct Proposal {
    /// Sequential identifier
    pub id: ProposalId,
    /// Party that submitted the proposal
    pub proposer: Party,
    /// Destination of the action
    pub target: Address,
    /// Amount carried by the action
    pub value: u64,
    /// Opaque call data, possibly empty
    #[serde(with = "hex_payload")]
    pub payload: Vec<u8>,
    /// Approvals collected so far
    pub approvals: ApprovalTracker,
    /// Current status
    pub status: ProposalStatus,
    /// Execution attempts that reported failure
    pub failed_attempts: u32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// When the state last changed
    pub updated_at: DateTime<Utc>,
    /// Set once on successful execution
    pub executed_at: Option<DateTime<Utc>>,
}

impl Proposal {
    pub fn new(
        id: ProposalId,
        proposer: Party,
        target: Address,
        value: u64,
        payload: Vec<u8>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            proposer,
            target,
            value,
            payload,
            approvals: ApprovalTracker::new(),
            status: ProposalStatus::Pending,
            failed_attempts: 0,
            created_at: now,
            updated_at: now,
            executed_at: None,
        }
    }

    pub fn is_executed(&self) -> bool {
        self.status == ProposalStatus::Executed
    }

    pub fn approval_count(&self) -> usize {
        self.approvals.count()
    }

    pub fn meets_threshold(&self, threshold: usize) -> bool {
        self.approvals.meets(threshold)
    }

    /// Record an approval, returning the new approval count
    pub fn record_approval(&mut self, party: Party) -> Result<usize, MultisigError> {
        if self.is_executed() {
            return Err(MultisigError::AlreadyExecuted(self.id));
        }

        let count = self.approvals.record(self.id, party)?;
        self.updated_at = Utc::now();
        Ok(count)
    }

    /// Commit the terminal transition
    pub(crate) fn mark_executed(&mut self) {
        let now = Utc::now();
        self.status = ProposalStatus::Executed;
        self.approvals.freeze();
        self.executed_at = Some(now);
        self.updated_at = now;
    }

    pub(crate) fn record_failed_attempt(&mut self) {
        self.failed_attempts = self.failed_attempts.saturating_add(1);
        self.updated_at = Utc::now();
    }

    /// SHA-256 over id, target, value and payload, hex encoded
    ///
    /// Fields are length-prefixed so distinct proposals cannot collide by
    /// shifting bytes between target and payload.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.id.to_be_bytes());
        hasher.update((self.target.as_str().len() as u64).to_be_bytes());
        hasher.update(self.target.as_str().as_bytes());
        hasher.update(self.value.to_be_bytes());
        hasher.update((self.payload.len() as u64).to_be_bytes());
        hasher.update(&self.payload);
        hex::encode(hasher.finalize())
    }

    /// Read-only view returned by `get_proposal`
    pub fn summary(&self) -> ProposalSummary {
        ProposalSummary {
            target: self.target.clone(),
            value: self.value,
            payload: self.payload.clone(),
            executed: self.is_executed(),
            approval_count: self.approval_count(),
        }
    }
}

/// External view of a proposal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProposalSummary {
    pub target: Address,
    pub value: u64,
    #[serde(with = "hex_payload")]
    pub payload: Vec<u8>,
    pub executed: bool,
    pub approval_count: usize,
}
