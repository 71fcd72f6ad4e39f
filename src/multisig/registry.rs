//! Owner registry
//!
//! Holds the fixed set of authorized parties and the M-of-N approval
//! threshold. Both are validated once and never change afterwards.

use crate::multisig::party::{Party, ProposalId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors related to multisig operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MultisigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Party not authorized: {0}")]
    Unauthorized(Party),
    #[error("Proposal not found: {0}")]
    NotFound(ProposalId),
    #[error("Invalid target address: {0:?}")]
    InvalidTarget(String),
    #[error("Proposal {id} already approved by {party}")]
    DuplicateApproval { id: ProposalId, party: Party },
    #[error("Proposal already executed: {0}")]
    AlreadyExecuted(ProposalId),
    #[error("Execution failed for proposal {0}")]
    ExecutionFailed(ProposalId),
    #[error("Threshold not met: have {have}, need {need}")]
    ThresholdNotMet { have: usize, need: usize },
    #[error("Multisig state lock poisoned")]
    LockPoisoned,
    #[error("Re-entrant call while the multisig is mid-operation")]
    Reentrant,
}

/// Configuration for an owner registry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MultisigConfig {
    /// Authorized parties in construction order
    pub parties: Vec<Party>,
    /// Minimum distinct approvals required (M in M-of-N)
    pub threshold: usize,
    /// Optional human-readable label
    #[serde(default)]
    pub label: Option<String>,
}

impl MultisigConfig {
    /// Create a new validated configuration
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` if the party list is empty, contains
    /// duplicates or the null identity, or if the threshold is outside
    /// `1..=parties.len()`.
    pub fn new(
        parties: Vec<Party>,
        threshold: usize,
        label: Option<String>,
    ) -> Result<Self, MultisigError> {
        let config = Self {
            parties,
            threshold,
            label,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, MultisigError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| MultisigError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every construction invariant
    pub fn validate(&self) -> Result<(), MultisigError> {
        if self.parties.is_empty() {
            return Err(MultisigError::InvalidConfiguration(
                "at least one party required".to_string(),
            ));
        }

        if self.threshold == 0 {
            return Err(MultisigError::InvalidConfiguration(
                "threshold must be at least 1".to_string(),
            ));
        }

        if self.threshold > self.parties.len() {
            return Err(MultisigError::InvalidConfiguration(format!(
                "threshold {} exceeds party count {}",
                self.threshold,
                self.parties.len()
            )));
        }

        let mut seen = HashSet::with_capacity(self.parties.len());
        for party in &self.parties {
            if party.is_null() {
                return Err(MultisigError::InvalidConfiguration(
                    "null party identity".to_string(),
                ));
            }
            if !seen.insert(party) {
                return Err(MultisigError::InvalidConfiguration(format!(
                    "duplicate party {}",
                    party
                )));
            }
        }

        Ok(())
    }

    /// Get description like "2-of-3"
    pub fn description(&self) -> String {
        format!("{}-of-{}", self.threshold, self.parties.len())
    }
}

/// Immutable set of authorized parties plus the approval threshold
///
/// Serializes as its [`MultisigConfig`]; deserializing re-runs validation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "MultisigConfig", into = "MultisigConfig")]
pub struct OwnerRegistry {
    config: MultisigConfig,
    members: HashSet<Party>,
}

impl OwnerRegistry {
    /// Build a registry from a configuration, validating it again
    pub fn new(config: MultisigConfig) -> Result<Self, MultisigError> {
        config.validate()?;
        let members = config.parties.iter().cloned().collect();
        Ok(Self { config, members })
    }

    /// Shorthand for an unlabelled registry
    pub fn with_parties(parties: Vec<Party>, threshold: usize) -> Result<Self, MultisigError> {
        Self::new(MultisigConfig::new(parties, threshold, None)?)
    }

    /// Membership test
    pub fn is_authorized(&self, party: &Party) -> bool {
        self.members.contains(party)
    }

    pub fn threshold(&self) -> usize {
        self.config.threshold
    }

    /// Parties in construction order
    pub fn parties(&self) -> &[Party] {
        &self.config.parties
    }

    pub fn party_count(&self) -> usize {
        self.config.parties.len()
    }

    pub fn label(&self) -> Option<&str> {
        self.config.label.as_deref()
    }

    pub fn config(&self) -> &MultisigConfig {
        &self.config
    }

    pub fn description(&self) -> String {
        self.config.description()
    }
}

impl TryFrom<MultisigConfig> for OwnerRegistry {
    type Error = MultisigError;

    fn try_from(config: MultisigConfig) -> Result<Self, Self::Error> {
        Self::new(config)
    }
}

impl From<OwnerRegistry> for MultisigConfig {
    fn from(registry: OwnerRegistry) -> Self {
        registry.config
    }
}
