//! Identities used by the multisig engine
//!
//! Parties are the authorized signers, addresses are the opaque
//! destinations proposals act upon.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The null destination. Proposals may never target it.
pub const NULL_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Sequential proposal identifier, starting at 0
pub type ProposalId = u64;

fn is_null_identifier(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NULL_ADDRESS)
}

/// An authorized signer identity.
///
/// The engine trusts that the caller has already been authenticated;
/// a party is compared by its identifier only.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Party(String);

impl Party {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty identifier or the null address
    pub fn is_null(&self) -> bool {
        is_null_identifier(&self.0)
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Party {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Party {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque destination of a proposal's action
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The designated null sentinel
    pub fn null() -> Self {
        Self(NULL_ADDRESS.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_null(&self) -> bool {
        is_null_identifier(&self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Address {
    fn from(address: String) -> Self {
        Self(address)
    }
}

impl From<&Party> for Address {
    fn from(party: &Party) -> Self {
        Self(party.0.clone())
    }
}
