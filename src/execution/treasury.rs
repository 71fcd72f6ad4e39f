//! In-memory treasury
//!
//! Holds the native balance controlled by the multisig. Deposits are
//! unrestricted; withdrawals happen only through executed proposals.

use crate::execution::executor::{ActionResult, Executor};
use crate::multisig::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Maximum number of transfers kept in history
const MAX_HISTORY: usize = 100;

/// Treasury errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreasuryError {
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u64, need: u64 },
    #[error("Balance overflow")]
    Overflow,
}

/// A completed outgoing transfer
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransferRecord {
    pub to: Address,
    pub amount: u64,
    #[serde(with = "crate::multisig::proposal::hex_payload")]
    pub payload: Vec<u8>,
    pub timestamp: DateTime<Utc>,
}

/// Ledger backing value transfers
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Treasury {
    /// Funds held by the multisig
    balance: u64,
    /// Amounts paid out, by recipient
    credited: HashMap<Address, u64>,
    /// Recent transfers (last 100)
    pub transfer_history: Vec<TransferRecord>,
}

impl Treasury {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treasury starting with `balance`
    pub fn with_balance(balance: u64) -> Self {
        Self {
            balance,
            ..Self::default()
        }
    }

    /// Accept funds into the treasury
    pub fn deposit(&mut self, amount: u64) -> Result<u64, TreasuryError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(TreasuryError::Overflow)?;
        log::debug!("Treasury deposit of {}, balance now {}", amount, self.balance);
        Ok(self.balance)
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Total paid out to `address`
    pub fn balance_of(&self, address: &Address) -> u64 {
        self.credited.get(address).copied().unwrap_or(0)
    }

    /// Move `amount` to `to`; no state changes on failure
    pub fn transfer(
        &mut self,
        to: &Address,
        amount: u64,
        payload: &[u8],
    ) -> Result<TransferRecord, TreasuryError> {
        if self.balance < amount {
            return Err(TreasuryError::InsufficientBalance {
                have: self.balance,
                need: amount,
            });
        }

        let credited = self.balance_of(to);
        let new_credit = credited
            .checked_add(amount)
            .ok_or(TreasuryError::Overflow)?;

        self.balance -= amount;
        self.credited.insert(to.clone(), new_credit);

        let record = TransferRecord {
            to: to.clone(),
            amount,
            payload: payload.to_vec(),
            timestamp: Utc::now(),
        };

        self.transfer_history.push(record.clone());
        if self.transfer_history.len() > MAX_HISTORY {
            self.transfer_history.remove(0);
        }

        Ok(record)
    }
}

impl Executor for Treasury {
    fn perform(&mut self, target: &Address, value: u64, payload: &[u8]) -> ActionResult {
        self.transfer(target, value, payload)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_and_transfer() {
        let mut treasury = Treasury::new();
        assert_eq!(treasury.deposit(200).unwrap(), 200);

        let bob = Address::new("bob");
        let record = treasury.transfer(&bob, 75, &[0x01]).unwrap();

        assert_eq!(record.amount, 75);
        assert_eq!(treasury.balance(), 125);
        assert_eq!(treasury.balance_of(&bob), 75);
        assert_eq!(treasury.transfer_history.len(), 1);
    }

    #[test]
    fn test_insufficient_balance_leaves_state() {
        let mut treasury = Treasury::with_balance(5);
        let bob = Address::new("bob");

        let result = treasury.transfer(&bob, 10, &[]);
        assert_eq!(
            result.unwrap_err(),
            TreasuryError::InsufficientBalance { have: 5, need: 10 }
        );
        assert_eq!(treasury.balance(), 5);
        assert_eq!(treasury.balance_of(&bob), 0);
        assert!(treasury.transfer_history.is_empty());
    }

    #[test]
    fn test_zero_value_call_succeeds() {
        let mut treasury = Treasury::new();
        assert!(treasury.perform(&Address::new("contract"), 0, &[0xab]).is_ok());
        assert_eq!(treasury.transfer_history.len(), 1);
    }

    #[test]
    fn test_deposit_overflow() {
        let mut treasury = Treasury::with_balance(u64::MAX);
        assert_eq!(treasury.deposit(1), Err(TreasuryError::Overflow));
        assert_eq!(treasury.balance(), u64::MAX);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut treasury = Treasury::with_balance(1_000);
        let bob = Address::new("bob");
        for _ in 0..(MAX_HISTORY + 10) {
            treasury.transfer(&bob, 1, &[]).unwrap();
        }
        assert_eq!(treasury.transfer_history.len(), MAX_HISTORY);
        assert_eq!(treasury.balance_of(&bob), (MAX_HISTORY + 10) as u64);
    }

    #[test]
    fn test_executor_reports_failure() {
        let mut treasury = Treasury::new();
        let err = treasury.perform(&Address::new("bob"), 1, &[]).unwrap_err();
        assert!(err.to_string().contains("Insufficient balance"));
    }
}
