//! Append-only event log
//!
//! Every state transition is appended here and fanned out to live
//! subscribers through a broadcast channel.

use crate::multisig::{Address, Party, ProposalId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Maximum number of events to buffer per subscriber
const BROADCAST_CAPACITY: usize = 100;

/// Events observable from outside the engine
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum MultisigEvent {
    /// A proposal was submitted
    ProposalCreated {
        id: ProposalId,
        target: Address,
        value: u64,
        #[serde(with = "crate::multisig::proposal::hex_payload")]
        payload: Vec<u8>,
    },
    /// A party approved a proposal
    ApprovalRecorded { id: ProposalId, party: Party },
    /// The action ran; `party` made the triggering call
    ProposalExecuted { id: ProposalId, party: Party },
    /// An execution attempt failed; the proposal stays pending
    ExecutionFailed { id: ProposalId, party: Party },
}

impl MultisigEvent {
    pub fn proposal_id(&self) -> ProposalId {
        match self {
            Self::ProposalCreated { id, .. }
            | Self::ApprovalRecorded { id, .. }
            | Self::ProposalExecuted { id, .. }
            | Self::ExecutionFailed { id, .. } => *id,
        }
    }
}

/// An event with its position in the log
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventRecord {
    pub sequence: u64,
    pub recorded_at: DateTime<Utc>,
    pub event: MultisigEvent,
}

/// Ordered history of engine events
#[derive(Debug)]
pub struct EventLog {
    records: Vec<EventRecord>,
    sender: broadcast::Sender<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            records: Vec::new(),
            sender,
        }
    }

    /// Append an event and notify subscribers
    pub(crate) fn record(&mut self, event: MultisigEvent) -> &EventRecord {
        let record = EventRecord {
            sequence: self.records.len() as u64,
            recorded_at: Utc::now(),
            event,
        };

        // Ignore send errors (no subscribers)
        let _ = self.sender.send(record.clone());

        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Receive events recorded from now on
    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Events without their log metadata
    pub fn events(&self) -> impl Iterator<Item = &MultisigEvent> {
        self.records.iter().map(|r| &r.event)
    }

    /// History of a single proposal, in order
    pub fn for_proposal(&self, id: ProposalId) -> Vec<&MultisigEvent> {
        self.events().filter(|e| e.proposal_id() == id).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Export the full history as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.records)
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    fn approval(id: ProposalId, party: &str) -> MultisigEvent {
        MultisigEvent::ApprovalRecorded {
            id,
            party: Party::new(party),
        }
    }

    #[test]
    fn test_sequence_numbers() {
        let mut log = EventLog::new();
        log.record(approval(0, "alice"));
        log.record(approval(0, "bob"));
        let last = log.record(approval(1, "alice")).sequence;

        assert_eq!(last, 2);
        let sequences: Vec<u64> = log.records().iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
    }

    #[test]
    fn test_recording_without_subscribers() {
        let mut log = EventLog::new();
        assert_eq!(log.subscriber_count(), 0);
        log.record(approval(0, "alice"));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_subscriber_sees_new_events_only() {
        let mut log = EventLog::new();
        log.record(approval(0, "alice"));

        let mut rx = log.subscribe();
        log.record(approval(0, "bob"));

        let received = rx.try_recv().unwrap();
        assert_eq!(received.sequence, 1);
        assert_eq!(received.event, approval(0, "bob"));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_lagging_subscriber_does_not_block() {
        let mut log = EventLog::new();
        let mut rx = log.subscribe();

        // The channel rounds its capacity up to a power of two
        let overflow = BROADCAST_CAPACITY.next_power_of_two() + 5;
        for i in 0..overflow as u64 {
            log.record(approval(i, "alice"));
        }

        assert_eq!(log.len(), overflow);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Lagged(_))));
    }

    #[test]
    fn test_for_proposal_filter() {
        let mut log = EventLog::new();
        log.record(approval(0, "alice"));
        log.record(approval(1, "alice"));
        log.record(MultisigEvent::ProposalExecuted {
            id: 0,
            party: Party::new("bob"),
        });

        let history = log.for_proposal(0);
        assert_eq!(history.len(), 2);
        assert!(matches!(history[1], MultisigEvent::ProposalExecuted { .. }));
    }

    #[test]
    fn test_json_export() {
        let mut log = EventLog::new();
        log.record(MultisigEvent::ProposalCreated {
            id: 0,
            target: Address::new("dave"),
            value: 7,
            payload: vec![0xca, 0xfe],
        });

        let json = log.to_json().unwrap();
        let parsed: Vec<EventRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, log.records());
        assert!(json.contains("\"type\": \"ProposalCreated\""));
        assert!(json.contains("0xcafe"));
    }
}
