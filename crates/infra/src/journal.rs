//! Append-only journal of one group's committed events.
//!
//! The journal is the source of truth: a group is rebuilt by replaying it in
//! sequence order, and the bus only ever sees what was appended here first.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use splitledger_core::{ExpectedVersion, GroupId};
use splitledger_events::{Event, EventEnvelope};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JournalError {
    /// Optimistic concurrency failure (stale group version).
    #[error("concurrency conflict: expected {expected:?}, found {actual}")]
    Concurrency {
        expected: ExpectedVersion,
        actual: u64,
    },

    #[error("entry belongs to group {actual}, journal holds {expected}")]
    WrongGroup { expected: GroupId, actual: GroupId },

    /// Sequence numbers must start at 1 and increase by exactly one.
    #[error("non-monotonic sequence: expected {expected}, found {actual}")]
    NonMonotonic { expected: u64, actual: u64 },

    #[error("journal serialization failed: {0}")]
    Serde(String),
}

/// In-memory journal for a single group stream.
///
/// Intended for tests, the CLI and embedding. Not optimized for performance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryJournal<E> {
    group_id: GroupId,
    entries: Vec<EventEnvelope<E>>,
}

impl<E> InMemoryJournal<E> {
    pub fn new(group_id: GroupId) -> Self {
        Self {
            group_id,
            entries: Vec::new(),
        }
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Sequence number of the last entry (0 when empty).
    pub fn version(&self) -> u64 {
        self.entries.last().map(|e| e.sequence_number()).unwrap_or(0)
    }

    pub fn entries(&self) -> &[EventEnvelope<E>] {
        &self.entries
    }

    /// Payloads in sequence order.
    pub fn events(&self) -> impl Iterator<Item = &E> + '_ {
        self.entries.iter().map(|e| e.payload())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that every entry belongs to this group and that sequence numbers
    /// run 1, 2, 3, ... without gaps.
    pub fn validate(&self) -> Result<(), JournalError> {
        let mut expected = 1u64;
        for entry in &self.entries {
            if entry.group_id() != self.group_id {
                return Err(JournalError::WrongGroup {
                    expected: self.group_id,
                    actual: entry.group_id(),
                });
            }
            if entry.sequence_number() != expected {
                return Err(JournalError::NonMonotonic {
                    expected,
                    actual: entry.sequence_number(),
                });
            }
            expected += 1;
        }
        Ok(())
    }
}

impl<E: Event + Clone> InMemoryJournal<E> {
    /// Append a batch, assigning the next sequence numbers.
    ///
    /// An empty batch is a no-op and does not check the expected version.
    pub fn append(
        &mut self,
        events: Vec<E>,
        expected: ExpectedVersion,
    ) -> Result<Vec<EventEnvelope<E>>, JournalError> {
        if events.is_empty() {
            return Ok(vec![]);
        }

        let current = self.version();
        if !expected.matches(current) {
            return Err(JournalError::Concurrency {
                expected,
                actual: current,
            });
        }

        let mut next = current + 1;
        let mut committed = Vec::with_capacity(events.len());
        for event in events {
            let envelope = EventEnvelope::wrap(self.group_id, next, event);
            next += 1;
            self.entries.push(envelope.clone());
            committed.push(envelope);
        }

        Ok(committed)
    }
}

impl<E: Serialize> InMemoryJournal<E> {
    pub fn to_json(&self) -> Result<String, JournalError> {
        serde_json::to_string_pretty(&self.entries).map_err(|e| JournalError::Serde(e.to_string()))
    }
}

impl<E: DeserializeOwned> InMemoryJournal<E> {
    /// Load a journal previously written with [`InMemoryJournal::to_json`].
    pub fn from_json(group_id: GroupId, json: &str) -> Result<Self, JournalError> {
        let entries: Vec<EventEnvelope<E>> =
            serde_json::from_str(json).map_err(|e| JournalError::Serde(e.to_string()))?;
        let journal = Self { group_id, entries };
        journal.validate()?;
        Ok(journal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Noted {
        at: DateTime<Utc>,
    }

    impl Event for Noted {
        fn event_type(&self) -> &'static str {
            "test.noted"
        }

        fn version(&self) -> u32 {
            1
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            self.at
        }
    }

    fn noted() -> Noted {
        Noted { at: Utc::now() }
    }

    #[test]
    fn append_assigns_sequence_numbers_from_one() {
        let mut journal = InMemoryJournal::new(GroupId::new());

        let first = journal
            .append(vec![noted(), noted()], ExpectedVersion::Exact(0))
            .unwrap();
        let second = journal.append(vec![noted()], ExpectedVersion::Exact(2)).unwrap();

        assert_eq!(first[0].sequence_number(), 1);
        assert_eq!(first[1].sequence_number(), 2);
        assert_eq!(second[0].sequence_number(), 3);
        assert_eq!(journal.version(), 3);
        assert!(journal.validate().is_ok());
    }

    #[test]
    fn stale_expected_version_is_rejected() {
        let mut journal = InMemoryJournal::new(GroupId::new());
        journal.append(vec![noted()], ExpectedVersion::Any).unwrap();

        let err = journal
            .append(vec![noted()], ExpectedVersion::Exact(0))
            .unwrap_err();

        assert_eq!(
            err,
            JournalError::Concurrency {
                expected: ExpectedVersion::Exact(0),
                actual: 1
            }
        );
        assert_eq!(journal.version(), 1);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let mut journal: InMemoryJournal<Noted> = InMemoryJournal::new(GroupId::new());
        let committed = journal.append(vec![], ExpectedVersion::Exact(42)).unwrap();

        assert!(committed.is_empty());
        assert!(journal.is_empty());
    }

    #[test]
    fn json_round_trip_preserves_entries() {
        let group_id = GroupId::new();
        let mut journal = InMemoryJournal::new(group_id);
        journal
            .append(vec![noted(), noted()], ExpectedVersion::Exact(0))
            .unwrap();

        let json = journal.to_json().unwrap();
        let loaded = InMemoryJournal::<Noted>::from_json(group_id, &json).unwrap();

        assert_eq!(loaded, journal);
    }

    #[test]
    fn loading_under_another_group_fails_validation() {
        let mut journal = InMemoryJournal::new(GroupId::new());
        journal.append(vec![noted()], ExpectedVersion::Any).unwrap();
        let json = journal.to_json().unwrap();

        let err = InMemoryJournal::<Noted>::from_json(GroupId::new(), &json).unwrap_err();
        assert!(matches!(err, JournalError::WrongGroup { .. }));
    }

    #[test]
    fn malformed_json_is_a_serde_error() {
        let err = InMemoryJournal::<Noted>::from_json(GroupId::new(), "{not json").unwrap_err();
        assert!(matches!(err, JournalError::Serde(_)));
    }
}
