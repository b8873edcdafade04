use serde::{Deserialize, Serialize};
use uuid::Uuid;

use splitledger_core::GroupId;

use crate::Event;

/// Envelope for an event, containing stream metadata.
///
/// This is the unit appended to a group's journal and published on the bus.
///
/// Notes:
/// - **Append-only**: `sequence_number` is monotonically increasing per group, starting at 1.
/// - `event_type` / `event_version` are copied from the payload at wrap time so that
///   consumers can route without inspecting the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    group_id: GroupId,

    /// Monotonically increasing position in the group stream.
    sequence_number: u64,

    event_type: String,
    event_version: u32,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        group_id: GroupId,
        sequence_number: u64,
        event_type: impl Into<String>,
        event_version: u32,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            group_id,
            sequence_number,
            event_type: event_type.into(),
            event_version,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn event_version(&self) -> u32 {
        self.event_version
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl<E: Event> EventEnvelope<E> {
    /// Wrap a typed event, taking type name and schema version from the event itself.
    pub fn wrap(group_id: GroupId, sequence_number: u64, payload: E) -> Self {
        Self::new(
            Uuid::now_v7(),
            group_id,
            sequence_number,
            payload.event_type(),
            payload.version(),
            payload,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Pinged {
        at: DateTime<Utc>,
    }

    impl Event for Pinged {
        fn event_type(&self) -> &'static str {
            "test.pinged"
        }

        fn version(&self) -> u32 {
            2
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            self.at
        }
    }

    #[test]
    fn wrap_copies_event_metadata() {
        let group_id = GroupId::new();
        let env = EventEnvelope::wrap(group_id, 5, Pinged { at: Utc::now() });

        assert_eq!(env.group_id(), group_id);
        assert_eq!(env.sequence_number(), 5);
        assert_eq!(env.event_type(), "test.pinged");
        assert_eq!(env.event_version(), 2);
    }
}
