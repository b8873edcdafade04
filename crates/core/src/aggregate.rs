//! Event-sourced aggregate contract: decide with `handle`, evolve with `apply`.

use crate::error::{DomainError, DomainResult};

/// Identity and stream position of an aggregate.
pub trait AggregateRoot {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Number of events applied since the empty state. A journal holding this
    /// aggregate's stream has the same version.
    fn version(&self) -> u64;
}

/// Version a stream must be at for an append to go through.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    Any,
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "stale stream version (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}

/// Pure, deterministic command handling.
///
/// `handle` validates a command against current state and returns the events
/// it produces without touching state; `apply` folds one event into state.
/// Aggregates perform no IO. Moving value in or out of custody is the job of
/// whoever drives the aggregate; the aggregate only records that it happened.
pub trait Aggregate: AggregateRoot {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Fold one event into state; bumps the version by one.
    fn apply(&mut self, event: &Self::Event);

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;
}
