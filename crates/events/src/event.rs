use chrono::{DateTime, Utc};

/// A recorded fact about a group. Never mutated once journaled.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable routing name, e.g. `"group.member_added"`.
    fn event_type(&self) -> &'static str;

    /// Payload schema version.
    fn version(&self) -> u32;

    /// Time the originating command was issued.
    fn occurred_at(&self) -> DateTime<Utc>;
}
