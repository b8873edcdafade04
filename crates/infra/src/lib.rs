//! Infrastructure layer: service pipeline, journal, value transfer, config.

pub mod commands;
pub mod config;
pub mod journal;
pub mod reentry;
pub mod report;
pub mod service;
pub mod transfer;

pub use commands::CommandBuilder;
pub use config::{ConfigError, LedgerConfig};
pub use journal::{InMemoryJournal, JournalError};
pub use reentry::Reentry;
pub use report::{SplitReport, SplitRow};
pub use service::{GroupService, ServiceError};
pub use transfer::{InMemoryTransfer, SendHook, TransferError, ValueTransfer};
