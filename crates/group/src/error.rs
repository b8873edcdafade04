//! Ledger error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use splitledger_core::{AccountId, GroupId};

/// Coarse classification of a rejected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Wrong caller role.
    Authorization,
    /// Membership lookups (missing or duplicate identities).
    Lookup,
    /// Malformed or out-of-range input.
    InvalidInput,
    /// The ledger is not in a state that allows the operation.
    PreconditionNotMet,
    /// The value-transfer substrate rejected a movement of value.
    Transfer,
}

/// A rejected ledger operation.
///
/// Every variant is reported synchronously and leaves the group exactly as it
/// was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("group has not been created")]
    NotInitialized,

    #[error("group already exists")]
    AlreadyInitialized,

    #[error("command targets group {actual}, this is group {expected}")]
    WrongGroup { expected: GroupId, actual: GroupId },

    #[error("unauthorized: {caller} is not the group admin")]
    Unauthorized { caller: AccountId },

    #[error("{0} is not a member of the group")]
    NotAMember(AccountId),

    #[error("{0} is already a member of the group")]
    DuplicateMember(AccountId),

    #[error("member {0} not found")]
    NotFound(AccountId),

    #[error("amount must be positive (got {0})")]
    InvalidAmount(i64),

    #[error("member name cannot be empty")]
    InvalidName,

    #[error("group is full ({limit} members)")]
    GroupFull { limit: usize },

    #[error("arithmetic overflow")]
    Overflow,

    #[error("deposit of {attempted} exceeds the remaining debt of {remaining}")]
    ExcessDeposit { attempted: i64, remaining: i128 },

    #[error("{0} owes nothing to the group")]
    NoDebtOwed(AccountId),

    #[error("quorum not met: {unconfirmed} member(s) have not agreed to the current split")]
    QuorumNotMet { unconfirmed: usize },

    #[error("{0} has nothing to withdraw")]
    NothingToWithdraw(AccountId),

    #[error("a transfer is already in progress")]
    TransferInProgress,

    #[error("transfer failed: {0}")]
    TransferFailed(String),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Unauthorized { .. } | LedgerError::NotAMember(_) => {
                ErrorKind::Authorization
            }
            LedgerError::WrongGroup { .. }
            | LedgerError::DuplicateMember(_)
            | LedgerError::NotFound(_) => ErrorKind::Lookup,
            LedgerError::InvalidAmount(_)
            | LedgerError::InvalidName
            | LedgerError::Overflow
            | LedgerError::ExcessDeposit { .. } => ErrorKind::InvalidInput,
            LedgerError::NotInitialized
            | LedgerError::AlreadyInitialized
            | LedgerError::GroupFull { .. }
            | LedgerError::NoDebtOwed(_)
            | LedgerError::QuorumNotMet { .. }
            | LedgerError::NothingToWithdraw(_)
            | LedgerError::TransferInProgress => ErrorKind::PreconditionNotMet,
            LedgerError::TransferFailed(_) => ErrorKind::Transfer,
        }
    }

    pub fn transfer_failed(msg: impl Into<String>) -> Self {
        Self::TransferFailed(msg.into())
    }
}
