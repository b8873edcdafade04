//! Expense-sharing group domain module (event-sourced).
//!
//! Membership, contributions, the confirmation quorum, the fair split, custody
//! of deposits, settlement and withdrawal decisions. Pure domain logic only:
//! moving value is left to whoever drives the aggregate.

pub mod command;
pub mod error;
pub mod event;
pub mod group;
pub mod member;
pub mod settlement;
pub mod split;

mod contribution;
mod custody;
mod registry;
mod withdrawal;

#[cfg(test)]
mod testing;

pub use command::{
    AddToGroup, AddToPaid, AgreeToSplit, ChangeAdmin, CreateGroup, GroupCommand,
    PutMoneyInContract, RemoveFromGroup, SendAllMoneyBack, SettleUp, WithdrawFunds,
};
pub use error::{ErrorKind, LedgerError};
pub use event::{
    AdminChanged, Credit, CustodyReturned, DepositRecorded, GroupCreated, GroupEvent,
    MemberAdded, MemberRemoved, PaidAdded, RefundWithdrawn, SettlementCredited, SplitAgreed,
};
pub use group::Group;
pub use member::Member;
pub use settlement::{Allocation, allocate};
pub use split::{SplitEntry, SplitSnapshot};
