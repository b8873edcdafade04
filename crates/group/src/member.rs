use serde::{Deserialize, Serialize};

use splitledger_core::AccountId;

/// Per-member record held by the group.
///
/// `amount_paid` is a *claim* toward the shared total; `custody_balance` is
/// value actually deposited and still held by the ledger. `settled` is the
/// signed net value moved through settle-up: it rises when a debtor's custody
/// is consumed and falls when a creditor is credited. Across current members
/// it always sums to zero; removal hands the departing member's share of it
/// to the first remaining member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub(crate) account: AccountId,
    pub(crate) name: String,
    pub(crate) amount_paid: i64,
    pub(crate) confirmed_split: bool,
    pub(crate) custody_balance: i64,
    pub(crate) settled: i64,
}

impl Member {
    pub(crate) fn new(account: AccountId, name: impl Into<String>) -> Self {
        Self {
            account,
            name: name.into(),
            amount_paid: 0,
            confirmed_split: false,
            custody_balance: 0,
            settled: 0,
        }
    }

    pub fn account(&self) -> AccountId {
        self.account
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount_paid(&self) -> i64 {
        self.amount_paid
    }

    pub fn confirmed_split(&self) -> bool {
        self.confirmed_split
    }

    pub fn custody_balance(&self) -> i64 {
        self.custody_balance
    }

    pub fn settled(&self) -> i64 {
        self.settled
    }
}
