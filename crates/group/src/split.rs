//! Fair-split calculation (pure).

use serde::{Deserialize, Serialize};

use splitledger_core::AccountId;

use crate::member::Member;

/// One member's line in a split snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitEntry {
    pub account: AccountId,
    pub amount_paid: i64,
    pub fair_share: i128,
    /// `amount_paid - fair_share`: positive = creditor, negative = debtor.
    pub delta: i128,
    /// `delta` net of value already moved through settle-up.
    pub outstanding: i128,
}

/// Derived view of who owes what for the current contributions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSnapshot {
    pub total_paid: i128,
    pub member_count: usize,
    /// `floor(total_paid / member_count)`.
    pub base_share: i128,
    /// `total_paid mod member_count`, carried by the first member.
    pub remainder: i128,
    /// Registration order.
    pub entries: Vec<SplitEntry>,
}

impl SplitSnapshot {
    pub fn entry(&self, account: &AccountId) -> Option<&SplitEntry> {
        self.entries.iter().find(|e| e.account == *account)
    }

    pub fn delta_of(&self, account: &AccountId) -> Option<i128> {
        self.entry(account).map(|e| e.delta)
    }

    pub fn delta_sum(&self) -> i128 {
        self.entries.iter().map(|e| e.delta).sum()
    }

    /// Entries still owed money, in registration order.
    pub fn creditors(&self) -> impl Iterator<Item = &SplitEntry> + '_ {
        self.entries.iter().filter(|e| e.outstanding > 0)
    }

    /// Entries still owing money, in registration order.
    pub fn debtors(&self) -> impl Iterator<Item = &SplitEntry> + '_ {
        self.entries.iter().filter(|e| e.outstanding < 0)
    }
}

/// Compute the split for members given in registration order.
///
/// The division remainder goes to the first member so that deltas sum to
/// exactly zero.
pub fn compute<'a>(members: impl IntoIterator<Item = &'a Member>) -> SplitSnapshot {
    let members: Vec<&Member> = members.into_iter().collect();
    let member_count = members.len();
    let total_paid: i128 = members.iter().map(|m| m.amount_paid as i128).sum();

    if member_count == 0 {
        return SplitSnapshot {
            total_paid,
            member_count,
            base_share: 0,
            remainder: 0,
            entries: Vec::new(),
        };
    }

    let count = member_count as i128;
    let base_share = total_paid.div_euclid(count);
    let remainder = total_paid.rem_euclid(count);

    let entries = members
        .iter()
        .enumerate()
        .map(|(idx, m)| {
            let fair_share = if idx == 0 { base_share + remainder } else { base_share };
            let delta = m.amount_paid as i128 - fair_share;
            SplitEntry {
                account: m.account,
                amount_paid: m.amount_paid,
                fair_share,
                delta,
                outstanding: delta + m.settled as i128,
            }
        })
        .collect();

    SplitSnapshot {
        total_paid,
        member_count,
        base_share,
        remainder,
        entries,
    }
}
