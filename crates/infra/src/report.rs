//! Serializable split report ("who paid, who owes, who is owed").

use serde::{Deserialize, Serialize};

use splitledger_core::{AccountId, AggregateRoot, GroupId};
use splitledger_group::Group;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRow {
    pub account: AccountId,
    /// `None` for former members still holding a pending refund.
    pub name: Option<String>,
    pub member: bool,
    pub amount_paid: i64,
    pub fair_share: i128,
    pub delta: i128,
    pub outstanding: i128,
    pub custody_balance: i64,
    pub pending_refund: i64,
    pub confirmed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitReport {
    pub group_id: GroupId,
    pub version: u64,
    pub admin: Option<AccountId>,
    pub total_paid: i128,
    pub base_share: i128,
    pub remainder: i128,
    pub total_custody: i128,
    pub total_pending_refunds: i128,
    pub quorum_met: bool,
    /// Members in registration order, then former members with refunds.
    pub rows: Vec<SplitRow>,
}

impl SplitReport {
    pub fn from_group(group: &Group) -> Self {
        let split = group.split();

        let mut rows: Vec<SplitRow> = group
            .member_records()
            .map(|m| {
                let entry = split.entry(&m.account());
                SplitRow {
                    account: m.account(),
                    name: Some(m.name().to_string()),
                    member: true,
                    amount_paid: m.amount_paid(),
                    fair_share: entry.map(|e| e.fair_share).unwrap_or(0),
                    delta: entry.map(|e| e.delta).unwrap_or(0),
                    outstanding: entry.map(|e| e.outstanding).unwrap_or(0),
                    custody_balance: m.custody_balance(),
                    pending_refund: group.pending_refund(&m.account()),
                    confirmed: m.confirmed_split(),
                }
            })
            .collect();

        rows.extend(
            group
                .pending_refunds()
                .filter(|(account, _)| !group.is_member(account))
                .map(|(account, pending_refund)| SplitRow {
                    account,
                    name: None,
                    member: false,
                    amount_paid: 0,
                    fair_share: 0,
                    delta: 0,
                    outstanding: 0,
                    custody_balance: 0,
                    pending_refund,
                    confirmed: false,
                }),
        );

        Self {
            group_id: group.id_typed(),
            version: group.version(),
            admin: group.admin(),
            total_paid: split.total_paid,
            base_share: split.base_share,
            remainder: split.remainder,
            total_custody: group.total_custody(),
            total_pending_refunds: group.total_pending_refunds(),
            quorum_met: group.quorum_met(),
            rows,
        }
    }

    pub fn row(&self, account: &AccountId) -> Option<&SplitRow> {
        self.rows.iter().find(|r| r.account == *account)
    }

    /// Emit one structured record per row.
    pub fn log(&self) {
        for row in &self.rows {
            tracing::info!(
                group_id = %self.group_id,
                account = %row.account,
                name = row.name.as_deref().unwrap_or("-"),
                member = row.member,
                amount_paid = row.amount_paid,
                fair_share = %row.fair_share,
                delta = %row.delta,
                outstanding = %row.outstanding,
                custody_balance = row.custody_balance,
                pending_refund = row.pending_refund,
                confirmed = row.confirmed,
                "split"
            );
        }
    }
}
