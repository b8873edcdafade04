use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use splitledger_core::{AccountId, GroupId};
use splitledger_events::Event;

/// A single movement of value attributed to one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    pub account: AccountId,
    pub amount: i64,
}

/// Event: GroupCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCreated {
    pub group_id: GroupId,
    pub admin: AccountId,
    pub admin_name: String,
    pub max_members: usize,
    pub occurred_at: DateTime<Utc>,
}

/// Event: MemberAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberAdded {
    pub group_id: GroupId,
    pub member: AccountId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: MemberRemoved.
///
/// `forfeited_paid` is the contribution claim dropped with the member;
/// `released_custody` moves into the former member's pending refund.
/// `carried_settled` hands the member's settle-up history (signed) to the
/// first remaining member so settled value still nets to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRemoved {
    pub group_id: GroupId,
    pub member: AccountId,
    pub forfeited_paid: i64,
    pub released_custody: i64,
    #[serde(default)]
    pub carried_settled: Option<Credit>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AdminChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminChanged {
    pub group_id: GroupId,
    pub previous: AccountId,
    pub admin: AccountId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SplitAgreed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitAgreed {
    pub group_id: GroupId,
    pub member: AccountId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PaidAdded. Applying it clears every confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidAdded {
    pub group_id: GroupId,
    pub member: AccountId,
    pub amount: i64,
    /// Member's cumulative `amount_paid` after this contribution.
    pub amount_paid: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DepositRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRecorded {
    pub group_id: GroupId,
    pub member: AccountId,
    pub amount: i64,
    /// Member's custody balance after the deposit.
    pub custody_balance: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CustodyReturned (bulk refund of every custody balance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyReturned {
    pub group_id: GroupId,
    pub refunds: Vec<Credit>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SettlementCredited.
///
/// `consumed` lists custody taken from each depositor, `credited` what each
/// creditor receives as a pending refund. Both sum to the same total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementCredited {
    pub group_id: GroupId,
    pub consumed: Vec<Credit>,
    pub credited: Vec<Credit>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: RefundWithdrawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundWithdrawn {
    pub group_id: GroupId,
    pub account: AccountId,
    pub amount: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupEvent {
    GroupCreated(GroupCreated),
    MemberAdded(MemberAdded),
    MemberRemoved(MemberRemoved),
    AdminChanged(AdminChanged),
    SplitAgreed(SplitAgreed),
    PaidAdded(PaidAdded),
    DepositRecorded(DepositRecorded),
    CustodyReturned(CustodyReturned),
    SettlementCredited(SettlementCredited),
    RefundWithdrawn(RefundWithdrawn),
}

impl Event for GroupEvent {
    fn event_type(&self) -> &'static str {
        match self {
            GroupEvent::GroupCreated(_) => "group.created",
            GroupEvent::MemberAdded(_) => "group.member_added",
            GroupEvent::MemberRemoved(_) => "group.member_removed",
            GroupEvent::AdminChanged(_) => "group.admin_changed",
            GroupEvent::SplitAgreed(_) => "group.split_agreed",
            GroupEvent::PaidAdded(_) => "group.paid_added",
            GroupEvent::DepositRecorded(_) => "group.deposit_recorded",
            GroupEvent::CustodyReturned(_) => "group.custody_returned",
            GroupEvent::SettlementCredited(_) => "group.settlement_credited",
            GroupEvent::RefundWithdrawn(_) => "group.refund_withdrawn",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            GroupEvent::GroupCreated(e) => e.occurred_at,
            GroupEvent::MemberAdded(e) => e.occurred_at,
            GroupEvent::MemberRemoved(e) => e.occurred_at,
            GroupEvent::AdminChanged(e) => e.occurred_at,
            GroupEvent::SplitAgreed(e) => e.occurred_at,
            GroupEvent::PaidAdded(e) => e.occurred_at,
            GroupEvent::DepositRecorded(e) => e.occurred_at,
            GroupEvent::CustodyReturned(e) => e.occurred_at,
            GroupEvent::SettlementCredited(e) => e.occurred_at,
            GroupEvent::RefundWithdrawn(e) => e.occurred_at,
        }
    }
}
