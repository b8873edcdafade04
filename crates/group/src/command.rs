use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use splitledger_core::{AccountId, GroupId};

/// Command: CreateGroup. The admin becomes the first member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGroup {
    pub group_id: GroupId,
    pub admin: AccountId,
    pub admin_name: String,
    pub max_members: usize,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddToGroup (admin only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToGroup {
    pub group_id: GroupId,
    pub caller: AccountId,
    pub member: AccountId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveFromGroup (admin only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveFromGroup {
    pub group_id: GroupId,
    pub caller: AccountId,
    pub member: AccountId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ChangeAdmin (admin only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeAdmin {
    pub group_id: GroupId,
    pub caller: AccountId,
    pub new_admin: AccountId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AgreeToSplit (member only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreeToSplit {
    pub group_id: GroupId,
    pub caller: AccountId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddToPaid (member only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToPaid {
    pub group_id: GroupId,
    pub caller: AccountId,
    /// Positive amount in smallest unit.
    pub amount: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: PutMoneyInContract (member only, moves value in).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutMoneyInContract {
    pub group_id: GroupId,
    pub caller: AccountId,
    /// Value the caller is depositing with this call.
    pub value: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SendAllMoneyBack (admin only, requires quorum).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendAllMoneyBack {
    pub group_id: GroupId,
    pub caller: AccountId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SettleUp (admin only, requires quorum).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleUp {
    pub group_id: GroupId,
    pub caller: AccountId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: WithdrawFunds (refund holder, moves value out).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawFunds {
    pub group_id: GroupId,
    pub caller: AccountId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupCommand {
    CreateGroup(CreateGroup),
    AddToGroup(AddToGroup),
    RemoveFromGroup(RemoveFromGroup),
    ChangeAdmin(ChangeAdmin),
    AgreeToSplit(AgreeToSplit),
    AddToPaid(AddToPaid),
    PutMoneyInContract(PutMoneyInContract),
    SendAllMoneyBack(SendAllMoneyBack),
    SettleUp(SettleUp),
    WithdrawFunds(WithdrawFunds),
}

impl GroupCommand {
    /// Identity on whose behalf the command runs.
    pub fn caller(&self) -> AccountId {
        match self {
            GroupCommand::CreateGroup(c) => c.admin,
            GroupCommand::AddToGroup(c) => c.caller,
            GroupCommand::RemoveFromGroup(c) => c.caller,
            GroupCommand::ChangeAdmin(c) => c.caller,
            GroupCommand::AgreeToSplit(c) => c.caller,
            GroupCommand::AddToPaid(c) => c.caller,
            GroupCommand::PutMoneyInContract(c) => c.caller,
            GroupCommand::SendAllMoneyBack(c) => c.caller,
            GroupCommand::SettleUp(c) => c.caller,
            GroupCommand::WithdrawFunds(c) => c.caller,
        }
    }

    pub fn group_id(&self) -> GroupId {
        match self {
            GroupCommand::CreateGroup(c) => c.group_id,
            GroupCommand::AddToGroup(c) => c.group_id,
            GroupCommand::RemoveFromGroup(c) => c.group_id,
            GroupCommand::ChangeAdmin(c) => c.group_id,
            GroupCommand::AgreeToSplit(c) => c.group_id,
            GroupCommand::AddToPaid(c) => c.group_id,
            GroupCommand::PutMoneyInContract(c) => c.group_id,
            GroupCommand::SendAllMoneyBack(c) => c.group_id,
            GroupCommand::SettleUp(c) => c.group_id,
            GroupCommand::WithdrawFunds(c) => c.group_id,
        }
    }

    /// Stable operation name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            GroupCommand::CreateGroup(_) => "create_group",
            GroupCommand::AddToGroup(_) => "add_to_group",
            GroupCommand::RemoveFromGroup(_) => "remove_from_group",
            GroupCommand::ChangeAdmin(_) => "change_admin",
            GroupCommand::AgreeToSplit(_) => "agree_to_split",
            GroupCommand::AddToPaid(_) => "add_to_paid",
            GroupCommand::PutMoneyInContract(_) => "put_money_in_contract",
            GroupCommand::SendAllMoneyBack(_) => "send_all_money_back",
            GroupCommand::SettleUp(_) => "settle_up",
            GroupCommand::WithdrawFunds(_) => "withdraw_funds",
        }
    }

    /// Whether accepting the command requires value to cross the custody
    /// boundary through the transfer substrate.
    pub fn moves_value(&self) -> bool {
        matches!(
            self,
            GroupCommand::PutMoneyInContract(_) | GroupCommand::WithdrawFunds(_)
        )
    }
}
