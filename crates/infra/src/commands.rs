//! Command construction for one group, stamped with the current time.

use chrono::Utc;

use splitledger_core::{AccountId, GroupId};
use splitledger_group::{
    AddToGroup, AddToPaid, AgreeToSplit, ChangeAdmin, CreateGroup, GroupCommand,
    PutMoneyInContract, RemoveFromGroup, SendAllMoneyBack, SettleUp, WithdrawFunds,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandBuilder {
    group_id: GroupId,
}

impl CommandBuilder {
    pub fn new(group_id: GroupId) -> Self {
        Self { group_id }
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn create_group(
        &self,
        admin: AccountId,
        admin_name: impl Into<String>,
        max_members: usize,
    ) -> GroupCommand {
        GroupCommand::CreateGroup(CreateGroup {
            group_id: self.group_id,
            admin,
            admin_name: admin_name.into(),
            max_members,
            occurred_at: Utc::now(),
        })
    }

    pub fn add_to_group(
        &self,
        caller: AccountId,
        member: AccountId,
        name: impl Into<String>,
    ) -> GroupCommand {
        GroupCommand::AddToGroup(AddToGroup {
            group_id: self.group_id,
            caller,
            member,
            name: name.into(),
            occurred_at: Utc::now(),
        })
    }

    pub fn remove_from_group(&self, caller: AccountId, member: AccountId) -> GroupCommand {
        GroupCommand::RemoveFromGroup(RemoveFromGroup {
            group_id: self.group_id,
            caller,
            member,
            occurred_at: Utc::now(),
        })
    }

    pub fn change_admin(&self, caller: AccountId, new_admin: AccountId) -> GroupCommand {
        GroupCommand::ChangeAdmin(ChangeAdmin {
            group_id: self.group_id,
            caller,
            new_admin,
            occurred_at: Utc::now(),
        })
    }

    pub fn agree_to_split(&self, caller: AccountId) -> GroupCommand {
        GroupCommand::AgreeToSplit(AgreeToSplit {
            group_id: self.group_id,
            caller,
            occurred_at: Utc::now(),
        })
    }

    pub fn add_to_paid(&self, caller: AccountId, amount: i64) -> GroupCommand {
        GroupCommand::AddToPaid(AddToPaid {
            group_id: self.group_id,
            caller,
            amount,
            occurred_at: Utc::now(),
        })
    }

    pub fn put_money_in_contract(&self, caller: AccountId, value: i64) -> GroupCommand {
        GroupCommand::PutMoneyInContract(PutMoneyInContract {
            group_id: self.group_id,
            caller,
            value,
            occurred_at: Utc::now(),
        })
    }

    pub fn send_all_money_back(&self, caller: AccountId) -> GroupCommand {
        GroupCommand::SendAllMoneyBack(SendAllMoneyBack {
            group_id: self.group_id,
            caller,
            occurred_at: Utc::now(),
        })
    }

    pub fn settle_up(&self, caller: AccountId) -> GroupCommand {
        GroupCommand::SettleUp(SettleUp {
            group_id: self.group_id,
            caller,
            occurred_at: Utc::now(),
        })
    }

    pub fn withdraw_funds(&self, caller: AccountId) -> GroupCommand {
        GroupCommand::WithdrawFunds(WithdrawFunds {
            group_id: self.group_id,
            caller,
            occurred_at: Utc::now(),
        })
    }
}
