//! Shared test fixtures: a group of Chris (admin), Richard, Jim, Ted and Max.

use chrono::Utc;
use uuid::Uuid;

use splitledger_core::{AccountId, GroupId};

use crate::command::*;
use crate::error::LedgerError;
use crate::event::GroupEvent;
use crate::group::Group;

pub(crate) fn account(n: u128) -> AccountId {
    AccountId::from_uuid(Uuid::from_u128(n))
}

pub(crate) struct Fixture {
    pub group: Group,
    pub history: Vec<GroupEvent>,
    pub group_id: GroupId,
    pub capacity: usize,
    pub chris: AccountId,
    pub richard: AccountId,
    pub jim: AccountId,
    pub ted: AccountId,
    pub max: AccountId,
}

impl Fixture {
    /// Created group holding only the admin.
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let group_id = GroupId::from_uuid(Uuid::from_u128(1000));
        let mut fx = Self {
            group: Group::empty(group_id),
            history: Vec::new(),
            group_id,
            capacity,
            chris: account(1),
            richard: account(2),
            jim: account(3),
            ted: account(4),
            max: account(5),
        };
        fx.run(fx.create()).unwrap();
        fx
    }

    pub fn with_five_members() -> Self {
        let mut fx = Self::new();
        fx.run(fx.add(fx.chris, fx.richard, "Richard")).unwrap();
        fx.run(fx.add(fx.chris, fx.jim, "Jim")).unwrap();
        fx.run(fx.add(fx.chris, fx.ted, "Ted")).unwrap();
        fx.run(fx.add(fx.chris, fx.max, "Max")).unwrap();
        fx
    }

    /// Paid = {Chris 10, Richard 15, Jim 35, Ted 0, Max 0}; fair share 12.
    pub fn with_scenario_contributions() -> Self {
        let mut fx = Self::with_five_members();
        fx.run(fx.add_to_paid(fx.chris, 10)).unwrap();
        fx.run(fx.add_to_paid(fx.richard, 15)).unwrap();
        fx.run(fx.add_to_paid(fx.jim, 35)).unwrap();
        fx
    }

    /// Chris paid `i64::MAX`, Richard owes half of it. Richard has deposited
    /// and been refunded twice and holds a third deposit, so one more
    /// refund of that size no longer fits in an `i64`.
    pub fn with_near_max_refund() -> Self {
        let mut fx = Self::new();
        fx.run(fx.add(fx.chris, fx.richard, "Richard")).unwrap();
        fx.run(fx.add_to_paid(fx.chris, i64::MAX)).unwrap();
        fx.confirm_all();

        let owed = i64::MAX / 2;
        for _ in 0..2 {
            fx.run(fx.deposit(fx.richard, owed)).unwrap();
            fx.run(fx.send_all_back(fx.chris)).unwrap();
        }
        fx.run(fx.deposit(fx.richard, owed)).unwrap();
        fx
    }

    pub fn all(&self) -> Vec<AccountId> {
        self.group.members().to_vec()
    }

    pub fn confirm_all(&mut self) {
        for member in self.all() {
            self.run(self.agree(member)).unwrap();
        }
    }

    pub fn run(&mut self, command: GroupCommand) -> Result<Vec<GroupEvent>, LedgerError> {
        let events = self.group.execute(&command)?;
        self.history.extend(events.iter().cloned());
        Ok(events)
    }

    pub fn create(&self) -> GroupCommand {
        GroupCommand::CreateGroup(CreateGroup {
            group_id: self.group_id,
            admin: self.chris,
            admin_name: "Chris".to_string(),
            max_members: self.capacity,
            occurred_at: Utc::now(),
        })
    }

    pub fn add(&self, caller: AccountId, member: AccountId, name: &str) -> GroupCommand {
        GroupCommand::AddToGroup(AddToGroup {
            group_id: self.group_id,
            caller,
            member,
            name: name.to_string(),
            occurred_at: Utc::now(),
        })
    }

    pub fn remove(&self, caller: AccountId, member: AccountId) -> GroupCommand {
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

    pub fn agree(&self, caller: AccountId) -> GroupCommand {
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

    pub fn deposit(&self, caller: AccountId, value: i64) -> GroupCommand {
        GroupCommand::PutMoneyInContract(PutMoneyInContract {
            group_id: self.group_id,
            caller,
            value,
            occurred_at: Utc::now(),
        })
    }

    pub fn send_all_back(&self, caller: AccountId) -> GroupCommand {
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

    pub fn withdraw(&self, caller: AccountId) -> GroupCommand {
        GroupCommand::WithdrawFunds(WithdrawFunds {
            group_id: self.group_id,
            caller,
            occurred_at: Utc::now(),
        })
    }
}
