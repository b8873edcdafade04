use std::collections::BTreeMap;

use splitledger_core::{AccountId, Aggregate, AggregateRoot, GroupId};

use crate::command::GroupCommand;
use crate::error::LedgerError;
use crate::event::GroupEvent;
use crate::member::Member;
use crate::split::{self, SplitSnapshot};

/// Aggregate root: one expense-sharing group.
///
/// Owns the ordered member list, each member's record, the admin identity and
/// the pending-refund table. All state changes go through `apply`, all
/// decisions through `handle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    id: GroupId,
    admin: Option<AccountId>,
    max_members: usize,
    /// Dense, registration-ordered list; removal shifts later members down.
    members: Vec<AccountId>,
    records: BTreeMap<AccountId, Member>,
    /// Keyed by identity so former members keep their credit.
    pending_refunds: BTreeMap<AccountId, i64>,
    version: u64,
    created: bool,
}

impl Group {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: GroupId) -> Self {
        Self {
            id,
            admin: None,
            max_members: 0,
            members: Vec::new(),
            records: BTreeMap::new(),
            pending_refunds: BTreeMap::new(),
            version: 0,
            created: false,
        }
    }

    /// Rebuild a group by replaying its event history in order.
    pub fn rehydrate<'a>(id: GroupId, history: impl IntoIterator<Item = &'a GroupEvent>) -> Self {
        let mut group = Self::empty(id);
        for event in history {
            group.apply(event);
        }
        group
    }

    /// Decide and apply a command in one step.
    ///
    /// Nothing is applied unless the whole decision succeeds.
    pub fn execute(&mut self, command: &GroupCommand) -> Result<Vec<GroupEvent>, LedgerError> {
        let events = self.handle(command)?;
        for event in &events {
            self.apply(event);
        }
        Ok(events)
    }

    pub fn id_typed(&self) -> GroupId {
        self.id
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn admin(&self) -> Option<AccountId> {
        self.admin
    }

    pub fn max_members(&self) -> usize {
        self.max_members
    }

    /// Ordered member identities (index 0 is the earliest registration).
    pub fn members(&self) -> &[AccountId] {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Identity at a position in the member list.
    pub fn member_address(&self, index: usize) -> Option<AccountId> {
        self.members.get(index).copied()
    }

    pub fn member(&self, account: &AccountId) -> Option<&Member> {
        self.records.get(account)
    }

    /// Member records in registration order.
    pub fn member_records(&self) -> impl Iterator<Item = &Member> + '_ {
        self.members.iter().filter_map(|a| self.records.get(a))
    }

    pub fn is_member(&self, account: &AccountId) -> bool {
        self.records.contains_key(account)
    }

    /// Custody balance of `account` (0 for unknown identities).
    pub fn balance(&self, account: &AccountId) -> i64 {
        self.records.get(account).map(|m| m.custody_balance).unwrap_or(0)
    }

    /// Credited-but-not-withdrawn refund of `account`, member or not.
    pub fn pending_refund(&self, account: &AccountId) -> i64 {
        self.pending_refunds.get(account).copied().unwrap_or(0)
    }

    /// Every non-zero pending refund, members and former members alike.
    pub fn pending_refunds(&self) -> impl Iterator<Item = (AccountId, i64)> + '_ {
        self.pending_refunds
            .iter()
            .filter(|(_, v)| **v > 0)
            .map(|(a, v)| (*a, *v))
    }

    pub fn total_custody(&self) -> i128 {
        self.records.values().map(|m| m.custody_balance as i128).sum()
    }

    pub fn total_pending_refunds(&self) -> i128 {
        self.pending_refunds.values().map(|v| *v as i128).sum()
    }

    /// Current split snapshot (derived, never stored).
    pub fn split(&self) -> SplitSnapshot {
        split::compute(self.member_records())
    }

    /// Members who have not agreed to the current split.
    pub fn unconfirmed(&self) -> Vec<AccountId> {
        self.member_records()
            .filter(|m| !m.confirmed_split)
            .map(|m| m.account)
            .collect()
    }

    /// Every current member has agreed to the current split.
    ///
    /// An empty group never has quorum.
    pub fn quorum_met(&self) -> bool {
        !self.members.is_empty() && self.records.values().all(|m| m.confirmed_split)
    }

    pub(crate) fn ensure_created(&self) -> Result<(), LedgerError> {
        if !self.created {
            return Err(LedgerError::NotInitialized);
        }
        Ok(())
    }

    pub(crate) fn ensure_group_id(&self, group_id: GroupId) -> Result<(), LedgerError> {
        if self.created && self.id != group_id {
            return Err(LedgerError::WrongGroup {
                expected: self.id,
                actual: group_id,
            });
        }
        Ok(())
    }

    pub(crate) fn ensure_admin(&self, caller: AccountId) -> Result<(), LedgerError> {
        if self.admin != Some(caller) {
            return Err(LedgerError::Unauthorized { caller });
        }
        Ok(())
    }

    pub(crate) fn ensure_member(&self, caller: AccountId) -> Result<&Member, LedgerError> {
        self.records
            .get(&caller)
            .ok_or(LedgerError::NotAMember(caller))
    }

    pub(crate) fn ensure_quorum(&self) -> Result<(), LedgerError> {
        if !self.quorum_met() {
            return Err(LedgerError::QuorumNotMet {
                unconfirmed: self.unconfirmed().len(),
            });
        }
        Ok(())
    }

    fn reset_confirmations(&mut self) {
        for member in self.records.values_mut() {
            member.confirmed_split = false;
        }
    }

    fn credit_refund(&mut self, account: AccountId, amount: i64) {
        if amount <= 0 {
            return;
        }
        // Overflow is rejected in `handle`.
        *self.pending_refunds.entry(account).or_insert(0) += amount;
    }
}

impl AggregateRoot for Group {
    type Id = GroupId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for Group {
    type Command = GroupCommand;
    type Event = GroupEvent;
    type Error = LedgerError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            GroupEvent::GroupCreated(e) => {
                self.id = e.group_id;
                self.admin = Some(e.admin);
                self.max_members = e.max_members;
                self.members = vec![e.admin];
                self.records.clear();
                self.records
                    .insert(e.admin, Member::new(e.admin, e.admin_name.clone()));
                self.created = true;
            }
            GroupEvent::MemberAdded(e) => {
                self.members.push(e.member);
                self.records
                    .insert(e.member, Member::new(e.member, e.name.clone()));
            }
            GroupEvent::MemberRemoved(e) => {
                self.members.retain(|a| *a != e.member);
                self.records.remove(&e.member);
                if let Some(carry) = &e.carried_settled {
                    if let Some(heir) = self.records.get_mut(&carry.account) {
                        heir.settled += carry.amount;
                    }
                }
                self.credit_refund(e.member, e.released_custody);
                self.reset_confirmations();
            }
            GroupEvent::AdminChanged(e) => {
                self.admin = Some(e.admin);
            }
            GroupEvent::SplitAgreed(e) => {
                if let Some(m) = self.records.get_mut(&e.member) {
                    m.confirmed_split = true;
                }
            }
            GroupEvent::PaidAdded(e) => {
                if let Some(m) = self.records.get_mut(&e.member) {
                    m.amount_paid = e.amount_paid;
                }
                self.reset_confirmations();
            }
            GroupEvent::DepositRecorded(e) => {
                if let Some(m) = self.records.get_mut(&e.member) {
                    m.custody_balance = e.custody_balance;
                }
            }
            GroupEvent::CustodyReturned(e) => {
                for refund in &e.refunds {
                    if let Some(m) = self.records.get_mut(&refund.account) {
                        m.custody_balance -= refund.amount;
                    }
                    self.credit_refund(refund.account, refund.amount);
                }
            }
            GroupEvent::SettlementCredited(e) => {
                for debit in &e.consumed {
                    if let Some(m) = self.records.get_mut(&debit.account) {
                        m.custody_balance -= debit.amount;
                        m.settled += debit.amount;
                    }
                }
                for credit in &e.credited {
                    if let Some(m) = self.records.get_mut(&credit.account) {
                        m.settled -= credit.amount;
                    }
                    self.credit_refund(credit.account, credit.amount);
                }
            }
            GroupEvent::RefundWithdrawn(e) => {
                self.pending_refunds.remove(&e.account);
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        self.ensure_group_id(command.group_id())?;

        match command {
            GroupCommand::CreateGroup(cmd) => self.handle_create(cmd),
            GroupCommand::AddToGroup(cmd) => self.handle_add_member(cmd),
            GroupCommand::RemoveFromGroup(cmd) => self.handle_remove_member(cmd),
            GroupCommand::ChangeAdmin(cmd) => self.handle_change_admin(cmd),
            GroupCommand::AgreeToSplit(cmd) => self.handle_agree(cmd),
            GroupCommand::AddToPaid(cmd) => self.handle_add_to_paid(cmd),
            GroupCommand::PutMoneyInContract(cmd) => self.handle_deposit(cmd),
            GroupCommand::SendAllMoneyBack(cmd) => self.handle_send_all_back(cmd),
            GroupCommand::SettleUp(cmd) => self.handle_settle_up(cmd),
            GroupCommand::WithdrawFunds(cmd) => self.handle_withdraw(cmd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    #[test]
    fn version_increments_on_apply() {
        let fx = Fixture::with_five_members();
        // created + four additions
        assert_eq!(fx.group.version(), 5);
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let fx = Fixture::with_five_members();
        let before = fx.group.clone();

        let first = fx.group.handle(&fx.add_to_paid(fx.jim, 35)).unwrap();
        let second = fx.group.handle(&fx.add_to_paid(fx.jim, 35)).unwrap();

        assert_eq!(fx.group, before);
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn rehydrate_reproduces_live_state() {
        let mut fx = Fixture::with_scenario_contributions();
        fx.confirm_all();
        fx.run(fx.deposit(fx.chris, 2)).unwrap();

        let replayed = Group::rehydrate(fx.group.id_typed(), fx.history.iter());
        assert_eq!(replayed, fx.group);
    }

    #[test]
    fn commands_for_another_group_are_rejected() {
        let fx = Fixture::with_five_members();
        let mut cmd = fx.agree(fx.chris);
        if let GroupCommand::AgreeToSplit(c) = &mut cmd {
            c.group_id = GroupId::new();
        }

        let err = fx.group.handle(&cmd).unwrap_err();
        assert!(matches!(err, LedgerError::WrongGroup { .. }));
    }

    #[test]
    fn operations_before_creation_fail() {
        let fx = Fixture::with_five_members();
        let fresh = Group::empty(fx.group.id_typed());

        let err = fresh.handle(&fx.agree(fx.chris)).unwrap_err();
        assert_eq!(err, LedgerError::NotInitialized);
    }

    #[test]
    fn empty_group_never_has_quorum() {
        let mut fx = Fixture::new();
        fx.run(fx.remove(fx.chris, fx.chris)).unwrap();

        assert_eq!(fx.group.member_count(), 0);
        assert!(!fx.group.quorum_met());
    }
}
