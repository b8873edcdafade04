//! Group service: the execution pipeline around one group aggregate.
//!
//! ```text
//! operation
//!   ↓
//! 1. Group::handle (pure decision, produces events)
//!   ↓
//! 2. value transfer, if the operation moves value
//!   ↓
//! 3. journal append (optimistic version check)
//!   ↓
//! 4. apply to live state, publish enveloped events
//! ```
//!
//! Each operation is atomic: on any failure the live group, the journal and
//! custody are exactly as before the call.

use thiserror::Error;

use splitledger_core::{AccountId, Aggregate, AggregateRoot, ExpectedVersion, GroupId};
use splitledger_events::{EventBus, EventEnvelope};
use splitledger_group::{Group, GroupCommand, GroupEvent, LedgerError, Member, SplitSnapshot};

use crate::commands::CommandBuilder;
use crate::config::LedgerConfig;
use crate::journal::{InMemoryJournal, JournalError};
use crate::reentry::Reentry;
use crate::report::SplitReport;
use crate::transfer::ValueTransfer;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Journal(#[from] JournalError),
}

impl ServiceError {
    /// The domain failure, if this is one.
    pub fn ledger(&self) -> Option<&LedgerError> {
        match self {
            ServiceError::Ledger(e) => Some(e),
            ServiceError::Journal(_) => None,
        }
    }
}

pub struct GroupService<T, B> {
    group: Group,
    journal: InMemoryJournal<GroupEvent>,
    transfer: T,
    bus: B,
    commands: CommandBuilder,
}

impl<T, B> GroupService<T, B>
where
    T: ValueTransfer,
    B: EventBus<EventEnvelope<GroupEvent>>,
{
    /// Create a group with `admin` as its only member.
    pub fn create(
        config: &LedgerConfig,
        group_id: GroupId,
        admin: AccountId,
        admin_name: impl Into<String>,
        transfer: T,
        bus: B,
    ) -> Result<Self, ServiceError> {
        let commands = CommandBuilder::new(group_id);
        let mut service = Self {
            group: Group::empty(group_id),
            journal: InMemoryJournal::new(group_id),
            transfer,
            bus,
            commands,
        };
        service.run(commands.create_group(admin, admin_name, config.max_members.max(1)))?;
        Ok(service)
    }

    /// Rebuild a service from a previously exported journal.
    pub fn restore(
        journal: InMemoryJournal<GroupEvent>,
        transfer: T,
        bus: B,
    ) -> Result<Self, ServiceError> {
        journal.validate()?;
        let group_id = journal.group_id();
        let group = Group::rehydrate(group_id, journal.events());
        if !group.is_created() {
            return Err(LedgerError::NotInitialized.into());
        }

        tracing::info!(%group_id, version = group.version(), "group restored from journal");
        Ok(Self {
            group,
            journal,
            transfer,
            bus,
            commands: CommandBuilder::new(group_id),
        })
    }

    // ---- membership ----

    pub fn add_to_group(
        &mut self,
        caller: AccountId,
        member: AccountId,
        name: impl Into<String>,
    ) -> Result<(), ServiceError> {
        self.run(self.commands.add_to_group(caller, member, name))
            .map(drop)
    }

    pub fn remove_from_group(
        &mut self,
        caller: AccountId,
        member: AccountId,
    ) -> Result<(), ServiceError> {
        self.run(self.commands.remove_from_group(caller, member))
            .map(drop)
    }

    pub fn change_admin(
        &mut self,
        caller: AccountId,
        new_admin: AccountId,
    ) -> Result<(), ServiceError> {
        self.run(self.commands.change_admin(caller, new_admin))
            .map(drop)
    }

    // ---- contributions and quorum ----

    pub fn agree_to_split(&mut self, caller: AccountId) -> Result<(), ServiceError> {
        self.run(self.commands.agree_to_split(caller)).map(drop)
    }

    pub fn add_to_paid(&mut self, caller: AccountId, amount: i64) -> Result<(), ServiceError> {
        self.run(self.commands.add_to_paid(caller, amount)).map(drop)
    }

    // ---- custody, settlement, withdrawal ----

    /// Pull `value` from the caller's wallet into custody.
    ///
    /// The ledger records the deposit only once the substrate has accepted it.
    pub fn put_money_in_contract(
        &mut self,
        caller: AccountId,
        value: i64,
    ) -> Result<(), ServiceError> {
        let command = self.commands.put_money_in_contract(caller, value);
        let events = self.decide(&command)?;

        if let Err(err) = self.transfer.receive(caller, value) {
            tracing::error!(
                group_id = %self.group.id_typed(),
                op = command.name(),
                caller = %caller,
                error = %err,
                "inbound transfer failed"
            );
            return Err(LedgerError::transfer_failed(err.to_string()).into());
        }

        let mut working = self.group.clone();
        for event in &events {
            working.apply(event);
        }
        self.commit(&command, working, events)
    }

    pub fn send_all_money_back(&mut self, caller: AccountId) -> Result<(), ServiceError> {
        self.run(self.commands.send_all_money_back(caller))
            .map(drop)
    }

    pub fn settle_up(&mut self, caller: AccountId) -> Result<(), ServiceError> {
        self.run(self.commands.settle_up(caller)).map(drop)
    }

    /// Pay out the caller's pending refund; returns the amount sent.
    ///
    /// The refund is zeroed in a working copy before the send, and the send
    /// sees that copy through [`Reentry`]. A failed send discards the copy.
    pub fn withdraw_funds(&mut self, caller: AccountId) -> Result<i64, ServiceError> {
        let command = self.commands.withdraw_funds(caller);
        let decided = self.decide(&command)?;
        let amount: i64 = decided
            .iter()
            .map(|e| match e {
                GroupEvent::RefundWithdrawn(w) => w.amount,
                _ => 0,
            })
            .sum();

        let mut working = self.group.clone();
        for event in &decided {
            working.apply(event);
        }
        let mut batch = decided;

        let sent = {
            let mut reentry = Reentry::new(&mut working, &mut batch);
            self.transfer.send(caller, amount, &mut reentry)
        };

        if let Err(err) = sent {
            tracing::error!(
                group_id = %self.group.id_typed(),
                op = command.name(),
                caller = %caller,
                amount,
                error = %err,
                "outbound transfer failed; withdrawal rolled back"
            );
            return Err(LedgerError::transfer_failed(err.to_string()).into());
        }

        self.commit(&command, working, batch)?;
        Ok(amount)
    }

    // ---- reads ----

    pub fn group_id(&self) -> GroupId {
        self.group.id_typed()
    }

    pub fn group_admin(&self) -> Option<AccountId> {
        self.group.admin()
    }

    pub fn member_address(&self, index: usize) -> Option<AccountId> {
        self.group.member_address(index)
    }

    pub fn group_member(&self, account: &AccountId) -> Option<&Member> {
        self.group.member(account)
    }

    pub fn balance(&self, account: &AccountId) -> i64 {
        self.group.balance(account)
    }

    pub fn pending_refund(&self, account: &AccountId) -> i64 {
        self.group.pending_refund(account)
    }

    pub fn split(&self) -> SplitSnapshot {
        self.group.split()
    }

    pub fn report(&self) -> SplitReport {
        SplitReport::from_group(&self.group)
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn journal(&self) -> &InMemoryJournal<GroupEvent> {
        &self.journal
    }

    pub fn transfer(&self) -> &T {
        &self.transfer
    }

    pub fn transfer_mut(&mut self) -> &mut T {
        &mut self.transfer
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    // ---- pipeline ----

    fn decide(&self, command: &GroupCommand) -> Result<Vec<GroupEvent>, ServiceError> {
        self.group.handle(command).map_err(|err| {
            tracing::warn!(
                group_id = %self.group.id_typed(),
                op = command.name(),
                caller = %command.caller(),
                kind = ?err.kind(),
                error = %err,
                "command rejected"
            );
            ServiceError::from(err)
        })
    }

    fn run(&mut self, command: GroupCommand) -> Result<Vec<GroupEvent>, ServiceError> {
        let events = self.decide(&command)?;
        let mut working = self.group.clone();
        for event in &events {
            working.apply(event);
        }
        self.commit(&command, working, events.clone())?;
        Ok(events)
    }

    /// Journal the batch, swap in the working state, then publish.
    fn commit(
        &mut self,
        command: &GroupCommand,
        working: Group,
        events: Vec<GroupEvent>,
    ) -> Result<(), ServiceError> {
        let count = events.len();
        let committed = self
            .journal
            .append(events, ExpectedVersion::Exact(self.group.version()))?;
        self.group = working;

        tracing::info!(
            group_id = %self.group.id_typed(),
            op = command.name(),
            caller = %command.caller(),
            events = count,
            version = self.group.version(),
            "command applied"
        );

        for envelope in committed {
            let sequence = envelope.sequence_number();
            if let Err(err) = self.bus.publish(envelope) {
                // At-least-once distribution; the journal already holds the event.
                tracing::warn!(
                    group_id = %self.group.id_typed(),
                    sequence,
                    error = ?err,
                    "event publish failed"
                );
            }
        }

        Ok(())
    }
}
