//! Reentrant access to a group while an outbound transfer is in flight.

use splitledger_core::Aggregate;
use splitledger_group::{Group, GroupCommand, GroupEvent, LedgerError};

use crate::commands::CommandBuilder;

/// Handle onto the working state of an in-flight withdrawal.
///
/// The withdrawing member's refund is already zero here. Commands run through
/// the handle are applied to the working state and committed (or discarded)
/// together with the withdrawal. Commands that would move value themselves are
/// refused with `TransferInProgress` after normal validation, so a same-caller
/// withdraw still reports `NothingToWithdraw`.
#[derive(Debug)]
pub struct Reentry<'a> {
    working: &'a mut Group,
    events: &'a mut Vec<GroupEvent>,
}

impl<'a> Reentry<'a> {
    pub(crate) fn new(working: &'a mut Group, events: &'a mut Vec<GroupEvent>) -> Self {
        Self { working, events }
    }

    /// Read-only view of the working state.
    pub fn group(&self) -> &Group {
        self.working
    }

    pub fn commands(&self) -> CommandBuilder {
        CommandBuilder::new(self.working.id_typed())
    }

    pub fn dispatch(&mut self, command: &GroupCommand) -> Result<Vec<GroupEvent>, LedgerError> {
        let decided = self.working.handle(command)?;
        if command.moves_value() {
            return Err(LedgerError::TransferInProgress);
        }

        for event in &decided {
            self.working.apply(event);
        }
        self.events.extend(decided.iter().cloned());

        tracing::debug!(
            op = command.name(),
            caller = %command.caller(),
            "reentrant command applied"
        );
        Ok(decided)
    }
}
