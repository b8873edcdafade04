//! Membership: creation, admission, removal and admin hand-over.

use crate::command::{AddToGroup, ChangeAdmin, CreateGroup, RemoveFromGroup};
use crate::error::LedgerError;
use crate::event::{AdminChanged, Credit, GroupCreated, GroupEvent, MemberAdded, MemberRemoved};
use crate::group::Group;

impl Group {
    pub(crate) fn handle_create(&self, cmd: &CreateGroup) -> Result<Vec<GroupEvent>, LedgerError> {
        if self.is_created() {
            return Err(LedgerError::AlreadyInitialized);
        }
        if cmd.admin_name.trim().is_empty() {
            return Err(LedgerError::InvalidName);
        }

        Ok(vec![GroupEvent::GroupCreated(GroupCreated {
            group_id: cmd.group_id,
            admin: cmd.admin,
            admin_name: cmd.admin_name.clone(),
            // A group always holds at least its admin.
            max_members: cmd.max_members.max(1),
            occurred_at: cmd.occurred_at,
        })])
    }

    pub(crate) fn handle_add_member(
        &self,
        cmd: &AddToGroup,
    ) -> Result<Vec<GroupEvent>, LedgerError> {
        self.ensure_created()?;
        self.ensure_admin(cmd.caller)?;

        if self.is_member(&cmd.member) {
            return Err(LedgerError::DuplicateMember(cmd.member));
        }
        if cmd.name.trim().is_empty() {
            return Err(LedgerError::InvalidName);
        }
        if self.member_count() >= self.max_members() {
            return Err(LedgerError::GroupFull {
                limit: self.max_members(),
            });
        }

        Ok(vec![GroupEvent::MemberAdded(MemberAdded {
            group_id: cmd.group_id,
            member: cmd.member,
            name: cmd.name.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    pub(crate) fn handle_remove_member(
        &self,
        cmd: &RemoveFromGroup,
    ) -> Result<Vec<GroupEvent>, LedgerError> {
        self.ensure_created()?;
        self.ensure_admin(cmd.caller)?;

        let record = self
            .member(&cmd.member)
            .ok_or(LedgerError::NotFound(cmd.member))?;

        self.pending_refund(&cmd.member)
            .checked_add(record.custody_balance())
            .ok_or(LedgerError::Overflow)?;

        // Same slot the split charges its rounding remainder to.
        let heir = self
            .member_records()
            .find(|m| m.account() != cmd.member);
        let carried_settled = match heir {
            Some(heir) if record.settled() != 0 => {
                heir.settled()
                    .checked_add(record.settled())
                    .ok_or(LedgerError::Overflow)?;
                Some(Credit {
                    account: heir.account(),
                    amount: record.settled(),
                })
            }
            _ => None,
        };

        Ok(vec![GroupEvent::MemberRemoved(MemberRemoved {
            group_id: cmd.group_id,
            member: cmd.member,
            forfeited_paid: record.amount_paid(),
            released_custody: record.custody_balance(),
            carried_settled,
            occurred_at: cmd.occurred_at,
        })])
    }

    pub(crate) fn handle_change_admin(
        &self,
        cmd: &ChangeAdmin,
    ) -> Result<Vec<GroupEvent>, LedgerError> {
        self.ensure_created()?;
        self.ensure_admin(cmd.caller)?;

        if !self.is_member(&cmd.new_admin) {
            return Err(LedgerError::NotFound(cmd.new_admin));
        }

        Ok(vec![GroupEvent::AdminChanged(AdminChanged {
            group_id: cmd.group_id,
            previous: cmd.caller,
            admin: cmd.new_admin,
            occurred_at: cmd.occurred_at,
        })])
    }
}
