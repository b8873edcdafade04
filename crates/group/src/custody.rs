//! Fund custody: debtors deposit up to what they still owe.

use crate::command::PutMoneyInContract;
use crate::error::LedgerError;
use crate::event::{DepositRecorded, GroupEvent};
use crate::group::Group;

impl Group {
    /// Decide a deposit. The value itself is pulled by the caller of the
    /// aggregate; the event is only applied once that succeeded.
    pub(crate) fn handle_deposit(
        &self,
        cmd: &PutMoneyInContract,
    ) -> Result<Vec<GroupEvent>, LedgerError> {
        self.ensure_created()?;
        let member = self.ensure_member(cmd.caller)?;

        if cmd.value <= 0 {
            return Err(LedgerError::InvalidAmount(cmd.value));
        }

        let outstanding = self
            .split()
            .entry(&cmd.caller)
            .map(|e| e.outstanding)
            .unwrap_or(0);
        if outstanding >= 0 {
            return Err(LedgerError::NoDebtOwed(cmd.caller));
        }

        let owed = -outstanding;
        let held = member.custody_balance() as i128;
        if held + cmd.value as i128 > owed {
            return Err(LedgerError::ExcessDeposit {
                attempted: cmd.value,
                remaining: (owed - held).max(0),
            });
        }

        let custody_balance = member
            .custody_balance()
            .checked_add(cmd.value)
            .ok_or(LedgerError::Overflow)?;

        Ok(vec![GroupEvent::DepositRecorded(DepositRecorded {
            group_id: cmd.group_id,
            member: cmd.caller,
            amount: cmd.value,
            custody_balance,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use crate::error::LedgerError;
    use crate::testing::{Fixture, account};

    #[test]
    fn debtors_can_deposit_exactly_their_debt() {
        let mut fx = Fixture::with_scenario_contributions();
        fx.confirm_all();

        fx.run(fx.deposit(fx.chris, 2)).unwrap();
        fx.run(fx.deposit(fx.ted, 12)).unwrap();

        assert_eq!(fx.group.balance(&fx.chris), 2);
        assert_eq!(fx.group.balance(&fx.richard), 0);
        assert_eq!(fx.group.balance(&fx.ted), 12);
        assert_eq!(fx.group.balance(&fx.max), 0);
    }

    #[test]
    fn deposits_do_not_need_quorum() {
        let mut fx = Fixture::with_scenario_contributions();
        assert!(!fx.group.quorum_met());
        fx.run(fx.deposit(fx.max, 5)).unwrap();
        assert_eq!(fx.group.balance(&fx.max), 5);
    }

    #[test]
    fn partial_deposits_accumulate_up_to_the_cap() {
        let mut fx = Fixture::with_scenario_contributions();
        fx.run(fx.deposit(fx.ted, 5)).unwrap();
        fx.run(fx.deposit(fx.ted, 7)).unwrap();
        assert_eq!(fx.group.balance(&fx.ted), 12);

        let err = fx.run(fx.deposit(fx.ted, 1)).unwrap_err();
        assert_eq!(err, LedgerError::ExcessDeposit { attempted: 1, remaining: 0 });
    }

    #[test]
    fn overpaying_debt_is_rejected_without_state_change() {
        let mut fx = Fixture::with_scenario_contributions();
        let before = fx.group.clone();

        let err = fx.run(fx.deposit(fx.ted, 15)).unwrap_err();

        assert_eq!(err, LedgerError::ExcessDeposit { attempted: 15, remaining: 12 });
        assert_eq!(fx.group, before);
    }

    #[test]
    fn creditors_cannot_deposit() {
        let mut fx = Fixture::with_scenario_contributions();
        let err = fx.run(fx.deposit(fx.jim, 1)).unwrap_err();
        assert_eq!(err, LedgerError::NoDebtOwed(fx.jim));
    }

    #[test]
    fn balanced_member_cannot_deposit() {
        let mut fx = Fixture::with_five_members();
        let err = fx.run(fx.deposit(fx.richard, 1)).unwrap_err();
        assert_eq!(err, LedgerError::NoDebtOwed(fx.richard));
    }

    #[test]
    fn zero_deposit_is_invalid() {
        let mut fx = Fixture::with_scenario_contributions();
        let err = fx.run(fx.deposit(fx.ted, 0)).unwrap_err();
        assert_eq!(err, LedgerError::InvalidAmount(0));
    }

    #[test]
    fn outsiders_cannot_deposit() {
        let mut fx = Fixture::with_scenario_contributions();
        let stranger = account(50);
        let err = fx.run(fx.deposit(stranger, 1)).unwrap_err();
        assert_eq!(err, LedgerError::NotAMember(stranger));
    }
}
