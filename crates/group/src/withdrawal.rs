//! Withdrawal decisions. Applying `RefundWithdrawn` zeroes the pending refund;
//! the driver applies it before sending value out and discards it if the send
//! fails.

use crate::command::WithdrawFunds;
use crate::error::LedgerError;
use crate::event::{GroupEvent, RefundWithdrawn};
use crate::group::Group;

impl Group {
    pub(crate) fn handle_withdraw(
        &self,
        cmd: &WithdrawFunds,
    ) -> Result<Vec<GroupEvent>, LedgerError> {
        self.ensure_created()?;

        let amount = self.pending_refund(&cmd.caller);
        if amount <= 0 {
            return Err(LedgerError::NothingToWithdraw(cmd.caller));
        }

        Ok(vec![GroupEvent::RefundWithdrawn(RefundWithdrawn {
            group_id: cmd.group_id,
            account: cmd.caller,
            amount,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use crate::error::LedgerError;
    use crate::event::GroupEvent;
    use crate::testing::Fixture;

    fn settled_fixture() -> Fixture {
        let mut fx = Fixture::with_scenario_contributions();
        fx.confirm_all();
        fx.run(fx.deposit(fx.chris, 2)).unwrap();
        fx.run(fx.deposit(fx.ted, 12)).unwrap();
        fx.run(fx.deposit(fx.max, 12)).unwrap();
        fx.run(fx.settle_up(fx.chris)).unwrap();
        fx
    }

    #[test]
    fn withdraw_zeroes_pending_refund() {
        let mut fx = settled_fixture();

        let events = fx.run(fx.withdraw(fx.richard)).unwrap();
        match &events[0] {
            GroupEvent::RefundWithdrawn(e) => assert_eq!(e.amount, 3),
            other => panic!("expected RefundWithdrawn, got {other:?}"),
        }
        fx.run(fx.withdraw(fx.jim)).unwrap();

        assert_eq!(fx.group.pending_refund(&fx.richard), 0);
        assert_eq!(fx.group.pending_refund(&fx.jim), 0);
        assert_eq!(fx.group.total_pending_refunds(), 0);
    }

    #[test]
    fn second_withdraw_has_nothing_left() {
        let mut fx = settled_fixture();
        fx.run(fx.withdraw(fx.jim)).unwrap();

        let err = fx.run(fx.withdraw(fx.jim)).unwrap_err();
        assert_eq!(err, LedgerError::NothingToWithdraw(fx.jim));
    }

    #[test]
    fn debtors_have_nothing_to_withdraw_after_settlement() {
        let mut fx = settled_fixture();
        let err = fx.run(fx.withdraw(fx.ted)).unwrap_err();
        assert_eq!(err, LedgerError::NothingToWithdraw(fx.ted));
    }

    #[test]
    fn former_members_can_still_withdraw() {
        let mut fx = settled_fixture();
        fx.run(fx.remove(fx.chris, fx.jim)).unwrap();

        fx.run(fx.withdraw(fx.jim)).unwrap();
        assert_eq!(fx.group.pending_refund(&fx.jim), 0);
    }
}
