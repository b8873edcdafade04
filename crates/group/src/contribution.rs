//! Contribution ledger and confirmation quorum.
//!
//! A confirmation is a claim about one specific split snapshot. Any change to
//! a contribution changes the snapshot, so applying `PaidAdded` clears every
//! member's confirmation, the contributor's included.

use crate::command::{AddToPaid, AgreeToSplit};
use crate::error::LedgerError;
use crate::event::{GroupEvent, PaidAdded, SplitAgreed};
use crate::group::Group;

impl Group {
    pub(crate) fn handle_agree(&self, cmd: &AgreeToSplit) -> Result<Vec<GroupEvent>, LedgerError> {
        self.ensure_created()?;
        self.ensure_member(cmd.caller)?;

        Ok(vec![GroupEvent::SplitAgreed(SplitAgreed {
            group_id: cmd.group_id,
            member: cmd.caller,
            occurred_at: cmd.occurred_at,
        })])
    }

    pub(crate) fn handle_add_to_paid(
        &self,
        cmd: &AddToPaid,
    ) -> Result<Vec<GroupEvent>, LedgerError> {
        self.ensure_created()?;
        let member = self.ensure_member(cmd.caller)?;

        if cmd.amount <= 0 {
            return Err(LedgerError::InvalidAmount(cmd.amount));
        }

        let amount_paid = member
            .amount_paid()
            .checked_add(cmd.amount)
            .ok_or(LedgerError::Overflow)?;

        Ok(vec![GroupEvent::PaidAdded(PaidAdded {
            group_id: cmd.group_id,
            member: cmd.caller,
            amount: cmd.amount,
            amount_paid,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::error::LedgerError;
    use crate::testing::{Fixture, account};

    #[test]
    fn agree_to_split_sets_confirmation() {
        let mut fx = Fixture::new();
        fx.run(fx.agree(fx.chris)).unwrap();
        assert!(fx.group.member(&fx.chris).unwrap().confirmed_split());
    }

    #[test]
    fn agree_to_split_is_idempotent() {
        let mut fx = Fixture::new();
        fx.run(fx.agree(fx.chris)).unwrap();
        fx.run(fx.agree(fx.chris)).unwrap();
        assert!(fx.group.member(&fx.chris).unwrap().confirmed_split());
        assert!(fx.group.quorum_met());
    }

    #[test]
    fn outsiders_cannot_agree() {
        let mut fx = Fixture::new();
        let stranger = account(77);
        let err = fx.run(fx.agree(stranger)).unwrap_err();
        assert_eq!(err, LedgerError::NotAMember(stranger));
    }

    #[test]
    fn add_to_paid_accumulates_and_resets_confirmations() {
        let mut fx = Fixture::new();
        fx.run(fx.add(fx.chris, fx.richard, "Richard")).unwrap();
        fx.run(fx.agree(fx.chris)).unwrap();
        assert!(fx.group.member(&fx.chris).unwrap().confirmed_split());

        fx.run(fx.add_to_paid(fx.richard, 15)).unwrap();
        assert!(!fx.group.member(&fx.chris).unwrap().confirmed_split());
        assert_eq!(fx.group.member(&fx.richard).unwrap().amount_paid(), 15);

        fx.run(fx.add_to_paid(fx.richard, 20)).unwrap();
        assert_eq!(fx.group.member(&fx.richard).unwrap().amount_paid(), 35);
    }

    #[test]
    fn add_to_paid_resets_the_callers_own_confirmation() {
        let mut fx = Fixture::with_five_members();
        fx.confirm_all();
        assert!(fx.group.quorum_met());

        fx.run(fx.add_to_paid(fx.jim, 1)).unwrap();

        assert!(!fx.group.member(&fx.jim).unwrap().confirmed_split());
        assert_eq!(fx.group.unconfirmed().len(), 5);
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let mut fx = Fixture::new();
        fx.run(fx.agree(fx.chris)).unwrap();

        for amount in [0, -5] {
            let err = fx.run(fx.add_to_paid(fx.chris, amount)).unwrap_err();
            assert_eq!(err, LedgerError::InvalidAmount(amount));
        }
        // Rejected contributions leave the quorum untouched.
        assert!(fx.group.member(&fx.chris).unwrap().confirmed_split());
    }

    #[test]
    fn outsiders_cannot_add_to_paid() {
        let mut fx = Fixture::new();
        let stranger = account(77);
        let err = fx.run(fx.add_to_paid(stranger, 5)).unwrap_err();
        assert_eq!(err, LedgerError::NotAMember(stranger));
    }

    #[test]
    fn overflowing_contribution_is_rejected() {
        let mut fx = Fixture::new();
        fx.run(fx.add_to_paid(fx.chris, i64::MAX)).unwrap();
        let err = fx.run(fx.add_to_paid(fx.chris, 1)).unwrap_err();
        assert_eq!(err, LedgerError::Overflow);
        assert_eq!(fx.group.member(&fx.chris).unwrap().amount_paid(), i64::MAX);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: amount_paid never decreases, whatever mix of valid and
        /// invalid contributions is attempted.
        #[test]
        fn amount_paid_is_monotonic(
            attempts in prop::collection::vec((0usize..5, -50i64..500i64), 1..40)
        ) {
            let mut fx = Fixture::with_five_members();
            let members = fx.all();

            for (who, amount) in attempts {
                let caller = members[who];
                let before = fx.group.member(&caller).unwrap().amount_paid();
                let _ = fx.run(fx.add_to_paid(caller, amount));
                let after = fx.group.member(&caller).unwrap().amount_paid();
                prop_assert!(after >= before);
            }
        }
    }
}
