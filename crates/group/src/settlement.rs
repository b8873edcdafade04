//! Settlement engine: credits pending refunds, never moves value itself.
//!
//! Both terminal operations only write custody balances and the pending-refund
//! table. Paying out happens one member at a time through withdrawal, so one
//! recipient that cannot receive never blocks the others.

use splitledger_core::AccountId;

use crate::command::{SendAllMoneyBack, SettleUp};
use crate::error::LedgerError;
use crate::event::{Credit, CustodyReturned, GroupEvent, SettlementCredited};
use crate::group::Group;

/// Result of distributing a custody pool over creditors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    /// Custody taken from each holder, registration order.
    pub consumed: Vec<Credit>,
    /// Amount credited to each creditor, registration order.
    pub credited: Vec<Credit>,
}

impl Allocation {
    pub fn total_consumed(&self) -> i128 {
        self.consumed.iter().map(|c| c.amount as i128).sum()
    }

    pub fn total_credited(&self) -> i128 {
        self.credited.iter().map(|c| c.amount as i128).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty() && self.credited.is_empty()
    }
}

/// Distribute custody to creditors in proportion to what they are owed.
///
/// `custody` and `creditors` are in registration order; creditor amounts must be
/// positive. At most `min(Σ custody, Σ owed)` is consumed. Each creditor gets
/// `floor(consumed * owed_i / Σ owed)`; the rounding residual goes to the
/// largest creditors first (earliest registration on ties), each capped at
/// what it is owed.
pub fn allocate(
    custody: &[(AccountId, i64)],
    creditors: &[(AccountId, i128)],
) -> Result<Allocation, LedgerError> {
    let pool: i128 = custody.iter().map(|(_, v)| (*v).max(0) as i128).sum();
    let demand: i128 = creditors.iter().map(|(_, owed)| (*owed).max(0)).sum();
    let total = pool.min(demand);

    if total <= 0 {
        return Ok(Allocation::default());
    }

    let mut shares: Vec<i128> = Vec::with_capacity(creditors.len());
    for (_, owed) in creditors {
        let owed = (*owed).max(0);
        let share = total
            .checked_mul(owed)
            .ok_or(LedgerError::Overflow)?
            / demand;
        shares.push(share.min(owed));
    }

    let mut residual = total - shares.iter().sum::<i128>();
    if residual > 0 {
        let mut order: Vec<usize> = (0..creditors.len()).collect();
        order.sort_by(|a, b| creditors[*b].1.cmp(&creditors[*a].1).then(a.cmp(b)));
        for idx in order {
            if residual == 0 {
                break;
            }
            let headroom = creditors[idx].1.max(0) - shares[idx];
            let extra = headroom.min(residual);
            shares[idx] += extra;
            residual -= extra;
        }
    }

    let credited = creditors
        .iter()
        .zip(shares)
        .filter(|(_, share)| *share > 0)
        .map(|((account, _), share)| {
            Ok(Credit {
                account: *account,
                amount: i64::try_from(share).map_err(|_| LedgerError::Overflow)?,
            })
        })
        .collect::<Result<Vec<_>, LedgerError>>()?;

    let mut remaining = total;
    let mut consumed = Vec::new();
    for (account, held) in custody {
        if remaining == 0 {
            break;
        }
        let take = (*held as i128).max(0).min(remaining);
        if take > 0 {
            consumed.push(Credit {
                account: *account,
                amount: i64::try_from(take).map_err(|_| LedgerError::Overflow)?,
            });
            remaining -= take;
        }
    }

    Ok(Allocation { consumed, credited })
}

impl Group {
    pub(crate) fn handle_send_all_back(
        &self,
        cmd: &SendAllMoneyBack,
    ) -> Result<Vec<GroupEvent>, LedgerError> {
        self.ensure_created()?;
        self.ensure_admin(cmd.caller)?;
        self.ensure_quorum()?;

        let refunds: Vec<Credit> = self
            .member_records()
            .filter(|m| m.custody_balance() > 0)
            .map(|m| Credit {
                account: m.account(),
                amount: m.custody_balance(),
            })
            .collect();

        if refunds.is_empty() {
            return Ok(vec![]);
        }
        for refund in &refunds {
            self.pending_refund(&refund.account)
                .checked_add(refund.amount)
                .ok_or(LedgerError::Overflow)?;
        }

        Ok(vec![GroupEvent::CustodyReturned(CustodyReturned {
            group_id: cmd.group_id,
            refunds,
            occurred_at: cmd.occurred_at,
        })])
    }

    pub(crate) fn handle_settle_up(&self, cmd: &SettleUp) -> Result<Vec<GroupEvent>, LedgerError> {
        self.ensure_created()?;
        self.ensure_admin(cmd.caller)?;
        self.ensure_quorum()?;

        let custody: Vec<(AccountId, i64)> = self
            .member_records()
            .map(|m| (m.account(), m.custody_balance()))
            .collect();
        let creditors: Vec<(AccountId, i128)> = self
            .split()
            .creditors()
            .map(|e| (e.account, e.outstanding))
            .collect();

        let allocation = allocate(&custody, &creditors)?;
        if allocation.is_empty() {
            return Ok(vec![]);
        }

        for credit in &allocation.credited {
            let current = self.pending_refund(&credit.account);
            current.checked_add(credit.amount).ok_or(LedgerError::Overflow)?;
        }

        Ok(vec![GroupEvent::SettlementCredited(SettlementCredited {
            group_id: cmd.group_id,
            consumed: allocation.consumed,
            credited: allocation.credited,
            occurred_at: cmd.occurred_at,
        })])
    }
}
