//! Value-transfer substrate.
//!
//! The ledger never holds value itself: deposits are pulled from the caller's
//! wallet via [`ValueTransfer::receive`] and withdrawals pushed out via
//! [`ValueTransfer::send`]. A send hands the recipient a [`Reentry`] handle so
//! recipient code can call back into the group mid-transfer.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use thiserror::Error;

use splitledger_core::AccountId;

use crate::reentry::Reentry;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("insufficient funds: {account} has {available}, needs {requested}")]
    InsufficientFunds {
        account: String,
        available: i64,
        requested: i64,
    },

    #[error("recipient {0} rejected the transfer")]
    Rejected(AccountId),

    #[error("transfer substrate unreachable: {0}")]
    Unreachable(String),
}

pub trait ValueTransfer {
    /// Pull `amount` from `from` into custody held for the group.
    fn receive(&mut self, from: AccountId, amount: i64) -> Result<(), TransferError>;

    /// Push `amount` out of custody to `to`.
    ///
    /// `ledger` is the group as it stands mid-withdrawal. Any error fails the
    /// withdrawal and discards whatever was done through `ledger`.
    fn send(
        &mut self,
        to: AccountId,
        amount: i64,
        ledger: &mut Reentry<'_>,
    ) -> Result<(), TransferError>;
}

/// Recipient code run on every send to one account.
pub type SendHook =
    Box<dyn FnMut(AccountId, i64, &mut Reentry<'_>) -> Result<(), TransferError> + Send>;

/// In-memory wallets plus a single custody pot.
#[derive(Default)]
pub struct InMemoryTransfer {
    wallets: BTreeMap<AccountId, i64>,
    custody: i64,
    refusing: BTreeSet<AccountId>,
    hooks: BTreeMap<AccountId, SendHook>,
}

impl InMemoryTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fund(&mut self, account: AccountId, amount: i64) {
        let wallet = self.wallets.entry(account).or_insert(0);
        *wallet = wallet.saturating_add(amount);
    }

    pub fn wallet(&self, account: &AccountId) -> i64 {
        self.wallets.get(account).copied().unwrap_or(0)
    }

    /// Value currently held on behalf of the group.
    pub fn custody(&self) -> i64 {
        self.custody
    }

    /// Make every send to `account` fail with `Rejected`.
    pub fn refuse(&mut self, account: AccountId) {
        self.refusing.insert(account);
    }

    pub fn accept(&mut self, account: AccountId) {
        self.refusing.remove(&account);
    }

    /// Run `hook` as recipient code on each send to `account`.
    pub fn on_send<F>(&mut self, account: AccountId, hook: F)
    where
        F: FnMut(AccountId, i64, &mut Reentry<'_>) -> Result<(), TransferError> + Send + 'static,
    {
        self.hooks.insert(account, Box::new(hook));
    }

    pub fn clear_hook(&mut self, account: &AccountId) {
        self.hooks.remove(account);
    }
}

impl fmt::Debug for InMemoryTransfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryTransfer")
            .field("wallets", &self.wallets)
            .field("custody", &self.custody)
            .field("refusing", &self.refusing)
            .field("hooks", &self.hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ValueTransfer for InMemoryTransfer {
    fn receive(&mut self, from: AccountId, amount: i64) -> Result<(), TransferError> {
        let available = self.wallet(&from);
        if available < amount {
            return Err(TransferError::InsufficientFunds {
                account: from.to_string(),
                available,
                requested: amount,
            });
        }

        self.wallets.insert(from, available - amount);
        self.custody += amount;
        Ok(())
    }

    fn send(
        &mut self,
        to: AccountId,
        amount: i64,
        ledger: &mut Reentry<'_>,
    ) -> Result<(), TransferError> {
        if self.custody < amount {
            return Err(TransferError::InsufficientFunds {
                account: "custody".to_string(),
                available: self.custody,
                requested: amount,
            });
        }
        if self.refusing.contains(&to) {
            return Err(TransferError::Rejected(to));
        }

        self.custody -= amount;
        self.fund(to, amount);

        if let Some(hook) = self.hooks.get_mut(&to) {
            if let Err(err) = hook(to, amount, ledger) {
                // Recipient failed: the value never left custody.
                if let Some(wallet) = self.wallets.get_mut(&to) {
                    *wallet -= amount;
                }
                self.custody += amount;
                return Err(err);
            }
        }

        Ok(())
    }
}
