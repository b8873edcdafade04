//! Replays a [`Script`] against an in-memory substrate.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use splitledger_core::{AccountId, GroupId};
use splitledger_events::{EventEnvelope, InMemoryEventBus};
use splitledger_group::{ErrorKind, GroupEvent};
use splitledger_infra::{GroupService, InMemoryTransfer, LedgerConfig, ServiceError, SplitReport};

use crate::script::{Script, Step};

type Service = GroupService<InMemoryTransfer, Arc<InMemoryEventBus<EventEnvelope<GroupEvent>>>>;

/// A step the ledger refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejected {
    /// Zero-based position in the script.
    pub step: usize,
    pub op: &'static str,
    pub kind: Option<ErrorKind>,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub participants: BTreeMap<String, AccountId>,
    pub report: SplitReport,
    pub wallets: BTreeMap<String, i64>,
    pub custody: i64,
    pub journal_version: u64,
    pub rejected: Vec<Rejected>,
}

/// Run every step in order. Rejected steps are collected, not fatal.
pub fn run(script: &Script, config: &LedgerConfig) -> Result<Outcome, ServiceError> {
    let participants = participants(script);
    let id = |name: &str| participants.get(name).copied().unwrap_or_default();

    let mut transfer = InMemoryTransfer::new();
    for account in participants.values() {
        transfer.fund(*account, config.starting_wallet);
    }

    let config = LedgerConfig {
        max_members: script.max_members.unwrap_or(config.max_members),
        ..*config
    };
    let mut service = Service::create(
        &config,
        GroupId::new(),
        id(&script.admin),
        script.admin.clone(),
        transfer,
        Arc::new(InMemoryEventBus::new()),
    )?;

    let mut rejected = Vec::new();
    for (index, step) in script.steps.iter().enumerate() {
        if let Err(err) = apply(&mut service, step, &id) {
            rejected.push(Rejected {
                step: index,
                op: step.op(),
                kind: err.ledger().map(|e| e.kind()),
                error: err.to_string(),
            });
        }
    }

    let wallets = participants
        .iter()
        .map(|(name, account)| (name.clone(), service.transfer().wallet(account)))
        .collect();

    Ok(Outcome {
        report: service.report(),
        wallets,
        custody: service.transfer().custody(),
        journal_version: service.journal().version(),
        participants,
        rejected,
    })
}

fn apply(
    service: &mut Service,
    step: &Step,
    id: &impl Fn(&str) -> AccountId,
) -> Result<(), ServiceError> {
    match step {
        Step::AddToGroup { caller, member } => {
            service.add_to_group(id(caller), id(member), member.clone())
        }
        Step::RemoveFromGroup { caller, member } => {
            service.remove_from_group(id(caller), id(member))
        }
        Step::ChangeAdmin { caller, new_admin } => service.change_admin(id(caller), id(new_admin)),
        Step::AgreeToSplit { caller } => service.agree_to_split(id(caller)),
        Step::AddToPaid { caller, amount } => service.add_to_paid(id(caller), *amount),
        Step::PutMoneyInContract { caller, value } => {
            service.put_money_in_contract(id(caller), *value)
        }
        Step::SendAllMoneyBack { caller } => service.send_all_money_back(id(caller)),
        Step::SettleUp { caller } => service.settle_up(id(caller)),
        Step::WithdrawFunds { caller } => service.withdraw_funds(id(caller)).map(drop),
        Step::PrintSplit => {
            service.report().log();
            Ok(())
        }
    }
}

/// One fresh identity per distinct name, admin first.
fn participants(script: &Script) -> BTreeMap<String, AccountId> {
    let mut ids = BTreeMap::new();
    let names = std::iter::once(script.admin.as_str())
        .chain(script.steps.iter().flat_map(|s| s.names()));
    for name in names {
        ids.entry(name.to_string()).or_insert_with(AccountId::new);
    }
    ids
}
