//! JSON script format: a group, its admin, and a list of operations by name.
//!
//! ```json
//! {
//!   "admin": "Chris",
//!   "steps": [
//!     { "op": "add_to_group", "caller": "Chris", "member": "Ted" },
//!     { "op": "add_to_paid", "caller": "Chris", "amount": 10 },
//!     { "op": "settle_up", "caller": "Chris" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Name of the creating admin.
    pub admin: String,
    #[serde(default)]
    pub max_members: Option<usize>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    AddToGroup { caller: String, member: String },
    RemoveFromGroup { caller: String, member: String },
    ChangeAdmin { caller: String, new_admin: String },
    AgreeToSplit { caller: String },
    AddToPaid { caller: String, amount: i64 },
    PutMoneyInContract { caller: String, value: i64 },
    SendAllMoneyBack { caller: String },
    SettleUp { caller: String },
    WithdrawFunds { caller: String },
    /// Log the current split, one record per member.
    PrintSplit,
}

impl Step {
    pub fn op(&self) -> &'static str {
        match self {
            Step::AddToGroup { .. } => "add_to_group",
            Step::RemoveFromGroup { .. } => "remove_from_group",
            Step::ChangeAdmin { .. } => "change_admin",
            Step::AgreeToSplit { .. } => "agree_to_split",
            Step::AddToPaid { .. } => "add_to_paid",
            Step::PutMoneyInContract { .. } => "put_money_in_contract",
            Step::SendAllMoneyBack { .. } => "send_all_money_back",
            Step::SettleUp { .. } => "settle_up",
            Step::WithdrawFunds { .. } => "withdraw_funds",
            Step::PrintSplit => "print_split",
        }
    }

    /// Every participant name the step mentions.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Step::AddToGroup { caller, member } | Step::RemoveFromGroup { caller, member } => {
                vec![caller.as_str(), member.as_str()]
            }
            Step::ChangeAdmin { caller, new_admin } => vec![caller.as_str(), new_admin.as_str()],
            Step::AgreeToSplit { caller }
            | Step::AddToPaid { caller, .. }
            | Step::PutMoneyInContract { caller, .. }
            | Step::SendAllMoneyBack { caller }
            | Step::SettleUp { caller }
            | Step::WithdrawFunds { caller } => vec![caller.as_str()],
            Step::PrintSplit => vec![],
        }
    }
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
