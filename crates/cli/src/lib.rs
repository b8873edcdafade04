//! Script runner: replays a JSON list of ledger operations and reports the result.

pub mod runner;
pub mod script;

pub use runner::{Outcome, Rejected, run};
pub use script::{Script, Step};
