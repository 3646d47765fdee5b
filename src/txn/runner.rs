// SPDX-License-Identifier: MIT

//! Transaction runner
//!
//! Runs the condition list and, only when every condition holds, the exec
//! list. The caller is responsible for handing in an invoker that is
//! already inside the store's atomic context.

use serde::{Deserialize, Serialize};

use super::condition;
use super::error::TxnError;
use super::invoker::CommandInvoker;
use super::request::Request;
use super::value::CompareMode;

/// Terminal state of a request that did not error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Outcome {
    /// A condition failed; no exec command ran
    Rejected,
    /// Every condition held and every exec command ran
    Committed,
}

/// Knobs for a single run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: CompareMode,
}

impl Outcome {
    /// The integer reply: 1 for committed, 0 for rejected
    pub fn as_int(self) -> i64 {
        match self {
            Outcome::Rejected => 0,
            Outcome::Committed => 1,
        }
    }

    pub fn is_committed(self) -> bool {
        self == Outcome::Committed
    }
}

impl From<Outcome> for i64 {
    fn from(outcome: Outcome) -> Self {
        outcome.as_int()
    }
}

impl TryFrom<i64> for Outcome {
    type Error = String;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Outcome::Rejected),
            1 => Ok(Outcome::Committed),
            other => Err(format!("transaction result must be 0 or 1, got {}", other)),
        }
    }
}

impl RunOptions {
    pub fn with_mode(mode: CompareMode) -> Self {
        Self { mode }
    }
}

/// Run a request to completion.
///
/// Side effects of commands embedded in conditions stay in place even when
/// the request is rejected or aborts with an error.
pub fn run<I>(request: &Request, invoker: &mut I, options: RunOptions) -> Result<Outcome, TxnError>
where
    I: CommandInvoker + ?Sized,
{
    log::debug!(
        "Evaluating {} condition(s), {} command(s) queued",
        request.conditions.len(),
        request.commands.len()
    );

    let passed = condition::evaluate(&request.conditions, invoker, options.mode).map_err(|e| {
        log::warn!("Transaction aborted during conditions: {}", e);
        e
    })?;

    if !passed {
        log::info!("Transaction rejected");
        return Ok(Outcome::Rejected);
    }

    for command in &request.commands {
        log::debug!("Executing command: {}", command.name);
        invoker.invoke(&command.name, &command.args).map_err(|e| {
            log::warn!("Transaction aborted on '{}': {}", command.name, e);
            TxnError::from(e)
        })?;
    }

    log::info!("Transaction committed");
    Ok(Outcome::Committed)
}

/// Parse a JSON request and run it
pub fn run_json<I>(payload: &str, invoker: &mut I, options: RunOptions) -> Result<Outcome, TxnError>
where
    I: CommandInvoker + ?Sized,
{
    let request = Request::from_json(payload)?;
    run(&request, invoker, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::txn::error::StoreError;
    use crate::txn::invoker::testing::ScriptedInvoker;
    use crate::txn::value::Value;
    use serde_json::json;

    #[test]
    fn test_no_conditions_runs_every_command_in_order() {
        let mut invoker = ScriptedInvoker::new(vec![]);
        let outcome = run_json(
            &json!({"if": [], "exec": [["set", "k1", "a"], ["set", "k2", "b"]]}).to_string(),
            &mut invoker,
            RunOptions::default(),
        )
        .unwrap();

        assert_eq!(outcome.as_int(), 1);
        let names: Vec<_> = invoker.calls.iter().map(|(_, args)| args[0].clone()).collect();
        assert_eq!(names, vec!["k1", "k2"]);
    }

    #[test]
    fn test_rejected_runs_no_command() {
        let mut invoker = ScriptedInvoker::new(vec![Ok(Value::text("nope"))]);
        let request = Request::from_value(json!({
            "if": [["yes", ["get", "k"]]],
            "exec": [["set", "r", "ok"]]
        }))
        .unwrap();

        let outcome = run(&request, &mut invoker, RunOptions::default()).unwrap();
        assert_eq!(outcome, Outcome::Rejected);
        assert_eq!(invoker.calls.len(), 1);
    }

    #[test]
    fn test_empty_exec_still_commits() {
        let mut invoker = ScriptedInvoker::new(vec![Ok(Value::text("a"))]);
        let request = Request::from_value(json!({"if": [["a", ["get", "k1"]]], "exec": []})).unwrap();

        assert!(run(&request, &mut invoker, RunOptions::default())
            .unwrap()
            .is_committed());
    }

    #[test]
    fn test_exec_store_error_aborts_remaining_commands() {
        let mut invoker = ScriptedInvoker::new(vec![
            Ok(Value::text("OK")),
            Err(StoreError::NotInteger),
        ]);
        let request = Request::from_value(json!({
            "exec": [["set", "a", "x"], ["incr", "a"], ["set", "b", "y"]]
        }))
        .unwrap();

        let err = run(&request, &mut invoker, RunOptions::default()).unwrap_err();
        assert!(matches!(err, TxnError::Store(StoreError::NotInteger)));
        assert_eq!(invoker.calls.len(), 2);
    }

    #[test]
    fn test_outcome_serializes_as_integer() {
        assert_eq!(serde_json::to_value(Outcome::Committed).unwrap(), json!(1));
        assert_eq!(
            serde_json::from_value::<Outcome>(json!(0)).unwrap(),
            Outcome::Rejected
        );
        assert!(serde_json::from_value::<Outcome>(json!(2)).is_err());
    }
}
