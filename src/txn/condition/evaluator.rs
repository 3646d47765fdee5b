//! Condition list evaluator

use super::operator::Operator;
use crate::txn::error::TxnError;
use crate::txn::invoker::CommandInvoker;
use crate::txn::request::Condition;
use crate::txn::value::CompareMode;

/// Evaluate conditions left to right against live store state.
///
/// Each condition's command is invoked before its operator is resolved, and
/// the first false condition stops evaluation: commands of later conditions
/// never run. Store errors and unknown operators abort immediately.
pub fn evaluate<I>(
    conditions: &[Condition],
    invoker: &mut I,
    mode: CompareMode,
) -> Result<bool, TxnError>
where
    I: CommandInvoker + ?Sized,
{
    for (index, condition) in conditions.iter().enumerate() {
        if !evaluate_condition(condition, invoker, mode)? {
            log::debug!("Condition #{} failed, skipping the rest", index);
            return Ok(false);
        }
    }
    Ok(true)
}

fn evaluate_condition<I>(
    condition: &Condition,
    invoker: &mut I,
    mode: CompareMode,
) -> Result<bool, TxnError>
where
    I: CommandInvoker + ?Sized,
{
    let command = &condition.invocation;
    let actual = invoker.invoke(&command.name, &command.args)?;
    let op = Operator::resolve(condition.operator.as_deref())?;
    let holds = op.apply(&condition.expected, &actual, mode);

    log::debug!(
        "{} {} {} ({}) -> {}",
        condition.expected,
        op,
        actual,
        command.name,
        holds
    );
    Ok(holds)
}
