// SPDX-License-Identifier: MIT

//! Condition evaluation
//!
//! A condition compares a literal with the reply of a live store command:
//! - `["aaa", "==", ["get", "foo"]]`
//! - `[1, ["sadd", "members", "x"]]` (operator defaults to `==`)
//! - `["ccc", ">", ["get", "foo"]]` holds when `"ccc" > reply`

mod evaluator;
mod operator;

pub use evaluator::evaluate;
pub use operator::Operator;
