// SPDX-License-Identifier: MIT

//! Request model
//!
//! A request is the JSON document
//!
//! ```json
//! { "if":   [["aaa", "==", ["get", "foo"]], [1, ["sadd", "s", "x"]]],
//!   "exec": [["set", "bar", "bbb"]] }
//! ```
//!
//! Conditions are `[expected, operator, command]` or `[expected, command]`.
//! The operator token is kept verbatim and only resolved while evaluating,
//! so an unknown operator is reported after the condition's command ran.

use serde::Deserialize;
use serde_json::Value as Json;

use super::error::TxnError;
use super::value::{Arg, Value};

/// A full transaction request
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Request {
    /// Conditions checked left to right
    #[serde(rename = "if", default)]
    pub conditions: Vec<Condition>,
    /// Commands run in order once every condition holds
    #[serde(rename = "exec", default)]
    pub commands: Vec<Command>,
}

/// One check: `expected <operator> reply-of(invocation)`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Json>")]
pub struct Condition {
    pub expected: Value,
    /// Operator as written; `None` means the two-element form
    pub operator: Option<String>,
    pub invocation: Command,
}

/// A store command: operation name followed by its arguments
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Json>")]
pub struct Command {
    pub name: String,
    pub args: Vec<Arg>,
}

impl Request {
    /// Parse a request from its JSON wire form
    pub fn from_json(payload: &str) -> Result<Self, TxnError> {
        let json: Json = serde_json::from_str(payload)?;
        Self::from_value(json)
    }

    /// Parse a request from an already decoded JSON value
    pub fn from_value(json: Json) -> Result<Self, TxnError> {
        if !json.is_object() {
            return Err(TxnError::request("request must be an object"));
        }
        serde_json::from_value(json).map_err(|e| TxnError::request(e.to_string()))
    }
}

impl Condition {
    pub fn new(expected: impl Into<Value>, operator: Option<&str>, invocation: Command) -> Self {
        Self {
            expected: expected.into(),
            operator: operator.map(str::to_string),
            invocation,
        }
    }
}

impl Command {
    pub fn new<I, A>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<Vec<Json>> for Command {
    type Error = String;

    fn try_from(items: Vec<Json>) -> Result<Self, Self::Error> {
        let mut iter = items.into_iter();
        let name = match iter.next() {
            Some(Json::String(name)) if !name.is_empty() => name,
            Some(other) => return Err(format!("command name must be a string, got {}", other)),
            None => return Err("command must not be empty".to_string()),
        };
        let args = iter
            .map(|arg| Arg::from_json(&arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { name, args })
    }
}

impl TryFrom<Vec<Json>> for Condition {
    type Error = String;

    fn try_from(items: Vec<Json>) -> Result<Self, Self::Error> {
        let (expected, operator, invocation) = match <[Json; 3]>::try_from(items) {
            Ok([expected, operator, invocation]) => {
                let operator = match operator {
                    Json::String(op) => op,
                    other => return Err(format!("operator must be a string, got {}", other)),
                };
                (expected, Some(operator), invocation)
            }
            Err(items) => match <[Json; 2]>::try_from(items) {
                Ok([expected, invocation]) => (expected, None, invocation),
                Err(items) => {
                    return Err(format!(
                        "condition must have 2 or 3 elements, got {}",
                        items.len()
                    ))
                }
            },
        };

        let invocation = match invocation {
            Json::Array(items) => Command::try_from(items)?,
            other => return Err(format!("condition command must be an array, got {}", other)),
        };

        Ok(Self {
            expected: Value::from_literal(&expected)?,
            operator,
            invocation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_request() {
        let req = Request::from_value(json!({
            "if": [
                ["aaa", "==", ["get", "foo"]],
                [1, ["sadd", "key", "bbb"]]
            ],
            "exec": [["set", "bar", "ccc"]]
        }))
        .unwrap();

        assert_eq!(req.conditions.len(), 2);
        assert_eq!(
            req.conditions[0],
            Condition::new("aaa", Some("=="), Command::new("get", ["foo"]))
        );
        assert_eq!(req.conditions[1].operator, None);
        assert_eq!(req.conditions[1].expected, Value::from(1));
        assert_eq!(req.commands, vec![Command::new("set", ["bar", "ccc"])]);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let req = Request::from_json("{}").unwrap();
        assert!(req.conditions.is_empty());
        assert!(req.commands.is_empty());
    }

    #[test]
    fn test_numeric_arguments() {
        let cmd: Command = serde_json::from_value(json!(["incrby", "n", 5])).unwrap();
        assert_eq!(cmd.args, vec![Arg::Text("n".into()), Arg::from(5)]);
    }

    #[test]
    fn test_unknown_operator_is_kept_for_evaluation() {
        let req = Request::from_value(json!({
            "if": [["OK", "%%", ["set", "foo", "bbb"]]],
            "exec": []
        }))
        .unwrap();
        assert_eq!(req.conditions[0].operator.as_deref(), Some("%%"));
    }

    #[test]
    fn test_rejects_bad_condition_length() {
        let err = Request::from_value(json!({"if": [["a"]], "exec": []})).unwrap_err();
        assert!(matches!(err, TxnError::Request(_)));
        assert!(err.to_string().contains("2 or 3 elements"));
    }

    #[test]
    fn test_rejects_empty_command() {
        let err = Request::from_value(json!({"if": [], "exec": [[]]})).unwrap_err();
        assert!(err.to_string().contains("command must not be empty"));
    }

    #[test]
    fn test_rejects_non_string_operator() {
        let err = Request::from_value(json!({"if": [["a", 1, ["get", "k"]]]})).unwrap_err();
        assert!(err.to_string().contains("operator must be a string"));
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(matches!(
            Request::from_json("[1, 2]").unwrap_err(),
            TxnError::Request(_)
        ));
        assert!(matches!(
            Request::from_json("not json").unwrap_err(),
            TxnError::Json(_)
        ));
    }
}
