// SPDX-License-Identifier: MIT

//! In-memory keyspace implementing the command invoker

use once_cell::sync::Lazy;
use serde_json::Value as Json;
use std::collections::{BTreeSet, HashMap};

use crate::txn::{Arg, CommandInvoker, StoreError, Value};

/// A stored value
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Str(String),
    Set(BTreeSet<String>),
}

/// Number of arguments a command accepts, not counting its name
#[derive(Debug, Clone, Copy)]
enum Arity {
    Exact(usize),
    AtLeast(usize),
}

static COMMANDS: Lazy<HashMap<&'static str, Arity>> = Lazy::new(|| {
    HashMap::from([
        ("get", Arity::Exact(1)),
        ("set", Arity::Exact(2)),
        ("del", Arity::AtLeast(1)),
        ("exists", Arity::AtLeast(1)),
        ("incr", Arity::Exact(1)),
        ("decr", Arity::Exact(1)),
        ("incrby", Arity::Exact(2)),
        ("decrby", Arity::Exact(2)),
        ("append", Arity::Exact(2)),
        ("strlen", Arity::Exact(1)),
        ("sadd", Arity::AtLeast(2)),
        ("srem", Arity::AtLeast(2)),
        ("sismember", Arity::Exact(2)),
        ("smembers", Arity::Exact(1)),
        ("scard", Arity::Exact(1)),
        ("type", Arity::Exact(1)),
        ("flushdb", Arity::Exact(0)),
    ])
});

/// Single-threaded keyspace of strings and sets with Redis reply conventions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an entry
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Store a string, replacing whatever was there
    pub fn insert_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), Entry::Str(value.into()));
    }

    /// Store a set, replacing whatever was there; empty sets are not kept
    pub fn insert_set<I, S>(&mut self, key: impl Into<String>, members: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members: BTreeSet<String> = members.into_iter().map(Into::into).collect();
        let key = key.into();
        if members.is_empty() {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, Entry::Set(members));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current value of a key as a reply would carry it
    pub fn value(&self, key: &str) -> Value {
        match self.entries.get(key) {
            None => Value::Nil,
            Some(Entry::Str(s)) => Value::Text(s.clone()),
            Some(Entry::Set(members)) => Value::Set(members.clone()),
        }
    }

    /// Snapshot of the keyspace as a JSON object
    pub fn to_json(&self) -> Json {
        Json::Object(
            self.entries
                .keys()
                .map(|k| (k.clone(), self.value(k).to_json()))
                .collect(),
        )
    }

    fn string_at(&self, key: &str) -> Result<Option<&String>, StoreError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(Entry::Str(s)) => Ok(Some(s)),
            Some(Entry::Set(_)) => Err(StoreError::WrongType),
        }
    }

    fn set_at(&self, key: &str) -> Result<Option<&BTreeSet<String>>, StoreError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(Entry::Set(members)) => Ok(Some(members)),
            Some(Entry::Str(_)) => Err(StoreError::WrongType),
        }
    }

    fn set_at_mut(&mut self, key: &str) -> Result<&mut BTreeSet<String>, StoreError> {
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Set(BTreeSet::new()));
        match entry {
            Entry::Set(members) => Ok(members),
            Entry::Str(_) => Err(StoreError::WrongType),
        }
    }

    fn incr_by(&mut self, key: &str, delta: i64) -> Result<Value, StoreError> {
        let current = match self.string_at(key)? {
            None => 0,
            Some(s) => s.parse::<i64>().map_err(|_| StoreError::NotInteger)?,
        };
        let next = current.checked_add(delta).ok_or(StoreError::NotInteger)?;
        self.insert_str(key, next.to_string());
        Ok(Value::from(next))
    }

    fn dispatch(&mut self, name: &str, args: &[String]) -> Result<Value, StoreError> {
        match name {
            "get" => Ok(self
                .string_at(&args[0])?
                .map_or(Value::Nil, |s| Value::Text(s.clone()))),
            "set" => {
                self.insert_str(args[0].clone(), args[1].clone());
                Ok(Value::text("OK"))
            }
            "del" => {
                let removed = args
                    .iter()
                    .filter(|k| self.entries.remove(k.as_str()).is_some())
                    .count();
                Ok(Value::from(removed as i64))
            }
            "exists" => {
                let found = args.iter().filter(|k| self.entries.contains_key(k.as_str())).count();
                Ok(Value::from(found as i64))
            }
            "incr" => self.incr_by(&args[0], 1),
            "decr" => self.incr_by(&args[0], -1),
            "incrby" | "decrby" => {
                let delta = args[1].parse::<i64>().map_err(|_| StoreError::NotInteger)?;
                let delta = if name == "decrby" {
                    delta.checked_neg().ok_or(StoreError::NotInteger)?
                } else {
                    delta
                };
                self.incr_by(&args[0], delta)
            }
            "append" => {
                let mut value = self.string_at(&args[0])?.cloned().unwrap_or_default();
                value.push_str(&args[1]);
                let len = value.len();
                self.insert_str(args[0].clone(), value);
                Ok(Value::from(len as i64))
            }
            "strlen" => Ok(Value::from(
                self.string_at(&args[0])?.map_or(0, |s| s.len()) as i64,
            )),
            "sadd" => {
                let members = self.set_at_mut(&args[0])?;
                let added = args[1..]
                    .iter()
                    .filter(|m| members.insert((*m).clone()))
                    .count();
                Ok(Value::from(added as i64))
            }
            "srem" => {
                if self.set_at(&args[0])?.is_none() {
                    return Ok(Value::from(0));
                }
                let members = self.set_at_mut(&args[0])?;
                let removed = args[1..].iter().filter(|m| members.remove(m.as_str())).count();
                if members.is_empty() {
                    self.entries.remove(&args[0]);
                }
                Ok(Value::from(removed as i64))
            }
            "sismember" => Ok(Value::from(
                self.set_at(&args[0])?
                    .is_some_and(|members| members.contains(&args[1])) as i64,
            )),
            "smembers" => Ok(Value::Set(
                self.set_at(&args[0])?.cloned().unwrap_or_default(),
            )),
            "scard" => Ok(Value::from(
                self.set_at(&args[0])?.map_or(0, |m| m.len()) as i64,
            )),
            "type" => Ok(Value::text(match self.entries.get(&args[0]) {
                None => "none",
                Some(Entry::Str(_)) => "string",
                Some(Entry::Set(_)) => "set",
            })),
            "flushdb" => {
                self.entries.clear();
                Ok(Value::text("OK"))
            }
            other => Err(StoreError::UnknownCommand(other.to_string())),
        }
    }
}

impl CommandInvoker for MemoryStore {
    fn invoke(&mut self, name: &str, args: &[Arg]) -> Result<Value, StoreError> {
        let command = name.to_ascii_lowercase();
        let arity = COMMANDS
            .get(command.as_str())
            .ok_or_else(|| StoreError::UnknownCommand(name.to_string()))?;

        let arity_ok = match *arity {
            Arity::Exact(n) => args.len() == n,
            Arity::AtLeast(n) => args.len() >= n,
        };
        if !arity_ok {
            return Err(StoreError::WrongArity(command));
        }

        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.dispatch(&command, &args)
    }
}
