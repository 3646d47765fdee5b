// SPDX-License-Identifier: MIT

//! Seed files - initial keyspace contents loaded from YAML or JSON
//!
//! ```yaml
//! foo: aaa
//! counter: 3
//! members: [x, y]
//! ```

use serde::Deserialize;
use serde_json::Number;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::memory::MemoryStore;
use crate::error::HostError;
use crate::txn::value::format_number;

/// Keyspace contents keyed by store key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
    #[serde(flatten)]
    pub entries: BTreeMap<String, SeedValue>,
}

/// Value of a single seeded key
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SeedValue {
    /// Stored as a set
    Members(Vec<String>),
    /// Stored as its canonical text, integers digit for digit
    Number(Number),
    Text(String),
}

impl Seed {
    /// Write every entry into `store`, replacing existing keys
    pub fn apply(&self, store: &mut MemoryStore) {
        for (key, value) in &self.entries {
            match value {
                SeedValue::Members(members) => store.insert_set(key.as_str(), members.iter().cloned()),
                SeedValue::Number(n) => store.insert_str(key.as_str(), format_number(n)),
                SeedValue::Text(s) => store.insert_str(key.as_str(), s.as_str()),
            }
        }
        log::debug!("Seeded {} key(s)", self.entries.len());
    }

    pub fn into_store(self) -> MemoryStore {
        let mut store = MemoryStore::new();
        self.apply(&mut store);
        store
    }
}

/// Loads seed files from disk
pub struct SeedLoader;

impl SeedLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a seed file; `.json` files are read as JSON, anything else as YAML
    pub fn load_seed<P: AsRef<Path>>(&self, path: P) -> Result<Seed, HostError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::parse_json(&content)
        } else {
            Self::parse_yaml(&content)
        }
    }

    /// Parse a seed from a YAML string
    pub fn parse_yaml(content: &str) -> Result<Seed, HostError> {
        if content.trim().is_empty() {
            return Ok(Seed::default());
        }
        let seed: Seed = serde_yaml::from_str(content)?;
        Ok(seed)
    }

    /// Parse a seed from a JSON string
    pub fn parse_json(content: &str) -> Result<Seed, HostError> {
        let json: serde_json::Value = serde_json::from_str(content)?;
        if !json.is_object() {
            return Err(HostError::seed("seed must be a mapping of key to value"));
        }
        let seed: Seed = serde_json::from_value(json)?;
        Ok(seed)
    }
}

impl Default for SeedLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::txn::Value;

    #[test]
    fn test_parse_yaml_seed() {
        let yaml = r#"
foo: aaa
counter: 3
ratio: 0.5
members:
  - x
  - y
"#;
        let seed = SeedLoader::parse_yaml(yaml).unwrap();
        assert_eq!(seed.entries.len(), 4);
        assert_eq!(seed.entries["foo"], SeedValue::Text("aaa".to_string()));

        let store = seed.into_store();
        assert_eq!(store.value("foo"), Value::text("aaa"));
        assert_eq!(store.value("counter"), Value::text("3"));
        assert_eq!(store.value("ratio"), Value::text("0.5"));
        assert_eq!(store.value("members"), Value::set(["x", "y"]));
    }

    #[test]
    fn test_parse_json_seed() {
        let seed = SeedLoader::parse_json(r#"{"foo": "bbb", "s": ["a"]}"#).unwrap();
        let store = seed.into_store();
        assert_eq!(store.value("foo"), Value::text("bbb"));
        assert_eq!(store.value("s"), Value::set(["a"]));
    }

    #[test]
    fn test_large_integer_seed_keeps_every_digit() {
        let store = SeedLoader::parse_yaml("big: 9007199254740993\nhuge: 18446744073709551615")
            .unwrap()
            .into_store();
        assert_eq!(store.value("big"), Value::text("9007199254740993"));
        assert_eq!(store.value("huge"), Value::text("18446744073709551615"));

        let store = SeedLoader::parse_json(r#"{"big": 9007199254740993}"#)
            .unwrap()
            .into_store();
        assert_eq!(store.value("big"), Value::text("9007199254740993"));
    }

    #[test]
    fn test_empty_yaml_is_empty_seed() {
        assert!(SeedLoader::parse_yaml("  \n").unwrap().entries.is_empty());
    }

    #[test]
    fn test_json_seed_must_be_object() {
        let err = SeedLoader::parse_json("[1, 2]").unwrap_err();
        assert!(matches!(err, HostError::Seed(_)));
    }

    #[test]
    fn test_unsupported_value_is_rejected() {
        assert!(SeedLoader::parse_yaml("flag: {nested: 1}").is_err());
    }

    #[test]
    fn test_empty_set_is_not_stored() {
        let store = SeedLoader::parse_yaml("s: []").unwrap().into_store();
        assert!(store.is_empty());
    }
}
