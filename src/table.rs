//! Lookup from qualified, human-readable names to obfuscated tokens.
//!
//! Entries are stored token-first (`{ "token": "t", "name": "Entity.posX" }`)
//! and inverted at load time. Several names may share one token; a name maps
//! to exactly one token.

use crate::errors::{ObfuscationError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const BUILTIN_MAP: &str = include_str!("../config/obfuscation_map.json");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MappingEntry {
    pub token: String,
    pub name: String,
}

impl MappingEntry {
    pub fn new(token: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            name: name.into(),
        }
    }
}

/// What to do when the same qualified name appears more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep the later entry and log a warning.
    #[default]
    LastWins,
    /// Fail the load if a name is given two different tokens.
    Reject,
}

#[derive(Debug, Clone, Default)]
pub struct ObfuscationTable {
    map: HashMap<String, String>,
}

impl ObfuscationTable {
    /// Table compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::builtin_with(DuplicatePolicy::LastWins)
    }

    pub fn builtin_with(policy: DuplicatePolicy) -> Result<Self> {
        Self::from_json_str(BUILTIN_MAP, policy)
    }

    pub fn from_json_str(json: &str, policy: DuplicatePolicy) -> Result<Self> {
        let entries: Vec<MappingEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries, policy)
    }

    pub fn load(path: &Path, policy: DuplicatePolicy) -> Result<Self> {
        debug!(path = %path.display(), "loading mapping table");
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content, policy)
    }

    pub fn from_entries<I>(entries: I, policy: DuplicatePolicy) -> Result<Self>
    where
        I: IntoIterator<Item = MappingEntry>,
    {
        let mut map: HashMap<String, String> = HashMap::new();
        for entry in entries {
            match map.get(&entry.name) {
                Some(existing) if *existing != entry.token => {
                    if policy == DuplicatePolicy::Reject {
                        return Err(ObfuscationError::DuplicateIdentifier {
                            name: entry.name,
                            first: existing.clone(),
                            second: entry.token,
                        });
                    }
                    warn!(
                        name = %entry.name,
                        previous = %existing,
                        token = %entry.token,
                        "duplicate mapping, later entry wins"
                    );
                }
                Some(_) => debug!(name = %entry.name, "repeated identical mapping"),
                None => {}
            }
            map.insert(entry.name, entry.token);
        }
        Ok(Self { map })
    }

    /// Exact-match lookup. There is no fallback for unknown names.
    pub fn resolve(&self, name: &str) -> Result<&str> {
        self.map
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ObfuscationError::UnknownIdentifier {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
