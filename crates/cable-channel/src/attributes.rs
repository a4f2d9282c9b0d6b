// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Channel attribute bags, declared schemas, and key-set snapshots.
//!
//! The bag holds exactly the user-visible attributes a channel author sets;
//! framework bookkeeping lives on the subscription context and never appears
//! in a snapshot. The gateway reconstructs channel state from subscription
//! arguments alone, so any attribute outside the declared schema is state the
//! remote execution model cannot reproduce.

use std::collections::{BTreeMap, BTreeSet};

use cable_proto::CompatibilityError;

/// User-visible mutable attributes set by channel code, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeBag {
    entries: BTreeMap<String, serde_json::Value>,
}

impl AttributeBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: serde_json::Value) {
        self.entries.insert(name.into(), value);
    }

    /// Returns the value stored under `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.entries.get(name)
    }

    /// Iterates attribute names in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of attributes in the bag.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no attributes are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Attribute names a channel definition declares it may populate.
///
/// Declared attributes are, by contract, derivable from subscription params,
/// so the gateway can rebuild them on every invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSchema {
    names: BTreeSet<String>,
}

impl AttributeSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name` to the schema.
    pub fn declare(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Returns `true` when `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Iterates declared names in key order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Ordered key set captured from an attribute bag at a point in time.
///
/// Snapshots compare by key set only; values are irrelevant to the state
/// contract (replacing a declared attribute's value is reproducible, adding
/// a key is not).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSnapshot {
    keys: BTreeSet<String>,
}

impl AttributeSnapshot {
    /// Captures the current key set of `bag`.
    #[must_use]
    pub fn capture(bag: &AttributeBag) -> Self {
        Self {
            keys: bag.keys().map(str::to_owned).collect(),
        }
    }

    /// Baseline for a subscribe run: the declared schema unioned with keys
    /// already present when the hook starts.
    #[must_use]
    pub fn baseline(schema: &AttributeSchema, bag: &AttributeBag) -> Self {
        let mut keys: BTreeSet<String> = schema.names().map(str::to_owned).collect();
        keys.extend(bag.keys().map(str::to_owned));
        Self { keys }
    }

    /// First key present in `after` but absent here, in key order.
    #[must_use]
    pub fn first_new_key<'a>(&self, after: &'a Self) -> Option<&'a str> {
        after
            .keys
            .iter()
            .find(|key| !self.keys.contains(*key))
            .map(String::as_str)
    }
}

/// Rejects a subscribe run that introduced state outside the baseline.
///
/// The bag is left as the hook produced it; the caller discards the instance
/// entirely rather than rolling back.
pub fn verify_no_new_state(
    before: &AttributeSnapshot,
    after: &AttributeSnapshot,
) -> Result<(), CompatibilityError> {
    match before.first_new_key(after) {
        Some(key) => Err(CompatibilityError::NewStateIntroduced(key.to_owned())),
        None => Ok(()),
    }
}
