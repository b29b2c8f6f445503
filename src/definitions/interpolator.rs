use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use dashmap::DashMap;
use thiserror::Error;

use crate::sigils::SigilKeyOperator;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InterpolationError {
    /// A chain of references leads back to a key already being resolved.
    #[error("cyclic variable reference involving key: {key}")]
    CyclicReference { key: String },
}

/// A flat key/value store whose values may reference other keys in the
/// same store via sigil-delimited tokens.
///
/// The backing map allows concurrent reads and writes without external
/// locking, but a single [`InterpolatingMap::interpolate`] pass is not
/// atomic: mutating the map while a pass is in flight yields inconsistent
/// results.
#[derive(Debug)]
pub struct InterpolatingMap {
    entries: DashMap<String, String>,
    operator: SigilKeyOperator,
}

impl InterpolatingMap {
    /// `operator` carries the sigils that mark where key names begin and
    /// end inside values.
    pub fn new(operator: SigilKeyOperator) -> Self {
        Self {
            entries: DashMap::new(),
            operator,
        }
    }

    pub fn with_entries(
        operator: SigilKeyOperator,
        entries: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let map = Self::new(operator);
        for (key, value) in entries {
            map.insert(key, value);
        }
        map
    }

    pub fn operator(&self) -> &SigilKeyOperator {
        &self.operator
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Cloned value for `key`, so no map lock outlives the call.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries.remove(key).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of all entries, in no particular order.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Resolve every value in the map in place, recursively substituting
    /// references until none remain resolvable. Returns the number of
    /// failed substitutions (references to keys that do not exist).
    ///
    /// Running this on an already fully-resolved map is a no-op.
    pub fn interpolate(&self) -> Result<usize, InterpolationError> {
        let mut failures = 0;
        let keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();

        for key in keys {
            let Some(value) = self.get(&key) else { continue };

            let mut visited = HashSet::new();
            let resolved = self.resolve(&value, &mut visited, &mut failures)?;
            self.entries.insert(key, resolved);
        }

        Ok(failures)
    }

    /// Resolve all references inside a single text string against this
    /// map, leaving unresolvable tokens verbatim.
    pub fn interpolate_text(&self, text: &str) -> Result<String, InterpolationError> {
        let mut visited = HashSet::new();
        self.resolve(text, &mut visited, &mut 0)
    }

    /// Depth-first substitution: each referenced key is itself resolved
    /// before its value replaces the token, so chains settle fully.
    /// `visited` holds the keys on the current resolution path; meeting
    /// one again is a cycle.
    fn resolve(
        &self,
        value: &str,
        visited: &mut HashSet<String>,
        failures: &mut usize,
    ) -> Result<String, InterpolationError> {
        let references: Vec<(String, String)> = self
            .operator
            .references(value)
            .map(|r| (r.token.to_string(), r.key.to_string()))
            .collect();

        let mut resolved = value.to_string();

        for (token, key) in references {
            match self.get(&key) {
                None => *failures += 1,
                Some(key_value) => {
                    if !visited.insert(key.clone()) {
                        return Err(InterpolationError::CyclicReference { key });
                    }

                    let replacement = self.resolve(&key_value, visited, failures)?;
                    visited.remove(&key);

                    resolved = resolved.replace(&token, &replacement);
                }
            }
        }

        Ok(resolved)
    }
}

/// Two maps are equal only when both their entries and their sigils agree;
/// identical contents under different delimiters compare unequal.
impl PartialEq for InterpolatingMap {
    fn eq(&self, other: &Self) -> bool {
        self.operator.sigils() == other.operator.sigils()
            && self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|entry| other.get(entry.key()).as_deref() == Some(entry.value().as_str()))
    }
}

impl Eq for InterpolatingMap {}

impl Hash for InterpolatingMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.operator.sigils().hash(state);

        // Entry order is unstable, so fold per-entry hashes symmetrically.
        let mut folded: u64 = 0;
        for entry in self.entries.iter() {
            let mut hasher = DefaultHasher::new();
            entry.key().hash(&mut hasher);
            entry.value().hash(&mut hasher);
            folded ^= hasher.finish();
        }

        state.write_u64(folded);
    }
}
