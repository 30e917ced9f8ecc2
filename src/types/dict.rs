//! Insertion-ordered object dictionary.

use std::collections::HashMap;
use std::fmt;

use super::Object;
use crate::error::BinonError;
use crate::hash::ObjectHashBuilder;

/// A map from scalar `Object` keys to `Object` values.
///
/// Entries iterate in insertion order, which is also the order they are
/// written on the wire. Lookups go through a salted hash index. Container
/// keys are rejected.
#[derive(Clone, Default)]
pub struct Dict {
    entries: Vec<(Object, Object)>,
    index: HashMap<Object, usize, ObjectHashBuilder>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity_and_hasher(capacity, ObjectHashBuilder),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts an entry, returning the previous value for the key.
    ///
    /// An existing key keeps its position. Fails with `NoHashing` if the key
    /// is a container.
    pub fn insert(&mut self, key: Object, value: Object) -> Result<Option<Object>, BinonError> {
        if key.is_container() {
            return Err(BinonError::NoHashing(key.type_code()));
        }
        if let Some(&i) = self.index.get(&key) {
            return Ok(Some(std::mem::replace(&mut self.entries[i].1, value)));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        Ok(None)
    }

    pub fn get(&self, key: &Object) -> Result<Option<&Object>, BinonError> {
        Ok(self.position(key)?.map(|i| &self.entries[i].1))
    }

    pub fn get_mut(&mut self, key: &Object) -> Result<Option<&mut Object>, BinonError> {
        let pos = self.position(key)?;
        Ok(pos.map(|i| &mut self.entries[i].1))
    }

    pub fn contains_key(&self, key: &Object) -> Result<bool, BinonError> {
        Ok(self.position(key)?.is_some())
    }

    /// Removes an entry, keeping the relative order of the others.
    pub fn remove(&mut self, key: &Object) -> Result<Option<Object>, BinonError> {
        let Some(i) = self.position(key)? else {
            return Ok(None);
        };
        self.index.remove(key);
        let (_, value) = self.entries.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Ok(Some(value))
    }

    fn position(&self, key: &Object) -> Result<Option<usize>, BinonError> {
        if key.is_container() {
            return Err(BinonError::NoComparing(key.type_code()));
        }
        Ok(self.index.get(key).copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Object, &Object)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Object> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Object> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Builds a dict from entries, later duplicates replacing earlier values.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (Object, Object)>,
    ) -> Result<Self, BinonError> {
        let mut dict = Self::new();
        for (k, v) in entries {
            dict.insert(k, v)?;
        }
        Ok(dict)
    }
}

impl IntoIterator for Dict {
    type Item = (Object, Object);
    type IntoIter = std::vec::IntoIter<(Object, Object)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Equal when both hold the same keys mapped to equal values, in any order.
impl PartialEq for Dict {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(k, v)| {
                other
                    .index
                    .get(k)
                    .is_some_and(|&i| other.entries[i].1 == *v)
            })
    }
}

impl Eq for Dict {}

impl fmt::Debug for Dict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
