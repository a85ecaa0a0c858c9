//! Insertion-order-preserving entity registries.
//!
//! The traversal root of a generated graph is defined as "the first person
//! created", and the JSON form of the graph keys its `persons`/`unions`
//! objects in creation order. A plain `HashMap` loses that order, so the
//! registry pairs the map with a stable key vector: lookups stay O(1) while
//! iteration and serialization follow insertion order.
//!
//! Registries only ever grow. There is no removal operation; `insert` on an
//! existing key overwrites the value in place (last write wins) and keeps the
//! key's original position.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

/// An append-only mapping from entity id to entity record that preserves
/// insertion order for iteration and serialization.
#[derive(Debug, Clone)]
pub struct Registry<K, V> {
    order: Vec<K>,
    by_id: HashMap<K, V>,
}

impl<K, V> Default for Registry<K, V> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            by_id: HashMap::new(),
        }
    }
}

impl<K, V> Registry<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.by_id.contains_key(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.by_id.get(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.by_id.get_mut(key)
    }

    /// Insert or overwrite. A fresh key is appended to the iteration order;
    /// re-inserting an existing key keeps its original position and returns
    /// the previous value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let previous = self.by_id.insert(key.clone(), value);
        if previous.is_none() {
            self.order.push(key);
        }
        previous
    }

    /// The first key ever inserted, if any.
    pub fn first_key(&self) -> Option<&K> {
        self.order.first()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order.iter().map(move |key| {
            let value = &self.by_id[key];
            (key, value)
        })
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    /// Iterate values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }
}

impl<K, V> PartialEq for Registry<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order && self.by_id == other.by_id
    }
}

impl<K, V> Eq for Registry<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq,
{
}

impl<K, V> Serialize for Registry<K, V>
where
    K: Eq + Hash + Clone + Serialize,
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct RegistryVisitor<K, V> {
    marker: PhantomData<Registry<K, V>>,
}

impl<'de, K, V> Visitor<'de> for RegistryVisitor<K, V>
where
    K: Eq + Hash + Clone + Deserialize<'de>,
    V: Deserialize<'de>,
{
    type Value = Registry<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of entity ids to entity records")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut registry = Registry::new();
        while let Some((key, value)) = access.next_entry::<K, V>()? {
            registry.insert(key, value);
        }
        Ok(registry)
    }
}

impl<'de, K, V> Deserialize<'de> for Registry<K, V>
where
    K: Eq + Hash + Clone + Deserialize<'de>,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RegistryVisitor {
            marker: PhantomData,
        })
    }
}
