use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered string map used for property bags, step params and headers.
///
/// Entries keep insertion order so documents are written back the way they
/// were read, but equality ignores order: two maps are equal when they hold
/// the same keys bound to the same values.
#[derive(Debug, Clone, Default)]
pub struct PropertyMap {
    entries: Vec<(String, String)>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| *name == key) {
            return Some(std::mem::replace(&mut entry.1, value));
        }
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(name, _)| name == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn map_values(&self, mut f: impl FnMut(&str) -> String) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(key, value)| (key.clone(), f(value)))
                .collect(),
        }
    }
}

impl PartialEq for PropertyMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl Eq for PropertyMap {}

impl<K, V> FromIterator<(K, V)> for PropertyMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = PropertyMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl Serialize for PropertyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for PropertyMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PropertyMapVisitor)
    }
}

struct PropertyMapVisitor;

impl<'de> Visitor<'de> for PropertyMapVisitor {
    type Value = PropertyMap;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map of string keys to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PropertyMap, A::Error> {
        let mut map = PropertyMap::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;

    #[test]
    fn insert_replaces_in_place_and_keeps_order() {
        let mut map = PropertyMap::new();
        map.insert("b", "1");
        map.insert("a", "2");
        let previous = map.insert("b", "3");

        assert_eq!(previous, Some("1".to_string()));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(map.get("b"), Some("3"));
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let left: PropertyMap = [("x", "1"), ("y", "2")].into_iter().collect();
        let right: PropertyMap = [("y", "2"), ("x", "1")].into_iter().collect();
        let different: PropertyMap = [("y", "2"), ("x", "9")].into_iter().collect();

        assert_eq!(left, right);
        assert_ne!(left, different);
        assert_ne!(left, PropertyMap::new());
    }

    #[test]
    fn remove_and_map_values() {
        let mut map: PropertyMap = [("host", "${HOST}"), ("port", "22")].into_iter().collect();
        let upper = map.map_values(|value| value.to_uppercase());
        assert_eq!(upper.get("host"), Some("${HOST}"));

        assert_eq!(map.remove("host"), Some("${HOST}".to_string()));
        assert_eq!(map.remove("host"), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn serde_round_trip_preserves_order() {
        let map: PropertyMap = [("z", "last"), ("a", "first")].into_iter().collect();
        let json = serde_json::to_string(&map).expect("map should serialize");
        assert_eq!(json, r#"{"z":"last","a":"first"}"#);

        let parsed: PropertyMap = serde_json::from_str(&json).expect("map should deserialize");
        assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["z", "a"]);
    }
}
