use crate::utils::error::{MiscError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Index;

/// An insertion-ordered bag of named JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace {
    data: Map<String, Value>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.data.get(key).unwrap_or(default)
    }

    /// Inserts or overwrites `key`. An overwritten key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Result<Value> {
        self.data
            .shift_remove(key)
            .ok_or_else(|| MiscError::MissingKey {
                key: key.to_string(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.data.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.data
    }
}

impl From<Map<String, Value>> for Namespace {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Namespace {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl Index<&str> for Namespace {
    type Output = Value;

    /// # Panics
    /// Panics when `key` is missing; use [`Namespace::get`] to check first.
    fn index(&self, key: &str) -> &Value {
        match self.data.get(key) {
            Some(value) => value,
            None => panic!("Key not found: {}", key),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.data.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn namespace() -> Namespace {
        Namespace::from_iter([("a", 1), ("b", 2), ("c", 3)])
    }

    #[test]
    fn test_namespace_get() {
        let ns = namespace();
        assert_eq!(ns.get("a"), Some(&json!(1)));
        assert_eq!(ns["b"], json!(2));
        assert_eq!(ns.get("nonexistent"), None);
        assert_eq!(ns.get_or("nonexistent", &json!("default")), &json!("default"));
    }

    #[test]
    #[should_panic(expected = "Key not found: nonexistent")]
    fn test_namespace_index_missing_key_panics() {
        let ns = namespace();
        let _ = &ns["nonexistent"];
    }

    #[test]
    fn test_namespace_set_and_overwrite() {
        let mut ns = namespace();
        assert_eq!(ns.set("d", 4), None);
        assert_eq!(ns["d"], json!(4));
        assert_eq!(ns.len(), 4);

        assert_eq!(ns.set("a", 100), Some(json!(1)));
        assert_eq!(ns["a"], json!(100));
        assert_eq!(ns.keys().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_namespace_remove() {
        let mut ns = namespace();
        assert_eq!(ns.remove("a").unwrap(), json!(1));
        assert!(!ns.contains("a"));
        assert_eq!(ns.len(), 2);
        assert_eq!(ns.keys().collect::<Vec<_>>(), vec!["b", "c"]);

        assert!(matches!(ns.remove("nonexistent"), Err(MiscError::MissingKey { .. })));
    }

    #[test]
    fn test_namespace_iter_and_display() {
        let ns = namespace();
        let pairs: Vec<_> = ns.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        assert_eq!(pairs[0], ("a".to_string(), json!(1)));
        assert_eq!(ns.to_string(), r#"{"a":1,"b":2,"c":3}"#);
    }

    #[test]
    fn test_namespace_serde_round_trip_is_plain_object() {
        let ns: Namespace = serde_json::from_value(json!({"x": true})).unwrap();
        assert_eq!(ns["x"], json!(true));
        assert_eq!(serde_json::to_value(&ns).unwrap(), json!({"x": true}));
        assert!(Namespace::new().is_empty());
    }
}
