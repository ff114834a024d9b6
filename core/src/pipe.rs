//! The pipe threaded through one render pass.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Mutable bag of values shared by all views of a single render pass.
///
/// Inner views run first, so anything they store is visible to the views
/// that wrap them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Pipe {
    values: Map<String, Value>,
}

impl Pipe {
    /// Creates an empty pipe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Deserializes the value stored under `key`.
    ///
    /// Returns `None` when the key is missing or holds a value of another shape.
    #[must_use]
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Serializes and stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns the serialization error when `value` cannot be represented as JSON.
    pub fn insert_as<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Option<Value>, serde_json::Error> {
        let value = serde_json::to_value(value)?;
        Ok(self.values.insert(key.into(), value))
    }

    /// Removes the value stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Returns `true` when `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns `true` when nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the pipe and returns the stored values.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_round_trip() {
        let mut pipe = Pipe::new();
        pipe.insert_as("items", &vec![1, 2, 3]).unwrap();
        assert_eq!(pipe.get_as::<Vec<u32>>("items"), Some(vec![1, 2, 3]));
        assert_eq!(pipe.get_as::<String>("items"), None);
    }

    #[test]
    fn insert_replaces() {
        let mut pipe = Pipe::new();
        assert!(pipe.insert("title", "a").is_none());
        assert_eq!(pipe.insert("title", "b"), Some(Value::from("a")));
        assert!(pipe.contains("title"));
        assert_eq!(pipe.remove("title"), Some(Value::from("b")));
        assert!(pipe.is_empty());
    }
}
