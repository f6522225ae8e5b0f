//! Key-value records emitted at every environment step for logging.
//!
//! ```rust
//! use gym_solo_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("reward", RecordValue::Scalar(-1.0));
//! record.insert("obs", RecordValue::Array1(vec![1.0, 2.0, 3.0]));
//!
//! assert_eq!(record.get_scalar("reward").unwrap(), -1.0);
//! ```
use crate::error::SoloError;
use std::collections::{hash_map::Iter, HashMap};

/// A value stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single value, e.g. a reward.
    Scalar(f64),

    /// A vector, e.g. an observation.
    Array1(Vec<f64>),

    /// A sequence of names, e.g. observation labels.
    Labels(Vec<String>),

    /// A text value.
    String(String),
}

/// A set of named values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record with a single scalar.
    pub fn from_scalar(name: impl Into<String>, value: f64) -> Self {
        let mut record = Self::empty();
        record.insert(name, RecordValue::Scalar(value));
        record
    }

    /// Inserts a value, replacing any value under the same key.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns the value under the key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Iterates over the entries in arbitrary order.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Returns `true` if the record has no entry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merges two records. Entries of `record` win on key collisions.
    pub fn merge(mut self, record: Record) -> Self {
        self.0.extend(record.0);
        self
    }

    /// Returns the scalar under the key.
    pub fn get_scalar(&self, k: &str) -> Result<f64, SoloError> {
        match self.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(SoloError::RecordValueType(k.to_string())),
            None => Err(SoloError::RecordKey(k.to_string())),
        }
    }

    /// Returns the vector under the key.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f64>, SoloError> {
        match self.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(SoloError::RecordValueType(k.to_string())),
            None => Err(SoloError::RecordKey(k.to_string())),
        }
    }

    /// Returns the labels under the key.
    pub fn get_labels(&self, k: &str) -> Result<Vec<String>, SoloError> {
        match self.get(k) {
            Some(RecordValue::Labels(v)) => Ok(v.clone()),
            Some(_) => Err(SoloError::RecordValueType(k.to_string())),
            None => Err(SoloError::RecordKey(k.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_access() {
        let record = Record::from_scalar("reward", 0.5)
            .merge(Record::from_scalar("reward", 1.5));

        assert_eq!(record.get_scalar("reward"), Ok(1.5));
        assert_eq!(
            record.get_array1("reward"),
            Err(SoloError::RecordValueType("reward".to_string()))
        );
        assert_eq!(
            record.get_scalar("obs"),
            Err(SoloError::RecordKey("obs".to_string()))
        );
    }

    #[test]
    fn test_labels() {
        let mut record = Record::empty();
        record.insert("labels", RecordValue::Labels(vec!["x".to_string(), "y".to_string()]));

        assert_eq!(
            record.get_labels("labels"),
            Ok(vec!["x".to_string(), "y".to_string()])
        );
        assert_eq!(
            record.get_scalar("labels"),
            Err(SoloError::RecordValueType("labels".to_string()))
        );
    }
}
