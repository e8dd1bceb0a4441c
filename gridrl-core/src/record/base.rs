//! Base implementation of records.
use crate::error::GridRlError;
use chrono::prelude::{DateTime, Local};
use std::collections::{
    hash_map::Iter,
    HashMap,
};

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single value, typically a reward or a count.
    Scalar(f64),

    /// A timestamp with local timezone.
    DateTime(DateTime<Local>),

    /// A sequence of values, such as the returns of finished episodes.
    Array1(Vec<f64>),

    /// A text value.
    String(String),
}

/// A container for storing key-value pairs of various data types.
///
/// # Examples
///
/// ```rust
/// use gridrl_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("total_reward", 12.0);
/// record.insert("episode_returns", RecordValue::Array1(vec![4.0, 8.0]));
/// assert_eq!(record.get_array1("episode_returns").unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f64) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges another record into this one in place.
    ///
    /// Values of `record` win on duplicate keys.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f64, GridRlError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(GridRlError::RecordValueTypeError("Scalar".to_string())),
            None => Err(GridRlError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a 1-dimensional array from the record.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f64>, GridRlError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(GridRlError::RecordValueTypeError("Array1".to_string())),
            None => Err(GridRlError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string value from the record.
    pub fn get_string(&self, k: &str) -> Result<String, GridRlError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(GridRlError::RecordValueTypeError("String".to_string())),
            None => Err(GridRlError::RecordKeyError(k.to_string())),
        }
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_access() {
        let record = Record::from_slice(&[
            ("reward", RecordValue::Scalar(1.5)),
            ("target", RecordValue::String("q_learning/cliff/ucb".to_string())),
        ]);
        assert_eq!(record.get_scalar("reward").unwrap(), 1.5);
        assert_eq!(
            record.get_scalar("target").unwrap_err(),
            GridRlError::RecordValueTypeError("Scalar".to_string())
        );
        assert_eq!(
            record.get_string("missing").unwrap_err(),
            GridRlError::RecordKeyError("missing".to_string())
        );
    }

    #[test]
    fn merge_prefers_the_argument() {
        let mut a = Record::from_scalar("x", 1.0);
        let mut b = Record::from_scalar("x", 2.0);
        b.insert("t", RecordValue::DateTime(Local::now()));
        a.merge_inplace(b);
        assert_eq!(a.get_scalar("x").unwrap(), 2.0);
        assert_eq!(a.iter().count(), 2);

        let mut c = Record::empty();
        assert!(c.is_empty());
        c.merge_inplace(Record::from_scalar("y", 3.0));
        assert!(!c.is_empty());
    }
}
