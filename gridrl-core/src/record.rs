//! Key-value records of stepping and evaluation.
//!
//! A [`Record`] summarises one step of a learning instance or one evaluation
//! run, for example the total reward and the number of finished episodes.
//!
//! ```rust
//! use gridrl_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("reward", -1.0);
//! record.insert("action", RecordValue::String("up".to_string()));
//! assert_eq!(record.get_scalar("reward").unwrap(), -1.0);
//! ```
mod base;

pub use base::{Record, RecordValue};
