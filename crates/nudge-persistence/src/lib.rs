//! Persistence layer for commit-nudge.
//!
//! Both processes of a deployment (the interactive bot and the triggered
//! commit check) read and write the same small JSON documents. This crate
//! makes those writes crash-safe (write to temp file, then rename) and
//! serializes read-modify-write cycles with an advisory file lock.
//!
//! # Example
//!
//! ```no_run
//! use nudge_persistence::JsonDocument;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct Counter { count: u32 }
//!
//! let doc: JsonDocument<Counter> = JsonDocument::new("/tmp/counter.json");
//! let now = doc.update(|c| { c.count += 1; c.count }).unwrap();
//! assert!(now >= 1);
//! ```

pub mod atomic;
pub mod document;
pub mod error;

pub use document::JsonDocument;
pub use error::{PersistenceError, Result};
