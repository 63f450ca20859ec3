//! ribbit-stores - State store implementations for ribbit.
//!
//! # Supported Backends
//!
//! - **Memory** - process-local map, lost on exit
//! - **JSON file** (feature: `json-file`) - one JSON document per key
//! - **SQLite** (feature: `sqlite`) - single key-value table

mod error;
mod factory;
mod keys;
mod memory;

#[cfg(feature = "json-file")]
mod json_file;

#[cfg(feature = "sqlite")]
mod sqlite;

pub use factory::StoreFactory;
pub use memory::InMemoryStore;

#[cfg(feature = "json-file")]
pub use json_file::JsonFileStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

// Re-export core types
pub use ribbit_core::config::StoreConfig;
pub use ribbit_core::traits::{StateStore, StoreProvider};
