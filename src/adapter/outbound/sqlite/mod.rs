//! SQLite persistence adapters.
//!
//! Provides the SQLite-backed quota store using Diesel ORM.

pub mod database;
pub mod quota;

pub use quota::SqliteQuotaStore;
