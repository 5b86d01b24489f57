//! SQLite backend for the InsightMaster store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. Articles keep their insight
//! arrays embedded as JSON columns, preserving the document shape of the
//! data model.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
