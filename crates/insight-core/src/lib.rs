//! Core types and trait definitions for InsightMaster.
//!
//! This crate is deliberately free of HTTP and database dependencies;
//! storage backends and the API layer depend on it, never the reverse.

pub mod analyzer;
pub mod article;
pub mod insight;
pub mod store;
pub mod user;
