//! Nabeyaki application layer.
//!
//! Storage, persistence, the ordering session and process configuration
//! around the `nabeyaki` domain library.

pub mod config;
pub mod observability;
pub mod persistence;
pub mod session;
pub mod store;
