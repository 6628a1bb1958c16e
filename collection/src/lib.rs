//! Access to the Metropolitan Museum of Art collection API.
//!
//! Raw upstream records are fetched through a [`client::Fetch`] capability
//! (HTTP with a TTL cache in production, an in-memory fake in tests),
//! normalized into [`types::CanonicalObject`]s, and paged through
//! [`connection`] windows.

pub mod batch;
pub mod cache;
pub mod client;
pub mod config;
pub mod connection;
pub mod errors;
pub mod metrics_defs;
pub mod normalize;
pub mod service;
pub mod types;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

pub use service::Collection;
