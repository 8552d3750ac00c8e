//! sentio core library.
//!
//! Leaf crate shared by the server and by integration tests: the unified
//! error type, the in-process metrics registry, and the sentiment model
//! contract with its bundled backend.

pub mod error;
pub mod metrics;
pub mod model;
