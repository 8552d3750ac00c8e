//! sentio server library entry.
//!
//! This crate wires the config layer, shared state, request-timing
//! pipeline, inference readiness slot, and HTTP handlers into a cohesive
//! service. It is intended to be consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod inference;
pub mod obs;
pub mod ops;
pub mod router;
