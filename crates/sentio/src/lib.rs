//! Top-level facade crate for sentio.
//!
//! Re-exports the core types and the server library so users can depend on a single crate.

pub mod core {
    pub use sentio_core::*;
}

pub mod server {
    pub use sentio_server::*;
}
