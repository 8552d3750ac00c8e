//! Request handlers for the prediction API.

pub mod predict;
