//! CLI command implementations.

pub mod check;
pub mod config;
pub mod key_properties;
pub mod resolve;
