//! Android release signing.
//!
//! This module provides functionality for:
//! - resolving `key.properties` into a signing identity
//! - the typed schema for the four signing keys
//! - keystore verification and key.properties generation

pub mod android;
pub mod identity;
pub mod resolver;

pub use android::*;
pub use identity::*;
pub use resolver::*;
