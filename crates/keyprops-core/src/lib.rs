//! Keyprops Core Library
//!
//! Resolves the Android release signing identity of a Flutter/Gradle project
//! from its `key.properties` file, and wires it into the release build variant.

pub mod error;
pub mod flutter;
pub mod properties;
pub mod release;
pub mod signing;

pub use error::{KeypropsError, Result};
pub use release::{ReleaseVariant, SigningState};
pub use signing::{KeyProperties, KeystoreConfigResolver, SigningIdentity};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default name of the signing properties file inside the build root.
pub const KEY_PROPERTIES_FILE: &str = "key.properties";
