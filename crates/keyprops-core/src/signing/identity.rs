//! Signing identity and the typed `key.properties` schema.

use std::collections::HashMap;
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};

/// Property key holding the keystore path.
pub const STORE_FILE_KEY: &str = "storeFile";
/// Property key holding the keystore password.
pub const STORE_PASSWORD_KEY: &str = "storePassword";
/// Property key holding the key alias.
pub const KEY_ALIAS_KEY: &str = "keyAlias";
/// Property key holding the key password.
pub const KEY_PASSWORD_KEY: &str = "keyPassword";

/// The four known entries of a `key.properties` file.
///
/// Values are trimmed when read. Only `store_file` is normalised further:
/// an empty or whitespace-only path becomes `None`. The credentials are kept
/// as given, so `storePassword=` yields `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyProperties {
    pub store_file: Option<String>,
    pub store_password: Option<String>,
    pub key_alias: Option<String>,
    pub key_password: Option<String>,
}

impl KeyProperties {
    /// Extracts the known keys from a parsed properties map. Unknown keys are ignored.
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let field = |key: &str| map.get(key).map(|v| v.trim().to_string());

        Self {
            store_file: field(STORE_FILE_KEY).filter(|v| !v.is_empty()),
            store_password: field(STORE_PASSWORD_KEY),
            key_alias: field(KEY_ALIAS_KEY),
            key_password: field(KEY_PASSWORD_KEY),
        }
    }

    /// Parses `key.properties` content.
    pub fn parse(content: &str) -> Self {
        Self::from_map(&crate::properties::parse_properties(content))
    }
}

/// Keystore path and credentials used to sign a release package.
///
/// Built once per resolution and never mutated. Passwords are held as
/// [`SecretString`] so they never show up in `Debug` output.
#[derive(Debug, Default)]
pub struct SigningIdentity {
    /// Keystore path, already resolved against the build root.
    pub store_file: Option<PathBuf>,
    pub store_password: Option<SecretString>,
    pub key_alias: Option<String>,
    pub key_password: Option<SecretString>,
}

impl SigningIdentity {
    /// An identity with every field absent.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether a keystore path is present.
    ///
    /// This is the only requirement for a usable identity; missing credentials
    /// are left for the packaging step to reject.
    pub fn is_usable(&self) -> bool {
        self.store_file
            .as_ref()
            .is_some_and(|p| !p.as_os_str().is_empty())
    }

    /// Whether all four fields are present.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Whether no field is present at all.
    pub fn is_empty(&self) -> bool {
        self.missing_fields().len() == 4
    }

    /// Property keys of the absent fields, in file order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.is_usable() {
            missing.push(STORE_FILE_KEY);
        }
        if self.store_password.is_none() {
            missing.push(STORE_PASSWORD_KEY);
        }
        if self.key_alias.is_none() {
            missing.push(KEY_ALIAS_KEY);
        }
        if self.key_password.is_none() {
            missing.push(KEY_PASSWORD_KEY);
        }
        missing
    }

    pub fn store_password(&self) -> Option<&str> {
        self.store_password.as_ref().map(|s| s.expose_secret())
    }

    pub fn key_password(&self) -> Option<&str> {
        self.key_password.as_ref().map(|s| s.expose_secret())
    }
}
