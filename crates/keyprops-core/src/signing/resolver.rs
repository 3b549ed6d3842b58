//! Resolution of `key.properties` into a [`SigningIdentity`].

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use super::identity::{KeyProperties, SigningIdentity};
use crate::KEY_PROPERTIES_FILE;

/// Reads an optional properties file and turns it into a signing identity.
///
/// Resolution never fails. A missing or unreadable file, an empty `storeFile`
/// or absent credentials all degrade to absent fields, and each decision is
/// logged. Whether an incomplete identity is acceptable is left to whatever
/// consumes it.
#[derive(Debug, Clone)]
pub struct KeystoreConfigResolver {
    build_root: PathBuf,
    properties_path: PathBuf,
}

impl KeystoreConfigResolver {
    /// Creates a resolver reading `<build_root>/key.properties`.
    pub fn new(build_root: impl Into<PathBuf>) -> Self {
        let build_root = build_root.into();
        let properties_path = build_root.join(KEY_PROPERTIES_FILE);
        Self {
            build_root,
            properties_path,
        }
    }

    /// Reads a different properties file. Relative paths are taken from the build root.
    pub fn with_properties_path(mut self, path: impl AsRef<Path>) -> Self {
        self.properties_path = self.build_root.join(path);
        self
    }

    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    pub fn properties_path(&self) -> &Path {
        &self.properties_path
    }

    /// Resolves the signing identity.
    pub fn resolve(&self) -> SigningIdentity {
        let path = &self.properties_path;
        tracing::info!("Looking for signing properties at {}", path.display());

        if !path.exists() {
            tracing::warn!("{} not found, release build will not be signed", path.display());
            return SigningIdentity::empty();
        }
        tracing::info!("Found {}", path.display());

        let content = match std::fs::read(path) {
            Ok(bytes) => crate::properties::decode_bytes(&bytes),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                return SigningIdentity::empty();
            }
        };

        self.identity_from(KeyProperties::parse(&content))
    }

    /// Builds the identity from already-parsed properties.
    pub fn identity_from(&self, props: KeyProperties) -> SigningIdentity {
        let store_file = match props.store_file {
            Some(store_file) => {
                let resolved = self.build_root.join(&store_file);
                tracing::info!("Using keystore at {}", resolved.display());
                Some(resolved)
            }
            None => {
                tracing::warn!(
                    "storeFile is empty in {}, release build will not be signed",
                    self.properties_path.display()
                );
                None
            }
        };

        SigningIdentity {
            store_file,
            store_password: props.store_password.map(SecretString::from),
            key_alias: props.key_alias,
            key_password: props.key_password.map(SecretString::from),
        }
    }
}
