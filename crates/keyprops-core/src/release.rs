//! The `release` build variant and its signing wiring.

use serde::Serialize;

use crate::signing::{KeystoreConfigResolver, SigningIdentity};

/// How the release variant will be signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SigningState {
    /// Keystore path and all credentials are present.
    Signed,
    /// Keystore path is present but some credentials are not. The packaging
    /// tool decides whether that is fatal.
    Incomplete { missing: Vec<&'static str> },
    /// No keystore path, so the artifact is built without a release signature.
    Unsigned,
}

impl SigningState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SigningState::Signed => "signed",
            SigningState::Incomplete { .. } => "incomplete",
            SigningState::Unsigned => "unsigned",
        }
    }
}

impl std::fmt::Display for SigningState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SigningState::Incomplete { missing } => {
                write!(f, "incomplete (missing {})", missing.join(", "))
            }
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Release build type with its signing identity attached.
///
/// Minification and resource shrinking stay disabled for release builds.
#[derive(Debug)]
pub struct ReleaseVariant {
    pub name: &'static str,
    pub signing: SigningIdentity,
    pub minify_enabled: bool,
    pub shrink_resources: bool,
}

impl ReleaseVariant {
    pub fn from_identity(signing: SigningIdentity) -> Self {
        Self {
            name: "release",
            signing,
            minify_enabled: false,
            shrink_resources: false,
        }
    }

    /// Resolves the identity and wires it in.
    pub fn resolve(resolver: &KeystoreConfigResolver) -> Self {
        Self::from_identity(resolver.resolve())
    }

    pub fn signing_state(&self) -> SigningState {
        if !self.signing.is_usable() {
            return SigningState::Unsigned;
        }

        let missing = self.signing.missing_fields();
        if missing.is_empty() {
            SigningState::Signed
        } else {
            SigningState::Incomplete { missing }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use secrecy::SecretString;

    use super::*;

    fn identity(store_file: Option<&str>, with_passwords: bool) -> SigningIdentity {
        SigningIdentity {
            store_file: store_file.map(PathBuf::from),
            store_password: with_passwords.then(|| SecretString::from("pw1".to_string())),
            key_alias: Some("key1".to_string()),
            key_password: with_passwords.then(|| SecretString::from("kp1".to_string())),
        }
    }

    #[test]
    fn test_release_defaults() {
        let variant = ReleaseVariant::from_identity(SigningIdentity::empty());
        assert_eq!(variant.name, "release");
        assert!(!variant.minify_enabled);
        assert!(!variant.shrink_resources);
    }

    #[test]
    fn test_signing_state_signed() {
        let variant = ReleaseVariant::from_identity(identity(Some("/r/release.jks"), true));
        assert_eq!(variant.signing_state(), SigningState::Signed);
    }

    #[test]
    fn test_signing_state_incomplete() {
        let variant = ReleaseVariant::from_identity(identity(Some("/r/release.jks"), false));
        let state = variant.signing_state();
        assert_eq!(
            state,
            SigningState::Incomplete {
                missing: vec!["storePassword", "keyPassword"]
            }
        );
        assert_eq!(state.to_string(), "incomplete (missing storePassword, keyPassword)");
    }

    #[test]
    fn test_signing_state_unsigned_without_store_file() {
        let variant = ReleaseVariant::from_identity(identity(None, true));
        assert_eq!(variant.signing_state(), SigningState::Unsigned);
    }

    #[test]
    fn test_signing_state_serializes_with_tag() {
        let json = serde_json::to_value(SigningState::Incomplete {
            missing: vec!["keyAlias"],
        })
        .unwrap();
        assert_eq!(json["state"], "incomplete");
        assert_eq!(json["missing"][0], "keyAlias");
    }
}
