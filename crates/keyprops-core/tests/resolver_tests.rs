//! Resolver integration tests.
//!
//! These tests write real `key.properties` files into temporary build roots
//! and resolve them the way a release build does.

use std::fs;
use std::path::Path;

use keyprops_core::{KeystoreConfigResolver, ReleaseVariant, SigningState};
use tempfile::TempDir;

/// Helper to create a build root holding the given key.properties content.
fn build_root_with(content: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("key.properties"), content).expect("Failed to write key.properties");
    dir
}

// =============================================================================
// Missing file
// =============================================================================

mod missing_file {
    use super::*;

    #[test]
    fn absent_file_yields_empty_identity() {
        let dir = tempfile::tempdir().unwrap();

        let identity = KeystoreConfigResolver::new(dir.path()).resolve();

        assert!(identity.store_file.is_none());
        assert!(identity.store_password.is_none());
        assert!(identity.key_alias.is_none());
        assert!(identity.key_password.is_none());
        assert!(identity.is_empty());
    }

    #[test]
    fn missing_build_root_yields_empty_identity() {
        let identity = KeystoreConfigResolver::new("/nonexistent/keyprops/android").resolve();
        assert!(identity.is_empty());
    }

    #[test]
    fn directory_in_place_of_file_yields_empty_identity() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("key.properties")).unwrap();

        let identity = KeystoreConfigResolver::new(dir.path()).resolve();
        assert!(identity.is_empty());
    }

    #[test]
    fn absent_file_leaves_release_unsigned() {
        let dir = tempfile::tempdir().unwrap();

        let variant = ReleaseVariant::resolve(&KeystoreConfigResolver::new(dir.path()));

        assert_eq!(variant.signing_state(), SigningState::Unsigned);
    }
}

// =============================================================================
// Store file handling
// =============================================================================

mod store_file {
    use super::*;

    #[test]
    fn empty_store_file_is_absent_but_credentials_are_kept() {
        let dir =
            build_root_with("storeFile=\nstorePassword=pw1\nkeyAlias=key1\nkeyPassword=kp1\n");

        let identity = KeystoreConfigResolver::new(dir.path()).resolve();

        assert!(identity.store_file.is_none());
        assert!(!identity.is_usable());
        assert_eq!(identity.store_password(), Some("pw1"));
        assert_eq!(identity.key_alias.as_deref(), Some("key1"));
        assert_eq!(identity.key_password(), Some("kp1"));
    }

    #[test]
    fn whitespace_store_file_is_absent() {
        let dir = build_root_with("storeFile=   \t \nkeyAlias=key1\n");

        let identity = KeystoreConfigResolver::new(dir.path()).resolve();

        assert!(identity.store_file.is_none());
        assert_eq!(identity.key_alias.as_deref(), Some("key1"));
        assert!(identity.store_password.is_none());
    }

    #[test]
    fn store_file_is_trimmed_and_resolved_against_build_root() {
        let dir = build_root_with("storeFile=   keys/upload.jks   \n");

        let identity = KeystoreConfigResolver::new(dir.path()).resolve();

        assert_eq!(identity.store_file, Some(dir.path().join("keys/upload.jks")));
        assert!(identity.is_usable());
    }

    #[test]
    fn store_file_without_credentials_is_incomplete() {
        let dir = build_root_with("storeFile=release.jks\n");

        let variant = ReleaseVariant::resolve(&KeystoreConfigResolver::new(dir.path()));

        assert_eq!(
            variant.signing_state(),
            SigningState::Incomplete {
                missing: vec!["storePassword", "keyAlias", "keyPassword"]
            }
        );
    }
}

// =============================================================================
// Full identities
// =============================================================================

mod full_identity {
    use super::*;

    #[test]
    fn release_scenario() {
        let dir = build_root_with(
            "storeFile=release.jks\nstorePassword=pw1\nkeyAlias=key1\nkeyPassword=kp1\n",
        );

        let identity = KeystoreConfigResolver::new(dir.path()).resolve();

        assert_eq!(identity.store_file, Some(dir.path().join("release.jks")));
        assert_eq!(identity.store_password(), Some("pw1"));
        assert_eq!(identity.key_alias.as_deref(), Some("key1"));
        assert_eq!(identity.key_password(), Some("kp1"));
        assert!(identity.is_complete());
    }

    #[test]
    fn written_values_round_trip_after_trimming() {
        let dir = build_root_with(
            "# Signing configuration\n\
             storePassword =  s3cret \n\
             keyPassword:k3y\n\
             keyAlias\tupload\n\
             storeFile = ../upload-keystore.jks\n",
        );

        let variant = ReleaseVariant::resolve(&KeystoreConfigResolver::new(dir.path()));

        assert_eq!(variant.signing_state(), SigningState::Signed);
        assert_eq!(
            variant.signing.store_file,
            Some(dir.path().join("../upload-keystore.jks"))
        );
        assert_eq!(variant.signing.store_password(), Some("s3cret"));
        assert_eq!(variant.signing.key_password(), Some("k3y"));
        assert_eq!(variant.signing.key_alias.as_deref(), Some("upload"));
    }

    #[test]
    fn custom_properties_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("signing")).unwrap();
        fs::write(
            dir.path().join("signing/release.properties"),
            "storeFile=release.jks\nkeyAlias=key1\n",
        )
        .unwrap();

        let resolver = KeystoreConfigResolver::new(dir.path())
            .with_properties_path(Path::new("signing/release.properties"));
        let identity = resolver.resolve();

        // Keystore paths stay relative to the build root, not to the properties file.
        assert_eq!(identity.store_file, Some(dir.path().join("release.jks")));
        assert_eq!(identity.key_alias.as_deref(), Some("key1"));
    }

    #[test]
    fn latin1_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let mut content = b"storeFile=release.jks\nkeyAlias=cl".to_vec();
        content.push(0xE9);
        content.extend_from_slice(b"\n");
        fs::write(dir.path().join("key.properties"), content).unwrap();

        let identity = KeystoreConfigResolver::new(dir.path()).resolve();

        assert_eq!(identity.key_alias.as_deref(), Some("clé"));
    }

    #[test]
    fn utf8_password_resolves_as_gradle_reads_it() {
        let dir = build_root_with("storeFile=release.jks\nstorePassword=pässword\n");

        let identity = KeystoreConfigResolver::new(dir.path()).resolve();

        assert_eq!(identity.store_password(), Some("pÃ¤ssword"));
    }

    #[test]
    fn carriage_return_line_endings_keep_keys_apart() {
        let dir = build_root_with(
            "storeFile=release.jks\rstorePassword=pw1\rkeyAlias=key1\rkeyPassword=kp1\r",
        );

        let identity = KeystoreConfigResolver::new(dir.path()).resolve();

        assert_eq!(identity.store_file, Some(dir.path().join("release.jks")));
        assert_eq!(identity.store_password(), Some("pw1"));
        assert_eq!(identity.key_alias.as_deref(), Some("key1"));
        assert_eq!(identity.key_password(), Some("kp1"));
    }
}
