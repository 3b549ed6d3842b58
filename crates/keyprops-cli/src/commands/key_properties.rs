//! `keyprops init` and `keyprops clean` commands.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use keyprops_core::KeystoreConfigResolver;
use keyprops_core::signing::{cleanup_key_properties, write_key_properties};

/// Arguments for writing a signing properties file.
#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Keystore path, as it should appear in the file (relative to the build root or absolute)
    #[arg(long)]
    pub store_file: PathBuf,

    /// Alias of the signing key
    #[arg(long)]
    pub key_alias: String,

    /// Keystore password
    #[arg(long, env = "KEYPROPS_STORE_PASSWORD", hide_env_values = true)]
    pub store_password: Option<String>,

    /// Key password (defaults to the keystore password)
    #[arg(long, env = "KEYPROPS_KEY_PASSWORD", hide_env_values = true)]
    pub key_password: Option<String>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub async fn handle_init_command(resolver: &KeystoreConfigResolver, args: InitArgs) -> Result<()> {
    let Some(store_password) = args.store_password else {
        bail!(
            "A keystore password is required. \
             Pass --store-password or set KEYPROPS_STORE_PASSWORD."
        );
    };
    let key_password = args.key_password.unwrap_or_else(|| store_password.clone());

    let keystore = resolver.build_root().join(&args.store_file);
    if !keystore.exists() {
        tracing::warn!("Keystore {} does not exist yet", keystore.display());
    }

    let path = resolver.properties_path();
    write_key_properties(
        path,
        &args.store_file,
        &store_password,
        &args.key_alias,
        &key_password,
        args.force,
    )
    .await
    .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote {}", path.display());
    println!();
    println!("Keep this file out of version control, e.g. add it to android/.gitignore:");
    println!("  {}", path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default());

    Ok(())
}

pub async fn handle_clean_command(resolver: &KeystoreConfigResolver) -> Result<()> {
    let path = resolver.properties_path();

    let removed = cleanup_key_properties(path)
        .await
        .with_context(|| format!("Failed to remove {}", path.display()))?;

    if removed {
        println!("Removed {}", path.display());
    } else {
        println!("Nothing to remove: {} does not exist", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_args(store_password: Option<&str>, key_password: Option<&str>) -> InitArgs {
        InitArgs {
            store_file: PathBuf::from("keys/upload.jks"),
            key_alias: "upload".to_string(),
            store_password: store_password.map(str::to_string),
            key_password: key_password.map(str::to_string),
            force: false,
        }
    }

    #[tokio::test]
    async fn test_init_requires_store_password() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = KeystoreConfigResolver::new(dir.path());

        let err = handle_init_command(&resolver, init_args(None, Some("kp1")))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("keystore password is required"));
        assert!(!resolver.properties_path().exists());
    }

    #[tokio::test]
    async fn test_init_key_password_defaults_to_store_password() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = KeystoreConfigResolver::new(dir.path());

        handle_init_command(&resolver, init_args(Some("s3cret"), None))
            .await
            .unwrap();

        let identity = resolver.resolve();
        assert!(identity.is_complete());
        assert_eq!(identity.store_password(), Some("s3cret"));
        assert_eq!(identity.key_password(), identity.store_password());
        assert_eq!(identity.store_file, Some(dir.path().join("keys/upload.jks")));
    }

    #[tokio::test]
    async fn test_init_keeps_explicit_key_password() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = KeystoreConfigResolver::new(dir.path());

        handle_init_command(&resolver, init_args(Some("s3cret"), Some("k3y")))
            .await
            .unwrap();

        let identity = resolver.resolve();
        assert_eq!(identity.store_password(), Some("s3cret"));
        assert_eq!(identity.key_password(), Some("k3y"));
    }

    #[tokio::test]
    async fn test_init_refuses_overwrite_then_clean_removes() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = KeystoreConfigResolver::new(dir.path());

        handle_init_command(&resolver, init_args(Some("pw"), None))
            .await
            .unwrap();
        assert!(
            handle_init_command(&resolver, init_args(Some("pw"), None))
                .await
                .is_err()
        );

        handle_clean_command(&resolver).await.unwrap();
        assert!(!resolver.properties_path().exists());
        // Cleaning twice is not an error
        handle_clean_command(&resolver).await.unwrap();
    }
}
